//! Context provider exposing the session manager and its state to the tree.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` builds one [`SessionManager`] and hands it to [`AuthProvider`]. The
//! provider mirrors the manager's watch channel into a read-only signal so
//! route guards and pages re-render on every auth change.
//!
//! In the browser the provider also drives the manager's auth pump and
//! detaches it when the provider is torn down. Server rendering only sees the
//! initial `loading` state.

#[cfg(test)]
#[path = "auth_provider_test.rs"]
mod auth_provider_test;

use std::sync::Arc;

use leptos::prelude::*;

use crate::state::auth::AuthState;
use crate::state::session::SessionManager;

/// Handle shared through context by [`AuthProvider`].
#[derive(Clone)]
pub struct AuthContext {
    pub manager: Arc<SessionManager>,
    pub state: ReadSignal<AuthState>,
}

#[component]
pub fn AuthProvider(manager: Arc<SessionManager>, children: Children) -> impl IntoView {
    let (state, set_state) = signal(manager.snapshot());

    #[cfg(feature = "hydrate")]
    {
        use futures::future::{AbortHandle, Abortable};

        let mut changes = manager.subscribe();
        let (bridge_abort, registration) = AbortHandle::new_pair();
        leptos::task::spawn_local(async move {
            let bridge = async move {
                while changes.changed().await.is_ok() {
                    let next = changes.borrow_and_update().clone();
                    if set_state.try_set(next).is_some() {
                        break;
                    }
                }
            };
            let _ = Abortable::new(bridge, registration).await;
        });

        let (pump, listener) = Arc::clone(&manager).listen();
        leptos::task::spawn_local(pump);

        on_cleanup(move || {
            listener.detach();
            bridge_abort.abort();
        });
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = set_state;
    }

    provide_context(AuthContext { manager, state });
    children()
}

/// Auth context installed by the nearest [`AuthProvider`].
///
/// # Panics
///
/// Panics when called outside an [`AuthProvider`].
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("use_auth must be used within an AuthProvider")
}
