//! Wrapper that renders its children only for a signed-in user.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::components::auth_provider::use_auth;
use crate::util::auth::{GuardDecision, guard_decision, install_unauth_redirect};

/// Shows "Carregando..." during the initial session check and replaces the
/// current history entry with `/` once the visitor is known to be signed out.
#[component]
pub fn ProtectedRoute(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    install_unauth_redirect(auth.state, use_navigate());

    move || match auth.state.with(guard_decision) {
        GuardDecision::Loading => view! { <div class="auth-loading">"Carregando..."</div> }.into_any(),
        GuardDecision::Redirect(_) => ().into_any(),
        GuardDecision::Render => children().into_any(),
    }
}
