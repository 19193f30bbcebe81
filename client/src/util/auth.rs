//! Route guard decisions shared by protected screens.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected route applies the same rule, so the decision is a pure
//! function of [`AuthState`] and the reactive wiring lives in
//! `components::protected_route`.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::state::auth::AuthState;

/// Where unauthenticated visitors of a protected route are sent.
pub const UNAUTH_REDIRECT: &str = "/";

/// What a protected route should show for the current auth state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Initial session check still running; show the loading indicator.
    Loading,
    /// No user; navigate away, replacing the current history entry.
    Redirect(&'static str),
    Render,
}

/// Decide how a protected route renders.
///
/// `loading` is checked first: a missing user during the initial check is
/// not yet an unauthenticated visitor.
#[must_use]
pub fn guard_decision(state: &AuthState) -> GuardDecision {
    if state.loading {
        GuardDecision::Loading
    } else if state.user.is_none() {
        GuardDecision::Redirect(UNAUTH_REDIRECT)
    } else {
        GuardDecision::Render
    }
}

/// Navigate away whenever the guard decides to redirect.
///
/// Keeps redirecting on later sign-outs, not only on first render.
pub fn install_unauth_redirect<F>(auth: ReadSignal<AuthState>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + 'static,
{
    Effect::new(move || {
        if let GuardDecision::Redirect(path) = auth.with(guard_decision) {
            navigate(path, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
}
