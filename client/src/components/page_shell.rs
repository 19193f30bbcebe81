//! Common chrome for signed-in screens: title, current user, sign-out.
//!
//! The title comes from the route table entry for the current location.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};

use crate::components::auth_provider::use_auth;
use crate::routes::AppRoute;

#[component]
pub fn PageShell(children: Children) -> impl IntoView {
    let auth = use_auth();
    let pathname = use_location().pathname;
    let title = move || pathname.with(|path| AppRoute::from_path(path).title());
    let busy = RwSignal::new(false);
    let navigate = use_navigate();

    let display_name = move || {
        auth.state
            .with(|s| s.user.as_ref().map(|u| u.display_name().to_owned()))
            .unwrap_or_default()
    };

    let on_sign_out = move |_| {
        if busy.get() {
            return;
        }
        busy.set(true);
        let manager = auth.manager.clone();
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            if manager.sign_out().await.is_ok() {
                navigate("/", NavigateOptions { replace: true, ..NavigateOptions::default() });
            }
            busy.set(false);
        });
    };

    view! {
        <div class="page">
            <header class="page__header">
                <h1>{title}</h1>
                <span class="page__user">{display_name}</span>
                <button class="page__sign-out" on:click=on_sign_out disabled=move || busy.get()>
                    "Sair"
                </button>
            </header>
            <Show when=move || auth.state.with(|s| s.error.is_some())>
                <p class="page__error">{move || auth.state.with(|s| s.error.clone().unwrap_or_default())}</p>
            </Show>
            <main class="page__body">{children()}</main>
        </div>
    }
}

/// Stand-in body for business screens not built yet.
#[component]
pub fn Placeholder() -> impl IntoView {
    view! {
        <PageShell>
            <p class="placeholder">"Em construção."</p>
        </PageShell>
    }
}
