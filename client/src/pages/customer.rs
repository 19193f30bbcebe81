//! Customer self-service screens.
//!
//! Only the profile screen does real work: it patches the signed-in user's
//! profile row through `SessionManager::update_profile`.

#[cfg(test)]
#[path = "customer_test.rs"]
mod customer_test;

use backend::schema::{Profile, ProfileUpdate};
use leptos::prelude::*;

use crate::components::auth_provider::use_auth;
use crate::components::page_shell::{PageShell, Placeholder};

#[component]
pub fn CustomerDashboard() -> impl IntoView {
    view! { <Placeholder/> }
}

#[component]
pub fn CustomerBooking() -> impl IntoView {
    view! { <Placeholder/> }
}

#[component]
pub fn CustomerHistory() -> impl IntoView {
    view! { <Placeholder/> }
}

/// Build a patch holding only the fields that differ from `current`.
///
/// Blank input never clears a stored value.
#[must_use]
pub fn profile_patch(current: Option<&Profile>, full_name: &str, phone: &str) -> ProfileUpdate {
    let changed = |input: &str, stored: Option<&String>| {
        let input = input.trim();
        (!input.is_empty() && stored.map(String::as_str) != Some(input)).then(|| input.to_owned())
    };
    ProfileUpdate {
        full_name: changed(full_name, current.and_then(|p| p.full_name.as_ref())),
        phone: changed(phone, current.and_then(|p| p.phone.as_ref())),
        role: None,
    }
}

#[component]
pub fn CustomerProfile() -> impl IntoView {
    let auth = use_auth();
    let current = move || auth.state.with(|s| s.profile.clone());

    let full_name = RwSignal::new(String::new());
    let phone = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    Effect::new(move || {
        let profile = current();
        full_name.set(profile.as_ref().and_then(|p| p.full_name.clone()).unwrap_or_default());
        phone.set(profile.and_then(|p| p.phone).unwrap_or_default());
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let patch = profile_patch(current().as_ref(), &full_name.get(), &phone.get());
        if patch.is_empty() {
            info.set("Nenhuma alteração.".to_owned());
            return;
        }
        busy.set(true);
        let manager = auth.manager.clone();
        leptos::task::spawn_local(async move {
            match manager.update_profile(&patch).await {
                Ok(_) => info.set("Perfil atualizado.".to_owned()),
                Err(e) => info.set(e.to_string()),
            }
            busy.set(false);
        });
    };

    view! {
        <PageShell>
            <form class="profile-form" on:submit=on_submit>
                <label>
                    "Nome"
                    <input
                        type="text"
                        prop:value=move || full_name.get()
                        on:input=move |ev| full_name.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "Telefone"
                    <input
                        type="tel"
                        prop:value=move || phone.get()
                        on:input=move |ev| phone.set(event_target_value(&ev))
                    />
                </label>
                <button type="submit" disabled=move || busy.get()>"Salvar"</button>
            </form>
            <Show when=move || !info.get().is_empty()>
                <p class="profile-form__message">{move || info.get()}</p>
            </Show>
        </PageShell>
    }
}
