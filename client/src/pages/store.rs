//! Store back-office screens.

use leptos::prelude::*;

use crate::components::page_shell::Placeholder;

#[component]
pub fn StoreAdmin() -> impl IntoView {
    view! { <Placeholder/> }
}

#[component]
pub fn StoreSettings() -> impl IntoView {
    view! { <Placeholder/> }
}

#[component]
pub fn StoreProfessionals() -> impl IntoView {
    view! { <Placeholder/> }
}

#[component]
pub fn StoreServices() -> impl IntoView {
    view! { <Placeholder/> }
}

#[component]
pub fn StoreSchedule() -> impl IntoView {
    view! { <Placeholder/> }
}

#[component]
pub fn StoreReports() -> impl IntoView {
    view! { <Placeholder/> }
}

#[component]
pub fn StoreCustomers() -> impl IntoView {
    view! { <Placeholder/> }
}
