//! Platform administration screens.

use leptos::prelude::*;

use crate::components::page_shell::Placeholder;

#[component]
pub fn Dashboard() -> impl IntoView {
    view! { <Placeholder/> }
}

#[component]
pub fn Settings() -> impl IntoView {
    view! { <Placeholder/> }
}

#[component]
pub fn Plans() -> impl IntoView {
    view! { <Placeholder/> }
}

#[component]
pub fn Stores() -> impl IntoView {
    view! { <Placeholder/> }
}

#[component]
pub fn Users() -> impl IntoView {
    view! { <Placeholder/> }
}
