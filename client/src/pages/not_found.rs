use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_location;
use tracing::warn;

use crate::routes::AppRoute;

#[component]
pub fn NotFound() -> impl IntoView {
    let path = use_location().pathname.get_untracked();
    warn!(path = %path, "route not found");

    view! {
        <div class="not-found">
            <h1>"404"</h1>
            <p>{AppRoute::NotFound.title()}</p>
            <A href=AppRoute::Index.path()>"Voltar ao início"</A>
        </div>
    }
}
