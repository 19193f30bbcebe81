//! Public landing page linking to both login flows.

use leptos::prelude::*;
use leptos_router::components::A;

use crate::components::auth_provider::use_auth;
use crate::routes::AppRoute;

#[component]
pub fn Index() -> impl IntoView {
    let auth = use_auth();
    let signed_in_as = move || {
        auth.state
            .with(|s| s.user.as_ref().map(|u| u.display_name().to_owned()))
    };

    view! {
        <div class="landing">
            <h1>{AppRoute::Index.title()}</h1>
            <p class="landing__tagline">"Agendamentos para lojas, profissionais e clientes."</p>
            <nav class="landing__links">
                <A href=AppRoute::StoreLogin.path()>"Sou lojista"</A>
                <A href=AppRoute::CustomerLogin.path()>"Sou cliente"</A>
            </nav>
            {move || signed_in_as().map(|name| view! { <p class="landing__session">"Conectado como " {name}</p> })}
        </div>
    }
}
