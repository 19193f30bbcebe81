//! Root application component with routing and the auth provider.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::sync::{Arc, OnceLock};

use backend::config::DEFAULT_URL;
use backend::{BackendConfig, RestBackend};
use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};
use tracing::warn;

use crate::components::auth_provider::AuthProvider;
use crate::components::protected_route::ProtectedRoute;
use crate::pages::admin::{Dashboard, Plans, Settings, Stores, Users};
use crate::pages::customer::{CustomerBooking, CustomerDashboard, CustomerHistory, CustomerProfile};
use crate::pages::index::Index;
use crate::pages::login::{CustomerLogin, StoreLogin};
use crate::pages::not_found::NotFound;
use crate::pages::store::{
    StoreAdmin, StoreCustomers, StoreProfessionals, StoreReports, StoreSchedule, StoreServices, StoreSettings,
};
use crate::routes::AppRoute;
use crate::state::session::SessionManager;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="pt-BR">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Build-time backend config, resolved once per process.
///
/// The server renders `App` per request; a missing anon key is reported on
/// the first render only.
fn backend_config() -> &'static BackendConfig {
    static CONFIG: OnceLock<BackendConfig> = OnceLock::new();
    CONFIG.get_or_init(|| {
        BackendConfig::from_build_env().unwrap_or_else(|e| {
            warn!(error = %e, "backend not configured; requests will be rejected");
            BackendConfig::new(DEFAULT_URL, "")
        })
    })
}

/// Backend client for this build. Browser builds persist the session in
/// `localStorage`.
fn build_backend() -> RestBackend {
    let config = backend_config().clone();

    #[cfg(feature = "hydrate")]
    {
        RestBackend::with_storage(config, Box::new(crate::util::browser_storage::LocalStorage))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        RestBackend::new(config)
    }
}

/// Root application component.
///
/// Builds the session manager once and wraps every non-public route in
/// `ProtectedRoute`.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let manager = Arc::new(SessionManager::new(Arc::new(build_backend())));

    view! {
        <Stylesheet id="leptos" href="/pkg/agenda.css"/>
        <Title text="Agenda"/>

        <AuthProvider manager>
            <Router>
                <Routes fallback=NotFound>
                    <Route path=StaticSegment(AppRoute::Index.segment()) view=Index/>
                    <Route path=StaticSegment(AppRoute::StoreLogin.segment()) view=StoreLogin/>
                    <Route path=StaticSegment(AppRoute::CustomerLogin.segment()) view=CustomerLogin/>

                    <Route
                        path=StaticSegment(AppRoute::Dashboard.segment())
                        view=|| view! { <ProtectedRoute><Dashboard/></ProtectedRoute> }
                    />
                    <Route
                        path=StaticSegment(AppRoute::Settings.segment())
                        view=|| view! { <ProtectedRoute><Settings/></ProtectedRoute> }
                    />
                    <Route
                        path=StaticSegment(AppRoute::Plans.segment())
                        view=|| view! { <ProtectedRoute><Plans/></ProtectedRoute> }
                    />
                    <Route
                        path=StaticSegment(AppRoute::Stores.segment())
                        view=|| view! { <ProtectedRoute><Stores/></ProtectedRoute> }
                    />
                    <Route
                        path=StaticSegment(AppRoute::Users.segment())
                        view=|| view! { <ProtectedRoute><Users/></ProtectedRoute> }
                    />

                    <Route
                        path=StaticSegment(AppRoute::StoreAdmin.segment())
                        view=|| view! { <ProtectedRoute><StoreAdmin/></ProtectedRoute> }
                    />
                    <Route
                        path=StaticSegment(AppRoute::StoreSettings.segment())
                        view=|| view! { <ProtectedRoute><StoreSettings/></ProtectedRoute> }
                    />
                    <Route
                        path=StaticSegment(AppRoute::StoreProfessionals.segment())
                        view=|| view! { <ProtectedRoute><StoreProfessionals/></ProtectedRoute> }
                    />
                    <Route
                        path=StaticSegment(AppRoute::StoreServices.segment())
                        view=|| view! { <ProtectedRoute><StoreServices/></ProtectedRoute> }
                    />
                    <Route
                        path=StaticSegment(AppRoute::StoreSchedule.segment())
                        view=|| view! { <ProtectedRoute><StoreSchedule/></ProtectedRoute> }
                    />
                    <Route
                        path=StaticSegment(AppRoute::StoreReports.segment())
                        view=|| view! { <ProtectedRoute><StoreReports/></ProtectedRoute> }
                    />
                    <Route
                        path=StaticSegment(AppRoute::StoreCustomers.segment())
                        view=|| view! { <ProtectedRoute><StoreCustomers/></ProtectedRoute> }
                    />

                    <Route
                        path=StaticSegment(AppRoute::CustomerDashboard.segment())
                        view=|| view! { <ProtectedRoute><CustomerDashboard/></ProtectedRoute> }
                    />
                    <Route
                        path=StaticSegment(AppRoute::CustomerBooking.segment())
                        view=|| view! { <ProtectedRoute><CustomerBooking/></ProtectedRoute> }
                    />
                    <Route
                        path=StaticSegment(AppRoute::CustomerProfile.segment())
                        view=|| view! { <ProtectedRoute><CustomerProfile/></ProtectedRoute> }
                    />
                    <Route
                        path=StaticSegment(AppRoute::CustomerHistory.segment())
                        view=|| view! { <ProtectedRoute><CustomerHistory/></ProtectedRoute> }
                    />
                </Routes>
            </Router>
        </AuthProvider>
    }
}
