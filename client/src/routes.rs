//! Route table: every client-side path and the access group it belongs to.
//!
//! DESIGN
//! ======
//! `app::App` builds its `<Routes>` from these segments, so a path is named in
//! exactly one place. Groups other than `Public` are wrapped by
//! `ProtectedRoute`; membership in a group grants nothing beyond being signed
//! in.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouteGroup {
    Public,
    Admin,
    Store,
    Customer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AppRoute {
    Index,
    StoreLogin,
    CustomerLogin,

    Dashboard,
    Settings,
    Plans,
    Stores,
    Users,

    StoreAdmin,
    StoreSettings,
    StoreProfessionals,
    StoreServices,
    StoreSchedule,
    StoreReports,
    StoreCustomers,

    CustomerDashboard,
    CustomerBooking,
    CustomerProfile,
    CustomerHistory,

    NotFound,
}

impl AppRoute {
    /// Every routable path, in declaration order. `NotFound` is the fallback
    /// and has no path of its own.
    pub const ALL: [Self; 19] = [
        Self::Index,
        Self::StoreLogin,
        Self::CustomerLogin,
        Self::Dashboard,
        Self::Settings,
        Self::Plans,
        Self::Stores,
        Self::Users,
        Self::StoreAdmin,
        Self::StoreSettings,
        Self::StoreProfessionals,
        Self::StoreServices,
        Self::StoreSchedule,
        Self::StoreReports,
        Self::StoreCustomers,
        Self::CustomerDashboard,
        Self::CustomerBooking,
        Self::CustomerProfile,
        Self::CustomerHistory,
    ];

    /// Single path segment as used by the router (`""` for the index).
    #[must_use]
    pub fn segment(self) -> &'static str {
        match self {
            Self::Index | Self::NotFound => "",
            Self::StoreLogin => "store-login",
            Self::CustomerLogin => "customer-login",
            Self::Dashboard => "dashboard",
            Self::Settings => "settings",
            Self::Plans => "plans",
            Self::Stores => "stores",
            Self::Users => "users",
            Self::StoreAdmin => "store-admin",
            Self::StoreSettings => "store-settings",
            Self::StoreProfessionals => "store-professionals",
            Self::StoreServices => "store-services",
            Self::StoreSchedule => "store-schedule",
            Self::StoreReports => "store-reports",
            Self::StoreCustomers => "store-customers",
            Self::CustomerDashboard => "customer-dashboard",
            Self::CustomerBooking => "customer-booking",
            Self::CustomerProfile => "customer-profile",
            Self::CustomerHistory => "customer-history",
        }
    }

    /// Absolute path for links and navigation.
    #[must_use]
    pub fn path(self) -> String {
        format!("/{}", self.segment())
    }

    #[must_use]
    pub fn group(self) -> RouteGroup {
        match self {
            Self::Index | Self::StoreLogin | Self::CustomerLogin | Self::NotFound => RouteGroup::Public,
            Self::Dashboard | Self::Settings | Self::Plans | Self::Stores | Self::Users => RouteGroup::Admin,
            Self::StoreAdmin
            | Self::StoreSettings
            | Self::StoreProfessionals
            | Self::StoreServices
            | Self::StoreSchedule
            | Self::StoreReports
            | Self::StoreCustomers => RouteGroup::Store,
            Self::CustomerDashboard | Self::CustomerBooking | Self::CustomerProfile | Self::CustomerHistory => {
                RouteGroup::Customer
            }
        }
    }

    /// Resolve a browser path. Trailing slashes are ignored; anything not in
    /// the table is `NotFound`.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let segment = path.trim_start_matches('/').trim_end_matches('/');
        Self::ALL
            .into_iter()
            .find(|route| route.segment() == segment)
            .unwrap_or(Self::NotFound)
    }

    /// Screen title shown in the page header.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Index => "Agenda",
            Self::StoreLogin => "Acesso da loja",
            Self::CustomerLogin => "Acesso do cliente",
            Self::Dashboard => "Painel",
            Self::Settings => "Configurações",
            Self::Plans => "Planos",
            Self::Stores => "Lojas",
            Self::Users => "Usuários",
            Self::StoreAdmin => "Painel da loja",
            Self::StoreSettings => "Configurações da loja",
            Self::StoreProfessionals => "Profissionais",
            Self::StoreServices => "Serviços",
            Self::StoreSchedule => "Agenda da loja",
            Self::StoreReports => "Relatórios",
            Self::StoreCustomers => "Clientes",
            Self::CustomerDashboard => "Minha área",
            Self::CustomerBooking => "Agendar",
            Self::CustomerProfile => "Meu perfil",
            Self::CustomerHistory => "Histórico",
            Self::NotFound => "Página não encontrada",
        }
    }
}
