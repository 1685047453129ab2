//! Application routes and the role-filtered navigation menu

use agendify_core::Role;
use std::fmt;

/// A location in the console
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    ClientLogin,
    Register,
    Appointments,
    Clients,
    Logs,
    Profile,
    /// Any path the console does not know; treated as private
    Other(String),
}

impl Route {
    /// Where anonymous users are sent
    pub const PUBLIC_ENTRY: Route = Route::Login;

    /// Where users land after signing in
    pub const LANDING: Route = Route::Appointments;

    pub fn path(&self) -> &str {
        match self {
            Self::Login => "/login",
            Self::ClientLogin => "/clientLogin",
            Self::Register => "/cadastro",
            Self::Appointments => "/dashboard/agendamentos",
            Self::Clients => "/dashboard/clientes",
            Self::Logs => "/dashboard/logs",
            Self::Profile => "/dashboard/perfil",
            Self::Other(path) => path,
        }
    }

    pub fn from_path(path: &str) -> Self {
        let trimmed = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        match trimmed {
            "/login" => Self::Login,
            "/clientLogin" => Self::ClientLogin,
            "/cadastro" => Self::Register,
            "/dashboard/agendamentos" => Self::Appointments,
            "/dashboard/clientes" => Self::Clients,
            "/dashboard/logs" => Self::Logs,
            "/dashboard/perfil" => Self::Profile,
            other => Self::Other(other.to_string()),
        }
    }

    /// Reachable without a session
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Login | Self::ClientLogin | Self::Register)
    }

    /// Whether `role` may open this route
    ///
    /// Routes listed in the menu are limited to the roles the menu shows
    /// them to, except the account page which every signed-in user can open.
    pub fn allows(&self, role: Role) -> bool {
        match self {
            Self::Profile => true,
            route => MENU
                .iter()
                .find(|item| &item.route == route)
                .is_none_or(|item| item.roles.contains(&role)),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Sidebar entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub route: Route,
    pub roles: &'static [Role],
}

pub static MENU: [MenuItem; 4] = [
    MenuItem {
        label: "Appointments",
        route: Route::Appointments,
        roles: &[Role::Admin, Role::Customer],
    },
    MenuItem {
        label: "Clients",
        route: Route::Clients,
        roles: &[Role::Admin],
    },
    MenuItem {
        label: "Logs",
        route: Route::Logs,
        roles: &[Role::Admin, Role::Customer],
    },
    MenuItem {
        label: "My account",
        route: Route::Profile,
        roles: &[Role::Customer],
    },
];

/// Menu entries shown to `role`
pub fn menu_for(role: Role) -> Vec<&'static MenuItem> {
    MENU.iter().filter(|item| item.roles.contains(&role)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_roundtrip() {
        for route in [
            Route::Login,
            Route::ClientLogin,
            Route::Register,
            Route::Appointments,
            Route::Clients,
            Route::Logs,
            Route::Profile,
        ] {
            assert_eq!(Route::from_path(route.path()), route);
        }
        assert_eq!(Route::from_path("/login/"), Route::Login);
        assert_eq!(Route::from_path("/"), Route::Other("/".into()));
    }

    #[test]
    fn test_public_set() {
        assert!(Route::Login.is_public());
        assert!(Route::ClientLogin.is_public());
        assert!(Route::Register.is_public());
        assert!(!Route::Appointments.is_public());
        assert!(!Route::Other("/dashboard/unknown".into()).is_public());
    }

    #[test]
    fn test_menu_for_roles() {
        let admin: Vec<_> = menu_for(Role::Admin).iter().map(|i| i.label).collect();
        assert_eq!(admin, vec!["Appointments", "Clients", "Logs"]);

        let customer: Vec<_> = menu_for(Role::Customer).iter().map(|i| i.label).collect();
        assert_eq!(customer, vec!["Appointments", "Logs", "My account"]);
    }

    #[test]
    fn test_route_permissions() {
        assert!(Route::Clients.allows(Role::Admin));
        assert!(!Route::Clients.allows(Role::Customer));
        assert!(Route::Profile.allows(Role::Admin));
        assert!(Route::Other("/dashboard/unknown".into()).allows(Role::Customer));
    }
}
