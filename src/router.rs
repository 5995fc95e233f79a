//! Client-side route table with role guards.
//!
//! Five views behind five paths, plus `/` redirecting to `/login`. Role
//! routes are guarded: no session goes to `/login`, a session of another
//! role goes to that role's own dashboard. The backend still enforces
//! authorization on every request.

use crate::models::Role;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Admin,
    Doctor,
    Patient,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Admin => "/admin",
            Route::Doctor => "/doctor",
            Route::Patient => "/patient",
        }
    }

    /// Role a session must hold to render this route.
    pub fn required_role(self) -> Option<Role> {
        match self {
            Route::Admin => Some(Role::Admin),
            Route::Doctor => Some(Role::Doctor),
            Route::Patient => Some(Role::Patient),
            Route::Login | Route::Register => None,
        }
    }

    /// Dashboard a role lands on after login.
    pub fn home_for(role: Role) -> Route {
        match role {
            Role::Admin => Route::Admin,
            Role::Doctor => Route::Doctor,
            Role::Patient => Route::Patient,
        }
    }
}

/// Why a navigation did not render the requested path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// `/` always forwards to `/login`.
    Root,
    NotFound,
    NotSignedIn,
    WrongRole,
}

/// Outcome of resolving a path against the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect { to: Route, reason: RedirectReason },
}

impl Navigation {
    /// Route that ends up on screen.
    pub fn target(self) -> Route {
        match self {
            Navigation::Render(route) => route,
            Navigation::Redirect { to, .. } => to,
        }
    }
}

/// Flat path → route table.
pub struct Router {
    routes: Vec<(&'static str, Route)>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        let routes = [Route::Login, Route::Register, Route::Admin, Route::Doctor, Route::Patient]
            .into_iter()
            .map(|route| (route.path(), route))
            .collect();
        Self { routes }
    }

    /// Canonical form of a location: hash prefix, query string and trailing
    /// slashes removed, always starting with `/`.
    pub fn normalize(path: &str) -> String {
        let path = path.trim();
        let path = path.strip_prefix('#').unwrap_or(path);
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_matches('/');
        format!("/{trimmed}")
    }

    pub fn lookup(&self, path: &str) -> Option<Route> {
        let path = Self::normalize(path);
        self.routes
            .iter()
            .find(|(candidate, _)| *candidate == path)
            .map(|(_, route)| *route)
    }

    /// Resolve `path` for `session`, applying the root redirect and guards.
    pub fn resolve(&self, path: &str, session: &Session) -> Navigation {
        if Self::normalize(path) == "/" {
            return Navigation::Redirect {
                to: Route::Login,
                reason: RedirectReason::Root,
            };
        }

        let Some(route) = self.lookup(path) else {
            tracing::debug!(path, "Unknown route");
            return Navigation::Redirect {
                to: Route::Login,
                reason: RedirectReason::NotFound,
            };
        };

        let Some(required) = route.required_role() else {
            return Navigation::Render(route);
        };

        match session.active_role() {
            Some(role) if role == required => Navigation::Render(route),
            Some(role) => {
                tracing::info!(path, %role, "Route guard redirected to own dashboard");
                Navigation::Redirect {
                    to: Route::home_for(role),
                    reason: RedirectReason::WrongRole,
                }
            }
            None => Navigation::Redirect {
                to: Route::Login,
                reason: RedirectReason::NotSignedIn,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_for(role: Role) -> Session {
        Session {
            token: Some("t".into()),
            role: Some(role),
            username: Some("u".into()),
        }
    }

    #[test]
    fn root_redirects_to_login() {
        let router = Router::new();
        assert_eq!(
            router.resolve("/", &Session::default()),
            Navigation::Redirect {
                to: Route::Login,
                reason: RedirectReason::Root
            }
        );
        assert_eq!(router.resolve("#/", &session_for(Role::Admin)).target(), Route::Login);
    }

    #[test]
    fn public_routes_render_without_session() {
        let router = Router::new();
        assert_eq!(router.resolve("/login", &Session::default()), Navigation::Render(Route::Login));
        assert_eq!(
            router.resolve("/register", &Session::default()),
            Navigation::Render(Route::Register)
        );
    }

    #[test]
    fn role_route_without_session_goes_to_login() {
        let router = Router::new();
        for path in ["/admin", "/doctor", "/patient"] {
            assert_eq!(
                router.resolve(path, &Session::default()),
                Navigation::Redirect {
                    to: Route::Login,
                    reason: RedirectReason::NotSignedIn
                },
                "{path}"
            );
        }
    }

    #[test]
    fn role_without_token_is_not_signed_in() {
        let router = Router::new();
        let stale = Session {
            token: None,
            role: Some(Role::Admin),
            username: None,
        };
        assert_eq!(router.resolve("/admin", &stale).target(), Route::Login);
    }

    #[test]
    fn wrong_role_goes_to_own_dashboard() {
        let router = Router::new();
        assert_eq!(
            router.resolve("/doctor", &session_for(Role::Patient)),
            Navigation::Redirect {
                to: Route::Patient,
                reason: RedirectReason::WrongRole
            }
        );
        assert_eq!(router.resolve("/admin", &session_for(Role::Doctor)).target(), Route::Doctor);
    }

    #[test]
    fn matching_role_renders() {
        let router = Router::new();
        for role in Role::ALL {
            let home = Route::home_for(*role);
            assert_eq!(router.resolve(home.path(), &session_for(*role)), Navigation::Render(home));
        }
    }

    #[test]
    fn hash_and_trailing_slash_normalized() {
        assert_eq!(Router::normalize("#/admin/"), "/admin");
        assert_eq!(Router::normalize("patient"), "/patient");
        assert_eq!(Router::normalize("/doctor?tab=upcoming"), "/doctor");
        assert_eq!(Router::normalize(""), "/");
        assert_eq!(Router::new().lookup("#/register"), Some(Route::Register));
    }

    #[test]
    fn unknown_path_goes_to_login() {
        let router = Router::new();
        assert_eq!(
            router.resolve("/settings", &session_for(Role::Admin)),
            Navigation::Redirect {
                to: Route::Login,
                reason: RedirectReason::NotFound
            }
        );
    }
}
