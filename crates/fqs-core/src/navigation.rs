//! Routes of the console and the guard in front of them.

use std::fmt;
use std::sync::Mutex;

use crate::session::SessionStore;

/// Screens reachable in the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Complaints,
    Commendations,
    Requests,
    Persons,
    /// Public satisfaction-rating board
    Ratings,
    /// OAuth redirect target
    AuthCallback,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
            Self::Complaints => "/dashboard/quejas",
            Self::Commendations => "/dashboard/felicitaciones",
            Self::Requests => "/dashboard/solicitudes",
            Self::Persons => "/dashboard/personas",
            Self::Ratings => "/calificacion",
            Self::AuthCallback => "/auth/callback",
        }
    }

    /// Resolve a path; the root and unknown paths land on the login screen.
    pub fn from_path(path: &str) -> Self {
        let path = path.split(&['?', '#'][..]).next().unwrap_or("");
        let path = path.trim_end_matches('/');
        match path {
            "/dashboard" => Self::Dashboard,
            "/dashboard/quejas" => Self::Complaints,
            "/dashboard/felicitaciones" => Self::Commendations,
            "/dashboard/solicitudes" => Self::Requests,
            "/dashboard/personas" => Self::Persons,
            "/calificacion" => Self::Ratings,
            "/auth/callback" => Self::AuthCallback,
            _ => Self::Login,
        }
    }

    /// Whether the route requires a session.
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Self::Dashboard | Self::Complaints | Self::Commendations | Self::Requests | Self::Persons
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Where a navigation to `route` actually lands.
///
/// Protected screens without a token go to login; the login screen with a
/// token goes to the dashboard.
pub fn guard(route: Route, session: &dyn SessionStore) -> Route {
    let signed_in = session.is_authenticated();
    match route {
        r if r.is_protected() && !signed_in => Route::Login,
        Route::Login if signed_in => Route::Dashboard,
        r => r,
    }
}

/// Receiver of forced navigations (e.g., after the session expires).
pub trait Navigator: Send + Sync {
    fn redirect(&self, route: Route);
}

/// Navigator that remembers the latest redirect.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    last: Mutex<Option<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_redirect(&self) -> Option<Route> {
        self.last.lock().ok().and_then(|r| *r)
    }

    /// Take and reset the latest redirect.
    pub fn take_redirect(&self) -> Option<Route> {
        self.last.lock().ok().and_then(|mut r| r.take())
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, route: Route) {
        tracing::info!(%route, "Navigating");
        if let Ok(mut last) = self.last.lock() {
            *last = Some(route);
        }
    }
}
