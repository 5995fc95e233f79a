//! Root shell: owns the router, the view on screen and the navigation bar
//! state.
//!
//! Nav state (`is_logged_in`, role, username) is not read from storage on
//! every render; it follows the session store's change events, so a sign-in
//! or sign-out made anywhere is reflected on the next shell call.

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::api::{ApiClient, ApiError};
use crate::config::AppConfig;
use crate::models::Role;
use crate::router::{Navigation, Route, Router};
use crate::session::{Session, SessionError, SessionEvent, SessionStore};
use crate::views::{
    AdminDashboard, Dialogs, DoctorDashboard, LoginView, PatientDashboard, RegisterView,
    ViewContext,
};

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
    #[error("API client error: {0}")]
    Api(#[from] ApiError),
}

/// What the navigation bar shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavState {
    pub is_logged_in: bool,
    pub role: Option<Role>,
    pub username: Option<String>,
}

impl NavState {
    fn from_session(session: &Session) -> Self {
        Self {
            is_logged_in: session.is_logged_in(),
            role: session.active_role(),
            username: session.username.clone().filter(|_| session.is_logged_in()),
        }
    }

    fn apply(&mut self, event: SessionEvent) {
        *self = match event {
            SessionEvent::SignedIn { role, username } => Self {
                is_logged_in: true,
                role: Some(role),
                username: Some(username),
            },
            SessionEvent::SignedOut => Self::default(),
        };
    }
}

/// The view currently on screen.
pub enum ActiveView {
    Login(LoginView),
    Register(RegisterView),
    Admin(Box<AdminDashboard>),
    Doctor(Box<DoctorDashboard>),
    Patient(Box<PatientDashboard>),
}

impl ActiveView {
    pub fn route(&self) -> Route {
        match self {
            ActiveView::Login(_) => Route::Login,
            ActiveView::Register(_) => Route::Register,
            ActiveView::Admin(_) => Route::Admin,
            ActiveView::Doctor(_) => Route::Doctor,
            ActiveView::Patient(_) => Route::Patient,
        }
    }

    /// Build and mount the view for `route`.
    fn open(route: Route, ctx: &ViewContext) -> Self {
        match route {
            Route::Login => ActiveView::Login(LoginView::new(ctx.clone())),
            Route::Register => ActiveView::Register(RegisterView::new(ctx.clone())),
            Route::Admin => {
                let mut view = AdminDashboard::new(ctx.clone());
                view.mount();
                ActiveView::Admin(Box::new(view))
            }
            Route::Doctor => {
                let mut view = DoctorDashboard::new(ctx.clone());
                view.mount();
                ActiveView::Doctor(Box::new(view))
            }
            Route::Patient => {
                let mut view = PatientDashboard::new(ctx.clone());
                view.mount();
                ActiveView::Patient(Box::new(view))
            }
        }
    }
}

pub struct App {
    ctx: ViewContext,
    router: Router,
    events: broadcast::Receiver<SessionEvent>,
    nav: NavState,
    view: ActiveView,
}

impl App {
    /// Shell over an existing client; starts at `/`, which lands on login.
    pub fn new(ctx: ViewContext) -> Self {
        let session = ctx.api.session();
        let events = session.subscribe();
        let nav = NavState::from_session(&session.current());
        let view = ActiveView::Login(LoginView::new(ctx.clone()));
        let mut app = Self {
            ctx,
            router: Router::new(),
            events,
            nav,
            view,
        };
        app.navigate("/");
        app
    }

    /// Wire the file-backed session and HTTP client described by `config`.
    pub fn bootstrap(config: &AppConfig, dialogs: Arc<dyn Dialogs>) -> Result<Self, ShellError> {
        let session = Arc::new(SessionStore::open_file(config.session_path())?);
        let api = Arc::new(ApiClient::from_config(config, session)?);
        tracing::info!(
            api = %config.api_base_url,
            session = %config.session_path().display(),
            "Clinic portal ready"
        );
        Ok(Self::new(ViewContext::new(api, dialogs)))
    }

    pub fn route(&self) -> Route {
        self.view.route()
    }

    pub fn view(&self) -> &ActiveView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ActiveView {
        &mut self.view
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        self.ctx.api.session()
    }

    /// Nav bar state, caught up with any pending session events.
    pub fn nav(&mut self) -> &NavState {
        self.sync_nav();
        &self.nav
    }

    /// Go to `path`, applying guards. Every navigation builds a fresh view,
    /// so dashboards refetch on each visit.
    pub fn navigate(&mut self, path: &str) -> Navigation {
        self.sync_nav();
        let navigation = self.router.resolve(path, &self.session().current());
        let target = navigation.target();
        if let Navigation::Redirect { to, reason } = navigation {
            tracing::debug!(path, to = to.path(), ?reason, "Redirected");
        }
        self.view = ActiveView::open(target, &self.ctx);
        navigation
    }

    /// Submit the login form if it is on screen; on success go to the
    /// signed-in user's dashboard.
    pub fn submit_login(&mut self) -> Option<Route> {
        let ActiveView::Login(view) = &mut self.view else {
            return None;
        };
        let home = view.submit()?;
        Some(self.navigate(home.path()).target())
    }

    /// Submit the registration form if it is on screen; on success go to
    /// login.
    pub fn submit_register(&mut self) -> Option<Route> {
        let ActiveView::Register(view) = &mut self.view else {
            return None;
        };
        let next = view.submit()?;
        Some(self.navigate(next.path()).target())
    }

    /// Drop the session and return to the login page.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.session().clear()?;
        self.navigate(Route::Login.path());
        Ok(())
    }

    fn sync_nav(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(event) => self.nav.apply(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Session events lagged, resyncing");
                    self.nav = NavState::from_session(&self.session().current());
                }
            }
        }
    }
}
