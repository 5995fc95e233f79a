//! Sign-in form.

use crate::api::LoginRequest;
use crate::router::Route;
use crate::views::ViewContext;

pub const LOGIN_FAILED: &str = "Login failed";

pub struct LoginView {
    ctx: ViewContext,
    pub username: String,
    pub password: String,
    /// Inline error under the form.
    pub error: Option<String>,
}

impl LoginView {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            username: String::new(),
            password: String::new(),
            error: None,
        }
    }

    /// Submit the form. Returns the dashboard to navigate to on success.
    ///
    /// The session is only written after the backend accepts the
    /// credentials.
    pub fn submit(&mut self) -> Option<Route> {
        self.error = None;
        if self.username.is_empty() || self.password.is_empty() {
            self.error = Some("Username and password are required".to_string());
            return None;
        }

        let request = LoginRequest {
            username: self.username.clone(),
            password: self.password.clone(),
        };
        let response = match self.ctx.api.login(&request) {
            Ok(response) => response,
            Err(e) => {
                tracing::info!(username = %self.username, error = %e, "Login rejected");
                self.error = Some(e.message_or(LOGIN_FAILED));
                return None;
            }
        };

        if let Err(e) = self.ctx.api.session().set_session(
            &response.access_token,
            response.role,
            &response.username,
        ) {
            tracing::error!(error = %e, "Failed to persist session");
            self.error = Some(LOGIN_FAILED.to_string());
            return None;
        }

        tracing::info!(username = %response.username, role = %response.role, "Signed in");
        self.password.clear();
        Some(Route::home_for(response.role))
    }
}
