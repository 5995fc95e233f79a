//! Patient self-registration form.

use crate::api::RegisterRequest;
use crate::router::Route;
use crate::views::ViewContext;

pub const REGISTRATION_FAILED: &str = "Registration failed";

pub struct RegisterView {
    ctx: ViewContext,
    pub username: String,
    pub email: String,
    pub password: String,
    pub error: Option<String>,
}

impl RegisterView {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            username: String::new(),
            email: String::new(),
            password: String::new(),
            error: None,
        }
    }

    /// Submit the form. On success the user is sent to the login page.
    pub fn submit(&mut self) -> Option<Route> {
        self.error = None;
        if [&self.username, &self.email, &self.password]
            .iter()
            .any(|field| field.is_empty())
        {
            self.error = Some("All fields are required".to_string());
            return None;
        }

        let request = RegisterRequest {
            username: self.username.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
        };
        match self.ctx.api.register(&request) {
            Ok(_) => {
                tracing::info!(username = %self.username, "Registered patient account");
                Some(Route::Login)
            }
            Err(e) => {
                self.error = Some(e.message_or(REGISTRATION_FAILED));
                None
            }
        }
    }
}
