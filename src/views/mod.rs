//! Screen-level state machines behind each route.
//!
//! A view owns its local state, issues API calls through the shared
//! [`ApiClient`], and replaces its lists wholesale on every refresh. Modal
//! feedback (`alert`/`confirm`) goes through the injected [`Dialogs`].

pub mod admin;
pub mod doctor;
pub mod login;
pub mod patient;
pub mod register;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub use admin::{AdminDashboard, AdminTab};
pub use doctor::{DoctorDashboard, DoctorTab};
pub use login::LoginView;
pub use patient::{PatientDashboard, PatientTab};
pub use register::RegisterView;

use crate::api::{ApiClient, ApiError};

/// Blocking user prompts.
pub trait Dialogs: Send + Sync {
    fn alert(&self, message: &str);
    /// `true` when the user accepts.
    fn confirm(&self, message: &str) -> bool;
}

/// Dependencies every view is built from.
#[derive(Clone)]
pub struct ViewContext {
    pub api: Arc<ApiClient>,
    pub dialogs: Arc<dyn Dialogs>,
}

impl ViewContext {
    pub fn new(api: Arc<ApiClient>, dialogs: Arc<dyn Dialogs>) -> Self {
        Self { api, dialogs }
    }
}

/// Log a failed background fetch and keep whatever was shown before.
pub(crate) fn fetch_or_keep<T>(what: &str, target: &mut T, result: Result<T, ApiError>) {
    match result {
        Ok(value) => *target = value,
        Err(e) => tracing::warn!(what, error = %e, "Background fetch failed"),
    }
}

// ═══════════════════════════════════════════════════════════
// Scripted dialogs
// ═══════════════════════════════════════════════════════════

/// Non-interactive [`Dialogs`]: records every prompt and answers confirms
/// from a script.
///
/// Confirms pop scripted answers in order; once the script runs out the
/// default answer is used.
#[derive(Default)]
pub struct ScriptedDialogs {
    alerts: Mutex<Vec<String>>,
    confirms: Mutex<Vec<String>>,
    answers: Mutex<VecDeque<bool>>,
    default_answer: bool,
}

impl ScriptedDialogs {
    /// Declines every confirm unless scripted otherwise.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts every confirm unless scripted otherwise.
    pub fn accepting() -> Self {
        Self {
            default_answer: true,
            ..Self::default()
        }
    }

    pub fn answer(self, accept: bool) -> Self {
        if let Ok(mut answers) = self.answers.lock() {
            answers.push_back(accept);
        }
        self
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().map(|a| a.clone()).unwrap_or_default()
    }

    pub fn last_alert(&self) -> Option<String> {
        self.alerts.lock().ok().and_then(|a| a.last().cloned())
    }

    pub fn confirms(&self) -> Vec<String> {
        self.confirms.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl Dialogs for ScriptedDialogs {
    fn alert(&self, message: &str) {
        tracing::debug!(message, "alert");
        if let Ok(mut alerts) = self.alerts.lock() {
            alerts.push(message.to_string());
        }
    }

    fn confirm(&self, message: &str) -> bool {
        if let Ok(mut confirms) = self.confirms.lock() {
            confirms.push(message.to_string());
        }
        self.answers
            .lock()
            .ok()
            .and_then(|mut answers| answers.pop_front())
            .unwrap_or(self.default_answer)
    }
}
