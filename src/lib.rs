//! Client side of a clinic appointment portal.
//!
//! Admins manage doctors and patients, doctors run their schedule and
//! publish availability, patients find a doctor and book. All state lives in
//! the REST backend; this crate holds only the session and the view state.

pub mod api;
pub mod config;
pub mod models;
pub mod router;
pub mod session;
pub mod shell;
pub mod views;

pub use api::{ApiClient, ApiError};
pub use config::AppConfig;
pub use router::{Navigation, Route, Router};
pub use session::{Session, SessionEvent, SessionStore};
pub use shell::{ActiveView, App, NavState, ShellError};
pub use views::{Dialogs, ScriptedDialogs, ViewContext};

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise [`config::default_log_filter`]
/// applies. Calling this twice is harmless.
pub fn init_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
    }
}
