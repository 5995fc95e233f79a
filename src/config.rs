use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "ClinicPortal";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backend used when `CLINIC_API_URL` is unset (Flask dev server default).
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// File holding the persisted session keys inside the data directory.
pub const SESSION_FILE: &str = "session.json";

const ENV_API_URL: &str = "CLINIC_API_URL";
const ENV_DATA_DIR: &str = "CLINIC_DATA_DIR";
const ENV_TIMEOUT: &str = "CLINIC_REQUEST_TIMEOUT_SECS";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "info,clinic_portal=debug"
}

/// Get the application data directory
/// ~/ClinicPortal/ on all platforms; falls back to the working directory
/// when no home directory can be resolved.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be an http(s) URL, got {value:?}")]
    InvalidUrl { var: &'static str, value: String },
    #[error("{var} must be a positive number of seconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },
}

/// Runtime configuration for the portal client.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL of the REST backend, without trailing slash.
    pub api_base_url: String,
    /// Where the session file lives.
    pub data_dir: PathBuf,
    /// Per-request timeout. `None` means requests may wait indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            data_dir: app_data_dir(),
            request_timeout: None,
        }
    }
}

impl AppConfig {
    /// Build a config from process environment, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            let url = url.trim().trim_end_matches('/').to_string();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl {
                    var: ENV_API_URL,
                    value: url,
                });
            }
            config.api_base_url = url;
        }

        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup(ENV_TIMEOUT).filter(|v| !v.trim().is_empty()) {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidTimeout {
                var: ENV_TIMEOUT,
                value: raw.clone(),
            })?;
            if secs == 0 {
                return Err(ConfigError::InvalidTimeout {
                    var: ENV_TIMEOUT,
                    value: raw,
                });
            }
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn app_data_dir_ends_with_app_name() {
        let dir = app_data_dir();
        assert!(dir.ends_with("ClinicPortal"));
    }

    #[test]
    fn defaults_when_environment_empty() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn api_url_trailing_slash_trimmed() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("CLINIC_API_URL", "https://clinic.test/")]))
                .unwrap();
        assert_eq!(config.api_base_url, "https://clinic.test");
    }

    #[test]
    fn api_url_without_scheme_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("CLINIC_API_URL", "clinic.test")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn timeout_parsed_as_seconds() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("CLINIC_REQUEST_TIMEOUT_SECS", "30")])).unwrap();
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn zero_or_garbage_timeout_rejected() {
        for raw in ["0", "soon"] {
            let err =
                AppConfig::from_lookup(lookup_from(&[("CLINIC_REQUEST_TIMEOUT_SECS", raw)]))
                    .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidTimeout { .. }), "{raw}");
        }
    }

    #[test]
    fn data_dir_override_moves_session_path() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("CLINIC_DATA_DIR", "/tmp/clinic")])).unwrap();
        assert_eq!(config.session_path(), PathBuf::from("/tmp/clinic/session.json"));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
