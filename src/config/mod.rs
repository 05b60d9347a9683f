//! Configuration (layered: code > env > defaults).

use std::path::PathBuf;
use std::time::Duration;

use crate::auth::FileCredentialStore;
use crate::error::AdminError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_CEP_BASE_URL: &str = "https://viacep.com.br/ws";

const ENV_BASE_URL: &str = "CLIENTE_ADMIN_BASE_URL";
const ENV_HOME: &str = "CLIENTE_ADMIN_HOME";
const ENV_TIMEOUT_SECS: &str = "CLIENTE_ADMIN_TIMEOUT_SECS";
const ENV_CEP_BASE_URL: &str = "CLIENTE_ADMIN_CEP_URL";

/// Settings shared by the session client, the auth service and the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    /// Backend root, e.g. `http://localhost:8080/api`.
    pub base_url: String,
    /// Directory holding persisted credentials.
    pub credentials_dir: PathBuf,
    /// Timeout for resource calls. The refresh call always uses the transport default.
    pub request_timeout: Option<Duration>,
    /// Postal-code lookup service root.
    pub cep_base_url: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials_dir: default_credentials_dir(),
            request_timeout: None,
            cep_base_url: DEFAULT_CEP_BASE_URL.to_string(),
        }
    }
}

impl AdminConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load overrides from the environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, AdminError> {
        let _ = dotenvy::dotenv();
        let mut config = Self::default();

        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            config.base_url = url;
        }
        if let Ok(home) = std::env::var(ENV_HOME) {
            config.credentials_dir = PathBuf::from(home);
        }
        if let Ok(url) = std::env::var(ENV_CEP_BASE_URL) {
            config.cep_base_url = url;
        }
        if let Ok(raw) = std::env::var(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                AdminError::Configuration(format!("{ENV_TIMEOUT_SECS} must be whole seconds, got {raw:?}"))
            })?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_credentials_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.credentials_dir = dir.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_cep_base_url(mut self, url: impl Into<String>) -> Self {
        self.cep_base_url = url.into();
        self
    }

    pub fn validate(&self) -> Result<(), AdminError> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AdminError::Configuration(format!(
                "base URL must start with http:// or https://, got {:?}",
                self.base_url
            )));
        }
        Ok(())
    }

    /// Absolute URL for a path below the backend root.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// The file-backed credential store for this backend origin.
    pub fn credential_store(&self) -> FileCredentialStore {
        FileCredentialStore::new(self.credentials_dir.clone(), &self.base_url)
    }
}

fn default_credentials_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".cliente-admin"))
        .unwrap_or_else(|| PathBuf::from(".cliente-admin"))
}
