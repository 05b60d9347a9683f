use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::credentials::CredentialPair;
use super::error::AuthError;

/// Storage abstraction for the persisted credential pair.
///
/// Both credentials are written and cleared together, so callers never observe
/// an access credential without its refresh credential (or the reverse).
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Option<CredentialPair>, AuthError>;
    fn set(&self, access_token: &str, refresh_token: &str) -> Result<(), AuthError>;
    fn clear(&self) -> Result<(), AuthError>;

    /// Current access credential, if any.
    fn get(&self) -> Result<Option<String>, AuthError> {
        Ok(self.load()?.map(|pair| pair.access_token))
    }

    /// Current refresh credential, if any.
    fn get_refresh(&self) -> Result<Option<String>, AuthError> {
        Ok(self.load()?.map(|pair| pair.refresh_token))
    }

    fn is_present(&self) -> bool {
        matches!(self.get(), Ok(Some(_)))
    }
}

/// File-backed credential store using one TOML file per backend origin.
///
/// # Example
/// ```no_run
/// use cliente_admin::auth::{CredentialStore, FileCredentialStore};
///
/// let store = FileCredentialStore::new("/tmp/cliente-admin", "http://localhost:8080/api");
/// store.set("access", "refresh")?;
/// assert!(store.is_present());
/// # Ok::<(), cliente_admin::auth::AuthError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
    origin: String,
}

impl FileCredentialStore {
    pub fn new(base_dir: impl Into<PathBuf>, origin: &str) -> Self {
        let base_dir = base_dir.into();
        Self {
            path: base_dir.join(format!("{}.toml", normalize_origin(origin))),
            origin: origin.to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent(path: &Path) -> Result<(), AuthError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<CredentialPair>, AuthError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(AuthError::Io(err.to_string())),
        };
        let file: CredentialFile = toml::from_str(&raw)?;
        Ok(Some(file.credentials))
    }

    fn set(&self, access_token: &str, refresh_token: &str) -> Result<(), AuthError> {
        Self::ensure_parent(&self.path)?;
        let file = CredentialFile {
            version: 1,
            origin: self.origin.clone(),
            credentials: CredentialPair::new(access_token, refresh_token),
            saved_at: Utc::now(),
        };
        let serialized = toml::to_string(&file)?;
        fs::write(&self.path, serialized)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AuthError::Io(err.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CredentialFile {
    version: u32,
    origin: String,
    credentials: CredentialPair,
    saved_at: DateTime<Utc>,
}

/// Process-local credential store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    pair: Mutex<Option<CredentialPair>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pair(access_token: &str, refresh_token: &str) -> Self {
        Self {
            pair: Mutex::new(Some(CredentialPair::new(access_token, refresh_token))),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<CredentialPair>, AuthError> {
        let guard = self
            .pair
            .lock()
            .map_err(|_| AuthError::Io("credential store lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn set(&self, access_token: &str, refresh_token: &str) -> Result<(), AuthError> {
        let mut guard = self
            .pair
            .lock()
            .map_err(|_| AuthError::Io("credential store lock poisoned".to_string()))?;
        *guard = Some(CredentialPair::new(access_token, refresh_token));
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        let mut guard = self
            .pair
            .lock()
            .map_err(|_| AuthError::Io("credential store lock poisoned".to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Turn a backend origin into a file-name-safe label.
fn normalize_origin(origin: &str) -> String {
    let trimmed = origin
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    let mut out = String::with_capacity(trimmed.len());
    for ch in trimmed.chars() {
        let lower = ch.to_ascii_lowercase();
        if lower.is_ascii_alphanumeric() || lower == '-' {
            out.push(lower);
        } else {
            out.push('-');
        }
    }
    let out = out.trim_matches('-').to_string();
    if out.is_empty() {
        "default".to_string()
    } else {
        out
    }
}
