use std::sync::Arc;

use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::credentials::CredentialPair;
use super::error::AuthError;
use super::store::CredentialStore;
use crate::clientes::validation::validate_username;
use crate::error::{AdminError, Result};
use crate::session::{error_message, ApiRequest, SessionHttpClient};

const LOGIN_PATH: &str = "auth/login";
const LOGOUT_PATH: &str = "auth/logout";
const LOGOUT_ALL_PATH: &str = "auth/logout-all";

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    senha: &'a str,
}

#[derive(Serialize)]
struct LogoutRequest<'a> {
    #[serde(rename = "refreshToken")]
    refresh_token: &'a str,
}

/// Login and logout against the backend's `/auth` endpoints.
///
/// Login and single-session logout go out on a plain client: a rejected login
/// must not trigger credential refresh. `logout_all` is an authenticated call
/// and goes through the session client.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use cliente_admin::auth::{AuthService, MemoryCredentialStore};
/// use cliente_admin::config::AdminConfig;
/// use cliente_admin::session::SessionHttpClient;
///
/// # async fn example() -> cliente_admin::error::Result<()> {
/// let session = SessionHttpClient::new(AdminConfig::default(), Arc::new(MemoryCredentialStore::new()))?;
/// let auth = AuthService::new(session);
/// auth.login("admin", "secret").await?;
/// assert!(auth.is_authenticated());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AuthService {
    session: SessionHttpClient,
    http: reqwest::Client,
}

impl AuthService {
    pub fn new(session: SessionHttpClient) -> Self {
        Self {
            session,
            http: reqwest::Client::new(),
        }
    }

    fn store(&self) -> &Arc<dyn CredentialStore> {
        self.session.store()
    }

    /// Exchange username and password for a credential pair and store it.
    ///
    /// Any failure clears previously stored credentials.
    pub async fn login(&self, username: &str, senha: &str) -> Result<CredentialPair> {
        validate_username(username)?;
        match self.request_login(username, senha).await {
            Ok(pair) => {
                self.store().set(&pair.access_token, &pair.refresh_token)?;
                info!(username, "logged in");
                Ok(pair)
            }
            Err(err) => {
                if let Err(clear_err) = self.store().clear() {
                    warn!(error = %clear_err, "could not clear credentials after failed login");
                }
                Err(err)
            }
        }
    }

    async fn request_login(&self, username: &str, senha: &str) -> Result<CredentialPair> {
        let response = self
            .http
            .post(self.session.config().endpoint(LOGIN_PATH))
            .json(&LoginRequest { username, senha })
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AuthError::InvalidCredentials.into());
        }
        if !status.is_success() {
            return Err(AdminError::api(status.as_u16(), error_message(status, &body)));
        }
        serde_json::from_str(&body)
            .map_err(|err| AuthError::InvalidResponse(err.to_string()).into())
    }

    /// Revoke the stored refresh credential on the server, then clear local
    /// credentials.
    ///
    /// Server-side revocation is best effort: local credentials are cleared
    /// even when the backend cannot be reached.
    pub async fn logout(&self) -> Result<()> {
        match self.store().get_refresh() {
            Ok(Some(refresh_token)) => self.revoke(&refresh_token).await,
            Ok(None) => debug!("no refresh credential to revoke"),
            Err(err) => warn!(error = %err, "could not read refresh credential"),
        }
        self.store().clear()?;
        info!("logged out");
        Ok(())
    }

    async fn revoke(&self, refresh_token: &str) {
        let result = self
            .http
            .post(self.session.config().endpoint(LOGOUT_PATH))
            .json(&LogoutRequest { refresh_token })
            .send()
            .await;
        match result {
            Ok(response) if response.status().is_success() => {
                debug!("refresh credential revoked");
            }
            Ok(response) => {
                warn!(status = response.status().as_u16(), "server did not revoke refresh credential");
            }
            Err(err) => warn!(error = %err, "could not reach server to revoke refresh credential"),
        }
    }

    /// Revoke every session of the current user, then clear local credentials.
    pub async fn logout_all(&self) -> Result<()> {
        self.session
            .request(ApiRequest::post(LOGOUT_ALL_PATH))
            .await?;
        self.store().clear()?;
        info!("logged out of all sessions");
        Ok(())
    }

    /// Whether an access credential is stored. Says nothing about its validity.
    pub fn is_authenticated(&self) -> bool {
        self.store().is_present()
    }

    /// Stored credential pair, if any.
    pub fn status(&self) -> Result<Option<CredentialPair>> {
        Ok(self.store().load()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryCredentialStore;
    use crate::config::AdminConfig;

    fn service(store: Arc<MemoryCredentialStore>) -> AuthService {
        let session = SessionHttpClient::new(AdminConfig::default(), store).unwrap();
        AuthService::new(session)
    }

    #[test]
    fn is_authenticated_follows_store() {
        let store = Arc::new(MemoryCredentialStore::new());
        let auth = service(store.clone());
        assert!(!auth.is_authenticated());
        store.set("a", "r").unwrap();
        assert!(auth.is_authenticated());
        assert_eq!(auth.status().unwrap(), Some(CredentialPair::new("a", "r")));
    }

    #[tokio::test]
    async fn login_rejects_empty_username_without_request() {
        let auth = service(Arc::new(MemoryCredentialStore::new()));
        let err = auth.login("", "secret").await.unwrap_err();
        assert!(matches!(err, AdminError::Validation { .. }));
    }
}
