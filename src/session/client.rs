use std::sync::Arc;

use serde::Serialize;

use super::refresh::{RefreshCoordinator, Ticket};
use super::request::{error_message, ApiRequest, ApiResponse};
use super::{SessionEvent, SessionListener};
use crate::auth::{CredentialPair, CredentialStore};
use crate::config::AdminConfig;
use crate::error::{AdminError, Result};

const REFRESH_PATH: &str = "auth/refresh";

/// HTTP client that attaches the stored access credential to every request and
/// recovers from an expired one.
///
/// On a 401 the client refreshes the credential pair exactly once, no matter
/// how many requests failed concurrently, then replays each failed request one
/// time with the new access credential. If the refresh cannot happen or is
/// rejected, the stored credentials are cleared and the session listener is
/// told the session ended.
///
/// Cloning is cheap; clones share the credential store and the refresh state.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use cliente_admin::auth::MemoryCredentialStore;
/// use cliente_admin::config::AdminConfig;
/// use cliente_admin::session::{ApiRequest, SessionHttpClient};
///
/// # async fn example() -> cliente_admin::error::Result<()> {
/// let store = Arc::new(MemoryCredentialStore::with_pair("access", "refresh"));
/// let client = SessionHttpClient::new(AdminConfig::default(), store)?;
/// let response = client.request(ApiRequest::get("/clientes")).await?;
/// println!("{}", response.body);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SessionHttpClient {
    inner: Arc<Inner>,
}

struct Inner {
    config: AdminConfig,
    http: reqwest::Client,
    refresh_http: reqwest::Client,
    store: Arc<dyn CredentialStore>,
    refresh: RefreshCoordinator,
    listener: Option<SessionListener>,
}

impl std::fmt::Debug for SessionHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHttpClient")
            .field("base_url", &self.inner.config.base_url)
            .field("refresh", &self.inner.refresh)
            .field("listener", &self.inner.listener.as_ref().map(|_| ".."))
            .finish()
    }
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    #[serde(rename = "refreshToken")]
    refresh_token: &'a str,
}

impl SessionHttpClient {
    pub fn new(config: AdminConfig, store: Arc<dyn CredentialStore>) -> Result<Self> {
        Self::with_listener(config, store, None)
    }

    /// Create a client whose session-ended notifications go to `listener`.
    pub fn with_listener(
        config: AdminConfig,
        store: Arc<dyn CredentialStore>,
        listener: Option<SessionListener>,
    ) -> Result<Self> {
        config.validate()?;
        let mut http = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            http = http.timeout(timeout);
        }
        let http = http.build()?;
        Ok(Self {
            inner: Arc::new(Inner {
                config,
                http,
                refresh_http: reqwest::Client::new(),
                store,
                refresh: RefreshCoordinator::new(),
                listener,
            }),
        })
    }

    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.inner.store
    }

    /// Refresh bookkeeping for this session.
    pub fn refresh_state(&self) -> &RefreshCoordinator {
        &self.inner.refresh
    }

    /// Issue `request`, recovering once from an expired access credential.
    ///
    /// Non-2xx responses come back as [`AdminError::Api`]. A 401 on a request
    /// that was already replayed is returned as is.
    pub async fn request(&self, request: ApiRequest) -> Result<ApiResponse> {
        let token = self.inner.store.get()?;
        match self.send(&request, token.as_deref()).await {
            Err(err) if err.is_unauthorized() && !request.is_replay() => {
                self.recover(request, err).await
            }
            other => other,
        }
    }

    async fn recover(&self, request: ApiRequest, original: AdminError) -> Result<ApiResponse> {
        let guard = match self.inner.refresh.join() {
            Ticket::Follower(waiting) => {
                let token = waiting.await.map_err(|_| {
                    AdminError::InvalidState("credential refresh abandoned".to_string())
                })??;
                return self.replay(request, &token).await;
            }
            Ticket::Leader(guard) => guard,
        };

        let refresh_token = match self.inner.store.get_refresh() {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(error = %err, "could not read refresh credential");
                None
            }
        };
        let Some(refresh_token) = refresh_token else {
            self.end_session("no refresh credential");
            guard.settle(Err(original.clone()));
            return Err(original);
        };

        tracing::info!(path = %request.path, "access credential rejected; refreshing");
        match self.refresh_credentials(&refresh_token).await {
            Ok(pair) => {
                if let Err(err) = self
                    .inner
                    .store
                    .set(&pair.access_token, &pair.refresh_token)
                {
                    tracing::warn!(error = %err, "could not persist refreshed credentials");
                }
                let drained = guard.settle(Ok(pair.access_token.clone()));
                tracing::info!(drained, "credential refresh succeeded");
                self.notify(SessionEvent::Refreshed);
                self.replay(request, &pair.access_token).await
            }
            Err(err) => {
                tracing::warn!(error = %err, "credential refresh failed");
                self.end_session("refresh rejected");
                guard.settle(Err(err.clone()));
                Err(err)
            }
        }
    }

    async fn replay(&self, request: ApiRequest, access_token: &str) -> Result<ApiResponse> {
        let replay = request.into_replay();
        tracing::debug!(method = %replay.method, path = %replay.path, "replaying request");
        self.send(&replay, Some(access_token)).await
    }

    async fn refresh_credentials(&self, refresh_token: &str) -> Result<CredentialPair> {
        let response = self
            .inner
            .refresh_http
            .post(self.inner.config.endpoint(REFRESH_PATH))
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AdminError::api(status.as_u16(), error_message(status, &body)));
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn send(&self, request: &ApiRequest, access_token: Option<&str>) -> Result<ApiResponse> {
        let mut builder = self
            .inner
            .http
            .request(request.method.clone(), self.inner.config.endpoint(&request.path));
        if let Some(token) = access_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status = status.as_u16(),
            replay = request.is_replay(),
            "request finished"
        );
        if status.is_success() {
            Ok(ApiResponse {
                status: status.as_u16(),
                body,
            })
        } else {
            Err(AdminError::api(status.as_u16(), error_message(status, &body)))
        }
    }

    fn end_session(&self, reason: &str) {
        if let Err(err) = self.inner.store.clear() {
            tracing::warn!(error = %err, "could not clear credentials");
        }
        tracing::warn!(reason, "session ended");
        self.notify(SessionEvent::Ended {
            reason: reason.to_string(),
        });
    }

    fn notify(&self, event: SessionEvent) {
        if let Some(listener) = &self.inner.listener {
            listener(event);
        }
    }
}
