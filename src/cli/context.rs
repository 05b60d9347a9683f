//! Per-invocation wiring of config, credential store and session clients.

use std::sync::{Arc, Mutex};

use crate::auth::{AuthService, CredentialStore};
use crate::cep::CepClient;
use crate::clientes::ClientesApi;
use crate::config::AdminConfig;
use crate::error::Result;
use crate::session::{SessionEvent, SessionHttpClient, SessionListener};

/// Clients wired to one file-backed session, plus the session-ended flag the
/// binary checks after each command.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: AdminConfig,
    pub session: SessionHttpClient,
    ended: Arc<Mutex<Option<String>>>,
}

impl Context {
    pub fn new(config: AdminConfig) -> Result<Self> {
        let store: Arc<dyn CredentialStore> = Arc::new(config.credential_store());
        Self::with_store(config, store)
    }

    pub fn with_store(config: AdminConfig, store: Arc<dyn CredentialStore>) -> Result<Self> {
        let ended = Arc::new(Mutex::new(None));
        let slot = ended.clone();
        let listener: SessionListener = Arc::new(move |event: SessionEvent| {
            if let SessionEvent::Ended { reason } = event {
                if let Ok(mut ended) = slot.lock() {
                    *ended = Some(reason);
                }
            }
        });
        let session = SessionHttpClient::with_listener(config.clone(), store, Some(listener))?;
        Ok(Self {
            config,
            session,
            ended,
        })
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.session.clone())
    }

    pub fn clientes(&self) -> ClientesApi {
        ClientesApi::new(self.session.clone())
    }

    pub fn cep(&self) -> CepClient {
        CepClient::from_config(&self.config)
    }

    /// Reason the session ended during this run, if it did.
    pub fn session_ended(&self) -> Option<String> {
        self.ended.lock().ok().and_then(|ended| ended.clone())
    }
}
