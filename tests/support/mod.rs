#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use cliente_admin::auth::MemoryCredentialStore;
use cliente_admin::config::AdminConfig;
use cliente_admin::session::{SessionEvent, SessionHttpClient, SessionListener};
use wiremock::MockServer;

/// Collects session events for later assertions.
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<SessionEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener(&self) -> SessionListener {
        let events = self.events.clone();
        Arc::new(move |event: SessionEvent| {
            events.lock().expect("event log lock poisoned").push(event);
        })
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().expect("event log lock poisoned").clone()
    }

    pub fn ended_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, SessionEvent::Ended { .. }))
            .count()
    }
}

pub fn config_for(server: &MockServer) -> AdminConfig {
    AdminConfig::new(format!("{}/api", server.uri()))
}

pub fn session_for(
    server: &MockServer,
    store: Arc<MemoryCredentialStore>,
    log: &EventLog,
) -> SessionHttpClient {
    SessionHttpClient::with_listener(config_for(server), store, Some(log.listener()))
        .expect("session client")
}
