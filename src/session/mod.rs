//! Authenticated HTTP session with single-flight credential refresh.

mod client;
pub mod refresh;
mod request;

pub use client::SessionHttpClient;
pub use refresh::RefreshCoordinator;
pub use request::{ApiRequest, ApiResponse};
pub(crate) use request::error_message;

use std::sync::Arc;

/// Session lifecycle notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A new credential pair was obtained and stored.
    Refreshed,
    /// Credentials were cleared; the user has to log in again.
    Ended { reason: String },
}

/// Callback receiving [`SessionEvent`]s.
pub type SessionListener = Arc<dyn Fn(SessionEvent) + Send + Sync>;
