//! Convenience re-exports for common use.

pub use crate::auth::{AuthService, CredentialPair, CredentialStore, FileCredentialStore};
pub use crate::clientes::{cliente_columns, Cliente, ClienteInput, ClientesApi};
pub use crate::config::AdminConfig;
pub use crate::error::{AdminError, Result};
pub use crate::session::{ApiRequest, ApiResponse, SessionEvent, SessionHttpClient};
pub use crate::table::{Cell, ColumnSpec, RenderOptions, RenderedGrid, TabularRenderer};
