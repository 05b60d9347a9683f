//! cliente-admin: session-aware client for the Cliente REST backend.
//!
//! Every request goes through [`session::SessionHttpClient`], which attaches
//! the stored access credential and, when the backend answers 401, refreshes
//! the credential pair once for all concurrent callers before replaying their
//! requests. Listings are drawn with [`table::TabularRenderer`].
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use cliente_admin::prelude::*;
//!
//! # async fn example() -> cliente_admin::error::Result<()> {
//! let config = AdminConfig::from_env()?;
//! let store = Arc::new(config.credential_store());
//! let session = SessionHttpClient::new(config, store)?;
//!
//! AuthService::new(session.clone()).login("admin", "secret").await?;
//! let clientes = ClientesApi::new(session).list().await?;
//!
//! let grid = TabularRenderer::new().render(&cliente_columns(), &clientes, &RenderOptions::default());
//! println!("{}", cliente_admin::table::render_text(&grid));
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod cep;
pub mod clientes;
pub mod config;
pub mod error;
pub mod prelude;
pub mod session;
pub mod table;

#[cfg(feature = "cli")]
pub mod cli;
