//! Customer records: models, REST operations, form rules and table columns.

mod api;
pub mod columns;
mod model;
pub mod validation;

pub use api::ClientesApi;
pub use columns::cliente_columns;
pub use model::{Cliente, ClienteInput};
