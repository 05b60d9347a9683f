//! Declarative tables: column specs in, rendered cells out.

mod cell;
mod column;
mod render;
mod text;

pub use cell::{ActionButton, Cell};
pub use column::{CellRenderer, ColumnKind, ColumnSpec, Variant};
pub use render::{
    HeaderCell, RenderOptions, RenderedGrid, RenderedRow, RowClassFn, RowId, SelectCallback,
    TabularRenderer, DEFAULT_LOADING_TEXT, DEFAULT_PLACEHOLDER,
};
pub use text::render_text;
