//! Column-kind dispatch, row selection and loading/empty states.

use std::fmt;
use std::sync::Arc;

use bon::Builder;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::cell::{value_to_text, Cell};
use super::column::{CellRenderer, ColumnKind, ColumnSpec, Variant};

pub const DEFAULT_PLACEHOLDER: &str = "Nothing here yet...";
pub const DEFAULT_LOADING_TEXT: &str = "Loading...";

const SELECTED_CLASS: &str = "selected";
const INTERACTIVE_CLASS: &str = "interactive";

static NULL: Value = Value::Null;

const TOP_ALIASES: &[&str] = &["top", "primary", "label"];
const BOTTOM_ALIASES: &[&str] = &["bottom", "secondary", "subLabel"];

/// Extra CSS-style classes for a row.
pub type RowClassFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;
/// Receives the newly selected row, or `None` when the selection is cleared.
pub type SelectCallback<T> = Arc<dyn Fn(Option<&T>) + Send + Sync>;

/// Per-render options.
#[derive(Builder)]
pub struct RenderOptions<T> {
    #[builder(default)]
    pub loading: bool,
    pub row_class: Option<RowClassFn<T>>,
    /// Rows are clickable only when this is set.
    pub on_select: Option<SelectCallback<T>>,
    #[builder(into, default = String::from(DEFAULT_PLACEHOLDER))]
    pub placeholder: String,
    #[builder(into, default = String::from(DEFAULT_LOADING_TEXT))]
    pub loading_text: String,
}

impl<T> Default for RenderOptions<T> {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl<T> fmt::Debug for RenderOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderOptions")
            .field("loading", &self.loading)
            .field("row_class", &self.row_class.is_some())
            .field("on_select", &self.on_select.is_some())
            .field("placeholder", &self.placeholder)
            .field("loading_text", &self.loading_text)
            .finish()
    }
}

/// Row identity: its position in the input sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
    pub orderable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    pub id: RowId,
    pub cells: Vec<Cell>,
    /// Space-separated classes: caller classes, then `selected`, then `interactive`.
    pub class_name: String,
    pub selected: bool,
    pub interactive: bool,
}

/// Output of [`TabularRenderer::render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedGrid {
    Loading { message: String },
    Empty { message: String },
    Table {
        headers: Vec<HeaderCell>,
        rows: Vec<RenderedRow>,
    },
}

/// Renders rows of `T` through a list of [`ColumnSpec`]s and tracks the
/// single selected row.
///
/// Rows are read through their `Serialize` form; the renderer never mutates
/// them.
#[derive(Debug, Clone, Default)]
pub struct TabularRenderer {
    selected: Option<RowId>,
}

/// Per-column cell logic, resolved once per render.
enum CellFormatter<'a, T> {
    Custom(&'a CellRenderer<T>),
    Plain,
    Badge(Variant),
    Nested(Option<&'a [String]>),
}

impl TabularRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<RowId> {
        self.selected
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn render<T: Serialize>(
        &self,
        columns: &[ColumnSpec<T>],
        rows: &[T],
        options: &RenderOptions<T>,
    ) -> RenderedGrid {
        if options.loading {
            return RenderedGrid::Loading {
                message: options.loading_text.clone(),
            };
        }
        if rows.is_empty() {
            return RenderedGrid::Empty {
                message: options.placeholder.clone(),
            };
        }

        let formatters: Vec<CellFormatter<'_, T>> = columns.iter().map(formatter_for).collect();
        let interactive = options.on_select.is_some();

        let headers = columns
            .iter()
            .map(|column| HeaderCell {
                key: column.key.clone(),
                label: column.label.clone(),
                orderable: column.orderable,
            })
            .collect();

        let rows = rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let id = RowId(index);
                let value = serde_json::to_value(row).unwrap_or_else(|err| {
                    debug!(row = index, error = %err, "row is not serializable; rendering empty cells");
                    Value::Null
                });
                let cells = columns
                    .iter()
                    .zip(&formatters)
                    .map(|(column, formatter)| format_cell(formatter, row, field(&value, &column.key)))
                    .collect();
                let selected = self.selected == Some(id);
                RenderedRow {
                    id,
                    cells,
                    class_name: row_classes(options, row, selected, interactive),
                    selected,
                    interactive,
                }
            })
            .collect();

        RenderedGrid::Table { headers, rows }
    }

    /// Toggle selection of `id` and notify `on_select`.
    ///
    /// Clicking the selected row clears the selection; clicking another row
    /// selects it. Returns `false` without changing anything when rows are not
    /// interactive or `id` is out of range.
    pub fn click_row<T>(&mut self, rows: &[T], id: RowId, options: &RenderOptions<T>) -> bool {
        let Some(on_select) = options.on_select.as_ref() else {
            return false;
        };
        let Some(row) = rows.get(id.0) else {
            return false;
        };

        if self.selected == Some(id) {
            self.selected = None;
            on_select(None);
        } else {
            self.selected = Some(id);
            on_select(Some(row));
        }
        true
    }
}

fn formatter_for<T>(column: &ColumnSpec<T>) -> CellFormatter<'_, T> {
    if let Some(custom) = column.renderer.as_ref() {
        return CellFormatter::Custom(custom);
    }
    match &column.kind {
        ColumnKind::Plain => CellFormatter::Plain,
        ColumnKind::NestedObject { keys } => CellFormatter::Nested(keys.as_deref()),
        ColumnKind::Badge { variant } => CellFormatter::Badge(variant.unwrap_or_default()),
        ColumnKind::Action(render) => CellFormatter::Custom(render),
    }
}

fn format_cell<T>(formatter: &CellFormatter<'_, T>, row: &T, value: &Value) -> Cell {
    match formatter {
        CellFormatter::Custom(render) => render(row),
        CellFormatter::Plain => Cell::Text(value_to_text(value)),
        CellFormatter::Badge(variant) => Cell::Badge {
            text: value_to_text(value),
            variant: *variant,
        },
        CellFormatter::Nested(keys) => nested_lines(value, *keys),
    }
}

/// Look up `key` in a serialized row; dotted keys descend into objects.
fn field<'v>(row: &'v Value, key: &str) -> &'v Value {
    if let Some(value) = row.get(key) {
        return value;
    }
    key.split('.')
        .try_fold(row, |current, segment| current.get(segment))
        .unwrap_or(&NULL)
}

/// Summarize a mapping as two lines.
///
/// Each line takes the first non-null alias present, else the first (or
/// second) remaining value in field order. Non-objects degrade to plain text.
fn nested_lines(value: &Value, keys: Option<&[String]>) -> Cell {
    let Value::Object(map) = value else {
        return Cell::Text(value_to_text(value));
    };
    let projected = project(map, keys);
    Cell::Lines {
        top: value_to_text(pick(&projected, TOP_ALIASES, 0)),
        bottom: value_to_text(pick(&projected, BOTTOM_ALIASES, 1)),
    }
}

fn project<'m>(map: &'m Map<String, Value>, keys: Option<&[String]>) -> Vec<(&'m str, &'m Value)> {
    map.iter()
        .filter(|(key, _)| keys.map_or(true, |allowed| allowed.iter().any(|k| k == *key)))
        .map(|(key, value)| (key.as_str(), value))
        .collect()
}

fn pick<'m>(projected: &[(&str, &'m Value)], aliases: &[&str], fallback: usize) -> &'m Value {
    aliases
        .iter()
        .find_map(|alias| {
            projected
                .iter()
                .find(|(key, value)| key == alias && !value.is_null())
                .map(|(_, value)| *value)
        })
        .or_else(|| projected.get(fallback).map(|(_, value)| *value))
        .unwrap_or(&NULL)
}

fn row_classes<T>(options: &RenderOptions<T>, row: &T, selected: bool, interactive: bool) -> String {
    let mut classes: Vec<String> = Vec::new();
    if let Some(row_class) = options.row_class.as_ref() {
        let custom = row_class(row);
        if !custom.trim().is_empty() {
            classes.push(custom.trim().to_string());
        }
    }
    if selected {
        classes.push(SELECTED_CLASS.to_string());
    }
    if interactive {
        classes.push(INTERACTIVE_CLASS.to_string());
    }
    classes.join(" ")
}
