//! Terminal rendering of a [`RenderedGrid`].

use tabled::builder::Builder;
use tabled::settings::Style;

use super::render::RenderedGrid;

const ORDERABLE_MARK: &str = " ↕";
const SELECTED_MARK: &str = "▶";

/// Draw a grid as a boxed text table, or the bare message for loading and
/// empty states.
pub fn render_text(grid: &RenderedGrid) -> String {
    let (headers, rows) = match grid {
        RenderedGrid::Loading { message } | RenderedGrid::Empty { message } => {
            return message.clone();
        }
        RenderedGrid::Table { headers, rows } => (headers, rows),
    };

    let marker_column = rows.iter().any(|row| row.interactive);
    let mut builder = Builder::default();

    let mut header_record: Vec<String> = Vec::with_capacity(headers.len() + 1);
    if marker_column {
        header_record.push(String::new());
    }
    header_record.extend(headers.iter().map(|header| {
        if header.orderable {
            format!("{}{ORDERABLE_MARK}", header.label)
        } else {
            header.label.clone()
        }
    }));
    builder.push_record(header_record);

    for row in rows {
        let mut record: Vec<String> = Vec::with_capacity(row.cells.len() + 1);
        if marker_column {
            record.push(if row.selected {
                SELECTED_MARK.to_string()
            } else {
                String::new()
            });
        }
        record.extend(row.cells.iter().map(|cell| cell.to_plain_text()));
        builder.push_record(record);
    }

    builder.build().with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{ColumnSpec, RenderOptions, RowId, SelectCallback, TabularRenderer};
    use serde_json::{json, Value};
    use std::sync::Arc;

    #[test]
    fn placeholder_states_render_their_message() {
        assert_eq!(
            render_text(&RenderedGrid::Empty {
                message: "Nenhum cliente".into()
            }),
            "Nenhum cliente"
        );
        assert_eq!(
            render_text(&RenderedGrid::Loading {
                message: "Carregando...".into()
            }),
            "Carregando..."
        );
    }

    #[test]
    fn table_includes_headers_cells_and_orderable_mark() {
        let columns = vec![
            ColumnSpec::<Value>::plain("nome", "Nome").orderable(),
            ColumnSpec::badge("status", "Status"),
        ];
        let rows = vec![json!({ "nome": "Ana Souza", "status": "ativo" })];
        let grid = TabularRenderer::new().render(&columns, &rows, &RenderOptions::default());

        let text = render_text(&grid);
        assert!(text.contains("Nome ↕"));
        assert!(text.contains("Status"));
        assert!(text.contains("Ana Souza"));
        assert!(text.contains("[ativo]"));
        assert!(!text.contains(SELECTED_MARK));
    }

    #[test]
    fn selected_row_is_marked() {
        let columns = vec![ColumnSpec::<Value>::plain("nome", "Nome")];
        let rows = vec![json!({ "nome": "Ana" }), json!({ "nome": "Bruno" })];
        let noop: SelectCallback<Value> = Arc::new(|_: Option<&Value>| {});
        let options = RenderOptions::builder().on_select(noop).build();
        let mut renderer = TabularRenderer::new();
        renderer.click_row(&rows, RowId(1), &options);

        let text = render_text(&renderer.render(&columns, &rows, &options));
        let marked: Vec<&str> = text.lines().filter(|line| line.contains(SELECTED_MARK)).collect();
        assert_eq!(marked.len(), 1);
        assert!(marked[0].contains("Bruno"));
    }
}
