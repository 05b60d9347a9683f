use crate::table::{ActionButton, Cell, ColumnSpec, Variant};

use super::model::Cliente;

pub const EDIT_ACTION: &str = "edit";
pub const DELETE_ACTION: &str = "delete";

/// Columns of the customer listing: three text columns and the edit/delete buttons.
pub fn cliente_columns() -> Vec<ColumnSpec<Cliente>> {
    vec![
        ColumnSpec::plain("nome", "Nome"),
        ColumnSpec::plain("cpf", "CPF"),
        ColumnSpec::plain("endereco", "Endereço"),
        ColumnSpec::action("id", "Ações", |_cliente: &Cliente| {
            Cell::Actions(vec![
                ActionButton::new(EDIT_ACTION, "Editar", Variant::Default),
                ActionButton::new(DELETE_ACTION, "Excluir", Variant::Destructive),
            ])
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{RenderOptions, RenderedGrid, TabularRenderer};
    use pretty_assertions::assert_eq;

    fn sample() -> Cliente {
        Cliente {
            id: 7,
            nome: "Ana Souza".into(),
            cpf: "123.456.789-00".into(),
            endereco: "Rua das Flores, 10".into(),
        }
    }

    #[test]
    fn renders_text_columns_and_action_buttons() {
        let grid = TabularRenderer::new().render(
            &cliente_columns(),
            &[sample()],
            &RenderOptions::default(),
        );
        let RenderedGrid::Table { headers, rows } = grid else {
            panic!("expected a table");
        };

        let labels: Vec<&str> = headers.iter().map(|h| h.label.as_str()).collect();
        assert_eq!(labels, vec!["Nome", "CPF", "Endereço", "Ações"]);
        assert_eq!(rows[0].cells[0], Cell::text("Ana Souza"));
        assert_eq!(rows[0].cells[2], Cell::text("Rua das Flores, 10"));
        match &rows[0].cells[3] {
            Cell::Actions(buttons) => {
                let actions: Vec<&str> = buttons.iter().map(|b| b.action.as_str()).collect();
                assert_eq!(actions, vec![EDIT_ACTION, DELETE_ACTION]);
                assert_eq!(buttons[1].variant, Variant::Destructive);
            }
            other => panic!("expected action buttons, got {other:?}"),
        }
    }
}
