//! CLI handlers for `cliente-admin clientes ...`.

use crate::cep::format_endereco;
use crate::clientes::validation::validate_cep;
use crate::clientes::{cliente_columns, Cliente, ClienteInput};
use crate::table::{render_text, ColumnSpec, RenderOptions, TabularRenderer};

use super::auth::prompt;
use super::{ClienteFields, CommandResult, Context};

const EMPTY_LISTING: &str = "Nenhum cliente cadastrado";

fn listing(clientes: &[Cliente]) -> String {
    let mut columns = vec![ColumnSpec::plain("id", "ID")];
    columns.extend(cliente_columns());
    let options = RenderOptions::builder().placeholder(EMPTY_LISTING).build();
    render_text(&TabularRenderer::new().render(&columns, clientes, &options))
}

/// Handle `cliente-admin clientes list`.
pub async fn handle_list(context: &Context) -> CommandResult {
    let clientes = context
        .clientes()
        .list()
        .await
        .map_err(|e| format!("Erro ao carregar clientes: {e}"))?;
    println!("{}", listing(&clientes));
    Ok(())
}

/// Handle `cliente-admin clientes show <id>`.
pub async fn handle_show(context: &Context, id: i64) -> CommandResult {
    let cliente = context
        .clientes()
        .get(id)
        .await
        .map_err(|e| format!("Erro ao carregar cliente: {e}"))?;
    println!("{}", listing(&[cliente]));
    Ok(())
}

/// Handle `cliente-admin clientes create`.
pub async fn handle_create(context: &Context, fields: ClienteFields) -> CommandResult {
    let endereco = resolve_endereco(context, fields.endereco, fields.cep.as_deref()).await?;
    let input = ClienteInput::new(
        fields.nome.unwrap_or_default(),
        fields.cpf.unwrap_or_default(),
        endereco.unwrap_or_default(),
    );
    let cliente = context
        .clientes()
        .create(&input)
        .await
        .map_err(|e| format!("Erro ao cadastrar cliente: {e}"))?;
    println!("✅ Cliente cadastrado com sucesso! (id {})", cliente.id);
    Ok(())
}

/// Handle `cliente-admin clientes update <id>`. Omitted fields keep their
/// current values.
pub async fn handle_update(context: &Context, id: i64, fields: ClienteFields) -> CommandResult {
    let api = context.clientes();
    let current = api
        .get(id)
        .await
        .map_err(|e| format!("Erro ao carregar cliente: {e}"))?;

    let mut input = ClienteInput::from(&current);
    if let Some(nome) = fields.nome {
        input.nome = nome;
    }
    if let Some(cpf) = fields.cpf {
        input.cpf = cpf;
    }
    if let Some(endereco) = resolve_endereco(context, fields.endereco, fields.cep.as_deref()).await? {
        input.endereco = endereco;
    }

    api.update(id, &input)
        .await
        .map_err(|e| format!("Erro ao atualizar cliente: {e}"))?;
    println!("✅ Cliente atualizado com sucesso!");
    Ok(())
}

/// Handle `cliente-admin clientes delete <id>`.
pub async fn handle_delete(context: &Context, id: i64, yes: bool) -> CommandResult {
    if !yes {
        let answer = prompt("Tem certeza que deseja deletar este cliente? [s/N] ")?;
        if !matches!(answer.trim().to_lowercase().as_str(), "s" | "sim" | "y" | "yes") {
            println!("Cancelado.");
            return Ok(());
        }
    }

    context
        .clientes()
        .delete(id)
        .await
        .map_err(|e| format!("Erro ao deletar cliente: {e}"))?;
    println!("✅ Cliente deletado com sucesso!");
    Ok(())
}

/// Explicit address wins; otherwise a postal code is looked up and formatted.
async fn resolve_endereco(
    context: &Context,
    endereco: Option<String>,
    cep: Option<&str>,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    if endereco.is_some() {
        return Ok(endereco);
    }
    let Some(cep) = cep else {
        return Ok(None);
    };
    validate_cep(cep)?;
    match context.cep().lookup(cep).await {
        Ok(Some(data)) => {
            let endereco = format_endereco(&data);
            println!("📍 {endereco}");
            Ok(Some(endereco))
        }
        Ok(None) => Err("CEP não encontrado".into()),
        Err(e) => Err(format!("Erro ao buscar CEP: {e}").into()),
    }
}
