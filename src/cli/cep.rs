//! CLI handler for `cliente-admin cep <code>`.

use crate::cep::{format_cep, format_endereco};

use super::{CommandResult, Context};

pub async fn handle_lookup(context: &Context, cep: &str) -> CommandResult {
    match context.cep().lookup(cep).await {
        Ok(Some(data)) => {
            println!("📍 {} → {}", format_cep(&data.cep), format_endereco(&data));
            Ok(())
        }
        Ok(None) => Err(format!("CEP não encontrado: {}", format_cep(cep)).into()),
        Err(e) => Err(format!("Erro ao buscar CEP: {e}").into()),
    }
}
