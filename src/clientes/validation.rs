//! Form rules checked before anything is sent to the backend.

use std::sync::OnceLock;

use regex::Regex;

use super::model::ClienteInput;
use crate::error::{AdminError, Result};

const CPF_PATTERN: &str = r"^\d{3}\.\d{3}\.\d{3}-\d{2}$";
const CEP_PATTERN: &str = r"^\d{5}-\d{3}$";

const NOME_MIN_CHARS: usize = 3;
const ENDERECO_MIN_CHARS: usize = 5;

static CPF_REGEX: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();
static CEP_REGEX: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();

fn matches(
    cell: &'static OnceLock<std::result::Result<Regex, regex::Error>>,
    pattern: &str,
    value: &str,
) -> Result<bool> {
    match cell.get_or_init(|| Regex::new(pattern)) {
        Ok(regex) => Ok(regex.is_match(value)),
        Err(err) => Err(AdminError::Configuration(format!(
            "invalid pattern {pattern}: {err}"
        ))),
    }
}

fn invalid(field: &str, message: &str) -> AdminError {
    AdminError::Validation {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn min_chars(field: &str, value: &str, min: usize, message: &str) -> Result<()> {
    if value.chars().count() < min {
        return Err(invalid(field, message));
    }
    Ok(())
}

pub fn validate_nome(nome: &str) -> Result<()> {
    min_chars("nome", nome, NOME_MIN_CHARS, "Nome deve ter pelo menos 3 caracteres")
}

pub fn validate_endereco(endereco: &str) -> Result<()> {
    min_chars(
        "endereco",
        endereco,
        ENDERECO_MIN_CHARS,
        "Endereço deve ter pelo menos 5 caracteres",
    )
}

/// CPF in `XXX.XXX.XXX-XX` form. Check digits are not verified.
pub fn validate_cpf(cpf: &str) -> Result<()> {
    if !matches(&CPF_REGEX, CPF_PATTERN, cpf)? {
        return Err(invalid("cpf", "CPF deve estar no formato XXX.XXX.XXX-XX"));
    }
    Ok(())
}

/// CEP in `XXXXX-XXX` form.
pub fn validate_cep(cep: &str) -> Result<()> {
    if !matches(&CEP_REGEX, CEP_PATTERN, cep)? {
        return Err(invalid("cep", "CEP deve estar no formato XXXXX-XXX"));
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<()> {
    min_chars("username", username, 1, "Username é obrigatório")
}

/// Validate every field of a create/update payload, stopping at the first failure.
pub fn validate_cliente(input: &ClienteInput) -> Result<()> {
    validate_nome(&input.nome)?;
    validate_cpf(&input.cpf)?;
    validate_endereco(&input.endereco)
}
