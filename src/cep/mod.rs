//! Brazilian postal-code (CEP) lookup through ViaCEP.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::AdminConfig;
use crate::error::Result;

const CEP_DIGITS: usize = 8;

/// Address returned for a postal code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CepData {
    pub cep: String,
    #[serde(default)]
    pub logradouro: String,
    #[serde(default)]
    pub complemento: String,
    #[serde(default)]
    pub bairro: String,
    #[serde(default)]
    pub localidade: String,
    #[serde(default)]
    pub uf: String,
}

#[derive(Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    erro: Option<Value>,
    #[serde(flatten)]
    data: Value,
}

/// ViaCEP client.
#[derive(Debug, Clone)]
pub struct CepClient {
    http: reqwest::Client,
    base_url: String,
}

impl CepClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &AdminConfig) -> Self {
        Self::new(config.cep_base_url.clone())
    }

    /// Look up `cep`, with or without punctuation.
    ///
    /// Returns `Ok(None)` when the code does not have 8 digits, the service
    /// answers non-2xx, or the code is unknown. Transport failures are errors.
    pub async fn lookup(&self, cep: &str) -> Result<Option<CepData>> {
        let digits = digits_only(cep);
        if digits.len() != CEP_DIGITS {
            return Ok(None);
        }

        let url = format!("{}/{digits}/json/", self.base_url.trim_end_matches('/'));
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            debug!(status = response.status().as_u16(), cep = %digits, "cep lookup failed");
            return Ok(None);
        }

        let body: ViaCepResponse = response.json().await?;
        if body.erro.as_ref().is_some_and(is_truthy) {
            debug!(cep = %digits, "cep not found");
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(body.data)?))
    }
}

// ViaCEP has answered with both `true` and `"true"`.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(text) => text == "true",
        _ => false,
    }
}

fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Mask a partial or full CEP as `XXXXX-XXX`, dropping non-digits.
pub fn format_cep(cep: &str) -> String {
    let digits = digits_only(cep);
    if digits.len() <= 5 {
        return digits;
    }
    let end = digits.len().min(CEP_DIGITS);
    format!("{}-{}", &digits[..5], &digits[5..end])
}

/// Single-line address suitable for the `endereco` field.
pub fn format_endereco(data: &CepData) -> String {
    format!(
        "{}, {}, {} - {}",
        data.logradouro, data.bairro, data.localidade, data.uf
    )
}
