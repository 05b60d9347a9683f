use serde::{Deserialize, Serialize};

/// A customer record as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cliente {
    pub id: i64,
    pub nome: String,
    pub cpf: String,
    pub endereco: String,
}

/// Create/update payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClienteInput {
    pub nome: String,
    pub cpf: String,
    pub endereco: String,
}

impl ClienteInput {
    pub fn new(
        nome: impl Into<String>,
        cpf: impl Into<String>,
        endereco: impl Into<String>,
    ) -> Self {
        Self {
            nome: nome.into(),
            cpf: cpf.into(),
            endereco: endereco.into(),
        }
    }
}

impl From<&Cliente> for ClienteInput {
    fn from(cliente: &Cliente) -> Self {
        Self::new(&cliente.nome, &cliente.cpf, &cliente.endereco)
    }
}
