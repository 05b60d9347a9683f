use tracing::debug;

use super::model::{Cliente, ClienteInput};
use super::validation::validate_cliente;
use crate::error::Result;
use crate::session::{ApiRequest, SessionHttpClient};

const CLIENTES_PATH: &str = "clientes";

/// CRUD operations on `/clientes`, issued through the session client.
///
/// Payloads are validated locally before any request goes out.
#[derive(Debug, Clone)]
pub struct ClientesApi {
    session: SessionHttpClient,
}

impl ClientesApi {
    pub fn new(session: SessionHttpClient) -> Self {
        Self { session }
    }

    pub async fn list(&self) -> Result<Vec<Cliente>> {
        let response = self.session.request(ApiRequest::get(CLIENTES_PATH)).await?;
        let clientes: Vec<Cliente> = response.json()?;
        debug!(count = clientes.len(), "listed clientes");
        Ok(clientes)
    }

    pub async fn get(&self, id: i64) -> Result<Cliente> {
        self.session
            .request(ApiRequest::get(item_path(id)))
            .await?
            .json()
    }

    pub async fn create(&self, input: &ClienteInput) -> Result<Cliente> {
        validate_cliente(input)?;
        let request = ApiRequest::post(CLIENTES_PATH).json(input)?;
        self.session.request(request).await?.json()
    }

    pub async fn update(&self, id: i64, input: &ClienteInput) -> Result<Cliente> {
        validate_cliente(input)?;
        let request = ApiRequest::put(item_path(id)).json(input)?;
        self.session.request(request).await?.json()
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.session.request(ApiRequest::delete(item_path(id))).await?;
        Ok(())
    }
}

fn item_path(id: i64) -> String {
    format!("{CLIENTES_PATH}/{id}")
}
