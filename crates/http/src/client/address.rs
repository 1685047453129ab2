//! Postal code (CEP) lookup against the public ViaCEP service

use super::error::{ApiErrorBody, ClientError};
use crate::types::Address;
use agendify_core::format::unformat_cep;
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_VIACEP_URL: &str = "https://viacep.com.br/ws";

/// Resolves a CEP to street, neighborhood, city and state
///
/// Unrelated to the Agendify API: no credential is sent and rejections do
/// not touch the session.
#[derive(Clone)]
pub struct AddressLookup {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
    #[serde(default)]
    erro: Option<serde_json::Value>,
}

impl AddressLookup {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn viacep() -> Result<Self, ClientError> {
        Self::new(DEFAULT_VIACEP_URL)
    }

    pub async fn lookup(&self, cep: &str) -> Result<Address, ClientError> {
        let digits = unformat_cep(cep);
        if digits.len() != 8 {
            return Err(ClientError::BadRequest(message("Invalid CEP")));
        }

        let url = format!("{}/{digits}/json/", self.base_url);
        debug!(%url, "looking up address");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            return Err(ClientError::from_status(status, raw));
        }

        let body: ViaCepResponse = serde_json::from_slice(&response.bytes().await?)?;
        // The service answers 200 with `"erro": true` (or `"true"`) for unknown codes
        if body.erro.as_ref().is_some_and(|e| e.as_bool() == Some(true) || e == "true") {
            return Err(ClientError::NotFound(message("CEP not found")));
        }

        Ok(Address {
            address: body.logradouro,
            neighborhood: body.bairro,
            city: body.localidade,
            state: body.uf,
        })
    }
}

fn message(text: &str) -> ApiErrorBody {
    ApiErrorBody {
        message: Some(text.to_string()),
        error: None,
        raw: text.to_string(),
    }
}
