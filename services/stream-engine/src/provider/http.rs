//! HTTP client for the stream bridge
//!
//! The bridge is a sidecar that owns the ledger connection and signing. This
//! client speaks plain JSON to it:
//!
//! | operation        | request                                          |
//! |------------------|--------------------------------------------------|
//! | compute id       | `POST /schemas/compute`                          |
//! | register         | `POST /schemas/register` (signed)                |
//! | write            | `POST /streams/set` (signed)                     |
//! | read             | `GET /streams/{schemaId}/publishers/{publisher}` |
//! | confirmation     | `GET /transactions/{hash}/receipt`               |
//!
//! Signed requests carry the configured credential as a bearer token. Error
//! responses are expected as `{"error": .., "message": ..}`.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use types::errors::ProviderError;
use types::field::RawFieldSet;
use types::ids::{SchemaId, TxHash};

use super::{DataItem, SchemaDefinition, StreamProvider};

#[derive(Serialize)]
struct ComputeRequest<'a> {
    schema: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComputeResponse {
    schema_id: SchemaId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest<'a> {
    schemas: &'a [SchemaDefinition],
    ignore_registered: bool,
}

#[derive(Serialize)]
struct SetRequest<'a> {
    items: &'a [DataItem],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TxResponse {
    #[serde(default)]
    tx_hash: Option<TxHash>,
}

#[derive(Deserialize)]
struct ReceiptResponse {
    status: String,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// [`StreamProvider`] backed by the stream bridge HTTP API.
#[derive(Clone)]
pub struct HttpStreamProvider {
    client: Client,
    base_url: String,
    credential: Option<String>,
}

impl HttpStreamProvider {
    pub fn new(base_url: impl Into<String>, credential: Option<String>) -> Self {
        Self::with_client(Client::new(), base_url, credential)
    }

    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        credential: Option<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            credential,
        }
    }

    /// Whether write operations can be signed.
    pub fn can_write(&self) -> bool {
        self.credential.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn signed(&self, request: RequestBuilder) -> Result<RequestBuilder, ProviderError> {
        match &self.credential {
            Some(credential) => Ok(request.bearer_auth(credential)),
            None => Err(ProviderError::MissingCredential),
        }
    }

    async fn send<R: DeserializeOwned>(request: RequestBuilder) -> Result<R, ProviderError> {
        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        Self::read_response(response).await
    }

    async fn read_response<R: DeserializeOwned>(response: Response) -> Result<R, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
            let message = body
                .message
                .or(body.error)
                .unwrap_or_else(|| format!("stream bridge returned {}", status));
            return Err(ProviderError::Rejected {
                status: Some(status.as_u16()),
                message,
            });
        }

        response
            .json::<R>()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl StreamProvider for HttpStreamProvider {
    async fn compute_schema_id(&self, schema: &str) -> Result<SchemaId, ProviderError> {
        let request = self
            .client
            .post(self.url("/schemas/compute"))
            .json(&ComputeRequest { schema });
        let response: ComputeResponse = Self::send(request).await?;
        Ok(response.schema_id)
    }

    async fn register_data_schemas(
        &self,
        schemas: &[SchemaDefinition],
        ignore_registered: bool,
    ) -> Result<Option<TxHash>, ProviderError> {
        let request = self.signed(self.client.post(self.url("/schemas/register")))?.json(
            &RegisterRequest {
                schemas,
                ignore_registered,
            },
        );
        let response: TxResponse = Self::send(request).await?;
        Ok(response.tx_hash)
    }

    async fn set(&self, items: &[DataItem]) -> Result<TxHash, ProviderError> {
        let request = self
            .signed(self.client.post(self.url("/streams/set")))?
            .json(&SetRequest { items });
        let response: TxResponse = Self::send(request).await?;
        response
            .tx_hash
            .ok_or_else(|| ProviderError::MalformedResponse("missing txHash".to_string()))
    }

    async fn get_all_publisher_data_for_schema(
        &self,
        schema_id: &SchemaId,
        publisher: &str,
    ) -> Result<Vec<RawFieldSet>, ProviderError> {
        let path = format!("/streams/{}/publishers/{}", schema_id, publisher);
        let data: Option<Vec<RawFieldSet>> = Self::send(self.client.get(self.url(&path))).await?;
        let data = data.unwrap_or_default();
        debug!(schema_id = %schema_id, publisher, items = data.len(), "Fetched publisher data");
        Ok(data)
    }

    async fn wait_for_confirmation(&self, tx: &TxHash) -> Result<(), ProviderError> {
        let path = format!("/transactions/{}/receipt", tx);
        let receipt: ReceiptResponse = Self::send(self.client.get(self.url(&path))).await?;
        if receipt.status.eq_ignore_ascii_case("reverted") {
            return Err(ProviderError::rejected(format!("transaction {} reverted", tx)));
        }
        Ok(())
    }
}
