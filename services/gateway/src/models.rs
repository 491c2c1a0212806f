use serde::Serialize;
use types::ids::{SchemaId, TxHash};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaResponse {
    pub schema_id: SchemaId,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResponse {
    pub success: bool,
    pub tx_hash: TxHash,
}
