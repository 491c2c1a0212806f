use crate::error::AppError;
use crate::models::SchemaResponse;
use crate::state::AppState;
use axum::{extract::State, Json};

pub async fn get_schema(State(state): State<AppState>) -> Result<Json<SchemaResponse>, AppError> {
    let schema_id = state.schema.schema_id().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to compute schema ID");
        AppError::SchemaUnavailable(e.to_string())
    })?;

    Ok(Json(SchemaResponse { schema_id }))
}
