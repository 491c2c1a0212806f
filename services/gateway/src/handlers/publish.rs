use crate::error::AppError;
use crate::models::PublishResponse;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use stream_engine::publish::PublishRequest;

pub async fn publish_score(
    State(state): State<AppState>,
    payload: Result<Json<PublishRequest>, JsonRejection>,
) -> Result<Json<PublishResponse>, AppError> {
    // A body that is not declared as JSON carries no fields at all.
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(JsonRejection::MissingJsonContentType(_)) => PublishRequest::default(),
        Err(rejection) => return Err(AppError::BadRequest(rejection.body_text())),
    };

    let publisher = state
        .publisher
        .as_ref()
        .ok_or_else(|| AppError::Misconfigured("PRIVATE_KEY not configured".into()))?;

    let published = publisher.publish(&payload).await?;

    Ok(Json(PublishResponse {
        success: true,
        tx_hash: published.tx_hash,
    }))
}
