use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, Json};
use types::leaderboard::LeaderboardSnapshot;

pub async fn get_leaderboard(
    State(state): State<AppState>,
) -> Result<Json<LeaderboardSnapshot>, AppError> {
    let wallet = state
        .publisher_wallet
        .as_deref()
        .ok_or_else(|| AppError::Misconfigured("PUBLISHER_WALLET not configured".into()))?;

    let snapshot = state
        .leaderboard
        .snapshot(wallet)
        .await
        .map_err(|e| AppError::Provider(e.to_string()))?;

    Ok(Json(snapshot))
}
