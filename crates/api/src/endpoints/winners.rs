//! Winner ledger endpoints.

use axum::{
    Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use cinevote_common::AppResult;
use tracing::info;

use crate::{
    response::{ApiResponse, ok},
    state::AppState,
    streaming::WinnerPayload,
};

/// List the winner ledger, most recent promotion first.
async fn list_winners(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<WinnerPayload>>> {
    let winners = state.voting_service.list_winners().await?;

    Ok(ApiResponse::ok(
        winners.iter().map(WinnerPayload::from).collect(),
    ))
}

/// Empty the winner ledger.
async fn clear_winners(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let removed = state.voting_service.clear_winners().await?;
    info!(removed, "Winner ledger cleared");

    state.broadcaster.publish_winners_snapshot(Vec::new());

    Ok(ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_winners))
        .route("/clear", post(clear_winners))
}
