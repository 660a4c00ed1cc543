//! Instance metadata endpoints.

use axum::{Router, routing::get};
use cinevote_core::VOTE_THRESHOLD;
use serde::Serialize;

use crate::{response::ApiResponse, state::AppState};

/// Instance metadata.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaResponse {
    pub name: String,
    pub version: String,
    pub vote_threshold: i32,
}

/// Get instance metadata.
async fn meta() -> ApiResponse<MetaResponse> {
    ApiResponse::ok(MetaResponse {
        name: "cinevote".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        vote_threshold: VOTE_THRESHOLD,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(meta))
}
