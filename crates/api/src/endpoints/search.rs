//! Catalog search endpoints.

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use cinevote_common::AppResult;
use cinevote_core::CatalogPage;
use serde::Deserialize;

use crate::{response::ApiResponse, state::AppState};

/// Search request parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub query: String,
    #[serde(default = "default_page")]
    pub page: u32,
}

const fn default_page() -> u32 {
    1
}

/// Search the external catalog for movies.
async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<ApiResponse<CatalogPage>> {
    let page = state
        .catalog_service
        .search(&params.query, params.page)
        .await?;

    Ok(ApiResponse::ok(page))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(search_movies))
}
