//! API endpoints.

mod ballot;
mod meta;
mod search;
mod winners;

use axum::Router;

use crate::state::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/ballot", ballot::router())
        .nest("/winners", winners::router())
        .nest("/search", search::router())
        .nest("/meta", meta::router())
}
