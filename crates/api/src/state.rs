//! Shared application state.

use cinevote_core::{CatalogService, VotingService};

use crate::streaming::Broadcaster;

/// Application state.
///
/// Constructed once at the service root; the broadcaster instance lives here
/// and is injected into every call site through the state, never registered
/// globally.
#[derive(Clone)]
pub struct AppState {
    /// Voting engine.
    pub voting_service: VotingService,
    /// External catalog client.
    pub catalog_service: CatalogService,
    /// Fan-out broadcaster for connected clients.
    pub broadcaster: Broadcaster,
}
