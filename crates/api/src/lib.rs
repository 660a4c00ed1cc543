//! HTTP API layer for cinevote.
//!
//! This crate provides the REST API and real-time streaming:
//!
//! - **Endpoints**: ballot, winner ledger, catalog search, instance meta
//! - **Streaming**: WebSocket fan-out of ballot state changes
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod response;
pub mod state;
pub mod streaming;

pub use endpoints::router;
pub use state::AppState;
pub use streaming::{BallotEvent, Broadcaster, streaming_handler};
