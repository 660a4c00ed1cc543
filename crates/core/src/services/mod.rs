//! Business logic services.

#![allow(missing_docs)]

pub mod catalog;
pub mod voting;

pub use catalog::{CatalogMovie, CatalogPage, CatalogService};
pub use voting::{AddOutcome, NewCandidate, VOTE_THRESHOLD, VoteOutcome, VotingService};
