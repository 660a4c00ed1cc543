//! Database repositories.

mod ballot;
mod winner;

pub use ballot::{BallotRepository, VoteApplied};
pub use winner::WinnerRepository;
