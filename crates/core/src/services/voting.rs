//! Voting engine.
//!
//! Owns the ballot rules: candidate admission, vote tallying, and the
//! active-to-winner promotion at the fixed threshold. The persistence layer
//! guarantees the increment-and-promote unit is atomic; this service decides
//! when each transition applies and what the caller gets back.

use chrono::Utc;
use cinevote_common::{AppError, AppResult};
use cinevote_db::{
    entities::{
        candidate::{self, CandidateStatus},
        winner_record,
    },
    repositories::{BallotRepository, WinnerRepository},
};
use sea_orm::Set;

/// Votes required to promote a candidate to the winner ledger.
///
/// A fixed domain rule, not runtime configuration.
pub const VOTE_THRESHOLD: i32 = 10;

/// Input for adding a candidate to the ballot.
#[derive(Debug, Clone)]
pub struct NewCandidate {
    /// Stable identifier from the external catalog.
    pub id: String,
    /// Movie title.
    pub title: String,
    /// Release year as reported by the catalog.
    pub year: String,
    /// Poster URL; the catalog's `"N/A"` marker is accepted here.
    pub poster: String,
}

/// Result of an accepted vote.
#[derive(Debug, Clone)]
pub struct VoteOutcome {
    /// The candidate with the incremented count; already a winner when the
    /// vote promoted it.
    pub candidate: candidate::Model,
    /// The ledger row created by a promotion.
    pub winner: Option<winner_record::Model>,
}

impl VoteOutcome {
    /// Whether this vote crossed the threshold.
    #[must_use]
    pub const fn promoted(&self) -> bool {
        self.winner.is_some()
    }
}

/// Result of an add-candidate request.
#[derive(Debug, Clone)]
pub enum AddOutcome {
    /// A new candidate entered the ballot with zero votes.
    Created(candidate::Model),
    /// The identifier was already on the ballot; the submission counted as
    /// one vote instead.
    Voted(VoteOutcome),
}

/// Voting service for ballot business logic.
#[derive(Clone)]
pub struct VotingService {
    ballot_repo: BallotRepository,
    winner_repo: WinnerRepository,
}

impl VotingService {
    /// Create a new voting service.
    #[must_use]
    pub const fn new(ballot_repo: BallotRepository, winner_repo: WinnerRepository) -> Self {
        Self {
            ballot_repo,
            winner_repo,
        }
    }

    /// Add a candidate to the ballot.
    ///
    /// Re-submitting an identifier that is already on the active ballot counts
    /// as one vote on it. Re-submitting an identifier that already won fails
    /// with a conflict; a movie cannot re-enter the ballot after winning.
    pub async fn add_candidate(&self, input: NewCandidate) -> AppResult<AddOutcome> {
        if input.id.trim().is_empty()
            || input.title.trim().is_empty()
            || input.year.trim().is_empty()
            || input.poster.trim().is_empty()
        {
            return Err(AppError::Validation(
                "id, title, year and poster are all required".to_string(),
            ));
        }

        match self.ballot_repo.find_by_id(&input.id).await? {
            None => {
                let model = candidate::ActiveModel {
                    id: Set(input.id),
                    title: Set(input.title),
                    year: Set(input.year),
                    poster: Set(normalize_poster(input.poster)),
                    votes: Set(0),
                    status: Set(CandidateStatus::Active),
                    created_at: Set(Utc::now().into()),
                };
                let created = self.ballot_repo.create(model).await?;
                Ok(AddOutcome::Created(created))
            }
            Some(existing) if existing.status == CandidateStatus::Active => {
                let outcome = self.cast_vote(&existing.id).await?;
                Ok(AddOutcome::Voted(outcome))
            }
            Some(existing) => Err(AppError::Conflict(format!(
                "{} already won and cannot re-enter the ballot",
                existing.id
            ))),
        }
    }

    /// Cast one vote on an active candidate.
    ///
    /// Reaching [`VOTE_THRESHOLD`] promotes the candidate in the same store
    /// transaction; the returned candidate then already carries the winner
    /// status and the outcome carries the new ledger row.
    ///
    /// A missing identifier and a non-active candidate produce the same
    /// not-found signal.
    pub async fn cast_vote(&self, id: &str) -> AppResult<VoteOutcome> {
        let applied = self
            .ballot_repo
            .apply_vote(id, VOTE_THRESHOLD)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No votable candidate: {id}")))?;

        Ok(VoteOutcome {
            candidate: applied.candidate,
            winner: applied.winner,
        })
    }

    /// Delete an active candidate. Returns whether a deletion occurred;
    /// winners are immutable history and cannot be deleted through this path.
    pub async fn delete_candidate(&self, id: &str) -> AppResult<bool> {
        self.ballot_repo.delete_active(id).await
    }

    /// Empty the active ballot. The winner ledger is untouched.
    pub async fn clear_ballot(&self) -> AppResult<u64> {
        self.ballot_repo.clear_active().await
    }

    /// Empty the winner ledger. The active ballot is untouched.
    pub async fn clear_winners(&self) -> AppResult<u64> {
        self.winner_repo.clear().await
    }

    /// List active candidates, votes descending, earliest-added first on ties.
    pub async fn list_active(&self) -> AppResult<Vec<candidate::Model>> {
        self.ballot_repo.find_active().await
    }

    /// List the winner ledger, most recent promotion first.
    pub async fn list_winners(&self) -> AppResult<Vec<winner_record::Model>> {
        self.winner_repo.find_all().await
    }
}

/// The catalog reports a missing poster as the literal `"N/A"`; store NULL.
fn normalize_poster(poster: String) -> Option<String> {
    if poster == "N/A" { None } else { Some(poster) }
}
