//! Ballot repository.

use std::sync::Arc;

use chrono::Utc;
use cinevote_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

use crate::entities::{
    Candidate,
    candidate::{self, CandidateStatus},
    winner_record,
};

/// Result of an applied vote.
///
/// `winner` is set only when this vote pushed the candidate over the
/// threshold; in that case `candidate.status` is already `Winner`.
#[derive(Debug, Clone)]
pub struct VoteApplied {
    /// The candidate with the incremented count.
    pub candidate: candidate::Model,
    /// The ledger row created by the promotion, if one happened.
    pub winner: Option<winner_record::Model>,
}

/// Ballot repository for candidate table operations.
#[derive(Clone)]
pub struct BallotRepository {
    db: Arc<DatabaseConnection>,
}

impl BallotRepository {
    /// Create a new ballot repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a candidate by catalog identifier, regardless of status.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<candidate::Model>> {
        Candidate::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List active candidates, votes descending, earliest-added first on ties.
    pub async fn find_active(&self) -> AppResult<Vec<candidate::Model>> {
        Candidate::find()
            .filter(candidate::Column::Status.eq(CandidateStatus::Active))
            .order_by(candidate::Column::Votes, Order::Desc)
            .order_by(candidate::Column::CreatedAt, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new candidate.
    pub async fn create(&self, model: candidate::ActiveModel) -> AppResult<candidate::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Apply one vote to an active candidate, promoting it when the count
    /// reaches `threshold`.
    ///
    /// The increment, the threshold check, the status flip and the ledger
    /// insert run in a single transaction: no reader ever observes a count at
    /// the threshold with the status still active.
    ///
    /// Returns `Ok(None)` when no candidate with `id` exists or its status is
    /// not active; the two cases are not distinguished.
    pub async fn apply_vote(&self, id: &str, threshold: i32) -> AppResult<Option<VoteApplied>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let found = Candidate::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let model = match found {
            Some(m) if m.status == CandidateStatus::Active => m,
            _ => {
                txn.rollback()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                return Ok(None);
            }
        };

        let votes = model.votes + 1;
        let promoted = votes >= threshold;

        let snapshot = (model.title.clone(), model.year.clone(), model.poster.clone());

        let mut active: candidate::ActiveModel = model.into();
        active.votes = Set(votes);
        if promoted {
            active.status = Set(CandidateStatus::Winner);
        }

        let candidate = active
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let winner = if promoted {
            let (title, year, poster) = snapshot;
            let record = winner_record::ActiveModel {
                candidate_id: Set(candidate.id.clone()),
                title: Set(title),
                year: Set(year),
                poster: Set(poster),
                final_votes: Set(votes),
                promoted_at: Set(Utc::now().into()),
                ..Default::default()
            };
            Some(
                record
                    .insert(&txn)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?,
            )
        } else {
            None
        };

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(Some(VoteApplied { candidate, winner }))
    }

    /// Delete a candidate only if it is active. Returns whether a row was
    /// deleted; winners are untouched by this path.
    pub async fn delete_active(&self, id: &str) -> AppResult<bool> {
        let result = Candidate::delete_many()
            .filter(candidate::Column::Id.eq(id))
            .filter(candidate::Column::Status.eq(CandidateStatus::Active))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Delete every active candidate. Winner rows persist.
    pub async fn clear_active(&self) -> AppResult<u64> {
        let result = Candidate::delete_many()
            .filter(candidate::Column::Status.eq(CandidateStatus::Active))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn test_candidate(id: &str, votes: i32, status: CandidateStatus) -> candidate::Model {
        candidate::Model {
            id: id.to_string(),
            title: "Test Movie".to_string(),
            year: "2001".to_string(),
            poster: Some("https://posters.example/t.jpg".to_string()),
            votes,
            status,
            created_at: Utc::now().into(),
        }
    }

    fn test_winner(seq: i32, candidate_id: &str, final_votes: i32) -> winner_record::Model {
        winner_record::Model {
            id: seq,
            candidate_id: candidate_id.to_string(),
            title: "Test Movie".to_string(),
            year: "2001".to_string(),
            poster: Some("https://posters.example/t.jpg".to_string()),
            final_votes,
            promoted_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_returns_candidate() {
        let model = test_candidate("tt0111161", 3, CandidateStatus::Active);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[model.clone()]])
                .into_connection(),
        );

        let repo = BallotRepository::new(db);
        let found = repo.find_by_id("tt0111161").await.unwrap();

        assert!(found.is_some());
        assert_eq!(found.unwrap().votes, 3);
    }

    #[tokio::test]
    async fn test_find_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<candidate::Model>::new()])
                .into_connection(),
        );

        let repo = BallotRepository::new(db);
        let found = repo.find_by_id("tt0000000").await.unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_find_active_passes_through_rows() {
        let a = test_candidate("tt1", 5, CandidateStatus::Active);
        let b = test_candidate("tt2", 5, CandidateStatus::Active);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[a, b]])
                .into_connection(),
        );

        let repo = BallotRepository::new(db);
        let rows = repo.find_active().await.unwrap();

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|c| c.status == CandidateStatus::Active));
    }

    #[tokio::test]
    async fn test_apply_vote_missing_candidate_returns_none() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<candidate::Model>::new()])
                .into_connection(),
        );

        let repo = BallotRepository::new(db);
        let applied = repo.apply_vote("tt0000000", 10).await.unwrap();

        assert!(applied.is_none());
    }

    #[tokio::test]
    async fn test_apply_vote_rejects_winner_status() {
        let winner = test_candidate("tt1", 10, CandidateStatus::Winner);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[winner]])
                .into_connection(),
        );

        let repo = BallotRepository::new(db);
        let applied = repo.apply_vote("tt1", 10).await.unwrap();

        // Same signal as a missing id
        assert!(applied.is_none());
    }

    #[tokio::test]
    async fn test_apply_vote_increments_below_threshold() {
        let before = test_candidate("tt1", 3, CandidateStatus::Active);
        let after = test_candidate("tt1", 4, CandidateStatus::Active);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[before], [after]])
                .into_connection(),
        );

        let repo = BallotRepository::new(db);
        let applied = repo.apply_vote("tt1", 10).await.unwrap().unwrap();

        assert_eq!(applied.candidate.votes, 4);
        assert_eq!(applied.candidate.status, CandidateStatus::Active);
        assert!(applied.winner.is_none());
    }

    #[tokio::test]
    async fn test_apply_vote_promotes_at_threshold() {
        let before = test_candidate("tt1", 9, CandidateStatus::Active);
        let after = test_candidate("tt1", 10, CandidateStatus::Winner);
        let ledger_row = test_winner(1, "tt1", 10);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[before], [after]])
                .append_query_results([[ledger_row]])
                .into_connection(),
        );

        let repo = BallotRepository::new(db);
        let applied = repo.apply_vote("tt1", 10).await.unwrap().unwrap();

        assert_eq!(applied.candidate.votes, 10);
        assert_eq!(applied.candidate.status, CandidateStatus::Winner);

        let winner = applied.winner.unwrap();
        assert_eq!(winner.candidate_id, "tt1");
        assert_eq!(winner.final_votes, 10);
    }

    #[tokio::test]
    async fn test_delete_active_reports_whether_row_was_deleted() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 0,
                    },
                ])
                .into_connection(),
        );

        let repo = BallotRepository::new(db);
        assert!(repo.delete_active("tt1").await.unwrap());
        assert!(!repo.delete_active("tt1").await.unwrap());
    }

    #[tokio::test]
    async fn test_clear_active_returns_row_count() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 4,
                }])
                .into_connection(),
        );

        let repo = BallotRepository::new(db);
        assert_eq!(repo.clear_active().await.unwrap(), 4);
    }
}
