//! Winner ledger repository.

use std::sync::Arc;

use cinevote_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder,
};

use crate::entities::{WinnerRecord, winner_record};

/// Repository for winner ledger operations.
///
/// Rows are inserted by [`super::BallotRepository::apply_vote`] inside the
/// promotion transaction; this repository only reads and clears the ledger.
#[derive(Clone)]
pub struct WinnerRepository {
    db: Arc<DatabaseConnection>,
}

impl WinnerRepository {
    /// Create a new winner repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// List the full ledger, most recent promotion first.
    pub async fn find_all(&self) -> AppResult<Vec<winner_record::Model>> {
        WinnerRecord::find()
            .order_by(winner_record::Column::PromotedAt, Order::Desc)
            // Sequence number breaks same-timestamp ties
            .order_by(winner_record::Column::Id, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the ledger row for a candidate, if it ever won.
    pub async fn find_by_candidate_id(
        &self,
        candidate_id: &str,
    ) -> AppResult<Option<winner_record::Model>> {
        WinnerRecord::find()
            .filter(winner_record::Column::CandidateId.eq(candidate_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete every ledger row. The active ballot is untouched.
    pub async fn clear(&self) -> AppResult<u64> {
        let result = WinnerRecord::delete_many()
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
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn test_record(seq: i32, candidate_id: &str) -> winner_record::Model {
        winner_record::Model {
            id: seq,
            candidate_id: candidate_id.to_string(),
            title: "Test Movie".to_string(),
            year: "1999".to_string(),
            poster: None,
            final_votes: 10,
            promoted_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_all_returns_ledger() {
        let newest = test_record(2, "tt2");
        let oldest = test_record(1, "tt1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[newest, oldest]])
                .into_connection(),
        );

        let repo = WinnerRepository::new(db);
        let rows = repo.find_all().await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 2);
    }

    #[tokio::test]
    async fn test_find_by_candidate_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<winner_record::Model>::new()])
                .into_connection(),
        );

        let repo = WinnerRepository::new(db);
        let found = repo.find_by_candidate_id("tt0000000").await.unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_clear_returns_row_count() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 3,
                }])
                .into_connection(),
        );

        let repo = WinnerRepository::new(db);
        assert_eq!(repo.clear().await.unwrap(), 3);
    }
}
