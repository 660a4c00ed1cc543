//! Winner ledger entity.
//!
//! Rows are written exactly once, at promotion time, and never mutated. The
//! title/year/poster columns are a snapshot: deleting or clearing the
//! originating candidate leaves the ledger untouched.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "winner_record")]
pub struct Model {
    /// Promotion sequence number
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Identifier of the originating candidate
    #[sea_orm(unique)]
    pub candidate_id: String,

    /// Title snapshot
    pub title: String,

    /// Release year snapshot
    pub year: String,

    /// Poster snapshot
    #[sea_orm(nullable)]
    pub poster: Option<String>,

    /// Vote count at promotion time
    pub final_votes: i32,

    /// When the promotion happened
    pub promoted_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
