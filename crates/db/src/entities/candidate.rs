//! Ballot candidate entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Candidate lifecycle status.
///
/// `Winner` is terminal: a candidate that crossed the vote threshold keeps its
/// row but is no longer part of the active ballot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum CandidateStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "winner")]
    Winner,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "candidate")]
pub struct Model {
    /// Stable identifier from the external catalog
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Movie title
    pub title: String,

    /// Release year as reported by the catalog (may be a range)
    pub year: String,

    /// Poster URL
    #[sea_orm(nullable)]
    pub poster: Option<String>,

    /// Current vote count
    pub votes: i32,

    /// Lifecycle status
    pub status: CandidateStatus,

    /// When the candidate was added to the ballot
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
