//! Create winner record table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WinnerRecord::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WinnerRecord::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WinnerRecord::CandidateId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WinnerRecord::Title)
                            .string_len(512)
                            .not_null(),
                    )
                    .col(ColumnDef::new(WinnerRecord::Year).string_len(16).not_null())
                    .col(ColumnDef::new(WinnerRecord::Poster).string_len(1024))
                    .col(ColumnDef::new(WinnerRecord::FinalVotes).integer().not_null())
                    .col(
                        ColumnDef::new(WinnerRecord::PromotedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // A candidate is promoted at most once
        manager
            .create_index(
                Index::create()
                    .name("idx_winner_record_candidate_id")
                    .table(WinnerRecord::Table)
                    .col(WinnerRecord::CandidateId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Ledger listing is promoted_at descending
        manager
            .create_index(
                Index::create()
                    .name("idx_winner_record_promoted_at")
                    .table(WinnerRecord::Table)
                    .col(WinnerRecord::PromotedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WinnerRecord::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum WinnerRecord {
    Table,
    Id,
    CandidateId,
    Title,
    Year,
    Poster,
    FinalVotes,
    PromotedAt,
}
