//! Create candidate table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Candidate::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Candidate::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Candidate::Title).string_len(512).not_null())
                    .col(ColumnDef::new(Candidate::Year).string_len(16).not_null())
                    .col(ColumnDef::new(Candidate::Poster).string_len(1024))
                    .col(ColumnDef::new(Candidate::Votes).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Candidate::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Candidate::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Composite index: (status, votes) for the active-ballot scan
        manager
            .create_index(
                Index::create()
                    .name("idx_candidate_status_votes")
                    .table(Candidate::Table)
                    .col(Candidate::Status)
                    .col(Candidate::Votes)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Candidate::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Candidate {
    Table,
    Id,
    Title,
    Year,
    Poster,
    Votes,
    Status,
    CreatedAt,
}
