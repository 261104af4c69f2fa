//! Initial schema migration.
//!
//! Creates the four collections of the portfolio ledger:
//!
//! - `clients`: directory of clients owning projects
//! - `projects`: engagements owned by a client
//! - `contracts`: at most one per project; its value caps project income
//! - `movements`: append-only income/expense ledger
//!
//! `contracts.project_id` is deliberately indexed without a UNIQUE
//! constraint: the one-contract-per-project rule is enforced at creation
//! time by the ledger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Clients {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Kind,
    CreatedAt,
}

#[derive(Iden)]
enum Projects {
    Table,
    Id,
    ClientId,
    Name,
    Description,
    State,
    TermDays,
    ProposalId,
    CreatedAt,
}

#[derive(Iden)]
enum Contracts {
    Table,
    Id,
    ProjectId,
    Conditions,
    StartDate,
    EndDate,
    TotalValueMinor,
    PaymentForm,
    Currency,
    PenaltyClause,
    Notes,
    CreatedAt,
}

#[derive(Iden)]
enum Movements {
    Table,
    Id,
    ProjectId,
    ContractId,
    Kind,
    Description,
    AmountMinor,
    OccurredAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Clients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Clients::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Clients::Name).string().not_null())
                    .col(ColumnDef::new(Clients::Email).string().not_null())
                    .col(ColumnDef::new(Clients::Phone).string().not_null())
                    .col(ColumnDef::new(Clients::Kind).string().not_null())
                    .col(ColumnDef::new(Clients::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Projects::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Projects::ClientId).string().not_null())
                    .col(ColumnDef::new(Projects::Name).string().not_null())
                    .col(ColumnDef::new(Projects::Description).string().not_null())
                    .col(ColumnDef::new(Projects::State).string().not_null())
                    .col(ColumnDef::new(Projects::TermDays).integer().not_null())
                    .col(ColumnDef::new(Projects::ProposalId).string())
                    .col(ColumnDef::new(Projects::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-projects-client_id")
                            .from(Projects::Table, Projects::ClientId)
                            .to(Clients::Table, Clients::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-projects-client_id")
                    .table(Projects::Table)
                    .col(Projects::ClientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Contracts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contracts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Contracts::ProjectId).string().not_null())
                    .col(ColumnDef::new(Contracts::Conditions).string().not_null())
                    .col(ColumnDef::new(Contracts::StartDate).date().not_null())
                    .col(ColumnDef::new(Contracts::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(Contracts::TotalValueMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Contracts::PaymentForm).string().not_null())
                    .col(ColumnDef::new(Contracts::Currency).string().not_null())
                    .col(ColumnDef::new(Contracts::PenaltyClause).string())
                    .col(ColumnDef::new(Contracts::Notes).string())
                    .col(ColumnDef::new(Contracts::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-contracts-project_id")
                            .from(Contracts::Table, Contracts::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-contracts-project_id")
                    .table(Contracts::Table)
                    .col(Contracts::ProjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Movements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Movements::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Movements::ProjectId).string().not_null())
                    .col(ColumnDef::new(Movements::ContractId).string())
                    .col(ColumnDef::new(Movements::Kind).string().not_null())
                    .col(ColumnDef::new(Movements::Description).string().not_null())
                    .col(
                        ColumnDef::new(Movements::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Movements::OccurredAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-movements-project_id")
                            .from(Movements::Table, Movements::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-movements-contract_id-kind")
                    .table(Movements::Table)
                    .col(Movements::ContractId)
                    .col(Movements::Kind)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-movements-project_id")
                    .table(Movements::Table)
                    .col(Movements::ProjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-movements-occurred_at")
                    .table(Movements::Table)
                    .col(Movements::OccurredAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Movements::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Contracts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clients::Table).to_owned())
            .await
    }
}
