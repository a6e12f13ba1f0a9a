use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `contracts` table and its columns.
#[derive(DeriveIden)]
enum Contracts {
    Table,
    Id,
    ProjectId,
    CompanyId,
    ClientId,
    RequirementId,
    Amount,
    AdvancePercent,
    DurationDays,
    ServiceType,
    Location,
    ScopeSummary,
    Status,
    PaymentStatus,
    ContractFile,
    CreatedAt,
    UpdatedAt,
}

/// Re-declare parent table identifiers for foreign-key references.
#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Requirements {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Contracts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contracts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Contracts::ProjectId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Contracts::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(Contracts::ClientId).uuid().not_null())
                    .col(ColumnDef::new(Contracts::RequirementId).uuid().not_null())
                    .col(ColumnDef::new(Contracts::Amount).double().not_null())
                    .col(
                        ColumnDef::new(Contracts::AdvancePercent)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Contracts::DurationDays).integer().not_null())
                    .col(ColumnDef::new(Contracts::ServiceType).string().not_null())
                    .col(ColumnDef::new(Contracts::Location).string())
                    .col(ColumnDef::new(Contracts::ScopeSummary).text())
                    .col(ColumnDef::new(Contracts::Status).string().not_null())
                    .col(ColumnDef::new(Contracts::PaymentStatus).string().not_null())
                    .col(ColumnDef::new(Contracts::ContractFile).string())
                    .col(
                        ColumnDef::new(Contracts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Contracts::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contracts_company_id")
                            .from(Contracts::Table, Contracts::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contracts_client_id")
                            .from(Contracts::Table, Contracts::ClientId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contracts_requirement_id")
                            .from(Contracts::Table, Contracts::RequirementId)
                            .to(Requirements::Table, Requirements::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Contracts::Table).to_owned())
            .await
    }
}
