use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `payments` table and its columns.
#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    ContractId,
    ClientId,
    CompanyId,
    Gateway,
    Amount,
    Commission,
    CompanyAmount,
    TransactionId,
    GatewayRefId,
    GatewayPayload,
    Status,
    CreatedAt,
    UpdatedAt,
}

/// Re-declare parent table identifiers for foreign-key references.
#[derive(DeriveIden)]
enum Contracts {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Payments::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Payments::ContractId).uuid().not_null())
                    .col(ColumnDef::new(Payments::ClientId).uuid().not_null())
                    .col(ColumnDef::new(Payments::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(Payments::Gateway).string().not_null())
                    .col(ColumnDef::new(Payments::Amount).double().not_null())
                    .col(ColumnDef::new(Payments::Commission).double().not_null())
                    .col(
                        ColumnDef::new(Payments::CompanyAmount)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Payments::TransactionId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Payments::GatewayRefId).string())
                    .col(
                        ColumnDef::new(Payments::GatewayPayload)
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Payments::Status).string().not_null())
                    .col(
                        ColumnDef::new(Payments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Payments::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_contract_id")
                            .from(Payments::Table, Payments::ContractId)
                            .to(Contracts::Table, Contracts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_client_id")
                            .from(Payments::Table, Payments::ClientId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_company_id")
                            .from(Payments::Table, Payments::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Initiation idempotency key: one payment attempt per
        // (contract, client, gateway). Racing initiations collapse onto the
        // first row instead of double-charging.
        manager
            .create_index(
                Index::create()
                    .name("idx_payments_contract_client_gateway_unique")
                    .table(Payments::Table)
                    .col(Payments::ContractId)
                    .col(Payments::ClientId)
                    .col(Payments::Gateway)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_payments_contract_client_gateway_unique")
                    .table(Payments::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await
    }
}
