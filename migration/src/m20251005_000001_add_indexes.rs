use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Bids {
    Table,
    RequirementId,
    CompanyId,
}

#[derive(DeriveIden)]
enum BidRequests {
    Table,
    CompanyId,
}

#[derive(DeriveIden)]
enum Contracts {
    Table,
    CompanyId,
    ClientId,
    RequirementId,
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    ContractId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // The hot lookups: quotes per requirement, a company's bids and
        // invitations, contract lists per party, a contract's audit trail.
        manager
            .create_index(
                Index::create()
                    .name("idx_bids_requirement_id")
                    .table(Bids::Table)
                    .col(Bids::RequirementId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bids_company_id")
                    .table(Bids::Table)
                    .col(Bids::CompanyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bid_requests_company_id")
                    .table(BidRequests::Table)
                    .col(BidRequests::CompanyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_contracts_company_id")
                    .table(Contracts::Table)
                    .col(Contracts::CompanyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_contracts_client_id")
                    .table(Contracts::Table)
                    .col(Contracts::ClientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_contracts_requirement_id")
                    .table(Contracts::Table)
                    .col(Contracts::RequirementId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_contract_id")
                    .table(Payments::Table)
                    .col(Payments::ContractId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_bids_requirement_id")
                    .table(Bids::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_bids_company_id")
                    .table(Bids::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_bid_requests_company_id")
                    .table(BidRequests::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_contracts_company_id")
                    .table(Contracts::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_contracts_client_id")
                    .table(Contracts::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_contracts_requirement_id")
                    .table(Contracts::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_payments_contract_id")
                    .table(Payments::Table)
                    .to_owned(),
            )
            .await
    }
}
