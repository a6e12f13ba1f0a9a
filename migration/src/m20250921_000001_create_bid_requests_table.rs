use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `bid_requests` table and its columns.
#[derive(DeriveIden)]
enum BidRequests {
    Table,
    Id,
    UserId,
    CompanyId,
    RequirementId,
    Status,
    RequestedAt,
}

/// Re-declare parent table identifiers for foreign-key references.
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
                    .table(BidRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BidRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BidRequests::UserId).uuid().not_null())
                    .col(ColumnDef::new(BidRequests::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(BidRequests::RequirementId).uuid().not_null())
                    .col(ColumnDef::new(BidRequests::Status).string().not_null())
                    .col(
                        ColumnDef::new(BidRequests::RequestedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bid_requests_user_id")
                            .from(BidRequests::Table, BidRequests::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bid_requests_company_id")
                            .from(BidRequests::Table, BidRequests::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bid_requests_requirement_id")
                            .from(BidRequests::Table, BidRequests::RequirementId)
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
            .drop_table(Table::drop().table(BidRequests::Table).to_owned())
            .await
    }
}
