use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Bid-request status stored as a lowercase string in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Status {
    #[sea_orm(string_value = "sent")]
    Sent,
    #[sea_orm(string_value = "declined")]
    Declined,
}

/// SeaORM entity for the `bid_requests` table.
///
/// A bid request is an interest signal only — a client inviting a company to
/// quote on a requirement. It carries no price; the priced offer is a bid.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bid_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub requirement_id: Uuid,
    pub status: Status,
    pub requested_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id"
    )]
    Company,
    #[sea_orm(
        belongs_to = "super::requirements::Entity",
        from = "Column::RequirementId",
        to = "super::requirements::Column::Id"
    )]
    Requirement,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::requirements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Requirement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBidRequest {
    pub company_id: Uuid,
    pub requirement_id: Uuid,
}
