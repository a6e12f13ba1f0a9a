use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Requirement category stored as a lowercase string in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Category {
    #[sea_orm(string_value = "it")]
    It,
    #[sea_orm(string_value = "mep")]
    Mep,
    #[sea_orm(string_value = "design")]
    Design,
    #[sea_orm(string_value = "marketing")]
    Marketing,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum WorkType {
    #[sea_orm(string_value = "onsite")]
    Onsite,
    #[sea_orm(string_value = "remote")]
    Remote,
    #[sea_orm(string_value = "hybrid")]
    Hybrid,
}

/// SeaORM entity for the `requirements` table.
///
/// A requirement is the client's posted work request. Once bids reference it,
/// nothing here mutates it — downstream status lives on bids and contracts.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "requirements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub category: Category,
    pub work_type: WorkType,
    #[sea_orm(column_type = "Double")]
    pub min_budget: f64,
    #[sea_orm(column_type = "Double")]
    pub max_budget: f64,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub skills: Option<Json>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::bids::Entity")]
    Bids,
    #[sea_orm(has_many = "super::bid_requests::Entity")]
    BidRequests,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::bids::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bids.def()
    }
}

impl Related<super::bid_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BidRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRequirement {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub work_type: WorkType,
    pub min_budget: f64,
    pub max_budget: f64,
    pub skills: Option<Json>,
}
