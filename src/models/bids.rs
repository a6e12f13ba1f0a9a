use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::companies::CompanySummary;

/// Bid status stored as a lowercase string in the database.
///
/// At most one bid per (company, requirement) reaches `Accepted`; once a
/// contract for the requirement is activated, every non-accepted sibling is
/// flipped to `Declined` in the same transaction (see `services::lifecycle`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Status {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "declined")]
    Declined,
}

/// SeaORM entity for the `bids` table — a priced quote from one company
/// against one requirement.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bids")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub requirement_id: Uuid,
    pub company_id: Uuid,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    pub delivery_time: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub status: Status,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
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
pub struct SubmitQuote {
    pub requirement_id: Uuid,
    pub amount: f64,
    pub delivery_time: String,
    pub message: String,
}

/// A quote enriched with the submitting company's display fields.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteWithCompany {
    #[serde(flatten)]
    pub bid: Model,
    pub company: Option<CompanySummary>,
}
