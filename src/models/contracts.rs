use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Contract status stored as a lowercase string in the database.
///
/// Allowed transitions: `PendingSignature → Active → Completed` and
/// `PendingSignature → Terminated`. Terminal states are never left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Status {
    #[sea_orm(string_value = "pending_signature")]
    PendingSignature,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "terminated")]
    Terminated,
    #[sea_orm(string_value = "completed")]
    Completed,
}

/// Payment progress on a contract. Advances one step per confirmed payment,
/// never regresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "partially_paid")]
    PartiallyPaid,
    #[sea_orm(string_value = "fully_paid")]
    FullyPaid,
}

impl PaymentStatus {
    /// The next step in the progress ladder, or `None` once fully paid.
    ///
    /// Progress is counted per confirmed payment event, not by comparing
    /// cumulative paid amounts to the contract total.
    pub fn next(self) -> Option<PaymentStatus> {
        match self {
            PaymentStatus::Pending => Some(PaymentStatus::PartiallyPaid),
            PaymentStatus::PartiallyPaid => Some(PaymentStatus::FullyPaid),
            PaymentStatus::FullyPaid => None,
        }
    }
}

/// Which document template the render service uses for the contract PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ServiceType {
    #[sea_orm(string_value = "it")]
    It,
    #[sea_orm(string_value = "mep")]
    Mep,
}

/// SeaORM entity for the `contracts` table — the binding agreement derived
/// from one accepted quote.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contracts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Externally meaningful project identifier, e.g. `PRJ-1718000000000-4821`.
    #[sea_orm(unique)]
    pub project_id: String,
    pub company_id: Uuid,
    pub client_id: Uuid,
    pub requirement_id: Uuid,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    pub advance_percent: i32,
    pub duration_days: i32,
    pub service_type: ServiceType,
    pub location: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub scope_summary: Option<String>,
    pub status: Status,
    pub payment_status: PaymentStatus,
    /// URL of the generated contract document, set after activation.
    pub contract_file: Option<String>,
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
        belongs_to = "super::users::Entity",
        from = "Column::ClientId",
        to = "super::users::Column::Id"
    )]
    Client,
    #[sea_orm(
        belongs_to = "super::requirements::Entity",
        from = "Column::RequirementId",
        to = "super::requirements::Column::Id"
    )]
    Requirement,
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
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

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Terms supplied by the company when drafting a contract.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractTerms {
    pub client_id: Uuid,
    pub requirement_id: Uuid,
    pub amount: f64,
    pub advance_percent: i32,
    pub duration_days: i32,
    pub service_type: ServiceType,
    pub location: Option<String>,
    pub scope_summary: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_progress_steps_forward_once_per_event() {
        assert_eq!(
            PaymentStatus::Pending.next(),
            Some(PaymentStatus::PartiallyPaid)
        );
        assert_eq!(
            PaymentStatus::PartiallyPaid.next(),
            Some(PaymentStatus::FullyPaid)
        );
    }

    #[test]
    fn fully_paid_is_terminal() {
        assert_eq!(PaymentStatus::FullyPaid.next(), None);
    }
}
