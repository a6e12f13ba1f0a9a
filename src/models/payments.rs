use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Which external gateway processed (or is processing) the transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Gateway {
    #[sea_orm(string_value = "esewa")]
    Esewa,
    #[sea_orm(string_value = "stripe")]
    Stripe,
}

/// Payment attempt status stored as a lowercase string in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Status {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "success")]
    Success,
    #[sea_orm(string_value = "failed")]
    Failed,
}

/// SeaORM entity for the `payments` table — one settlement attempt against a
/// contract through a specific gateway.
///
/// (contract_id, client_id, gateway) is unique: a repeated initiation for the
/// same tuple returns the existing row instead of creating a duplicate.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub contract_id: Uuid,
    pub client_id: Uuid,
    pub company_id: Uuid,
    pub gateway: Gateway,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    /// Platform cut, `amount * COMMISSION_RATE` at initiation time.
    #[sea_orm(column_type = "Double")]
    pub commission: f64,
    /// Net amount owed to the company, `amount - commission`.
    #[sea_orm(column_type = "Double")]
    pub company_amount: f64,
    /// Caller-generated id sent to the gateway, unique per attempt.
    #[sea_orm(unique)]
    pub transaction_id: String,
    /// Reference assigned by the gateway (eSewa ref id / Stripe intent or
    /// charge id).
    pub gateway_ref_id: Option<String>,
    /// Opaque gateway response kept verbatim for reconciliation.
    #[sea_orm(column_type = "JsonBinary")]
    pub gateway_payload: Json,
    pub status: Status,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::contracts::Entity",
        from = "Column::ContractId",
        to = "super::contracts::Column::Id"
    )]
    Contract,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ClientId",
        to = "super::users::Column::Id"
    )]
    Client,
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id"
    )]
    Company,
}

impl Related<super::contracts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contract.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Everything `db::payments::insert_payment` needs for a new row.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub contract_id: Uuid,
    pub client_id: Uuid,
    pub company_id: Uuid,
    pub gateway: Gateway,
    pub amount: f64,
    pub commission: f64,
    pub company_amount: f64,
    pub transaction_id: String,
    pub gateway_ref_id: Option<String>,
    pub gateway_payload: Json,
    pub status: Status,
}
