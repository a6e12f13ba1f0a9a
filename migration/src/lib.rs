pub use sea_orm_migration::prelude::*;

mod m20250918_000001_create_users_table;
mod m20250918_000002_create_companies_table;
mod m20250918_000003_create_requirements_table;
mod m20250921_000001_create_bid_requests_table;
mod m20250921_000002_create_bids_table;
mod m20250925_000001_create_contracts_table;
mod m20251002_000001_create_payments_table;
mod m20251005_000001_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250918_000001_create_users_table::Migration),
            Box::new(m20250918_000002_create_companies_table::Migration),
            Box::new(m20250918_000003_create_requirements_table::Migration),
            Box::new(m20250921_000001_create_bid_requests_table::Migration),
            Box::new(m20250921_000002_create_bids_table::Migration),
            Box::new(m20250925_000001_create_contracts_table::Migration),
            Box::new(m20251002_000001_create_payments_table::Migration),
            Box::new(m20251005_000001_add_indexes::Migration),
        ]
    }
}
