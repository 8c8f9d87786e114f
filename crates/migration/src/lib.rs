pub use sea_orm_migration::prelude::*;

mod m20260801_090000_users;
mod m20260801_100000_organizations;
mod m20260801_110000_invoices;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_090000_users::Migration),
            Box::new(m20260801_100000_organizations::Migration),
            Box::new(m20260801_110000_invoices::Migration),
        ]
    }
}
