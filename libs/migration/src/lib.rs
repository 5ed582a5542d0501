pub use sea_orm_migration::prelude::*;

mod m20241019_000000_bootstrap;
mod m20241019_000001_create_users;
mod m20241019_000002_create_products;
mod m20241019_000003_seed_catalog;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241019_000000_bootstrap::Migration),
            Box::new(m20241019_000001_create_users::Migration),
            Box::new(m20241019_000002_create_products::Migration),
            Box::new(m20241019_000003_seed_catalog::Migration),
        ]
    }
}
