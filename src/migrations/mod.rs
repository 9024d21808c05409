pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users;
mod m20250301_000002_create_scholarships;
mod m20250301_000003_create_applications;
mod m20250301_000004_create_finance;
mod m20250301_000005_create_sessions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_scholarships::Migration),
            Box::new(m20250301_000003_create_applications::Migration),
            Box::new(m20250301_000004_create_finance::Migration),
            Box::new(m20250301_000005_create_sessions::Migration),
        ]
    }
}
