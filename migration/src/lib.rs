pub use sea_orm_migration::prelude::*;

mod m20250620_000001_initial;
mod m20250624_000001_add_referrals;
mod m20250702_000001_add_admin_users;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250620_000001_initial::Migration),
            Box::new(m20250624_000001_add_referrals::Migration),
            Box::new(m20250702_000001_add_admin_users::Migration),
        ]
    }
}
