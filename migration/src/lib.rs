pub use sea_orm_migration::prelude::*;

mod m20250110_000001_create_chat_schema_and_tables;
mod m20250420_000001_add_chat_sorting_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250110_000001_create_chat_schema_and_tables::Migration),
            Box::new(m20250420_000001_add_chat_sorting_indexes::Migration),
        ]
    }
}
