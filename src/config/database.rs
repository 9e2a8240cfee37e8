//! Database configuration module.
//!
//! Handles `SQLite` connection and table creation using `SeaORM`. Schema
//! statements are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the database always matches the
//! Rust structs without manual SQL.

use crate::entities::{
    Account, Attendance, LedgerEntry, Message, Mission, MissionSubmission, Product, Purchase,
    TrainingSession,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the environment or the default local file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/workpoints.sqlite".to_string())
}

/// Establishes a connection using [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url())
        .await
        .map_err(Into::into)
}

/// Creates all tables from the entity definitions. Safe to call on an
/// already-initialized database.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statements = [
        schema.create_table_from_entity(Account),
        schema.create_table_from_entity(LedgerEntry),
        schema.create_table_from_entity(Mission),
        schema.create_table_from_entity(MissionSubmission),
        schema.create_table_from_entity(Attendance),
        schema.create_table_from_entity(TrainingSession),
        schema.create_table_from_entity(Product),
        schema.create_table_from_entity(Purchase),
        schema.create_table_from_entity(Message),
    ];

    for statement in &mut statements {
        db.execute(builder.build(statement.if_not_exists())).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{AccountModel, LedgerEntryModel, ProductModel};
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Tables exist if querying them succeeds
        let _: Vec<AccountModel> = Account::find().limit(1).all(&db).await?;
        let _: Vec<LedgerEntryModel> = LedgerEntry::find().limit(1).all(&db).await?;
        let _: Vec<ProductModel> = Product::find().limit(1).all(&db).await?;

        Ok(())
    }
}
