//! Shared test utilities.
//!
//! Common helpers for setting up in-memory test databases and creating test
//! entities with sensible defaults.

use crate::{
    core::{account, mission::NewMission, policy::Actor, shop::NewProduct},
    entities::{self, MissionCategory, ProductCategory, Role},
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates an employee account with the given username.
pub async fn create_test_employee(
    db: &DatabaseConnection,
    username: &str,
) -> Result<entities::account::Model> {
    account::create_account(
        db,
        username.to_string(),
        format!("Test {username}"),
        Role::Employee,
    )
    .await
}

/// Creates an admin account and returns an [`Actor`] for it.
pub async fn admin_actor(db: &DatabaseConnection) -> Result<Actor> {
    let admin = account::create_account(
        db,
        "test_admin".to_string(),
        "Test Admin".to_string(),
        Role::Admin,
    )
    .await?;
    Ok(Actor::admin(admin.id))
}

/// Re-reads an account, failing the test if it vanished.
pub async fn fetch_account(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<entities::account::Model> {
    account::get_account(db, account_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "account",
            id: account_id.to_string(),
        })
}

/// Mission input with a one-week deadline and the performance category.
#[must_use]
pub fn test_mission_input(title: &str, reward_amount: i64) -> NewMission {
    NewMission {
        title: title.to_string(),
        description: format!("{title} (test mission)"),
        reward_amount,
        category: MissionCategory::Performance,
        deadline: chrono::Utc::now() + chrono::Duration::days(7),
    }
}

/// Product input in the gadget category.
#[must_use]
pub fn test_product_input(name: &str, price: i64, stock: i32) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        description: None,
        price,
        category: ProductCategory::Gadget,
        stock,
    }
}
