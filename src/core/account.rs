//! Account directory - Lookup, creation and leaderboard queries.
//!
//! Accounts are soft-permanent: there is no delete operation. The derived
//! counters (`level`, `total_points`, `current_balance`) start at their
//! defaults here and are only ever mutated by the ledger engine.

use crate::{
    core::ledger,
    entities::{Account, Role, account, ledger_entry},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Creates a new account with zeroed counters.
///
/// # Errors
/// Returns a validation error for an empty username and a conflict when the
/// username is already taken.
pub async fn create_account(
    db: &DatabaseConnection,
    username: String,
    display_name: String,
    role: Role,
) -> Result<account::Model> {
    let username = username.trim().to_string();
    if username.is_empty() {
        return Err(Error::Validation {
            message: "username cannot be empty".to_string(),
        });
    }

    if get_account_by_username(db, &username).await?.is_some() {
        return Err(Error::Conflict {
            message: format!("username already taken: {username}"),
        });
    }

    account::ActiveModel {
        username: Set(username),
        display_name: Set(display_name.trim().to_string()),
        role: Set(role),
        level: Set(1),
        total_points: Set(0),
        current_balance: Set(0),
        avatar_path: Set(None),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Finds an account by its unique ID.
pub async fn get_account(db: &DatabaseConnection, account_id: i64) -> Result<Option<account::Model>> {
    Account::find_by_id(account_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an account by username, returning None if not found.
pub async fn get_account_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<account::Model>> {
    Account::find()
        .filter(account::Column::Username.eq(username))
        .one(db)
        .await
        .map_err(Into::into)
}

/// All accounts ordered by `total_points` descending, for the leaderboard.
pub async fn leaderboard(db: &DatabaseConnection) -> Result<Vec<account::Model>> {
    Account::find()
        .order_by_desc(account::Column::TotalPoints)
        .all(db)
        .await
        .map_err(Into::into)
}

/// An account together with its most recent ledger entries, for the profile
/// view.
pub async fn profile(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<(account::Model, Vec<ledger_entry::Model>)> {
    let account = get_account(db, account_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "account",
            id: account_id.to_string(),
        })?;
    let recent = ledger::recent_entries(db, account_id, 5).await?;
    Ok((account, recent))
}
