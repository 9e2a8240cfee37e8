//! Ledger engine - The only writer of balances, points and levels.
//!
//! Every point movement in the system goes through [`record_in`] (or one of
//! its wrappers): the function inserts an immutable ledger entry and mutates
//! the owning account's running totals in the same unit of work. Workflow
//! modules never touch `current_balance`, `total_points` or `level` directly;
//! they compose a database transaction, call into here, and commit.
//!
//! The engine deliberately does not enforce a non-negative balance: spend
//! gating is the caller's job, and callers that need it use the guarded
//! [`record_spend_in`] which refuses to debit past zero. Admin adjustments
//! use the unguarded path and may legitimately drive a balance negative.

use crate::{
    core::policy::{self, Actor},
    entities::{Account, LedgerEntry, TokenType, account, ledger_entry},
    errors::{Error, Result},
};
use sea_orm::{
    ConnectionTrait, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*, sea_query::Expr,
};
use tracing::debug;

/// Records a ledger entry inside a caller-provided connection or transaction.
///
/// Effects, all in the caller's unit of work:
/// 1. inserts the immutable entry;
/// 2. adds `amount` to the account's `current_balance` with a single
///    `UPDATE ... SET current_balance = current_balance + ?` statement;
/// 3. if `amount` is positive, adds it to `total_points` as well and
///    re-evaluates the level, writing it back only when it changed.
///
/// # Errors
/// Returns [`Error::InvalidAmount`] for a zero amount and
/// [`Error::NotFound`] when the account does not exist.
pub async fn record_in<C>(
    conn: &C,
    account_id: i64,
    amount: i64,
    token_type: TokenType,
    description: String,
) -> Result<ledger_entry::Model>
where
    C: ConnectionTrait,
{
    if amount == 0 {
        return Err(Error::InvalidAmount { amount });
    }

    Account::find_by_id(account_id)
        .one(conn)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "account",
            id: account_id.to_string(),
        })?;

    let entry = insert_entry(conn, account_id, amount, token_type, description).await?;

    // Atomic balance update, no read-modify-write
    Account::update_many()
        .col_expr(
            account::Column::CurrentBalance,
            Expr::col(account::Column::CurrentBalance).add(amount),
        )
        .filter(account::Column::Id.eq(account_id))
        .exec(conn)
        .await?;

    if amount > 0 {
        Account::update_many()
            .col_expr(
                account::Column::TotalPoints,
                Expr::col(account::Column::TotalPoints).add(amount),
            )
            .filter(account::Column::Id.eq(account_id))
            .exec(conn)
            .await?;

        // Re-read after the increment: the pre-increment snapshot may be
        // stale under concurrent credits, and the level must track the
        // stored total
        let account = Account::find_by_id(account_id)
            .one(conn)
            .await?
            .ok_or_else(|| Error::NotFound {
                entity: "account",
                id: account_id.to_string(),
            })?;

        let new_level = policy::level_for(account.total_points);
        if new_level != account.level {
            debug!(
                account_id,
                from = account.level,
                to = new_level,
                "level changed"
            );
            Account::update_many()
                .col_expr(account::Column::Level, Expr::value(new_level))
                .filter(account::Column::Id.eq(account_id))
                .exec(conn)
                .await?;
        }
    }

    Ok(entry)
}

/// Records a guarded spend: debits `price` only if the balance covers it.
///
/// The debit is a conditional update
/// (`... SET current_balance = current_balance - ? WHERE current_balance >= ?`)
/// whose affected-row count is checked, so two concurrent spends against a
/// balance sufficient for only one cannot both succeed regardless of the
/// storage engine's isolation level.
///
/// # Errors
/// Returns [`Error::InsufficientBalance`] when the guard fails and
/// [`Error::InvalidAmount`] for a non-positive price.
pub async fn record_spend_in<C>(
    conn: &C,
    account_id: i64,
    price: i64,
    token_type: TokenType,
    description: String,
) -> Result<ledger_entry::Model>
where
    C: ConnectionTrait,
{
    if price <= 0 {
        return Err(Error::InvalidAmount { amount: price });
    }

    let account = Account::find_by_id(account_id)
        .one(conn)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "account",
            id: account_id.to_string(),
        })?;

    let debit = Account::update_many()
        .col_expr(
            account::Column::CurrentBalance,
            Expr::col(account::Column::CurrentBalance).sub(price),
        )
        .filter(account::Column::Id.eq(account_id))
        .filter(account::Column::CurrentBalance.gte(price))
        .exec(conn)
        .await?;

    if debit.rows_affected == 0 {
        return Err(Error::InsufficientBalance {
            current: account.current_balance,
            required: price,
        });
    }

    insert_entry(conn, account_id, -price, token_type, description).await
}

/// Records a ledger entry in its own database transaction.
///
/// Convenience wrapper over [`record_in`] for callers that are not composing
/// a larger atomic unit.
pub async fn record(
    db: &DatabaseConnection,
    account_id: i64,
    amount: i64,
    token_type: TokenType,
    description: String,
) -> Result<ledger_entry::Model> {
    let txn = db.begin().await?;
    let entry = record_in(&txn, account_id, amount, token_type, description).await?;
    txn.commit().await?;
    Ok(entry)
}

/// Manual admin correction or penalty, with caller-chosen sign and category.
///
/// Admin-only. Uses the unguarded path: a penalty may drive the target
/// balance negative.
pub async fn adjust(
    db: &DatabaseConnection,
    actor: &Actor,
    target_account_id: i64,
    amount: i64,
    token_type: TokenType,
    reason: String,
) -> Result<ledger_entry::Model> {
    policy::require_admin(actor, "adjust")?;
    record(db, target_account_id, amount, token_type, reason).await
}

/// All entries for an account, newest first.
pub async fn entries_for_account(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<Vec<ledger_entry::Model>> {
    LedgerEntry::find()
        .filter(ledger_entry::Column::AccountId.eq(account_id))
        .order_by_desc(ledger_entry::Column::CreatedAt)
        .order_by_desc(ledger_entry::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// The most recent `limit` entries for an account.
pub async fn recent_entries(
    db: &DatabaseConnection,
    account_id: i64,
    limit: u64,
) -> Result<Vec<ledger_entry::Model>> {
    LedgerEntry::find()
        .filter(ledger_entry::Column::AccountId.eq(account_id))
        .order_by_desc(ledger_entry::Column::CreatedAt)
        .order_by_desc(ledger_entry::Column::Id)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

async fn insert_entry<C>(
    conn: &C,
    account_id: i64,
    amount: i64,
    token_type: TokenType,
    description: String,
) -> Result<ledger_entry::Model>
where
    C: ConnectionTrait,
{
    ledger_entry::ActiveModel {
        account_id: Set(account_id),
        amount: Set(amount),
        token_type: Set(token_type),
        description: Set(description),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_record_rejects_zero_amount() -> Result<()> {
        let db = setup_test_db().await?;
        let account = create_test_employee(&db, "zero").await?;

        let result = record(
            &db,
            account.id,
            0,
            TokenType::Performance,
            "nothing".to_string(),
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount: 0 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_record_unknown_account() -> Result<()> {
        let db = setup_test_db().await?;

        let result = record(&db, 999, 50, TokenType::Performance, "ghost".to_string()).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_balance_equals_sum_of_entries() -> Result<()> {
        let db = setup_test_db().await?;
        let account = create_test_employee(&db, "sum").await?;
        let admin = admin_actor(&db).await?;

        record(&db, account.id, 300, TokenType::Performance, "a".to_string()).await?;
        record(&db, account.id, 120, TokenType::Cultural, "b".to_string()).await?;
        adjust(
            &db,
            &admin,
            account.id,
            -70,
            TokenType::Admin,
            "penalty".to_string(),
        )
        .await?;

        let entries = entries_for_account(&db, account.id).await?;
        let sum: i64 = entries.iter().map(|e| e.amount).sum();
        let refreshed = fetch_account(&db, account.id).await?;
        assert_eq!(refreshed.current_balance, sum);
        assert_eq!(refreshed.current_balance, 350);

        Ok(())
    }

    #[tokio::test]
    async fn test_points_exclude_debits() -> Result<()> {
        let db = setup_test_db().await?;
        let account = create_test_employee(&db, "points").await?;
        let admin = admin_actor(&db).await?;

        record(&db, account.id, 200, TokenType::Idea, "credit".to_string()).await?;
        adjust(
            &db,
            &admin,
            account.id,
            -50,
            TokenType::Admin,
            "correction".to_string(),
        )
        .await?;

        let refreshed = fetch_account(&db, account.id).await?;
        // total_points counts only positive entries
        assert_eq!(refreshed.total_points, 200);
        assert_eq!(refreshed.current_balance, 150);

        Ok(())
    }

    #[tokio::test]
    async fn test_level_recomputed_on_credit() -> Result<()> {
        let db = setup_test_db().await?;
        let account = create_test_employee(&db, "level").await?;
        assert_eq!(account.level, 1);

        record(&db, account.id, 499, TokenType::Performance, "a".to_string()).await?;
        assert_eq!(fetch_account(&db, account.id).await?.level, 1);

        record(&db, account.id, 1, TokenType::Performance, "b".to_string()).await?;
        assert_eq!(fetch_account(&db, account.id).await?.level, 2);

        record(
            &db,
            account.id,
            1500,
            TokenType::Performance,
            "c".to_string(),
        )
        .await?;
        assert_eq!(fetch_account(&db, account.id).await?.level, 5);

        Ok(())
    }

    #[tokio::test]
    async fn test_level_tracks_stored_points_within_one_transaction() -> Result<()> {
        let db = setup_test_db().await?;
        let account = create_test_employee(&db, "stacked").await?;

        // Two credits in one unit of work: the second must see the first's
        // increment, not the snapshot from before it
        let txn = db.begin().await?;
        record_in(&txn, account.id, 300, TokenType::Performance, "a".to_string()).await?;
        record_in(&txn, account.id, 300, TokenType::Performance, "b".to_string()).await?;
        txn.commit().await?;

        let refreshed = fetch_account(&db, account.id).await?;
        assert_eq!(refreshed.total_points, 600);
        assert_eq!(refreshed.level, policy::level_for(refreshed.total_points));
        assert_eq!(refreshed.level, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_debit_does_not_touch_level_or_points() -> Result<()> {
        let db = setup_test_db().await?;
        let account = create_test_employee(&db, "debit").await?;
        let admin = admin_actor(&db).await?;

        record(&db, account.id, 600, TokenType::Performance, "up".to_string()).await?;
        let before = fetch_account(&db, account.id).await?;
        assert_eq!(before.level, 2);

        adjust(
            &db,
            &admin,
            account.id,
            -600,
            TokenType::Admin,
            "down".to_string(),
        )
        .await?;
        let after = fetch_account(&db, account.id).await?;
        assert_eq!(after.level, 2);
        assert_eq!(after.total_points, 600);
        assert_eq!(after.current_balance, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_adjust_requires_admin() -> Result<()> {
        let db = setup_test_db().await?;
        let account = create_test_employee(&db, "victim").await?;
        let employee = Actor::employee(account.id);

        let result = adjust(
            &db,
            &employee,
            account.id,
            100,
            TokenType::Admin,
            "self-serve".to_string(),
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Forbidden { .. }));

        // No entry was written
        assert!(entries_for_account(&db, account.id).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_adjust_may_drive_balance_negative() -> Result<()> {
        let db = setup_test_db().await?;
        let account = create_test_employee(&db, "negative").await?;
        let admin = admin_actor(&db).await?;

        adjust(
            &db,
            &admin,
            account.id,
            -250,
            TokenType::Admin,
            "equipment damage".to_string(),
        )
        .await?;

        let refreshed = fetch_account(&db, account.id).await?;
        assert_eq!(refreshed.current_balance, -250);
        assert_eq!(refreshed.total_points, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_record_spend_guard() -> Result<()> {
        let db = setup_test_db().await?;
        let account = create_test_employee(&db, "spender").await?;
        record(
            &db,
            account.id,
            100,
            TokenType::Performance,
            "seed".to_string(),
        )
        .await?;

        // Spending more than the balance is refused with no side effects
        let result =
            record_spend_in(&db, account.id, 150, TokenType::Purchase, "big".to_string()).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InsufficientBalance {
                current: 100,
                required: 150
            }
        ));
        assert_eq!(fetch_account(&db, account.id).await?.current_balance, 100);

        // Spending exactly the balance succeeds and leaves zero
        record_spend_in(
            &db,
            account.id,
            100,
            TokenType::Purchase,
            "exact".to_string(),
        )
        .await?;
        assert_eq!(fetch_account(&db, account.id).await?.current_balance, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_entries_are_append_only_newest_first() -> Result<()> {
        let db = setup_test_db().await?;
        let account = create_test_employee(&db, "history").await?;

        record(
            &db,
            account.id,
            10,
            TokenType::Performance,
            "first".to_string(),
        )
        .await?;
        record(
            &db,
            account.id,
            20,
            TokenType::Cultural,
            "second".to_string(),
        )
        .await?;

        let entries = entries_for_account(&db, account.id).await?;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].description, "second");
        assert_eq!(entries[1].description, "first");

        let recent = recent_entries(&db, account.id, 1).await?;
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].description, "second");

        Ok(())
    }
}
