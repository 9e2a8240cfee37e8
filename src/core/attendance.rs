//! Attendance workflow - Daily check-in/check-out with late penalties.
//!
//! One record per account per day. A check-in later than the grace window
//! posts a discipline debit to the ledger in the same unit of work as the
//! attendance row, so the running balance stays the single source of truth
//! for penalties too.

use crate::{
    core::ledger,
    core::policy::Actor,
    entities::{Attendance, TokenType, attendance},
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveTime, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Status label for an on-time check-in.
pub const STATUS_ON_TIME: &str = "ON_TIME";
/// Status label for a late check-in.
pub const STATUS_LATE: &str = "LATE";

/// When the workday starts and how much lateness is tolerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendancePolicy {
    /// Workday start; delay counts from here
    pub workday_start: NaiveTime,
    /// Minutes of delay that incur no penalty
    pub grace_minutes: i64,
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        Self {
            // 09:00 is always a valid wall-clock time
            #[allow(clippy::unwrap_used)]
            workday_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            grace_minutes: 15,
        }
    }
}

impl AttendancePolicy {
    /// Minutes of delay for a check-in time, zero when early.
    #[must_use]
    pub fn delay_minutes(&self, check_in: NaiveTime) -> i64 {
        (check_in - self.workday_start).num_minutes().max(0)
    }

    /// Signed point delta for a given delay: zero within the grace window,
    /// minus one point per minute beyond it.
    #[must_use]
    pub fn daily_points(&self, delay_minutes: i64) -> i64 {
        if delay_minutes > self.grace_minutes {
            -(delay_minutes - self.grace_minutes)
        } else {
            0
        }
    }
}

/// Records the day's check-in for the acting account.
///
/// A second check-in on the same date is a conflict. A late arrival beyond
/// the grace window debits the ledger (DISCIPLINE) atomically with the
/// attendance row and marks the penalty as applied.
pub async fn check_in(
    db: &DatabaseConnection,
    actor: &Actor,
    now: DateTime<Utc>,
    policy: &AttendancePolicy,
) -> Result<attendance::Model> {
    let date = now.date_naive();
    let time = now.time();

    let existing = Attendance::find()
        .filter(attendance::Column::AccountId.eq(actor.account_id))
        .filter(attendance::Column::Date.eq(date))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(Error::Conflict {
            message: format!("already checked in on {date}"),
        });
    }

    let delay = policy.delay_minutes(time);
    let daily_points = policy.daily_points(delay);
    let status = if daily_points < 0 {
        STATUS_LATE
    } else {
        STATUS_ON_TIME
    };

    let txn = db.begin().await?;

    if daily_points < 0 {
        ledger::record_in(
            &txn,
            actor.account_id,
            daily_points,
            TokenType::Discipline,
            format!("Late arrival on {date}: {delay} min"),
        )
        .await?;
    }

    let record = attendance::ActiveModel {
        account_id: Set(actor.account_id),
        date: Set(date),
        check_in: Set(time),
        check_out: Set(None),
        delay_minutes: Set(i32::try_from(delay).unwrap_or(i32::MAX)),
        status: Set(status.to_string()),
        daily_points: Set(i32::try_from(daily_points).unwrap_or(i32::MIN)),
        penalty_applied: Set(daily_points < 0),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    if daily_points < 0 {
        info!(
            account_id = actor.account_id,
            delay, penalty = daily_points, "late check-in penalized"
        );
    }
    Ok(record)
}

/// Records the day's check-out.
///
/// # Errors
/// Returns not-found when there is no check-in today and a conflict when the
/// account already checked out.
pub async fn check_out(
    db: &DatabaseConnection,
    actor: &Actor,
    now: DateTime<Utc>,
) -> Result<attendance::Model> {
    let date = now.date_naive();

    let record = Attendance::find()
        .filter(attendance::Column::AccountId.eq(actor.account_id))
        .filter(attendance::Column::Date.eq(date))
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "attendance record",
            id: date.to_string(),
        })?;

    if record.check_out.is_some() {
        return Err(Error::Conflict {
            message: format!("already checked out on {date}"),
        });
    }

    let mut active: attendance::ActiveModel = record.into();
    active.check_out = Set(Some(now.time()));
    active.update(db).await.map_err(Into::into)
}

/// All attendance records for an account, newest first.
pub async fn attendance_for_account(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<Vec<attendance::Model>> {
    Attendance::find()
        .filter(attendance::Column::AccountId.eq(account_id))
        .order_by_desc(attendance::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}
