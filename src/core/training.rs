//! Training workflow - Timed catalog courses with admin-verified payout.
//!
//! Completion and payment are two phases on purpose: finishing a session
//! only records the elapsed time, and an admin approves it later, which is
//! when the reward is credited. An account can run at most one open session.

use crate::{
    core::{
        ledger,
        policy::{self, Actor},
    },
    entities::{TokenType, TrainingSession, training_session},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// A catalog course an employee can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Course {
    /// Catalog identifier
    pub id: u32,
    /// Course topic, stored on sessions
    pub title: &'static str,
    /// Nominal length in minutes
    pub duration_minutes: i64,
    /// Reward credited when an admin approves a finished session
    pub reward_amount: i64,
}

/// The fixed course catalog.
pub const COURSES: [Course; 3] = [
    Course {
        id: 1,
        title: "Time Management and Productivity",
        duration_minutes: 45,
        reward_amount: 150,
    },
    Course {
        id: 2,
        title: "Teamwork in Small Companies",
        duration_minutes: 30,
        reward_amount: 100,
    },
    Course {
        id: 3,
        title: "Introduction to Security Awareness",
        duration_minutes: 60,
        reward_amount: 200,
    },
];

/// Looks up a catalog course by ID.
#[must_use]
pub fn course_by_id(course_id: u32) -> Option<&'static Course> {
    COURSES.iter().find(|c| c.id == course_id)
}

fn course_by_title(title: &str) -> Option<&'static Course> {
    COURSES.iter().find(|c| c.title == title)
}

/// The open session view shown in the catalog: the running course and how
/// many seconds of its nominal length remain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    /// Course the open session belongs to
    pub course: Course,
    /// Seconds left of the nominal duration, clamped at zero
    pub remaining_seconds: i64,
    /// The open session row
    pub session: training_session::Model,
}

/// Returns the account's open session, if any.
pub async fn open_session(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<Option<training_session::Model>> {
    TrainingSession::find()
        .filter(training_session::Column::AccountId.eq(account_id))
        .filter(training_session::Column::EndTime.is_null())
        .one(db)
        .await
        .map_err(Into::into)
}

/// The catalog plus the account's open session with its remaining time.
pub async fn catalog(
    db: &DatabaseConnection,
    account_id: i64,
    now: DateTime<Utc>,
) -> Result<(Vec<Course>, Option<ActiveSession>)> {
    let active = match open_session(db, account_id).await? {
        Some(session) => course_by_title(&session.topic).map(|course| {
            let elapsed = (now - session.start_time).num_seconds();
            ActiveSession {
                course: *course,
                remaining_seconds: (course.duration_minutes * 60 - elapsed).max(0),
                session,
            }
        }),
        None => None,
    };

    Ok((COURSES.to_vec(), active))
}

/// Starts a session for a catalog course.
///
/// # Errors
/// Returns not-found for an unknown course and a conflict when the account
/// already has an open session.
pub async fn start(
    db: &DatabaseConnection,
    actor: &Actor,
    course_id: u32,
    now: DateTime<Utc>,
) -> Result<training_session::Model> {
    let course = course_by_id(course_id).ok_or_else(|| Error::NotFound {
        entity: "course",
        id: course_id.to_string(),
    })?;

    if open_session(db, actor.account_id).await?.is_some() {
        return Err(Error::Conflict {
            message: "an unfinished training session is already open".to_string(),
        });
    }

    training_session::ActiveModel {
        account_id: Set(actor.account_id),
        topic: Set(course.title.to_string()),
        start_time: Set(now),
        end_time: Set(None),
        duration_minutes: Set(0),
        is_approved: Set(false),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Finishes the open session for a course, recording the elapsed minutes
/// (truncated). No reward is paid here; that is the admin approval's job.
pub async fn finish(
    db: &DatabaseConnection,
    actor: &Actor,
    course_id: u32,
    now: DateTime<Utc>,
) -> Result<training_session::Model> {
    let course = course_by_id(course_id).ok_or_else(|| Error::NotFound {
        entity: "course",
        id: course_id.to_string(),
    })?;

    let session = TrainingSession::find()
        .filter(training_session::Column::AccountId.eq(actor.account_id))
        .filter(training_session::Column::Topic.eq(course.title))
        .filter(training_session::Column::EndTime.is_null())
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "open training session",
            id: course.title.to_string(),
        })?;

    let duration = (now - session.start_time).num_minutes();
    let mut active: training_session::ActiveModel = session.into();
    active.end_time = Set(Some(now));
    active.duration_minutes = Set(i32::try_from(duration.max(0)).unwrap_or(i32::MAX));
    active.update(db).await.map_err(Into::into)
}

/// Verifies a finished session and credits the course reward. Admin-only.
///
/// The approval flag and the ledger credit commit together. A session can be
/// approved at most once, and only after it has finished.
pub async fn approve_session(
    db: &DatabaseConnection,
    actor: &Actor,
    session_id: i64,
) -> Result<training_session::Model> {
    policy::require_admin(actor, "approve_session")?;

    let txn = db.begin().await?;

    let session = TrainingSession::find_by_id(session_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "training session",
            id: session_id.to_string(),
        })?;

    if session.end_time.is_none() {
        return Err(Error::Conflict {
            message: "session has not finished yet".to_string(),
        });
    }
    if session.is_approved {
        return Err(Error::Conflict {
            message: "session is already approved".to_string(),
        });
    }

    let course = course_by_title(&session.topic).ok_or_else(|| Error::NotFound {
        entity: "course",
        id: session.topic.clone(),
    })?;

    ledger::record_in(
        &txn,
        session.account_id,
        course.reward_amount,
        TokenType::Performance,
        format!("Training: {}", course.title),
    )
    .await?;

    let mut active: training_session::ActiveModel = session.into();
    active.is_approved = Set(true);
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    info!(
        session_id,
        course = course.title,
        reward = course.reward_amount,
        "training session approved"
    );
    Ok(updated)
}

/// All sessions for an account, newest first.
pub async fn sessions_for_account(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<Vec<training_session::Model>> {
    TrainingSession::find()
        .filter(training_session::Column::AccountId.eq(account_id))
        .order_by_desc(training_session::Column::StartTime)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{core::ledger::entries_for_account, test_utils::*};
    use chrono::Duration;

    #[tokio::test]
    async fn test_start_unknown_course() -> Result<()> {
        let db = setup_test_db().await?;
        let employee = create_test_employee(&db, "student").await?;

        let result = start(&db, &Actor::employee(employee.id), 99, chrono::Utc::now()).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_single_open_session_invariant() -> Result<()> {
        let db = setup_test_db().await?;
        let employee = create_test_employee(&db, "busy").await?;
        let actor = Actor::employee(employee.id);
        let now = chrono::Utc::now();

        start(&db, &actor, 1, now).await?;
        let second = start(&db, &actor, 2, now).await;
        assert!(matches!(second.unwrap_err(), Error::Conflict { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_finish_computes_truncated_duration() -> Result<()> {
        let db = setup_test_db().await?;
        let employee = create_test_employee(&db, "timer").await?;
        let actor = Actor::employee(employee.id);
        let started = chrono::Utc::now();

        start(&db, &actor, 2, started).await?;
        // 35 minutes and 40 seconds later: truncates to 35
        let finished = finish(&db, &actor, 2, started + Duration::seconds(35 * 60 + 40)).await?;

        assert_eq!(finished.duration_minutes, 35);
        assert!(finished.end_time.is_some());
        assert!(!finished.is_approved);

        // Finishing frees the open-session slot
        assert!(open_session(&db, employee.id).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_finish_without_open_session() -> Result<()> {
        let db = setup_test_db().await?;
        let employee = create_test_employee(&db, "idle").await?;

        let result = finish(&db, &Actor::employee(employee.id), 1, chrono::Utc::now()).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_finish_wrong_course() -> Result<()> {
        let db = setup_test_db().await?;
        let employee = create_test_employee(&db, "mixed").await?;
        let actor = Actor::employee(employee.id);
        let now = chrono::Utc::now();

        start(&db, &actor, 1, now).await?;
        let result = finish(&db, &actor, 2, now + Duration::minutes(10)).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_finish_pays_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let employee = create_test_employee(&db, "unpaid").await?;
        let actor = Actor::employee(employee.id);
        let now = chrono::Utc::now();

        start(&db, &actor, 1, now).await?;
        finish(&db, &actor, 1, now + Duration::minutes(45)).await?;

        assert!(entries_for_account(&db, employee.id).await?.is_empty());
        assert_eq!(fetch_account(&db, employee.id).await?.current_balance, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_approval_credits_course_reward() -> Result<()> {
        let db = setup_test_db().await?;
        let admin = admin_actor(&db).await?;
        let employee = create_test_employee(&db, "graduate").await?;
        let actor = Actor::employee(employee.id);
        let now = chrono::Utc::now();

        start(&db, &actor, 3, now).await?;
        let session = finish(&db, &actor, 3, now + Duration::minutes(61)).await?;

        let approved = approve_session(&db, &admin, session.id).await?;
        assert!(approved.is_approved);

        let entries = entries_for_account(&db, employee.id).await?;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].amount, 200);
        assert_eq!(fetch_account(&db, employee.id).await?.current_balance, 200);

        // Approving twice is a conflict with no second credit
        let again = approve_session(&db, &admin, session.id).await;
        assert!(matches!(again.unwrap_err(), Error::Conflict { .. }));
        assert_eq!(entries_for_account(&db, employee.id).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_cannot_approve_open_session() -> Result<()> {
        let db = setup_test_db().await?;
        let admin = admin_actor(&db).await?;
        let employee = create_test_employee(&db, "running").await?;
        let session = start(&db, &Actor::employee(employee.id), 1, chrono::Utc::now()).await?;

        let result = approve_session(&db, &admin, session.id).await;
        assert!(matches!(result.unwrap_err(), Error::Conflict { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_approve_requires_admin() -> Result<()> {
        let db = setup_test_db().await?;
        let employee = create_test_employee(&db, "selfserve").await?;
        let actor = Actor::employee(employee.id);
        let now = chrono::Utc::now();

        start(&db, &actor, 1, now).await?;
        let session = finish(&db, &actor, 1, now + Duration::minutes(45)).await?;

        let result = approve_session(&db, &actor, session.id).await;
        assert!(matches!(result.unwrap_err(), Error::Forbidden { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_catalog_reports_remaining_time() -> Result<()> {
        let db = setup_test_db().await?;
        let employee = create_test_employee(&db, "watcher").await?;
        let actor = Actor::employee(employee.id);
        let now = chrono::Utc::now();

        let (courses, active) = catalog(&db, employee.id, now).await?;
        assert_eq!(courses.len(), 3);
        assert!(active.is_none());

        start(&db, &actor, 1, now).await?;
        let (_, active) = catalog(&db, employee.id, now + Duration::minutes(10)).await?;
        let active = active.unwrap();
        assert_eq!(active.course.id, 1);
        assert_eq!(active.remaining_seconds, 35 * 60);

        // Past the nominal end the remaining time clamps at zero
        let (_, active) = catalog(&db, employee.id, now + Duration::minutes(50)).await?;
        assert_eq!(active.unwrap().remaining_seconds, 0);

        Ok(())
    }
}
