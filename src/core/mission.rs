//! Mission workflow - Admin-defined tasks, submissions and the approval
//! state machine.
//!
//! Approval is the only path from a submission to a ledger credit, and it is
//! guarded so the credit happens exactly once: only a PENDING submission may
//! be approved, and the status flip and the ledger write share one database
//! transaction. Rejection never touches the ledger, and an APPROVED
//! submission cannot be rejected afterwards (no silent clawback).

use crate::{
    core::{
        ledger,
        policy::{self, Actor},
    },
    entities::{
        Mission, MissionCategory, MissionSubmission, SubmissionStatus, mission,
        mission_submission,
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Input for creating a mission.
#[derive(Debug, Clone)]
pub struct NewMission {
    /// Mission title, shown in reward descriptions
    pub title: String,
    /// Full description of the expected work
    pub description: String,
    /// Reward credited on approval, non-negative
    pub reward_amount: i64,
    /// Category, resolved to a token type on approval
    pub category: MissionCategory,
    /// Submission deadline
    pub deadline: sea_orm::prelude::DateTimeUtc,
}

/// Creates a new mission. Admin-only.
///
/// # Errors
/// Returns a validation error for an empty title or negative reward.
pub async fn create_mission(
    db: &DatabaseConnection,
    actor: &Actor,
    new: NewMission,
) -> Result<mission::Model> {
    policy::require_admin(actor, "create_mission")?;

    let title = new.title.trim().to_string();
    if title.is_empty() {
        return Err(Error::Validation {
            message: "mission title cannot be empty".to_string(),
        });
    }
    if new.reward_amount < 0 {
        return Err(Error::InvalidAmount {
            amount: new.reward_amount,
        });
    }

    mission::ActiveModel {
        title: Set(title),
        description: Set(new.description),
        reward_amount: Set(new.reward_amount),
        category: Set(new.category),
        is_active: Set(true),
        deadline: Set(new.deadline),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Closes a mission to further submissions. Admin-only.
pub async fn deactivate_mission(
    db: &DatabaseConnection,
    actor: &Actor,
    mission_id: i64,
) -> Result<mission::Model> {
    policy::require_admin(actor, "deactivate_mission")?;

    let mut mission: mission::ActiveModel = get_mission(db, mission_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "mission",
            id: mission_id.to_string(),
        })?
        .into();

    mission.is_active = Set(false);
    mission.update(db).await.map_err(Into::into)
}

/// Finds a mission by its unique ID.
pub async fn get_mission(
    db: &DatabaseConnection,
    mission_id: i64,
) -> Result<Option<mission::Model>> {
    Mission::find_by_id(mission_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Active missions the account can still claim: no PENDING or APPROVED
/// submission of theirs exists. Newest first.
pub async fn available_missions(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<Vec<mission::Model>> {
    let claimed: Vec<i64> = MissionSubmission::find()
        .select_only()
        .column(mission_submission::Column::MissionId)
        .filter(mission_submission::Column::AccountId.eq(account_id))
        .filter(
            mission_submission::Column::Status
                .is_in([SubmissionStatus::Pending, SubmissionStatus::Approved]),
        )
        .into_tuple()
        .all(db)
        .await?;

    Mission::find()
        .filter(mission::Column::IsActive.eq(true))
        .filter(mission::Column::Id.is_not_in(claimed))
        .order_by_desc(mission::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Submits a completion report for a mission.
///
/// At most one active (PENDING or APPROVED) submission may exist per
/// (account, mission); a REJECTED one does not block resubmission.
///
/// # Errors
/// Returns a conflict for duplicate active submissions and not-found /
/// conflict when the mission is missing or inactive.
pub async fn submit_report(
    db: &DatabaseConnection,
    actor: &Actor,
    mission_id: i64,
    proof_link: Option<String>,
    proof_image: Option<String>,
    description: String,
) -> Result<mission_submission::Model> {
    let mission = get_mission(db, mission_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "mission",
            id: mission_id.to_string(),
        })?;

    if !mission.is_active {
        return Err(Error::Conflict {
            message: format!("mission is no longer active: {}", mission.title),
        });
    }

    let active_exists = MissionSubmission::find()
        .filter(mission_submission::Column::MissionId.eq(mission_id))
        .filter(mission_submission::Column::AccountId.eq(actor.account_id))
        .filter(
            mission_submission::Column::Status
                .is_in([SubmissionStatus::Pending, SubmissionStatus::Approved]),
        )
        .one(db)
        .await?
        .is_some();

    if active_exists {
        return Err(Error::Conflict {
            message: format!("a report for '{}' is already in review", mission.title),
        });
    }

    mission_submission::ActiveModel {
        mission_id: Set(mission_id),
        account_id: Set(actor.account_id),
        proof_link: Set(proof_link),
        proof_image: Set(proof_image),
        description: Set(description),
        status: Set(SubmissionStatus::Pending),
        admin_feedback: Set(None),
        submitted_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Approves a PENDING submission and credits the mission reward. Admin-only.
///
/// The status transition and the ledger credit commit together or not at
/// all. Approving a submission that is not PENDING is a conflict, which is
/// what makes the reward credit idempotent: the second call cannot pay again.
pub async fn approve_submission(
    db: &DatabaseConnection,
    actor: &Actor,
    submission_id: i64,
    feedback: Option<String>,
) -> Result<mission_submission::Model> {
    policy::require_admin(actor, "approve_submission")?;

    let txn = db.begin().await?;

    let submission = MissionSubmission::find_by_id(submission_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "submission",
            id: submission_id.to_string(),
        })?;

    if submission.status != SubmissionStatus::Pending {
        return Err(Error::Conflict {
            message: format!("submission is already {:?}", submission.status),
        });
    }

    let mission = Mission::find_by_id(submission.mission_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "mission",
            id: submission.mission_id.to_string(),
        })?;

    // A zero-reward mission produces no ledger movement
    if mission.reward_amount > 0 {
        let token_type = policy::token_type_for(mission.category);
        ledger::record_in(
            &txn,
            submission.account_id,
            mission.reward_amount,
            token_type,
            format!("Reward: {}", mission.title),
        )
        .await?;
    }

    let mut active: mission_submission::ActiveModel = submission.into();
    active.status = Set(SubmissionStatus::Approved);
    active.admin_feedback = Set(feedback);
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    info!(
        submission_id,
        mission = %mission.title,
        reward = mission.reward_amount,
        "submission approved"
    );
    Ok(updated)
}

/// Rejects a PENDING submission. Admin-only, no ledger effect.
///
/// Rejecting an APPROVED submission is refused: the reward has already been
/// paid and this crate never claws credits back implicitly.
pub async fn reject_submission(
    db: &DatabaseConnection,
    actor: &Actor,
    submission_id: i64,
    feedback: Option<String>,
) -> Result<mission_submission::Model> {
    policy::require_admin(actor, "reject_submission")?;

    let submission = MissionSubmission::find_by_id(submission_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "submission",
            id: submission_id.to_string(),
        })?;

    if submission.status != SubmissionStatus::Pending {
        return Err(Error::Conflict {
            message: format!("submission is already {:?}", submission.status),
        });
    }

    let mut active: mission_submission::ActiveModel = submission.into();
    active.status = Set(SubmissionStatus::Rejected);
    active.admin_feedback = Set(feedback);
    active.update(db).await.map_err(Into::into)
}

/// All submissions for an account, newest first.
pub async fn submissions_for_account(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<Vec<mission_submission::Model>> {
    MissionSubmission::find()
        .filter(mission_submission::Column::AccountId.eq(account_id))
        .order_by_desc(mission_submission::Column::SubmittedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// All submissions across accounts, newest first. Admin-only.
pub async fn all_submissions(
    db: &DatabaseConnection,
    actor: &Actor,
) -> Result<Vec<mission_submission::Model>> {
    policy::require_admin(actor, "all_submissions")?;
    MissionSubmission::find()
        .order_by_desc(mission_submission::Column::SubmittedAt)
        .all(db)
        .await
        .map_err(Into::into)
}
