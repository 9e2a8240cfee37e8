//! Mission submission entity - An employee's claim of mission completion.
//!
//! Gated through an approval state machine: PENDING is the only state an
//! admin may approve or reject from; APPROVED and REJECTED are terminal.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Approval state of a submission, stored as a string column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum SubmissionStatus {
    /// Waiting for admin review
    #[sea_orm(string_value = "PENDING")]
    Pending,
    /// Approved; the mission reward has been credited exactly once
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    /// Rejected; the employee may submit again
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

/// Mission submission database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mission_submissions")]
pub struct Model {
    /// Unique identifier for the submission
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Mission being claimed
    pub mission_id: i64,
    /// Employee who submitted the report
    pub account_id: i64,
    /// Optional link to proof documents
    pub proof_link: Option<String>,
    /// Optional attached proof image path
    pub proof_image: Option<String>,
    /// Employee's notes about the completed work
    pub description: String,
    /// Current approval state
    pub status: SubmissionStatus,
    /// Optional feedback written by the reviewing admin
    pub admin_feedback: Option<String>,
    /// When the report was submitted
    pub submitted_at: DateTimeUtc,
}

/// Defines relationships between MissionSubmission and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each submission belongs to one mission
    #[sea_orm(
        belongs_to = "super::mission::Entity",
        from = "Column::MissionId",
        to = "super::mission::Column::Id"
    )]
    Mission,
    /// Each submission belongs to one account
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,
}

impl Related<super::mission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mission.def()
    }
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
