//! Training session entity - A timed run through a catalog course.
//!
//! A session is "open" while `end_time` is null; an account may have at most
//! one open session. Approval (and the reward it pays) is a separate
//! admin-gated step after the session is finished.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Training session database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "training_sessions")]
pub struct Model {
    /// Unique identifier for the session
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Employee taking the course
    pub account_id: i64,
    /// Course topic title, matching the catalog
    pub topic: String,
    /// When the session started
    pub start_time: DateTimeUtc,
    /// When the session finished; null while the session is open
    pub end_time: Option<DateTimeUtc>,
    /// Elapsed wall-clock minutes, computed on finish (truncated)
    pub duration_minutes: i32,
    /// Whether an admin has verified the session and paid the reward
    pub is_approved: bool,
}

/// Defines relationships between TrainingSession and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each session belongs to one account
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
