//! Mission entity - Admin-defined tasks employees can claim rewards for.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Mission category; maps 1:1 to a ledger token type via the policy module.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum MissionCategory {
    /// Work performance missions
    #[sea_orm(string_value = "PERFORMANCE")]
    Performance,
    /// Discipline and process missions
    #[sea_orm(string_value = "DISCIPLINE")]
    Discipline,
    /// Cultural and team missions
    #[sea_orm(string_value = "CULTURAL")]
    Cultural,
    /// Idea and creativity missions
    #[sea_orm(string_value = "CREATIVE")]
    Creative,
}

/// Mission database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "missions")]
pub struct Model {
    /// Unique identifier for the mission
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Mission title, shown in reward descriptions
    pub title: String,
    /// Full description of the expected work
    pub description: String,
    /// Reward credited on approval, non-negative
    pub reward_amount: i64,
    /// Category, resolved to a token type on approval
    pub category: MissionCategory,
    /// Whether the mission is open for submissions
    pub is_active: bool,
    /// Submission deadline
    pub deadline: DateTimeUtc,
    /// When the mission was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Mission and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One mission has many submissions
    #[sea_orm(has_many = "super::mission_submission::Entity")]
    Submissions,
}

impl Related<super::mission_submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
