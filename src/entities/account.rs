//! Account entity - Represents an employee or admin in the rewards system.
//!
//! Each account carries the three derived counters the ledger maintains:
//! `current_balance` (spendable), `total_points` (reward-only, monotonic) and
//! `level` (derived from `total_points` via the level policy). These columns
//! are written only by the ledger engine, never by workflow code.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role of an account, stored as a string column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Role {
    /// Management: may define missions/products, approve work and adjust balances
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    /// Regular employee
    #[sea_orm(string_value = "EMPLOYEE")]
    Employee,
}

/// Account database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// Unique identifier for the account
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login name, unique across the directory
    #[sea_orm(unique)]
    pub username: String,
    /// Human-readable display name
    pub display_name: String,
    /// Role of the account (admin or employee)
    pub role: Role,
    /// Current level, derived from `total_points` by the level policy
    pub level: i32,
    /// Cumulative reward-only points; never debited
    pub total_points: i64,
    /// Spendable balance; debited by purchases and penalties
    pub current_balance: i64,
    /// Optional avatar image path (storage handled by the excluded media layer)
    pub avatar_path: Option<String>,
    /// When the account was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Account and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One account has many ledger entries
    #[sea_orm(has_many = "super::ledger_entry::Entity")]
    LedgerEntries,
    /// One account has many mission submissions
    #[sea_orm(has_many = "super::mission_submission::Entity")]
    MissionSubmissions,
    /// One account has many attendance records
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendance,
    /// One account has many training sessions
    #[sea_orm(has_many = "super::training_session::Entity")]
    TrainingSessions,
    /// One account has many purchases
    #[sea_orm(has_many = "super::purchase::Entity")]
    Purchases,
}

impl Related<super::ledger_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerEntries.def()
    }
}

impl Related<super::mission_submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MissionSubmissions.def()
    }
}

impl Related<super::purchase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchases.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
