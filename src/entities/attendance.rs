//! Attendance entity - One check-in record per account per day.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Attendance database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance")]
pub struct Model {
    /// Unique identifier for the record
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Employee the record belongs to
    pub account_id: i64,
    /// Calendar date of the record; at most one per (account, date)
    pub date: Date,
    /// Check-in time
    pub check_in: Time,
    /// Check-out time, if the employee has left
    pub check_out: Option<Time>,
    /// Minutes past the configured workday start
    pub delay_minutes: i32,
    /// Derived label: `ON_TIME` or `LATE`
    pub status: String,
    /// Signed point delta for the day (0 on time, negative when late)
    pub daily_points: i32,
    /// Whether the late penalty was posted to the ledger
    pub penalty_applied: bool,
}

/// Defines relationships between Attendance and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each record belongs to one account
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
