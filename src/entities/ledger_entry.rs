//! Ledger entry entity - The append-only fact log of all point movements.
//!
//! Every reward, purchase and manual adjustment lands here as one immutable
//! signed entry. The crate exposes no update or delete for this table: a
//! mistaken entry is corrected with a compensating entry, never edited.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category tag carried by every ledger entry, stored as a string column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum TokenType {
    /// Reward for work performance
    #[sea_orm(string_value = "PERFORMANCE")]
    Performance,
    /// Discipline rewards and attendance penalties
    #[sea_orm(string_value = "DISCIPLINE")]
    Discipline,
    /// Cultural participation rewards
    #[sea_orm(string_value = "CULTURAL")]
    Cultural,
    /// Ideas and creative contributions
    #[sea_orm(string_value = "IDEA")]
    Idea,
    /// Shop spending
    #[sea_orm(string_value = "PURCHASE")]
    Purchase,
    /// Manual admin correction or penalty
    #[sea_orm(string_value = "ADMIN")]
    Admin,
}

/// Ledger entry database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Account this entry belongs to, fixed at creation
    pub account_id: i64,
    /// Signed amount: positive for rewards, negative for spending/penalties
    pub amount: i64,
    /// Category tag of the movement
    pub token_type: TokenType,
    /// Human-readable description of the movement
    pub description: String,
    /// When the entry was recorded
    pub created_at: DateTimeUtc,
}

/// Defines relationships between LedgerEntry and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry belongs to one account
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
