//! Message entity - Internal store-and-poll messages between accounts.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Message database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    /// Unique identifier for the message
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Sending account
    pub sender_id: i64,
    /// Receiving account
    pub recipient_id: i64,
    /// Subject line, may be empty
    pub subject: String,
    /// Message body
    pub body: String,
    /// Whether the recipient has read the message
    pub is_read: bool,
    /// When the message was sent
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Message and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Sender account
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::SenderId",
        to = "super::account::Column::Id"
    )]
    Sender,
    /// Recipient account
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::RecipientId",
        to = "super::account::Column::Id"
    )]
    Recipient,
}

impl ActiveModelBehavior for ActiveModel {}
