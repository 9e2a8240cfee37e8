//! Purchase entity - A shop order awaiting delivery.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Delivery state of a purchase, stored as a string column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum PurchaseStatus {
    /// Paid, waiting for delivery
    #[sea_orm(string_value = "PENDING")]
    Pending,
    /// Handed over to the employee (terminal)
    #[sea_orm(string_value = "DELIVERED")]
    Delivered,
    /// Canceled by an admin (terminal, no automatic refund)
    #[sea_orm(string_value = "CANCELED")]
    Canceled,
}

/// Purchase database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    /// Unique identifier for the purchase
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Buyer
    pub account_id: i64,
    /// Product bought
    pub product_id: i64,
    /// Delivery state
    pub status: PurchaseStatus,
    /// When the purchase was made
    pub purchased_at: DateTimeUtc,
}

/// Defines relationships between Purchase and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each purchase belongs to one account
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,
    /// Each purchase belongs to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
