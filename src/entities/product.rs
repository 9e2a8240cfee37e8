//! Product entity - Items purchasable in the internal shop.
//!
//! `stock` uses `-1` as the unlimited sentinel; `0` means sold out.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Shop category of a product, stored as a string column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ProductCategory {
    /// Gadgets and tools
    #[sea_orm(string_value = "GADGET")]
    Gadget,
    /// Daily consumables
    #[sea_orm(string_value = "DAILY")]
    Daily,
    /// Digital goods
    #[sea_orm(string_value = "DIGITAL")]
    Digital,
    /// Services and leave
    #[sea_orm(string_value = "SERVICE")]
    Service,
}

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the product
    pub name: String,
    /// Optional longer description
    pub description: Option<String>,
    /// Price in points, non-negative
    pub price: i64,
    /// Shop category
    pub category: ProductCategory,
    /// Remaining stock; `-1` means unlimited, `0` means sold out
    pub stock: i32,
    /// Optional product image path
    pub image_path: Option<String>,
    /// Whether the product is visible and purchasable
    pub is_active: bool,
    /// When the product was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One product has many purchases
    #[sea_orm(has_many = "super::purchase::Entity")]
    Purchases,
}

impl Related<super::purchase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchases.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
