//! Shop workflow - Product catalog management and the purchase flow.
//!
//! A purchase is one atomic unit: stock decrement (when finite), guarded
//! ledger debit, and the purchase row all commit together or not at all.
//! Both the stock decrement and the debit are conditional updates whose
//! affected-row count is checked, so concurrent buyers cannot oversell a
//! product or overspend a balance.

use crate::{
    core::{
        ledger,
        policy::{self, Actor},
    },
    entities::{
        Product, ProductCategory, Purchase, PurchaseStatus, TokenType, product, purchase,
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::info;

/// Sentinel stock value meaning "never runs out".
pub const UNLIMITED_STOCK: i32 = -1;

/// Input for creating or updating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Name of the product
    pub name: String,
    /// Optional longer description
    pub description: Option<String>,
    /// Price in points, non-negative
    pub price: i64,
    /// Shop category
    pub category: ProductCategory,
    /// Initial stock; [`UNLIMITED_STOCK`] for no limit
    pub stock: i32,
}

/// All active products, ordered alphabetically by name.
pub async fn active_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::IsActive.eq(true))
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a product by its unique ID.
pub async fn get_product(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new product. Admin-only.
///
/// # Errors
/// Returns a validation error for an empty name or negative price.
pub async fn create_product(
    db: &DatabaseConnection,
    actor: &Actor,
    new: NewProduct,
) -> Result<product::Model> {
    policy::require_admin(actor, "create_product")?;
    validate_product_input(&new)?;

    product::ActiveModel {
        name: Set(new.name.trim().to_string()),
        description: Set(new.description),
        price: Set(new.price),
        category: Set(new.category),
        stock: Set(new.stock),
        image_path: Set(None),
        is_active: Set(true),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Updates a product's listing fields. Admin-only.
pub async fn update_product(
    db: &DatabaseConnection,
    actor: &Actor,
    product_id: i64,
    new: NewProduct,
) -> Result<product::Model> {
    policy::require_admin(actor, "update_product")?;
    validate_product_input(&new)?;

    let mut product: product::ActiveModel = get_product(db, product_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "product",
            id: product_id.to_string(),
        })?
        .into();

    product.name = Set(new.name.trim().to_string());
    product.description = Set(new.description);
    product.price = Set(new.price);
    product.category = Set(new.category);
    product.stock = Set(new.stock);
    product.update(db).await.map_err(Into::into)
}

/// Hides a product from the shop. Admin-only; existing purchases keep their
/// reference.
pub async fn deactivate_product(
    db: &DatabaseConnection,
    actor: &Actor,
    product_id: i64,
) -> Result<product::Model> {
    policy::require_admin(actor, "deactivate_product")?;

    let mut product: product::ActiveModel = get_product(db, product_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "product",
            id: product_id.to_string(),
        })?
        .into();

    product.is_active = Set(false);
    product.update(db).await.map_err(Into::into)
}

/// Buys a product for the acting account.
///
/// Preconditions, checked in order with a distinct error each: the product
/// is active, it is in stock, and the balance covers the price. On success
/// the unit debits the ledger by `-price` tagged as a purchase, decrements
/// finite stock, and creates a PENDING purchase row.
pub async fn purchase(
    db: &DatabaseConnection,
    actor: &Actor,
    product_id: i64,
) -> Result<purchase::Model> {
    let txn = db.begin().await?;

    let product = Product::find_by_id(product_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "product",
            id: product_id.to_string(),
        })?;

    if !product.is_active {
        return Err(Error::InactiveProduct {
            product: product.name,
        });
    }
    if product.stock == 0 {
        return Err(Error::OutOfStock {
            product: product.name,
        });
    }

    if product.stock > 0 {
        // Conditional decrement; losing a race to the last unit surfaces as
        // out-of-stock, not a negative counter
        let decrement = Product::update_many()
            .col_expr(
                product::Column::Stock,
                Expr::col(product::Column::Stock).sub(1),
            )
            .filter(product::Column::Id.eq(product_id))
            .filter(product::Column::Stock.gt(0))
            .exec(&txn)
            .await?;
        if decrement.rows_affected == 0 {
            return Err(Error::OutOfStock {
                product: product.name,
            });
        }
    }

    // A zero-price giveaway produces no ledger movement
    if product.price > 0 {
        ledger::record_spend_in(
            &txn,
            actor.account_id,
            product.price,
            TokenType::Purchase,
            format!("Purchase: {}", product.name),
        )
        .await?;
    }

    let purchase = purchase::ActiveModel {
        account_id: Set(actor.account_id),
        product_id: Set(product_id),
        status: Set(PurchaseStatus::Pending),
        purchased_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    info!(
        account_id = actor.account_id,
        product = %product.name,
        price = product.price,
        "purchase completed"
    );
    Ok(purchase)
}

/// Moves a PENDING purchase to DELIVERED or CANCELED. Admin-only.
///
/// DELIVERED and CANCELED are terminal. Canceling does not refund by itself;
/// a refund is a separate admin adjustment against the ledger.
pub async fn set_purchase_status(
    db: &DatabaseConnection,
    actor: &Actor,
    purchase_id: i64,
    status: PurchaseStatus,
) -> Result<purchase::Model> {
    policy::require_admin(actor, "set_purchase_status")?;

    if status == PurchaseStatus::Pending {
        return Err(Error::Validation {
            message: "cannot move a purchase back to pending".to_string(),
        });
    }

    let purchase = Purchase::find_by_id(purchase_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "purchase",
            id: purchase_id.to_string(),
        })?;

    if purchase.status != PurchaseStatus::Pending {
        return Err(Error::Conflict {
            message: format!("purchase is already {:?}", purchase.status),
        });
    }

    let mut active: purchase::ActiveModel = purchase.into();
    active.status = Set(status);
    active.update(db).await.map_err(Into::into)
}

/// All purchases for an account, newest first.
pub async fn purchases_for_account(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<Vec<purchase::Model>> {
    Purchase::find()
        .filter(purchase::Column::AccountId.eq(account_id))
        .order_by_desc(purchase::Column::PurchasedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// All purchases across accounts, newest first. Admin-only.
pub async fn all_purchases(
    db: &DatabaseConnection,
    actor: &Actor,
) -> Result<Vec<purchase::Model>> {
    policy::require_admin(actor, "all_purchases")?;
    Purchase::find()
        .order_by_desc(purchase::Column::PurchasedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

fn validate_product_input(new: &NewProduct) -> Result<()> {
    if new.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "product name cannot be empty".to_string(),
        });
    }
    if new.price < 0 {
        return Err(Error::InvalidAmount { amount: new.price });
    }
    Ok(())
}
