//! Product entity and the inputs that create and modify it.
//!
//! A [`Product`] is the tenant-scoped record every [`ProductStore`]
//! persists. Its audit stamps obey two rules that the methods here
//! maintain:
//!
//! - `updated_at >= created_at`
//! - `updated_at` never decreases across successive writes
//!
//! [`ProductStore`]: crate::ProductStore

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ActorId, RecordId};

/// A catalogue product owned by one tenant.
///
/// The unit price is a [`Decimal`] so arithmetic on it is exact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Identifier, unique within the tenant and immutable.
    pub id: RecordId,
    /// Display name. Never blank.
    pub name: String,
    /// Stock-keeping unit, the secondary key. Never blank.
    pub sku: String,
    /// Free-form category; empty when not supplied.
    pub category: String,
    /// Price of one unit.
    pub unit_price: Decimal,
    /// Stock level below which the product should be flagged.
    pub stock_warning_threshold: i32,
    /// Soft-delete flag. Deleted products are invisible to every read path.
    pub is_deleted: bool,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// Who created the product.
    pub created_by: ActorId,
    /// When the product was last written.
    pub updated_at: DateTime<Utc>,
    /// Who last wrote the product.
    pub updated_by: ActorId,
}

impl Product {
    /// Builds a fresh product from validated input, stamping both audit
    /// pairs with the same actor and time.
    #[must_use]
    pub fn from_new(id: RecordId, input: NewProduct, actor: &ActorId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            sku: input.sku,
            category: input.category,
            unit_price: input.unit_price,
            stock_warning_threshold: input.stock_warning_threshold,
            is_deleted: false,
            created_at: now,
            created_by: actor.clone(),
            updated_at: now,
            updated_by: actor.clone(),
        }
    }

    /// Replaces the mutable fields from `update` and re-stamps the record.
    ///
    /// `id`, `sku` and the creation stamps are left untouched.
    pub fn apply(&mut self, update: ProductUpdate, actor: &ActorId, now: DateTime<Utc>) {
        self.name = update.name;
        self.category = update.category;
        self.unit_price = update.unit_price;
        self.stock_warning_threshold = update.stock_warning_threshold;
        self.touch(actor, now);
    }

    /// Re-stamps `updated_by` and `updated_at`.
    ///
    /// A clock that runs backwards does not move `updated_at` backwards:
    /// the stamp becomes `max(now, updated_at)`.
    pub fn touch(&mut self, actor: &ActorId, now: DateTime<Utc>) {
        self.updated_at = now.max(self.updated_at).max(self.created_at);
        self.updated_by = actor.clone();
    }

    /// Sets the soft-delete flag and re-stamps the record.
    pub fn mark_deleted(&mut self, actor: &ActorId, now: DateTime<Utc>) {
        self.is_deleted = true;
        self.touch(actor, now);
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(on(String, into))]
pub struct NewProduct {
    /// Display name. Required.
    pub name: String,
    /// Stock-keeping unit. Required.
    pub sku: String,
    /// Optional category.
    #[serde(default)]
    #[builder(default)]
    pub category: String,
    /// Price of one unit.
    #[serde(default)]
    #[builder(default)]
    pub unit_price: Decimal,
    /// Stock warning threshold.
    #[serde(default)]
    #[builder(default)]
    pub stock_warning_threshold: i32,
}

/// Input for replacing a product's mutable fields.
///
/// The SKU is not part of the update: it is fixed at creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(on(String, into))]
pub struct ProductUpdate {
    /// Display name. Required.
    pub name: String,
    /// Category.
    #[serde(default)]
    #[builder(default)]
    pub category: String,
    /// Price of one unit.
    #[serde(default)]
    #[builder(default)]
    pub unit_price: Decimal,
    /// Stock warning threshold.
    #[serde(default)]
    #[builder(default)]
    pub stock_warning_threshold: i32,
}
