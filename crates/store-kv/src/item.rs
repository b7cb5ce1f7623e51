//! Mapping between [`Product`] and stored items.
//!
//! Reading is lenient: a missing string attribute reads as empty, a
//! missing or unparseable number as zero and a missing flag as `false`.
//! A missing or unparseable timestamp borrows the other audit stamp, or
//! the Unix epoch when neither is usable, so a damaged item still lists.

use chrono::{DateTime, SecondsFormat, Utc};
use stockroom_store::{ActorId, Product, RecordId, TenantId};

use crate::{
    client::{AttributeValue, Item},
    keys::{self, PK, SK},
};

const ID: &str = "Id";
const NAME: &str = "Name";
const SKU: &str = "Sku";
const CATEGORY: &str = "Category";
const UNIT_PRICE: &str = "UnitPrice";
const STOCK_WARNING_THRESHOLD: &str = "StockWarningThreshold";
const IS_DELETED: &str = "IsDeleted";
const CREATED_AT: &str = "CreatedAt";
const CREATED_BY: &str = "CreatedBy";
const UPDATED_AT: &str = "UpdatedAt";
const UPDATED_BY: &str = "UpdatedBy";

/// Builds the stored item for `product` in `tenant`'s partition.
#[must_use]
pub fn to_item(tenant: &TenantId, product: &Product) -> Item {
    let key = keys::product_key(tenant, &product.id);
    Item::from([
        (PK.to_owned(), AttributeValue::S(key.partition)),
        (SK.to_owned(), AttributeValue::S(key.sort)),
        (ID.to_owned(), AttributeValue::S(product.id.to_string())),
        (NAME.to_owned(), AttributeValue::S(product.name.clone())),
        (SKU.to_owned(), AttributeValue::S(product.sku.clone())),
        (CATEGORY.to_owned(), AttributeValue::S(product.category.clone())),
        (UNIT_PRICE.to_owned(), AttributeValue::N(product.unit_price.to_string())),
        (
            STOCK_WARNING_THRESHOLD.to_owned(),
            AttributeValue::N(product.stock_warning_threshold.to_string()),
        ),
        (IS_DELETED.to_owned(), AttributeValue::Bool(product.is_deleted)),
        (CREATED_AT.to_owned(), AttributeValue::S(format_time(product.created_at))),
        (CREATED_BY.to_owned(), AttributeValue::S(product.created_by.to_string())),
        (UPDATED_AT.to_owned(), AttributeValue::S(format_time(product.updated_at))),
        (UPDATED_BY.to_owned(), AttributeValue::S(product.updated_by.to_string())),
    ])
}

/// Reads a product back from a stored item.
///
/// The id falls back to the one embedded in the sort key when the `Id`
/// attribute is absent. `updated_at` never precedes `created_at`.
#[must_use]
pub fn from_item(item: &Item) -> Product {
    let id = match item.get(ID).and_then(AttributeValue::as_s) {
        Some(id) => RecordId::from(id),
        None => string(item, SK)
            .as_deref()
            .and_then(keys::product_id_from_sort_key)
            .unwrap_or_else(|| RecordId::from("")),
    };

    let created = time(item, CREATED_AT, &id);
    let updated = time(item, UPDATED_AT, &id);
    let created_at = created.or(updated).unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    let updated_at = updated.unwrap_or(created_at).max(created_at);

    Product {
        name: string(item, NAME).unwrap_or_default(),
        sku: string(item, SKU).unwrap_or_default(),
        category: string(item, CATEGORY).unwrap_or_default(),
        unit_price: number(item, UNIT_PRICE).unwrap_or_default(),
        stock_warning_threshold: number(item, STOCK_WARNING_THRESHOLD).unwrap_or_default(),
        is_deleted: item.get(IS_DELETED).and_then(AttributeValue::as_bool).unwrap_or(false),
        created_at,
        created_by: ActorId::new(string(item, CREATED_BY).unwrap_or_default()),
        updated_at,
        updated_by: ActorId::new(string(item, UPDATED_BY).unwrap_or_default()),
        id,
    }
}

fn string(item: &Item, name: &str) -> Option<String> {
    item.get(name).and_then(AttributeValue::as_s).map(str::to_owned)
}

fn number<T: std::str::FromStr>(item: &Item, name: &str) -> Option<T> {
    item.get(name).and_then(AttributeValue::as_n).and_then(|n| n.trim().parse().ok())
}

fn time(item: &Item, name: &'static str, id: &RecordId) -> Option<DateTime<Utc>> {
    let Some(raw) = item.get(name).and_then(AttributeValue::as_s) else {
        tracing::warn!(%id, attribute = name, "item has no timestamp");
        return None;
    };
    match DateTime::parse_from_rfc3339(raw) {
        Ok(t) => Some(t.with_timezone(&Utc)),
        Err(e) => {
            tracing::warn!(%id, attribute = name, error = %e, "item has an invalid timestamp");
            None
        },
    }
}

fn format_time(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
