//! The native key-value table API the backend is written against.
//!
//! [`KeyValueClient`] describes exactly the calls [`KvProductStore`]
//! needs from a remote single-table database: put a whole item, get an
//! item by primary key, and run one page of a partition query. A
//! production deployment implements it over its database SDK;
//! [`LocalKeyValueClient`] implements it in process.
//!
//! [`KvProductStore`]: crate::KvProductStore
//! [`LocalKeyValueClient`]: crate::LocalKeyValueClient

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::KvClientError;

/// A single attribute value, in the table's native type system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// String.
    S(String),
    /// Number, carried in its decimal string form.
    N(String),
    /// Boolean.
    Bool(bool),
}

impl AttributeValue {
    /// Returns the string payload of an `S` value.
    #[must_use]
    pub fn as_s(&self) -> Option<&str> {
        match self {
            Self::S(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the decimal text of an `N` value.
    #[must_use]
    pub fn as_n(&self) -> Option<&str> {
        match self {
            Self::N(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the payload of a `Bool` value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

/// A stored item: attribute name to value.
pub type Item = BTreeMap<String, AttributeValue>;

/// Composite primary key of an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimaryKey {
    /// Partition key.
    pub partition: String,
    /// Sort key, ordered within the partition.
    pub sort: String,
}

/// One page of a partition query.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct QueryRequest {
    /// Table to query.
    #[builder(into)]
    pub table: String,
    /// Partition to read. Queries never leave it.
    #[builder(into)]
    pub partition: String,
    /// Only sort keys starting with this prefix are evaluated.
    #[builder(into)]
    pub sort_prefix: String,
    /// Maximum number of items to evaluate, applied before any filtering.
    pub limit: usize,
    /// Ascending sort-key order when `true`, descending otherwise.
    #[builder(default = true)]
    pub scan_forward: bool,
    /// Resume strictly after this key.
    pub exclusive_start_key: Option<PrimaryKey>,
    /// Strongly consistent read when `true`.
    #[builder(default)]
    pub consistent: bool,
}

/// Result of one query page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPage {
    /// Items evaluated on this page, in query order.
    pub items: Vec<Item>,
    /// Key of the last evaluated item when the query stopped early;
    /// `None` when the partition (or prefix) is exhausted.
    pub last_evaluated_key: Option<PrimaryKey>,
}

/// Native operations of a remote single-table key-value database.
///
/// Implementations perform no client-side locking; concurrent writers to
/// the same key race and the last write wins.
#[async_trait]
pub trait KeyValueClient: Send + Sync + std::fmt::Debug {
    /// Writes `item` unconditionally, replacing any item with the same key.
    async fn put_item(&self, table: &str, item: Item) -> Result<(), KvClientError>;

    /// Reads an item by primary key.
    async fn get_item(
        &self,
        table: &str,
        key: &PrimaryKey,
        consistent: bool,
    ) -> Result<Option<Item>, KvClientError>;

    /// Runs one page of a query within a single partition.
    async fn query(&self, request: QueryRequest) -> Result<QueryPage, KvClientError>;
}
