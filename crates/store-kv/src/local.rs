//! Process-local [`KeyValueClient`].
//!
//! [`LocalKeyValueClient`] keeps tables in memory and answers queries with
//! the same native semantics a remote single-table database has:
//!
//! - a query never leaves its partition and only evaluates sort keys with
//!   the requested prefix
//! - `limit` bounds the number of *evaluated* items; filtering by the
//!   caller happens afterwards
//! - `last_evaluated_key` is returned only when items remain beyond the
//!   page, so a walk ends on the page that exhausts the partition
//! - writes are unconditional overwrites
//!
//! It also records what it was asked to do and can be told to fail, which
//! lets tests observe the backend's native calls.

use std::{
    collections::{BTreeMap, HashMap, VecDeque},
    ops::Bound,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use crate::{
    client::{AttributeValue, Item, KeyValueClient, PrimaryKey, QueryPage, QueryRequest},
    config::DEFAULT_TABLE_NAME,
    error::KvClientError,
    keys::{PK, SK},
};

type Table = BTreeMap<PrimaryKey, Item>;

#[derive(Default)]
struct Inner {
    tables: RwLock<HashMap<String, Table>>,
    faults: Mutex<VecDeque<KvClientError>>,
    last_query: Mutex<Option<QueryRequest>>,
    queries: AtomicUsize,
    consistent_reads: AtomicUsize,
}

/// In-memory single-table key-value database.
///
/// # Cloning
///
/// Clones share the same tables, fault queue and counters.
#[derive(Clone)]
pub struct LocalKeyValueClient {
    inner: Arc<Inner>,
}

impl Default for LocalKeyValueClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LocalKeyValueClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tables: Vec<String> = self.inner.tables.read().keys().cloned().collect();
        f.debug_struct("LocalKeyValueClient").field("tables", &tables).finish_non_exhaustive()
    }
}

impl LocalKeyValueClient {
    /// Creates a database holding one empty table named
    /// [`DEFAULT_TABLE_NAME`].
    #[must_use]
    pub fn new() -> Self {
        let client = Self { inner: Arc::new(Inner::default()) };
        client.create_table(DEFAULT_TABLE_NAME);
        client
    }

    /// Creates an empty table if it does not exist yet.
    pub fn create_table(&self, name: &str) {
        self.inner.tables.write().entry(name.to_owned()).or_default();
    }

    /// Makes the next call fail with `error`. Queued faults are consumed in
    /// order, one per call.
    pub fn fail_next(&self, error: KvClientError) {
        self.inner.faults.lock().push_back(error);
    }

    /// Number of queries served.
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.inner.queries.load(Ordering::Relaxed)
    }

    /// Number of strongly consistent reads served (gets and queries).
    #[must_use]
    pub fn consistent_reads(&self) -> usize {
        self.inner.consistent_reads.load(Ordering::Relaxed)
    }

    /// The most recent query request.
    #[must_use]
    pub fn last_query(&self) -> Option<QueryRequest> {
        self.inner.last_query.lock().clone()
    }

    /// Number of items stored in `table`.
    #[must_use]
    pub fn item_count(&self, table: &str) -> usize {
        self.inner.tables.read().get(table).map_or(0, BTreeMap::len)
    }

    fn take_fault(&self) -> Result<(), KvClientError> {
        match self.inner.faults.lock().pop_front() {
            Some(fault) => Err(fault),
            None => Ok(()),
        }
    }

    fn note_read(&self, consistent: bool) {
        if consistent {
            self.inner.consistent_reads.fetch_add(1, Ordering::Relaxed);
        }
    }
}

fn key_of(item: &Item) -> Result<PrimaryKey, KvClientError> {
    let attribute = |name: &str| {
        item.get(name)
            .and_then(AttributeValue::as_s)
            .map(str::to_owned)
            .ok_or_else(|| KvClientError::Validation(format!("missing string key attribute {name}")))
    };
    Ok(PrimaryKey { partition: attribute(PK)?, sort: attribute(SK)? })
}

#[async_trait]
impl KeyValueClient for LocalKeyValueClient {
    async fn put_item(&self, table: &str, item: Item) -> Result<(), KvClientError> {
        self.take_fault()?;
        let key = key_of(&item)?;
        let mut tables = self.inner.tables.write();
        let table = tables
            .get_mut(table)
            .ok_or_else(|| KvClientError::TableNotFound(table.to_owned()))?;
        table.insert(key, item);
        Ok(())
    }

    async fn get_item(
        &self,
        table: &str,
        key: &PrimaryKey,
        consistent: bool,
    ) -> Result<Option<Item>, KvClientError> {
        self.take_fault()?;
        self.note_read(consistent);
        let tables = self.inner.tables.read();
        let table = tables.get(table).ok_or_else(|| KvClientError::TableNotFound(table.to_owned()))?;
        Ok(table.get(key).cloned())
    }

    async fn query(&self, request: QueryRequest) -> Result<QueryPage, KvClientError> {
        self.take_fault()?;
        if request.limit == 0 {
            return Err(KvClientError::Validation("limit must be at least 1".into()));
        }
        if let Some(start) = &request.exclusive_start_key {
            if start.partition != request.partition {
                return Err(KvClientError::Validation(
                    "exclusive start key is outside the queried partition".into(),
                ));
            }
        }

        self.inner.queries.fetch_add(1, Ordering::Relaxed);
        self.note_read(request.consistent);
        *self.inner.last_query.lock() = Some(request.clone());

        let tables = self.inner.tables.read();
        let table = tables
            .get(&request.table)
            .ok_or_else(|| KvClientError::TableNotFound(request.table.clone()))?;

        let partition_start =
            PrimaryKey { partition: request.partition.clone(), sort: request.sort_prefix.clone() };
        let (lower, upper) = match (&request.exclusive_start_key, request.scan_forward) {
            (Some(start), true) => (Bound::Excluded(start.clone()), Bound::Unbounded),
            (Some(start), false) => (Bound::Included(partition_start), Bound::Excluded(start.clone())),
            (None, _) => (Bound::Included(partition_start), Bound::Unbounded),
        };

        let in_range = table.range((lower, upper)).filter(|(key, _)| {
            key.partition == request.partition && key.sort.starts_with(&request.sort_prefix)
        });
        let mut candidates: Box<dyn Iterator<Item = (&PrimaryKey, &Item)> + '_> =
            if request.scan_forward { Box::new(in_range) } else { Box::new(in_range.rev()) };

        let mut items = Vec::with_capacity(request.limit);
        let mut last_key = None;
        for (key, item) in candidates.by_ref().take(request.limit) {
            items.push(item.clone());
            last_key = Some(key.clone());
        }
        let more = candidates.next().is_some();

        Ok(QueryPage { items, last_evaluated_key: if more { last_key } else { None } })
    }
}
