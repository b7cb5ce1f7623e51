//! Single-table key layout.
//!
//! Every product lives in its tenant's partition, `ORG#{tenant}`, under
//! the sort key `PRODUCT#{id}`. Querying a partition with the `PRODUCT#`
//! prefix therefore yields exactly one tenant's products, ordered by id.

use stockroom_store::{RecordId, TenantId};

use crate::client::PrimaryKey;

/// Prefix of every tenant partition key.
pub const PARTITION_PREFIX: &str = "ORG#";

/// Prefix of every product sort key.
pub const PRODUCT_PREFIX: &str = "PRODUCT#";

/// Attribute name of the partition key.
pub const PK: &str = "PK";

/// Attribute name of the sort key.
pub const SK: &str = "SK";

/// Partition key for a tenant.
#[must_use]
pub fn partition_key(tenant: &TenantId) -> String {
    format!("{PARTITION_PREFIX}{tenant}")
}

/// Sort key for a product.
#[must_use]
pub fn product_sort_key(id: &RecordId) -> String {
    format!("{PRODUCT_PREFIX}{id}")
}

/// Full primary key of a tenant's product.
#[must_use]
pub fn product_key(tenant: &TenantId, id: &RecordId) -> PrimaryKey {
    PrimaryKey { partition: partition_key(tenant), sort: product_sort_key(id) }
}

/// Recovers the product id from a sort key, if it is a product key.
#[must_use]
pub fn product_id_from_sort_key(sort: &str) -> Option<RecordId> {
    sort.strip_prefix(PRODUCT_PREFIX).map(RecordId::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_layout() {
        let key = product_key(&TenantId::from("acme"), &RecordId::from("42"));
        assert_eq!(key.partition, "ORG#acme");
        assert_eq!(key.sort, "PRODUCT#42");
    }

    proptest! {
        /// The id embedded in a sort key is recovered exactly.
        #[test]
        fn sort_key_round_trip(id in "[a-zA-Z0-9#_-]{0,40}") {
            let id = RecordId::new(id);
            prop_assert_eq!(product_id_from_sort_key(&product_sort_key(&id)), Some(id));
        }

        /// Sort keys order exactly like the ids they embed.
        #[test]
        fn sort_keys_preserve_id_order(a in "[a-f0-9]{1,32}", b in "[a-f0-9]{1,32}") {
            let ka = product_sort_key(&RecordId::new(a.clone()));
            let kb = product_sort_key(&RecordId::new(b.clone()));
            prop_assert_eq!(a.cmp(&b), ka.cmp(&kb));
        }

        /// Distinct tenants never share a partition.
        #[test]
        fn partitions_are_distinct(a in "[a-z0-9-]{1,16}", b in "[a-z0-9-]{1,16}") {
            prop_assume!(a != b);
            prop_assert_ne!(
                partition_key(&TenantId::new(a)),
                partition_key(&TenantId::new(b))
            );
        }
    }
}
