//! Sizing policy: when the index table grows, shrinks or is purged of
//! tombstones.
//!
//! All thresholds are integer comparisons on the live count, the tombstone
//! count and the table capacity; no floating point load factor is kept.

/// Grow threshold numerator: an insert that would make
/// `(len + 1) * MAX_LOAD > capacity` doubles the table first.
pub const MAX_LOAD: usize = 2;

/// Shrink threshold numerator: an erase with
/// `(len - 1) * MIN_LOAD < capacity` halves the table first.
pub const MIN_LOAD: usize = 6;

/// Initial capacity and the floor the table never shrinks below.
pub const DEFAULT_CAPACITY: usize = 17;

/// Capacity the index must be rebuilt at before inserting one more key, or
/// `None` when the current table is fine.
///
/// Tombstones count towards the load so that at least half of the table is
/// always `Empty`; when only tombstones push it over, the table is rebuilt
/// at the same capacity to purge them.
pub(crate) fn before_insert(len: usize, tombstones: usize, capacity: usize) -> Option<usize> {
    if (len + 1) * MAX_LOAD > capacity {
        Some(capacity * 2)
    } else if (len + tombstones + 1) * MAX_LOAD > capacity {
        Some(capacity)
    } else {
        None
    }
}

/// Capacity the index must be rebuilt at before erasing a key, or `None`.
pub(crate) fn before_erase(len: usize, capacity: usize) -> Option<usize> {
    if capacity > DEFAULT_CAPACITY && len.saturating_sub(1) * MIN_LOAD < capacity {
        Some((capacity / 2).max(DEFAULT_CAPACITY))
    } else {
        None
    }
}
