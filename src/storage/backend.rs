//! Ordered key-value backends for the range history store.
//!
//! A backend is a set of named column families, each an ordered map of byte
//! keys to byte values. Writes are atomic batches; reads are point lookups
//! and directional scans.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::RwLock;

use crate::error::{Error, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// STORAGE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Key type for storage operations
pub type StorageKey = Vec<u8>;

/// Value type for storage operations
pub type StorageValue = Vec<u8>;

/// Direction of a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDirection {
    /// Ascending keys, starting at the first key `>= from`
    Forward,
    /// Descending keys, starting at the last key `<= from`
    Reverse,
}

/// Scan visitor. Returns `Ok(false)` to stop the scan.
pub type ScanVisitor<'a> = dyn FnMut(&[u8], &[u8]) -> Result<bool> + 'a;

/// Trait for storage backends
pub trait StorageBackend: Send + Sync {
    /// Get a value by key
    fn get(&self, cf: &str, key: &[u8]) -> Result<Option<StorageValue>>;

    /// Apply all operations atomically
    fn write_batch(&self, operations: Vec<BatchOperation>) -> Result<()>;

    /// Visit entries of `cf` in key order starting at `from`
    fn scan(
        &self,
        cf: &str,
        from: &[u8],
        direction: ScanDirection,
        visitor: &mut ScanVisitor<'_>,
    ) -> Result<()>;

    /// Flush any pending writes to persistent storage
    fn flush(&self) -> Result<()>;
}

/// Batch operation for atomic writes
#[derive(Debug, Clone)]
pub enum BatchOperation {
    /// Put a key-value pair
    Put {
        /// Column family name
        cf: String,
        /// Key
        key: Vec<u8>,
        /// Value
        value: Vec<u8>,
    },
    /// Delete a key
    Delete {
        /// Column family name
        cf: String,
        /// Key
        key: Vec<u8>,
    },
}

impl BatchOperation {
    /// Create a put operation
    pub fn put(cf: impl Into<String>, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self::Put {
            cf: cf.into(),
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a delete operation
    pub fn delete(cf: impl Into<String>, key: impl Into<Vec<u8>>) -> Self {
        Self::Delete {
            cf: cf.into(),
            key: key.into(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// IN-MEMORY STORE
// ═══════════════════════════════════════════════════════════════════════════════

type ColumnFamily = BTreeMap<Vec<u8>, Vec<u8>>;

/// In-memory storage backend (for testing and ephemeral use)
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: RwLock<HashMap<String, ColumnFamily>>,
}

impl InMemoryStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in a column family
    pub fn len(&self, cf: &str) -> Result<usize> {
        let data = self.data.read().map_err(|_| Error::Lock)?;
        Ok(data.get(cf).map(BTreeMap::len).unwrap_or(0))
    }

    /// Check if a column family is empty
    pub fn is_empty(&self, cf: &str) -> Result<bool> {
        Ok(self.len(cf)? == 0)
    }
}

impl StorageBackend for InMemoryStore {
    fn get(&self, cf: &str, key: &[u8]) -> Result<Option<StorageValue>> {
        let data = self.data.read().map_err(|_| Error::Lock)?;
        Ok(data.get(cf).and_then(|family| family.get(key).cloned()))
    }

    fn write_batch(&self, operations: Vec<BatchOperation>) -> Result<()> {
        // One write guard for the whole batch keeps it atomic for readers
        let mut data = self.data.write().map_err(|_| Error::Lock)?;

        for op in operations {
            match op {
                BatchOperation::Put { cf, key, value } => {
                    data.entry(cf).or_default().insert(key, value);
                }
                BatchOperation::Delete { cf, key } => {
                    if let Some(family) = data.get_mut(&cf) {
                        family.remove(&key);
                    }
                }
            }
        }

        Ok(())
    }

    fn scan(
        &self,
        cf: &str,
        from: &[u8],
        direction: ScanDirection,
        visitor: &mut ScanVisitor<'_>,
    ) -> Result<()> {
        let data = self.data.read().map_err(|_| Error::Lock)?;
        let Some(family) = data.get(cf) else {
            return Ok(());
        };

        match direction {
            ScanDirection::Forward => {
                let range = family.range::<[u8], _>((Bound::Included(from), Bound::Unbounded));
                for (key, value) in range {
                    if !visitor(key.as_slice(), value.as_slice())? {
                        break;
                    }
                }
            }
            ScanDirection::Reverse => {
                let range = family.range::<[u8], _>((Bound::Unbounded, Bound::Included(from)));
                for (key, value) in range.rev() {
                    if !visitor(key.as_slice(), value.as_slice())? {
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    fn flush(&self) -> Result<()> {
        // In-memory store doesn't need flushing
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(store: &InMemoryStore, from: &[u8], direction: ScanDirection) -> Vec<Vec<u8>> {
        let mut keys = Vec::new();
        store
            .scan("cf", from, direction, &mut |key, _| {
                keys.push(key.to_vec());
                Ok(true)
            })
            .unwrap();
        keys
    }

    fn populated() -> InMemoryStore {
        let store = InMemoryStore::new();
        store
            .write_batch(vec![
                BatchOperation::put("cf", vec![1], b"a".to_vec()),
                BatchOperation::put("cf", vec![3], b"b".to_vec()),
                BatchOperation::put("cf", vec![5], b"c".to_vec()),
                BatchOperation::put("other", vec![2], b"x".to_vec()),
            ])
            .unwrap();
        store
    }

    #[test]
    fn test_get_and_batch() {
        let store = populated();
        assert_eq!(store.get("cf", &[3]).unwrap(), Some(b"b".to_vec()));
        assert_eq!(store.get("cf", &[2]).unwrap(), None);
        assert_eq!(store.get("missing", &[1]).unwrap(), None);
        assert_eq!(store.len("cf").unwrap(), 3);

        store
            .write_batch(vec![BatchOperation::delete("cf", vec![3])])
            .unwrap();
        assert_eq!(store.get("cf", &[3]).unwrap(), None);
    }

    #[test]
    fn test_forward_scan_starts_at_lower_bound() {
        let store = populated();
        assert_eq!(collect(&store, &[2], ScanDirection::Forward), vec![vec![3], vec![5]]);
        assert_eq!(collect(&store, &[0], ScanDirection::Forward).len(), 3);
    }

    #[test]
    fn test_reverse_scan_starts_at_upper_bound() {
        let store = populated();
        assert_eq!(collect(&store, &[4], ScanDirection::Reverse), vec![vec![3], vec![1]]);
        assert_eq!(
            collect(&store, &[5], ScanDirection::Reverse),
            vec![vec![5], vec![3], vec![1]]
        );
        assert!(collect(&store, &[0], ScanDirection::Reverse).is_empty());
    }

    #[test]
    fn test_visitor_can_stop() {
        let store = populated();
        let mut seen = 0;
        store
            .scan("cf", &[0], ScanDirection::Forward, &mut |_, _| {
                seen += 1;
                Ok(seen < 2)
            })
            .unwrap();
        assert_eq!(seen, 2);
    }

    #[test]
    fn test_batch_operation() {
        let put = BatchOperation::put("cf", b"key".to_vec(), b"value".to_vec());
        assert!(matches!(put, BatchOperation::Put { .. }));

        let delete = BatchOperation::delete("cf", b"key".to_vec());
        assert!(matches!(delete, BatchOperation::Delete { .. }));
    }
}
