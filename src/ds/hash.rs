use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::RwLock;

/// Field-to-value map shared between connections.
#[derive(Clone, Debug, Default)]
pub struct Hash {
    inner: Arc<RwLock<HashMap<String, Bytes>>>,
}

impl Hash {
    pub fn new() -> Hash {
        Hash::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes every pair under one lock acquisition and returns how many
    /// fields were newly added, not counting updates.
    pub fn set_pairs(&self, pairs: Vec<(String, Bytes)>) -> i64 {
        let mut fields = self.inner.write();
        let mut added = 0;
        for (field, value) in pairs {
            if fields.insert(field, value).is_none() {
                added += 1;
            }
        }
        added
    }

    pub fn get(&self, field: &str) -> Option<Bytes> {
        self.inner.read().get(field).cloned()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.inner.read().contains_key(field)
    }

    /// Removes the given fields and returns how many actually existed.
    pub fn del_fields(&self, fields: &[String]) -> i64 {
        let mut map = self.inner.write();
        let mut removed = 0;
        for field in fields {
            if map.remove(field).is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// All pairs in unspecified order.
    pub fn entries(&self) -> Vec<(String, Bytes)> {
        self.inner
            .read()
            .iter()
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect()
    }
}
