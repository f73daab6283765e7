use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;

/// Unordered set of strings shared between connections.
///
/// The algebra methods work on snapshots taken one lock at a time, so two
/// commands folding over the same sets in different orders cannot deadlock.
#[derive(Clone, Debug, Default)]
pub struct Set {
    inner: Arc<RwLock<HashSet<String>>>,
}

impl Set {
    pub fn new() -> Set {
        Set::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adds every member under one lock acquisition; returns how many were
    /// not already present.
    pub fn add(&self, members: Vec<String>) -> i64 {
        let mut set = self.inner.write();
        let mut added = 0;
        for member in members {
            if set.insert(member) {
                added += 1;
            }
        }
        added
    }

    /// Removes the given members; returns how many actually existed.
    pub fn remove(&self, members: &[String]) -> i64 {
        let mut set = self.inner.write();
        let mut removed = 0;
        for member in members {
            if set.remove(member) {
                removed += 1;
            }
        }
        removed
    }

    pub fn contains(&self, member: &str) -> bool {
        self.inner.read().contains(member)
    }

    /// All members in unspecified order.
    pub fn members(&self) -> Vec<String> {
        self.inner.read().iter().cloned().collect()
    }

    /// Owned copy of the current membership.
    pub fn snapshot(&self) -> HashSet<String> {
        self.inner.read().clone()
    }

    pub fn intersect(&self, other: &Set) -> Set {
        let mut result = self.snapshot();
        let other = other.snapshot();
        result.retain(|member| other.contains(member));
        Set::from_snapshot(result)
    }

    pub fn union(&self, other: &Set) -> Set {
        let mut result = self.snapshot();
        result.extend(other.snapshot());
        Set::from_snapshot(result)
    }

    pub fn diff(&self, other: &Set) -> Set {
        let mut result = self.snapshot();
        for member in other.snapshot() {
            result.remove(&member);
        }
        Set::from_snapshot(result)
    }

    fn from_snapshot(members: HashSet<String>) -> Set {
        Set {
            inner: Arc::new(RwLock::new(members)),
        }
    }
}
