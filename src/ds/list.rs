use std::collections::VecDeque;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::RwLock;

/// Positional container of byte strings shared between connections. The
/// handle is cheap to clone; all access goes through the inner lock.
#[derive(Clone, Debug, Default)]
pub struct List {
    inner: Arc<RwLock<VecDeque<Bytes>>>,
}

impl List {
    pub fn new() -> List {
        List::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts at `pos`, which must lie in `[0, len]`.
    pub fn insert_at(&self, pos: usize, value: Bytes) -> bool {
        let mut list = self.inner.write();
        if pos > list.len() {
            return false;
        }
        list.insert(pos, value);
        true
    }

    pub fn push_back(&self, value: Bytes) {
        self.inner.write().push_back(value);
    }

    /// `pos` may be negative to count from the tail, -1 being the last
    /// element.
    pub fn get_at(&self, pos: i64) -> Option<Bytes> {
        let list = self.inner.read();
        let index = resolve(pos, list.len())?;
        list.get(index).cloned()
    }

    /// Removes the element at `pos` in `[0, len)`.
    pub fn remove_at(&self, pos: usize) -> Option<Bytes> {
        self.inner.write().remove(pos)
    }

    pub fn pop_front(&self) -> Option<Bytes> {
        self.inner.write().pop_front()
    }

    pub fn pop_back(&self) -> Option<Bytes> {
        self.inner.write().pop_back()
    }

    /// The inclusive slice `[start, stop]` with LRANGE index resolution:
    /// negative indexes count from the tail, `start` clamps to the head,
    /// `stop` clamps to the tail, and an inverted or out-of-range window is
    /// empty.
    pub fn range(&self, start: i64, stop: i64) -> Vec<Bytes> {
        let list = self.inner.read();
        let len = list.len() as i64;

        let mut start = if start < 0 { len + start } else { start };
        let mut stop = if stop < 0 { len + stop } else { stop };

        if start < 0 {
            start = 0;
        }
        if start >= len || start > stop {
            return Vec::new();
        }
        if stop >= len {
            stop = len - 1;
        }

        list.iter()
            .skip(start as usize)
            .take((stop - start + 1) as usize)
            .cloned()
            .collect()
    }

    /// Visits elements head to tail until the consumer returns `false`.
    pub fn for_each(&self, mut consumer: impl FnMut(&Bytes) -> bool) {
        let list = self.inner.read();
        for value in list.iter() {
            if !consumer(value) {
                break;
            }
        }
    }
}

fn resolve(pos: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let pos = if pos < 0 { len + pos } else { pos };
    if pos < 0 || pos >= len {
        return None;
    }
    Some(pos as usize)
}
