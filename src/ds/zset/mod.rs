mod border;
mod skiplist;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

pub use border::Border;
pub use skiplist::SkipList;

/// One scored member, as surfaced by range queries.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub member: String,
    pub score: f64,
}

/// Set of unique members ordered by (score, member): a member-to-score map
/// paired with a skip-list index, behind one lock so a score update moves
/// the column and rewrites the map as a single step.
#[derive(Clone, Default)]
pub struct SortedSet {
    inner: Arc<RwLock<Core>>,
}

#[derive(Default)]
struct Core {
    dict: HashMap<String, f64>,
    index: SkipList,
}

impl SortedSet {
    pub fn new() -> SortedSet {
        SortedSet::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().dict.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns whether the member was newly inserted. Re-adding with the
    /// same score is a no-op; a different score relocates the column.
    pub fn add(&self, member: &str, score: f64) -> bool {
        let mut guard = self.inner.write();
        let core = &mut *guard;
        match core.dict.insert(member.to_string(), score) {
            Some(old_score) => {
                if old_score != score {
                    core.index.remove(member, old_score);
                    core.index.insert(member, score);
                }
                false
            }
            None => {
                core.index.insert(member, score);
                true
            }
        }
    }

    pub fn remove(&self, member: &str) -> bool {
        let mut guard = self.inner.write();
        let core = &mut *guard;
        match core.dict.remove(member) {
            Some(score) => {
                core.index.remove(member, score);
                true
            }
            None => false,
        }
    }

    pub fn score(&self, member: &str) -> Option<f64> {
        self.inner.read().dict.get(member).copied()
    }

    /// 0-based rank of the member, ascending by default or counted from the
    /// top when `descending`. `None` when the member is absent.
    pub fn rank(&self, member: &str, descending: bool) -> Option<i64> {
        let core = self.inner.read();
        let score = *core.dict.get(member)?;
        let rank = core.index.rank_of(member, score);
        if rank == 0 {
            return None;
        }
        let rank = rank as i64;
        Some(if descending {
            core.index.len() as i64 - rank
        } else {
            rank - 1
        })
    }

    /// Elements selected by the two borders: scores (inclusive unless the
    /// border is exclusive) when `by_score`, otherwise 0-based ranks with
    /// negative indexes counting from the top.
    pub fn range(&self, start: Border, stop: Border, by_score: bool) -> Vec<Element> {
        let core = self.inner.read();
        if by_score {
            range_by_score(&core.index, start, stop)
        } else {
            range_by_rank(&core.index, start, stop)
        }
    }
}

// The rng inside the skip list has no useful Debug form; report size only.
impl fmt::Debug for SortedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortedSet").field("len", &self.len()).finish()
    }
}

fn range_by_score(index: &SkipList, start: Border, stop: Border) -> Vec<Element> {
    let (start_value, start_excluded) = start.as_score();
    let (stop_value, stop_excluded) = stop.as_score();
    let (min, max) = if start_value > stop_value {
        (stop_value, start_value)
    } else {
        (start_value, stop_value)
    };

    let mut results = Vec::new();
    index.for_each(|member, score| {
        if score > max {
            return false;
        }
        if score >= min
            && !(start_excluded && score == min)
            && !(stop_excluded && score == max)
        {
            results.push(Element {
                member: member.to_string(),
                score,
            });
        }
        true
    });
    results
}

fn range_by_rank(index: &SkipList, start: Border, stop: Border) -> Vec<Element> {
    let length = index.len() as i64;

    let mut min = start.as_rank();
    if min < 0 {
        min += length;
        if min < 0 {
            return Vec::new();
        }
    }
    let mut max = stop.as_rank();
    if max < 0 {
        max += length;
        if max < 0 {
            return Vec::new();
        }
    }

    if min > max || min >= length {
        return Vec::new();
    }
    if max >= length {
        max = length - 1;
    }

    index
        .elements_between(min as usize, max as usize)
        .into_iter()
        .map(|(member, score)| Element { member, score })
        .collect()
}

/// Formats a score for the wire: at most 10 significant digits, and
/// integer-valued scores render without a decimal point.
pub fn format_score(score: f64) -> String {
    if score == score.trunc() && score.abs() < 1e10 {
        return (score as i64).to_string();
    }
    // Round to 10 significant digits, then let Display pick the shortest
    // decimal form that round-trips.
    match format!("{:.9e}", score).parse::<f64>() {
        Ok(rounded) => rounded.to_string(),
        Err(_) => score.to_string(),
    }
}
