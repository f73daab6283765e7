use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Hard cap on column height, matching the classic skip-list tuning for
/// sets of up to 2^16 elements and change.
pub(crate) const MAX_LEVEL: usize = 16;

/// Arena slot of the header sentinel column.
const HEADER: usize = 0;

/// One level of a column: where the express lane goes next, and how many
/// level-0 hops that jump covers (destination included). A `None` forward
/// still carries the distance to the virtual end of the list, which keeps
/// the span sums equal to the length on every level.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Row {
    forward: Option<usize>,
    span: usize,
}

/// A column occupies one slot per level it participates in; `rows.len()` is
/// its height. Columns are addressed by arena index so the backward links
/// need no shared ownership.
#[derive(Debug)]
struct Column {
    score: f64,
    member: String,
    backward: Option<usize>,
    rows: Vec<Row>,
}

/// Ordered index over (score, member) pairs with exact rank bookkeeping.
///
/// Level 0 is a plain sorted linked list; the rows above it are express
/// lanes whose spans count skipped columns, so rank queries ride the lanes
/// instead of walking level 0.
pub struct SkipList {
    columns: Vec<Column>,
    free: Vec<usize>,
    tail: Option<usize>,
    length: usize,
    level: usize,
    rng: SmallRng,
}

impl SkipList {
    pub fn new() -> SkipList {
        SkipList::with_rng(SmallRng::from_entropy())
    }

    fn with_rng(rng: SmallRng) -> SkipList {
        let header = Column {
            score: 0.0,
            member: String::new(),
            backward: None,
            rows: vec![Row::default(); MAX_LEVEL],
        };
        SkipList {
            columns: vec![header],
            free: Vec::new(),
            tail: None,
            length: 0,
            level: 1,
            rng,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_seed(seed: u64) -> SkipList {
        SkipList::with_rng(SmallRng::seed_from_u64(seed))
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Inserts a column for `(member, score)`. The caller keeps members
    /// unique; a score change is a remove followed by an insert.
    pub fn insert(&mut self, member: &str, score: f64) {
        let mut update = [HEADER; MAX_LEVEL];
        let mut rank = [0usize; MAX_LEVEL];

        // Walk top-down, recording at each level the last column preceding
        // the insertion point and the number of level-0 hops to reach it.
        let mut node = HEADER;
        for i in (0..self.level).rev() {
            rank[i] = if i + 1 == self.level { 0 } else { rank[i + 1] };
            while let Some(next) = self.columns[node].rows[i].forward {
                if !self.precedes(next, score, member) {
                    break;
                }
                rank[i] += self.columns[node].rows[i].span;
                node = next;
            }
            update[i] = node;
        }

        let height = self.random_level();
        if height > self.level {
            for i in self.level..height {
                rank[i] = 0;
                update[i] = HEADER;
                self.columns[HEADER].rows[i].span = self.length;
            }
            self.level = height;
        }

        let id = self.alloc(score, member, height);

        for i in 0..height {
            let prev = update[i];
            let prev_row = self.columns[prev].rows[i];
            self.columns[id].rows[i] = Row {
                forward: prev_row.forward,
                span: prev_row.span - (rank[0] - rank[i]),
            };
            self.columns[prev].rows[i] = Row {
                forward: Some(id),
                span: rank[0] - rank[i] + 1,
            };
        }
        // Levels the new column does not reach now skip over one more hop.
        for i in height..self.level {
            self.columns[update[i]].rows[i].span += 1;
        }

        self.columns[id].backward = (update[0] != HEADER).then_some(update[0]);
        match self.columns[id].rows[0].forward {
            Some(next) => self.columns[next].backward = Some(id),
            None => self.tail = Some(id),
        }
        self.length += 1;
    }

    /// Removes the column matching `(member, score)` exactly.
    pub fn remove(&mut self, member: &str, score: f64) -> bool {
        let mut update = [HEADER; MAX_LEVEL];

        let mut node = HEADER;
        for i in (0..self.level).rev() {
            while let Some(next) = self.columns[node].rows[i].forward {
                if !self.precedes(next, score, member) {
                    break;
                }
                node = next;
            }
            update[i] = node;
        }

        let target = match self.columns[update[0]].rows[0].forward {
            Some(id) if self.columns[id].score == score && self.columns[id].member == member => id,
            _ => return false,
        };

        for i in 0..self.level {
            if self.columns[update[i]].rows[i].forward == Some(target) {
                let removed = self.columns[target].rows[i];
                let row = &mut self.columns[update[i]].rows[i];
                row.span += removed.span;
                row.span -= 1;
                row.forward = removed.forward;
            } else {
                self.columns[update[i]].rows[i].span -= 1;
            }
        }

        match self.columns[target].rows[0].forward {
            Some(next) => self.columns[next].backward = self.columns[target].backward,
            None => self.tail = self.columns[target].backward,
        }

        while self.level > 1 && self.columns[HEADER].rows[self.level - 1].forward.is_none() {
            self.level -= 1;
        }
        self.length -= 1;
        self.release(target);
        true
    }

    /// 1-based rank of `(member, score)` in level-0 order, 0 when absent.
    pub fn rank_of(&self, member: &str, score: f64) -> usize {
        let mut rank = 0;
        let mut node = HEADER;
        for i in (0..self.level).rev() {
            while let Some(next) = self.columns[node].rows[i].forward {
                if !self.precedes_or_matches(next, score, member) {
                    break;
                }
                rank += self.columns[node].rows[i].span;
                node = next;
            }
            if node != HEADER && self.columns[node].member == member {
                return rank;
            }
        }
        0
    }

    /// Elements at 0-based level-0 positions `min..=max`, ascending.
    pub fn elements_between(&self, min: usize, max: usize) -> Vec<(String, f64)> {
        let mut results = Vec::with_capacity(max.saturating_sub(min) + 1);
        let mut node = self.columns[HEADER].rows[0].forward;
        let mut position = 0;
        while let Some(id) = node {
            if position > max {
                break;
            }
            let column = &self.columns[id];
            if position >= min {
                results.push((column.member.clone(), column.score));
            }
            node = column.rows[0].forward;
            position += 1;
        }
        results
    }

    /// Visits columns in ascending order until the consumer returns `false`.
    pub fn for_each(&self, mut consumer: impl FnMut(&str, f64) -> bool) {
        let mut node = self.columns[HEADER].rows[0].forward;
        while let Some(id) = node {
            let column = &self.columns[id];
            if !consumer(&column.member, column.score) {
                break;
            }
            node = column.rows[0].forward;
        }
    }

    /// Draws a column height in [1, 16]: uniform below 2^16 - 1, mapped so
    /// each level is roughly half as likely as the one beneath it.
    fn random_level(&mut self) -> usize {
        let draw = self.rng.gen::<u64>() % (u16::MAX as u64);
        let bits = 64 - (draw + 1).leading_zeros() as usize;
        MAX_LEVEL - bits + 1
    }

    fn precedes(&self, id: usize, score: f64, member: &str) -> bool {
        let column = &self.columns[id];
        column.score < score || (column.score == score && column.member.as_str() < member)
    }

    fn precedes_or_matches(&self, id: usize, score: f64, member: &str) -> bool {
        let column = &self.columns[id];
        column.score < score || (column.score == score && column.member.as_str() <= member)
    }

    fn alloc(&mut self, score: f64, member: &str, height: usize) -> usize {
        let column = Column {
            score,
            member: member.to_string(),
            backward: None,
            rows: vec![Row::default(); height],
        };
        match self.free.pop() {
            Some(id) => {
                self.columns[id] = column;
                id
            }
            None => {
                self.columns.push(column);
                self.columns.len() - 1
            }
        }
    }

    fn release(&mut self, id: usize) {
        self.columns[id] = Column {
            score: 0.0,
            member: String::new(),
            backward: None,
            rows: Vec::new(),
        };
        self.free.push(id);
    }

    #[cfg(test)]
    fn assert_invariants(&self) {
        // Span sums along the path at every level equal the length, with a
        // null forward covering the remaining distance to the virtual end.
        for i in 0..self.level {
            let mut total = 0;
            let mut node = HEADER;
            loop {
                total += self.columns[node].rows[i].span;
                match self.columns[node].rows[i].forward {
                    Some(next) => node = next,
                    None => break,
                }
            }
            assert_eq!(total, self.length, "span sum at level {}", i);
        }

        // Level 0 is strictly increasing with consistent backward links.
        let mut previous: Option<usize> = None;
        let mut node = self.columns[HEADER].rows[0].forward;
        let mut count = 0;
        while let Some(id) = node {
            let column = &self.columns[id];
            if let Some(prev) = previous {
                let prev_column = &self.columns[prev];
                assert!(
                    prev_column.score < column.score
                        || (prev_column.score == column.score
                            && prev_column.member < column.member),
                    "level-0 ordering violated"
                );
            }
            assert_eq!(column.backward, previous, "backward link mismatch");
            previous = Some(id);
            node = column.rows[0].forward;
            count += 1;
        }
        assert_eq!(count, self.length);
        assert_eq!(self.tail, previous);

        // The advertised level is the highest one actually in use.
        if self.length > 0 {
            assert!(self.columns[HEADER].rows[self.level - 1].forward.is_some());
        }
        for i in self.level..MAX_LEVEL {
            assert!(self.columns[HEADER].rows[i].forward.is_none());
        }
    }
}

impl Default for SkipList {
    fn default() -> Self {
        SkipList::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated(seed: u64, entries: &[(&str, f64)]) -> SkipList {
        let mut list = SkipList::with_seed(seed);
        for (member, score) in entries {
            list.insert(member, *score);
            list.assert_invariants();
        }
        list
    }

    #[test]
    fn insert_keeps_score_then_member_order() {
        let list = populated(7, &[("b", 2.0), ("a", 1.0), ("c", 2.0), ("d", 0.5)]);
        let members: Vec<String> = list
            .elements_between(0, 3)
            .into_iter()
            .map(|(member, _)| member)
            .collect();
        assert_eq!(members, vec!["d", "a", "b", "c"]);
    }

    #[test]
    fn rank_is_one_based_and_zero_for_absent() {
        let list = populated(11, &[("a", 1.0), ("b", 2.0), ("c", 3.0)]);
        assert_eq!(list.rank_of("a", 1.0), 1);
        assert_eq!(list.rank_of("b", 2.0), 2);
        assert_eq!(list.rank_of("c", 3.0), 3);
        assert_eq!(list.rank_of("missing", 1.0), 0);
    }

    #[test]
    fn remove_requires_exact_score_and_member() {
        let mut list = populated(13, &[("a", 1.0), ("b", 2.0)]);
        assert!(!list.remove("a", 9.0));
        assert!(!list.remove("z", 1.0));
        assert!(list.remove("a", 1.0));
        list.assert_invariants();
        assert_eq!(list.len(), 1);
        assert_eq!(list.rank_of("b", 2.0), 1);
    }

    #[test]
    fn random_level_stays_in_bounds() {
        let mut list = SkipList::with_seed(17);
        for _ in 0..10_000 {
            let level = list.random_level();
            assert!((1..=MAX_LEVEL).contains(&level));
        }
    }

    #[test]
    fn randomized_churn_preserves_invariants_and_ranks() {
        let mut list = SkipList::with_seed(23);
        let mut mirror: Vec<(f64, String)> = Vec::new();

        // Deterministic pseudo-random workload, no dependence on the
        // column-height draws.
        let mut state = 0x9e3779b97f4a7c15u64;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        };

        for round in 0..400 {
            let member = format!("m{}", next() % 120);
            let score = (next() % 50) as f64 / 4.0;

            if round % 3 == 2 && !mirror.is_empty() {
                let victim = mirror[(next() as usize) % mirror.len()].clone();
                assert!(list.remove(&victim.1, victim.0));
                mirror.retain(|(s, m)| !(*s == victim.0 && *m == victim.1));
            } else if let Some(existing) = mirror.iter().position(|(_, m)| *m == member) {
                let old = mirror.remove(existing);
                list.remove(&old.1, old.0);
                list.insert(&member, score);
                mirror.push((score, member));
            } else {
                list.insert(&member, score);
                mirror.push((score, member));
            }

            list.assert_invariants();
        }

        mirror.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap()
                .then_with(|| a.1.cmp(&b.1))
        });
        assert_eq!(list.len(), mirror.len());
        for (index, (score, member)) in mirror.iter().enumerate() {
            assert_eq!(
                list.rank_of(member, *score),
                index + 1,
                "rank mismatch for {}",
                member
            );
        }

        let everything = list.elements_between(0, mirror.len().saturating_sub(1));
        let flattened: Vec<(String, f64)> = mirror
            .iter()
            .map(|(score, member)| (member.clone(), *score))
            .collect();
        assert_eq!(everything, flattened);
    }

    #[test]
    fn elements_between_windows() {
        let list = populated(29, &[("a", 1.0), ("b", 2.0), ("c", 3.0), ("d", 4.0)]);
        let window = list.elements_between(1, 2);
        let members: Vec<String> = window.into_iter().map(|(m, _)| m).collect();
        assert_eq!(members, vec!["b", "c"]);
    }

    #[test]
    fn for_each_walks_ascending_and_stops_early() {
        let list = populated(31, &[("a", 3.0), ("b", 1.0), ("c", 2.0)]);
        let mut seen = Vec::new();
        list.for_each(|member, _| {
            seen.push(member.to_string());
            seen.len() < 2
        });
        assert_eq!(seen, vec!["b", "c"]);
    }
}
