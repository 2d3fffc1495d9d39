//! Score-ordered member set
//!
//! Backing structure for the in-memory backend's sorted keys. Members are
//! unique strings ordered by `(score, member)`, score comparison via
//! `f64::total_cmp` so every float (including infinities) has a stable
//! position. Rank-range reads follow the usual ordered-range conventions:
//! 0-based, inclusive on both ends, negative indices counting from the end.

use crate::command::Order;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone)]
struct ScoreEntry {
    score: f64,
    member: String,
}

impl PartialEq for ScoreEntry {
    fn eq(&self, other: &Self) -> bool {
        self.score.total_cmp(&other.score).is_eq() && self.member == other.member
    }
}

impl Eq for ScoreEntry {}

impl PartialOrd for ScoreEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoreEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| self.member.cmp(&other.member))
    }
}

/// A set of unique members, each carrying a float score, ordered by score
#[derive(Debug, Clone, Default)]
pub struct SortedSet {
    scores: HashMap<String, f64>,
    ordered: BTreeSet<ScoreEntry>,
}

impl SortedSet {
    /// An empty sorted set
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Whether the set has no members
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Insert a member or replace its score; returns `true` if newly added
    pub fn insert(&mut self, member: &str, score: f64) -> bool {
        let added = match self.scores.insert(member.to_string(), score) {
            Some(old) => {
                self.ordered.remove(&ScoreEntry {
                    score: old,
                    member: member.to_string(),
                });
                false
            }
            None => true,
        };
        self.ordered.insert(ScoreEntry {
            score,
            member: member.to_string(),
        });
        added
    }

    /// Remove a member; returns `true` if it was present
    pub fn remove(&mut self, member: &str) -> bool {
        match self.scores.remove(member) {
            Some(score) => {
                self.ordered.remove(&ScoreEntry {
                    score,
                    member: member.to_string(),
                });
                true
            }
            None => false,
        }
    }

    /// A member's current score
    pub fn score(&self, member: &str) -> Option<f64> {
        self.scores.get(member).copied()
    }

    /// 0-based rank of a member in the given order
    pub fn rank(&self, member: &str, order: Order) -> Option<u64> {
        let score = self.score(member)?;
        let probe = ScoreEntry {
            score,
            member: member.to_string(),
        };
        let ascending = self.ordered.range(..&probe).count() as u64;
        Some(match order {
            Order::Ascending => ascending,
            Order::Descending => self.len() as u64 - 1 - ascending,
        })
    }

    /// Members of the inclusive rank range `[start, stop]` in the given order
    ///
    /// Negative indices count from the end (`-1` is the last member). An
    /// empty slice results when the normalized range is inverted or entirely
    /// out of bounds.
    pub fn range(&self, start: i64, stop: i64, order: Order) -> Vec<String> {
        let len = self.len() as i64;
        if len == 0 {
            return Vec::new();
        }
        let start = normalize_index(start, len).max(0);
        let stop = normalize_index(stop, len).min(len - 1);
        if start > stop {
            return Vec::new();
        }

        let take = (stop - start + 1) as usize;
        let skip = start as usize;
        match order {
            Order::Ascending => self
                .ordered
                .iter()
                .skip(skip)
                .take(take)
                .map(|e| e.member.clone())
                .collect(),
            Order::Descending => self
                .ordered
                .iter()
                .rev()
                .skip(skip)
                .take(take)
                .map(|e| e.member.clone())
                .collect(),
        }
    }

    /// Members scored within `[min, max]`, in the given order
    pub fn range_by_score(&self, min: f64, max: f64, order: Order) -> Vec<String> {
        let in_range = |e: &&ScoreEntry| e.score >= min && e.score <= max;
        match order {
            Order::Ascending => self
                .ordered
                .iter()
                .filter(in_range)
                .map(|e| e.member.clone())
                .collect(),
            Order::Descending => self
                .ordered
                .iter()
                .rev()
                .filter(in_range)
                .map(|e| e.member.clone())
                .collect(),
        }
    }

    /// Number of members scored within `[min, max]`
    pub fn count(&self, min: f64, max: f64) -> u64 {
        self.ordered
            .iter()
            .filter(|e| e.score >= min && e.score <= max)
            .count() as u64
    }
}

fn normalize_index(index: i64, len: i64) -> i64 {
    if index < 0 {
        len + index
    } else {
        index
    }
}
