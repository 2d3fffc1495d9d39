//! Command and reply model for batched store submission
//!
//! The mapper assembles its writes as a `Vec<Command>` and submits them in
//! one round trip via [`Store::pipeline`](crate::Store::pipeline), receiving
//! one [`Reply`] per command in order. Batching is an efficiency contract
//! only: there is no atomicity across the commands of a batch, and a partial
//! failure can leave some commands applied and others not.

use std::collections::HashMap;

/// Traversal direction over a score-ordered structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    /// Lowest score first
    #[default]
    Ascending,
    /// Highest score first
    Descending,
}

impl Order {
    /// Whether this is descending order
    pub fn is_descending(self) -> bool {
        matches!(self, Order::Descending)
    }
}

/// One store operation, as submitted inside a batch
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Existence check of any key
    Exists { key: String },
    /// Read a plain string key
    Get { key: String },
    /// Write a plain string key
    Set { key: String, value: String },
    /// Delete a key of any shape
    Del { key: String },
    /// Read a full hash record
    HGetAll { key: String },
    /// Write one field of a hash record
    HSet {
        key: String,
        field: String,
        value: String,
    },
    /// Write several fields of a hash record at once
    HMSet {
        key: String,
        entries: Vec<(String, String)>,
    },
    /// Add a member to a set
    SAdd { key: String, member: String },
    /// Remove a member from a set
    SRem { key: String, member: String },
    /// List all members of a set
    SMembers { key: String },
    /// Add or rescore a member of a sorted structure
    ZAdd {
        key: String,
        score: f64,
        member: String,
    },
    /// Remove a member from a sorted structure
    ZRem { key: String, member: String },
    /// Read a contiguous rank range (negative indices count from the end)
    ZRange {
        key: String,
        start: i64,
        stop: i64,
        order: Order,
    },
    /// Read all members scored within `[min, max]`
    ZRangeByScore {
        key: String,
        min: f64,
        max: f64,
        order: Order,
    },
    /// Read a member's 0-based rank
    ZRank {
        key: String,
        member: String,
        order: Order,
    },
    /// Count members scored within `[min, max]`
    ZCount { key: String, min: f64, max: f64 },
}

/// Per-command result of a batch submission
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Operation completed with nothing to report
    Unit,
    /// Existence / membership-change outcome
    Bool(bool),
    /// Cardinality result
    Count(u64),
    /// Plain string read, `None` if the key is absent
    Value(Option<String>),
    /// Full hash record, empty if the key is absent
    Record(HashMap<String, String>),
    /// Set or range members
    Members(Vec<String>),
    /// 0-based rank, `None` if the member is absent
    Rank(Option<u64>),
}
