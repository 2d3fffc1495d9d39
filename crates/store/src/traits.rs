//! The store collaborator boundary
//!
//! Everything the mapping layer requires of the external key-value store is
//! captured by the [`Store`] trait: key existence, hash records, sets,
//! score-ordered sets, and batched submission. Wire protocol and connection
//! management live entirely behind implementations of this trait.

use crate::command::{Command, Order, Reply};
use crate::error::StoreResult;
use std::collections::HashMap;

/// Operations the mapping layer requires of a key-value store
///
/// Implementations must be shareable across threads; each method is one
/// logical round trip. The provided [`pipeline`](Store::pipeline) executes a
/// command sequence and returns per-command replies in order; backends with
/// a native batching facility should override it, but may not promise
/// atomicity across the batch either way.
pub trait Store: Send + Sync {
    /// Whether any structure exists at `key`
    fn exists(&self, key: &str) -> StoreResult<bool>;

    /// Read a plain string key
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write a plain string key, overwriting any previous string value
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Delete a key of any shape; returns `true` if it existed
    fn del(&self, key: &str) -> StoreResult<bool>;

    /// Read a full hash record; empty map if the key is absent
    fn hgetall(&self, key: &str) -> StoreResult<HashMap<String, String>>;

    /// Write one field of a hash record, creating the record if needed
    fn hset(&self, key: &str, field: &str, value: &str) -> StoreResult<()>;

    /// Write several fields of a hash record in one operation
    fn hmset(&self, key: &str, entries: &[(String, String)]) -> StoreResult<()>;

    /// Add a member to a set; returns `true` if newly added
    fn sadd(&self, key: &str, member: &str) -> StoreResult<bool>;

    /// Remove a member from a set; returns `true` if it was present
    ///
    /// Removing from an absent set or an absent member is a no-op.
    fn srem(&self, key: &str, member: &str) -> StoreResult<bool>;

    /// All members of a set, order unspecified; empty if the key is absent
    fn smembers(&self, key: &str) -> StoreResult<Vec<String>>;

    /// Add or rescore a member of a sorted structure; `true` if newly added
    fn zadd(&self, key: &str, score: f64, member: &str) -> StoreResult<bool>;

    /// Remove a member from a sorted structure; `true` if it was present
    fn zrem(&self, key: &str, member: &str) -> StoreResult<bool>;

    /// Inclusive rank range `[start, stop]`, negative indices from the end
    fn zrange(&self, key: &str, start: i64, stop: i64, order: Order) -> StoreResult<Vec<String>>;

    /// All members scored within `[min, max]`
    fn zrange_by_score(&self, key: &str, min: f64, max: f64, order: Order)
        -> StoreResult<Vec<String>>;

    /// A member's 0-based rank, `None` if absent
    fn zrank(&self, key: &str, member: &str, order: Order) -> StoreResult<Option<u64>>;

    /// Number of members scored within `[min, max]`
    fn zcount(&self, key: &str, min: f64, max: f64) -> StoreResult<u64>;

    /// Execute one command, producing its reply
    fn execute(&self, command: &Command) -> StoreResult<Reply> {
        match command {
            Command::Exists { key } => self.exists(key).map(Reply::Bool),
            Command::Get { key } => self.get(key).map(Reply::Value),
            Command::Set { key, value } => self.set(key, value).map(|()| Reply::Unit),
            Command::Del { key } => self.del(key).map(Reply::Bool),
            Command::HGetAll { key } => self.hgetall(key).map(Reply::Record),
            Command::HSet { key, field, value } => {
                self.hset(key, field, value).map(|()| Reply::Unit)
            }
            Command::HMSet { key, entries } => self.hmset(key, entries).map(|()| Reply::Unit),
            Command::SAdd { key, member } => self.sadd(key, member).map(Reply::Bool),
            Command::SRem { key, member } => self.srem(key, member).map(Reply::Bool),
            Command::SMembers { key } => self.smembers(key).map(Reply::Members),
            Command::ZAdd { key, score, member } => {
                self.zadd(key, *score, member).map(Reply::Bool)
            }
            Command::ZRem { key, member } => self.zrem(key, member).map(Reply::Bool),
            Command::ZRange {
                key,
                start,
                stop,
                order,
            } => self.zrange(key, *start, *stop, *order).map(Reply::Members),
            Command::ZRangeByScore {
                key,
                min,
                max,
                order,
            } => self
                .zrange_by_score(key, *min, *max, *order)
                .map(Reply::Members),
            Command::ZRank { key, member, order } => {
                self.zrank(key, member, *order).map(Reply::Rank)
            }
            Command::ZCount { key, min, max } => self.zcount(key, *min, *max).map(Reply::Count),
        }
    }

    /// Execute a command sequence as one submission
    ///
    /// Replies are returned in command order. The default implementation
    /// dispatches sequentially; the first failing command aborts the rest.
    fn pipeline(&self, commands: &[Command]) -> StoreResult<Vec<Reply>> {
        commands.iter().map(|c| self.execute(c)).collect()
    }
}
