//! In-memory reference backend
//!
//! `MemoryStore` implements [`Store`] over a `parking_lot::RwLock`-protected
//! keyspace. It is the executable contract of the trait: tests and examples
//! run against it, and any networked backend is expected to agree with its
//! semantics:
//!
//! - one keyspace shared by all structure shapes; accessing a key with an
//!   operation of the wrong shape fails with `WrongType`
//! - removing the last member of a set or sorted set removes the key, and
//!   an empty batched hash write is a no-op, so `exists` never reports an
//!   empty collection
//! - sorted members order by `(score, member)` with total float ordering

use crate::command::Order;
use crate::error::{StoreError, StoreResult};
use crate::traits::Store;
use crate::zset::SortedSet;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
enum Entry {
    Value(String),
    Hash(HashMap<String, String>),
    Set(HashSet<String>),
    Sorted(SortedSet),
}

impl Entry {
    fn shape(&self) -> &'static str {
        match self {
            Entry::Value(_) => "string",
            Entry::Hash(_) => "hash",
            Entry::Set(_) => "set",
            Entry::Sorted(_) => "sorted set",
        }
    }
}

/// Thread-safe in-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    keyspace: RwLock<HashMap<String, Entry>>,
}

impl MemoryStore {
    /// An empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys, across all structure shapes
    pub fn key_count(&self) -> usize {
        self.keyspace.read().len()
    }

    /// Drop every key
    pub fn flush(&self) {
        self.keyspace.write().clear();
    }

    fn wrong_type(key: &str, expected: &'static str, entry: &Entry) -> StoreError {
        StoreError::WrongType {
            key: key.to_string(),
            expected,
            found: entry.shape(),
        }
    }
}

impl Store for MemoryStore {
    fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.keyspace.read().contains_key(key))
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match self.keyspace.read().get(key) {
            None => Ok(None),
            Some(Entry::Value(v)) => Ok(Some(v.clone())),
            Some(other) => Err(Self::wrong_type(key, "string", other)),
        }
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut keyspace = self.keyspace.write();
        match keyspace.get(key) {
            None | Some(Entry::Value(_)) => {
                keyspace.insert(key.to_string(), Entry::Value(value.to_string()));
                Ok(())
            }
            Some(other) => Err(Self::wrong_type(key, "string", other)),
        }
    }

    fn del(&self, key: &str) -> StoreResult<bool> {
        Ok(self.keyspace.write().remove(key).is_some())
    }

    fn hgetall(&self, key: &str) -> StoreResult<HashMap<String, String>> {
        match self.keyspace.read().get(key) {
            None => Ok(HashMap::new()),
            Some(Entry::Hash(h)) => Ok(h.clone()),
            Some(other) => Err(Self::wrong_type(key, "hash", other)),
        }
    }

    fn hset(&self, key: &str, field: &str, value: &str) -> StoreResult<()> {
        let mut keyspace = self.keyspace.write();
        match keyspace
            .entry(key.to_string())
            .or_insert_with(|| Entry::Hash(HashMap::new()))
        {
            Entry::Hash(h) => {
                h.insert(field.to_string(), value.to_string());
                Ok(())
            }
            other => Err(Self::wrong_type(key, "hash", other)),
        }
    }

    fn hmset(&self, key: &str, entries: &[(String, String)]) -> StoreResult<()> {
        // An empty write must not materialize an empty hash: `exists`
        // reporting a zero-field record would break "absent ⇔ zero fields".
        if entries.is_empty() {
            return Ok(());
        }
        let mut keyspace = self.keyspace.write();
        match keyspace
            .entry(key.to_string())
            .or_insert_with(|| Entry::Hash(HashMap::new()))
        {
            Entry::Hash(h) => {
                for (field, value) in entries {
                    h.insert(field.clone(), value.clone());
                }
                Ok(())
            }
            other => Err(Self::wrong_type(key, "hash", other)),
        }
    }

    fn sadd(&self, key: &str, member: &str) -> StoreResult<bool> {
        let mut keyspace = self.keyspace.write();
        match keyspace
            .entry(key.to_string())
            .or_insert_with(|| Entry::Set(HashSet::new()))
        {
            Entry::Set(s) => Ok(s.insert(member.to_string())),
            other => Err(Self::wrong_type(key, "set", other)),
        }
    }

    fn srem(&self, key: &str, member: &str) -> StoreResult<bool> {
        let mut keyspace = self.keyspace.write();
        let removed = match keyspace.get_mut(key) {
            None => return Ok(false),
            Some(Entry::Set(s)) => s.remove(member),
            Some(other) => return Err(Self::wrong_type(key, "set", other)),
        };
        if removed {
            if let Some(Entry::Set(s)) = keyspace.get(key) {
                if s.is_empty() {
                    keyspace.remove(key);
                }
            }
        }
        Ok(removed)
    }

    fn smembers(&self, key: &str) -> StoreResult<Vec<String>> {
        match self.keyspace.read().get(key) {
            None => Ok(Vec::new()),
            Some(Entry::Set(s)) => Ok(s.iter().cloned().collect()),
            Some(other) => Err(Self::wrong_type(key, "set", other)),
        }
    }

    fn zadd(&self, key: &str, score: f64, member: &str) -> StoreResult<bool> {
        let mut keyspace = self.keyspace.write();
        match keyspace
            .entry(key.to_string())
            .or_insert_with(|| Entry::Sorted(SortedSet::new()))
        {
            Entry::Sorted(z) => Ok(z.insert(member, score)),
            other => Err(Self::wrong_type(key, "sorted set", other)),
        }
    }

    fn zrem(&self, key: &str, member: &str) -> StoreResult<bool> {
        let mut keyspace = self.keyspace.write();
        let removed = match keyspace.get_mut(key) {
            None => return Ok(false),
            Some(Entry::Sorted(z)) => z.remove(member),
            Some(other) => return Err(Self::wrong_type(key, "sorted set", other)),
        };
        if removed {
            if let Some(Entry::Sorted(z)) = keyspace.get(key) {
                if z.is_empty() {
                    keyspace.remove(key);
                }
            }
        }
        Ok(removed)
    }

    fn zrange(&self, key: &str, start: i64, stop: i64, order: Order) -> StoreResult<Vec<String>> {
        match self.keyspace.read().get(key) {
            None => Ok(Vec::new()),
            Some(Entry::Sorted(z)) => Ok(z.range(start, stop, order)),
            Some(other) => Err(Self::wrong_type(key, "sorted set", other)),
        }
    }

    fn zrange_by_score(
        &self,
        key: &str,
        min: f64,
        max: f64,
        order: Order,
    ) -> StoreResult<Vec<String>> {
        match self.keyspace.read().get(key) {
            None => Ok(Vec::new()),
            Some(Entry::Sorted(z)) => Ok(z.range_by_score(min, max, order)),
            Some(other) => Err(Self::wrong_type(key, "sorted set", other)),
        }
    }

    fn zrank(&self, key: &str, member: &str, order: Order) -> StoreResult<Option<u64>> {
        match self.keyspace.read().get(key) {
            None => Ok(None),
            Some(Entry::Sorted(z)) => Ok(z.rank(member, order)),
            Some(other) => Err(Self::wrong_type(key, "sorted set", other)),
        }
    }

    fn zcount(&self, key: &str, min: f64, max: f64) -> StoreResult<u64> {
        match self.keyspace.read().get(key) {
            None => Ok(0),
            Some(Entry::Sorted(z)) => Ok(z.count(min, max)),
            Some(other) => Err(Self::wrong_type(key, "sorted set", other)),
        }
    }
}
