//! objmap-mapper: typed entities over a key-value store
//!
//! The [`EntityMapper`] is the operational surface of the workspace. Given a
//! [`Store`](objmap_store::Store) handle and the schemas entity types declare
//! through [`Entity`](objmap_core::Entity), it keeps four keyspace families
//! consistent per type:
//!
//! - primary hash records, one per entity
//! - unique indexes (value -> id, one entity per value)
//! - set indexes (value -> ids)
//! - rankings (ids ordered by a field's score)
//!
//! and exposes insert/query/update/delete plus index, range, rank and count
//! lookups over them.

pub mod mapper;

pub use mapper::EntityMapper;
pub use objmap_store::Order;
