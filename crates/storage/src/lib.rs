//! Storage layer for Wingman
//!
//! This crate provides the in-memory navigation cache and the durable
//! key-value store used for client-side persistence.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod kv;

pub use cache::{
    CacheConfig, CacheError, CacheStats, Clock, EntryMetadata, ManualClock, NavigationCache,
    SystemClock,
};
pub use kv::{KeyValueStore, KvConfig, KvError, KvStore, MemoryKvStore};
