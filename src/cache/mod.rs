//! Definition cache for RustDict.
//!
//! Successful lookups are written through to a local SQLite database so that
//! repeated queries are answered without touching the network.
//!
//! # Architecture
//!
//! * [`database`]: SQLite persistence, lazy schema creation, get/put.
//! * [`entry`]: the [`Record`] model and cache-key normalization.
//!
//! # Freshness
//!
//! Entries never expire. A cached record is replaced only when a later
//! successful query for the same `(word, source)` returns different content,
//! e.g. when the cache read was bypassed with `--disable-db-cache`.

pub mod database;
pub mod entry;

pub use database::{CacheError, CacheResult, CacheStore, PutOutcome};
pub use entry::{normalize_word, Record};
