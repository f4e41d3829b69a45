//! chain-table: a single-threaded separate-chaining hash table with a map
//! view, a set view, pluggable hash functions and checked cursors.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: one chained-hashing engine shared by a key → value map and a
//!   value-only set, with cursors that can erase while scanning and that
//!   notice when the table was changed behind their back.
//! - Layers:
//!   - ChainTable<K, V, S>: the engine. Bins of singly linked chains; nodes
//!     live in a generational arena and link to each other by handle.
//!   - ChainMap<K, V, S>: key/value view; `put` / `get` / `erase`, mutable
//!     indexing with default insertion, map equality.
//!   - ChainSet<T, S>: `ChainTable<T, (), S>` with set semantics and subset
//!     ordering.
//!   - Cursor: detached (bin, node) position plus the table identity and
//!     modification count it was taken at.
//!
//! Hash functions
//! - A table hashes through its `KeyHash` capability, never through
//!   `core::hash::Hash` directly. The function comes either from the hasher
//!   type (`StdHash` knows its own function) or from `TableConfig::hasher`
//!   (required for `HashFn`). Neither, or two disagreeing ones, is a
//!   `ConfigError` at construction.
//! - `i64` hashes are folded to a bin with `|h| mod bins`.
//!
//! Growth
//! - Before a new key is linked in, the table doubles its bin count until
//!   `len / bins <= load_threshold`, using floating-point division. Nodes
//!   are relinked, not copied. Bins never shrink, not even on `clear`.
//!
//! Modification counting
//! - Insert, update, erase, clear and resize each bump the table's
//!   mod_count. A cursor holding an older count fails every operation with
//!   `Error::ConcurrentModification`. A cursor's own erase resynchronizes it.
//!
//! Copying
//! - `copy_from` duplicates bins and chains when the new table's hasher
//!   agrees with the source's; otherwise it re-inserts every entry. `Clone`
//!   is always structural. Copies have a fresh identity, so cursors from the
//!   source are rejected with `Error::WrongTable`.
//!
//! Notes and non-goals
//! - Single-threaded; no internal locking.
//! - Lookups take `&K`; there is no `Borrow`-based lookup because the hash
//!   function is defined on `K` itself.
//! - No persistence, no ordered iteration.

mod config;
mod cursor;
mod error;
mod generation;
mod hash;
mod map;
mod set;
pub mod table;

#[cfg(test)]
mod table_proptest;

pub use config::{TableConfig, DEFAULT_INITIAL_BINS, DEFAULT_LOAD_THRESHOLD};
pub use cursor::Cursor;
pub use error::{CannotErase, ConfigError, Error, Result};
pub use generation::TableId;
pub use hash::{DefaultBuildHasher, HashFn, KeyHash, StdHash};
pub use map::{ChainMap, MapCursor};
pub use set::{ChainSet, IntoIter as SetIntoIter, Iter as SetIter, SetCursor};
pub use table::ChainTable;
