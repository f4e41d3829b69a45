//! Error taxonomy shared by the engine, the views and their cursors.

use thiserror::Error;

/// Construction-time misconfiguration. Always a programmer error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("no hash function: the hasher type has no default and none was supplied")]
    MissingHasher,
    #[error("two different hash functions were supplied")]
    ConflictingHashers,
    #[error("load threshold must be finite and positive, got {0}")]
    InvalidLoadThreshold(f64),
}

/// Why a cursor refused to erase.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CannotErase {
    /// The element under the cursor was already erased; advance first.
    AlreadyErased,
    /// The cursor is exhausted.
    PastEnd,
}

impl core::fmt::Display for CannotErase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CannotErase::AlreadyErased => f.write_str("cursor element already erased"),
            CannotErase::PastEnd => f.write_str("cursor is beyond the table"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("key not found")]
    KeyNotFound,
    #[error("table modified while cursor was live (expected mod_count {expected}, found {actual})")]
    ConcurrentModification { expected: u64, actual: u64 },
    #[error("cursor does not reference a live element")]
    IllegalIteratorState,
    #[error("cannot erase: {0}")]
    CannotErase(CannotErase),
    #[error("cursor belongs to a different table")]
    WrongTable,
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
