//! Modification counting and table identity.
//!
//! Every structural change to a table bumps its `ModCount`. A cursor records
//! the count it last saw and refuses to act once the table has moved on. A
//! cursor also records the `TableId` it was created from so it can never be
//! used against a different table.

use crate::error::{Error, Result};
use core::sync::atomic::{AtomicU64, Ordering};

static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one table instance. Clones and copies get fresh ids.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TableId(u64);

impl TableId {
    pub(crate) fn fresh() -> Self {
        TableId(NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Fails with `WrongTable` unless `self == other`.
    #[inline]
    pub(crate) fn check(self, other: TableId) -> Result<()> {
        if self == other {
            Ok(())
        } else {
            Err(Error::WrongTable)
        }
    }
}

/// Monotonic generation counter owned by a table.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ModCount(u64);

impl ModCount {
    pub const fn new() -> Self {
        ModCount(0)
    }

    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }

    #[inline]
    pub(crate) fn bump(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }

    /// Fails with `ConcurrentModification` unless `expected` is current.
    #[inline]
    pub(crate) fn check(self, expected: u64) -> Result<()> {
        if self.0 == expected {
            Ok(())
        } else {
            Err(Error::ConcurrentModification {
                expected,
                actual: self.0,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = TableId::fresh();
        let b = TableId::fresh();
        assert_ne!(a, b);
        assert!(a.check(a).is_ok());
        assert_eq!(a.check(b), Err(Error::WrongTable));
    }

    #[test]
    fn bump_invalidates_old_snapshots() {
        let mut m = ModCount::new();
        let seen = m.get();
        assert!(m.check(seen).is_ok());
        m.bump();
        assert_eq!(
            m.check(seen),
            Err(Error::ConcurrentModification {
                expected: 0,
                actual: 1
            })
        );
        assert!(m.check(m.get()).is_ok());
    }
}
