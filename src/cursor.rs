//! Checked cursors over a `ChainTable`.
//!
//! A `Cursor` does not borrow its table. It remembers which table it came
//! from, the (bin, node) position it is at, and the table's mod_count when it
//! was made. Every operation takes the table explicitly and fails instead of
//! acting on stale state:
//! - wrong table: `Error::WrongTable`;
//! - table changed behind the cursor's back: `Error::ConcurrentModification`;
//! - reading an exhausted or just-erased position: `Error::IllegalIteratorState`;
//! - erasing twice, or at the end: `Error::CannotErase`.
//!
//! Erasing through the cursor moves it to the erased node's successor and
//! resynchronizes its mod_count. The next `advance` only re-arms erasure, so a
//! scan that erases as it goes visits every remaining element exactly once.

use crate::error::{CannotErase, Error, Result};
use crate::generation::TableId;
use crate::hash::KeyHash;
use crate::table::{ChainTable, NodeKey};

/// A checked position in a table. See the module docs.
#[derive(Clone, Debug)]
pub struct Cursor {
    table: TableId,
    position: Option<(usize, NodeKey)>,
    expected_mod_count: u64,
    can_erase: bool,
}

impl Cursor {
    /// Cursor at the first element in bin order, or exhausted if empty.
    pub fn begin<K, V, S>(table: &ChainTable<K, V, S>) -> Self
    where
        K: Eq,
        S: KeyHash<K>,
    {
        Self {
            table: table.id(),
            position: table.first_from(0),
            expected_mod_count: table.mod_count(),
            can_erase: true,
        }
    }

    /// Exhausted cursor.
    pub fn end<K, V, S>(table: &ChainTable<K, V, S>) -> Self
    where
        K: Eq,
        S: KeyHash<K>,
    {
        Self {
            table: table.id(),
            position: None,
            expected_mod_count: table.mod_count(),
            can_erase: true,
        }
    }

    pub fn is_end(&self) -> bool {
        self.position.is_none()
    }

    /// Bin the cursor is in, `None` once exhausted.
    pub fn bin(&self) -> Option<usize> {
        self.position.map(|(bin, _)| bin)
    }

    pub fn can_erase(&self) -> bool {
        self.can_erase
    }

    pub fn table_id(&self) -> TableId {
        self.table
    }

    fn check<K, V, S>(&self, table: &ChainTable<K, V, S>) -> Result<()>
    where
        K: Eq,
        S: KeyHash<K>,
    {
        self.table.check(table.id())?;
        table.generation().check(self.expected_mod_count)
    }

    /// Step to the next element. After an erase this only re-arms erasure:
    /// the cursor already sits on the erased element's successor.
    pub fn advance<K, V, S>(&mut self, table: &ChainTable<K, V, S>) -> Result<()>
    where
        K: Eq,
        S: KeyHash<K>,
    {
        self.check(table)?;
        let Some((bin, nk)) = self.position else {
            return Ok(());
        };
        if self.can_erase {
            self.position = table.successor(bin, nk);
        } else {
            self.can_erase = true;
        }
        Ok(())
    }

    pub fn get<'a, K, V, S>(&self, table: &'a ChainTable<K, V, S>) -> Result<(&'a K, &'a V)>
    where
        K: Eq,
        S: KeyHash<K>,
    {
        self.check(table)?;
        let nk = self.live_node()?;
        table.entry(nk).ok_or(Error::IllegalIteratorState)
    }

    /// Mutable access to the value under the cursor. Not a structural change.
    pub fn get_mut<'a, K, V, S>(
        &self,
        table: &'a mut ChainTable<K, V, S>,
    ) -> Result<(&'a K, &'a mut V)>
    where
        K: Eq,
        S: KeyHash<K>,
    {
        self.check(table)?;
        let nk = self.live_node()?;
        table.entry_mut(nk).ok_or(Error::IllegalIteratorState)
    }

    fn live_node(&self) -> Result<NodeKey> {
        match self.position {
            Some((_, nk)) if self.can_erase => Ok(nk),
            _ => Err(Error::IllegalIteratorState),
        }
    }

    /// Remove the element under the cursor from `table` and return it.
    pub fn erase<K, V, S>(&mut self, table: &mut ChainTable<K, V, S>) -> Result<(K, V)>
    where
        K: Eq,
        S: KeyHash<K>,
    {
        self.check(table)?;
        if !self.can_erase {
            return Err(Error::CannotErase(CannotErase::AlreadyErased));
        }
        let (bin, nk) = self
            .position
            .ok_or(Error::CannotErase(CannotErase::PastEnd))?;
        // Step off the node before it is freed.
        let successor = table.successor(bin, nk);
        let removed = table
            .remove_node(bin, nk)
            .ok_or(Error::IllegalIteratorState)?;
        tracing::trace!(bin, "erased at cursor");
        self.position = successor;
        self.can_erase = false;
        self.expected_mod_count = table.mod_count();
        Ok(removed)
    }

    /// Whether both cursors are at the same position of `table`.
    pub fn same_position<K, V, S>(&self, other: &Cursor, table: &ChainTable<K, V, S>) -> Result<bool>
    where
        K: Eq,
        S: KeyHash<K>,
    {
        self.check(table)?;
        other.table.check(self.table)?;
        Ok(self.position == other.position)
    }
}
