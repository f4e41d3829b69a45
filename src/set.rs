//! ChainSet: element-only view over `ChainTable`.

use crate::config::{Resolved, TableConfig, DEFAULT_INITIAL_BINS, DEFAULT_LOAD_THRESHOLD};
use crate::cursor::Cursor;
use crate::error::Result;
use crate::hash::{HashFn, KeyHash, StdHash};
use crate::table::{self, ChainTable};
use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::hash::Hash;

#[derive(Clone)]
pub struct ChainSet<T, S = StdHash> {
    table: ChainTable<T, (), S>,
}

impl<T> ChainSet<T>
where
    T: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            table: ChainTable::from_resolved(Resolved {
                hasher: StdHash::default(),
                load_threshold: DEFAULT_LOAD_THRESHOLD,
                initial_bins: DEFAULT_INITIAL_BINS,
            }),
        }
    }
}

impl<T> Default for ChainSet<T>
where
    T: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ChainSet<T, HashFn<T>>
where
    T: Eq,
{
    pub fn with_hash_fn(f: fn(&T) -> i64) -> Self {
        Self {
            table: ChainTable::from_resolved(Resolved {
                hasher: HashFn::new(f),
                load_threshold: DEFAULT_LOAD_THRESHOLD,
                initial_bins: DEFAULT_INITIAL_BINS,
            }),
        }
    }
}

impl<T, S> ChainSet<T, S>
where
    T: Eq,
    S: KeyHash<T>,
{
    pub fn with_config(config: TableConfig<S>) -> Result<Self> {
        Ok(Self {
            table: ChainTable::with_config(config)?,
        })
    }

    pub fn copy_from(source: &Self, config: TableConfig<S>) -> Result<Self>
    where
        T: Clone,
        S: Clone,
    {
        Ok(Self {
            table: ChainTable::copy_from(&source.table, config)?,
        })
    }

    pub fn assign(&mut self, rhs: &Self)
    where
        T: Clone,
        S: Clone,
    {
        self.table.assign(&rhs.table);
    }

    pub fn from_elements<I>(config: TableConfig<S>, elements: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = Self::with_config(config)?;
        set.insert_all(elements);
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn bins(&self) -> usize {
        self.table.bins()
    }

    pub fn load_threshold(&self) -> f64 {
        self.table.load_threshold()
    }

    pub fn mod_count(&self) -> u64 {
        self.table.mod_count()
    }

    pub fn table(&self) -> &ChainTable<T, (), S> {
        &self.table
    }

    pub fn contains(&self, element: &T) -> bool {
        self.table.contains_key(element)
    }

    pub fn contains_all<I>(&self, elements: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        elements.into_iter().all(|e| self.contains(e.borrow()))
    }

    /// Add `element`; returns true if it was not already present.
    pub fn insert(&mut self, element: T) -> bool {
        if self.table.contains_key(&element) {
            return false;
        }
        self.table.insert_or_update(element, ());
        true
    }

    /// Remove `element`; returns true if it was present.
    pub fn erase(&mut self, element: &T) -> bool {
        self.table.remove(element).is_ok()
    }

    /// Remove and return the stored element equal to `element`.
    pub fn take(&mut self, element: &T) -> Result<T> {
        self.table.remove(element).map(|(t, ())| t)
    }

    /// `insert` every element; returns how many were processed.
    pub fn insert_all<I>(&mut self, elements: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        let mut count = 0;
        for e in elements {
            self.insert(e);
            count += 1;
        }
        count
    }

    /// `erase` every element; returns how many were processed.
    pub fn erase_all<I>(&mut self, elements: I) -> usize
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let mut count = 0;
        for e in elements {
            self.erase(e.borrow());
            count += 1;
        }
        count
    }

    /// Keep only elements that also occur in `elements`; returns how many
    /// were removed.
    pub fn retain_all<I>(&mut self, elements: I) -> usize
    where
        T: Clone,
        S: Clone,
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let mut keep: ChainTable<T, (), S> = ChainTable::from_resolved(Resolved {
            hasher: self.table.hasher().clone(),
            load_threshold: DEFAULT_LOAD_THRESHOLD,
            initial_bins: DEFAULT_INITIAL_BINS,
        });
        for e in elements {
            keep.insert_or_update(e.borrow().clone(), ());
        }
        self.table.retain(|t, _| keep.contains_key(t))
    }

    /// Keep only elements for which `keep` returns true; returns how many
    /// were removed.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        self.table.retain(|t, _| keep(t))
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn is_subset<S2>(&self, other: &ChainSet<T, S2>) -> bool
    where
        S2: KeyHash<T>,
    {
        self.len() <= other.len() && self.iter().all(|t| other.contains(t))
    }

    pub fn is_proper_subset<S2>(&self, other: &ChainSet<T, S2>) -> bool
    where
        S2: KeyHash<T>,
    {
        self.len() < other.len() && self.iter().all(|t| other.contains(t))
    }

    pub fn is_superset<S2>(&self, other: &ChainSet<T, S2>) -> bool
    where
        S2: KeyHash<T>,
    {
        other.is_subset(self)
    }

    pub fn is_proper_superset<S2>(&self, other: &ChainSet<T, S2>) -> bool
    where
        S2: KeyHash<T>,
    {
        other.is_proper_subset(self)
    }

    pub fn begin(&self) -> SetCursor {
        SetCursor(Cursor::begin(&self.table))
    }

    pub fn end(&self) -> SetCursor {
        SetCursor(Cursor::end(&self.table))
    }

    /// Per-bin dump: `bin[i]: a -> b -> TRAILER`, then the counters.
    pub fn layout(&self) -> String
    where
        T: fmt::Display,
    {
        self.table.layout(|t, _| t.to_string())
    }
}

impl<T, S> ChainSet<T, S> {
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }
}

/// Elements in bin order.
pub struct Iter<'a, T> {
    inner: table::Iter<'a, T, ()>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        self.inner.next().map(|(t, _)| t)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

pub struct IntoIter<T> {
    inner: table::IntoIter<T, ()>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.inner.next().map(|(t, ())| t)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Checked cursor over a `ChainSet`. See `Cursor`.
#[derive(Clone, Debug)]
pub struct SetCursor(Cursor);

impl SetCursor {
    pub fn is_end(&self) -> bool {
        self.0.is_end()
    }

    pub fn advance<T, S>(&mut self, set: &ChainSet<T, S>) -> Result<()>
    where
        T: Eq,
        S: KeyHash<T>,
    {
        self.0.advance(&set.table)
    }

    pub fn get<'a, T, S>(&self, set: &'a ChainSet<T, S>) -> Result<&'a T>
    where
        T: Eq,
        S: KeyHash<T>,
    {
        self.0.get(&set.table).map(|(t, _)| t)
    }

    pub fn erase<T, S>(&mut self, set: &mut ChainSet<T, S>) -> Result<T>
    where
        T: Eq,
        S: KeyHash<T>,
    {
        self.0.erase(&mut set.table).map(|(t, ())| t)
    }

    pub fn same_position<T, S>(&self, other: &SetCursor, set: &ChainSet<T, S>) -> Result<bool>
    where
        T: Eq,
        S: KeyHash<T>,
    {
        self.0.same_position(&other.0, &set.table)
    }
}

impl<T, S> PartialEq for ChainSet<T, S>
where
    T: Eq,
    S: KeyHash<T>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && other.iter().all(|t| self.contains(t))
    }
}

impl<T, S> Eq for ChainSet<T, S>
where
    T: Eq,
    S: KeyHash<T>,
{
}

/// Subset order: `a <= b` iff `a` is a subset of `b`, `a < b` iff a proper
/// subset. Sets where neither contains the other are unordered.
impl<T, S> PartialOrd for ChainSet<T, S>
where
    T: Eq,
    S: KeyHash<T>,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.len().cmp(&other.len()) {
            Ordering::Equal if self == other => Some(Ordering::Equal),
            Ordering::Less if self.is_subset(other) => Some(Ordering::Less),
            Ordering::Greater if other.is_subset(self) => Some(Ordering::Greater),
            _ => None,
        }
    }
}

impl<T: fmt::Debug, S> fmt::Debug for ChainSet<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// `set[a,b,c]` in iteration order.
impl<T: fmt::Display, S> fmt::Display for ChainSet<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("set[")?;
        for (i, t) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{t}")?;
        }
        f.write_str("]")
    }
}

impl<T, S> Extend<T> for ChainSet<T, S>
where
    T: Eq,
    S: KeyHash<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_all(iter);
    }
}

impl<T> FromIterator<T> for ChainSet<T>
where
    T: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.insert_all(iter);
        set
    }
}

impl<'a, T, S> IntoIterator for &'a ChainSet<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T, S> IntoIterator for ChainSet<T, S> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<T, S> From<ChainSet<T, S>> for Vec<T> {
    fn from(set: ChainSet<T, S>) -> Vec<T> {
        set.into_iter().collect()
    }
}
