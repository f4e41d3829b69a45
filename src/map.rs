//! ChainMap: key → value view over `ChainTable`.

use crate::config::{Resolved, TableConfig, DEFAULT_INITIAL_BINS, DEFAULT_LOAD_THRESHOLD};
use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::hash::{HashFn, KeyHash, StdHash};
use crate::table::{self, ChainTable};
use core::fmt;
use core::hash::Hash;
use core::ops::Index;

#[derive(Clone)]
pub struct ChainMap<K, V, S = StdHash> {
    table: ChainTable<K, V, S>,
}

impl<K, V> ChainMap<K, V>
where
    K: Eq + Hash,
{
    /// Empty map hashing keys with `StdHash`, one bin, load threshold 1.0.
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

impl<K, V> Default for ChainMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> ChainMap<K, V, HashFn<K>>
where
    K: Eq,
{
    /// Empty map hashing keys with `f`, one bin, load threshold 1.0.
    pub fn with_hash_fn(f: fn(&K) -> i64) -> Self {
        Self {
            table: ChainTable::from_resolved(Resolved {
                hasher: HashFn::new(f),
                load_threshold: DEFAULT_LOAD_THRESHOLD,
                initial_bins: DEFAULT_INITIAL_BINS,
            }),
        }
    }
}

impl<K, V, S> ChainMap<K, V, S>
where
    K: Eq,
    S: KeyHash<K>,
{
    pub fn with_config(config: TableConfig<S>) -> Result<Self> {
        Ok(Self {
            table: ChainTable::with_config(config)?,
        })
    }

    /// Copy `source`; see `ChainTable::copy_from` for how the layout is kept
    /// or rebuilt.
    pub fn copy_from(source: &Self, config: TableConfig<S>) -> Result<Self>
    where
        K: Clone,
        V: Clone,
        S: Clone,
    {
        Ok(Self {
            table: ChainTable::copy_from(&source.table, config)?,
        })
    }

    /// Make this map a copy of `rhs` (including its hasher).
    pub fn assign(&mut self, rhs: &Self)
    where
        K: Clone,
        V: Clone,
        S: Clone,
    {
        self.table.assign(&rhs.table);
    }

    /// Build a map from `(key, value)` pairs under `config`. Later pairs
    /// overwrite earlier ones with the same key.
    pub fn from_pairs<I>(config: TableConfig<S>, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = Self::with_config(config)?;
        map.extend(pairs);
        Ok(map)
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

    /// The underlying engine, read-only.
    pub fn table(&self) -> &ChainTable<K, V, S> {
        &self.table
    }

    pub fn has_key(&self, key: &K) -> bool {
        self.table.contains_key(key)
    }

    /// Linear scan over every chain.
    pub fn has_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.table.iter().any(|(_, v)| v == value)
    }

    /// Associate `value` with `key`.
    ///
    /// Returns the value previously stored under `key`; for a key that was
    /// absent, returns (a clone of) the value just stored.
    pub fn put(&mut self, key: K, value: V) -> V
    where
        V: Clone,
    {
        match self.table.insert_or_update(key, value) {
            (_, Some(old)) => old,
            (nk, None) => self.table.node_value(nk).clone(),
        }
    }

    /// Associate `value` with `key`, returning the previous value if any.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.table.insert_or_update(key, value).1
    }

    /// `insert` every pair; returns how many pairs were processed.
    pub fn put_all<I>(&mut self, pairs: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut count = 0;
        for (k, v) in pairs {
            self.table.insert_or_update(k, v);
            count += 1;
        }
        count
    }

    /// Value stored under `key`. Never creates an entry.
    pub fn get(&self, key: &K) -> Result<&V> {
        self.table.get(key).ok_or(Error::KeyNotFound)
    }

    /// Mutable value stored under `key`. Never creates an entry.
    pub fn get_mut(&mut self, key: &K) -> Result<&mut V> {
        self.table.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// Mutable indexing: the value under `key`, inserting `V::default()`
    /// first if the key is absent.
    pub fn entry_or_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let nk = match self.table.find(&key) {
            Some(nk) => nk,
            None => self.table.insert_or_update(key, V::default()).0,
        };
        self.table.node_value_mut(nk)
    }

    /// Remove `key`, returning its value.
    pub fn erase(&mut self, key: &K) -> Result<V> {
        self.table.remove(key).map(|(_, v)| v)
    }

    /// Remove `key`, returning the owned key and value.
    pub fn remove_entry(&mut self, key: &K) -> Result<(K, V)> {
        self.table.remove(key)
    }

    /// Drop every entry, keeping the bin count.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Keep only the entries for which `keep` returns true; returns how many
    /// were removed.
    pub fn retain<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.table.retain(keep)
    }

    pub fn begin(&self) -> MapCursor {
        MapCursor(Cursor::begin(&self.table))
    }

    pub fn end(&self) -> MapCursor {
        MapCursor(Cursor::end(&self.table))
    }

    /// Per-bin dump: `bin[i]: k->v -> ... -> TRAILER`, then the counters.
    pub fn layout(&self) -> String
    where
        K: fmt::Display,
        V: fmt::Display,
    {
        self.table.layout(|k, v| format!("{k}->{v}"))
    }
}

impl<K, V, S> ChainMap<K, V, S> {
    pub fn iter(&self) -> table::Iter<'_, K, V> {
        self.table.iter()
    }

    pub fn iter_mut(&mut self) -> table::IterMut<'_, K, V> {
        self.table.iter_mut()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.table.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.table.iter().map(|(_, v)| v)
    }
}

/// Checked cursor over a `ChainMap`. See `Cursor`.
#[derive(Clone, Debug)]
pub struct MapCursor(Cursor);

impl MapCursor {
    pub fn is_end(&self) -> bool {
        self.0.is_end()
    }

    pub fn advance<K, V, S>(&mut self, map: &ChainMap<K, V, S>) -> Result<()>
    where
        K: Eq,
        S: KeyHash<K>,
    {
        self.0.advance(&map.table)
    }

    pub fn get<'a, K, V, S>(&self, map: &'a ChainMap<K, V, S>) -> Result<(&'a K, &'a V)>
    where
        K: Eq,
        S: KeyHash<K>,
    {
        self.0.get(&map.table)
    }

    pub fn value_mut<'a, K, V, S>(&self, map: &'a mut ChainMap<K, V, S>) -> Result<&'a mut V>
    where
        K: Eq,
        S: KeyHash<K>,
    {
        self.0.get_mut(&mut map.table).map(|(_, v)| v)
    }

    pub fn erase<K, V, S>(&mut self, map: &mut ChainMap<K, V, S>) -> Result<(K, V)>
    where
        K: Eq,
        S: KeyHash<K>,
    {
        self.0.erase(&mut map.table)
    }

    pub fn same_position<K, V, S>(&self, other: &MapCursor, map: &ChainMap<K, V, S>) -> Result<bool>
    where
        K: Eq,
        S: KeyHash<K>,
    {
        self.0.same_position(&other.0, &map.table)
    }
}

impl<K, V, S> Index<&K> for ChainMap<K, V, S>
where
    K: Eq,
    S: KeyHash<K>,
{
    type Output = V;

    /// Read-only indexing.
    ///
    /// # Panics
    ///
    /// Panics if `key` is absent; use `get` to handle that case.
    fn index(&self, key: &K) -> &V {
        match self.table.get(key) {
            Some(v) => v,
            None => panic!("key not found in ChainMap"),
        }
    }
}

impl<K, V, S> PartialEq for ChainMap<K, V, S>
where
    K: Eq,
    V: PartialEq,
    S: KeyHash<K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && other.iter().all(|(k, v)| self.table.get(k) == Some(v))
    }
}

impl<K, V, S> Eq for ChainMap<K, V, S>
where
    K: Eq,
    V: Eq,
    S: KeyHash<K>,
{
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for ChainMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.table, f)
    }
}

/// `map[k->v,k->v]` in iteration order.
impl<K: fmt::Display, V: fmt::Display, S> fmt::Display for ChainMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("map[")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{k}->{v}")?;
        }
        f.write_str("]")
    }
}

impl<K, V, S> Extend<(K, V)> for ChainMap<K, V, S>
where
    K: Eq,
    S: KeyHash<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.put_all(iter);
    }
}

impl<K, V> FromIterator<(K, V)> for ChainMap<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.put_all(iter);
        map
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = table::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.table.iter()
    }
}

impl<K, V, S> IntoIterator for ChainMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = table::IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.table.into_iter()
    }
}
