//! ChainTable: the separate-chaining engine behind `ChainMap` and `ChainSet`.
//!
//! Layout
//! - `nodes` is an arena (`SlotMap`) owning every entry; a `NodeKey` is the
//!   link from one node to the next in its chain.
//! - `bins[i]` is the head of chain `i`, `None` when the chain is empty. New
//!   nodes are spliced in at the head, so "insert into an empty chain" and
//!   "insert in front of an existing chain" are the same operation.
//! - Growth relinks nodes into a fresh bin vector; entries never move in the
//!   arena, so `NodeKey`s stay valid across resizes.
//!
//! Every structural change (insert, update, erase, clear, resize) bumps the
//! table's `ModCount`, which is what `Cursor` checks against.

use crate::config::{Resolved, TableConfig};
use crate::error::{ConfigError, Error, Result};
use crate::generation::{ModCount, TableId};
use crate::hash::KeyHash;
use core::fmt;
use core::mem;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Arena handle of one chain node.
    pub struct NodeKey;
}

#[derive(Clone, Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    next: Option<NodeKey>,
}

pub struct ChainTable<K, V, S> {
    hasher: S,
    bins: Vec<Option<NodeKey>>,
    nodes: SlotMap<NodeKey, Node<K, V>>,
    load_threshold: f64,
    mod_count: ModCount,
    id: TableId,
}

#[inline]
fn compress<K, S>(hasher: &S, key: &K, bins: usize) -> usize
where
    K: ?Sized,
    S: KeyHash<K>,
{
    debug_assert!(bins > 0, "hash_compress with zero bins");
    (hasher.hash_key(key).unsigned_abs() % bins as u64) as usize
}

impl<K, V, S> ChainTable<K, V, S>
where
    K: Eq,
    S: KeyHash<K>,
{
    pub fn with_config(config: TableConfig<S>) -> Result<Self, ConfigError> {
        Ok(Self::from_resolved(config.resolve::<K>()?))
    }

    pub(crate) fn from_resolved(resolved: Resolved<S>) -> Self {
        Self {
            hasher: resolved.hasher,
            bins: vec![None; resolved.initial_bins],
            nodes: SlotMap::with_key(),
            load_threshold: resolved.load_threshold,
            mod_count: ModCount::new(),
            id: TableId::fresh(),
        }
    }

    /// Copy `source` into a new table configured by `config`.
    ///
    /// If `config` resolves no hasher, the source's is inherited. When the
    /// resolved hasher agrees with the source's, the bins and chains are
    /// duplicated as they are; otherwise every entry is re-inserted under the
    /// new hasher.
    pub fn copy_from(source: &Self, config: TableConfig<S>) -> Result<Self, ConfigError>
    where
        K: Clone,
        V: Clone,
        S: Clone,
    {
        let resolved = config.resolve_or::<K>(Some(source.hasher.clone()))?;
        if resolved.hasher.agrees_with(&source.hasher) {
            tracing::debug!(
                bins = source.bins.len(),
                used = source.len(),
                "structural table copy"
            );
            let mut copy = Self {
                hasher: resolved.hasher,
                bins: source.bins.clone(),
                nodes: source.nodes.clone(),
                load_threshold: resolved.load_threshold,
                mod_count: ModCount::new(),
                id: TableId::fresh(),
            };
            copy.ensure_load_threshold(copy.len());
            Ok(copy)
        } else {
            tracing::debug!(used = source.len(), "rehashing table copy");
            let mut copy = Self::from_resolved(resolved);
            for (k, v) in source.iter() {
                copy.insert_or_update(k.clone(), v.clone());
            }
            Ok(copy)
        }
    }

    /// Replace this table's contents with a copy of `rhs`, taking its hasher.
    /// This table keeps its identity and load threshold; outstanding cursors
    /// are invalidated.
    pub fn assign(&mut self, rhs: &Self)
    where
        K: Clone,
        V: Clone,
        S: Clone,
    {
        if self.id == rhs.id {
            return;
        }
        self.hasher = rhs.hasher.clone();
        self.bins = rhs.bins.clone();
        self.nodes = rhs.nodes.clone();
        self.ensure_load_threshold(self.len());
        self.mod_count.bump();
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Current bin count. Never shrinks.
    pub fn bins(&self) -> usize {
        self.bins.len()
    }

    pub fn load_threshold(&self) -> f64 {
        self.load_threshold
    }

    pub fn mod_count(&self) -> u64 {
        self.mod_count.get()
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    pub(crate) fn generation(&self) -> ModCount {
        self.mod_count
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Bin index `key` belongs to under the current bin count.
    pub fn hash_compress(&self, key: &K) -> usize {
        compress(&self.hasher, key, self.bins.len())
    }

    pub fn find(&self, key: &K) -> Option<NodeKey> {
        let mut cur = self.bins[self.hash_compress(key)];
        while let Some(nk) = cur {
            let node = &self.nodes[nk];
            if node.key == *key {
                return Some(nk);
            }
            cur = node.next;
        }
        None
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|nk| &self.nodes[nk].value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let nk = self.find(key)?;
        Some(&mut self.nodes[nk].value)
    }

    pub fn entry(&self, nk: NodeKey) -> Option<(&K, &V)> {
        self.nodes.get(nk).map(|n| (&n.key, &n.value))
    }

    // `nk` must be live.
    pub(crate) fn node_value(&self, nk: NodeKey) -> &V {
        &self.nodes[nk].value
    }

    // `nk` must be live.
    pub(crate) fn node_value_mut(&mut self, nk: NodeKey) -> &mut V {
        &mut self.nodes[nk].value
    }

    pub fn entry_mut(&mut self, nk: NodeKey) -> Option<(&K, &mut V)> {
        self.nodes.get_mut(nk).map(|n| (&n.key, &mut n.value))
    }

    /// Store `value` under `key`.
    ///
    /// Returns the node holding the entry and the value it replaced, if any.
    /// A fresh key is spliced in at the head of its chain after the table has
    /// grown to accommodate it.
    pub fn insert_or_update(&mut self, key: K, value: V) -> (NodeKey, Option<V>) {
        self.mod_count.bump();
        if let Some(nk) = self.find(&key) {
            let old = mem::replace(&mut self.nodes[nk].value, value);
            return (nk, Some(old));
        }
        self.ensure_load_threshold(self.len() + 1);
        let bin = self.hash_compress(&key);
        let next = self.bins[bin];
        let nk = self.nodes.insert(Node { key, value, next });
        self.bins[bin] = Some(nk);
        (nk, None)
    }

    /// Remove `key`, returning the owned entry.
    pub fn remove(&mut self, key: &K) -> Result<(K, V)> {
        let bin = self.hash_compress(key);
        let mut prev = None;
        let mut cur = self.bins[bin];
        while let Some(nk) = cur {
            let node = &self.nodes[nk];
            if node.key == *key {
                return self.detach(bin, prev, nk).ok_or(Error::KeyNotFound);
            }
            prev = Some(nk);
            cur = node.next;
        }
        Err(Error::KeyNotFound)
    }

    /// Remove the node `nk`, which must live in chain `bin`.
    pub(crate) fn remove_node(&mut self, bin: usize, nk: NodeKey) -> Option<(K, V)> {
        let mut prev = None;
        let mut cur = *self.bins.get(bin)?;
        while let Some(k) = cur {
            if k == nk {
                return self.detach(bin, prev, nk);
            }
            prev = Some(k);
            cur = self.nodes[k].next;
        }
        None
    }

    // Unlink `nk` (whose predecessor in chain `bin` is `prev`) and free it.
    fn detach(&mut self, bin: usize, prev: Option<NodeKey>, nk: NodeKey) -> Option<(K, V)> {
        let node = self.nodes.remove(nk)?;
        match prev {
            None => self.bins[bin] = node.next,
            Some(p) => self.nodes[p].next = node.next,
        }
        self.mod_count.bump();
        Some((node.key, node.value))
    }

    /// Drop every entry. The bin count is kept.
    pub fn clear(&mut self) {
        tracing::trace!(bins = self.bins.len(), used = self.len(), "clearing table");
        self.nodes.clear();
        self.bins.fill(None);
        self.mod_count.bump();
    }

    /// Keep only the entries for which `keep` returns true; returns how many
    /// were removed.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut removed = 0;
        for bin in 0..self.bins.len() {
            let mut prev = None;
            let mut cur = self.bins[bin];
            while let Some(nk) = cur {
                let node = &mut self.nodes[nk];
                cur = node.next;
                if keep(&node.key, &mut node.value) {
                    prev = Some(nk);
                } else {
                    self.detach(bin, prev, nk);
                    removed += 1;
                }
            }
        }
        removed
    }

    // Grow until `new_used / bins <= load_threshold`.
    fn ensure_load_threshold(&mut self, new_used: usize) {
        let mut bins = self.bins.len();
        while new_used as f64 / bins as f64 > self.load_threshold {
            let doubled = bins.saturating_mul(2);
            if doubled == bins {
                break;
            }
            bins = doubled;
        }
        if bins != self.bins.len() {
            self.rehash(bins);
        }
    }

    fn rehash(&mut self, new_bins: usize) {
        tracing::debug!(
            from = self.bins.len(),
            to = new_bins,
            used = self.len(),
            "resizing table"
        );
        let old = mem::replace(&mut self.bins, vec![None; new_bins]);
        for head in old {
            let mut cur = head;
            while let Some(nk) = cur {
                let node = &mut self.nodes[nk];
                cur = node.next;
                let bin = compress(&self.hasher, &node.key, new_bins);
                node.next = self.bins[bin];
                self.bins[bin] = Some(nk);
            }
        }
        self.mod_count.bump();
    }
}

impl<K, V, S> ChainTable<K, V, S> {
    /// First live node in bin `from` or any later bin.
    pub(crate) fn first_from(&self, from: usize) -> Option<(usize, NodeKey)> {
        self.bins
            .iter()
            .enumerate()
            .skip(from)
            .find_map(|(i, head)| head.map(|nk| (i, nk)))
    }

    /// Position following node `nk` of chain `bin` in iteration order.
    pub(crate) fn successor(&self, bin: usize, nk: NodeKey) -> Option<(usize, NodeKey)> {
        match self.nodes.get(nk).and_then(|n| n.next) {
            Some(next) => Some((bin, next)),
            None => self.first_from(bin + 1),
        }
    }

    /// Entries of one chain, head first.
    pub fn chain(&self, bin: usize) -> Chain<'_, K, V> {
        Chain {
            nodes: &self.nodes,
            next: self.bins.get(bin).copied().flatten(),
        }
    }

    /// Entries in bin order, each chain head first.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            bins: &self.bins,
            nodes: &self.nodes,
            bin: 0,
            next: None,
            remaining: self.nodes.len(),
        }
    }

    /// Mutable access to every value, in arena order.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            it: self.nodes.iter_mut(),
        }
    }

    /// Diagnostic dump, one line per bin:
    /// `bin[0]: <entry> -> <entry> -> TRAILER`.
    pub fn layout<F>(&self, mut show: F) -> String
    where
        F: FnMut(&K, &V) -> String,
    {
        let mut out = String::new();
        for bin in 0..self.bins.len() {
            out.push_str(&format!("bin[{bin}]: "));
            for (k, v) in self.chain(bin) {
                out.push_str(&show(k, v));
                out.push_str(" -> ");
            }
            out.push_str("TRAILER\n");
        }
        out.push_str(&format!(
            "(bins={},used={},mod_count={})",
            self.bins.len(),
            self.nodes.len(),
            self.mod_count.get()
        ));
        out
    }
}

impl<K, V, S> Clone for ChainTable<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    /// Structural copy with a fresh identity.
    fn clone(&self) -> Self {
        Self {
            hasher: self.hasher.clone(),
            bins: self.bins.clone(),
            nodes: self.nodes.clone(),
            load_threshold: self.load_threshold,
            mod_count: ModCount::new(),
            id: TableId::fresh(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for ChainTable<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> IntoIterator for ChainTable<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter {
            it: self.nodes.into_iter(),
        }
    }
}

/// Iterator over one chain.
pub struct Chain<'a, K, V> {
    nodes: &'a SlotMap<NodeKey, Node<K, V>>,
    next: Option<NodeKey>,
}

impl<'a, K, V> Iterator for Chain<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.nodes.get(self.next?)?;
        self.next = node.next;
        Some((&node.key, &node.value))
    }
}

/// Iterator over all entries in bin order.
pub struct Iter<'a, K, V> {
    bins: &'a [Option<NodeKey>],
    nodes: &'a SlotMap<NodeKey, Node<K, V>>,
    bin: usize,
    next: Option<NodeKey>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(nk) = self.next {
                let node = self.nodes.get(nk)?;
                self.next = node.next;
                self.remaining -= 1;
                return Some((&node.key, &node.value));
            }
            self.next = *self.bins.get(self.bin)?;
            self.bin += 1;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}

pub struct IterMut<'a, K, V> {
    it: slotmap::basic::IterMut<'a, NodeKey, Node<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, n)| (&n.key, &mut n.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

pub struct IntoIter<K, V> {
    it: slotmap::basic::IntoIter<NodeKey, Node<K, V>>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, n)| (n.key, n.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}
