//! Pluggable hash functions.
//!
//! A table never hashes through `core::hash::Hash` directly; it asks its
//! `KeyHash` capability for an `i64` and compresses that into a bin index.
//! The capability is supplied once, either by the hasher type itself
//! (`KeyHash::type_default`) or by the caller through `TableConfig`.

use core::fmt;
use core::hash::{BuildHasher, BuildHasherDefault, Hash};
use std::collections::hash_map::DefaultHasher;

/// A hash function usable by a chained table.
pub trait KeyHash<K: ?Sized> {
    /// Hash `key`. Any `i64` is fine; negative values are folded by the table.
    fn hash_key(&self, key: &K) -> i64;

    /// True when `self` and `other` compute the same function, i.e. a table
    /// built with one can share bin layout with a table built with the other.
    fn agrees_with(&self, other: &Self) -> bool;

    /// The hasher implied by the type alone, if the type fully determines the
    /// function. `None` means a hasher must be supplied at construction.
    fn type_default() -> Option<Self>
    where
        Self: Sized,
    {
        None
    }
}

/// A hash function given as a plain `fn` pointer.
///
/// Agreement:
/// - Two `HashFn`s built with `tagged` agree exactly when their tags are equal.
/// - Otherwise they agree when they point at the same function. Function
///   addresses are not guaranteed stable: the same function may get distinct
///   addresses in different codegen units, and identical functions may be
///   merged. Use `tagged` when hashers are built in more than one place and
///   must be recognised as the same function.
pub struct HashFn<K: ?Sized> {
    f: fn(&K) -> i64,
    tag: Option<&'static str>,
}

impl<K: ?Sized> HashFn<K> {
    pub const fn new(f: fn(&K) -> i64) -> Self {
        Self { f, tag: None }
    }

    /// `f` with an explicit identity used for agreement checks.
    pub const fn tagged(tag: &'static str, f: fn(&K) -> i64) -> Self {
        Self { f, tag: Some(tag) }
    }

    pub fn tag(&self) -> Option<&'static str> {
        self.tag
    }
}

impl<K: ?Sized> Clone for HashFn<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: ?Sized> Copy for HashFn<K> {}

impl<K: ?Sized> fmt::Debug for HashFn<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tag {
            Some(tag) => f.debug_tuple("HashFn").field(&tag).finish(),
            None => f.debug_tuple("HashFn").field(&(self.f as *const ())).finish(),
        }
    }
}

impl<K: ?Sized> KeyHash<K> for HashFn<K> {
    #[inline]
    fn hash_key(&self, key: &K) -> i64 {
        (self.f)(key)
    }

    fn agrees_with(&self, other: &Self) -> bool {
        match (self.tag, other.tag) {
            (Some(a), Some(b)) => a == b,
            _ => core::ptr::fn_addr_eq(self.f, other.f),
        }
    }
}

/// Deterministic `BuildHasher` used when no other one is named.
pub type DefaultBuildHasher = BuildHasherDefault<DefaultHasher>;

/// Adapter hashing any `K: Hash` through a `BuildHasher`.
///
/// `StdHash<S>` carries its own type-level default, so tables using it can be
/// built without naming a hasher.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StdHash<S = DefaultBuildHasher>(S);

impl<S> StdHash<S> {
    pub fn new(build: S) -> Self {
        StdHash(build)
    }

    pub fn build_hasher(&self) -> &S {
        &self.0
    }
}

impl<K, S> KeyHash<K> for StdHash<S>
where
    K: ?Sized + Hash,
    S: BuildHasher + PartialEq + Default,
{
    #[inline]
    fn hash_key(&self, key: &K) -> i64 {
        self.0.hash_one(key) as i64
    }

    fn agrees_with(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    fn type_default() -> Option<Self> {
        Some(StdHash(S::default()))
    }
}
