//! Table construction settings and hasher resolution.

use crate::error::ConfigError;
use crate::hash::KeyHash;

pub const DEFAULT_LOAD_THRESHOLD: f64 = 1.0;
pub const DEFAULT_INITIAL_BINS: usize = 1;

/// Builder for table construction.
///
/// ```
/// use chain_table::{ChainMap, HashFn, TableConfig};
///
/// fn by_len(s: &String) -> i64 {
///     s.len() as i64
/// }
///
/// let cfg = TableConfig::new()
///     .hasher(HashFn::new(by_len))
///     .load_threshold(0.75)
///     .initial_bins(8);
/// let map: ChainMap<String, u32, HashFn<String>> = ChainMap::with_config(cfg).unwrap();
/// assert_eq!(map.bins(), 8);
/// ```
#[derive(Clone, Debug)]
pub struct TableConfig<S> {
    hasher: Option<S>,
    // Later call-level hashers, kept only to be checked against the first.
    extra_hashers: Vec<S>,
    load_threshold: f64,
    initial_bins: usize,
}

impl<S> Default for TableConfig<S> {
    fn default() -> Self {
        Self {
            hasher: None,
            extra_hashers: Vec::new(),
            load_threshold: DEFAULT_LOAD_THRESHOLD,
            initial_bins: DEFAULT_INITIAL_BINS,
        }
    }
}

/// Settings after validation.
#[derive(Debug)]
pub(crate) struct Resolved<S> {
    pub hasher: S,
    pub load_threshold: f64,
    pub initial_bins: usize,
}

impl<S> TableConfig<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply the hash function. If any later call supplies a different one,
    /// construction fails with `ConflictingHashers`.
    pub fn hasher(mut self, hasher: S) -> Self {
        if self.hasher.is_none() {
            self.hasher = Some(hasher);
        } else {
            self.extra_hashers.push(hasher);
        }
        self
    }

    /// Maximum `len / bins` ratio tolerated after an insert.
    pub fn load_threshold(mut self, threshold: f64) -> Self {
        self.load_threshold = threshold;
        self
    }

    /// Starting bin count. Zero is treated as one.
    pub fn initial_bins(mut self, bins: usize) -> Self {
        self.initial_bins = bins;
        self
    }

    pub(crate) fn resolve<K>(self) -> Result<Resolved<S>, ConfigError>
    where
        K: ?Sized,
        S: KeyHash<K>,
    {
        self.resolve_or::<K>(None)
    }

    /// Resolve, falling back to `inherited` when neither the hasher type nor
    /// the caller names a function.
    pub(crate) fn resolve_or<K>(self, inherited: Option<S>) -> Result<Resolved<S>, ConfigError>
    where
        K: ?Sized,
        S: KeyHash<K>,
    {
        if !(self.load_threshold.is_finite() && self.load_threshold > 0.0) {
            return Err(ConfigError::InvalidLoadThreshold(self.load_threshold));
        }
        if let Some(first) = &self.hasher {
            if !self.extra_hashers.iter().all(|h| first.agrees_with(h)) {
                return Err(ConfigError::ConflictingHashers);
            }
        }
        let hasher = match (S::type_default(), self.hasher) {
            (Some(t), Some(c)) if !t.agrees_with(&c) => {
                return Err(ConfigError::ConflictingHashers)
            }
            (_, Some(c)) => c,
            (Some(t), None) => t,
            (None, None) => inherited.ok_or(ConfigError::MissingHasher)?,
        };
        Ok(Resolved {
            hasher,
            load_threshold: self.load_threshold,
            initial_bins: self.initial_bins.max(1),
        })
    }
}
