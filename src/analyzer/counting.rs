//! Counting convenience over [`CounterStore`].
//!
//! Most analyzers only ever bump counters by one. [`CounterTally`] wraps
//! a store with add/subtract conveniences and an optional subcategory
//! whitelist. Analyzers that need full control embed a bare
//! [`CounterStore`] instead; both flavors satisfy the same contract and
//! the engine cannot tell them apart.

use crate::counter::CounterStore;
use crate::error::StatsError;

/// A counter store wrapped with counting conveniences.
#[derive(Debug, Clone, Default)]
pub struct CounterTally {
    store: CounterStore,
    subcategories: Option<Vec<String>>,
    suppress_unknown: bool,
}

impl CounterTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict writes to the given subcategory labels. Writes outside
    /// the whitelist fail with [`StatsError::InvalidSubcategory`] unless
    /// suppression is enabled, in which case they are dropped.
    pub fn restricted(subcategories: Vec<String>) -> Self {
        Self {
            store: CounterStore::new(),
            subcategories: Some(subcategories),
            suppress_unknown: false,
        }
    }

    /// Silently drop writes to unknown subcategories instead of failing.
    pub fn suppress_unknown(mut self, yes: bool) -> Self {
        self.suppress_unknown = yes;
        self
    }

    /// Whether `subcat` may be written: `Ok(true)` to proceed,
    /// `Ok(false)` to drop silently, `Err` when the whitelist rejects it.
    fn check_subcat(&self, subcat: &str) -> Result<bool, StatsError> {
        match &self.subcategories {
            Some(list) if !list.iter().any(|s| s == subcat) => {
                if self.suppress_unknown {
                    Ok(false)
                } else {
                    Err(StatsError::InvalidSubcategory(subcat.to_string()))
                }
            }
            _ => Ok(true),
        }
    }

    /// Increment (`entry`, `subcat`) by one. Returns the new value.
    pub fn add(&mut self, entry: &str, subcat: &str) -> Result<i64, StatsError> {
        self.add_by(entry, subcat, 1)
    }

    /// Increment (`entry`, `subcat`) by `delta`.
    pub fn add_by(&mut self, entry: &str, subcat: &str, delta: i64) -> Result<i64, StatsError> {
        if !self.check_subcat(subcat)? {
            return Ok(self.store.get(entry, subcat));
        }
        Ok(self.store.delta(entry, subcat, delta))
    }

    /// Decrement (`entry`, `subcat`) by one.
    pub fn subtract(&mut self, entry: &str, subcat: &str) -> Result<i64, StatsError> {
        self.add_by(entry, subcat, -1)
    }

    /// Overwrite (`entry`, `subcat`) with `value`.
    pub fn set(&mut self, entry: &str, subcat: &str, value: i64) -> Result<(), StatsError> {
        if self.check_subcat(subcat)? {
            self.store.set(entry, subcat, value);
        }
        Ok(())
    }

    pub fn store(&self) -> &CounterStore {
        &self.store
    }

    pub fn reset(&mut self) {
        self.store.clear();
    }
}
