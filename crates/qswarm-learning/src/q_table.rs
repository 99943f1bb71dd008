//! Per-agent action-value tables.
//!
//! A [`QTable`] maps `(state, action)` keys to values. Missing entries are initialized
//! lazily: the first read of a key draws a uniform value from `[0, 1)` and stores it, so
//! later reads of the same key return the same value until it is written.
//!
//! Entries are kept in a [`BTreeMap`] so iteration order, and therefore every RNG draw
//! that depends on it (such as mutation during cloning), is reproducible for a seed.

use std::collections::{BTreeMap, btree_map::Entry};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{action::Action, state::StateKey};

/// Key of a single Q-table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QKey {
    pub state: StateKey,
    pub action: Action,
}

impl QKey {
    #[must_use]
    pub const fn new(state: StateKey, action: Action) -> Self {
        Self { state, action }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct QTable {
    values: BTreeMap<QKey, f64>,
}

impl QTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `(state, action)`, materializing a random one if absent.
    ///
    /// # Example
    ///
    /// ```
    /// use qswarm_learning::{action::Action, q_table::QTable, state::StateKey};
    /// use rand::SeedableRng;
    /// use rand_pcg::Pcg32;
    ///
    /// let mut rng = Pcg32::seed_from_u64(7);
    /// let mut table = QTable::new();
    /// let state = StateKey::Coarse { x: 1, y: 2 };
    ///
    /// let first = table.get(state, Action::Left, &mut rng);
    /// assert!((0.0..1.0).contains(&first));
    /// assert_eq!(table.get(state, Action::Left, &mut rng), first);
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn get<R>(&mut self, state: StateKey, action: Action, rng: &mut R) -> f64
    where
        R: Rng + ?Sized,
    {
        match self.values.entry(QKey::new(state, action)) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => *entry.insert(rng.random::<f64>()),
        }
    }

    /// Returns the value for `(state, action)` without materializing it.
    #[must_use]
    pub fn peek(&self, state: StateKey, action: Action) -> Option<f64> {
        self.values.get(&QKey::new(state, action)).copied()
    }

    pub fn set(&mut self, state: StateKey, action: Action, value: f64) {
        self.values.insert(QKey::new(state, action), value);
    }

    /// Values of all four actions in `state`, in [`Action::ALL`] order.
    ///
    /// Absent entries are materialized.
    pub fn action_values<R>(&mut self, state: StateKey, rng: &mut R) -> [(Action, f64); Action::LEN]
    where
        R: Rng + ?Sized,
    {
        Action::ALL.map(|action| (action, self.get(state, action, rng)))
    }

    /// Maximum value over the four actions in `state`, materializing absent entries.
    pub fn max_over_actions<R>(&mut self, state: StateKey, rng: &mut R) -> f64
    where
        R: Rng + ?Sized,
    {
        self.action_values(state, rng)
            .into_iter()
            .map(|(_, value)| value)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&QKey, &f64)> + '_ {
        self.values.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &QKey> + '_ {
        self.values.keys()
    }
}

impl FromIterator<(QKey, f64)> for QTable {
    fn from_iter<T: IntoIterator<Item = (QKey, f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
