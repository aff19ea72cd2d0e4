//! Couplings between functions of the two compared modules.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A proposed correspondence between a function of the first module and a
/// function of the second one. `diff` is the assumption strength: 0 means the
/// functions are known to be identical, higher values are more speculative.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coupling {
    pub first: String,
    pub second: String,
    pub diff: u32,
}

impl Coupling {
    pub fn new(first: impl Into<String>, second: impl Into<String>, diff: u32) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
            diff,
        }
    }
}

/// Ordered collection of couplings, optionally bound to the function pair
/// whose callees it describes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CouplingSet {
    caller: Option<(String, String)>,
    couplings: Vec<Coupling>,
}

impl CouplingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty set of couplings between the callees of `first` and `second`.
    pub fn called_by(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            caller: Some((first.into(), second.into())),
            couplings: vec![],
        }
    }

    pub fn push(&mut self, coupling: Coupling) {
        self.couplings.push(coupling);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coupling> {
        self.couplings.iter()
    }

    pub fn len(&self) -> usize {
        self.couplings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.couplings.is_empty()
    }

    /// Removes couplings of the caller pair with itself and duplicate name
    /// pairs. A duplicate keeps the position of its first occurrence and the
    /// lowest diff seen for it.
    pub fn clean(&mut self) {
        if let Some((first, second)) = &self.caller {
            self.couplings
                .retain(|c| !(&c.first == first && &c.second == second));
        }
        let mut lowest: BTreeMap<(String, String), u32> = BTreeMap::new();
        for c in &self.couplings {
            lowest
                .entry((c.first.clone(), c.second.clone()))
                .and_modify(|diff| *diff = (*diff).min(c.diff))
                .or_insert(c.diff);
        }
        self.couplings = std::mem::take(&mut self.couplings)
            .into_iter()
            .unique_by(|c| (c.first.clone(), c.second.clone()))
            .map(|mut c| {
                c.diff = lowest[&(c.first.clone(), c.second.clone())];
                c
            })
            .collect();
    }

    /// Distinct assumption levels in ascending order. A set without couplings
    /// has the single level 0, which stands for "no assumptions".
    pub fn levels(&self) -> Vec<u32> {
        let levels: Vec<u32> = self.couplings.iter().map(|c| c.diff).sorted().dedup().collect();
        if levels.is_empty() {
            vec![0]
        } else {
            levels
        }
    }

    /// Couplings usable at `level`.
    pub fn up_to(&self, level: u32) -> Vec<Coupling> {
        self.couplings
            .iter()
            .filter(|c| c.diff <= level)
            .cloned()
            .collect()
    }

    /// Couplings that are actual assumptions (not known identities) at `level`.
    pub fn assumed_at(&self, level: u32) -> Vec<Coupling> {
        self.couplings
            .iter()
            .filter(|c| c.diff > 0 && c.diff <= level)
            .cloned()
            .collect()
    }
}

impl FromIterator<Coupling> for CouplingSet {
    fn from_iter<I: IntoIterator<Item = Coupling>>(iter: I) -> Self {
        Self {
            caller: None,
            couplings: iter.into_iter().collect(),
        }
    }
}

impl Extend<Coupling> for CouplingSet {
    fn extend<I: IntoIterator<Item = Coupling>>(&mut self, iter: I) {
        self.couplings.extend(iter);
    }
}
