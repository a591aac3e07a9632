//! Ordered ranking indexes keyed by gold/guardian ratio.

mod tree;

pub use tree::{InOrder, RatioTree};

use std::{cmp::Ordering, collections::BTreeMap};

use crate::core::SiteId;

/// Sort key for the ranking.
///
/// The ratio only orders entries; `seq` tags each insertion so that equal
/// ratios stay distinct and removal never depends on recomputing a float.
/// Ascending order puts the later insertion first among equal ratios, so the
/// reversed (descending) ranking serves the earlier insertion first.
#[derive(Debug, Clone, Copy)]
pub struct RankKey {
    pub ratio: f64,
    pub seq: u64,
}

impl RankKey {
    pub fn new(ratio: f64, seq: u64) -> Self {
        Self { ratio, seq }
    }
}

impl Ord for RankKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ratio
            .total_cmp(&other.ratio)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for RankKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for RankKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RankKey {}

/// Ordered map from rank keys to sites.
pub trait RankIndex: Default {
    /// Inserts `site` under `key`, replacing any entry with an equal key.
    fn insert(&mut self, key: RankKey, site: SiteId);

    /// Removes the entry with exactly this key.
    fn remove(&mut self, key: &RankKey) -> Option<SiteId>;

    /// Sites in ascending key order.
    fn ascending(&self) -> Vec<SiteId>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RankIndex for BTreeMap<RankKey, SiteId> {
    fn insert(&mut self, key: RankKey, site: SiteId) {
        BTreeMap::insert(self, key, site);
    }

    fn remove(&mut self, key: &RankKey) -> Option<SiteId> {
        BTreeMap::remove(self, key)
    }

    fn ascending(&self) -> Vec<SiteId> {
        self.values().copied().collect()
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }
}
