//! Full ranking of sites by gold per guardian, consumed greedily.

use std::collections::HashMap;

use tracing::debug;

use crate::core::{Site, SiteId};
use crate::error::{AllocError, AllocResult};
use crate::index::{RankIndex, RankKey, RatioTree};

/// Ranks every site by ratio and spends adventurers from the best site down.
///
/// The descending ranking is cached and rebuilt from the index after every
/// structural change, so reads never see a stale order.
#[derive(Debug)]
pub struct RankedListAllocator<I: RankIndex = RatioTree> {
    sites: Vec<Site>,
    names: HashMap<String, SiteId>,
    /// Key each site is currently filed under.
    keys: Vec<RankKey>,
    index: I,
    ranking: Vec<SiteId>,
    adventurers: u32,
    next_seq: u64,
}

impl RankedListAllocator<RatioTree> {
    pub fn new(sites: Vec<Site>, adventurers: u32) -> AllocResult<Self> {
        Self::with_index(sites, adventurers)
    }
}

impl<I: RankIndex> RankedListAllocator<I> {
    /// Builds the allocator over any ordered index.
    pub fn with_index(sites: Vec<Site>, adventurers: u32) -> AllocResult<Self> {
        let mut allocator = Self {
            sites: Vec::with_capacity(sites.len()),
            names: HashMap::with_capacity(sites.len()),
            keys: Vec::with_capacity(sites.len()),
            index: I::default(),
            ranking: Vec::new(),
            adventurers,
            next_seq: 0,
        };

        for site in sites {
            allocator.file_site(site)?;
        }
        allocator.rebuild_ranking();

        debug!(
            sites = allocator.sites.len(),
            adventurers,
            "Ranked allocator built"
        );

        Ok(allocator)
    }

    /// Adds one more site to the ranking.
    pub fn add_site(&mut self, site: Site) -> AllocResult<SiteId> {
        let id = self.file_site(site)?;
        self.rebuild_ranking();
        Ok(id)
    }

    fn file_site(&mut self, site: Site) -> AllocResult<SiteId> {
        if self.names.contains_key(site.name()) {
            return Err(AllocError::DuplicateSite(site.name().to_string()));
        }

        let id = SiteId(self.sites.len());
        let key = self.fresh_key(&site);

        self.index.insert(key, id);
        self.names.insert(site.name().to_string(), id);
        self.keys.push(key);
        self.sites.push(site);

        Ok(id)
    }

    fn fresh_key(&mut self, site: &Site) -> RankKey {
        let key = RankKey::new(site.ratio(), self.next_seq);
        self.next_seq += 1;
        key
    }

    fn rebuild_ranking(&mut self) {
        let mut ranking = self.index.ascending();
        ranking.reverse();
        self.ranking = ranking;
    }

    /// Greedy dry run for the configured pool: fully claim sites in ranking
    /// order until the remainder only covers part of a site.
    ///
    /// An unguarded site reached with adventurers to spare is listed with
    /// zero sent. Sites are left untouched, so repeated calls give the same
    /// answer.
    pub fn select_sites(&self) -> Vec<(&Site, u32)> {
        let mut remaining = self.adventurers;
        let mut result = Vec::new();

        for &id in &self.ranking {
            if remaining == 0 {
                break;
            }

            let site = &self.sites[id.0];
            if remaining >= site.guardians() {
                remaining -= site.guardians();
                result.push((site, site.guardians()));
            } else {
                result.push((site, remaining));
                break;
            }
        }

        result
    }

    /// Answers many independent pool sizes in one pass over the ranking.
    ///
    /// Queries are served in ascending pool size and each one only spends
    /// its increase over the previous query, so a larger pool is credited
    /// with everything a smaller pool took. A site left partially claimed
    /// keeps the reduced stats. Totals come back in the order of `queries`.
    pub fn select_sites_from_adventure_numbers(&mut self, queries: &[u32]) -> Vec<f64> {
        let mut order: Vec<(u32, usize)> = queries
            .iter()
            .enumerate()
            .map(|(i, &pool)| (pool, i))
            .collect();
        order.sort_unstable();

        let mut totals = vec![0.0; queries.len()];
        let mut running = 0.0;
        let mut spent = 0;
        let mut cursor = 0;

        for (pool, query) in order {
            let mut budget = pool - spent;
            spent = pool;

            while budget > 0 && cursor < self.ranking.len() {
                let site = &mut self.sites[self.ranking[cursor].0];
                let guardians = site.guardians();

                if guardians == 0 {
                    cursor += 1;
                } else if budget >= guardians {
                    running += site.gold();
                    budget -= guardians;
                    cursor += 1;
                } else {
                    running += site.claim(budget);
                    budget = 0;
                }
            }

            totals[query] = running;
        }

        debug!(
            queries = queries.len(),
            sites_consumed = cursor,
            "Batched selection complete"
        );

        totals
    }

    /// Replaces a site's stats and re-files it under its new ratio.
    pub fn update_site(&mut self, id: SiteId, gold: f64, guardians: u32) -> AllocResult<()> {
        let old_key = *self.keys.get(id.0).ok_or(AllocError::UnknownSite(id))?;

        // Validate before unfiling so a rejected update leaves the index intact.
        let mut updated = self.sites[id.0].clone();
        updated.set_stats(gold, guardians)?;

        self.index
            .remove(&old_key)
            .ok_or(AllocError::KeyNotFound { site: id })?;

        let key = self.fresh_key(&updated);
        self.index.insert(key, id);
        self.keys[id.0] = key;
        self.sites[id.0] = updated;

        self.rebuild_ranking();

        debug!(
            site = %self.sites[id.0].name(),
            old_ratio = old_key.ratio,
            new_ratio = key.ratio,
            "Site updated"
        );

        Ok(())
    }

    pub fn site(&self, id: SiteId) -> Option<&Site> {
        self.sites.get(id.0)
    }

    pub fn find(&self, name: &str) -> Option<SiteId> {
        self.names.get(name).copied()
    }

    /// Sites in insertion order.
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// Cached ranking, best ratio first.
    pub fn ranking(&self) -> impl Iterator<Item = (SiteId, &Site)> + '_ {
        self.ranking.iter().map(|&id| (id, &self.sites[id.0]))
    }

    pub fn adventurers(&self) -> u32 {
        self.adventurers
    }

    pub fn set_adventurers(&mut self, adventurers: u32) {
        self.adventurers = adventurers;
    }

    pub fn index(&self) -> &I {
        &self.index
    }
}
