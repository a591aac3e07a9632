use std::{
    collections::{BTreeMap, HashSet},
    fs,
    path::Path,
};

use anyhow::{Context, Result};
use tracing::info;

use crate::alloc::{RankedListAllocator, ThresholdHeapAllocator};
use crate::core::{generate_sites, Site, SiteId, SiteTable};
use crate::index::{RankKey, RatioTree};
use crate::utils::{make_rng, seeded_rng};

use super::options::{IndexKind, NavigatorOptions};

/// Ranked allocator over whichever index the options picked.
#[derive(Debug)]
pub enum Ranked {
    Tree(RankedListAllocator<RatioTree>),
    BTree(RankedListAllocator<BTreeMap<RankKey, SiteId>>),
}

impl Ranked {
    fn build(kind: IndexKind, sites: Vec<Site>, adventurers: u32) -> Result<Self> {
        Ok(match kind {
            IndexKind::Tree => Ranked::Tree(RankedListAllocator::new(sites, adventurers)?),
            IndexKind::BTree => {
                Ranked::BTree(RankedListAllocator::with_index(sites, adventurers)?)
            }
        })
    }

    pub fn select_sites(&self) -> Vec<(String, u32)> {
        let selection = match self {
            Ranked::Tree(a) => a.select_sites(),
            Ranked::BTree(a) => a.select_sites(),
        };
        selection
            .into_iter()
            .map(|(site, sent)| (site.name().to_string(), sent))
            .collect()
    }

    pub fn select_sites_from_adventure_numbers(&mut self, queries: &[u32]) -> Vec<f64> {
        match self {
            Ranked::Tree(a) => a.select_sites_from_adventure_numbers(queries),
            Ranked::BTree(a) => a.select_sites_from_adventure_numbers(queries),
        }
    }

    pub fn update_site(&mut self, name: &str, gold: f64, guardians: u32) -> Result<()> {
        match self {
            Ranked::Tree(a) => {
                let id = a.find(name).with_context(|| format!("unknown site {}", name))?;
                a.update_site(id, gold, guardians)?;
            }
            Ranked::BTree(a) => {
                let id = a.find(name).with_context(|| format!("unknown site {}", name))?;
                a.update_site(id, gold, guardians)?;
            }
        }
        Ok(())
    }

    /// Sites best ratio first.
    pub fn ranking(&self) -> Vec<&Site> {
        match self {
            Ranked::Tree(a) => a.ranking().map(|(_, s)| s).collect(),
            Ranked::BTree(a) => a.ranking().map(|(_, s)| s).collect(),
        }
    }

    pub fn adventurers(&self) -> u32 {
        match self {
            Ranked::Tree(a) => a.adventurers(),
            Ranked::BTree(a) => a.adventurers(),
        }
    }

    /// Changes the pool used by `select_sites` without rebuilding the index.
    pub fn set_adventurers(&mut self, adventurers: u32) {
        match self {
            Ranked::Tree(a) => a.set_adventurers(adventurers),
            Ranked::BTree(a) => a.set_adventurers(adventurers),
        }
    }
}

/// Holds the pending site list and the allocators built from it
#[derive(Debug, Default)]
pub struct Navigator {
    pub options: NavigatorOptions,
    pub pending: Vec<Site>,
    pub ranked: Option<Ranked>,
    pub threshold: Option<ThresholdHeapAllocator>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_option(&mut self, name: &str, value: &str) -> Result<()> {
        self.options.set_option(name, value)
    }

    pub fn add_site(&mut self, site: Site) {
        self.pending.push(site);
    }

    /// Reads `name gold guardians` lines; blank lines and `#` comments are skipped.
    pub fn load_sites(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let mut loaded = Vec::new();
        for (n, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let site = line
                .parse::<Site>()
                .with_context(|| format!("{}:{}", path.display(), n + 1))?;
            loaded.push(site);
        }

        let count = loaded.len();
        self.pending.extend(loaded);
        info!(path = %path.display(), count, "Sites loaded");
        Ok(count)
    }

    /// Appends generated sites named `site<k>`, skipping names already pending.
    pub fn random_sites(&mut self, count: usize, seed: Option<u64>) -> usize {
        let mut rng = match seed {
            Some(seed) => seeded_rng(seed),
            None => make_rng(),
        };

        let taken: HashSet<String> = self.pending.iter().map(|s| s.name().to_string()).collect();
        let mut next = self.pending.len();

        for _ in 0..count {
            while taken.contains(&format!("site{}", next)) {
                next += 1;
            }
            self.pending.extend(generate_sites(&mut rng, next, 1));
            next += 1;
        }

        count
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.ranked = None;
        self.threshold = None;
    }

    pub fn build_ranked(&mut self, adventurers: u32) -> Result<()> {
        let ranked = Ranked::build(self.options.index, self.pending.clone(), adventurers)?;
        self.ranked = Some(ranked);
        Ok(())
    }

    /// Builds a threshold allocator from the pending sites; returns how many were admitted.
    pub fn build_threshold(&mut self) -> Result<usize> {
        let mut threshold =
            ThresholdHeapAllocator::with_cutoff(self.options.teams, self.options.cutoff)?;
        let admitted = threshold.add_sites(self.pending.iter().cloned());
        self.threshold = Some(threshold);
        Ok(admitted)
    }

    pub fn ranked(&self) -> Result<&Ranked> {
        self.ranked.as_ref().context("ranked allocator not built")
    }

    pub fn ranked_mut(&mut self) -> Result<&mut Ranked> {
        self.ranked.as_mut().context("ranked allocator not built")
    }

    pub fn threshold(&self) -> Result<&ThresholdHeapAllocator> {
        self.threshold.as_ref().context("threshold allocator not built")
    }

    pub fn threshold_mut(&mut self) -> Result<&mut ThresholdHeapAllocator> {
        self.threshold
            .as_mut()
            .context("threshold allocator not built")
    }

    /// Tables for whichever allocators are built, or the pending sites.
    pub fn display(&self) -> String {
        let mut out = String::new();

        if let Some(ranked) = &self.ranked {
            out += &format!("Ranked ({} adventurers):\n", ranked.adventurers());
            out += &SiteTable::new(ranked.ranking()).to_string();
        }
        if let Some(threshold) = &self.threshold {
            out += &format!(
                "Threshold ({} teams, cutoff {}):\n",
                threshold.teams(),
                threshold.cutoff()
            );
            out += &SiteTable::new(threshold.sites())
                .with_cutoff(threshold.cutoff())
                .to_string();
        }
        if self.ranked.is_none() && self.threshold.is_none() {
            out += "Pending:\n";
            out += &SiteTable::new(&self.pending).to_string();
        }

        out
    }

    /// Runs one day and reports `(site name, adventurers, gold)` per team.
    pub fn simulate_day(&mut self, adventurer_size: u32) -> Result<Vec<(Option<String>, u32, f64)>> {
        let threshold = self.threshold_mut()?;
        let reports = threshold.simulate_day(adventurer_size);

        Ok(reports
            .into_iter()
            .map(|report| {
                let name = report
                    .site
                    .and_then(|id| threshold.site(id))
                    .map(|site| site.name().to_string());
                (name, report.adventurers, report.gold)
            })
            .collect())
    }
}
