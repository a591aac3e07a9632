//! Sites above an efficiency cutoff, served from a max-heap of adjusted scores.

use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap},
};

use tracing::{debug, trace};

use crate::core::{Site, SiteId};
use crate::error::{AllocError, AllocResult};

/// Default gold per guardian a site must beat to be worth attacking.
pub const DEFAULT_CUTOFF: f64 = 2.5;

/// What one team did during a simulated day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamReport {
    pub site: Option<SiteId>,
    pub adventurers: u32,
    pub gold: f64,
}

impl TeamReport {
    pub fn idle() -> Self {
        Self {
            site: None,
            adventurers: 0,
            gold: 0.0,
        }
    }
}

/// Heap entry. Only the entry whose version matches the site's current
/// version is live; older pushes are discarded when they surface.
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    score: f64,
    version: u64,
    site: SiteId,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.site.cmp(&self.site))
            .then_with(|| self.version.cmp(&other.version))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

/// Serves a fixed number of teams per day from the best-scoring site.
///
/// A site scores `gold - cutoff * guardians`. After each dispatch the site is
/// pushed again under its new score instead of being updated in place.
#[derive(Debug)]
pub struct ThresholdHeapAllocator {
    teams: usize,
    cutoff: f64,
    sites: Vec<Site>,
    versions: Vec<u64>,
    table: HashMap<String, SiteId>,
    queue: BinaryHeap<QueueEntry>,
}

impl ThresholdHeapAllocator {
    pub fn new(teams: usize) -> Self {
        Self {
            teams,
            cutoff: DEFAULT_CUTOFF,
            sites: Vec::new(),
            versions: Vec::new(),
            table: HashMap::new(),
            queue: BinaryHeap::new(),
        }
    }

    pub fn with_cutoff(teams: usize, cutoff: f64) -> AllocResult<Self> {
        if !cutoff.is_finite() || cutoff < 0.0 {
            return Err(AllocError::InvalidCutoff(cutoff));
        }

        Ok(Self {
            cutoff,
            ..Self::new(teams)
        })
    }

    /// Admits every candidate whose ratio strictly exceeds the cutoff and
    /// returns how many were admitted. A candidate with a known name replaces
    /// that site's stats. Candidates below the cutoff are dropped.
    pub fn add_sites(&mut self, sites: impl IntoIterator<Item = Site>) -> usize {
        let mut admitted = 0;

        for candidate in sites {
            if candidate.ratio() <= self.cutoff {
                trace!(site = %candidate.name(), ratio = candidate.ratio(), "Site below cutoff");
                continue;
            }

            let id = match self.table.get(candidate.name()) {
                Some(&id) => {
                    self.sites[id.0] = candidate;
                    id
                }
                None => {
                    let id = SiteId(self.sites.len());
                    self.table.insert(candidate.name().to_string(), id);
                    self.sites.push(candidate);
                    self.versions.push(0);
                    id
                }
            };

            self.enqueue(id);
            admitted += 1;
        }

        debug!(admitted, queued = self.queue.len(), "Sites admitted");
        admitted
    }

    /// Pushes the site under its current score, superseding older entries.
    fn enqueue(&mut self, id: SiteId) {
        self.versions[id.0] += 1;
        let entry = QueueEntry {
            score: self.score(&self.sites[id.0]),
            version: self.versions[id.0],
            site: id,
        };
        self.queue.push(entry);
    }

    fn pop_live(&mut self) -> Option<SiteId> {
        while let Some(entry) = self.queue.pop() {
            if entry.version == self.versions[entry.site.0] {
                return Some(entry.site);
            }
            trace!(site = %entry.site, version = entry.version, "Skipping stale entry");
        }
        None
    }

    /// Sends each team, up to `adventurer_size` strong, to the best site left.
    pub fn simulate_day(&mut self, adventurer_size: u32) -> Vec<TeamReport> {
        let mut reports = Vec::with_capacity(self.teams);

        for team in 0..self.teams {
            let Some(id) = self.pop_live() else {
                reports.push(TeamReport::idle());
                continue;
            };

            let site = &mut self.sites[id.0];
            let sent = site.guardians().min(adventurer_size);
            let gold = site.claim(sent);
            let ratio = site.ratio();

            debug!(
                team,
                site = %site.name(),
                adventurers = sent,
                gold,
                "Team dispatched"
            );
            reports.push(TeamReport {
                site: Some(id),
                adventurers: sent,
                gold,
            });

            if ratio > self.cutoff {
                self.enqueue(id);
            } else {
                // No live entry remains for this site.
                self.versions[id.0] += 1;
            }
        }

        reports
    }

    /// Adjusted score used for ordering: `gold - cutoff * guardians`.
    pub fn score(&self, site: &Site) -> f64 {
        site.gold() - self.cutoff * site.guardians() as f64
    }

    pub fn teams(&self) -> usize {
        self.teams
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn site(&self, id: SiteId) -> Option<&Site> {
        self.sites.get(id.0)
    }

    /// Looks up an admitted site by name. The site may no longer be queued.
    pub fn lookup(&self, name: &str) -> Option<&Site> {
        self.table.get(name).map(|id| &self.sites[id.0])
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// Heap length, stale entries included.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }
}
