//! Land sites: a gold reward guarded by a number of guardians.

use std::{fmt, str::FromStr};

use anyhow::Context;
use rand::Rng;

use crate::error::{AllocError, AllocResult};

/// Handle to a site inside an allocator's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SiteId(pub(crate) usize);

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A land site. Gold scales linearly with the guardians still standing.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    name: String,
    gold: f64,
    guardians: u32,
}

impl Site {
    pub fn new(name: impl Into<String>, gold: f64, guardians: u32) -> AllocResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(AllocError::InvalidSite("empty name".into()));
        }
        validate_gold(&name, gold)?;

        Ok(Self { name, gold, guardians })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gold(&self) -> f64 {
        self.gold
    }

    pub fn guardians(&self) -> u32 {
        self.guardians
    }

    /// Gold per guardian, or 0 once no guardians remain.
    pub fn ratio(&self) -> f64 {
        if self.guardians == 0 {
            0.0
        } else {
            self.gold / self.guardians as f64
        }
    }

    /// Gold obtained by sending `sent` adventurers, without touching the site.
    pub fn yield_for(&self, sent: u32) -> f64 {
        if self.guardians == 0 {
            return 0.0;
        }
        let sent = sent.min(self.guardians);
        (sent as f64 * self.gold / self.guardians as f64).min(self.gold)
    }

    /// Defeats up to `sent` guardians and removes the matching share of gold.
    /// Returns the gold removed.
    pub fn claim(&mut self, sent: u32) -> f64 {
        let sent = sent.min(self.guardians);
        if sent == 0 {
            return 0.0;
        }

        let gold = if sent == self.guardians {
            self.gold
        } else {
            self.yield_for(sent)
        };

        self.guardians -= sent;
        self.gold -= gold;
        if self.guardians == 0 {
            self.gold = 0.0;
        }

        gold
    }

    /// Replaces both stats at once.
    pub fn set_stats(&mut self, gold: f64, guardians: u32) -> AllocResult<()> {
        validate_gold(&self.name, gold)?;
        self.gold = gold;
        self.guardians = guardians;
        Ok(())
    }
}

fn validate_gold(name: &str, gold: f64) -> AllocResult<()> {
    if !gold.is_finite() || gold < 0.0 {
        return Err(AllocError::InvalidSite(format!(
            "{} has invalid gold {}",
            name, gold
        )));
    }
    Ok(())
}

impl FromStr for Site {
    type Err = anyhow::Error;

    /// Parses `name gold guardians`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        anyhow::ensure!(parts.len() == 3, "expected `name gold guardians`, got {:?}", s);

        let gold = parts[1].parse().context("invalid gold")?;
        let guardians = parts[2].parse().context("invalid guardians")?;

        Ok(Site::new(parts[0], gold, guardians)?)
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.gold, self.guardians)
    }
}

/// Generates `count` sites named `site{start}..`, with gold in `[0, 1000)`
/// and guardians in `[0, 100]`.
pub fn generate_sites(rng: &mut impl Rng, start: usize, count: usize) -> Vec<Site> {
    (start..start + count)
        .map(|i| Site {
            name: format!("site{}", i),
            gold: rng.gen_range(0.0..1000.0),
            guardians: rng.gen_range(0..=100),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::seeded_rng;
    use test_case::test_case;

    fn site(gold: f64, guardians: u32) -> Site {
        Site::new("ridge", gold, guardians).unwrap()
    }

    #[test_case(100.0, 10, 10.0 ; "plain ratio")]
    #[test_case(50.0, 20, 2.5 ; "fractional ratio")]
    #[test_case(75.0, 0, 0.0 ; "no guardians")]
    #[test_case(0.0, 0, 0.0 ; "empty site")]
    fn test_ratio(gold: f64, guardians: u32, expected: f64) {
        assert_eq!(site(gold, guardians).ratio(), expected);
    }

    #[test]
    fn test_claim_partial_keeps_ratio() {
        let mut s = site(50.0, 20);
        let gold = s.claim(5);

        assert_eq!(gold, 12.5);
        assert_eq!(s.guardians(), 15);
        assert_eq!(s.gold(), 37.5);
        assert_eq!(s.ratio(), 2.5);
    }

    #[test]
    fn test_claim_full_zeroes_site() {
        let mut s = site(100.0, 10);
        let gold = s.claim(25);

        assert_eq!(gold, 100.0);
        assert_eq!(s.guardians(), 0);
        assert_eq!(s.gold(), 0.0);
    }

    #[test]
    fn test_claim_unguarded_site() {
        let mut s = site(40.0, 0);
        assert_eq!(s.claim(3), 0.0);
        assert_eq!(s.gold(), 40.0);
    }

    #[test]
    fn test_new_rejects_bad_stats() {
        assert!(Site::new("", 1.0, 1).is_err());
        assert!(Site::new("x", -1.0, 1).is_err());
        assert!(Site::new("x", f64::NAN, 1).is_err());
        assert!(Site::new("x", f64::INFINITY, 1).is_err());
    }

    #[test]
    fn test_parse_site() {
        let s: Site = "ravine 30.5 7".parse().unwrap();
        assert_eq!(s.name(), "ravine");
        assert_eq!(s.gold(), 30.5);
        assert_eq!(s.guardians(), 7);

        assert!("ravine 30.5".parse::<Site>().is_err());
        assert!("ravine gold 7".parse::<Site>().is_err());
        assert!("ravine 30 -7".parse::<Site>().is_err());
    }

    #[test]
    fn test_generate_sites_is_seeded() {
        let a = generate_sites(&mut seeded_rng(7), 0, 20);
        let b = generate_sites(&mut seeded_rng(7), 0, 20);

        assert_eq!(a, b);
        assert!(a.iter().all(|s| s.gold() >= 0.0 && s.guardians() <= 100));
    }
}
