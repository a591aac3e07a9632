//! Configuration options for the navigator

use anyhow::{bail, ensure, Result};
use std::str::FromStr;

use crate::alloc::DEFAULT_CUTOFF;

/// Ordered index backing the ranked allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Tree,
    BTree,
}

impl FromStr for IndexKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tree" => Ok(IndexKind::Tree),
            "btree" => Ok(IndexKind::BTree),
            _ => bail!("Unknown index kind: {}", s),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NavigatorOptions {
    /// Ratio a site must exceed to enter the threshold heap
    pub cutoff: f64,
    /// Teams served per simulated day
    pub teams: usize,
    /// Index used by the ranked allocator
    pub index: IndexKind,
    /// Whether command errors are fatal
    pub strict_mode: bool,
}

impl NavigatorOptions {
    /// Set an option by its protocol name
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "cutoff" => {
                let cutoff: f64 = value.parse()?;
                ensure!(cutoff.is_finite() && cutoff >= 0.0, "invalid cutoff: {}", value);
                self.cutoff = cutoff;
            }
            "teams" => self.teams = value.parse()?,
            "index" => self.index = value.parse()?,
            "strictmode" => self.strict_mode = value.parse()?,
            _ => bail!("Unknown option: {}", name),
        }

        Ok(())
    }
}

impl Default for NavigatorOptions {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
            teams: 1,
            index: IndexKind::Tree,
            strict_mode: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_options() {
        let mut options = NavigatorOptions::default();

        options.set_option("cutoff", "3.5").unwrap();
        options.set_option("teams", "4").unwrap();
        options.set_option("index", "btree").unwrap();
        options.set_option("strictmode", "true").unwrap();

        assert_eq!(options.cutoff, 3.5);
        assert_eq!(options.teams, 4);
        assert_eq!(options.index, IndexKind::BTree);
        assert!(options.strict_mode);
    }

    #[test]
    fn test_rejects_bad_options() {
        let mut options = NavigatorOptions::default();

        assert!(options.set_option("cutoff", "-1").is_err());
        assert!(options.set_option("cutoff", "inf").is_err());
        assert!(options.set_option("teams", "many").is_err());
        assert!(options.set_option("index", "skiplist").is_err());
        assert!(options.set_option("speed", "1").is_err());
        assert_eq!(options.cutoff, DEFAULT_CUTOFF);
    }
}
