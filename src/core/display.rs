use std::fmt;
use colored::Colorize;

use super::site::Site;

/// Tabular view of sites in a given order.
///
/// With a cutoff, ratios above it are highlighted green and the rest red.
pub struct SiteTable<'a> {
    pub sites: Vec<&'a Site>,
    pub cutoff: Option<f64>,
}

impl<'a> SiteTable<'a> {
    pub fn new(sites: impl IntoIterator<Item = &'a Site>) -> Self {
        Self {
            sites: sites.into_iter().collect(),
            cutoff: None,
        }
    }

    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = Some(cutoff);
        self
    }
}

impl fmt::Display for SiteTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>4}  {:<16} {:>12} {:>10} {:>10}", "#", "site", "gold", "guardians", "ratio")?;
        writeln!(f, "{}", "─".repeat(56))?;

        for (rank, site) in self.sites.iter().enumerate() {
            let ratio = format!("{:>10.3}", site.ratio());
            let ratio = match self.cutoff {
                Some(cutoff) if site.ratio() > cutoff => ratio.bright_green(),
                Some(_) => ratio.bright_red(),
                None => ratio.normal(),
            };

            writeln!(
                f,
                "{:>4}  {:<16} {:>12.2} {:>10} {}",
                rank + 1,
                site.name().bold(),
                site.gold(),
                site.guardians(),
                ratio
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lists_every_site() {
        colored::control::set_override(false);

        let sites = vec![
            Site::new("crag", 100.0, 10).unwrap(),
            Site::new("marsh", 50.0, 20).unwrap(),
        ];
        let table = SiteTable::new(&sites).with_cutoff(2.5).to_string();

        assert!(table.contains("crag"));
        assert!(table.contains("10.000"));
        assert!(table.contains("2.500"));
        assert_eq!(table.lines().count(), 4);
    }
}
