//! Protocol implementation

use std::io::Write;

use anyhow::{bail, ensure, Context, Result};
use indoc::indoc;

use crate::{core::Site, engine::Navigator};

/// Whether the session continues after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

const GREETING: &str = indoc! {"
    id name raidplan
    option name cutoff type float default 2.5
    option name teams type int default 1
    option name index type combo default tree var tree var btree
    option name strictmode type bool default false
    raidplanok
"};

/// Handle one command, writing replies to `out`
pub fn handle_command(cmd: &str, navigator: &mut Navigator, out: &mut impl Write) -> Result<Flow> {
    let parts: Vec<&str> = cmd.split_whitespace().collect();

    if parts.is_empty() {
        return Ok(Flow::Continue);
    }

    match parts[0] {
        "raidplan" => {
            write!(out, "{}", GREETING)?;
        }
        "isready" => {
            writeln!(out, "readyok")?;
        }
        "setoption" => {
            ensure!(parts.len() == 5 && parts[1] == "name" && parts[3] == "value",
                "invalid setoption command");

            navigator.set_option(parts[2], parts[4])?;
        }
        "site" => {
            let site = parts[1..].join(" ").parse::<Site>()?;
            navigator.add_site(site);
        }
        "load" => {
            ensure!(parts.len() == 2, "load requires a path");
            let count = navigator.load_sites(parts[1])?;
            writeln!(out, "info loaded {}", count)?;
        }
        "random" => {
            ensure!(parts.len() == 2 || parts.len() == 3, "usage: random <count> [seed]");
            let count = parts[1].parse().context("invalid count")?;
            let seed = parts.get(2)
                .map(|s| s.parse().context("invalid seed"))
                .transpose()?;

            navigator.random_sites(count, seed);
        }
        "clear" => {
            navigator.clear();
        }
        "ranked" => {
            ensure!(parts.len() == 2, "ranked requires an adventurer count");
            let adventurers = parts[1].parse().context("invalid adventurer count")?;
            navigator.build_ranked(adventurers)?;
        }
        "pool" => {
            ensure!(parts.len() == 2, "pool requires an adventurer count");
            let adventurers = parts[1].parse().context("invalid adventurer count")?;
            navigator.ranked_mut()?.set_adventurers(adventurers);
        }
        "select" => {
            for (name, sent) in navigator.ranked()?.select_sites() {
                writeln!(out, "dispatch {} {}", name, sent)?;
            }
            writeln!(out, "selectok")?;
        }
        "batch" => {
            let queries = parts[1..].iter()
                .map(|s| s.parse().context("invalid adventurer count"))
                .collect::<Result<Vec<u32>>>()?;

            let totals = navigator.ranked_mut()?.select_sites_from_adventure_numbers(&queries);
            let totals: Vec<String> = totals.iter().map(|g| g.to_string()).collect();

            writeln!(out, "gold {}", totals.join(" "))?;
        }
        "update" => {
            ensure!(parts.len() == 4, "usage: update <name> <gold> <guardians>");
            let gold = parts[2].parse().context("invalid gold")?;
            let guardians = parts[3].parse().context("invalid guardians")?;

            navigator.ranked_mut()?.update_site(parts[1], gold, guardians)?;
        }
        "threshold" => {
            let admitted = navigator.build_threshold()?;
            writeln!(out, "info admitted {}", admitted)?;
        }
        "day" => {
            ensure!(parts.len() == 2, "day requires an adventurer count");
            let size = parts[1].parse().context("invalid adventurer count")?;

            for (team, (site, sent, gold)) in navigator.simulate_day(size)?.into_iter().enumerate() {
                let site = site.unwrap_or_else(|| "none".to_string());
                writeln!(out, "team {} {} {} {}", team, site, sent, gold)?;
            }
        }
        "display" => {
            write!(out, "{}", navigator.display())?;
        }
        "quit" => {
            return Ok(Flow::Quit);
        }
        cmd => {
            bail!("Unknown command: {}", cmd);
        }
    }

    out.flush()?;
    Ok(Flow::Continue)
}
