//! Site records and their presentation

pub mod display;
pub mod site;

pub use display::SiteTable;
pub use site::{generate_sites, Site, SiteId};
