//! Raidplan - adventurer allocation across gold-bearing land sites

pub mod alloc;
pub mod core;
pub mod engine;
pub mod error;
pub mod index;
pub mod shell;
pub mod utils;

// Re-export commonly used items
pub use crate::alloc::{RankedListAllocator, TeamReport, ThresholdHeapAllocator};
pub use crate::core::{Site, SiteId};
pub use crate::error::{AllocError, AllocResult};
