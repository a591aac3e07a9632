//! The two allocation strategies.

pub mod ranked;
pub mod threshold;

pub use ranked::RankedListAllocator;
pub use threshold::{TeamReport, ThresholdHeapAllocator, DEFAULT_CUTOFF};
