//! Error types for the allocators.

use thiserror::Error;

use crate::core::SiteId;

/// Errors surfaced by allocator operations.
///
/// Running out of sites or adventurers is never an error; those cases produce
/// empty or idle results instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllocError {
    /// The rank key remembered for a site is missing from the ordered index.
    #[error("rank key for site {site} not present in index")]
    KeyNotFound { site: SiteId },

    /// The id does not belong to this allocator's site arena.
    #[error("unknown site {0}")]
    UnknownSite(SiteId),

    /// A site with this name is already tracked.
    #[error("duplicate site name: {0}")]
    DuplicateSite(String),

    /// Site stats or name failed validation.
    #[error("invalid site: {0}")]
    InvalidSite(String),

    /// The admission cutoff must be finite and non-negative.
    #[error("invalid cutoff: {0}")]
    InvalidCutoff(f64),
}

/// Result type for allocator operations.
pub type AllocResult<T> = Result<T, AllocError>;
