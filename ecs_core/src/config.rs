//! Compile-time tuning constants.

/// Number of slots per sparse-set page. Pages are allocated lazily, one at
/// a time, the first time an entity whose index falls in that page is
/// inserted.
pub const PAGE_SIZE: usize = 4096;

/// Sentinel stored in sparse pages for slots that do not map to a packed
/// position.
pub const NPOS: u32 = u32::MAX;
