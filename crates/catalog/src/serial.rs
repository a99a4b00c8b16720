//! Serial-number rule for catalog entries.
//!
//! The rule itself is pure: given the highest serial ever issued, the next one
//! is one more (or 1 for an empty history). Checking the candidate against the
//! live catalog and persisting it is the ledger's job.

/// Next serial after `high_water` (the highest srNo ever handed out, including
/// entries that have since been deleted).
pub fn next_serial(high_water: Option<u32>) -> u32 {
    high_water.map_or(1, |max| max.saturating_add(1))
}
