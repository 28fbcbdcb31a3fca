//! # Selection Module
//!
//! The "current level" a visitor has picked.
//!
//! Selection is transient UI state: it lives in memory only and is never
//! persisted. Two ways to change it:
//! - `select` jumps to any level (clamped), like the tier cards do
//! - `upgrade` only moves upward, like the plan upgrade flow

use crate::tier::{FeatureSet, SecurityTier};
use crate::{QsnError, Result};
use serde::Serialize;

/// In-memory tier selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierSelection {
    current: SecurityTier,
    /// Number of times the selection changed tier.
    changes: u64,
}

impl Default for TierSelection {
    fn default() -> Self {
        Self::from_tier(SecurityTier::LOWEST)
    }
}

impl TierSelection {
    /// Start at `level`, clamped to a defined tier.
    #[must_use]
    pub fn new(level: i64) -> Self {
        Self::from_tier(SecurityTier::clamp(level))
    }

    #[must_use]
    pub fn from_tier(tier: SecurityTier) -> Self {
        Self {
            current: tier,
            changes: 0,
        }
    }

    #[must_use]
    pub fn current(&self) -> SecurityTier {
        self.current
    }

    #[must_use]
    pub fn level(&self) -> i64 {
        self.current.level()
    }

    #[must_use]
    pub fn changes(&self) -> u64 {
        self.changes
    }

    /// Features of the current tier.
    #[must_use]
    pub fn features(&self) -> FeatureSet {
        self.current.capabilities()
    }

    /// Switch to `level` (clamped). Returns the new tier.
    pub fn select(&mut self, level: i64) -> SecurityTier {
        self.set(SecurityTier::clamp(level))
    }

    /// Move to a strictly higher tier.
    ///
    /// `level` is clamped first; a target at or below the current tier
    /// is rejected with `QsnError::Downgrade` and leaves the selection
    /// untouched.
    pub fn upgrade(&mut self, level: i64) -> Result<SecurityTier> {
        let target = SecurityTier::clamp(level);
        if target <= self.current {
            return Err(QsnError::Downgrade {
                from: self.current.level(),
                to: target.level(),
            });
        }
        Ok(self.set(target))
    }

    fn set(&mut self, tier: SecurityTier) -> SecurityTier {
        if tier != self.current {
            self.current = tier;
            self.changes = self.changes.saturating_add(1);
        }
        self.current
    }
}

// =============================================================================
// TESTS
// =============================================================================
