//! # QSN Core
//!
//! The deterministic tier engine behind the QSN site and dashboard.
//!
//! ## Modules
//!
//! - [`tier`]: security levels, feature flags and the `TierResolver`
//! - [`catalog`]: per-tier presentation constants and the comparison table
//! - [`selection`]: the in-memory "current tier" state
//! - [`metrics`]: bounded display panels driven by an injected jitter source
//!
//! ## Constraints
//!
//! - No async, no I/O, no logging
//! - No randomness and no floating point
//! - Every public operation is total; undefined levels clamp instead of
//!   failing
//!
//! ```
//! use qsn_core::{FeatureFlag, resolve};
//!
//! let features = resolve(99);
//! assert!(features.contains(FeatureFlag::TemporalMonitoring));
//! assert!(!features.contains(FeatureFlag::StrataSecurity));
//!
//! // Undefined levels fall back to the nearest lower tier.
//! assert_eq!(resolve(-5), resolve(65));
//! ```

pub mod catalog;
pub mod metrics;
pub mod selection;
pub mod tier;

use thiserror::Error;

pub use catalog::{
    CheckoutTarget, ComparisonRow, EncryptionGrade, Price, RateLimit, TierProfile, catalog,
    comparison_table,
};
pub use metrics::{
    DetectionCapability, DisplayRange, JitterSource, LockedPanel, MetricsBoard, MetricsSnapshot,
    StrataLayer, TemporalStatus,
};
pub use selection::TierSelection;
pub use tier::{
    FeatureFlag, FeatureSet, InvalidTierError, Resolution, SecurityTier, TierResolver, resolve,
};

// =============================================================================
// ERROR TYPE
// =============================================================================

/// Errors from the core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QsnError {
    /// A level outside the defined tier set was used where an exact tier
    /// was required.
    #[error(transparent)]
    InvalidTier(#[from] InvalidTierError),

    /// An upgrade target was not above the current tier.
    #[error("cannot upgrade from level {from} to level {to}")]
    Downgrade { from: i64, to: i64 },
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, QsnError>;
