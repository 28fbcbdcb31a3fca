//! # Tier Module
//!
//! The level -> capability mapping for QSN.
//!
//! Every dashboard page used to carry its own `>=` chain deciding which
//! panels to unlock. This module is the single source for that decision:
//! - `SecurityTier` names the four defined levels (65, 99, 100, 1000)
//! - `FeatureFlag` / `FeatureSet` describe what a tier unlocks
//! - `TierResolver` maps ANY integer onto a tier and its features
//!
//! Resolution is total. Levels outside the defined set fall back to the
//! nearest lower tier, and anything below 65 lands on the lowest tier.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// FEATURE FLAGS
// =============================================================================

/// A capability that a tier may unlock.
///
/// Declaration order is the display order used by the comparison table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeatureFlag {
    QuantumEncryption,
    TemporalMonitoring,
    StrataSecurity,
    NoirSystems,
    ConsciousnessIntegration,
}

impl FeatureFlag {
    /// Every flag, in display order.
    pub const ALL: [FeatureFlag; 5] = [
        FeatureFlag::QuantumEncryption,
        FeatureFlag::TemporalMonitoring,
        FeatureFlag::StrataSecurity,
        FeatureFlag::NoirSystems,
        FeatureFlag::ConsciousnessIntegration,
    ];

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            FeatureFlag::QuantumEncryption => "Quantum Encryption",
            FeatureFlag::TemporalMonitoring => "Temporal Monitoring",
            FeatureFlag::StrataSecurity => "Strata Security",
            FeatureFlag::NoirSystems => "NOIR Systems",
            FeatureFlag::ConsciousnessIntegration => "Consciousness Integration",
        }
    }
}

impl fmt::Display for FeatureFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// FEATURE SET
// =============================================================================

/// A set of enabled `FeatureFlag`s.
///
/// Stored as a bitmask; serialized as the list of enabled flags in
/// display order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<FeatureFlag>", from = "Vec<FeatureFlag>")]
pub struct FeatureSet {
    bits: u8,
}

impl FeatureSet {
    /// The empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Return a copy with `flag` enabled.
    #[must_use]
    pub const fn with(self, flag: FeatureFlag) -> Self {
        Self {
            bits: self.bits | flag.bit(),
        }
    }

    /// Check whether `flag` is enabled.
    #[must_use]
    pub const fn contains(self, flag: FeatureFlag) -> bool {
        self.bits & flag.bit() != 0
    }

    /// Check whether every flag in `self` is also in `other`.
    #[must_use]
    pub const fn is_subset_of(self, other: FeatureSet) -> bool {
        self.bits & !other.bits == 0
    }

    /// Number of enabled flags.
    #[must_use]
    pub const fn len(self) -> usize {
        self.bits.count_ones() as usize
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Iterate enabled flags in display order.
    pub fn iter(self) -> impl Iterator<Item = FeatureFlag> {
        FeatureFlag::ALL
            .into_iter()
            .filter(move |flag| self.contains(*flag))
    }
}

impl FromIterator<FeatureFlag> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = FeatureFlag>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), FeatureSet::with)
    }
}

impl From<Vec<FeatureFlag>> for FeatureSet {
    fn from(flags: Vec<FeatureFlag>) -> Self {
        flags.into_iter().collect()
    }
}

impl From<FeatureSet> for Vec<FeatureFlag> {
    fn from(set: FeatureSet) -> Self {
        set.iter().collect()
    }
}

// =============================================================================
// SECURITY TIER
// =============================================================================

/// Error for a level that is not one of the defined tiers.
///
/// Recoverable: `TierResolver::resolve` clamps instead of returning it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("security level {level} is not a defined tier (expected 65, 99, 100 or 1000)")]
pub struct InvalidTierError {
    /// The level that was requested.
    pub level: i64,
}

impl InvalidTierError {
    /// The tier this level clamps to.
    #[must_use]
    pub const fn fallback(&self) -> SecurityTier {
        SecurityTier::clamp(self.level)
    }
}

/// One of the four defined security tiers.
///
/// Variants are declared in ascending level order so the derived `Ord`
/// matches level order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum SecurityTier {
    /// Level 65.
    Free,
    /// Level 99.
    Business,
    /// Level 100.
    Government,
    /// Level 1000.
    Developer,
}

const QUANTUM: FeatureSet = FeatureSet::empty().with(FeatureFlag::QuantumEncryption);
const TEMPORAL: FeatureSet = QUANTUM.with(FeatureFlag::TemporalMonitoring);
const GOVERNMENT: FeatureSet = TEMPORAL
    .with(FeatureFlag::StrataSecurity)
    .with(FeatureFlag::NoirSystems);
const EVERYTHING: FeatureSet = GOVERNMENT.with(FeatureFlag::ConsciousnessIntegration);

impl SecurityTier {
    /// All tiers, lowest first.
    pub const ALL: [SecurityTier; 4] = [
        SecurityTier::Free,
        SecurityTier::Business,
        SecurityTier::Government,
        SecurityTier::Developer,
    ];

    /// The lowest defined tier.
    pub const LOWEST: SecurityTier = SecurityTier::Free;

    /// The highest defined tier.
    pub const HIGHEST: SecurityTier = SecurityTier::Developer;

    /// Numeric security level.
    #[must_use]
    pub const fn level(self) -> i64 {
        match self {
            SecurityTier::Free => 65,
            SecurityTier::Business => 99,
            SecurityTier::Government => 100,
            SecurityTier::Developer => 1000,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            SecurityTier::Free => "Free/Public",
            SecurityTier::Business => "Business",
            SecurityTier::Government => "Government",
            SecurityTier::Developer => "Developer",
        }
    }

    /// Exact lookup. Fails for anything outside {65, 99, 100, 1000}.
    pub const fn from_level(level: i64) -> Result<Self, InvalidTierError> {
        match level {
            65 => Ok(SecurityTier::Free),
            99 => Ok(SecurityTier::Business),
            100 => Ok(SecurityTier::Government),
            1000 => Ok(SecurityTier::Developer),
            _ => Err(InvalidTierError { level }),
        }
    }

    /// Nearest defined tier at or below `level`.
    ///
    /// Levels below 65 resolve to the lowest tier; levels above 1000
    /// resolve to the highest.
    #[must_use]
    pub const fn clamp(level: i64) -> Self {
        if level >= 1000 {
            SecurityTier::Developer
        } else if level >= 100 {
            SecurityTier::Government
        } else if level >= 99 {
            SecurityTier::Business
        } else {
            SecurityTier::Free
        }
    }

    /// Capabilities unlocked by this tier.
    #[must_use]
    pub const fn capabilities(self) -> FeatureSet {
        match self {
            SecurityTier::Free => QUANTUM,
            SecurityTier::Business => TEMPORAL,
            SecurityTier::Government => GOVERNMENT,
            SecurityTier::Developer => EVERYTHING,
        }
    }

    /// The next tier up, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            SecurityTier::Free => Some(SecurityTier::Business),
            SecurityTier::Business => Some(SecurityTier::Government),
            SecurityTier::Government => Some(SecurityTier::Developer),
            SecurityTier::Developer => None,
        }
    }

    /// Lowest tier that unlocks `flag`.
    #[must_use]
    pub fn unlocking(flag: FeatureFlag) -> Self {
        Self::ALL
            .into_iter()
            .find(|tier| tier.capabilities().contains(flag))
            .unwrap_or(Self::HIGHEST)
    }
}

impl fmt::Display for SecurityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Level {} ({})", self.level(), self.name())
    }
}

impl TryFrom<i64> for SecurityTier {
    type Error = InvalidTierError;

    fn try_from(level: i64) -> Result<Self, Self::Error> {
        Self::from_level(level)
    }
}

impl From<SecurityTier> for i64 {
    fn from(tier: SecurityTier) -> Self {
        tier.level()
    }
}

// =============================================================================
// RESOLVER
// =============================================================================

/// Outcome of resolving a raw level, with the clamp made visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// The level as requested.
    pub requested: i64,
    /// The tier the level resolved to.
    pub tier: SecurityTier,
    /// True when `requested` was not a defined level.
    pub clamped: bool,
    /// Capabilities of `tier`.
    pub features: FeatureSet,
}

/// Maps numeric security levels to feature sets.
///
/// Stateless; every method is a pure function of its input.
pub struct TierResolver;

impl TierResolver {
    /// Resolve any level to a feature set, clamping undefined levels.
    #[must_use]
    pub const fn resolve(level: i64) -> FeatureSet {
        SecurityTier::clamp(level).capabilities()
    }

    /// Resolve only defined levels.
    pub const fn try_resolve(level: i64) -> Result<FeatureSet, InvalidTierError> {
        match SecurityTier::from_level(level) {
            Ok(tier) => Ok(tier.capabilities()),
            Err(err) => Err(err),
        }
    }

    /// Resolve and report whether a clamp happened.
    #[must_use]
    pub const fn resolve_detailed(level: i64) -> Resolution {
        let tier = SecurityTier::clamp(level);
        Resolution {
            requested: level,
            tier,
            clamped: tier.level() != level,
            features: tier.capabilities(),
        }
    }
}

/// Shorthand for `TierResolver::resolve`.
#[must_use]
pub const fn resolve(level: i64) -> FeatureSet {
    TierResolver::resolve(level)
}

// =============================================================================
// TESTS
// =============================================================================
