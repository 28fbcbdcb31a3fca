//! # Catalog Module
//!
//! Presentation constants for each tier: names, encryption grade, API
//! rate-limit numbers, pricing and the checkout target.
//!
//! These values are display data, not protocol. They live in one place
//! so the pricing page, the tier cards and the dashboard agree.

use crate::tier::{FeatureFlag, SecurityTier, TierResolver};
use serde::Serialize;
use std::fmt;

/// Base URL of the external payment page for priced plans.
pub const PAYMENT_BASE_URL: &str = "https://www.paypal.com/paypalme/qsnsecurity";

/// Where free plans send the visitor.
pub const DEMO_PATH: &str = "/demo";

/// Where custom and enterprise plans send the visitor.
pub const CONTACT_PATH: &str = "/contact";

// =============================================================================
// PROFILE PARTS
// =============================================================================

/// Encryption grade shown for a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EncryptionGrade {
    /// Grade name, e.g. "Government-Grade".
    pub name: &'static str,
    /// Strength label, e.g. "MILITARY".
    pub strength: &'static str,
    /// Advertised key size in bits.
    pub bits: u16,
}

/// API rate limit advertised for a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimit {
    pub requests_per_minute: u32,
    pub burst: u32,
}

impl RateLimit {
    /// Label as shown on the pricing page, e.g. "6,000 API requests/min".
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "{} API requests/min",
            group_thousands(u64::from(self.requests_per_minute))
        )
    }
}

/// Plan price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Price {
    /// Free forever.
    Free,
    /// Fixed monthly price in whole US dollars.
    Monthly { usd: u32 },
    /// Negotiated with sales.
    Custom,
    /// Enterprise agreement.
    Enterprise,
}

impl Price {
    /// Short label for cards and tables.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Price::Free => String::from("Free"),
            Price::Monthly { usd } => format!("${}/month", group_thousands(u64::from(*usd))),
            Price::Custom => String::from("Custom"),
            Price::Enterprise => String::from("Enterprise"),
        }
    }

    /// Where selecting this plan leads.
    ///
    /// No payment is processed here; priced plans only get a link to the
    /// external payment page.
    #[must_use]
    pub fn checkout_target(&self) -> CheckoutTarget {
        match self {
            Price::Free => CheckoutTarget::Demo,
            Price::Monthly { usd } => CheckoutTarget::External(format!("{PAYMENT_BASE_URL}/{usd}")),
            Price::Custom | Price::Enterprise => CheckoutTarget::Contact,
        }
    }
}

/// Destination of the plan call-to-action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutTarget {
    Demo,
    Contact,
    External(String),
}

impl CheckoutTarget {
    /// Link target for the call-to-action.
    #[must_use]
    pub fn href(&self) -> &str {
        match self {
            CheckoutTarget::Demo => DEMO_PATH,
            CheckoutTarget::Contact => CONTACT_PATH,
            CheckoutTarget::External(url) => url.as_str(),
        }
    }

    #[must_use]
    pub fn is_external(&self) -> bool {
        matches!(self, CheckoutTarget::External(_))
    }
}

impl fmt::Display for CheckoutTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.href())
    }
}

// =============================================================================
// TIER PROFILE
// =============================================================================

/// Everything a page needs to render one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierProfile {
    pub tier: SecurityTier,
    pub name: &'static str,
    pub description: &'static str,
    pub encryption: EncryptionGrade,
    /// Stealth mode label.
    pub stealth: &'static str,
    pub rate_limit: RateLimit,
    pub price: Price,
    pub call_to_action: &'static str,
    /// Highlighted on the pricing page.
    pub popular: bool,
    /// Request payload size above which the dashboard flags a request
    /// as unusual.
    pub payload_threshold_bytes: u64,
    pub features: &'static [&'static str],
    pub limitations: &'static [&'static str],
}

static FREE: TierProfile = TierProfile {
    tier: SecurityTier::Free,
    name: "Free/Public",
    description: "Perfect for individuals and small projects",
    encryption: EncryptionGrade {
        name: "Basic",
        strength: "STANDARD",
        bits: 256,
    },
    stealth: "BASIC",
    rate_limit: RateLimit {
        requests_per_minute: 60,
        burst: 10,
    },
    price: Price::Free,
    call_to_action: "Get Started Free",
    popular: false,
    payload_threshold_bytes: 10_000,
    features: &[
        "Basic quantum encryption (256-bit)",
        "Standard monitoring",
        "60 API requests/min",
        "Community support",
        "Basic threat detection",
        "Single deployment",
    ],
    limitations: &[
        "No temporal monitoring",
        "No strata security",
        "No NOIR systems",
    ],
};

static BUSINESS: TierProfile = TierProfile {
    tier: SecurityTier::Business,
    name: "Business",
    description: "For growing businesses needing advanced security",
    encryption: EncryptionGrade {
        name: "Advanced",
        strength: "ENHANCED",
        bits: 320,
    },
    stealth: "ADVANCED",
    rate_limit: RateLimit {
        requests_per_minute: 600,
        burst: 100,
    },
    price: Price::Monthly { usd: 299 },
    call_to_action: "Start 14-Day Trial",
    popular: true,
    payload_threshold_bytes: 50_000,
    features: &[
        "Advanced quantum encryption (320-bit)",
        "Temporal monitoring",
        "600 API requests/min",
        "Priority support",
        "Advanced threat intelligence",
        "Traffic analysis",
        "Multiple deployments",
        "99.9% uptime SLA",
    ],
    limitations: &["No strata security", "No NOIR systems"],
};

static GOVERNMENT: TierProfile = TierProfile {
    tier: SecurityTier::Government,
    name: "Government",
    description: "Military-grade security for government organizations",
    encryption: EncryptionGrade {
        name: "Government-Grade",
        strength: "MILITARY",
        bits: 384,
    },
    stealth: "GOVERNMENT",
    rate_limit: RateLimit {
        requests_per_minute: 6_000,
        burst: 1_000,
    },
    price: Price::Custom,
    call_to_action: "Contact Sales",
    popular: false,
    payload_threshold_bytes: 100_000,
    features: &[
        "Military-grade encryption (384-bit)",
        "Full temporal monitoring",
        "Strata security layers",
        "NOIR systems access",
        "6,000 API requests/min",
        "Quantum duel coding",
        "Dedicated support",
        "24/7 monitoring",
        "Custom deployment",
    ],
    limitations: &["Contact for deployment"],
};

static DEVELOPER: TierProfile = TierProfile {
    tier: SecurityTier::Developer,
    name: "Developer",
    description: "Full quantum capabilities for enterprise needs",
    encryption: EncryptionGrade {
        name: "Developer-Grade",
        strength: "MAXIMUM",
        bits: 512,
    },
    stealth: "DEVELOPER",
    rate_limit: RateLimit {
        requests_per_minute: 60_000,
        burst: 10_000,
    },
    price: Price::Enterprise,
    call_to_action: "Contact Sales",
    popular: false,
    payload_threshold_bytes: 1_000_000,
    features: &[
        "Developer-grade encryption (512-bit)",
        "Multi-dimensional monitoring",
        "Advanced strata security",
        "Full NOIR integration",
        "60,000 API requests/min",
        "Consciousness integration",
        "No mirrors architecture",
        "Developer-grade support",
        "Custom infrastructure",
    ],
    limitations: &[],
};

impl SecurityTier {
    /// Presentation constants for this tier.
    #[must_use]
    pub fn profile(self) -> &'static TierProfile {
        match self {
            SecurityTier::Free => &FREE,
            SecurityTier::Business => &BUSINESS,
            SecurityTier::Government => &GOVERNMENT,
            SecurityTier::Developer => &DEVELOPER,
        }
    }
}

/// All tier profiles, lowest level first.
#[must_use]
pub fn catalog() -> [&'static TierProfile; 4] {
    SecurityTier::ALL.map(SecurityTier::profile)
}

// =============================================================================
// COMPARISON TABLE
// =============================================================================

/// One feature row of the tier comparison table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    pub feature: FeatureFlag,
    pub label: &'static str,
    /// Availability per tier, in `SecurityTier::ALL` order.
    pub availability: [bool; 4],
}

/// Build the comparison table from the resolver.
#[must_use]
pub fn comparison_table() -> Vec<ComparisonRow> {
    FeatureFlag::ALL
        .into_iter()
        .map(|feature| ComparisonRow {
            feature,
            label: feature.label(),
            availability: SecurityTier::ALL
                .map(|tier| TierResolver::resolve(tier.level()).contains(feature)),
        })
        .collect()
}

/// Format an integer with comma thousands separators.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// =============================================================================
// TESTS
// =============================================================================
