//! # Metrics Module
//!
//! Display panels for the dashboard.
//!
//! The numbers on the dashboard are decorative: each tick nudges them by a
//! small random amount. The only contract is that every value stays inside
//! its `DisplayRange`, no matter what the jitter source returns.
//!
//! Design constraints:
//! - No randomness in this crate. Jitter is injected through `JitterSource`
//! - Integer only. Percentages are stored in tenths (947 = 94.7%)
//! - Counters saturate instead of wrapping

use crate::tier::{FeatureFlag, FeatureSet, SecurityTier};
use serde::Serialize;
use std::collections::VecDeque;
use std::net::Ipv4Addr;

// =============================================================================
// JITTER SOURCE
// =============================================================================

/// Source of display jitter.
///
/// The app layer backs this with an RNG; tests use scripted sequences.
/// Implementations are not trusted to stay in range: every panel clamps
/// what it receives.
pub trait JitterSource {
    /// A value in `low..=high`.
    fn sample(&mut self, low: i64, high: i64) -> i64;

    /// `true` with probability `numerator / denominator`.
    fn chance(&mut self, numerator: u32, denominator: u32) -> bool;
}

impl<J: JitterSource + ?Sized> JitterSource for &mut J {
    fn sample(&mut self, low: i64, high: i64) -> i64 {
        (**self).sample(low, high)
    }

    fn chance(&mut self, numerator: u32, denominator: u32) -> bool {
        (**self).chance(numerator, denominator)
    }
}

// =============================================================================
// DISPLAY RANGES
// =============================================================================

/// Inclusive bounds for a displayed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayRange {
    pub min: i64,
    pub max: i64,
}

impl DisplayRange {
    #[must_use]
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub const fn clamp(self, value: i64) -> i64 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    #[must_use]
    pub const fn contains(self, value: i64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Draw from `jitter` and clamp into this range.
    fn draw<J: JitterSource + ?Sized>(self, jitter: &mut J) -> i64 {
        self.clamp(jitter.sample(self.min, self.max))
    }
}

/// Live connections shown on the network panel.
pub const CONNECTIONS: DisplayRange = DisplayRange::new(0, 10_000);
/// Open ports shown on the network panel.
pub const ACTIVE_PORTS: DisplayRange = DisplayRange::new(1, 1_024);
/// Any percentage, in tenths.
pub const PERCENT_TENTHS: DisplayRange = DisplayRange::new(0, 1_000);
/// Threats currently in flight.
pub const ACTIVE_THREATS: DisplayRange = DisplayRange::new(0, 2);
/// NOIR system integrity, in tenths of a percent.
pub const SYSTEM_INTEGRITY: DisplayRange = DisplayRange::new(980, 1_000);

const PACKETS_STEP: DisplayRange = DisplayRange::new(0, 99);
const API_REQUESTS_STEP: DisplayRange = DisplayRange::new(0, 49);
const CONNECTIONS_STEP: DisplayRange = DisplayRange::new(-10, 9);
const PORTS_STEP: DisplayRange = DisplayRange::new(-2, 2);
const TRAFFIC_KB_STEP: DisplayRange = DisplayRange::new(0, 10_239);
const THREAT_COUNT_STEP: DisplayRange = DisplayRange::new(0, 2);
const RISK_STEP: DisplayRange = DisplayRange::new(-25, 25);
const SCANS_STEP: DisplayRange = DisplayRange::new(0, 9);

/// Maximum number of alerts kept on the threat panel.
pub const ALERT_HISTORY: usize = 10;

/// Add a jittered, non-negative delta to a counter.
fn bump<J: JitterSource + ?Sized>(counter: &mut u64, step: DisplayRange, jitter: &mut J) {
    let delta = step.draw(jitter).max(0) as u64;
    *counter = counter.saturating_add(delta);
}

/// Move a bounded value by a jittered delta and clamp it.
fn drift<J: JitterSource + ?Sized>(
    value: &mut i64,
    range: DisplayRange,
    step: DisplayRange,
    jitter: &mut J,
) {
    *value = range.clamp(value.saturating_add(step.draw(jitter)));
}

fn tick_if(counter: &mut u64, hit: bool) {
    if hit {
        *counter = counter.saturating_add(1);
    }
}

// =============================================================================
// PANELS
// =============================================================================

/// Headline counters on the main dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardPanel {
    pub packets_analyzed: u64,
    pub threats_blocked: u64,
    pub api_requests: u64,
}

impl DashboardPanel {
    pub fn step<J: JitterSource + ?Sized>(&mut self, jitter: &mut J) {
        bump(&mut self.packets_analyzed, PACKETS_STEP, jitter);
        tick_if(&mut self.threats_blocked, jitter.chance(1, 10));
        bump(&mut self.api_requests, API_REQUESTS_STEP, jitter);
    }
}

/// Network monitor figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkPanel {
    pub connections: i64,
    pub traffic_kb: u64,
    pub active_ports: i64,
    pub bandwidth_tenths: i64,
}

impl Default for NetworkPanel {
    fn default() -> Self {
        Self {
            connections: CONNECTIONS.min,
            traffic_kb: 0,
            active_ports: ACTIVE_PORTS.min,
            bandwidth_tenths: PERCENT_TENTHS.min,
        }
    }
}

impl NetworkPanel {
    pub fn step<J: JitterSource + ?Sized>(&mut self, jitter: &mut J) {
        drift(&mut self.connections, CONNECTIONS, CONNECTIONS_STEP, jitter);
        bump(&mut self.traffic_kb, TRAFFIC_KB_STEP, jitter);
        drift(&mut self.active_ports, ACTIVE_PORTS, PORTS_STEP, jitter);
        self.bandwidth_tenths = PERCENT_TENTHS.draw(jitter);
    }

    #[must_use]
    pub fn within_bounds(&self) -> bool {
        CONNECTIONS.contains(self.connections)
            && ACTIVE_PORTS.contains(self.active_ports)
            && PERCENT_TENTHS.contains(self.bandwidth_tenths)
    }
}

/// Category of a decorative threat alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatKind {
    SqlInjection,
    Xss,
    Ddos,
    BruteForce,
    Phishing,
}

/// Severity label of a threat kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl ThreatKind {
    pub const ALL: [ThreatKind; 5] = [
        ThreatKind::SqlInjection,
        ThreatKind::Xss,
        ThreatKind::Ddos,
        ThreatKind::BruteForce,
        ThreatKind::Phishing,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ThreatKind::SqlInjection => "SQL Injection",
            ThreatKind::Xss => "XSS Attempts",
            ThreatKind::Ddos => "DDoS Patterns",
            ThreatKind::BruteForce => "Brute Force",
            ThreatKind::Phishing => "Phishing",
        }
    }

    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            ThreatKind::SqlInjection | ThreatKind::Xss => Severity::High,
            ThreatKind::Ddos | ThreatKind::BruteForce => Severity::Medium,
            ThreatKind::Phishing => Severity::Low,
        }
    }
}

/// A made-up alert for the threat feed. Always shown as blocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreatAlert {
    pub sequence: u64,
    pub kind: ThreatKind,
    pub severity: Severity,
    pub source: Ipv4Addr,
}

/// Threat intelligence figures plus the recent alert feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreatPanel {
    pub total: u64,
    pub blocked: u64,
    pub active: i64,
    pub risk_score_tenths: i64,
    /// Newest first, at most `ALERT_HISTORY` entries.
    pub recent_alerts: VecDeque<ThreatAlert>,
    #[serde(skip)]
    alerts_raised: u64,
}

impl Default for ThreatPanel {
    fn default() -> Self {
        Self {
            total: 0,
            blocked: 0,
            active: 0,
            risk_score_tenths: 120,
            recent_alerts: VecDeque::with_capacity(ALERT_HISTORY),
            alerts_raised: 0,
        }
    }
}

impl ThreatPanel {
    pub fn step<J: JitterSource + ?Sized>(&mut self, jitter: &mut J) {
        bump(&mut self.total, THREAT_COUNT_STEP, jitter);
        bump(&mut self.blocked, THREAT_COUNT_STEP, jitter);
        self.active = ACTIVE_THREATS.draw(jitter);
        drift(&mut self.risk_score_tenths, PERCENT_TENTHS, RISK_STEP, jitter);

        if jitter.chance(3, 10) {
            self.raise_alert(jitter);
        }
    }

    fn raise_alert<J: JitterSource + ?Sized>(&mut self, jitter: &mut J) {
        let last = ThreatKind::ALL.len() as i64 - 1;
        let index = DisplayRange::new(0, last).draw(jitter) as usize;
        let kind = ThreatKind::ALL[index.min(ThreatKind::ALL.len() - 1)];

        let octet = DisplayRange::new(0, 254);
        let source = Ipv4Addr::new(
            octet.draw(jitter) as u8,
            octet.draw(jitter) as u8,
            octet.draw(jitter) as u8,
            octet.draw(jitter) as u8,
        );

        self.alerts_raised = self.alerts_raised.saturating_add(1);
        self.recent_alerts.push_front(ThreatAlert {
            sequence: self.alerts_raised,
            kind,
            severity: kind.severity(),
            source,
        });
        self.recent_alerts.truncate(ALERT_HISTORY);
    }

    #[must_use]
    pub fn within_bounds(&self) -> bool {
        ACTIVE_THREATS.contains(self.active)
            && PERCENT_TENTHS.contains(self.risk_score_tenths)
            && self.recent_alerts.len() <= ALERT_HISTORY
    }
}

/// NOIR systems figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoirPanel {
    pub threats_neutralized: u64,
    pub scans_completed: u64,
    pub anomalies_detected: u64,
    pub system_integrity_tenths: i64,
}

impl Default for NoirPanel {
    fn default() -> Self {
        Self {
            threats_neutralized: 0,
            scans_completed: 0,
            anomalies_detected: 0,
            system_integrity_tenths: SYSTEM_INTEGRITY.max,
        }
    }
}

impl NoirPanel {
    pub fn step<J: JitterSource + ?Sized>(&mut self, jitter: &mut J) {
        tick_if(&mut self.threats_neutralized, jitter.chance(1, 20));
        bump(&mut self.scans_completed, SCANS_STEP, jitter);
        tick_if(&mut self.anomalies_detected, jitter.chance(1, 50));
        self.system_integrity_tenths = SYSTEM_INTEGRITY.draw(jitter);
    }

    #[must_use]
    pub fn within_bounds(&self) -> bool {
        SYSTEM_INTEGRITY.contains(self.system_integrity_tenths)
    }
}

/// Quantum encryption panel. Only the key counter moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncryptionPanel {
    pub keys_generated: u64,
    pub entropy_tenths: i64,
    /// Vertices of the geometric encoding diagram.
    pub vertices: u8,
}

impl Default for EncryptionPanel {
    fn default() -> Self {
        Self {
            keys_generated: 0,
            entropy_tenths: 947,
            vertices: 13,
        }
    }
}

impl EncryptionPanel {
    pub fn step(&mut self) {
        self.keys_generated = self.keys_generated.saturating_add(1);
    }
}

// =============================================================================
// GATED VIEWS
// =============================================================================

/// Timeline status on the temporal monitoring card.
///
/// The timeline never destabilizes in the preview; the card only exists
/// to be locked or unlocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemporalStatus {
    pub stability: &'static str,
    pub anomalies: u64,
    pub causality: &'static str,
}

impl Default for TemporalStatus {
    fn default() -> Self {
        Self {
            stability: "STABLE",
            anomalies: 0,
            causality: "NORMAL",
        }
    }
}

/// One protection layer on the strata security card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrataLayer {
    pub layer: u8,
    pub name: &'static str,
    pub requires_level: i64,
    pub active: bool,
}

const STRATA_LAYERS: [(&str, FeatureFlag); 5] = [
    ("Perimeter", FeatureFlag::StrataSecurity),
    ("Network", FeatureFlag::StrataSecurity),
    ("Application", FeatureFlag::StrataSecurity),
    ("Data", FeatureFlag::StrataSecurity),
    ("Quantum", FeatureFlag::ConsciousnessIntegration),
];

fn strata_layers(features: FeatureSet) -> Vec<StrataLayer> {
    STRATA_LAYERS
        .iter()
        .zip(1u8..)
        .map(|(&(name, flag), layer)| StrataLayer {
            layer,
            name,
            requires_level: SecurityTier::unlocking(flag).level(),
            active: features.contains(flag),
        })
        .collect()
}

/// A detection capability listed on the threat intelligence page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionCapability {
    pub name: &'static str,
    pub requires_level: i64,
    pub active: bool,
}

const DETECTION_CAPABILITIES: [(&str, FeatureFlag); 3] = [
    ("Pattern Analysis", FeatureFlag::QuantumEncryption),
    ("Zero-Day Detection", FeatureFlag::StrataSecurity),
    ("AI Threat Prediction", FeatureFlag::TemporalMonitoring),
];

fn detection_capabilities(features: FeatureSet) -> Vec<DetectionCapability> {
    DETECTION_CAPABILITIES
        .iter()
        .map(|&(name, flag)| DetectionCapability {
            name,
            requires_level: SecurityTier::unlocking(flag).level(),
            active: features.contains(flag),
        })
        .collect()
}

/// A card hidden from the current tier, with the level that unlocks it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockedPanel {
    pub panel: &'static str,
    pub requires_level: i64,
}

/// Cards that are hidden entirely when their feature is locked.
const GATED_PANELS: [(&str, FeatureFlag); 3] = [
    ("temporal monitoring", FeatureFlag::TemporalMonitoring),
    ("strata security", FeatureFlag::StrataSecurity),
    ("noir systems", FeatureFlag::NoirSystems),
];

// =============================================================================
// BOARD
// =============================================================================

/// All panels, stepped together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsBoard {
    tick: u64,
    pub dashboard: DashboardPanel,
    pub network: NetworkPanel,
    pub temporal: TemporalStatus,
    pub threat: ThreatPanel,
    pub noir: NoirPanel,
    pub encryption: EncryptionPanel,
}

impl MetricsBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of steps taken so far.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Advance every panel by one tick.
    ///
    /// Locked panels keep moving; gating happens in `snapshot`.
    pub fn step<J: JitterSource + ?Sized>(&mut self, jitter: &mut J) {
        self.tick = self.tick.saturating_add(1);
        self.dashboard.step(jitter);
        self.network.step(jitter);
        self.threat.step(jitter);
        self.noir.step(jitter);
        self.encryption.step();
    }

    /// View of the board as `tier` is allowed to see it.
    ///
    /// Network figures are visible at every level. Temporal status,
    /// strata layers and NOIR figures need their feature flag.
    #[must_use]
    pub fn snapshot(&self, tier: SecurityTier) -> MetricsSnapshot {
        let features = tier.capabilities();
        let locked = GATED_PANELS
            .iter()
            .filter(|(_, flag)| !features.contains(*flag))
            .map(|&(panel, flag)| LockedPanel {
                panel,
                requires_level: SecurityTier::unlocking(flag).level(),
            })
            .collect();

        MetricsSnapshot {
            tick: self.tick,
            level: tier,
            features,
            encryption_bits: tier.profile().encryption.bits,
            dashboard: self.dashboard.clone(),
            encryption: self.encryption.clone(),
            network: self.network.clone(),
            threat: self.threat.clone(),
            detection: detection_capabilities(features),
            temporal: features
                .contains(FeatureFlag::TemporalMonitoring)
                .then(|| self.temporal.clone()),
            strata: features
                .contains(FeatureFlag::StrataSecurity)
                .then(|| strata_layers(features)),
            noir: features
                .contains(FeatureFlag::NoirSystems)
                .then(|| self.noir.clone()),
            locked,
        }
    }

    #[must_use]
    pub fn within_bounds(&self) -> bool {
        self.network.within_bounds() && self.threat.within_bounds() && self.noir.within_bounds()
    }
}

/// Serializable view of the board for one tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub tick: u64,
    pub level: SecurityTier,
    pub features: FeatureSet,
    pub encryption_bits: u16,
    pub dashboard: DashboardPanel,
    pub encryption: EncryptionPanel,
    pub network: NetworkPanel,
    pub threat: ThreatPanel,
    pub detection: Vec<DetectionCapability>,
    /// Present when temporal monitoring is unlocked.
    pub temporal: Option<TemporalStatus>,
    /// Present when strata security is unlocked.
    pub strata: Option<Vec<StrataLayer>>,
    /// Present when NOIR systems are unlocked.
    pub noir: Option<NoirPanel>,
    /// Hidden cards, lowest unlock level first.
    pub locked: Vec<LockedPanel>,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Replays raw values, ignoring the requested bounds.
    struct Scripted {
        values: Vec<i64>,
        next: usize,
    }

    impl Scripted {
        fn new(values: Vec<i64>) -> Self {
            Self { values, next: 0 }
        }

        fn pull(&mut self) -> i64 {
            let value = self.values.get(self.next).copied().unwrap_or(0);
            self.next = (self.next + 1) % self.values.len().max(1);
            value
        }
    }

    impl JitterSource for Scripted {
        fn sample(&mut self, _low: i64, _high: i64) -> i64 {
            self.pull()
        }

        fn chance(&mut self, _numerator: u32, _denominator: u32) -> bool {
            self.pull() % 2 == 0
        }
    }

    /// Always returns the upper bound and always hits.
    struct Ceiling;

    impl JitterSource for Ceiling {
        fn sample(&mut self, _low: i64, high: i64) -> i64 {
            high
        }

        fn chance(&mut self, _numerator: u32, _denominator: u32) -> bool {
            true
        }
    }

    /// Always returns the lower bound and never hits.
    struct Floor;

    impl JitterSource for Floor {
        fn sample(&mut self, low: i64, _high: i64) -> i64 {
            low
        }

        fn chance(&mut self, _numerator: u32, _denominator: u32) -> bool {
            false
        }
    }

    #[test]
    fn display_range_clamps() {
        let range = DisplayRange::new(1, 10);
        assert_eq!(range.clamp(-3), 1);
        assert_eq!(range.clamp(5), 5);
        assert_eq!(range.clamp(11), 10);
        assert!(range.contains(10));
        assert!(!range.contains(0));
    }

    #[test]
    fn floor_jitter_pins_values_at_minimum() {
        let mut board = MetricsBoard::new();
        for _ in 0..50 {
            board.step(&mut Floor);
        }
        assert_eq!(board.network.connections, CONNECTIONS.min);
        assert_eq!(board.network.active_ports, ACTIVE_PORTS.min);
        assert_eq!(board.threat.risk_score_tenths, 0);
        assert_eq!(board.dashboard.threats_blocked, 0);
        assert!(board.threat.recent_alerts.is_empty());
        assert!(board.within_bounds());
    }

    #[test]
    fn ceiling_jitter_never_escapes_range() {
        let mut board = MetricsBoard::new();
        for _ in 0..2_000 {
            board.step(&mut Ceiling);
        }
        assert_eq!(board.network.connections, CONNECTIONS.max);
        assert_eq!(board.network.active_ports, ACTIVE_PORTS.max);
        assert!(board.within_bounds());
        assert_eq!(board.threat.risk_score_tenths, PERCENT_TENTHS.max);
        assert_eq!(board.threat.recent_alerts.len(), ALERT_HISTORY);
        assert_eq!(board.dashboard.threats_blocked, 2_000);
    }

    #[test]
    fn alerts_are_newest_first() {
        let mut panel = ThreatPanel::default();
        for _ in 0..3 {
            panel.step(&mut Ceiling);
        }
        let sequences: Vec<u64> = panel.recent_alerts.iter().map(|a| a.sequence).collect();
        assert_eq!(sequences, vec![3, 2, 1]);
        assert_eq!(panel.recent_alerts[0].kind, ThreatKind::Phishing);
        assert_eq!(panel.recent_alerts[0].severity, Severity::Low);
        assert_eq!(panel.recent_alerts[0].source, Ipv4Addr::new(254, 254, 254, 254));
    }

    #[test]
    fn counters_saturate() {
        let mut panel = DashboardPanel {
            packets_analyzed: u64::MAX - 1,
            ..DashboardPanel::default()
        };
        panel.step(&mut Ceiling);
        assert_eq!(panel.packets_analyzed, u64::MAX);
    }

    #[test]
    fn encryption_counts_keys() {
        let mut board = MetricsBoard::new();
        board.step(&mut Floor);
        board.step(&mut Floor);
        assert_eq!(board.encryption.keys_generated, 2);
        assert_eq!(board.tick(), 2);
    }

    #[test]
    fn network_is_visible_at_every_level() {
        let board = MetricsBoard::new();
        for tier in SecurityTier::ALL {
            assert_eq!(board.snapshot(tier).network, board.network);
        }
    }

    #[test]
    fn snapshot_gates_locked_panels() {
        let board = MetricsBoard::new();

        let free = board.snapshot(SecurityTier::Free);
        assert!(free.temporal.is_none());
        assert!(free.strata.is_none());
        assert!(free.noir.is_none());
        assert_eq!(free.encryption_bits, 256);

        let business = board.snapshot(SecurityTier::Business);
        assert_eq!(business.temporal, Some(TemporalStatus::default()));
        assert!(business.strata.is_none());
        assert!(business.noir.is_none());

        let government = board.snapshot(SecurityTier::Government);
        assert!(government.temporal.is_some());
        assert!(government.strata.is_some());
        assert!(government.noir.is_some());
        assert!(government.locked.is_empty());

        let developer = board.snapshot(SecurityTier::Developer);
        assert!(developer.noir.is_some());
        assert_eq!(developer.encryption_bits, 512);
    }

    #[test]
    fn locked_panels_name_their_unlock_level() {
        let board = MetricsBoard::new();

        let free: Vec<(&str, i64)> = board
            .snapshot(SecurityTier::Free)
            .locked
            .iter()
            .map(|p| (p.panel, p.requires_level))
            .collect();
        assert_eq!(
            free,
            vec![
                ("temporal monitoring", 99),
                ("strata security", 100),
                ("noir systems", 100),
            ]
        );

        let business = board.snapshot(SecurityTier::Business).locked;
        assert_eq!(business.len(), 2);
        assert!(business.iter().all(|p| p.requires_level == 100));
    }

    #[test]
    fn quantum_strata_layer_needs_developer() {
        let board = MetricsBoard::new();

        let government = board.snapshot(SecurityTier::Government).strata.unwrap_or_default();
        let active: Vec<bool> = government.iter().map(|l| l.active).collect();
        assert_eq!(active, vec![true, true, true, true, false]);
        assert_eq!(government[4].name, "Quantum");
        assert_eq!(government[4].requires_level, 1000);

        let developer = board.snapshot(SecurityTier::Developer).strata.unwrap_or_default();
        assert!(developer.iter().all(|l| l.active));
    }

    #[test]
    fn detection_capabilities_follow_tier() {
        let board = MetricsBoard::new();
        let active = |tier| -> Vec<bool> {
            board.snapshot(tier).detection.iter().map(|c| c.active).collect()
        };

        assert_eq!(active(SecurityTier::Free), vec![true, false, false]);
        assert_eq!(active(SecurityTier::Business), vec![true, false, true]);
        assert_eq!(active(SecurityTier::Government), vec![true, true, true]);

        let levels: Vec<i64> = board
            .snapshot(SecurityTier::Free)
            .detection
            .iter()
            .map(|c| c.requires_level)
            .collect();
        assert_eq!(levels, vec![65, 100, 99]);
    }

    #[test]
    fn snapshot_serializes_locked_panels_as_null() {
        let snapshot = MetricsBoard::new().snapshot(SecurityTier::Free);
        let json = serde_json::to_value(&snapshot).ok();
        let noir = json.as_ref().and_then(|v| v.get("noir"));
        assert_eq!(noir, Some(&serde_json::Value::Null));
        let network = json.as_ref().and_then(|v| v.get("network"));
        assert!(network.is_some_and(serde_json::Value::is_object));
        let level = json.as_ref().and_then(|v| v.get("level")).and_then(|v| v.as_i64());
        assert_eq!(level, Some(65));
    }

    proptest! {
        #[test]
        fn any_jitter_stays_in_range(values in proptest::collection::vec(any::<i64>(), 1..64), steps in 1usize..200) {
            let mut board = MetricsBoard::new();
            let mut jitter = Scripted::new(values);
            for _ in 0..steps {
                board.step(&mut jitter);
                prop_assert!(board.within_bounds());
            }
        }
    }
}
