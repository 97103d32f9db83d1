//! Variant-specific behavioral profiles.
//!
//! Consolidates per-variant parameters. A threat's `kind` tag selects one
//! profile; the profile decides which capabilities the threat carries.

use bulwark_core::constants::*;
use bulwark_core::enums::ThreatKind;

/// Behavioral profile for a threat variant.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreatBehaviorProfile {
    pub radius: f64,
    /// Multiplier on the wave's threat speed.
    pub speed_factor: f64,
    /// Health pool for multi-hit variants; `None` dies to any hit.
    pub health: Option<f64>,
    /// Lifetime cap in ticks.
    pub max_age: u32,
    /// Toggles visibility on a fixed period.
    pub cloaks: bool,
    /// Split height band as fractions of the ground height.
    pub split_band: Option<(f64, f64)>,
    /// What a split produces: (kind, count).
    pub offspring: Option<(ThreatKind, u32)>,
    /// Decoy release interval.
    pub decoy_interval: Option<u32>,
    /// Hovers over a structure and calls in a strike instead of impacting.
    pub designates: bool,
}

impl ThreatBehaviorProfile {
    fn plain(radius: f64, speed_factor: f64) -> Self {
        Self {
            radius,
            speed_factor,
            health: None,
            max_age: THREAT_MAX_LIFETIME,
            cloaks: false,
            split_band: None,
            offspring: None,
            decoy_interval: None,
            designates: false,
        }
    }

    pub fn is_multi_hit(&self) -> bool {
        self.health.is_some()
    }
}

/// Get the behavioral profile for a given variant.
pub fn get_profile(kind: ThreatKind) -> ThreatBehaviorProfile {
    match kind {
        ThreatKind::Standard => ThreatBehaviorProfile::plain(6.0, 1.0),
        ThreatKind::Armored => ThreatBehaviorProfile {
            health: Some(ARMORED_HEALTH),
            ..ThreatBehaviorProfile::plain(9.0, 0.6)
        },
        ThreatKind::Stealth => ThreatBehaviorProfile {
            cloaks: true,
            ..ThreatBehaviorProfile::plain(6.0, 1.1)
        },
        ThreatKind::Swarmer => ThreatBehaviorProfile {
            split_band: Some(SWARMER_SPLIT_BAND),
            offspring: Some((ThreatKind::Drone, SWARMER_OFFSPRING)),
            ..ThreatBehaviorProfile::plain(8.0, 0.9)
        },
        ThreatKind::Mirv => ThreatBehaviorProfile {
            split_band: Some(MIRV_SPLIT_BAND),
            offspring: Some((ThreatKind::Standard, MIRV_OFFSPRING)),
            ..ThreatBehaviorProfile::plain(8.0, 0.9)
        },
        ThreatKind::Drone => ThreatBehaviorProfile {
            max_age: DRONE_LIFE_TICKS,
            ..ThreatBehaviorProfile::plain(4.0, 2.2)
        },
        ThreatKind::DecoyDeployer => ThreatBehaviorProfile {
            decoy_interval: Some(DECOY_INTERVAL_TICKS),
            ..ThreatBehaviorProfile::plain(7.0, 0.8)
        },
        ThreatKind::Designator => ThreatBehaviorProfile {
            designates: true,
            ..ThreatBehaviorProfile::plain(7.0, 0.9)
        },
    }
}
