//! ECS components for hecs entities.
//!
//! Components are plain data structs with no game logic.
//! Behavior lives in `bulwark-behavior`; orchestration in the sim systems.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Shared record of every hostile threat. The `kind` tag selects behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Threat {
    /// Unique among live threats; shown in snapshots and events.
    pub id: u32,
    pub kind: ThreatKind,
    pub radius: f64,
    /// Ticks alive.
    pub age: u32,
    /// Per-threat lifetime cap (drones are short-lived).
    pub max_age: u32,
}

/// Health pool for multi-hit threats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: f64,
    pub max: f64,
    /// Remaining "just hit" flash ticks.
    pub hit_flash: u32,
}

/// Stealth visibility toggle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Cloak {
    pub visible: bool,
    pub period: u32,
    pub timer: u32,
}

/// One-shot split trigger for swarmer/mirv.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SplitCharge {
    /// Split once the threat's y reaches this value.
    pub split_y: f64,
    pub spent: bool,
}

/// Periodic decoy release.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DecoyEmitter {
    pub interval: u32,
    pub timer: u32,
}

/// Designator lock-on state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Designation {
    /// Index of the designated structure.
    pub structure: usize,
    pub hover: (f64, f64),
    pub phase: DesignatorPhase,
    pub timer: u32,
}

/// Player-fired interceptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interceptor {
    /// Weak reference; revalidated against the world every tick.
    #[serde(skip)]
    pub target: Option<hecs::Entity>,
    /// Aim point for non-homing flight.
    pub aim: (f64, f64),
    pub blast_radius: f64,
    pub speed: f64,
    pub tier: InterceptorTier,
    pub homing: bool,
    /// Set once a decoy has hijacked this interceptor.
    pub retargeted: bool,
    pub life: u32,
}

/// Distraction flare released by decoy-deployers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Decoy {
    pub id: u32,
    pub radius: f64,
    pub life: u32,
}

/// Turret-fired projectile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tracer {
    pub radius: f64,
    pub life: u32,
}

/// Ground mine: arming, then proximity launch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mine {
    pub arming: u32,
    pub launched: bool,
    #[serde(skip)]
    pub target: Option<hecs::Entity>,
    pub trigger_range: f64,
    /// Ground y at launch, for the travel bound.
    pub origin_y: f64,
}

/// Autonomous defensive turret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turret {
    pub range: f64,
    /// Ticks until the next burst may start.
    pub cooldown: u32,
    pub aim_angle: f64,
    pub state: TurretState,
    #[serde(skip)]
    pub target: Option<hecs::Entity>,
    /// Ticks until the turret may acquire a new target.
    pub reacquire: u32,
    pub burst_left: u32,
    pub burst_timer: u32,
}

/// Boss encounter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Boss {
    pub health: f64,
    pub max_health: f64,
    pub spawn_cooldown: u32,
    pub radius: f64,
    pub hit_flash: u32,
}

/// Defended ground structure ("city"). Stored outside the ECS.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    /// Centre x.
    pub x: f64,
    /// Top edge y.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub destroyed: bool,
    /// Absorbs exactly one hit, then clears.
    pub armored: bool,
    /// Display-only rubble variant.
    pub rubble: u8,
}

/// Result of one impact on a structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureHit {
    ArmorAbsorbed,
    Destroyed,
    /// Already destroyed; nothing changed.
    NoEffect,
}

impl Structure {
    /// Apply one impact: consumes the armor layer or destroys, never both.
    pub fn take_hit(&mut self, rubble: u8) -> StructureHit {
        if self.destroyed {
            StructureHit::NoEffect
        } else if self.armored {
            self.armored = false;
            StructureHit::ArmorAbsorbed
        } else {
            self.destroyed = true;
            self.rubble = rubble;
            StructureHit::Destroyed
        }
    }

    /// Whether a circle at (x, y) with radius r overlaps the footprint.
    pub fn contains(&self, x: f64, y: f64, r: f64) -> bool {
        (x - self.x).abs() <= self.width / 2.0 + r && y + r >= self.y
    }
}
