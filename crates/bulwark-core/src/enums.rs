//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Threat variant tag. Selects the behavior profile of a threat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ThreatKind {
    /// Constant velocity, no special behavior.
    Standard,
    /// Slow, multi-hit health pool.
    Armored,
    /// Periodically cloaks; untargetable while invisible.
    Stealth,
    /// Splits into a fan of drones at its split height.
    Swarmer,
    /// Splits into standard warheads at its split height.
    Mirv,
    /// Small, fast, short-lived. Offspring or boss spawn only.
    Drone,
    /// Periodically releases decoys.
    DecoyDeployer,
    /// Hovers over a structure and calls in a ground strike.
    Designator,
}

impl ThreatKind {
    /// Every variant, in declaration order.
    pub const ALL: [ThreatKind; 8] = [
        ThreatKind::Standard,
        ThreatKind::Armored,
        ThreatKind::Stealth,
        ThreatKind::Swarmer,
        ThreatKind::Mirv,
        ThreatKind::Drone,
        ThreatKind::DecoyDeployer,
        ThreatKind::Designator,
    ];

    /// Types the turret controller prefers over plain nearest-first.
    pub fn is_high_threat(self) -> bool {
        matches!(
            self,
            ThreatKind::Swarmer
                | ThreatKind::Stealth
                | ThreatKind::Mirv
                | ThreatKind::DecoyDeployer
                | ThreatKind::Armored
        )
    }
}

/// Interceptor damage tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterceptorTier {
    #[default]
    Standard,
    /// Nuke: large blast, heavy damage, arms the global stun on detonation.
    Heavy,
}

/// Designator sub-state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DesignatorPhase {
    /// Flying toward the hover point above its structure.
    #[default]
    Approach,
    /// Stationary lock-on.
    Designating,
    /// Strike handed off; awaiting removal.
    Complete,
}

/// Turret controller state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurretState {
    /// Idle sweep, no target.
    #[default]
    Scanning,
    /// Target locked, waiting for the fire cooldown.
    TargetAcquired,
    /// Emitting a tracer burst.
    Firing,
}

/// Match phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    #[default]
    Start,
    InWave,
    BetweenWaves,
    Paused,
    /// Terminal until the world is rebuilt.
    GameOver,
}

/// Difficulty selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

/// Purchasable shop items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UpgradeKind {
    InterceptorSpeed,
    Multishot,
    BlastRadius,
    TurretFireRate,
    TurretRange,
    Nuke,
    Scrambler,
    Mine,
    Turret,
    StructureArmor,
    StructureRepair,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 11] = [
        UpgradeKind::InterceptorSpeed,
        UpgradeKind::Multishot,
        UpgradeKind::BlastRadius,
        UpgradeKind::TurretFireRate,
        UpgradeKind::TurretRange,
        UpgradeKind::Nuke,
        UpgradeKind::Scrambler,
        UpgradeKind::Mine,
        UpgradeKind::Turret,
        UpgradeKind::StructureArmor,
        UpgradeKind::StructureRepair,
    ];
}

/// Permanent perks bought with prestige currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PerkId {
    /// Nuke loaded at match start and after every wave.
    StartingNuke,
    /// All structures start armored.
    ReinforcedStructures,
    /// Extra critical-hit chance.
    CriticalStrikes,
    /// Extra starting currency.
    WarChest,
    /// Start the match with one turret.
    AutoTurret,
}

impl PerkId {
    pub const ALL: [PerkId; 5] = [
        PerkId::StartingNuke,
        PerkId::ReinforcedStructures,
        PerkId::CriticalStrikes,
        PerkId::WarChest,
        PerkId::AutoTurret,
    ];
}

/// What kind of entity a target reference resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    Threat,
    Decoy,
    Boss,
}
