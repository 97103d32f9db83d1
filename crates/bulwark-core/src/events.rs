//! Events emitted by the simulation for UI, audio and visual effects.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// One notable thing that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    MatchStarted {
        difficulty: Difficulty,
    },
    WaveStarted {
        wave: u32,
        boss: bool,
    },
    /// `forced` is set when the stall failsafe ended the wave.
    WaveCleared {
        wave: u32,
        forced: bool,
    },
    ThreatDestroyed {
        id: u32,
        kind: ThreatKind,
        points: u64,
        x: f64,
        y: f64,
    },
    /// Non-lethal hit on a multi-hit threat.
    ThreatDamaged {
        id: u32,
        remaining: f64,
    },
    ThreatSplit {
        id: u32,
        kind: ThreatKind,
        offspring: u32,
    },
    DecoyReleased {
        x: f64,
        y: f64,
    },
    InterceptorLaunched {
        tier: InterceptorTier,
        homing: bool,
    },
    InterceptorDetonated {
        x: f64,
        y: f64,
        radius: f64,
        tier: InterceptorTier,
    },
    /// A homing interceptor was pulled onto a decoy.
    InterceptorLured,
    Stunned {
        ticks: u32,
    },
    BossSpawned {
        health: f64,
    },
    BossDamaged {
        remaining: f64,
        critical: bool,
    },
    BossDefeated {
        points: u64,
    },
    DesignationStarted {
        structure: usize,
    },
    StrikeIncoming {
        structure: usize,
    },
    StructureArmorLost {
        structure: usize,
    },
    StructureDestroyed {
        structure: usize,
    },
    StructureRepaired {
        structure: usize,
    },
    MineArmed {
        x: f64,
    },
    MineLaunched {
        x: f64,
    },
    MineDetonated {
        x: f64,
        y: f64,
        kills: u32,
    },
    TurretFired {
        x: f64,
        y: f64,
        angle: f64,
    },
    /// Currency, levels or availability changed; the shop should re-render.
    ShopChanged,
    PurchaseRejected {
        item: UpgradeKind,
        reason: String,
    },
    PerkUnlocked {
        perk: PerkId,
    },
    GameOver {
        summary: GameOverSummary,
    },
}

/// Summary handed to the UI when the match ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameOverSummary {
    pub score: u64,
    pub wave: u32,
    pub difficulty: Difficulty,
    pub prestige_earned: u64,
    pub new_high_score: bool,
    pub high_score: u64,
}
