//! Game state snapshot — the complete visible state handed to the
//! rendering and UI collaborators after each tick.

use serde::{Deserialize, Serialize};

use crate::components::Structure;
use crate::enums::*;
use crate::events::{GameEvent, GameOverSummary};
use crate::types::{Position, SimTime, Velocity};

/// Complete game state published after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: MatchPhase,
    pub difficulty: Difficulty,
    pub hud: HudView,
    pub threats: Vec<ThreatView>,
    pub decoys: Vec<ProjectileView>,
    pub interceptors: Vec<InterceptorView>,
    pub tracers: Vec<ProjectileView>,
    pub mines: Vec<MineView>,
    pub turrets: Vec<TurretView>,
    pub boss: Option<BossView>,
    pub structures: Vec<Structure>,
    pub shop: Vec<ShopItemView>,
    pub game_over: Option<GameOverSummary>,
    pub events: Vec<GameEvent>,
}

/// Numbers for the heads-up display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HudView {
    pub wave: u32,
    pub score: u64,
    pub currency: u32,
    pub paused: bool,
    /// Boss health in 0..=1, when a boss is alive.
    pub boss_health_fraction: Option<f64>,
    pub queued_threats: u32,
    pub stun_ticks: u32,
    pub nuke_loaded: bool,
    pub scrambler_active: bool,
    /// Currently targeted threat/decoy/boss, if any.
    pub target: Option<TargetView>,
    pub structures_standing: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TargetView {
    pub kind: TargetKind,
    pub position: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatView {
    pub id: u32,
    pub kind: ThreatKind,
    pub position: Position,
    pub velocity: Velocity,
    pub radius: f64,
    /// False while a stealth threat is cloaked.
    pub visible: bool,
    pub health: Option<f64>,
    pub hit_flash: bool,
    pub designating: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterceptorView {
    pub position: Position,
    pub velocity: Velocity,
    pub tier: InterceptorTier,
    pub blast_radius: f64,
    pub homing: bool,
}

/// Decoys and tracers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub position: Position,
    pub radius: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MineView {
    pub position: Position,
    pub armed: bool,
    pub launched: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurretView {
    pub position: Position,
    pub aim_angle: f64,
    pub range: f64,
    pub state: TurretState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossView {
    pub position: Position,
    pub health: f64,
    pub max_health: f64,
    pub radius: f64,
}

/// One shop entry as the UI should present it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopItemView {
    pub item: UpgradeKind,
    pub level: u32,
    pub cost: u32,
    pub affordable: bool,
    pub available: bool,
}
