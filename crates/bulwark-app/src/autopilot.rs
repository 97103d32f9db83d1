//! Autopilot: a scripted player for demos and soak runs.
//!
//! Looks only at the published snapshot, so it drives the engine through
//! the same command surface a human front end would.

use bulwark_core::commands::PlayerCommand;
use bulwark_core::enums::{Difficulty, MatchPhase, UpgradeKind};
use bulwark_core::state::GameStateSnapshot;
use bulwark_core::types::Position;

/// Shopping preference, most wanted first.
const SHOPPING_LIST: [UpgradeKind; 9] = [
    UpgradeKind::StructureRepair,
    UpgradeKind::Multishot,
    UpgradeKind::Turret,
    UpgradeKind::BlastRadius,
    UpgradeKind::InterceptorSpeed,
    UpgradeKind::Mine,
    UpgradeKind::TurretFireRate,
    UpgradeKind::TurretRange,
    UpgradeKind::StructureArmor,
];

#[derive(Debug, Clone)]
pub struct Autopilot {
    difficulty: Difficulty,
}

impl Autopilot {
    pub fn new(difficulty: Difficulty) -> Self {
        Self { difficulty }
    }

    /// Commands to queue in response to the latest snapshot.
    pub fn commands(&mut self, snapshot: &GameStateSnapshot) -> Vec<PlayerCommand> {
        match snapshot.phase {
            MatchPhase::Start => vec![PlayerCommand::StartMatch {
                difficulty: self.difficulty,
            }],
            MatchPhase::InWave => match aim_point(snapshot) {
                Some(at) => vec![
                    PlayerCommand::PointerMoved { x: at.x, y: at.y },
                    PlayerCommand::Fire,
                ],
                None => Vec::new(),
            },
            MatchPhase::BetweenWaves => vec![shop(snapshot)],
            MatchPhase::Paused | MatchPhase::GameOver => Vec::new(),
        }
    }
}

/// The visible threat closest to the ground, else the boss.
fn aim_point(snapshot: &GameStateSnapshot) -> Option<Position> {
    snapshot
        .threats
        .iter()
        .filter(|t| t.visible)
        .max_by(|a, b| a.position.y.total_cmp(&b.position.y))
        .map(|t| t.position)
        .or_else(|| snapshot.boss.as_ref().map(|b| b.position))
}

/// One purchase per tick until nothing on the list fits, then move on.
fn shop(snapshot: &GameStateSnapshot) -> PlayerCommand {
    SHOPPING_LIST
        .iter()
        .find(|&&item| {
            snapshot
                .shop
                .iter()
                .any(|v| v.item == item && v.available && v.affordable)
        })
        .map(|&item| PlayerCommand::Purchase { item })
        .unwrap_or(PlayerCommand::NextWave)
}
