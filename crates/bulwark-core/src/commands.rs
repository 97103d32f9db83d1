//! Player commands sent from the input collaborator to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Match control ---
    /// Start a match at the chosen difficulty (Start phase only).
    StartMatch { difficulty: Difficulty },
    /// Leave the shop and begin the next wave.
    NextWave,
    Pause,
    Resume,

    // --- Aiming and firing ---
    /// Resolved pointer coordinate (mouse-style play).
    PointerMoved { x: f64, y: f64 },
    /// Fire at the current target, or at the pointer if there is none.
    Fire,
    /// Touch-style tap: resolve a target around the tap and fire at once.
    Tap { x: f64, y: f64 },

    // --- Progression ---
    /// Buy a shop item (Between-Waves only).
    Purchase { item: UpgradeKind },
    /// Spend prestige on a permanent perk (Start phase only).
    UnlockPerk { perk: PerkId },
}
