//! Persisted player profile: prestige, perks, and high scores.
//!
//! The storage collaborator reads and writes this as one opaque,
//! versionless JSON blob. Missing fields fall back to defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::PerkCatalog;
use crate::enums::{Difficulty, PerkId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub prestige: u64,
    pub perks: BTreeMap<PerkId, bool>,
    pub high_scores: BTreeMap<Difficulty, u64>,
}

impl Profile {
    pub fn has_perk(&self, perk: PerkId) -> bool {
        self.perks.get(&perk).copied().unwrap_or(false)
    }

    pub fn high_score(&self, difficulty: Difficulty) -> u64 {
        self.high_scores.get(&difficulty).copied().unwrap_or(0)
    }

    /// Record a finished match. Returns true when the score beats the
    /// stored high score for that difficulty.
    pub fn record_score(&mut self, difficulty: Difficulty, score: u64) -> bool {
        if score > self.high_score(difficulty) {
            self.high_scores.insert(difficulty, score);
            true
        } else {
            false
        }
    }

    /// Spend prestige on a perk.
    pub fn unlock_perk(&mut self, perk: PerkId, catalog: &PerkCatalog) -> Result<(), String> {
        if self.has_perk(perk) {
            return Err(format!("{perk:?} is already unlocked"));
        }
        let cost = catalog
            .cost(perk)
            .ok_or_else(|| format!("{perk:?} is not for sale"))?;
        if self.prestige < cost {
            return Err(format!(
                "{perk:?} costs {cost} prestige, only {} available",
                self.prestige
            ));
        }
        self.prestige -= cost;
        self.perks.insert(perk, true);
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| format!("Failed to serialize profile: {e}"))
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Failed to parse profile: {e}"))
    }
}
