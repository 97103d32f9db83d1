//! Configuration tables consumed by the simulation.
//!
//! Every table has a `Default` carrying the canonical tuning. A full
//! `GameConfig` can also be parsed from JSON to override them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::MIN_MULTIPLIER;
use crate::enums::{Difficulty, PerkId, ThreatKind, UpgradeKind};

/// Per-difficulty multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultySettings {
    /// Scales the spawn delay (higher = slower pacing).
    pub delay_multiplier: f64,
    /// Scales threat speed.
    pub speed_bonus: f64,
    /// Scales procedural wave size.
    pub size_multiplier: f64,
    /// Scales turret fire rate (higher = faster).
    pub turret_multiplier: f64,
    pub starting_currency: u32,
}

impl DifficultySettings {
    /// Copy with every divisor-capable multiplier clamped away from zero.
    pub fn clamped(&self) -> Self {
        Self {
            delay_multiplier: self.delay_multiplier.max(MIN_MULTIPLIER),
            speed_bonus: self.speed_bonus.max(MIN_MULTIPLIER),
            size_multiplier: self.size_multiplier.max(MIN_MULTIPLIER),
            turret_multiplier: self.turret_multiplier.max(MIN_MULTIPLIER),
            starting_currency: self.starting_currency,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyTable {
    pub easy: DifficultySettings,
    pub normal: DifficultySettings,
    pub hard: DifficultySettings,
}

impl DifficultyTable {
    pub fn get(&self, difficulty: Difficulty) -> DifficultySettings {
        let settings = match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Normal => self.normal,
            Difficulty::Hard => self.hard,
        };
        settings.clamped()
    }
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            easy: DifficultySettings {
                delay_multiplier: 1.3,
                speed_bonus: 0.85,
                size_multiplier: 0.8,
                turret_multiplier: 1.2,
                starting_currency: 150,
            },
            normal: DifficultySettings {
                delay_multiplier: 1.0,
                speed_bonus: 1.0,
                size_multiplier: 1.0,
                turret_multiplier: 1.0,
                starting_currency: 100,
            },
            hard: DifficultySettings {
                delay_multiplier: 0.8,
                speed_bonus: 1.2,
                size_multiplier: 1.25,
                turret_multiplier: 0.85,
                starting_currency: 60,
            },
        }
    }
}

/// One predefined wave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveDefinition {
    /// Threats to queue: (kind, count).
    pub threats: Vec<(ThreatKind, u32)>,
    /// Base delay between spawns (ticks), before difficulty scaling.
    pub base_delay: f64,
    #[serde(default)]
    pub boss: bool,
}

impl WaveDefinition {
    fn new(threats: Vec<(ThreatKind, u32)>, base_delay: f64) -> Self {
        Self {
            threats,
            base_delay,
            boss: false,
        }
    }

    pub fn total_threats(&self) -> u32 {
        self.threats.iter().map(|(_, count)| count).sum()
    }
}

/// Predefined opening waves. Waves past the table are procedural.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveTable {
    pub waves: Vec<WaveDefinition>,
}

impl WaveTable {
    /// Definition for a 1-based wave index, if it is in the table.
    pub fn get(&self, wave: u32) -> Option<&WaveDefinition> {
        wave.checked_sub(1).and_then(|i| self.waves.get(i as usize))
    }

    /// Number of predefined waves (the procedural offset).
    pub fn len(&self) -> u32 {
        self.waves.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }
}

impl Default for WaveTable {
    fn default() -> Self {
        use ThreatKind::*;
        Self {
            waves: vec![
                WaveDefinition::new(vec![(Standard, 6)], 90.0),
                WaveDefinition::new(vec![(Standard, 8)], 85.0),
                WaveDefinition::new(vec![(Standard, 8), (Mirv, 2)], 80.0),
                WaveDefinition::new(vec![(Standard, 10), (Mirv, 2)], 75.0),
                WaveDefinition::new(vec![(Standard, 10), (Mirv, 3), (Armored, 1)], 70.0),
                WaveDefinition::new(vec![(Standard, 10), (Mirv, 3), (Armored, 2)], 65.0),
                WaveDefinition::new(vec![(Standard, 12), (Mirv, 3), (Designator, 2)], 60.0),
                WaveDefinition::new(
                    vec![(Standard, 12), (Mirv, 4), (Designator, 2), (Armored, 2)],
                    60.0,
                ),
                WaveDefinition::new(
                    vec![(Standard, 12), (Mirv, 4), (Stealth, 3), (Swarmer, 2)],
                    55.0,
                ),
                WaveDefinition::new(
                    vec![
                        (Standard, 14),
                        (Mirv, 4),
                        (Stealth, 3),
                        (Swarmer, 3),
                        (DecoyDeployer, 2),
                    ],
                    55.0,
                ),
            ],
        }
    }
}

/// Points and currency for destroying one threat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub points: u64,
    pub currency: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsTable {
    pub threats: BTreeMap<ThreatKind, Reward>,
    pub boss: Reward,
}

impl PointsTable {
    /// Reward for a threat kind; unknown kinds score nothing.
    pub fn reward(&self, kind: ThreatKind) -> Reward {
        self.threats.get(&kind).copied().unwrap_or_default()
    }
}

impl Default for PointsTable {
    fn default() -> Self {
        let entries = [
            (ThreatKind::Standard, 25, 5),
            (ThreatKind::Armored, 75, 15),
            (ThreatKind::Stealth, 50, 10),
            (ThreatKind::Swarmer, 40, 8),
            (ThreatKind::Mirv, 60, 12),
            (ThreatKind::Drone, 10, 2),
            (ThreatKind::DecoyDeployer, 50, 10),
            (ThreatKind::Designator, 70, 14),
        ];
        Self {
            threats: entries
                .into_iter()
                .map(|(kind, points, currency)| (kind, Reward { points, currency }))
                .collect(),
            boss: Reward {
                points: 1000,
                currency: 200,
            },
        }
    }
}

/// Pricing of one shop item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShopItem {
    pub base_cost: u32,
    /// Cost multiplier per level already bought.
    pub growth: f64,
    /// Levelled upgrades stop at this level; `None` for consumables.
    pub max_level: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopCatalog {
    pub items: BTreeMap<UpgradeKind, ShopItem>,
}

impl ShopCatalog {
    /// Undiscounted cost at the given current level.
    pub fn cost(&self, kind: UpgradeKind, level: u32) -> Option<u32> {
        let item = self.items.get(&kind)?;
        let cost = item.base_cost as f64 * item.growth.powi(level as i32);
        Some(cost.ceil() as u32)
    }

    pub fn max_level(&self, kind: UpgradeKind) -> Option<u32> {
        self.items.get(&kind).and_then(|item| item.max_level)
    }
}

impl Default for ShopCatalog {
    fn default() -> Self {
        use UpgradeKind::*;
        let levelled = |base_cost, growth, max| ShopItem {
            base_cost,
            growth,
            max_level: Some(max),
        };
        let flat = |base_cost| ShopItem {
            base_cost,
            growth: 1.0,
            max_level: None,
        };
        Self {
            items: BTreeMap::from([
                (InterceptorSpeed, levelled(60, 1.5, 5)),
                (Multishot, levelled(150, 2.0, 3)),
                (BlastRadius, levelled(80, 1.5, 5)),
                (TurretFireRate, levelled(90, 1.5, 5)),
                (TurretRange, levelled(70, 1.5, 5)),
                (Nuke, flat(120)),
                (Scrambler, flat(90)),
                (Mine, flat(50)),
                (Turret, flat(200)),
                (StructureArmor, flat(80)),
                (StructureRepair, flat(150)),
            ]),
        }
    }
}

/// Prestige price of each permanent perk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerkCatalog {
    pub costs: BTreeMap<PerkId, u64>,
}

impl PerkCatalog {
    pub fn cost(&self, perk: PerkId) -> Option<u64> {
        self.costs.get(&perk).copied()
    }
}

impl Default for PerkCatalog {
    fn default() -> Self {
        Self {
            costs: BTreeMap::from([
                (PerkId::StartingNuke, 10),
                (PerkId::ReinforcedStructures, 15),
                (PerkId::CriticalStrikes, 12),
                (PerkId::WarChest, 8),
                (PerkId::AutoTurret, 20),
            ]),
        }
    }
}

/// All configuration collaborators bundled for one engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub difficulty: DifficultyTable,
    pub waves: WaveTable,
    pub points: PointsTable,
    pub shop: ShopCatalog,
    pub perks: PerkCatalog,
}

impl GameConfig {
    /// Parse a config override. Missing sections keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Failed to parse game config: {e}"))
    }
}
