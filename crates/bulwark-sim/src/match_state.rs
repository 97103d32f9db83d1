//! Match-level state: wave progress, score, currency, upgrades and the
//! one-shot per-wave flags.

use bulwark_core::config::{DifficultySettings, Reward};
use bulwark_core::constants::*;
use bulwark_core::enums::{Difficulty, MatchPhase, UpgradeKind};
use bulwark_core::events::GameOverSummary;
use bulwark_core::types::Position;

use crate::systems::targeting::Candidate;
use crate::systems::wave_director::WavePlan;

/// Per-run upgrade levels. They persist across waves within one match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Upgrades {
    pub interceptor_speed: u32,
    pub multishot: u32,
    pub blast_radius: u32,
    pub turret_fire_rate: u32,
    pub turret_range: u32,
}

impl Upgrades {
    /// Level for levelled items; one-shot and placement items report 0.
    pub fn level(&self, kind: UpgradeKind) -> u32 {
        match kind {
            UpgradeKind::InterceptorSpeed => self.interceptor_speed,
            UpgradeKind::Multishot => self.multishot,
            UpgradeKind::BlastRadius => self.blast_radius,
            UpgradeKind::TurretFireRate => self.turret_fire_rate,
            UpgradeKind::TurretRange => self.turret_range,
            _ => 0,
        }
    }

    pub fn raise(&mut self, kind: UpgradeKind) {
        match kind {
            UpgradeKind::InterceptorSpeed => self.interceptor_speed += 1,
            UpgradeKind::Multishot => self.multishot += 1,
            UpgradeKind::BlastRadius => self.blast_radius += 1,
            UpgradeKind::TurretFireRate => self.turret_fire_rate += 1,
            UpgradeKind::TurretRange => self.turret_range += 1,
            _ => {}
        }
    }

    pub fn interceptor_speed(&self) -> f64 {
        INTERCEPTOR_BASE_SPEED + INTERCEPTOR_SPEED_PER_LEVEL * self.interceptor_speed as f64
    }

    pub fn blast_radius(&self) -> f64 {
        INTERCEPTOR_BASE_BLAST + INTERCEPTOR_BLAST_PER_LEVEL * self.blast_radius as f64
    }

    pub fn volley(&self) -> u32 {
        1 + self.multishot
    }

    pub fn turret_range(&self) -> f64 {
        TURRET_BASE_RANGE + TURRET_RANGE_PER_LEVEL * self.turret_range as f64
    }
}

/// Designator strike waiting to land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingStrike {
    pub structure: usize,
    pub ticks_left: u32,
}

#[derive(Debug, Clone)]
pub struct MatchState {
    pub phase: MatchPhase,
    pub difficulty: Difficulty,
    pub settings: DifficultySettings,
    /// 1-based; 0 before the first wave.
    pub wave: u32,
    pub plan: WavePlan,
    pub spawn_timer: f64,
    pub score: u64,
    pub currency: u32,
    pub upgrades: Upgrades,
    pub nuke_loaded: bool,
    pub scrambler_active: bool,
    pub first_discount_used: bool,
    pub crit_chance: f64,
    pub stun_ticks: u32,
    /// Ticks with a non-empty queue and no kills.
    pub stall_ticks: u32,
    pub kills_this_tick: u32,
    pub boss_defeated: bool,
    pub fire_cooldown: u32,
    pub pointer: Option<Position>,
    /// Persistent mouse-style target, re-resolved every tick.
    pub target: Option<Candidate>,
    pub pending_strikes: Vec<PendingStrike>,
    pub next_threat_id: u32,
    pub next_decoy_id: u32,
    pub game_over: Option<GameOverSummary>,
}

impl Default for MatchState {
    fn default() -> Self {
        Self {
            phase: MatchPhase::Start,
            difficulty: Difficulty::default(),
            settings: bulwark_core::config::DifficultyTable::default().get(Difficulty::default()),
            wave: 0,
            plan: WavePlan::default(),
            spawn_timer: 0.0,
            score: 0,
            currency: 0,
            upgrades: Upgrades::default(),
            nuke_loaded: false,
            scrambler_active: false,
            first_discount_used: false,
            crit_chance: BASE_CRIT_CHANCE,
            stun_ticks: 0,
            stall_ticks: 0,
            kills_this_tick: 0,
            boss_defeated: false,
            fire_cooldown: 0,
            pointer: None,
            target: None,
            pending_strikes: Vec::new(),
            next_threat_id: 1,
            next_decoy_id: 1,
            game_over: None,
        }
    }
}

impl MatchState {
    pub fn award(&mut self, reward: Reward) {
        self.score += reward.points;
        self.currency = self.currency.saturating_add(reward.currency);
    }

    pub fn take_threat_id(&mut self) -> u32 {
        let id = self.next_threat_id;
        self.next_threat_id = self.next_threat_id.wrapping_add(1).max(1);
        id
    }

    pub fn take_decoy_id(&mut self) -> u32 {
        let id = self.next_decoy_id;
        self.next_decoy_id = self.next_decoy_id.wrapping_add(1).max(1);
        id
    }

    pub fn is_stunned(&self) -> bool {
        self.stun_ticks > 0
    }

    /// Reset the one-shot flags on entering Between-Waves. The heavy
    /// interceptor stays loaded when a perk grants it every wave.
    pub fn reset_wave_flags(&mut self, keep_nuke: bool) {
        self.target = None;
        self.nuke_loaded = keep_nuke;
        self.scrambler_active = false;
        self.first_discount_used = false;
        self.pending_strikes.clear();
        self.stun_ticks = 0;
        self.stall_ticks = 0;
        self.fire_cooldown = 0;
    }

    /// Prestige earned for the match as it stands.
    pub fn prestige_reward(&self) -> u64 {
        self.score / PRESTIGE_SCORE_DIVISOR + self.wave as u64 * PRESTIGE_PER_WAVE
    }
}
