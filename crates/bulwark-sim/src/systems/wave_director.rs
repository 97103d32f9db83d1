//! Wave Director: composition, pacing, spawning and completion.

use std::collections::VecDeque;

use hecs::World;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use bulwark_core::components::{Boss, Structure, Threat};
use bulwark_core::config::{DifficultySettings, WaveTable};
use bulwark_core::constants::*;
use bulwark_core::enums::ThreatKind;

use crate::match_state::MatchState;
use crate::world_setup;

/// Share of a procedural wave that is always standard threats.
const PROCEDURAL_STANDARD_SHARE: f64 = 0.4;

/// Everything the director needs to run one wave.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WavePlan {
    /// Pending threat tags, spawned front first.
    pub queue: VecDeque<ThreatKind>,
    /// Ticks between spawns, already scaled and clamped.
    pub delay: f64,
    pub speed_multiplier: f64,
    pub boss: bool,
}

pub fn difficulty_scale(wave: u32) -> f64 {
    1.0 + wave.saturating_sub(DIFFICULTY_RAMP_START) as f64 * DIFFICULTY_RAMP_PER_WAVE
}

pub fn spawn_delay(base_delay: f64, settings: &DifficultySettings, wave: u32) -> f64 {
    let settings = settings.clamped();
    (base_delay * settings.delay_multiplier / difficulty_scale(wave)).max(MIN_SPAWN_DELAY)
}

pub fn speed_multiplier(wave: u32, settings: &DifficultySettings) -> f64 {
    let settings = settings.clamped();
    (1.0 + wave as f64 * WAVE_SPEED_PER_INDEX) * difficulty_scale(wave) * settings.speed_bonus
}

/// Index within the procedural sequence, or `None` inside the table.
fn procedural_index(wave: u32, table: &WaveTable) -> Option<u32> {
    wave.checked_sub(table.len()).filter(|&p| p > 0)
}

pub fn is_boss_wave(wave: u32, table: &WaveTable) -> bool {
    match procedural_index(wave, table) {
        Some(p) => p % 5 == 0,
        None => table.get(wave).map(|w| w.boss).unwrap_or(false),
    }
}

/// Variants eligible for the non-standard share of a procedural wave.
pub fn unlocked_pool(wave: u32) -> Vec<ThreatKind> {
    let mut pool = vec![ThreatKind::Standard, ThreatKind::Mirv];
    let unlocks = [
        (6, ThreatKind::Designator),
        (8, ThreatKind::Stealth),
        (10, ThreatKind::Swarmer),
        (12, ThreatKind::Armored),
        (14, ThreatKind::DecoyDeployer),
    ];
    pool.extend(
        unlocks
            .iter()
            .filter(|(after, _)| wave > *after)
            .map(|(_, kind)| *kind),
    );
    pool
}

/// Composition and base delay for a wave. Boss waves have no composition.
pub fn compose(
    wave: u32,
    table: &WaveTable,
    settings: &DifficultySettings,
    rng: &mut ChaCha8Rng,
) -> (Vec<ThreatKind>, f64) {
    if is_boss_wave(wave, table) {
        let base = table.get(wave).map(|w| w.base_delay).unwrap_or(60.0);
        return (Vec::new(), base);
    }

    let (mut kinds, base_delay) = match table.get(wave) {
        Some(def) => {
            let kinds = def
                .threats
                .iter()
                .flat_map(|&(kind, count)| std::iter::repeat(kind).take(count as usize))
                .collect::<Vec<_>>();
            (kinds, def.base_delay)
        }
        None => {
            let index = wave as f64;
            let count = ((8.0 + 1.5 * index) * settings.clamped().size_multiplier).round() as usize;
            let standard = (count as f64 * PROCEDURAL_STANDARD_SHARE).round() as usize;
            let pool = unlocked_pool(wave);
            let mut kinds = vec![ThreatKind::Standard; standard.min(count)];
            for _ in kinds.len()..count {
                kinds.push(pool[rng.gen_range(0..pool.len())]);
            }
            let base_delay = (60.0 - wave.saturating_sub(table.len()) as f64).max(30.0);
            (kinds, base_delay)
        }
    };

    kinds.shuffle(rng);
    (kinds, base_delay)
}

pub fn plan_wave(
    wave: u32,
    table: &WaveTable,
    settings: &DifficultySettings,
    rng: &mut ChaCha8Rng,
) -> WavePlan {
    let (kinds, base_delay) = compose(wave, table, settings, rng);
    WavePlan {
        queue: kinds.into(),
        delay: spawn_delay(base_delay, settings, wave),
        speed_multiplier: speed_multiplier(wave, settings),
        boss: is_boss_wave(wave, table),
    }
}

/// Advance the pacing timer and spawn at most one queued threat.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    state: &mut MatchState,
    structures: &[Structure],
) {
    if state.plan.queue.is_empty() {
        return;
    }
    state.spawn_timer += 1.0;
    if state.spawn_timer <= state.plan.delay {
        return;
    }
    if let Some(kind) = state.plan.queue.pop_front() {
        let id = state.take_threat_id();
        world_setup::spawn_wave_threat(
            world,
            rng,
            structures,
            kind,
            state.plan.speed_multiplier,
            id,
        );
    }
    state.spawn_timer = 0.0;
}

pub fn live_threats(world: &World) -> usize {
    world.query::<&Threat>().iter().count()
}

pub fn boss_alive(world: &World) -> bool {
    world.query::<&Boss>().iter().next().is_some()
}

/// Whether the active wave is finished. A strike still in the air keeps
/// the wave open.
pub fn wave_complete(world: &World, state: &MatchState) -> bool {
    let cleared = live_threats(world) == 0 && state.pending_strikes.is_empty();
    if state.plan.boss {
        state.boss_defeated && !boss_alive(world) && cleared
    } else {
        state.plan.queue.is_empty() && cleared
    }
}

/// Update the stall counter. Returns true once the failsafe should fire.
pub fn stalled(state: &mut MatchState) -> bool {
    if state.plan.queue.is_empty() || state.kills_this_tick > 0 {
        state.stall_ticks = 0;
        return false;
    }
    if !state.is_stunned() {
        state.stall_ticks += 1;
    }
    state.stall_ticks > STALL_BUDGET_TICKS
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulwark_core::config::DifficultyTable;
    use bulwark_core::enums::Difficulty;
    use rand::SeedableRng;

    fn normal() -> DifficultySettings {
        DifficultyTable::default().get(Difficulty::Normal)
    }

    #[test]
    fn test_difficulty_scale_ramps_after_five() {
        assert_eq!(difficulty_scale(1), 1.0);
        assert_eq!(difficulty_scale(5), 1.0);
        assert!((difficulty_scale(7) - 1.3).abs() < 1e-9);
    }

    #[test]
    fn test_spawn_delay_formula() {
        let hard = DifficultyTable::default().get(Difficulty::Hard);
        let delay = spawn_delay(90.0, &hard, 7);
        assert!((delay - 90.0 * 0.8 / 1.3).abs() < 1e-9);
    }

    #[test]
    fn test_spawn_delay_clamped() {
        let settings = DifficultySettings {
            delay_multiplier: 0.0,
            ..normal()
        };
        assert_eq!(spawn_delay(90.0, &settings, 50), MIN_SPAWN_DELAY);
    }

    #[test]
    fn test_speed_multiplier_formula() {
        let easy = DifficultyTable::default().get(Difficulty::Easy);
        let m = speed_multiplier(8, &easy);
        assert!((m - 1.4 * 1.45 * 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_table_wave_composition() {
        let table = WaveTable::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let plan = plan_wave(3, &table, &normal(), &mut rng);
        assert_eq!(plan.queue.len(), 10);
        assert_eq!(plan.queue.iter().filter(|k| **k == ThreatKind::Mirv).count(), 2);
        assert!(!plan.boss);
        assert_eq!(plan.delay, 80.0);
    }

    #[test]
    fn test_procedural_boss_every_fifth() {
        let table = WaveTable::default();
        assert!(!is_boss_wave(10, &table));
        assert!(!is_boss_wave(14, &table));
        assert!(is_boss_wave(15, &table));
        assert!(is_boss_wave(20, &table));
        assert!(!is_boss_wave(21, &table));

        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let plan = plan_wave(15, &table, &normal(), &mut rng);
        assert!(plan.boss);
        assert!(plan.queue.is_empty());
    }

    #[test]
    fn test_procedural_count_and_pool() {
        let table = WaveTable::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let plan = plan_wave(11, &table, &normal(), &mut rng);
        assert_eq!(plan.queue.len(), 25); // round(8 + 16.5)
        let pool = unlocked_pool(11);
        assert!(plan.queue.iter().all(|k| pool.contains(k)));
        assert!(!pool.contains(&ThreatKind::Armored));
        assert!(unlocked_pool(13).contains(&ThreatKind::Armored));
        let standard = plan
            .queue
            .iter()
            .filter(|k| **k == ThreatKind::Standard)
            .count();
        assert!(standard >= 10);
    }

    #[test]
    fn test_procedural_base_delay_floor() {
        let table = WaveTable::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let (_, base) = compose(12, &table, &normal(), &mut rng);
        assert_eq!(base, 58.0);
        let (_, base) = compose(61, &table, &normal(), &mut rng);
        assert_eq!(base, 30.0);
    }

    #[test]
    fn test_stall_counter_needs_queue_and_no_kills() {
        let mut state = MatchState::default();
        state.plan.queue.push_back(ThreatKind::Standard);
        for _ in 0..STALL_BUDGET_TICKS {
            assert!(!stalled(&mut state));
        }
        assert!(stalled(&mut state));

        state.kills_this_tick = 1;
        assert!(!stalled(&mut state));
        assert_eq!(state.stall_ticks, 0);
    }
}
