//! Simulation engine — the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, the match state and the
//! seeded RNG, processes player commands, runs every system in a fixed
//! order and produces `GameStateSnapshot`s. Completely headless, which
//! keeps it deterministic and testable.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use bulwark_behavior::advance::TickContext;
use bulwark_core::commands::PlayerCommand;
use bulwark_core::components::{Boss, Decoy, Interceptor, Structure, Tracer};
use bulwark_core::config::GameConfig;
use bulwark_core::constants::*;
use bulwark_core::enums::{Difficulty, MatchPhase, PerkId};
use bulwark_core::events::{GameEvent, GameOverSummary};
use bulwark_core::profile::Profile;
use bulwark_core::state::GameStateSnapshot;
use bulwark_core::types::{Position, SimTime};

use crate::match_state::MatchState;
use crate::ports::{self, ProfileStore};
use crate::systems;
use crate::systems::match_flow::Outcome;
use crate::systems::targeting::{self, AcceptanceRadii};
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    pub game: GameConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            game: GameConfig::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    rng: ChaCha8Rng,
    config: GameConfig,
    state: MatchState,
    structures: Vec<Structure>,
    profile: Profile,
    store: Box<dyn ProfileStore>,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    events: Vec<GameEvent>,
}

impl SimulationEngine {
    /// Create a new engine. The profile is read from `store` once, here.
    pub fn new(config: SimConfig, store: Box<dyn ProfileStore>) -> Self {
        let profile = ports::load_profile_or_default(store.as_ref());
        Self {
            world: World::new(),
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config: config.game,
            state: MatchState::default(),
            structures: world_setup::build_structures(false),
            profile,
            store,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        if self.state.phase == MatchPhase::InWave {
            self.run_systems();
            self.time.advance();
        }

        let events = std::mem::take(&mut self.events);
        let shop = systems::shop::views(
            &self.world,
            &self.config.shop,
            &self.state,
            &self.structures,
        );
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            &self.state,
            &self.structures,
            shop,
            events,
        )
    }

    /// Throw the match away and return to the Start phase. The world is
    /// replaced wholesale so no stale entity handle survives.
    pub fn restart(&mut self) {
        self.world = World::new();
        self.time = SimTime::default();
        self.state = MatchState::default();
        self.structures = world_setup::build_structures(false);
        self.command_queue.clear();
        self.despawn_buffer.clear();
        self.events.clear();
        tracing::info!("match reset");
    }

    /// Get the current match phase.
    pub fn phase(&self) -> MatchPhase {
        self.state.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn structures(&self) -> &[Structure] {
        &self.structures
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Mutable world access (for tests that stage scenarios).
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[cfg(test)]
    pub fn state_mut(&mut self) -> &mut MatchState {
        &mut self.state
    }

    #[cfg(test)]
    pub fn structures_mut(&mut self) -> &mut [Structure] {
        &mut self.structures
    }

    /// Spawn a threat with an explicit kinematic state (for tests).
    #[cfg(test)]
    pub fn spawn_test_threat(
        &mut self,
        kind: bulwark_core::enums::ThreatKind,
        position: Position,
        velocity: bulwark_core::types::Velocity,
    ) -> Entity {
        let id = self.state.take_threat_id();
        world_setup::spawn_threat(&mut self.world, &mut self.rng, kind, position, velocity, id)
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command. Commands that make no sense in the
    /// current phase are ignored.
    fn handle_command(&mut self, command: PlayerCommand) {
        let phase = self.state.phase;
        match command {
            PlayerCommand::StartMatch { difficulty } if phase == MatchPhase::Start => {
                self.start_match(difficulty);
            }
            PlayerCommand::UnlockPerk { perk } if phase == MatchPhase::Start => {
                self.unlock_perk(perk);
            }
            PlayerCommand::NextWave if phase == MatchPhase::BetweenWaves => {
                self.begin_wave(self.state.wave + 1);
            }
            PlayerCommand::Pause if phase == MatchPhase::InWave => {
                self.state.phase = MatchPhase::Paused;
            }
            PlayerCommand::Resume if phase == MatchPhase::Paused => {
                self.state.phase = MatchPhase::InWave;
            }
            PlayerCommand::PointerMoved { x, y } => {
                let at = Position::new(x, y);
                self.state.pointer = Some(at);
                self.state.target = targeting::resolve(&self.world, at, AcceptanceRadii::MOUSE);
            }
            PlayerCommand::Fire if phase == MatchPhase::InWave => {
                if let Some(at) = self.state.pointer {
                    // The held target may have died or cloaked since it was resolved.
                    let target = self
                        .state
                        .target
                        .and_then(|held| targeting::revalidate(&self.world, held))
                        .or_else(|| targeting::resolve(&self.world, at, AcceptanceRadii::MOUSE));
                    systems::launcher::fire(
                        &mut self.world,
                        &mut self.state,
                        target,
                        at,
                        &mut self.events,
                    );
                }
            }
            PlayerCommand::Tap { x, y } if phase == MatchPhase::InWave => {
                let at = Position::new(x, y);
                let target = targeting::resolve(&self.world, at, AcceptanceRadii::TOUCH);
                systems::launcher::fire(
                    &mut self.world,
                    &mut self.state,
                    target,
                    at,
                    &mut self.events,
                );
            }
            PlayerCommand::Purchase { item } => {
                let result = if phase == MatchPhase::BetweenWaves {
                    systems::shop::purchase(
                        &mut self.world,
                        &mut self.rng,
                        &self.config.shop,
                        &mut self.state,
                        &mut self.structures,
                        item,
                        &mut self.events,
                    )
                } else {
                    Err("shop is closed".to_string())
                };
                if let Err(reason) = result {
                    tracing::debug!(?item, %reason, "purchase rejected");
                    self.events.push(GameEvent::PurchaseRejected { item, reason });
                }
            }
            other => {
                tracing::debug!(command = ?other, ?phase, "command ignored in this phase");
            }
        }
    }

    fn start_match(&mut self, difficulty: Difficulty) {
        let settings = self.config.difficulty.get(difficulty);
        let profile = &self.profile;
        let has = |perk| profile.has_perk(perk);
        let reinforced = has(PerkId::ReinforcedStructures);
        let auto_turret = has(PerkId::AutoTurret);

        let mut state = MatchState {
            difficulty,
            settings,
            currency: settings.starting_currency,
            nuke_loaded: has(PerkId::StartingNuke),
            pointer: self.state.pointer,
            ..Default::default()
        };
        if has(PerkId::WarChest) {
            state.currency += WAR_CHEST_CURRENCY;
        }
        if has(PerkId::CriticalStrikes) {
            state.crit_chance += PERK_CRIT_BONUS;
        }

        self.world = World::new();
        self.time = SimTime::default();
        self.structures = world_setup::build_structures(reinforced);
        if auto_turret {
            world_setup::spawn_turret(
                &mut self.world,
                TURRET_SLOTS[0],
                state.upgrades.turret_range(),
            );
        }
        self.state = state;

        tracing::info!(?difficulty, currency = self.state.currency, "match started");
        self.events.push(GameEvent::MatchStarted { difficulty });
        self.begin_wave(1);
    }

    fn unlock_perk(&mut self, perk: PerkId) {
        match self.profile.unlock_perk(perk, &self.config.perks) {
            Ok(()) => {
                tracing::info!(?perk, prestige = self.profile.prestige, "perk unlocked");
                self.persist_profile();
                self.events.push(GameEvent::PerkUnlocked { perk });
            }
            Err(e) => tracing::debug!(?perk, error = %e, "perk unlock rejected"),
        }
    }

    fn begin_wave(&mut self, wave: u32) {
        let plan = systems::wave_director::plan_wave(
            wave,
            &self.config.waves,
            &self.state.settings,
            &mut self.rng,
        );
        let boss = plan.boss;

        self.state.wave = wave;
        // First spawn lands on the first in-wave tick.
        self.state.spawn_timer = plan.delay;
        self.state.plan = plan;
        self.state.boss_defeated = false;
        self.state.stall_ticks = 0;
        self.state.phase = MatchPhase::InWave;

        if boss {
            let entity = world_setup::spawn_boss(&mut self.world, &mut self.rng, wave);
            let health = self
                .world
                .get::<&Boss>(entity)
                .map(|b| b.max_health)
                .unwrap_or_default();
            self.events.push(GameEvent::BossSpawned { health });
        }

        tracing::info!(
            wave,
            boss,
            queued = self.state.plan.queue.len(),
            delay = self.state.plan.delay,
            "wave started"
        );
        self.events.push(GameEvent::WaveStarted { wave, boss });
    }

    /// Run all gameplay systems in order.
    fn run_systems(&mut self) {
        let ctx = TickContext::default();

        // 1. Timers
        self.state.fire_cooldown = self.state.fire_cooldown.saturating_sub(1);
        let stunned = self.state.is_stunned();

        // 2. Wave Director
        if !stunned {
            systems::wave_director::run(
                &mut self.world,
                &mut self.rng,
                &mut self.state,
                &self.structures,
            );
        }

        // 3. Behavior
        let arrivals = systems::behavior::run(
            &mut self.world,
            &mut self.rng,
            &mut self.state,
            &mut self.events,
            &ctx,
            &mut self.despawn_buffer,
        );

        // 4. Targeting
        targeting::run(&self.world, &mut self.state);

        // 5. Collision
        systems::collision::run(
            &mut self.world,
            &mut self.rng,
            &mut self.state,
            &mut self.structures,
            &self.config.points,
            &arrivals,
            &mut self.events,
        );

        // 6. Turrets
        if !stunned {
            systems::turret::run(&mut self.world, &mut self.rng, &self.state, &mut self.events);
        }

        // A stun armed this tick starts counting next tick.
        if stunned {
            self.state.stun_ticks = self.state.stun_ticks.saturating_sub(1);
        }

        // 7. Match state
        match systems::match_flow::evaluate(&mut self.world, &mut self.state, &self.structures) {
            Outcome::Continue => {}
            Outcome::WaveCleared { forced } => self.enter_between_waves(forced),
            Outcome::GameOver => self.enter_game_over(),
        }
    }

    fn enter_between_waves(&mut self, forced: bool) {
        let transient: Vec<Entity> = self
            .world
            .query::<&Decoy>()
            .iter()
            .map(|(e, _)| e)
            .chain(self.world.query::<&Interceptor>().iter().map(|(e, _)| e))
            .chain(self.world.query::<&Tracer>().iter().map(|(e, _)| e))
            .collect();
        for entity in transient {
            let _ = self.world.despawn(entity);
        }

        self.state
            .reset_wave_flags(self.profile.has_perk(PerkId::StartingNuke));
        self.state.phase = MatchPhase::BetweenWaves;

        tracing::info!(
            wave = self.state.wave,
            forced,
            score = self.state.score,
            currency = self.state.currency,
            "wave cleared"
        );
        self.events.push(GameEvent::WaveCleared {
            wave: self.state.wave,
            forced,
        });
        self.events.push(GameEvent::ShopChanged);
    }

    fn enter_game_over(&mut self) {
        let difficulty = self.state.difficulty;
        let score = self.state.score;
        let reward = self.state.prestige_reward();

        self.profile.prestige += reward;
        let new_high_score = self.profile.record_score(difficulty, score);
        self.persist_profile();

        let summary = GameOverSummary {
            score,
            wave: self.state.wave,
            difficulty,
            prestige_earned: reward,
            new_high_score,
            high_score: self.profile.high_score(difficulty),
        };
        tracing::info!(
            score,
            wave = self.state.wave,
            prestige = reward,
            new_high_score,
            "game over"
        );
        self.state.phase = MatchPhase::GameOver;
        self.state.game_over = Some(summary.clone());
        self.events.push(GameEvent::GameOver { summary });
    }

    fn persist_profile(&mut self) {
        if let Err(e) = ports::save_profile(self.store.as_mut(), &self.profile) {
            tracing::warn!(error = %e, "failed to save profile");
        }
    }
}
