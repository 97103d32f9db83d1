//! Game loop thread — runs the simulation engine at 60Hz and publishes snapshots.
//!
//! The engine is created inside this thread because it's cleaner for ownership.
//! Commands arrive via `mpsc` channel. Snapshots are stored in shared state
//! for polling by the front end.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use bulwark_core::constants::TICK_RATE;
use bulwark_core::enums::MatchPhase;
use bulwark_core::events::GameEvent;
use bulwark_core::state::GameStateSnapshot;
use bulwark_sim::{ProfileStore, SimConfig, SimulationEngine};

use crate::autopilot::Autopilot;
use crate::state::GameLoopCommand;

/// Nominal duration of one tick.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle. With an autopilot the
/// loop feeds itself commands from every snapshot it produces.
pub fn spawn_game_loop(
    config: SimConfig,
    store: Box<dyn ProfileStore>,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
    autopilot: Option<Autopilot>,
) -> Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<()>), String> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("bulwark-game-loop".into())
        .spawn(move || {
            let engine = SimulationEngine::new(config, store);
            run_game_loop(engine, cmd_rx, &latest_snapshot, autopilot);
        })
        .map_err(|e| format!("Failed to spawn game loop thread: {e}"))?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    mut engine: SimulationEngine,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
    mut autopilot: Option<Autopilot>,
) {
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Player(cmd)) => engine.queue_command(cmd),
                Ok(GameLoopCommand::Restart) => engine.restart(),
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    tracing::info!(tick = engine.time().tick, "game loop stopped");
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one tick (engine handles pause semantics internally)
        let snapshot = engine.tick();

        // 3. Let the autopilot react to what it sees
        if let Some(pilot) = autopilot.as_mut() {
            engine.queue_commands(pilot.commands(&snapshot));
        }

        // 4. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 5. Sleep until next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind — reset to avoid catch-up spiral
            next_tick_time = now;
        }
    }
}

/// Totals from a headless run.
#[derive(Debug, Clone)]
pub struct HeadlessReport {
    pub ticks: u64,
    pub interceptors_launched: u64,
    pub threats_destroyed: u64,
    pub waves_cleared: u32,
    pub last: GameStateSnapshot,
}

/// Tick as fast as possible, stopping early at game over.
pub fn run_headless(
    engine: &mut SimulationEngine,
    mut autopilot: Option<&mut Autopilot>,
    max_ticks: u64,
) -> HeadlessReport {
    let mut report = HeadlessReport {
        ticks: 0,
        interceptors_launched: 0,
        threats_destroyed: 0,
        waves_cleared: 0,
        last: GameStateSnapshot::default(),
    };

    while report.ticks < max_ticks {
        let snapshot = engine.tick();
        report.ticks += 1;
        for event in &snapshot.events {
            match event {
                GameEvent::InterceptorLaunched { .. } => report.interceptors_launched += 1,
                GameEvent::ThreatDestroyed { .. } => report.threats_destroyed += 1,
                GameEvent::WaveCleared { .. } => report.waves_cleared += 1,
                _ => {}
            }
        }
        if let Some(pilot) = autopilot.as_deref_mut() {
            engine.queue_commands(pilot.commands(&snapshot));
        }
        let over = snapshot.phase == MatchPhase::GameOver;
        report.last = snapshot;
        if over {
            break;
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulwark_core::commands::PlayerCommand;
    use bulwark_core::enums::Difficulty;
    use bulwark_sim::MemoryProfileStore;

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();

        tx.send(GameLoopCommand::Player(PlayerCommand::StartMatch {
            difficulty: Difficulty::Easy,
        }))
        .unwrap();
        tx.send(GameLoopCommand::Player(PlayerCommand::Pause))
            .unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let commands: Vec<_> = rx.try_iter().collect();
        assert_eq!(commands.len(), 3);
        assert!(matches!(
            commands[0],
            GameLoopCommand::Player(PlayerCommand::StartMatch { .. })
        ));
        assert!(matches!(
            commands[1],
            GameLoopCommand::Player(PlayerCommand::Pause)
        ));
        assert!(matches!(commands[2], GameLoopCommand::Shutdown));
    }

    #[test]
    fn test_tick_duration_constant() {
        // 60Hz = 16.666ms per tick
        let expected_nanos = 1_000_000_000u64 / 60;
        assert_eq!(TICK_DURATION.as_nanos(), expected_nanos as u128);
    }

    #[test]
    fn test_headless_autopilot_plays() {
        let mut engine = SimulationEngine::new(
            SimConfig::default(),
            Box::new(MemoryProfileStore::new()),
        );
        let mut pilot = Autopilot::new(Difficulty::Normal);
        let report = run_headless(&mut engine, Some(&mut pilot), 300);

        assert!(report.ticks > 0 && report.ticks <= 300);
        assert!(report.interceptors_launched > 0);
        assert_ne!(report.last.phase, MatchPhase::Start);
    }

    #[test]
    fn test_headless_without_pilot_stays_idle() {
        let mut engine = SimulationEngine::new(
            SimConfig::default(),
            Box::new(MemoryProfileStore::new()),
        );
        let report = run_headless(&mut engine, None, 20);
        assert_eq!(report.ticks, 20);
        assert_eq!(report.last.phase, MatchPhase::Start);
        assert_eq!(report.last.time.tick, 0);
    }

    #[test]
    fn test_spawned_loop_publishes_and_stops() {
        let latest = Arc::new(Mutex::new(None));
        let (tx, handle) = spawn_game_loop(
            SimConfig::default(),
            Box::new(MemoryProfileStore::new()),
            Arc::clone(&latest),
            None,
        )
        .unwrap();

        tx.send(GameLoopCommand::Player(PlayerCommand::StartMatch {
            difficulty: Difficulty::Normal,
        }))
        .unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut phase = None;
        while Instant::now() < deadline {
            phase = latest.lock().unwrap().as_ref().map(|s| s.phase);
            if phase == Some(MatchPhase::InWave) {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(phase, Some(MatchPhase::InWave));

        tx.send(GameLoopCommand::Shutdown).unwrap();
        handle.join().unwrap();
    }
}
