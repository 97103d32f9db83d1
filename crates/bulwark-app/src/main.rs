use std::io::BufRead;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use bulwark_app::autopilot::Autopilot;
use bulwark_app::cli::{self, Options};
use bulwark_app::game_loop::{self, HeadlessReport};
use bulwark_app::state::{AppState, GameLoopCommand};
use bulwark_app::storage::{self, FileProfileStore};
use bulwark_core::commands::PlayerCommand;
use bulwark_core::config::GameConfig;
use bulwark_core::enums::MatchPhase;
use bulwark_sim::{SimConfig, SimulationEngine};
use tracing::{error, info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> ExitCode {
    init_tracing();

    let options = match cli::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{e}");
            eprintln!(
                "usage: bulwark [--manual] [--headless-ticks N] [--seed N] \
                 [--difficulty easy|normal|hard] [--profile PATH] [--config PATH]"
            );
            return ExitCode::from(2);
        }
    };

    match run(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(options: Options) -> Result<(), String> {
    let game = match &options.config_path {
        Some(path) => storage::load_game_config(path)?,
        None => GameConfig::default(),
    };
    let config = SimConfig {
        seed: options.seed,
        game,
    };
    let store = Box::new(FileProfileStore::new(&options.profile_path));
    let pilot = options.autopilot.then(|| Autopilot::new(options.difficulty));

    info!(
        seed = options.seed,
        difficulty = ?options.difficulty,
        autopilot = options.autopilot,
        profile = %options.profile_path.display(),
        "bulwark starting"
    );

    match options.headless_ticks {
        Some(ticks) => {
            let mut engine = SimulationEngine::new(config, store);
            let mut pilot = pilot;
            let report = game_loop::run_headless(&mut engine, pilot.as_mut(), ticks);
            print_report(&report)
        }
        None => run_realtime(config, store, pilot),
    }
}

fn run_realtime(
    config: SimConfig,
    store: Box<FileProfileStore>,
    pilot: Option<Autopilot>,
) -> Result<(), String> {
    let state = AppState::new();
    let watching = pilot.is_some();
    let (tx, handle) =
        game_loop::spawn_game_loop(config, store, Arc::clone(&state.latest_snapshot), pilot)?;
    state.attach(tx);

    if watching {
        watch_until_game_over(&state);
    } else {
        forward_stdin(&state)?;
    }

    // The loop may already be gone if stdin asked it to quit.
    let _ = state.send(GameLoopCommand::Shutdown);
    handle
        .join()
        .map_err(|_| "game loop thread panicked".to_string())
}

/// Log wave progress until the autopilot's match ends.
fn watch_until_game_over(state: &AppState) {
    let mut last_wave = 0;
    loop {
        std::thread::sleep(POLL_INTERVAL);
        let Some(snapshot) = state.snapshot() else {
            continue;
        };
        if snapshot.hud.wave != last_wave {
            last_wave = snapshot.hud.wave;
            info!(
                wave = last_wave,
                score = snapshot.hud.score,
                standing = snapshot.hud.structures_standing,
                "wave reached"
            );
        }
        if snapshot.phase == MatchPhase::GameOver {
            if let Some(summary) = snapshot.game_over {
                info!(
                    score = summary.score,
                    wave = summary.wave,
                    prestige = summary.prestige_earned,
                    high_score = summary.high_score,
                    "match over"
                );
            }
            return;
        }
    }
}

/// One JSON player command per line, plus `restart` and `quit`.
/// Each accepted line is answered with the current HUD as JSON.
fn forward_stdin(state: &AppState) -> Result<(), String> {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.map_err(|e| format!("Failed to read stdin: {e}"))?;
        let line = line.trim();
        let command = match line {
            "" => continue,
            "quit" => return Ok(()),
            "restart" => GameLoopCommand::Restart,
            json => match serde_json::from_str::<PlayerCommand>(json) {
                Ok(cmd) => GameLoopCommand::Player(cmd),
                Err(e) => {
                    warn!("ignoring input: {e}");
                    continue;
                }
            },
        };
        state.send(command)?;

        std::thread::sleep(game_loop::TICK_DURATION * 2);
        if let Some(snapshot) = state.snapshot() {
            let hud = serde_json::to_string(&snapshot.hud)
                .map_err(|e| format!("Failed to serialize HUD: {e}"))?;
            println!("{hud}");
        }
    }
    Ok(())
}

fn print_report(report: &HeadlessReport) -> Result<(), String> {
    let summary = serde_json::json!({
        "ticks": report.ticks,
        "phase": report.last.phase,
        "wave": report.last.hud.wave,
        "score": report.last.hud.score,
        "waves_cleared": report.waves_cleared,
        "interceptors_launched": report.interceptors_launched,
        "threats_destroyed": report.threats_destroyed,
        "game_over": report.last.game_over,
    });
    let text = serde_json::to_string_pretty(&summary)
        .map_err(|e| format!("Failed to serialize report: {e}"))?;
    println!("{text}");
    Ok(())
}
