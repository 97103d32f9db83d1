//! Application state shared between the front thread and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use bulwark_core::commands::PlayerCommand;
use bulwark_core::state::GameStateSnapshot;

/// Commands sent from the input side to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    Player(PlayerCommand),
    /// Replace the match with a fresh one in the Start phase.
    Restart,
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Shared application state.
///
/// - `mpsc::Sender` sits behind a `Mutex` so the state can be shared by reference
/// - `Mutex<Option<...>>` for the sender, which does not exist before the loop starts
/// - `Arc<Mutex<...>>` for the latest snapshot (shared with the game loop thread)
pub struct AppState {
    /// `None` before the game loop is spawned.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Latest snapshot, updated by the game loop thread after each tick.
    pub latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, tx: mpsc::Sender<GameLoopCommand>) {
        if let Ok(mut slot) = self.command_tx.lock() {
            *slot = Some(tx);
        }
    }

    /// Forward a command to the game loop.
    pub fn send(&self, command: GameLoopCommand) -> Result<(), String> {
        let slot = self
            .command_tx
            .lock()
            .map_err(|_| "command channel lock poisoned".to_string())?;
        let tx = slot
            .as_ref()
            .ok_or_else(|| "game loop is not running".to_string())?;
        tx.send(command)
            .map_err(|_| "game loop has stopped".to_string())
    }

    /// Clone of the latest published snapshot.
    pub fn snapshot(&self) -> Option<GameStateSnapshot> {
        self.latest_snapshot.lock().ok().and_then(|s| s.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new();
        assert!(state.command_tx.lock().unwrap().is_none());
        assert!(state.snapshot().is_none());
    }

    #[test]
    fn test_send_requires_attached_loop() {
        let state = AppState::new();
        assert!(state.send(GameLoopCommand::Shutdown).is_err());

        let (tx, rx) = mpsc::channel();
        state.attach(tx);
        state
            .send(GameLoopCommand::Player(PlayerCommand::Pause))
            .unwrap();
        assert!(matches!(
            rx.try_recv(),
            Ok(GameLoopCommand::Player(PlayerCommand::Pause))
        ));

        drop(rx);
        assert!(state.send(GameLoopCommand::Shutdown).is_err());
    }
}
