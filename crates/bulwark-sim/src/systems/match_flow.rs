//! End-of-tick match evaluation: game over, stall failsafe, wave clear.

use hecs::{Entity, World};

use bulwark_core::components::{Boss, Structure, Threat};

use crate::match_state::MatchState;
use crate::systems::wave_director;

/// What the engine should do after this tick's gameplay systems ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    WaveCleared { forced: bool },
    GameOver,
}

pub fn evaluate(world: &mut World, state: &mut MatchState, structures: &[Structure]) -> Outcome {
    if !structures.is_empty() && structures.iter().all(|s| s.destroyed) {
        return Outcome::GameOver;
    }

    if wave_director::stalled(state) {
        tracing::warn!(
            wave = state.wave,
            queued = state.plan.queue.len(),
            "wave stalled, forcing clear"
        );
        force_clear(world, state);
        return Outcome::WaveCleared { forced: true };
    }

    if wave_director::wave_complete(world, state) {
        return Outcome::WaveCleared { forced: false };
    }
    Outcome::Continue
}

/// Drop everything still pending in the wave.
fn force_clear(world: &mut World, state: &mut MatchState) {
    state.plan.queue.clear();
    state.stall_ticks = 0;
    let doomed: Vec<Entity> = world
        .query::<&Threat>()
        .iter()
        .map(|(e, _)| e)
        .chain(world.query::<&Boss>().iter().map(|(e, _)| e))
        .collect();
    for entity in doomed {
        let _ = world.despawn(entity);
    }
}
