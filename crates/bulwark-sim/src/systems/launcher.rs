//! Player launcher: turns Fire and Tap actions into interceptor volleys.

use hecs::World;

use bulwark_behavior::guidance;
use bulwark_core::constants::*;
use bulwark_core::enums::InterceptorTier;
use bulwark_core::events::GameEvent;
use bulwark_core::types::Position;

use crate::match_state::MatchState;
use crate::systems::targeting::Candidate;
use crate::world_setup::{self, Launch};

/// Fire at `target` if there is one, else unguided at `aim`.
///
/// A loaded nuke is consumed as a single heavy interceptor; otherwise the
/// volley size follows the multishot level. Returns the number launched.
pub fn fire(
    world: &mut World,
    state: &mut MatchState,
    target: Option<Candidate>,
    aim: Position,
    events: &mut Vec<GameEvent>,
) -> u32 {
    if state.fire_cooldown > 0 {
        return 0;
    }

    let launcher = Position::new(LAUNCHER_X, LAUNCHER_Y);
    let aim = target.map(|t| t.position).unwrap_or(aim);
    let center = launcher.angle_to(&aim);
    let range = launcher.distance_to(&aim);
    let speed = state.upgrades.interceptor_speed();

    let (tier, count, blast_radius) = if state.nuke_loaded {
        state.nuke_loaded = false;
        (InterceptorTier::Heavy, 1, HEAVY_BLAST_RADIUS)
    } else {
        (
            InterceptorTier::Standard,
            state.upgrades.volley(),
            state.upgrades.blast_radius(),
        )
    };

    let headings = guidance::fan(center, count, MULTISHOT_SPREAD);
    for heading in &headings {
        let offset = Position::new(
            launcher.x + heading.cos() * range,
            launcher.y + heading.sin() * range,
        );
        world_setup::spawn_interceptor(
            world,
            Launch {
                heading: *heading,
                aim: offset,
                target: target.map(|t| t.entity),
                speed,
                blast_radius,
                tier,
            },
        );
        events.push(GameEvent::InterceptorLaunched {
            tier,
            homing: target.is_some(),
        });
    }

    state.fire_cooldown = FIRE_COOLDOWN_TICKS;
    headings.len() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulwark_core::components::Interceptor;
    use bulwark_core::enums::UpgradeKind;

    #[test]
    fn test_multishot_volley() {
        let mut world = World::new();
        let mut state = MatchState::default();
        state.upgrades.raise(UpgradeKind::Multishot);
        state.upgrades.raise(UpgradeKind::Multishot);
        let mut events = Vec::new();
        let n = fire(
            &mut world,
            &mut state,
            None,
            Position::new(400.0, 200.0),
            &mut events,
        );
        assert_eq!(n, 3);
        assert_eq!(world.query::<&Interceptor>().iter().count(), 3);
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_cooldown_blocks_second_shot() {
        let mut world = World::new();
        let mut state = MatchState::default();
        let mut events = Vec::new();
        let aim = Position::new(300.0, 200.0);
        assert_eq!(fire(&mut world, &mut state, None, aim, &mut events), 1);
        assert_eq!(fire(&mut world, &mut state, None, aim, &mut events), 0);
    }

    #[test]
    fn test_nuke_consumed_as_single_heavy() {
        let mut world = World::new();
        let mut state = MatchState {
            nuke_loaded: true,
            ..Default::default()
        };
        state.upgrades.raise(UpgradeKind::Multishot);
        let mut events = Vec::new();
        fire(
            &mut world,
            &mut state,
            None,
            Position::new(400.0, 200.0),
            &mut events,
        );
        assert!(!state.nuke_loaded);
        let tiers: Vec<_> = world
            .query::<&Interceptor>()
            .iter()
            .map(|(_, i)| (i.tier, i.blast_radius))
            .collect();
        assert_eq!(tiers, vec![(InterceptorTier::Heavy, HEAVY_BLAST_RADIUS)]);
    }
}
