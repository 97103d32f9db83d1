//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! This system is read-only — it never modifies the world.

use hecs::World;

use bulwark_core::components::*;
use bulwark_core::enums::{DesignatorPhase, MatchPhase};
use bulwark_core::events::GameEvent;
use bulwark_core::state::*;
use bulwark_core::types::{Position, SimTime, Velocity};

use crate::match_state::MatchState;

/// Build a complete GameStateSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    state: &MatchState,
    structures: &[Structure],
    shop: Vec<ShopItemView>,
    events: Vec<GameEvent>,
) -> GameStateSnapshot {
    let boss = build_boss(world);

    GameStateSnapshot {
        time: *time,
        phase: state.phase,
        difficulty: state.difficulty,
        hud: HudView {
            wave: state.wave,
            score: state.score,
            currency: state.currency,
            paused: state.phase == MatchPhase::Paused,
            boss_health_fraction: boss
                .as_ref()
                .map(|b| (b.health / b.max_health.max(1.0)).clamp(0.0, 1.0)),
            queued_threats: state.plan.queue.len() as u32,
            stun_ticks: state.stun_ticks,
            nuke_loaded: state.nuke_loaded,
            scrambler_active: state.scrambler_active,
            target: state.target.map(|t| TargetView {
                kind: t.kind,
                position: t.position,
            }),
            structures_standing: structures.iter().filter(|s| !s.destroyed).count() as u32,
        },
        threats: build_threats(world),
        decoys: build_decoys(world),
        interceptors: build_interceptors(world),
        tracers: build_tracers(world),
        mines: build_mines(world),
        turrets: build_turrets(world),
        boss,
        structures: structures.to_vec(),
        shop,
        game_over: state.game_over.clone(),
        events,
    }
}

/// Threats sorted by id so the snapshot order is stable.
fn build_threats(world: &World) -> Vec<ThreatView> {
    let mut threats: Vec<ThreatView> = world
        .query::<(
            &Threat,
            &Position,
            &Velocity,
            Option<&Health>,
            Option<&Cloak>,
            Option<&Designation>,
        )>()
        .iter()
        .map(
            |(_, (threat, pos, vel, health, cloak, designation))| ThreatView {
                id: threat.id,
                kind: threat.kind,
                position: *pos,
                velocity: *vel,
                radius: threat.radius,
                visible: cloak.map_or(true, |c| c.visible),
                health: health.map(|h| h.current),
                hit_flash: health.is_some_and(|h| h.hit_flash > 0),
                designating: designation
                    .is_some_and(|d| d.phase == DesignatorPhase::Designating),
            },
        )
        .collect();
    threats.sort_by_key(|t| t.id);
    threats
}

fn build_decoys(world: &World) -> Vec<ProjectileView> {
    world
        .query::<(&Decoy, &Position)>()
        .iter()
        .map(|(_, (decoy, pos))| ProjectileView {
            position: *pos,
            radius: decoy.radius,
        })
        .collect()
}

fn build_tracers(world: &World) -> Vec<ProjectileView> {
    world
        .query::<(&Tracer, &Position)>()
        .iter()
        .map(|(_, (tracer, pos))| ProjectileView {
            position: *pos,
            radius: tracer.radius,
        })
        .collect()
}

fn build_interceptors(world: &World) -> Vec<InterceptorView> {
    world
        .query::<(&Interceptor, &Position, &Velocity)>()
        .iter()
        .map(|(_, (interceptor, pos, vel))| InterceptorView {
            position: *pos,
            velocity: *vel,
            tier: interceptor.tier,
            blast_radius: interceptor.blast_radius,
            homing: interceptor.homing,
        })
        .collect()
}

fn build_mines(world: &World) -> Vec<MineView> {
    world
        .query::<(&Mine, &Position)>()
        .iter()
        .map(|(_, (mine, pos))| MineView {
            position: *pos,
            armed: mine.arming == 0,
            launched: mine.launched,
        })
        .collect()
}

fn build_turrets(world: &World) -> Vec<TurretView> {
    let mut turrets: Vec<TurretView> = world
        .query::<(&Turret, &Position)>()
        .iter()
        .map(|(_, (turret, pos))| TurretView {
            position: *pos,
            aim_angle: turret.aim_angle,
            range: turret.range,
            state: turret.state,
        })
        .collect();
    turrets.sort_by(|a, b| a.position.x.total_cmp(&b.position.x));
    turrets
}

fn build_boss(world: &World) -> Option<BossView> {
    world
        .query::<(&Boss, &Position)>()
        .iter()
        .next()
        .map(|(_, (boss, pos))| BossView {
            position: *pos,
            health: boss.health,
            max_health: boss.max_health,
            radius: boss.radius,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulwark_core::enums::ThreatKind;
    use crate::world_setup;

    #[test]
    fn test_snapshot_reflects_world() {
        let mut world = World::new();
        world.spawn((
            Threat {
                id: 9,
                kind: ThreatKind::Stealth,
                radius: 6.0,
                age: 0,
                max_age: 100,
            },
            Position::new(100.0, 50.0),
            Velocity::new(0.0, 1.0),
            Cloak {
                visible: false,
                period: 30,
                timer: 0,
            },
        ));
        world.spawn((
            Boss {
                health: 20.0,
                max_health: 80.0,
                spawn_cooldown: 10,
                radius: 40.0,
                hit_flash: 0,
            },
            Position::new(400.0, 90.0),
            Velocity::new(1.5, 0.0),
        ));
        let mut structures = world_setup::build_structures(false);
        structures[0].destroyed = true;
        let state = MatchState {
            wave: 3,
            score: 120,
            ..Default::default()
        };

        let snap = build_snapshot(
            &world,
            &SimTime::default(),
            &state,
            &structures,
            Vec::new(),
            vec![GameEvent::ShopChanged],
        );

        assert_eq!(snap.threats.len(), 1);
        assert!(!snap.threats[0].visible);
        assert_eq!(snap.hud.boss_health_fraction, Some(0.25));
        assert_eq!(snap.hud.structures_standing, 5);
        assert_eq!(snap.hud.wave, 3);
        assert_eq!(snap.events, vec![GameEvent::ShopChanged]);
    }
}
