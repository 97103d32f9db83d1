//! Turret Controller: Scanning, Target-Acquired and Firing.
//!
//! A turret only engages visible threats that are in range and strictly
//! above it. Each burst spends a fixed tracer budget, after which the
//! turret cools down and goes back to scanning.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use bulwark_behavior::guidance;
use bulwark_core::components::{Cloak, Threat, Turret};
use bulwark_core::constants::*;
use bulwark_core::enums::{ThreatKind, TurretState};
use bulwark_core::events::GameEvent;
use bulwark_core::types::{Position, Velocity};

use crate::match_state::MatchState;
use crate::world_setup;

/// A threat as the turret sees it this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sighting {
    pub entity: Entity,
    pub kind: ThreatKind,
    pub position: Position,
    pub velocity: Velocity,
    pub visible: bool,
}

/// Ticks between bursts for a fire-rate level.
pub fn burst_cooldown(level: u32, turret_multiplier: f64) -> u32 {
    let ticks = TURRET_BASE_COOLDOWN * TURRET_COOLDOWN_FACTOR.powi(level as i32)
        / turret_multiplier.max(MIN_MULTIPLIER);
    (ticks.round() as u32).max(TURRET_MIN_COOLDOWN)
}

fn engageable(turret: &Position, range: f64, s: &Sighting) -> bool {
    s.visible && s.position.y < turret.y && turret.distance_to(&s.position) <= range
}

/// Highest-priority engageable threat: high-threat kinds first, highest
/// on the field among those; otherwise the nearest.
pub fn select_target(turret: &Position, range: f64, sightings: &[Sighting]) -> Option<Sighting> {
    let eligible = sightings.iter().filter(|s| engageable(turret, range, s));

    let priority = eligible
        .clone()
        .filter(|s| s.kind.is_high_threat())
        .min_by(|a, b| a.position.y.total_cmp(&b.position.y));
    if priority.is_some() {
        return priority.copied();
    }

    eligible
        .min_by(|a, b| {
            turret
                .distance_sq_to(&a.position)
                .total_cmp(&turret.distance_sq_to(&b.position))
        })
        .copied()
}

pub fn sightings(world: &World) -> Vec<Sighting> {
    world
        .query::<(&Threat, &Position, &Velocity, Option<&Cloak>)>()
        .iter()
        .map(|(entity, (threat, pos, vel, cloak))| Sighting {
            entity,
            kind: threat.kind,
            position: *pos,
            velocity: *vel,
            visible: cloak.map_or(true, |c| c.visible),
        })
        .collect()
}

pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    state: &MatchState,
    events: &mut Vec<GameEvent>,
) {
    let seen = sightings(world);
    let cooldown = burst_cooldown(
        state.upgrades.turret_fire_rate,
        state.settings.turret_multiplier,
    );
    let mut shots: Vec<(Position, f64)> = Vec::new();

    for (_entity, (turret, pos)) in world.query_mut::<(&mut Turret, &Position)>() {
        turret.cooldown = turret.cooldown.saturating_sub(1);
        turret.reacquire = turret.reacquire.saturating_sub(1);
        turret.burst_timer = turret.burst_timer.saturating_sub(1);

        // Revalidate the held target; anything not confirmed this tick is dropped.
        let held = turret.target.and_then(|t| {
            seen.iter()
                .find(|s| s.entity == t && engageable(pos, turret.range, s))
                .copied()
        });
        if held.is_none() && turret.state != TurretState::Scanning {
            turret.target = None;
            turret.state = TurretState::Scanning;
            turret.burst_left = 0;
        }

        match turret.state {
            TurretState::Scanning => {
                turret.aim_angle = guidance::wrap_angle(turret.aim_angle + TURRET_SWEEP_RATE);
                if turret.reacquire == 0 {
                    if let Some(s) = select_target(pos, turret.range, &seen) {
                        turret.target = Some(s.entity);
                        turret.state = TurretState::TargetAcquired;
                        turret.reacquire = TURRET_REACQUIRE_TICKS;
                        turret.aim_angle = pos.angle_to(&s.position);
                    }
                }
            }
            TurretState::TargetAcquired => {
                if let Some(s) = held {
                    turret.aim_angle = pos.angle_to(&s.position);
                }
                if turret.cooldown == 0 {
                    turret.state = TurretState::Firing;
                    turret.burst_left = TURRET_BURST;
                    turret.burst_timer = 0;
                }
            }
            TurretState::Firing => {}
        }

        if turret.state == TurretState::Firing && turret.burst_timer == 0 {
            if let Some(s) = held {
                let (aim, _tti) = guidance::lead_point(pos, &s.position, &s.velocity, TRACER_SPEED);
                let angle = pos.angle_to(&aim)
                    + rng.gen_range(-TURRET_INACCURACY..=TURRET_INACCURACY);
                turret.aim_angle = angle;
                shots.push((*pos, angle));
                turret.burst_left = turret.burst_left.saturating_sub(1);
                turret.burst_timer = TURRET_BURST_CADENCE;
            }
            if turret.burst_left == 0 {
                turret.cooldown = cooldown;
                turret.reacquire = TURRET_REACQUIRE_TICKS;
                turret.state = TurretState::Scanning;
                turret.target = None;
            }
        }
    }

    for (from, angle) in shots {
        world_setup::spawn_tracer(world, from, angle);
        events.push(GameEvent::TurretFired {
            x: from.x,
            y: from.y,
            angle,
        });
    }
}
