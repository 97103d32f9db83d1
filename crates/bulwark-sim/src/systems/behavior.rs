//! Behavior orchestration: advances every live entity by one tick and
//! applies the signals bodies raise (splits, decoys, strikes, drones).
//!
//! Bodies never touch shared collections; all spawning and despawning
//! triggered by behavior happens here, after the query borrow ends.

use std::collections::HashMap;

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use bulwark_behavior::advance::*;
use bulwark_behavior::offspring::split_offspring;
use bulwark_core::components::*;
use bulwark_core::constants::*;
use bulwark_core::events::GameEvent;
use bulwark_core::types::{Position, Velocity};

use crate::match_state::{MatchState, PendingStrike};
use crate::world_setup;

/// Projectiles that finished their flight this tick and must be resolved
/// by the collision pass.
#[derive(Debug, Default)]
pub struct Arrivals {
    /// Unguided interceptors sitting on their aim point.
    pub interceptors: Vec<Entity>,
    /// Launched mines at their travel bound.
    pub mines: Vec<Entity>,
}

pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    state: &mut MatchState,
    events: &mut Vec<GameEvent>,
    ctx: &TickContext,
    despawn_buffer: &mut Vec<Entity>,
) -> Arrivals {
    if !state.is_stunned() {
        advance_threats(world, rng, state, events, ctx);
        advance_boss(world, rng, state, ctx);
    }
    advance_decoys(world, ctx, despawn_buffer);
    advance_tracers(world, ctx, despawn_buffer);
    let interceptors = advance_interceptors(world, state, events, ctx, despawn_buffer);
    let mines = advance_mines(world, events, ctx);

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }

    Arrivals {
        interceptors,
        mines,
    }
}

struct Raised {
    entity: Entity,
    threat: Threat,
    position: Position,
    velocity: Velocity,
    signal: BehaviorSignal,
}

fn advance_threats(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    state: &mut MatchState,
    events: &mut Vec<GameEvent>,
    ctx: &TickContext,
) {
    let mut raised = Vec::new();
    for (entity, (threat, position, velocity, health, cloak, split, emitter, designation)) in world
        .query_mut::<(
            &mut Threat,
            &mut Position,
            &mut Velocity,
            Option<&mut Health>,
            Option<&mut Cloak>,
            Option<&mut SplitCharge>,
            Option<&mut DecoyEmitter>,
            Option<&mut Designation>,
        )>()
    {
        let mut body = ThreatBody {
            threat,
            position,
            velocity,
            health,
            cloak,
            split,
            emitter,
            designation,
        };
        let signal = body.advance(ctx);
        if signal != BehaviorSignal::Idle {
            raised.push(Raised {
                entity,
                threat: body.threat.clone(),
                position: *body.position,
                velocity: *body.velocity,
                signal,
            });
        }
    }

    for r in raised {
        match r.signal {
            BehaviorSignal::Idle => {}
            BehaviorSignal::Split => {
                let _ = world.despawn(r.entity);
                let offspring = split_offspring(r.threat.kind, r.position, r.velocity, rng);
                for child in &offspring {
                    let id = state.take_threat_id();
                    world_setup::spawn_offspring(world, rng, child, id);
                }
                tracing::debug!(id = r.threat.id, kind = ?r.threat.kind, count = offspring.len(), "threat split");
                events.push(GameEvent::ThreatSplit {
                    id: r.threat.id,
                    kind: r.threat.kind,
                    offspring: offspring.len() as u32,
                });
            }
            BehaviorSignal::EmitDecoy => {
                let id = state.take_decoy_id();
                world_setup::spawn_decoy(world, rng, r.position, id);
                events.push(GameEvent::DecoyReleased {
                    x: r.position.x,
                    y: r.position.y,
                });
            }
            BehaviorSignal::DesignationStarted { structure } => {
                events.push(GameEvent::DesignationStarted { structure });
            }
            BehaviorSignal::Strike { structure } => {
                let _ = world.despawn(r.entity);
                state.pending_strikes.push(PendingStrike {
                    structure,
                    ticks_left: STRIKE_DELAY_TICKS,
                });
                tracing::debug!(structure, "designation complete, strike incoming");
                events.push(GameEvent::StrikeIncoming { structure });
            }
        }
    }
}

fn advance_boss(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    state: &mut MatchState,
    ctx: &TickContext,
) {
    let mut drops = Vec::new();
    for (_entity, (boss, position, velocity)) in
        world.query_mut::<(&mut Boss, &mut Position, &mut Velocity)>()
    {
        let mut body = BossBody {
            boss,
            position,
            velocity,
        };
        if body.advance(ctx) == BossSignal::SpawnDrone {
            drops.push(*body.position);
        }
    }
    for at in drops {
        let id = state.take_threat_id();
        world_setup::spawn_boss_drone(world, rng, at, state.plan.speed_multiplier, id);
    }
}

fn advance_decoys(world: &mut World, ctx: &TickContext, despawn_buffer: &mut Vec<Entity>) {
    for (entity, (decoy, position, velocity)) in
        world.query_mut::<(&mut Decoy, &mut Position, &mut Velocity)>()
    {
        let mut body = DecoyBody {
            decoy,
            position,
            velocity,
        };
        if body.advance(ctx) == Lifespan::Expired {
            despawn_buffer.push(entity);
        }
    }
}

fn advance_tracers(world: &mut World, ctx: &TickContext, despawn_buffer: &mut Vec<Entity>) {
    for (entity, (tracer, position, velocity)) in
        world.query_mut::<(&mut Tracer, &mut Position, &Velocity)>()
    {
        let mut body = TracerBody {
            tracer,
            position,
            velocity,
        };
        if body.advance(ctx) == Lifespan::Expired {
            despawn_buffer.push(entity);
        }
    }
}

/// Revalidated guidance input for one homing interceptor.
struct Homing {
    target: Option<Entity>,
    target_position: Option<Position>,
    lured: bool,
}

fn advance_interceptors(
    world: &mut World,
    state: &MatchState,
    events: &mut Vec<GameEvent>,
    ctx: &TickContext,
    despawn_buffer: &mut Vec<Entity>,
) -> Vec<Entity> {
    let decoys: Vec<(Entity, Position)> = world
        .query::<(&Decoy, &Position)>()
        .iter()
        .map(|(e, (_, pos))| (e, *pos))
        .collect();

    let mut homing: HashMap<Entity, Homing> = HashMap::new();
    for (entity, (interceptor, pos)) in world.query::<(&Interceptor, &Position)>().iter() {
        if !interceptor.homing {
            continue;
        }
        let mut target = interceptor.target;
        let mut lured = false;

        if !state.scrambler_active && !interceptor.retargeted {
            let lure = decoys
                .iter()
                .filter(|(_, d)| d.distance_to(pos) <= DECOY_LURE_RADIUS)
                .min_by(|a, b| a.1.distance_sq_to(pos).total_cmp(&b.1.distance_sq_to(pos)));
            if let Some((decoy, _)) = lure {
                if target != Some(*decoy) {
                    target = Some(*decoy);
                    lured = true;
                }
            }
        }

        let target_position = target.and_then(|t| world.get::<&Position>(t).ok().map(|p| *p));
        homing.insert(
            entity,
            Homing {
                target: target_position.and(target),
                target_position,
                lured,
            },
        );
    }

    let mut arrived = Vec::new();
    for (entity, (interceptor, position, velocity)) in
        world.query_mut::<(&mut Interceptor, &mut Position, &mut Velocity)>()
    {
        let mut target_position = None;
        if let Some(h) = homing.get(&entity) {
            interceptor.target = h.target;
            target_position = h.target_position;
            if h.lured {
                interceptor.retargeted = true;
                events.push(GameEvent::InterceptorLured);
            }
        }

        let mut body = InterceptorBody {
            interceptor,
            position,
            velocity,
            target_position,
        };
        match body.advance(ctx) {
            InterceptorSignal::Flying => {}
            InterceptorSignal::ReachedAim => arrived.push(entity),
            InterceptorSignal::Expired => despawn_buffer.push(entity),
        }
    }
    arrived
}

fn advance_mines(world: &mut World, events: &mut Vec<GameEvent>, ctx: &TickContext) -> Vec<Entity> {
    let mut bursts = Vec::new();
    for (entity, (mine, position)) in world.query_mut::<(&mut Mine, &mut Position)>() {
        let mut body = MineBody { mine, position };
        match body.advance(ctx) {
            MineSignal::Idle => {}
            MineSignal::Armed => events.push(GameEvent::MineArmed { x: body.position.x }),
            MineSignal::TravelBound => bursts.push(entity),
        }
    }
    bursts
}
