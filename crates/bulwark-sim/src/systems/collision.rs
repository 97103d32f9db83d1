//! Collision Resolver: all projectile, threat and structure interactions
//! for one tick, in fixed priority order.
//!
//! Everything is resolved against a snapshot taken at the start of the
//! pass. Removals are marked first and compacted at the end, so an entity
//! removed earlier in the pass is never hit or scored again.

use std::collections::HashSet;

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use bulwark_core::components::*;
use bulwark_core::config::PointsTable;
use bulwark_core::constants::*;
use bulwark_core::enums::{InterceptorTier, ThreatKind};
use bulwark_core::events::GameEvent;
use bulwark_core::types::Position;

use crate::match_state::MatchState;
use crate::systems::behavior::Arrivals;

#[derive(Debug, Clone, Copy)]
struct ThreatInfo {
    entity: Entity,
    id: u32,
    kind: ThreatKind,
    position: Position,
    radius: f64,
    multi_hit: bool,
    expired: bool,
}

#[derive(Debug, Clone, Copy)]
struct BossInfo {
    entity: Entity,
    position: Position,
    radius: f64,
}

/// Marked-for-removal set with a stable despawn order.
#[derive(Default)]
struct Removals {
    order: Vec<Entity>,
    seen: HashSet<Entity>,
}

impl Removals {
    fn mark(&mut self, entity: Entity) -> bool {
        if self.seen.insert(entity) {
            self.order.push(entity);
            true
        } else {
            false
        }
    }

    fn contains(&self, entity: Entity) -> bool {
        self.seen.contains(&entity)
    }
}

struct Resolver<'a> {
    world: &'a mut World,
    rng: &'a mut ChaCha8Rng,
    state: &'a mut MatchState,
    points: &'a PointsTable,
    events: &'a mut Vec<GameEvent>,
    removed: Removals,
}

pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    state: &mut MatchState,
    structures: &mut [Structure],
    points: &PointsTable,
    arrivals: &Arrivals,
    events: &mut Vec<GameEvent>,
) {
    state.kills_this_tick = 0;

    let threats = gather_threats(world);
    let decoys: Vec<(Entity, Position, f64)> = world
        .query::<(&Decoy, &Position)>()
        .iter()
        .map(|(e, (d, pos))| (e, *pos, d.radius))
        .collect();
    let boss = world
        .query::<(&Boss, &Position)>()
        .iter()
        .next()
        .map(|(entity, (b, pos))| BossInfo {
            entity,
            position: *pos,
            radius: b.radius,
        });

    let mut resolver = Resolver {
        world,
        rng,
        state,
        points,
        events,
        removed: Removals::default(),
    };

    resolver.interceptors(&threats, &decoys, boss, arrivals);
    resolver.tracers(&threats, boss);
    resolver.mines(&threats, arrivals);
    resolver.structure_impacts(&threats, structures);
    resolver.pending_strikes(structures);
    resolver.boundaries(&threats);

    let Resolver { world, removed, .. } = resolver;
    for entity in removed.order {
        let _ = world.despawn(entity);
    }
}

fn gather_threats(world: &World) -> Vec<ThreatInfo> {
    world
        .query::<(&Threat, &Position, Option<&Health>)>()
        .iter()
        .map(|(entity, (threat, pos, health))| ThreatInfo {
            entity,
            id: threat.id,
            kind: threat.kind,
            position: *pos,
            radius: threat.radius,
            multi_hit: health.is_some(),
            expired: threat.age >= threat.max_age,
        })
        .collect()
}

/// Apply one impact to a structure and report it.
pub fn hit_structure(
    structures: &mut [Structure],
    index: usize,
    rubble: u8,
    events: &mut Vec<GameEvent>,
) -> StructureHit {
    let Some(structure) = structures.get_mut(index) else {
        return StructureHit::NoEffect;
    };
    let outcome = structure.take_hit(rubble);
    match outcome {
        StructureHit::ArmorAbsorbed => {
            events.push(GameEvent::StructureArmorLost { structure: index });
        }
        StructureHit::Destroyed => {
            tracing::info!(structure = index, "structure destroyed");
            events.push(GameEvent::StructureDestroyed { structure: index });
        }
        StructureHit::NoEffect => {}
    }
    outcome
}

impl Resolver<'_> {
    fn live<'s>(&'s self, threats: &'s [ThreatInfo]) -> impl Iterator<Item = &'s ThreatInfo> + 's {
        threats
            .iter()
            .filter(move |t| !self.removed.contains(t.entity))
    }

    fn roll_crit(&mut self) -> bool {
        self.rng.gen_bool(self.state.crit_chance.clamp(0.0, 1.0))
    }

    /// Remove and score a threat. Returns false if it was already gone.
    fn destroy_threat(&mut self, threat: &ThreatInfo) -> bool {
        if !self.removed.mark(threat.entity) {
            return false;
        }
        let reward = self.points.reward(threat.kind);
        self.state.award(reward);
        self.state.kills_this_tick += 1;
        self.events.push(GameEvent::ThreatDestroyed {
            id: threat.id,
            kind: threat.kind,
            points: reward.points,
            x: threat.position.x,
            y: threat.position.y,
        });
        true
    }

    /// Damage a threat; single-hit threats die to any damage.
    fn damage_threat(&mut self, threat: &ThreatInfo, amount: f64) -> bool {
        if self.removed.contains(threat.entity) {
            return false;
        }
        if threat.multi_hit {
            let remaining = match self.world.get::<&mut Health>(threat.entity) {
                Ok(mut health) => {
                    health.current -= amount;
                    health.hit_flash = HIT_FLASH_TICKS;
                    health.current
                }
                Err(_) => 0.0,
            };
            if remaining > 0.0 {
                self.events.push(GameEvent::ThreatDamaged {
                    id: threat.id,
                    remaining,
                });
                return false;
            }
        }
        self.destroy_threat(threat)
    }

    fn damage_boss(&mut self, boss: &BossInfo, amount: f64, critical: bool) {
        if self.removed.contains(boss.entity) {
            return;
        }
        let remaining = match self.world.get::<&mut Boss>(boss.entity) {
            Ok(mut b) => {
                b.health -= amount;
                b.hit_flash = HIT_FLASH_TICKS;
                b.health
            }
            Err(_) => return,
        };
        if remaining > 0.0 {
            self.events.push(GameEvent::BossDamaged {
                remaining,
                critical,
            });
            return;
        }
        self.removed.mark(boss.entity);
        self.state.boss_defeated = true;
        self.state.award(self.points.boss);
        self.state.kills_this_tick += 1;
        tracing::info!(points = self.points.boss.points, "boss defeated");
        self.events.push(GameEvent::BossDefeated {
            points: self.points.boss.points,
        });
    }

    fn detonate(&mut self, entity: Entity, at: Position, interceptor: &Interceptor) {
        self.removed.mark(entity);
        self.events.push(GameEvent::InterceptorDetonated {
            x: at.x,
            y: at.y,
            radius: interceptor.blast_radius,
            tier: interceptor.tier,
        });
        if interceptor.tier == InterceptorTier::Heavy {
            self.state.stun_ticks = STUN_TICKS;
            tracing::debug!(ticks = STUN_TICKS, "heavy detonation stun");
            self.events.push(GameEvent::Stunned { ticks: STUN_TICKS });
        }
    }

    fn interceptors(
        &mut self,
        threats: &[ThreatInfo],
        decoys: &[(Entity, Position, f64)],
        boss: Option<BossInfo>,
        arrivals: &Arrivals,
    ) {
        let interceptors: Vec<(Entity, Position, Interceptor)> = self
            .world
            .query::<(&Interceptor, &Position)>()
            .iter()
            .map(|(e, (i, pos))| (e, *pos, i.clone()))
            .collect();

        for (entity, pos, interceptor) in interceptors {
            let base = match interceptor.tier {
                InterceptorTier::Standard => STANDARD_DAMAGE,
                InterceptorTier::Heavy => HEAVY_DAMAGE,
            };

            if let Some(boss) = boss.filter(|b| !self.removed.contains(b.entity)) {
                if pos.distance_to(&boss.position) <= boss.radius {
                    let critical = self.roll_crit();
                    let damage = if critical { base * CRIT_MULTIPLIER } else { base };
                    self.damage_boss(&boss, damage, critical);
                    self.detonate(entity, pos, &interceptor);
                    continue;
                }
            }

            let decoy = decoys
                .iter()
                .filter(|(d, dpos, r)| {
                    !self.removed.contains(*d)
                        && pos.distance_to(dpos) <= interceptor.blast_radius + r
                })
                .min_by(|a, b| pos.distance_sq_to(&a.1).total_cmp(&pos.distance_sq_to(&b.1)))
                .map(|(d, _, _)| *d);
            if let Some(decoy) = decoy {
                self.removed.mark(decoy);
                self.detonate(entity, pos, &interceptor);
                continue;
            }

            let hits: Vec<ThreatInfo> = self
                .live(threats)
                .filter(|t| pos.distance_to(&t.position) <= interceptor.blast_radius + t.radius)
                .copied()
                .collect();
            if !hits.is_empty() {
                let critical = self.roll_crit();
                let damage = if critical { base * CRIT_MULTIPLIER } else { base };
                for threat in &hits {
                    self.damage_threat(threat, damage);
                }
                self.detonate(entity, pos, &interceptor);
                continue;
            }

            if arrivals.interceptors.contains(&entity) {
                self.detonate(entity, pos, &interceptor);
            }
        }
    }

    fn tracers(&mut self, threats: &[ThreatInfo], boss: Option<BossInfo>) {
        let tracers: Vec<(Entity, Position, f64)> = self
            .world
            .query::<(&Tracer, &Position)>()
            .iter()
            .map(|(e, (t, pos))| (e, *pos, t.radius))
            .collect();

        for (entity, pos, radius) in tracers {
            if let Some(boss) = boss.filter(|b| !self.removed.contains(b.entity)) {
                if pos.distance_to(&boss.position) <= boss.radius + radius {
                    self.damage_boss(&boss, TRACER_BOSS_DAMAGE, false);
                    self.removed.mark(entity);
                    continue;
                }
            }

            let hit = self
                .live(threats)
                .filter(|t| pos.distance_to(&t.position) <= radius + t.radius)
                .min_by(|a, b| {
                    pos.distance_sq_to(&a.position)
                        .total_cmp(&pos.distance_sq_to(&b.position))
                })
                .copied();
            if let Some(threat) = hit {
                let damage = if threat.multi_hit {
                    TRACER_ARMORED_DAMAGE
                } else {
                    TRACER_DAMAGE
                };
                self.damage_threat(&threat, damage);
                self.removed.mark(entity);
            }
        }
    }

    fn mines(&mut self, threats: &[ThreatInfo], arrivals: &Arrivals) {
        let mines: Vec<(Entity, Position, Mine)> = self
            .world
            .query::<(&Mine, &Position)>()
            .iter()
            .map(|(e, (m, pos))| (e, *pos, m.clone()))
            .collect();

        for (entity, pos, mine) in mines {
            if mine.arming > 0 {
                continue;
            }

            if !mine.launched {
                let trigger = self
                    .live(threats)
                    .filter(|t| pos.distance_to(&t.position) <= mine.trigger_range)
                    .min_by(|a, b| {
                        pos.distance_sq_to(&a.position)
                            .total_cmp(&pos.distance_sq_to(&b.position))
                    })
                    .map(|t| t.entity);
                if let Some(target) = trigger {
                    if let Ok(mut m) = self.world.get::<&mut Mine>(entity) {
                        m.launched = true;
                        m.target = Some(target);
                    }
                    tracing::debug!(x = pos.x, "mine launched");
                    self.events.push(GameEvent::MineLaunched { x: pos.x });
                }
                continue;
            }

            let reached = mine
                .target
                .and_then(|t| self.live(threats).find(|info| info.entity == t).copied())
                .map_or(false, |t| pos.y <= t.position.y + t.radius);
            if reached || arrivals.mines.contains(&entity) {
                self.detonate_mine(entity, pos, threats);
            }
        }
    }

    fn detonate_mine(&mut self, entity: Entity, at: Position, threats: &[ThreatInfo]) {
        let caught: Vec<ThreatInfo> = self
            .live(threats)
            .filter(|t| at.distance_to(&t.position) <= MINE_DETONATION_RADIUS)
            .copied()
            .collect();
        let mut kills = 0;
        for threat in &caught {
            if self.destroy_threat(threat) {
                kills += 1;
            }
        }
        self.removed.mark(entity);
        self.events.push(GameEvent::MineDetonated {
            x: at.x,
            y: at.y,
            kills,
        });
    }

    fn structure_impacts(&mut self, threats: &[ThreatInfo], structures: &mut [Structure]) {
        let falling: Vec<ThreatInfo> = self
            .live(threats)
            .filter(|t| t.kind != ThreatKind::Designator)
            .copied()
            .collect();

        for threat in falling {
            let p = threat.position;
            let impact = structures
                .iter()
                .enumerate()
                .filter(|(_, s)| !s.destroyed && s.contains(p.x, p.y, threat.radius))
                .min_by(|a, b| (a.1.x - p.x).abs().total_cmp(&(b.1.x - p.x).abs()))
                .map(|(i, _)| i);
            if let Some(index) = impact {
                let rubble = self.rng.gen_range(0..4);
                hit_structure(structures, index, rubble, self.events);
                self.removed.mark(threat.entity);
            }
        }
    }

    fn pending_strikes(&mut self, structures: &mut [Structure]) {
        for strike in &mut self.state.pending_strikes {
            strike.ticks_left = strike.ticks_left.saturating_sub(1);
        }
        let (landed, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.state.pending_strikes)
            .into_iter()
            .partition(|s| s.ticks_left == 0);
        self.state.pending_strikes = waiting;

        for strike in landed {
            let rubble = self.rng.gen_range(0..4);
            hit_structure(structures, strike.structure, rubble, self.events);
        }
    }

    fn boundaries(&mut self, threats: &[ThreatInfo]) {
        let gone: Vec<Entity> = self
            .live(threats)
            .filter(|t| {
                t.expired
                    || t.position.y >= GROUND_Y
                    || t.position.x < -t.radius
                    || t.position.x > FIELD_WIDTH + t.radius
            })
            .map(|t| t.entity)
            .collect();
        for entity in gone {
            self.removed.mark(entity);
        }
    }
}
