//! Entity spawn factories for setting up the simulation world.
//!
//! Creates structures, threats (with the capability components their
//! variant profile selects), the boss, and every projectile kind.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use bulwark_behavior::guidance;
use bulwark_behavior::offspring::Offspring;
use bulwark_behavior::profiles::get_profile;
use bulwark_core::components::*;
use bulwark_core::constants::*;
use bulwark_core::enums::*;
use bulwark_core::types::{Position, Velocity};

/// The row of defended structures, left to right.
pub fn build_structures(reinforced: bool) -> Vec<Structure> {
    STRUCTURE_XS
        .iter()
        .map(|&x| Structure {
            x,
            y: GROUND_Y - STRUCTURE_HEIGHT,
            width: STRUCTURE_WIDTH,
            height: STRUCTURE_HEIGHT,
            destroyed: false,
            armored: reinforced,
            rubble: 0,
        })
        .collect()
}

/// Spawn a wave threat at the top of the field.
///
/// Ordinary threats head for a random point on the ground; designators
/// head for the hover point above a random standing structure.
pub fn spawn_wave_threat(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    structures: &[Structure],
    kind: ThreatKind,
    speed_multiplier: f64,
    id: u32,
) -> Entity {
    let profile = get_profile(kind);
    let speed = THREAT_BASE_SPEED * speed_multiplier * profile.speed_factor;
    let start = Position::new(
        rng.gen_range(SPAWN_MARGIN..FIELD_WIDTH - SPAWN_MARGIN),
        0.0,
    );

    if profile.designates {
        if let Some(designation) = pick_designation(rng, structures) {
            let hover = Position::new(designation.hover.0, designation.hover.1);
            let velocity = guidance::pursue(&start, &hover, speed);
            let entity = spawn_threat(world, rng, kind, start, velocity, id);
            let _ = world.insert_one(entity, designation);
            return entity;
        }
    }

    let aim = Position::new(rng.gen_range(0.0..FIELD_WIDTH), GROUND_Y);
    let velocity = guidance::pursue(&start, &aim, speed);
    spawn_threat(world, rng, kind, start, velocity, id)
}

/// Choose a random standing structure and a hover height above it.
fn pick_designation(rng: &mut ChaCha8Rng, structures: &[Structure]) -> Option<Designation> {
    let standing: Vec<usize> = structures
        .iter()
        .enumerate()
        .filter(|(_, s)| !s.destroyed)
        .map(|(i, _)| i)
        .collect();
    if standing.is_empty() {
        return None;
    }
    let index = standing[rng.gen_range(0..standing.len())];
    let hover_y = rng.gen_range(DESIGNATOR_HOVER_BAND.0..DESIGNATOR_HOVER_BAND.1) * GROUND_Y;
    Some(Designation {
        structure: index,
        hover: (structures[index].x, hover_y),
        phase: DesignatorPhase::Approach,
        timer: 0,
    })
}

/// Spawn a threat with the capability components its profile selects.
/// Designation is attached by the caller, since it needs the structures.
pub fn spawn_threat(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    kind: ThreatKind,
    position: Position,
    velocity: Velocity,
    id: u32,
) -> Entity {
    let profile = get_profile(kind);
    let entity = world.spawn((
        Threat {
            id,
            kind,
            radius: profile.radius,
            age: 0,
            max_age: profile.max_age,
        },
        position,
        velocity,
    ));

    if let Some(max) = profile.health {
        let _ = world.insert_one(
            entity,
            Health {
                current: max,
                max,
                hit_flash: 0,
            },
        );
    }
    if profile.cloaks {
        let _ = world.insert_one(
            entity,
            Cloak {
                visible: true,
                period: rng.gen_range(CLOAK_PERIOD_MIN..=CLOAK_PERIOD_MAX),
                timer: 0,
            },
        );
    }
    if let Some((low, high)) = profile.split_band {
        let _ = world.insert_one(
            entity,
            SplitCharge {
                split_y: rng.gen_range(low..high) * GROUND_Y,
                spent: false,
            },
        );
    }
    if let Some(interval) = profile.decoy_interval {
        let _ = world.insert_one(entity, DecoyEmitter { interval, timer: 0 });
    }
    entity
}

/// Spawn a split offspring in place.
pub fn spawn_offspring(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    offspring: &Offspring,
    id: u32,
) -> Entity {
    spawn_threat(
        world,
        rng,
        offspring.kind,
        offspring.position,
        offspring.velocity,
        id,
    )
}

/// Spawn a drone dropped by the boss, angled down within a narrow fan.
pub fn spawn_boss_drone(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    boss_position: Position,
    speed_multiplier: f64,
    id: u32,
) -> Entity {
    let speed = THREAT_BASE_SPEED * speed_multiplier * get_profile(ThreatKind::Drone).speed_factor;
    let angle = std::f64::consts::FRAC_PI_2
        + rng.gen_range(-SWARM_FAN_HALF_ANGLE..=SWARM_FAN_HALF_ANGLE);
    let start = Position::new(boss_position.x, boss_position.y + BOSS_RADIUS);
    spawn_threat(
        world,
        rng,
        ThreatKind::Drone,
        start,
        Velocity::from_angle(angle, speed),
        id,
    )
}

pub fn spawn_boss(world: &mut World, rng: &mut ChaCha8Rng, wave: u32) -> Entity {
    let health = BOSS_BASE_HEALTH + BOSS_HEALTH_PER_WAVE * wave as f64;
    let direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    world.spawn((
        Boss {
            health,
            max_health: health,
            spawn_cooldown: BOSS_SPAWN_INTERVAL,
            radius: BOSS_RADIUS,
            hit_flash: 0,
        },
        Position::new(FIELD_WIDTH / 2.0, BOSS_Y),
        Velocity::new(BOSS_SPEED * direction, 0.0),
    ))
}

pub fn spawn_decoy(world: &mut World, rng: &mut ChaCha8Rng, at: Position, id: u32) -> Entity {
    let angle = rng.gen_range(0.0..std::f64::consts::TAU);
    world.spawn((
        Decoy {
            id,
            radius: DECOY_RADIUS,
            life: DECOY_LIFE_TICKS,
        },
        at,
        Velocity::from_angle(angle, DECOY_DRIFT),
    ))
}

/// Parameters for one interceptor leaving the launcher.
#[derive(Debug, Clone, Copy)]
pub struct Launch {
    pub heading: f64,
    pub aim: Position,
    pub target: Option<Entity>,
    pub speed: f64,
    pub blast_radius: f64,
    pub tier: InterceptorTier,
}

pub fn spawn_interceptor(world: &mut World, launch: Launch) -> Entity {
    world.spawn((
        Interceptor {
            target: launch.target,
            aim: (launch.aim.x, launch.aim.y),
            blast_radius: launch.blast_radius,
            speed: launch.speed,
            tier: launch.tier,
            homing: launch.target.is_some(),
            retargeted: false,
            life: INTERCEPTOR_LIFE_TICKS,
        },
        Position::new(LAUNCHER_X, LAUNCHER_Y),
        Velocity::from_angle(launch.heading, launch.speed),
    ))
}

pub fn spawn_tracer(world: &mut World, from: Position, angle: f64) -> Entity {
    world.spawn((
        Tracer {
            radius: TRACER_RADIUS,
            life: TRACER_LIFE_TICKS,
        },
        from,
        Velocity::from_angle(angle, TRACER_SPEED),
    ))
}

pub fn spawn_mine(world: &mut World, x: f64) -> Entity {
    world.spawn((
        Mine {
            arming: MINE_ARMING_TICKS,
            launched: false,
            target: None,
            trigger_range: MINE_TRIGGER_RANGE,
            origin_y: GROUND_Y,
        },
        Position::new(x, GROUND_Y),
    ))
}

pub fn spawn_turret(world: &mut World, slot: (f64, f64), range: f64) -> Entity {
    world.spawn((
        Turret {
            range,
            cooldown: 0,
            aim_angle: -std::f64::consts::FRAC_PI_2,
            state: TurretState::Scanning,
            target: None,
            reacquire: 0,
            burst_left: 0,
            burst_timer: 0,
        },
        Position::new(slot.0, slot.1),
    ))
}

/// First turret slot with no turret on it.
pub fn free_turret_slot(world: &World) -> Option<(f64, f64)> {
    let occupied: Vec<Position> = world
        .query::<(&Turret, &Position)>()
        .iter()
        .map(|(_, (_, pos))| *pos)
        .collect();
    TURRET_SLOTS.iter().copied().find(|&(x, y)| {
        !occupied
            .iter()
            .any(|p| p.distance_to(&Position::new(x, y)) < 1.0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_structures_rest_on_ground() {
        let structures = build_structures(false);
        assert_eq!(structures.len(), STRUCTURE_XS.len());
        for s in &structures {
            assert!((s.y + s.height - GROUND_Y).abs() < 1e-9);
            assert!(!s.armored && !s.destroyed);
        }
        assert!(build_structures(true).iter().all(|s| s.armored));
    }

    #[test]
    fn test_variant_components_attached() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let structures = build_structures(false);

        let armored =
            spawn_wave_threat(&mut world, &mut rng, &structures, ThreatKind::Armored, 1.0, 1);
        let stealth =
            spawn_wave_threat(&mut world, &mut rng, &structures, ThreatKind::Stealth, 1.0, 2);
        let mirv = spawn_wave_threat(&mut world, &mut rng, &structures, ThreatKind::Mirv, 1.0, 3);
        let designator =
            spawn_wave_threat(&mut world, &mut rng, &structures, ThreatKind::Designator, 1.0, 4);

        assert_eq!(world.get::<&Health>(armored).unwrap().current, ARMORED_HEALTH);
        let period = world.get::<&Cloak>(stealth).unwrap().period;
        assert!((CLOAK_PERIOD_MIN..=CLOAK_PERIOD_MAX).contains(&period));
        let split_y = world.get::<&SplitCharge>(mirv).unwrap().split_y;
        assert!(split_y >= MIRV_SPLIT_BAND.0 * GROUND_Y && split_y < MIRV_SPLIT_BAND.1 * GROUND_Y);
        let designation = *world.get::<&Designation>(designator).unwrap();
        assert_eq!(designation.hover.0, structures[designation.structure].x);
        assert!(world.get::<&Health>(mirv).is_err());
    }

    #[test]
    fn test_designator_never_picks_destroyed_structure() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut structures = build_structures(false);
        for s in structures.iter_mut().take(5) {
            s.destroyed = true;
        }
        for id in 0..20 {
            let e = spawn_wave_threat(
                &mut world,
                &mut rng,
                &structures,
                ThreatKind::Designator,
                1.0,
                id,
            );
            assert_eq!(world.get::<&Designation>(e).unwrap().structure, 5);
        }
    }

    #[test]
    fn test_wave_threat_heads_down() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let structures = build_structures(false);
        let e = spawn_wave_threat(&mut world, &mut rng, &structures, ThreatKind::Standard, 1.5, 1);
        let vel = *world.get::<&Velocity>(e).unwrap();
        assert!(vel.y > 0.0);
        assert!((vel.speed() - THREAT_BASE_SPEED * 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_turret_slots_fill_in_order() {
        let mut world = World::new();
        assert_eq!(free_turret_slot(&world), Some(TURRET_SLOTS[0]));
        spawn_turret(&mut world, TURRET_SLOTS[0], TURRET_BASE_RANGE);
        assert_eq!(free_turret_slot(&world), Some(TURRET_SLOTS[1]));
        spawn_turret(&mut world, TURRET_SLOTS[1], TURRET_BASE_RANGE);
        assert_eq!(free_turret_slot(&world), None);
    }
}
