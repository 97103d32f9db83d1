//! Targeting Resolver: nearest eligible entity around a pointer or tap.

use hecs::{Entity, World};

use bulwark_core::components::{Boss, Cloak, Decoy, Threat};
use bulwark_core::constants::*;
use bulwark_core::enums::TargetKind;
use bulwark_core::types::Position;

use crate::match_state::MatchState;

/// A targetable entity as seen this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub entity: Entity,
    pub kind: TargetKind,
    pub position: Position,
}

/// Per-type acceptance radii for one input style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcceptanceRadii {
    pub standard: f64,
    pub boss: f64,
}

impl AcceptanceRadii {
    pub const MOUSE: Self = Self {
        standard: TARGET_RADIUS,
        boss: TARGET_RADIUS_BOSS,
    };

    /// Larger, to make up for touch imprecision.
    pub const TOUCH: Self = Self {
        standard: TOUCH_TARGET_RADIUS,
        boss: TOUCH_TARGET_RADIUS_BOSS,
    };

    pub fn for_kind(&self, kind: TargetKind) -> f64 {
        match kind {
            TargetKind::Boss => self.boss,
            TargetKind::Threat | TargetKind::Decoy => self.standard,
        }
    }
}

/// Live threats, decoys and the boss. Cloaked stealth threats are left out.
pub fn candidates(world: &World) -> Vec<Candidate> {
    let mut out = Vec::new();
    for (entity, (_threat, pos, cloak)) in world
        .query::<(&Threat, &Position, Option<&Cloak>)>()
        .iter()
    {
        if cloak.map_or(true, |c| c.visible) {
            out.push(Candidate {
                entity,
                kind: TargetKind::Threat,
                position: *pos,
            });
        }
    }
    for (entity, (_decoy, pos)) in world.query::<(&Decoy, &Position)>().iter() {
        out.push(Candidate {
            entity,
            kind: TargetKind::Decoy,
            position: *pos,
        });
    }
    for (entity, (_boss, pos)) in world.query::<(&Boss, &Position)>().iter() {
        out.push(Candidate {
            entity,
            kind: TargetKind::Boss,
            position: *pos,
        });
    }
    out
}

/// Nearest candidate to `at` that lies within its own acceptance radius.
pub fn select_nearest(
    candidates: &[Candidate],
    at: Position,
    radii: AcceptanceRadii,
) -> Option<Candidate> {
    candidates
        .iter()
        .filter(|c| c.position.distance_to(&at) <= radii.for_kind(c.kind))
        .min_by(|a, b| {
            a.position
                .distance_sq_to(&at)
                .total_cmp(&b.position.distance_sq_to(&at))
        })
        .copied()
}

pub fn resolve(world: &World, at: Position, radii: AcceptanceRadii) -> Option<Candidate> {
    select_nearest(&candidates(world), at, radii)
}

/// Confirm a held target is still alive and targetable, with its current
/// position. Threats that have cloaked since are dropped.
pub fn revalidate(world: &World, held: Candidate) -> Option<Candidate> {
    if !world.contains(held.entity) {
        return None;
    }
    let hidden = world
        .get::<&Cloak>(held.entity)
        .map_or(false, |cloak| !cloak.visible);
    if hidden {
        return None;
    }
    let position = *world.get::<&Position>(held.entity).ok()?;
    Some(Candidate { position, ..held })
}

/// Re-resolve the persistent mouse target from the last pointer position.
pub fn run(world: &World, state: &mut MatchState) {
    state.target = state
        .pointer
        .and_then(|at| resolve(world, at, AcceptanceRadii::MOUSE));
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulwark_core::enums::ThreatKind;
    use bulwark_core::types::Velocity;
    use proptest::prelude::*;

    fn spawn(world: &mut World, x: f64, y: f64) -> Entity {
        world.spawn((
            Threat {
                id: 1,
                kind: ThreatKind::Standard,
                radius: 6.0,
                age: 0,
                max_age: THREAT_MAX_LIFETIME,
            },
            Position::new(x, y),
            Velocity::default(),
        ))
    }

    #[test]
    fn test_nearest_within_radius() {
        let mut world = World::new();
        let near = spawn(&mut world, 105.0, 100.0);
        spawn(&mut world, 120.0, 100.0);
        let hit = resolve(&world, Position::new(100.0, 100.0), AcceptanceRadii::MOUSE).unwrap();
        assert_eq!(hit.entity, near);
    }

    #[test]
    fn test_nothing_in_radius() {
        let mut world = World::new();
        spawn(&mut world, 200.0, 100.0);
        assert!(resolve(&world, Position::new(100.0, 100.0), AcceptanceRadii::MOUSE).is_none());
        assert!(resolve(&world, Position::new(150.0, 100.0), AcceptanceRadii::TOUCH).is_some());
    }

    #[test]
    fn test_cloaked_threat_excluded() {
        let mut world = World::new();
        let e = spawn(&mut world, 100.0, 100.0);
        world
            .insert_one(
                e,
                Cloak {
                    visible: false,
                    period: 30,
                    timer: 0,
                },
            )
            .unwrap();
        assert!(resolve(&world, Position::new(100.0, 100.0), AcceptanceRadii::TOUCH).is_none());
    }

    #[test]
    fn test_revalidate_tracks_moves_and_drops_lost_targets() {
        let mut world = World::new();
        let e = spawn(&mut world, 100.0, 100.0);
        let held = resolve(&world, Position::new(100.0, 100.0), AcceptanceRadii::MOUSE).unwrap();

        *world.get::<&mut Position>(e).unwrap() = Position::new(300.0, 200.0);
        let fresh = revalidate(&world, held).unwrap();
        assert_eq!(fresh.entity, e);
        assert_eq!(fresh.position, Position::new(300.0, 200.0));

        world
            .insert_one(
                e,
                Cloak {
                    visible: false,
                    period: 30,
                    timer: 0,
                },
            )
            .unwrap();
        assert!(revalidate(&world, held).is_none());

        world.despawn(e).unwrap();
        assert!(revalidate(&world, held).is_none());
    }

    #[test]
    fn test_boss_uses_larger_radius() {
        let candidates = vec![Candidate {
            entity: World::new().spawn((1u8,)),
            kind: TargetKind::Boss,
            position: Position::new(0.0, 0.0),
        }];
        let at = Position::new(70.0, 0.0);
        assert!(select_nearest(&candidates, at, AcceptanceRadii::MOUSE).is_some());
        assert!(select_nearest(&candidates, Position::new(100.0, 0.0), AcceptanceRadii::MOUSE)
            .is_none());
    }

    proptest! {
        #[test]
        fn prop_never_returns_a_farther_candidate(
            points in prop::collection::vec((0.0f64..800.0, 0.0f64..560.0, 0u8..3), 1..20),
            px in 0.0f64..800.0,
            py in 0.0f64..560.0,
        ) {
            let mut world = World::new();
            let candidates: Vec<Candidate> = points
                .iter()
                .map(|&(x, y, k)| Candidate {
                    entity: world.spawn((k,)),
                    kind: match k {
                        0 => TargetKind::Threat,
                        1 => TargetKind::Decoy,
                        _ => TargetKind::Boss,
                    },
                    position: Position::new(x, y),
                })
                .collect();
            let at = Position::new(px, py);
            let radii = AcceptanceRadii::MOUSE;
            if let Some(chosen) = select_nearest(&candidates, at, radii) {
                let d = chosen.position.distance_to(&at);
                prop_assert!(d <= radii.for_kind(chosen.kind));
                for c in &candidates {
                    if c.position.distance_to(&at) <= radii.for_kind(c.kind) {
                        prop_assert!(d <= c.position.distance_to(&at) + 1e-9);
                    }
                }
            } else {
                for c in &candidates {
                    prop_assert!(c.position.distance_to(&at) > radii.for_kind(c.kind));
                }
            }
        }

        #[test]
        fn prop_invisible_stealth_never_targeted(
            x in 0.0f64..800.0,
            y in 0.0f64..560.0,
            dx in -30.0f64..30.0,
            dy in -30.0f64..30.0,
        ) {
            let mut world = World::new();
            let e = spawn(&mut world, x, y);
            world.insert_one(e, Cloak { visible: false, period: 30, timer: 0 }).unwrap();
            let at = Position::new(x + dx, y + dy);
            prop_assert!(resolve(&world, at, AcceptanceRadii::TOUCH).is_none());
        }
    }
}
