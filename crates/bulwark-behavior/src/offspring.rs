//! Split offspring generation for swarmer and mirv threats.

use rand::Rng;

use bulwark_core::constants::*;
use bulwark_core::enums::ThreatKind;
use bulwark_core::types::{Position, Velocity};

use crate::profiles::get_profile;

/// One threat to spawn in place of a split parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Offspring {
    pub kind: ThreatKind,
    pub position: Position,
    pub velocity: Velocity,
}

/// Offspring for a parent that signalled a split. Variants that don't split
/// yield nothing. Offspring kinds never carry a split capability.
pub fn split_offspring<R: Rng + ?Sized>(
    kind: ThreatKind,
    position: Position,
    velocity: Velocity,
    rng: &mut R,
) -> Vec<Offspring> {
    let Some((child_kind, count)) = get_profile(kind).offspring else {
        return Vec::new();
    };

    (0..count)
        .map(|_| {
            let velocity = match kind {
                ThreatKind::Swarmer => {
                    let angle = std::f64::consts::FRAC_PI_2
                        + rng.gen_range(-SWARM_FAN_HALF_ANGLE..=SWARM_FAN_HALF_ANGLE);
                    let speed = rng.gen_range(SWARM_SPEED_MIN..=SWARM_SPEED_MAX);
                    Velocity::from_angle(angle, speed)
                }
                _ => Velocity::new(
                    velocity.x + rng.gen_range(-MIRV_VX_JITTER..=MIRV_VX_JITTER),
                    velocity.y * rng.gen_range(MIRV_VY_SCALE.0..=MIRV_VY_SCALE.1),
                ),
            };
            Offspring {
                kind: child_kind,
                position,
                velocity,
            }
        })
        .collect()
}
