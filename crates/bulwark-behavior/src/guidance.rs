//! Guidance helpers: turn-limited homing, lead prediction, volley fans.

use glam::DVec2;

use bulwark_core::types::{Position, Velocity};

/// Minimum projectile speed used as a divisor.
const MIN_PROJECTILE_SPEED: f64 = 0.1;

/// Steer toward `target` at constant `speed`, turning at most `max_turn`
/// radians this tick. A stationary missile points straight at the target.
pub fn steer(
    position: &Position,
    velocity: &Velocity,
    target: &Position,
    speed: f64,
    max_turn: f64,
) -> Velocity {
    let los = target.as_dvec2() - position.as_dvec2();
    if los.length_squared() < 1e-9 {
        return *velocity;
    }

    let current = velocity.as_dvec2();
    if current.length_squared() < 1e-9 {
        return Velocity::from(los.normalize() * speed);
    }

    let desired = los.y.atan2(los.x);
    let heading = current.y.atan2(current.x);
    let delta = wrap_angle(desired - heading).clamp(-max_turn, max_turn);
    Velocity::from_angle(heading + delta, speed)
}

/// Straight-line pursuit at constant speed.
pub fn pursue(from: &Position, to: &Position, speed: f64) -> Velocity {
    let dir = (to.as_dvec2() - from.as_dvec2()).normalize_or_zero();
    if dir == DVec2::ZERO {
        Velocity::new(0.0, -speed)
    } else {
        Velocity::from(dir * speed)
    }
}

/// Predicted aim point for a projectile fired from `shooter`.
///
/// Time to impact is estimated as range / projectile speed; the aim point
/// is the target extrapolated along its velocity by that many ticks.
/// Returns (aim point, ticks to impact).
pub fn lead_point(
    shooter: &Position,
    target: &Position,
    target_velocity: &Velocity,
    projectile_speed: f64,
) -> (Position, f64) {
    let tti = shooter.distance_to(target) / projectile_speed.max(MIN_PROJECTILE_SPEED);
    (target.extrapolate(target_velocity, tti), tti)
}

/// Headings for a volley of `count` shots centred on `center`,
/// spaced `spread` radians apart.
pub fn fan(center: f64, count: u32, spread: f64) -> Vec<f64> {
    let count = count.max(1);
    let half = (count - 1) as f64 / 2.0;
    (0..count)
        .map(|i| center + (i as f64 - half) * spread)
        .collect()
}

/// Wrap an angle into (-PI, PI].
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = (angle + std::f64::consts::PI).rem_euclid(std::f64::consts::TAU);
    wrapped - std::f64::consts::PI
}
