//! Fundamental geometric and simulation types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// 2D position in field space (pixels).
/// x grows to the right, y grows downward; y = 0 is the top of the field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// 2D velocity in field space (pixels per tick).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each gameplay tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Squared distance, for comparisons that don't need the root.
    pub fn distance_sq_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Angle from this position to another (radians, 0 = +x, y down).
    pub fn angle_to(&self, other: &Position) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Position extrapolated along a velocity for `ticks` ticks.
    pub fn extrapolate(&self, velocity: &Velocity, ticks: f64) -> Position {
        Position::new(self.x + velocity.x * ticks, self.y + velocity.y * ticks)
    }

    pub fn as_dvec2(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

impl From<DVec2> for Position {
    fn from(v: DVec2) -> Self {
        Position::new(v.x, v.y)
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Velocity of the given magnitude along an angle (radians, 0 = +x).
    pub fn from_angle(angle: f64, speed: f64) -> Self {
        Self::new(angle.cos() * speed, angle.sin() * speed)
    }

    /// Speed magnitude (pixels per tick).
    pub fn speed(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Heading in radians (0 = +x, positive toward +y).
    pub fn heading(&self) -> f64 {
        self.y.atan2(self.x)
    }

    pub fn as_dvec2(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

impl From<DVec2> for Velocity {
    fn from(v: DVec2) -> Self {
        Velocity::new(v.x, v.y)
    }
}

impl SimTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f64 {
        1.0 / crate::constants::TICK_RATE as f64
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }
}
