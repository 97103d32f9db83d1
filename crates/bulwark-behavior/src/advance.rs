//! The per-tick `Advance` contract for every live entity.
//!
//! Bodies are borrowed views over an entity's components. Advancing a body
//! mutates only that entity's own state; anything that would touch shared
//! collections (spawning offspring, releasing a decoy, calling a strike)
//! comes back as a signal for the orchestrating system to apply.

use bulwark_core::components::*;
use bulwark_core::constants::*;
use bulwark_core::enums::DesignatorPhase;
use bulwark_core::types::{Position, Velocity};

use crate::guidance;

/// Per-tick inputs shared by every body.
#[derive(Debug, Clone, Copy)]
pub struct TickContext {
    pub field_width: f64,
    pub ground_y: f64,
}

impl Default for TickContext {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            ground_y: GROUND_Y,
        }
    }
}

/// Advance one entity by one tick.
pub trait Advance {
    type Signal;

    fn advance(&mut self, ctx: &TickContext) -> Self::Signal;
}

/// What a threat asks the orchestrator to do after advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorSignal {
    Idle,
    /// Crossed its split height; replace with offspring this tick.
    Split,
    /// Release a decoy at the current position.
    EmitDecoy,
    /// Designator reached its hover point and began lock-on.
    DesignationStarted { structure: usize },
    /// Designation complete; hand off to the strike mechanism.
    Strike { structure: usize },
}

/// Mutable view over one threat's components.
pub struct ThreatBody<'a> {
    pub threat: &'a mut Threat,
    pub position: &'a mut Position,
    pub velocity: &'a mut Velocity,
    pub health: Option<&'a mut Health>,
    pub cloak: Option<&'a mut Cloak>,
    pub split: Option<&'a mut SplitCharge>,
    pub emitter: Option<&'a mut DecoyEmitter>,
    pub designation: Option<&'a mut Designation>,
}

impl Advance for ThreatBody<'_> {
    type Signal = BehaviorSignal;

    fn advance(&mut self, _ctx: &TickContext) -> BehaviorSignal {
        self.threat.age = self.threat.age.saturating_add(1);

        if let Some(health) = self.health.as_deref_mut() {
            health.hit_flash = health.hit_flash.saturating_sub(1);
        }

        if let Some(designation) = self.designation.as_deref_mut() {
            return designate(designation, self.position, self.velocity);
        }

        self.position.x += self.velocity.x;
        self.position.y += self.velocity.y;

        if let Some(cloak) = self.cloak.as_deref_mut() {
            cloak.timer += 1;
            if cloak.timer >= cloak.period.max(1) {
                cloak.visible = !cloak.visible;
                cloak.timer = 0;
            }
        }

        if let Some(split) = self.split.as_deref_mut() {
            if !split.spent && self.position.y >= split.split_y {
                split.spent = true;
                return BehaviorSignal::Split;
            }
        }

        if let Some(emitter) = self.emitter.as_deref_mut() {
            emitter.timer += 1;
            if emitter.timer >= emitter.interval.max(1) {
                emitter.timer = 0;
                return BehaviorSignal::EmitDecoy;
            }
        }

        BehaviorSignal::Idle
    }
}

fn designate(
    designation: &mut Designation,
    position: &mut Position,
    velocity: &mut Velocity,
) -> BehaviorSignal {
    match designation.phase {
        DesignatorPhase::Approach => {
            position.x += velocity.x;
            position.y += velocity.y;
            if position.y >= designation.hover.1 {
                position.x = designation.hover.0;
                position.y = designation.hover.1;
                *velocity = Velocity::default();
                designation.phase = DesignatorPhase::Designating;
                designation.timer = DESIGNATE_TICKS;
                return BehaviorSignal::DesignationStarted {
                    structure: designation.structure,
                };
            }
            BehaviorSignal::Idle
        }
        DesignatorPhase::Designating => {
            designation.timer = designation.timer.saturating_sub(1);
            if designation.timer == 0 {
                designation.phase = DesignatorPhase::Complete;
                return BehaviorSignal::Strike {
                    structure: designation.structure,
                };
            }
            BehaviorSignal::Idle
        }
        DesignatorPhase::Complete => BehaviorSignal::Idle,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossSignal {
    Idle,
    SpawnDrone,
}

/// Mutable view over the boss.
pub struct BossBody<'a> {
    pub boss: &'a mut Boss,
    pub position: &'a mut Position,
    pub velocity: &'a mut Velocity,
}

impl Advance for BossBody<'_> {
    type Signal = BossSignal;

    fn advance(&mut self, _ctx: &TickContext) -> BossSignal {
        self.boss.hit_flash = self.boss.hit_flash.saturating_sub(1);

        self.position.x += self.velocity.x;
        if self.position.x <= BOSS_MIN_X || self.position.x >= BOSS_MAX_X {
            self.position.x = self.position.x.clamp(BOSS_MIN_X, BOSS_MAX_X);
            self.velocity.x = -self.velocity.x;
        }

        self.boss.spawn_cooldown = self.boss.spawn_cooldown.saturating_sub(1);
        if self.boss.spawn_cooldown == 0 {
            self.boss.spawn_cooldown = BOSS_SPAWN_INTERVAL;
            return BossSignal::SpawnDrone;
        }
        BossSignal::Idle
    }
}

/// Whether a short-lived projectile survives this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifespan {
    Alive,
    Expired,
}

fn outside_field(position: &Position, ctx: &TickContext) -> bool {
    position.x < 0.0 || position.x > ctx.field_width || position.y < 0.0 || position.y > ctx.ground_y
}

pub struct DecoyBody<'a> {
    pub decoy: &'a mut Decoy,
    pub position: &'a mut Position,
    pub velocity: &'a mut Velocity,
}

impl Advance for DecoyBody<'_> {
    type Signal = Lifespan;

    fn advance(&mut self, ctx: &TickContext) -> Lifespan {
        self.position.x += self.velocity.x;
        self.position.y += self.velocity.y;
        self.decoy.life = self.decoy.life.saturating_sub(1);
        if self.decoy.life == 0 || outside_field(self.position, ctx) {
            Lifespan::Expired
        } else {
            Lifespan::Alive
        }
    }
}

pub struct TracerBody<'a> {
    pub tracer: &'a mut Tracer,
    pub position: &'a mut Position,
    pub velocity: &'a Velocity,
}

impl Advance for TracerBody<'_> {
    type Signal = Lifespan;

    fn advance(&mut self, ctx: &TickContext) -> Lifespan {
        self.position.x += self.velocity.x;
        self.position.y += self.velocity.y;
        self.tracer.life = self.tracer.life.saturating_sub(1);
        if self.tracer.life == 0 || outside_field(self.position, ctx) {
            Lifespan::Expired
        } else {
            Lifespan::Alive
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterceptorSignal {
    Flying,
    /// A non-homing interceptor reached its aim point.
    ReachedAim,
    Expired,
}

/// Mutable view over an interceptor. `target_position` is the revalidated
/// position of its target this tick, or `None` when the target is lost.
pub struct InterceptorBody<'a> {
    pub interceptor: &'a mut Interceptor,
    pub position: &'a mut Position,
    pub velocity: &'a mut Velocity,
    pub target_position: Option<Position>,
}

impl Advance for InterceptorBody<'_> {
    type Signal = InterceptorSignal;

    fn advance(&mut self, ctx: &TickContext) -> InterceptorSignal {
        let speed = self.interceptor.speed;
        if self.interceptor.homing {
            if let Some(target) = self.target_position {
                *self.velocity = guidance::steer(
                    self.position,
                    self.velocity,
                    &target,
                    speed,
                    INTERCEPTOR_TURN_RATE,
                );
            }
        } else {
            let aim = Position::new(self.interceptor.aim.0, self.interceptor.aim.1);
            if self.position.distance_to(&aim) <= speed {
                *self.position = aim;
                return InterceptorSignal::ReachedAim;
            }
            *self.velocity = guidance::pursue(self.position, &aim, speed);
        }

        self.position.x += self.velocity.x;
        self.position.y += self.velocity.y;
        self.interceptor.life = self.interceptor.life.saturating_sub(1);

        if self.interceptor.life == 0 || outside_field(self.position, ctx) {
            InterceptorSignal::Expired
        } else {
            InterceptorSignal::Flying
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MineSignal {
    Idle,
    /// Arming countdown just finished.
    Armed,
    /// Launched mine hit its travel bound; detonate where it is.
    TravelBound,
}

pub struct MineBody<'a> {
    pub mine: &'a mut Mine,
    pub position: &'a mut Position,
}

impl Advance for MineBody<'_> {
    type Signal = MineSignal;

    fn advance(&mut self, _ctx: &TickContext) -> MineSignal {
        if self.mine.arming > 0 {
            self.mine.arming -= 1;
            return if self.mine.arming == 0 {
                MineSignal::Armed
            } else {
                MineSignal::Idle
            };
        }

        if self.mine.launched {
            self.position.y -= MINE_LAUNCH_SPEED;
            if self.mine.origin_y - self.position.y >= MINE_TRAVEL_BOUND || self.position.y <= 0.0
            {
                return MineSignal::TravelBound;
            }
        }
        MineSignal::Idle
    }
}
