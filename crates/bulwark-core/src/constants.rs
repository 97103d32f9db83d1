//! Simulation constants and tuning parameters.
//!
//! All speeds are in pixels per tick and all durations in ticks; the
//! simulation assumes a fixed tick rate.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

// --- Field ---

/// Field width (pixels).
pub const FIELD_WIDTH: f64 = 800.0;

/// Field height (pixels).
pub const FIELD_HEIGHT: f64 = 600.0;

/// Ground line. Threats reaching it are removed.
pub const GROUND_Y: f64 = 560.0;

// --- Structures ---

/// Structure centres along the ground.
pub const STRUCTURE_XS: [f64; 6] = [80.0, 180.0, 280.0, 520.0, 620.0, 720.0];

pub const STRUCTURE_WIDTH: f64 = 48.0;

pub const STRUCTURE_HEIGHT: f64 = 24.0;

// --- Launcher / interceptors ---

/// Interceptor launch point.
pub const LAUNCHER_X: f64 = 400.0;
pub const LAUNCHER_Y: f64 = 550.0;

/// Minimum ticks between player volleys.
pub const FIRE_COOLDOWN_TICKS: u32 = 10;

pub const INTERCEPTOR_BASE_SPEED: f64 = 6.0;
pub const INTERCEPTOR_SPEED_PER_LEVEL: f64 = 1.0;
pub const INTERCEPTOR_BASE_BLAST: f64 = 18.0;
pub const INTERCEPTOR_BLAST_PER_LEVEL: f64 = 4.0;
pub const INTERCEPTOR_LIFE_TICKS: u32 = 300;

/// Maximum heading change per tick for homing interceptors (radians).
pub const INTERCEPTOR_TURN_RATE: f64 = 0.12;

/// Angular spacing between interceptors of a multishot volley (radians).
pub const MULTISHOT_SPREAD: f64 = 0.12;

pub const STANDARD_DAMAGE: f64 = 1.0;
pub const HEAVY_DAMAGE: f64 = 5.0;
pub const HEAVY_BLAST_RADIUS: f64 = 60.0;

pub const BASE_CRIT_CHANCE: f64 = 0.05;
pub const PERK_CRIT_BONUS: f64 = 0.10;

/// Extra starting currency from the war chest perk.
pub const WAR_CHEST_CURRENCY: u32 = 75;
pub const CRIT_MULTIPLIER: f64 = 3.0;

/// Heavy detonation stun duration.
pub const STUN_TICKS: u32 = 180;

// --- Decoys ---

pub const DECOY_RADIUS: f64 = 6.0;
pub const DECOY_LIFE_TICKS: u32 = 180;
pub const DECOY_DRIFT: f64 = 0.5;

/// Range within which a decoy hijacks a homing interceptor.
pub const DECOY_LURE_RADIUS: f64 = 60.0;

// --- Threats ---

/// Base threat speed before wave, difficulty, and variant scaling.
pub const THREAT_BASE_SPEED: f64 = 1.2;

/// Threats older than this are removed.
pub const THREAT_MAX_LIFETIME: u32 = 3600;

/// Horizontal spawn margin from the field edges.
pub const SPAWN_MARGIN: f64 = 30.0;

pub const ARMORED_HEALTH: f64 = 3.0;

/// "Just hit" flash duration.
pub const HIT_FLASH_TICKS: u32 = 8;

pub const CLOAK_PERIOD_MIN: u32 = 30;
pub const CLOAK_PERIOD_MAX: u32 = 45;

pub const SWARMER_SPLIT_BAND: (f64, f64) = (0.35, 0.55);
pub const MIRV_SPLIT_BAND: (f64, f64) = (0.30, 0.50);
pub const SWARMER_OFFSPRING: u32 = 6;
pub const MIRV_OFFSPRING: u32 = 3;

/// Swarmer drone fan: max deviation from straight down (radians).
pub const SWARM_FAN_HALF_ANGLE: f64 = 0.8;
pub const SWARM_SPEED_MIN: f64 = 2.0;
pub const SWARM_SPEED_MAX: f64 = 3.0;

/// Mirv child velocity perturbation.
pub const MIRV_VX_JITTER: f64 = 0.8;
pub const MIRV_VY_SCALE: (f64, f64) = (0.9, 1.1);

pub const DRONE_LIFE_TICKS: u32 = 240;

pub const DECOY_INTERVAL_TICKS: u32 = 90;

pub const DESIGNATOR_HOVER_BAND: (f64, f64) = (0.25, 0.40);
pub const DESIGNATE_TICKS: u32 = 150;

/// Delay between designation completing and the strike landing.
pub const STRIKE_DELAY_TICKS: u32 = 30;

// --- Boss ---

pub const BOSS_RADIUS: f64 = 40.0;
pub const BOSS_Y: f64 = 90.0;
pub const BOSS_SPEED: f64 = 1.5;
pub const BOSS_MIN_X: f64 = 60.0;
pub const BOSS_MAX_X: f64 = 740.0;
pub const BOSS_BASE_HEALTH: f64 = 40.0;
pub const BOSS_HEALTH_PER_WAVE: f64 = 4.0;
pub const BOSS_SPAWN_INTERVAL: u32 = 120;

// --- Tracers ---

pub const TRACER_SPEED: f64 = 9.0;
pub const TRACER_RADIUS: f64 = 3.0;
pub const TRACER_LIFE_TICKS: u32 = 60;
pub const TRACER_DAMAGE: f64 = 0.5;
pub const TRACER_ARMORED_DAMAGE: f64 = 1.0;
pub const TRACER_BOSS_DAMAGE: f64 = 0.25;

// --- Mines ---

pub const MINE_ARMING_TICKS: u32 = 90;
pub const MINE_TRIGGER_RANGE: f64 = 140.0;
pub const MINE_LAUNCH_SPEED: f64 = 7.0;
pub const MINE_TRAVEL_BOUND: f64 = 420.0;
pub const MINE_DETONATION_RADIUS: f64 = 70.0;
pub const MAX_MINES: usize = 6;

// --- Turrets ---

pub const TURRET_SLOTS: [(f64, f64); 2] = [(240.0, 540.0), (560.0, 540.0)];
pub const TURRET_BASE_RANGE: f64 = 220.0;
pub const TURRET_RANGE_PER_LEVEL: f64 = 40.0;
pub const TURRET_REACQUIRE_TICKS: u32 = 20;
pub const TURRET_BURST: u32 = 5;
pub const TURRET_BURST_CADENCE: u32 = 6;
pub const TURRET_BASE_COOLDOWN: f64 = 60.0;
pub const TURRET_COOLDOWN_FACTOR: f64 = 0.85;
pub const TURRET_MIN_COOLDOWN: u32 = 8;
pub const TURRET_INACCURACY: f64 = 0.04;
pub const TURRET_SWEEP_RATE: f64 = 0.02;

// --- Targeting ---

pub const TARGET_RADIUS: f64 = 40.0;
pub const TARGET_RADIUS_BOSS: f64 = 90.0;
pub const TOUCH_TARGET_RADIUS: f64 = 60.0;
pub const TOUCH_TARGET_RADIUS_BOSS: f64 = 120.0;

// --- Wave pacing ---

/// Ticks with a pending queue and no kills before the wave is force-ended.
pub const STALL_BUDGET_TICKS: u32 = 1200;

/// Floor for any computed spawn delay.
pub const MIN_SPAWN_DELAY: f64 = 10.0;

/// Floor for configured multipliers used as divisors.
pub const MIN_MULTIPLIER: f64 = 0.1;

/// Difficulty ramp starts after this wave.
pub const DIFFICULTY_RAMP_START: u32 = 5;
pub const DIFFICULTY_RAMP_PER_WAVE: f64 = 0.15;
pub const WAVE_SPEED_PER_INDEX: f64 = 0.05;

// --- Shop ---

/// Price factor of the first purchase in each shop phase.
pub const FIRST_PURCHASE_DISCOUNT: f64 = 0.8;

// --- Game over ---

/// Score per prestige point.
pub const PRESTIGE_SCORE_DIVISOR: u64 = 100;
pub const PRESTIGE_PER_WAVE: u64 = 10;
