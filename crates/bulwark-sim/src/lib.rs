//! Simulation engine for Bulwark.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces GameStateSnapshots for the frontend.

pub mod engine;
pub mod match_state;
pub mod ports;
pub mod systems;
pub mod world_setup;

pub use bulwark_core as core;
pub use engine::{SimConfig, SimulationEngine};
pub use ports::{MemoryProfileStore, ProfileStore};
