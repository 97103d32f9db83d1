//! Bulwark application.
//!
//! Wires the simulation engine to a real-time loop thread, disk storage,
//! and a scripted or stdin-driven player.

pub mod autopilot;
pub mod cli;
pub mod game_loop;
pub mod state;
pub mod storage;

pub use bulwark_core as core;
