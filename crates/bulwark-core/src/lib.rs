//! Core types and definitions for the Bulwark simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, configuration tables, state snapshots, events,
//! the persisted profile, and constants. It has no runtime of its own.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod profile;
pub mod state;
pub mod types;
