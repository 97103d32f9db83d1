//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are plain functions over `&mut World` plus the match state.
//! They do not own state; it lives in components and `MatchState`.

pub mod behavior;
pub mod collision;
pub mod launcher;
pub mod match_flow;
pub mod shop;
pub mod snapshot;
pub mod targeting;
pub mod turret;
pub mod wave_director;
