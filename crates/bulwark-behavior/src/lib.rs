//! Entity behavior model for Bulwark.
//!
//! Implements per-variant threat behavior (movement, cloak, split,
//! decoy release, designation), boss and projectile advancement,
//! split offspring, and guidance math. No ECS dependency: everything
//! operates on borrowed component views and plain data.

pub mod advance;
pub mod guidance;
pub mod offspring;
pub mod profiles;

pub use bulwark_core as core;

#[cfg(test)]
mod tests;
