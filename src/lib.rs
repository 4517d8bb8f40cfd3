//! Flag Royale - simulation cores for two arena party games
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, gap arena, elimination and combat games)
//! - `config`: Simulator configuration with documented defaults
//! - `error`: Configuration/precondition errors
//! - `web`: Browser bindings (wasm32 only)

pub mod config;
pub mod error;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{CombatConfig, EliminationConfig};
pub use error::ConfigError;

use glam::Vec2;

/// Simulation constants that are not user-configurable
pub mod consts {
    /// Reference frame duration (60 Hz display refresh), milliseconds
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Largest delta a single step will integrate (tab switch / hitch guard)
    pub const MAX_STEP_MS: f32 = 100.0;

    /// Distances below this are treated as degenerate (no normalization)
    pub const EPSILON: f32 = 1e-6;

    /// Bisection iterations for boundary crossing search
    pub const BISECTION_ITERATIONS: u32 = 15;

    /// Gap base rotation speed (radians per second)
    pub const GAP_BASE_ROTATION_SPEED: f32 = 0.9;
    /// Dynamic gap speed multiplier range
    pub const GAP_MIN_SPEED_MULTIPLIER: f32 = 0.3;
    pub const GAP_MAX_SPEED_MULTIPLIER: f32 = 2.5;
    /// Gap direction/speed resample interval range (ms)
    pub const GAP_CHANGE_MIN_MS: f64 = 2000.0;
    pub const GAP_CHANGE_MAX_MS: f64 = 5000.0;

    /// Pair collision distance as a fraction of entity diameter
    pub const COLLISION_DISTANCE_FACTOR: f32 = 0.9;
    /// Exit flight duration (ms)
    pub const EXIT_DURATION_MS: f64 = 300.0;
    /// Radial push applied to the exit point, in arena radii
    pub const EXIT_PUSH: f32 = 0.02;
    /// Opacity floor once a flag is stacked
    pub const STACKED_OPACITY: f32 = 0.85;
    /// Tumble rate while falling (radians per unit of fall speed per second)
    pub const FALL_TUMBLE_RATE: f32 = 2.4;
    /// Horizontal drift perturbation (units per second squared)
    pub const FALL_DRIFT_JITTER: f32 = 0.15;

    /// Weapon tip collision radius tolerance
    pub const HIT_RADIUS_TOLERANCE: f32 = 1.05;
    /// Hit flash duration (frames)
    pub const HIT_FLASH_FRAMES: u32 = 8;
    /// Starting life for fighters
    pub const MAX_LIFE: f32 = 100.0;
    /// Hard cap on fighters per round
    pub const COMBAT_ENTITY_CAP: usize = 20;
    /// Fighter wander speed range (px per frame)
    pub const WANDER_MIN_SPEED: f32 = 0.6;
    pub const WANDER_MAX_SPEED: f32 = 1.6;
    /// Heading drift per frame while wandering (radians)
    pub const WANDER_JITTER: f32 = 0.05;
    /// Weapon angular speed range (radians per frame)
    pub const WEAPON_MIN_SPIN: f32 = 0.04;
    pub const WEAPON_MAX_SPIN: f32 = 0.09;
}

/// Normalize angle to [-π, π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= PI { wrapped - TAU } else { wrapped }
}

/// Wrap angle to [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}
