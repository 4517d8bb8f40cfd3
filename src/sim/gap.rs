//! Rotating exit gap in the elimination arena wall
//!
//! The gap is an angular aperture in the circular wall. Its angular velocity is
//! a random walk: every 2-5 simulated seconds the direction may flip (50%) and
//! the speed multiplier is resampled.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::point_in_gap;
use crate::config::EliminationConfig;
use crate::consts::*;
use crate::wrap_angle;

/// Gap rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinDirection {
    /// Increasing angle
    Forward,
    /// Decreasing angle
    Reverse,
}

impl SpinDirection {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            SpinDirection::Forward => 1.0,
            SpinDirection::Reverse => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SpinDirection::Forward => SpinDirection::Reverse,
            SpinDirection::Reverse => SpinDirection::Forward,
        }
    }

    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            SpinDirection::Forward
        } else {
            SpinDirection::Reverse
        }
    }
}

/// Arena wall gap controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapController {
    /// Center of the gap (radians, [0, 2π))
    pub angle: f32,
    /// Angular width (degrees)
    pub width_deg: f32,
    pub direction: SpinDirection,
    /// Random-walk speed multiplier, in [0.3, 2.5]
    pub dynamic_speed: f32,
    /// Simulation time of the next direction/speed resample (ms)
    pub next_change_ms: f64,
    /// Rotation on/off
    pub rotating: bool,
    /// User-facing rotation speed multiplier
    pub user_speed: f32,
}

impl GapController {
    /// Static gap at angle 0 with the configured width
    pub fn new(config: &EliminationConfig) -> Self {
        Self {
            angle: 0.0,
            width_deg: config.gap_width_deg,
            direction: SpinDirection::Forward,
            dynamic_speed: 1.0,
            next_change_ms: 0.0,
            rotating: config.gap_rotation_enabled,
            user_speed: config.gap_rotation_speed,
        }
    }

    /// Fresh random state for a new round
    ///
    /// A static gap keeps its angle; a rotating one starts anywhere.
    pub fn reseed<R: Rng + ?Sized>(&mut self, rng: &mut R, now_ms: f64) {
        if self.rotating {
            self.angle = rng.random_range(0.0..std::f32::consts::TAU);
        }
        self.direction = SpinDirection::random(rng);
        self.dynamic_speed = rng.random_range(GAP_MIN_SPEED_MULTIPLIER..=GAP_MAX_SPEED_MULTIPLIER);
        self.next_change_ms = now_ms + rng.random_range(GAP_CHANGE_MIN_MS..=GAP_CHANGE_MAX_MS);
    }

    /// Advance the gap by `dt_ms` at simulation time `now_ms`
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R, now_ms: f64, dt_ms: f32) {
        if !self.rotating {
            return;
        }

        if now_ms >= self.next_change_ms {
            if rng.random_bool(0.5) {
                self.direction = self.direction.flipped();
            }
            self.dynamic_speed =
                rng.random_range(GAP_MIN_SPEED_MULTIPLIER..=GAP_MAX_SPEED_MULTIPLIER);
            self.next_change_ms = now_ms + rng.random_range(GAP_CHANGE_MIN_MS..=GAP_CHANGE_MAX_MS);
            log::debug!(
                "Gap spin now {:?} x{:.2}",
                self.direction,
                self.dynamic_speed
            );
        }

        let dt = dt_ms / 1000.0;
        self.angle = wrap_angle(
            self.angle
                + dt * GAP_BASE_ROTATION_SPEED
                    * self.user_speed
                    * self.dynamic_speed
                    * self.direction.sign(),
        );
    }

    /// Whether the wall is open at polar angle `theta`
    #[inline]
    pub fn contains_angle(&self, theta: f32) -> bool {
        self.width_deg >= 360.0 || point_in_gap(theta, self.angle, self.width_deg)
    }

    /// Whether the wall is open in the direction of `point` (origin-centered)
    #[inline]
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.contains_angle(point.y.atan2(point.x))
    }

    /// Gap edges (start, end) in radians, for drawing the opening
    pub fn edges(&self) -> (f32, f32) {
        let half = self.width_deg.min(360.0).to_radians() / 2.0;
        (wrap_angle(self.angle - half), wrap_angle(self.angle + half))
    }
}
