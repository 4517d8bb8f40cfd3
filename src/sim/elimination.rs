//! Elimination game: flags bounce inside a circular wall until they slip out
//! through the rotating gap. Last flag inside wins.
//!
//! Per active flag, per frame:
//! 1. Integrate position
//! 2. Nominal wall crossing → exit if the crossing point is in the gap, else bounce
//! 3. Max-center-distance crossing → allowed only where the path enters the
//!    gap; the flag is then committed and leaves at the nominal wall
//! 4. Safety clamp (idempotent, reapplied every frame)
//! 5. Pairwise elastic collisions between active flags
//!
//! Eliminated flags then play out exit flight, gravity fall and stacking.

use std::collections::HashSet;

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::entity::{Appearance, Candidate, FlagPhase, FlagToken};
use super::gap::GapController;
use super::geometry::{boundary_crossing, point_in_circle, radial_normal, reflect_velocity};
use super::round::{RoundOutcome, RoundPhase, RoundSim, validate_candidates};
use crate::config::EliminationConfig;
use crate::consts::*;
use crate::error::ConfigError;
use crate::{normalize_angle, polar_to_cartesian};

/// Spawn attempts per flag before accepting an overlapping position
const PLACEMENT_ATTEMPTS: u32 = 40;

/// Order in which flags left the arena
#[derive(Debug, Clone, Default)]
struct EliminationLog {
    order: Vec<String>,
    seen: HashSet<String>,
    next_order: u32,
}

impl EliminationLog {
    /// Record an elimination; returns the assigned order, or None if already recorded
    fn record(&mut self, id: &str) -> Option<u32> {
        if !self.seen.insert(id.to_string()) {
            return None;
        }
        self.order.push(id.to_string());
        let order = self.next_order;
        self.next_order += 1;
        Some(order)
    }
}

/// Elimination game simulator
#[derive(Debug, Clone)]
pub struct EliminationSim<R: Rng = Pcg32> {
    config: EliminationConfig,
    rng: R,
    flags: Vec<FlagToken>,
    gap: GapController,
    phase: RoundPhase,
    outcome: Option<RoundOutcome>,
    log: EliminationLog,
    /// Flags already resting in the stack
    stacked: usize,
    /// Simulation time since round start (ms)
    elapsed_ms: f64,
    next_velocity_change_ms: f64,
}

impl EliminationSim<Pcg32> {
    /// Create a simulator with a seeded PCG generator
    pub fn new(config: EliminationConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> EliminationSim<R> {
    /// Create a simulator drawing randomness from `rng`
    pub fn with_rng(config: EliminationConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let gap = GapController::new(&config);
        Ok(Self {
            config,
            rng,
            flags: Vec::new(),
            gap,
            phase: RoundPhase::Idle,
            outcome: None,
            log: EliminationLog::default(),
            stacked: 0,
            elapsed_ms: 0.0,
            next_velocity_change_ms: 0.0,
        })
    }

    /// Pick up to `count` random candidates and scatter them inside the placement disc
    pub fn start_round(
        &mut self,
        candidates: &[Candidate],
        count: usize,
    ) -> Result<(), ConfigError> {
        validate_candidates(candidates, count)?;

        let mut picked: Vec<&Candidate> = candidates.iter().collect();
        picked.shuffle(&mut self.rng);
        picked.truncate(count.min(self.config.max_entities));

        let placement_radius =
            self.config.max_center_distance() * self.config.placement_radius_fraction;
        let min_gap = self.config.entity_size * COLLISION_DISTANCE_FACTOR;

        let mut flags: Vec<FlagToken> = Vec::with_capacity(picked.len());
        for candidate in picked {
            let mut pos = Vec2::ZERO;
            for _ in 0..PLACEMENT_ATTEMPTS {
                // sqrt for a uniform spread over the disc
                let r = placement_radius * self.rng.random::<f32>().sqrt();
                let theta = self.rng.random_range(0.0..std::f32::consts::TAU);
                pos = polar_to_cartesian(r, theta);
                if flags
                    .iter()
                    .all(|other| !point_in_circle(pos, other.pos, min_gap))
                {
                    break;
                }
            }
            let heading = self.rng.random_range(0.0..std::f32::consts::TAU);
            let speed = if self.config.max_speed > self.config.min_speed {
                self.rng
                    .random_range(self.config.min_speed..=self.config.max_speed)
            } else {
                self.config.min_speed
            };
            flags.push(FlagToken::new(
                candidate,
                pos,
                polar_to_cartesian(speed, heading),
            ));
        }

        self.reset_round(flags);
        self.reseed_gap();
        log::info!(
            "Elimination round started: {} flags, gap {}° at {:.2} rad",
            self.flags.len(),
            self.gap.width_deg,
            self.gap.angle
        );
        Ok(())
    }

    /// Start a round with pre-built flags (used for scripted scenarios)
    ///
    /// The gap keeps its current angle; rotation state is reseeded.
    pub fn start_round_with(&mut self, flags: Vec<FlagToken>) -> Result<(), ConfigError> {
        if flags.is_empty() {
            return Err(ConfigError::ZeroEntities);
        }
        let mut ids = HashSet::with_capacity(flags.len());
        for flag in &flags {
            if !ids.insert(flag.id.as_str()) {
                return Err(ConfigError::DuplicateCandidate(flag.id.clone()));
            }
        }
        self.reset_round(flags);
        let angle = self.gap.angle;
        self.reseed_gap();
        self.gap.angle = angle;
        Ok(())
    }

    fn reset_round(&mut self, flags: Vec<FlagToken>) {
        self.flags = flags;
        self.log = EliminationLog::default();
        self.stacked = 0;
        self.outcome = None;
        self.elapsed_ms = 0.0;
        self.next_velocity_change_ms = self.config.velocity_change_interval_ms as f64;
        self.phase = RoundPhase::Playing;
    }

    /// Fresh gap state; a static gap keeps its last angle
    fn reseed_gap(&mut self) {
        let angle = self.gap.angle;
        self.gap = GapController::new(&self.config);
        if !self.gap.rotating {
            self.gap.angle = angle;
        }
        self.gap.reseed(&mut self.rng, 0.0);
    }

    /// Advance the simulation by `dt_ms`
    pub fn step(&mut self, dt_ms: f32) {
        if self.phase == RoundPhase::Idle {
            return;
        }
        let dt_ms = dt_ms.clamp(0.0, MAX_STEP_MS);
        self.elapsed_ms += dt_ms as f64;
        let dt = dt_ms / 1000.0;

        if self.phase == RoundPhase::Playing {
            self.gap.update(&mut self.rng, self.elapsed_ms, dt_ms);
            self.perturb_headings();
            self.move_active_flags(dt);
            self.resolve_collisions();
        }

        self.animate_eliminated(dt);

        if self.phase == RoundPhase::Playing {
            self.check_round_end();
        }
    }

    /// Periodically rotate every active heading a little so no flag settles
    /// into an orbit that never meets the gap
    fn perturb_headings(&mut self) {
        let interval = self.config.velocity_change_interval_ms as f64;
        if interval <= 0.0 || self.elapsed_ms < self.next_velocity_change_ms {
            return;
        }
        self.next_velocity_change_ms += interval;
        let max_turn = self.config.velocity_change_max_angle_deg.to_radians();
        if max_turn <= 0.0 {
            return;
        }
        for flag in self.flags.iter_mut().filter(|f| f.is_active()) {
            let turn = self.rng.random_range(-max_turn..=max_turn);
            flag.vel = Vec2::from_angle(turn).rotate(flag.vel);
        }
    }

    fn move_active_flags(&mut self, dt: f32) {
        let scale = dt * self.config.speed_multiplier;
        for flag in self.flags.iter_mut().filter(|f| f.is_active()) {
            let prev = flag.pos;
            let next = prev + flag.vel * scale;
            if let Some(exit_point) = advance_flag(flag, prev, next, &self.gap, &self.config) {
                begin_exit(flag, exit_point, self.elapsed_ms, &self.config);
                flag.elimination_order = self.log.record(&flag.id);
                log::debug!(
                    "{} eliminated (#{})",
                    flag.id,
                    flag.elimination_order.map_or(0, |o| o + 1)
                );
            }
        }
    }

    fn resolve_collisions(&mut self) {
        let min_dist = self.config.entity_size * COLLISION_DISTANCE_FACTOR;
        let count = self.flags.len();
        for i in 0..count {
            if !self.flags[i].is_active() {
                continue;
            }
            for j in (i + 1)..count {
                let (head, tail) = self.flags.split_at_mut(j);
                let (a, b) = (&mut head[i], &mut tail[0]);
                if b.is_active() {
                    collide_pair(a, b, min_dist);
                }
            }
        }

        // Separation can push a flag past the wall; pull it back in
        let r_max = self.config.max_center_distance();
        for flag in self.flags.iter_mut().filter(|f| f.is_active()) {
            contain(flag, r_max, self.config.arena_radius);
        }
    }

    fn animate_eliminated(&mut self, dt: f32) {
        for flag in self.flags.iter_mut() {
            match flag.phase {
                FlagPhase::Active | FlagPhase::Stacked { .. } => {}
                FlagPhase::Exiting {
                    started_ms,
                    origin,
                    velocity,
                } => {
                    let elapsed = self.elapsed_ms - started_ms;
                    let t = (elapsed / EXIT_DURATION_MS).min(1.0) as f32;
                    let ease = 1.0 - (1.0 - t).powi(3);
                    let flight = (elapsed.min(EXIT_DURATION_MS) / 1000.0) as f32
                        * self.config.speed_multiplier;
                    flag.pos = origin + velocity * flight * ease;

                    if elapsed >= EXIT_DURATION_MS {
                        flag.phase = FlagPhase::Falling {
                            velocity_y: velocity.y.max(0.0) * 0.5,
                            drift_x: velocity.x * 0.4,
                            rotation: self.rng.random_range(-0.3..=0.3),
                            opacity: 1.0,
                        };
                    }
                }
                FlagPhase::Falling {
                    velocity_y,
                    drift_x,
                    rotation,
                    ..
                } => {
                    let g = self.config.gravity;
                    let max_fall = self.config.max_fall_speed;

                    flag.pos.y += velocity_y * dt + 0.5 * g * dt * dt;
                    let velocity_y = (velocity_y + g * dt).min(max_fall);

                    let drift_x = drift_x
                        + self.rng.random_range(-FALL_DRIFT_JITTER..=FALL_DRIFT_JITTER) * dt;
                    flag.pos.x += drift_x * dt;

                    let rotation = rotation + velocity_y * FALL_TUMBLE_RATE * dt;
                    let opacity = 1.0 - 0.25 * (velocity_y / max_fall).clamp(0.0, 1.0);

                    if flag.pos.y >= self.config.stack_line_y {
                        let slot = self.stacked;
                        self.stacked += 1;
                        let (row, column, pos) = stack_slot(slot, &self.config);
                        flag.pos = pos;
                        flag.vel = Vec2::ZERO;
                        flag.phase = FlagPhase::Stacked {
                            row,
                            column,
                            rotation: normalize_angle(rotation).sin() * 0.2,
                            opacity: STACKED_OPACITY,
                        };
                    } else {
                        flag.phase = FlagPhase::Falling {
                            velocity_y,
                            drift_x,
                            rotation,
                            opacity,
                        };
                    }
                }
            }
        }
    }

    fn check_round_end(&mut self) {
        let mut active = self.flags.iter().filter(|f| f.is_active());
        match (active.next(), active.next()) {
            (Some(last), None) => {
                log::info!(
                    "{} wins after {:.1}s ({} eliminated)",
                    last.id,
                    self.elapsed_ms / 1000.0,
                    self.log.order.len()
                );
                self.outcome = Some(RoundOutcome::Winner(last.id.clone()));
                self.phase = RoundPhase::Finished;
            }
            (None, _) => {
                log::warn!("Last flags left together; round ends without a winner");
                self.outcome = Some(RoundOutcome::NoSurvivor);
                self.phase = RoundPhase::Finished;
            }
            _ => {}
        }
    }

    pub fn config(&self) -> &EliminationConfig {
        &self.config
    }

    pub fn flags(&self) -> &[FlagToken] {
        &self.flags
    }

    pub fn flag(&self, id: &str) -> Option<&FlagToken> {
        self.flags.iter().find(|f| f.id == id)
    }

    pub fn gap(&self) -> &GapController {
        &self.gap
    }

    /// Mutable gap access (e.g. to position a static gap)
    pub fn gap_mut(&mut self) -> &mut GapController {
        &mut self.gap
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<&RoundOutcome> {
        self.outcome.as_ref()
    }

    pub fn winner(&self) -> Option<&str> {
        self.outcome.as_ref().and_then(RoundOutcome::winner)
    }

    /// Identities in the order they left the arena
    pub fn eliminated(&self) -> &[String] {
        &self.log.order
    }

    pub fn active_count(&self) -> usize {
        self.flags.iter().filter(|f| f.is_active()).count()
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Read-only view for renderers
    pub fn snapshot(&self) -> EliminationSnapshot<'_> {
        EliminationSnapshot {
            phase: self.phase,
            elapsed_ms: self.elapsed_ms,
            arena_radius: self.config.arena_radius,
            max_center_distance: self.config.max_center_distance(),
            entity_size: self.config.entity_size,
            gap_angle: self.gap.angle,
            gap_width_deg: self.gap.width_deg,
            gap_edges: self.gap.edges(),
            flags: self
                .flags
                .iter()
                .map(|flag| FlagView {
                    flag,
                    appearance: flag.appearance(self.elapsed_ms),
                })
                .collect(),
            eliminated: &self.log.order,
            winner: self.winner(),
        }
    }
}

impl<R: Rng> RoundSim for EliminationSim<R> {
    fn start_round(&mut self, candidates: &[Candidate], count: usize) -> Result<(), ConfigError> {
        EliminationSim::start_round(self, candidates, count)
    }

    fn step(&mut self, dt_ms: f32) {
        EliminationSim::step(self, dt_ms)
    }

    fn phase(&self) -> RoundPhase {
        self.phase
    }

    fn outcome(&self) -> Option<&RoundOutcome> {
        self.outcome.as_ref()
    }
}

/// Per-frame state handed to the renderer
#[derive(Debug, Serialize)]
pub struct EliminationSnapshot<'a> {
    pub phase: RoundPhase,
    pub elapsed_ms: f64,
    pub arena_radius: f32,
    pub max_center_distance: f32,
    pub entity_size: f32,
    pub gap_angle: f32,
    pub gap_width_deg: f32,
    pub gap_edges: (f32, f32),
    pub flags: Vec<FlagView<'a>>,
    pub eliminated: &'a [String],
    pub winner: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct FlagView<'a> {
    #[serde(flatten)]
    pub flag: &'a FlagToken,
    pub appearance: Appearance,
}

/// Move an active flag from `prev` to `next` against the wall
///
/// Returns the wall crossing point when the flag leaves through the gap.
fn advance_flag(
    flag: &mut FlagToken,
    prev: Vec2,
    next: Vec2,
    gap: &GapController,
    config: &EliminationConfig,
) -> Option<Vec2> {
    let radius = config.arena_radius;
    let r_max = config.max_center_distance();
    let next_dist = next.length();

    if next_dist > radius {
        let crossing = boundary_crossing(prev, next, radius);
        if flag.committed || gap.contains_point(crossing) {
            return Some(crossing);
        }
        wall_hit(flag, prev, next, r_max);
    } else if next_dist > r_max {
        if !flag.committed {
            // Edge reaches into the wall: only where the path enters the gap
            let crossing = if prev.length() <= r_max {
                boundary_crossing(prev, next, r_max)
            } else {
                prev
            };
            flag.committed = gap.contains_point(crossing);
        }
        if flag.committed {
            flag.pos = next;
        } else {
            wall_hit(flag, prev, next, r_max);
        }
    } else {
        flag.committed = false;
        flag.pos = next;
    }

    contain(flag, r_max, radius);
    None
}

/// Bounce off the wall at the max-center-distance circle
fn wall_hit(flag: &mut FlagToken, prev: Vec2, next: Vec2, r_max: f32) {
    let contact = if prev.length() <= r_max {
        boundary_crossing(prev, next, r_max)
    } else {
        radial_normal(prev).map_or(Vec2::ZERO, |n| n * r_max)
    };
    flag.pos = contact;
    if let Some(normal) = radial_normal(contact) {
        if flag.vel.dot(normal) > 0.0 {
            flag.vel = reflect_velocity(flag.vel, normal);
        }
    }
}

/// Radial clamp: nominal radius once committed to the gap, max-center-distance
/// otherwise
///
/// Idempotent; floating point drift past the limit is corrected the next time
/// it runs.
fn contain(flag: &mut FlagToken, r_max: f32, radius: f32) {
    let Some(normal) = radial_normal(flag.pos) else {
        return;
    };
    let limit = if flag.committed { radius } else { r_max };
    if flag.pos.length() > limit {
        flag.pos = normal * limit;
        if !flag.committed && flag.vel.dot(normal) > 0.0 {
            flag.vel = reflect_velocity(flag.vel, normal);
        }
    }
}

fn begin_exit(flag: &mut FlagToken, crossing: Vec2, now_ms: f64, config: &EliminationConfig) {
    let normal = radial_normal(crossing)
        .or_else(|| flag.vel.try_normalize())
        .unwrap_or(Vec2::X);
    let origin = crossing + normal * EXIT_PUSH * config.arena_radius;
    flag.pos = origin;
    flag.phase = FlagPhase::Exiting {
        started_ms: now_ms,
        origin,
        velocity: flag.vel,
    };
}

/// Equal-mass elastic collision between two flags closer than `min_dist`
///
/// Exchanges the normal velocity components when the pair is closing and
/// separates them by half the overlap each. Returns true if resolved.
pub fn collide_pair(a: &mut FlagToken, b: &mut FlagToken, min_dist: f32) -> bool {
    let delta = b.pos - a.pos;
    let dist = delta.length();
    if dist >= min_dist || dist < EPSILON {
        return false; // Apart, or coincident with no usable normal
    }
    let normal = delta / dist;
    let closing = (b.vel - a.vel).dot(normal);
    if closing >= 0.0 {
        return false;
    }

    a.vel += normal * closing;
    b.vel -= normal * closing;

    let push = normal * ((min_dist - dist) * 0.5);
    a.pos -= push;
    b.pos += push;
    true
}

/// Row, column and resting position for the `slot`-th stacked flag
fn stack_slot(slot: usize, config: &EliminationConfig) -> (usize, usize, Vec2) {
    let per_row = config.stack_max_per_row;
    let row = slot / per_row;
    let column = slot % per_row;
    let center_offset = (per_row as f32 - 1.0) / 2.0;
    let x = (column as f32 - center_offset) * config.stack_spacing;
    let y = config.stack_line_y - row as f32 * config.stack_spacing;
    (row, column, Vec2::new(x, y))
}
