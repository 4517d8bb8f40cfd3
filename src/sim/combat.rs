//! Battle royale: fighters wander a rectangle with spinning swords
//!
//! Tick pipeline (order matters - sweeps use this tick's rotated weapons):
//! 1. Physics: spin weapons, wander (small random heading drift), bounce off
//!    walls, count down timers
//! 2. Collision: swept weapon tip vs every other alive body
//! 3. Winner check

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::entity::{Candidate, Fighter};
use super::geometry::segment_hits_circle;
use super::round::{RoundOutcome, RoundPhase, RoundSim, validate_candidates};
use crate::config::CombatConfig;
use crate::consts::*;
use crate::error::ConfigError;
use crate::{polar_to_cartesian, wrap_angle};

/// Combat game simulator
#[derive(Debug, Clone)]
pub struct CombatSim<R: Rng = Pcg32> {
    config: CombatConfig,
    rng: R,
    /// Sorted by id; dead fighters stay in place and are skipped
    fighters: Vec<Fighter>,
    phase: RoundPhase,
    outcome: Option<RoundOutcome>,
    /// Ids in the order they were knocked out
    defeated: Vec<String>,
    frame: u64,
}

impl CombatSim<Pcg32> {
    /// Create a simulator with a seeded PCG generator
    pub fn new(config: CombatConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> CombatSim<R> {
    /// Create a simulator drawing randomness from `rng`
    pub fn with_rng(config: CombatConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            fighters: Vec::new(),
            phase: RoundPhase::Idle,
            outcome: None,
            defeated: Vec::new(),
            frame: 0,
        })
    }

    /// Pick up to `count` (max 20) random candidates and spawn them on a jittered grid
    pub fn start_round(
        &mut self,
        candidates: &[Candidate],
        count: usize,
    ) -> Result<(), ConfigError> {
        validate_candidates(candidates, count)?;

        let mut picked: Vec<&Candidate> = candidates.iter().collect();
        picked.shuffle(&mut self.rng);
        picked.truncate(count.min(self.config.entity_cap()));

        let n = picked.len();
        let cols = (n as f32).sqrt().ceil().max(1.0) as usize;
        let rows = n.div_ceil(cols);
        let cell = Vec2::new(
            self.config.arena_width / cols as f32,
            self.config.arena_height / rows as f32,
        );
        let radius = self.config.body_radius;
        let jitter = ((cell * 0.5 - Vec2::splat(radius)) * 0.6).max(Vec2::ZERO);

        let mut fighters = Vec::with_capacity(n);
        for (index, candidate) in picked.into_iter().enumerate() {
            let grid = Vec2::new((index % cols) as f32, (index / cols) as f32);
            let center = (grid + Vec2::splat(0.5)) * cell;
            let offset = Vec2::new(
                self.rng.random_range(-1.0..=1.0) * jitter.x,
                self.rng.random_range(-1.0..=1.0) * jitter.y,
            );
            let pos = self.clamp_to_arena(center + offset, radius);

            let mut fighter = Fighter::new(candidate, pos, radius, self.config.weapon_length);
            let heading = self.rng.random_range(0.0..std::f32::consts::TAU);
            fighter.vel = polar_to_cartesian(
                self.rng.random_range(WANDER_MIN_SPEED..=WANDER_MAX_SPEED),
                heading,
            );
            fighter.weapon_angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            let spin = self.rng.random_range(WEAPON_MIN_SPIN..=WEAPON_MAX_SPIN);
            fighter.weapon_spin = if self.rng.random_bool(0.5) { spin } else { -spin };
            fighter.weapon_damage = self.config.weapon_damage;
            fighter.prev_tip = fighter.weapon_tip();
            fighters.push(fighter);
        }

        self.reset_round(fighters);
        log::info!(
            "Combat round started: {} fighters on a {}x{} grid",
            self.fighters.len(),
            cols,
            rows
        );
        Ok(())
    }

    /// Start a round with pre-built fighters (used for scripted scenarios)
    pub fn start_round_with(&mut self, fighters: Vec<Fighter>) -> Result<(), ConfigError> {
        if fighters.is_empty() {
            return Err(ConfigError::ZeroEntities);
        }
        let mut ids = std::collections::HashSet::with_capacity(fighters.len());
        for fighter in &fighters {
            if !ids.insert(fighter.id.as_str()) {
                return Err(ConfigError::DuplicateCandidate(fighter.id.clone()));
            }
        }
        self.reset_round(fighters);
        Ok(())
    }

    fn reset_round(&mut self, mut fighters: Vec<Fighter>) {
        // Attack order is by identity so rounds replay the same way
        fighters.sort_by(|a, b| a.id.cmp(&b.id));
        self.fighters = fighters;
        self.defeated.clear();
        self.outcome = None;
        self.frame = 0;
        self.phase = RoundPhase::Playing;
    }

    /// Advance one tick; `dt_ms` scales movement relative to a 60 Hz frame
    pub fn step(&mut self, dt_ms: f32) {
        if self.phase != RoundPhase::Playing {
            return;
        }
        self.frame += 1;
        let frame_scale = dt_ms.clamp(0.0, MAX_STEP_MS) / FRAME_MS;

        self.update_physics(frame_scale);
        self.update_collisions();
        self.check_winner();
    }

    /// Current speed factor including the late-round boost
    pub fn speed_factor(&self) -> f32 {
        let boost = if self.alive_count() <= self.config.late_round_threshold {
            self.config.late_round_speed_boost
        } else {
            1.0
        };
        self.config.speed_multiplier * boost
    }

    fn update_physics(&mut self, frame_scale: f32) {
        let speed = self.speed_factor() * frame_scale;
        let (width, height) = (self.config.arena_width, self.config.arena_height);

        for fighter in self.fighters.iter_mut().filter(|f| f.is_alive()) {
            fighter.prev_tip = fighter.weapon_tip();
            let wander = self.rng.random_range(-WANDER_JITTER..=WANDER_JITTER);
            fighter.vel = Vec2::from_angle(wander).rotate(fighter.vel);
            fighter.weapon_angle = wrap_angle(fighter.weapon_angle + fighter.weapon_spin * speed);
            fighter.pos += fighter.vel * speed;

            let r = fighter.radius;
            if fighter.pos.x < r {
                fighter.pos.x = r;
                fighter.vel.x = fighter.vel.x.abs();
            } else if fighter.pos.x > width - r {
                fighter.pos.x = width - r;
                fighter.vel.x = -fighter.vel.x.abs();
            }
            if fighter.pos.y < r {
                fighter.pos.y = r;
                fighter.vel.y = fighter.vel.y.abs();
            } else if fighter.pos.y > height - r {
                fighter.pos.y = height - r;
                fighter.vel.y = -fighter.vel.y.abs();
            }

            fighter.cooldown = fighter.cooldown.saturating_sub(1);
            fighter.hit_flash = fighter.hit_flash.saturating_sub(1);
        }
    }

    fn update_collisions(&mut self) {
        let damage_multiplier = self.config.damage_multiplier;
        let cooldown = self.config.hit_cooldown_frames;

        for attacker_idx in 0..self.fighters.len() {
            let attacker = &self.fighters[attacker_idx];
            if !attacker.is_alive() || attacker.cooldown > 0 {
                continue;
            }
            let (sweep_start, sweep_end) = (attacker.prev_tip, attacker.weapon_tip());
            let damage = attacker.weapon_damage * damage_multiplier;

            for target_idx in 0..self.fighters.len() {
                if target_idx == attacker_idx {
                    continue;
                }
                let target = &mut self.fighters[target_idx];
                if !target.is_alive() {
                    continue;
                }
                let reach = target.radius * HIT_RADIUS_TOLERANCE;
                if !segment_hits_circle(sweep_start, sweep_end, target.pos, reach) {
                    continue;
                }

                let killed = target.take_damage(damage);
                target.hit_flash = HIT_FLASH_FRAMES;
                if killed {
                    let target_id = target.id.clone();
                    log::debug!("{} knocked out {}", self.fighters[attacker_idx].id, target_id);
                    self.defeated.push(target_id);
                }

                let attacker = &mut self.fighters[attacker_idx];
                attacker.cooldown = cooldown;
                if attacker.cooldown > 0 || !attacker.is_alive() {
                    break;
                }
            }
        }
    }

    fn check_winner(&mut self) {
        let mut alive = self.fighters.iter().filter(|f| f.is_alive());
        match (alive.next(), alive.next()) {
            (Some(last), None) => {
                log::info!("{} wins the battle after {} frames", last.id, self.frame);
                self.outcome = Some(RoundOutcome::Winner(last.id.clone()));
                self.phase = RoundPhase::Finished;
            }
            (None, _) => {
                log::warn!("All fighters down on the same tick; no winner");
                self.outcome = Some(RoundOutcome::NoSurvivor);
                self.phase = RoundPhase::Finished;
            }
            _ => {}
        }
    }

    fn clamp_to_arena(&self, pos: Vec2, radius: f32) -> Vec2 {
        pos.clamp(
            Vec2::splat(radius),
            Vec2::new(
                self.config.arena_width - radius,
                self.config.arena_height - radius,
            ),
        )
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn fighters(&self) -> &[Fighter] {
        &self.fighters
    }

    pub fn fighter(&self, id: &str) -> Option<&Fighter> {
        self.fighters.iter().find(|f| f.id == id)
    }

    pub fn alive_count(&self) -> usize {
        self.fighters.iter().filter(|f| f.is_alive()).count()
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

    /// Ids in knock-out order
    pub fn defeated(&self) -> &[String] {
        &self.defeated
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Read-only view for renderers
    pub fn snapshot(&self) -> CombatSnapshot<'_> {
        CombatSnapshot {
            phase: self.phase,
            frame: self.frame,
            arena_width: self.config.arena_width,
            arena_height: self.config.arena_height,
            fighters: self
                .fighters
                .iter()
                .map(|fighter| FighterView {
                    fighter,
                    alive: fighter.is_alive(),
                    weapon_tip: fighter.weapon_tip(),
                })
                .collect(),
            defeated: &self.defeated,
            winner: self.winner(),
        }
    }
}

impl<R: Rng> RoundSim for CombatSim<R> {
    fn start_round(&mut self, candidates: &[Candidate], count: usize) -> Result<(), ConfigError> {
        CombatSim::start_round(self, candidates, count)
    }

    fn step(&mut self, dt_ms: f32) {
        CombatSim::step(self, dt_ms)
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
pub struct CombatSnapshot<'a> {
    pub phase: RoundPhase,
    pub frame: u64,
    pub arena_width: f32,
    pub arena_height: f32,
    pub fighters: Vec<FighterView<'a>>,
    pub defeated: &'a [String],
    pub winner: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct FighterView<'a> {
    #[serde(flatten)]
    pub fighter: &'a Fighter,
    pub alive: bool,
    pub weapon_tip: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn roster(n: usize) -> Vec<Candidate> {
        (0..n)
            .map(|i| Candidate::new(format!("c{i:02}"), format!("Country {i}"), "🏳"))
            .collect()
    }

    /// Motionless fighter with its sword pointing along `angle`
    fn still_fighter(id: &str, pos: Vec2, angle: f32, damage: f32) -> Fighter {
        let mut fighter = Fighter::new(&Candidate::new(id, id, "🏳"), pos, 22.0, 34.0);
        fighter.weapon_angle = angle;
        fighter.weapon_damage = damage;
        fighter.prev_tip = fighter.weapon_tip();
        fighter
    }

    #[test]
    fn test_grid_spawn_within_bounds_and_capped() {
        let mut sim = CombatSim::new(CombatConfig::default(), 42).unwrap();
        sim.start_round(&roster(30), 30).unwrap();
        assert_eq!(sim.fighters().len(), COMBAT_ENTITY_CAP);
        let config = sim.config().clone();
        for fighter in sim.fighters() {
            let r = fighter.radius;
            assert!(fighter.pos.x >= r && fighter.pos.x <= config.arena_width - r);
            assert!(fighter.pos.y >= r && fighter.pos.y <= config.arena_height - r);
            assert_eq!(fighter.life, MAX_LIFE);
            assert!(fighter.weapon_spin.abs() >= WEAPON_MIN_SPIN);
        }
        let ids: Vec<&str> = sim.fighters().iter().map(|f| f.id.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_single_hit_then_cooldown() {
        let config = CombatConfig {
            hit_cooldown_frames: 10,
            ..Default::default()
        };
        let mut sim = CombatSim::new(config, 1).unwrap();
        // Attacker's tip at (256, 300) sits inside the target's body
        let attacker = still_fighter("a", Vec2::new(200.0, 300.0), 0.0, 10.0);
        let target = still_fighter("b", Vec2::new(270.0, 300.0), 0.0, 0.0);
        sim.start_round_with(vec![target, attacker]).unwrap();

        sim.step(FRAME_MS);
        assert_eq!(sim.fighter("b").unwrap().life, 90.0);
        assert_eq!(sim.fighter("a").unwrap().cooldown, 10);
        assert_eq!(sim.fighter("b").unwrap().hit_flash, HIT_FLASH_FRAMES);

        sim.step(FRAME_MS);
        assert_eq!(sim.fighter("b").unwrap().life, 90.0);
        assert_eq!(sim.fighter("a").unwrap().cooldown, 9);
    }

    #[test]
    fn test_two_attackers_hit_same_target_in_one_tick() {
        let config = CombatConfig {
            hit_cooldown_frames: 10,
            ..Default::default()
        };
        let mut sim = CombatSim::new(config, 1).unwrap();
        // Tips at (286, 300) and (314, 300), both inside the target's body
        let left = still_fighter("a", Vec2::new(230.0, 300.0), 0.0, 10.0);
        let right = still_fighter("b", Vec2::new(370.0, 300.0), PI, 25.0);
        let target = still_fighter("c", Vec2::new(300.0, 300.0), FRAC_PI_2, 0.0);
        sim.start_round_with(vec![right, target, left]).unwrap();

        sim.step(FRAME_MS);
        let target = sim.fighter("c").unwrap();
        assert_eq!(target.life, 65.0);
        assert_eq!(target.hit_flash, HIT_FLASH_FRAMES);
        assert_eq!(sim.fighter("a").unwrap().cooldown, 10);
        assert_eq!(sim.fighter("b").unwrap().cooldown, 10);
    }

    #[test]
    fn test_attackers_strike_in_id_order() {
        let config = CombatConfig {
            hit_cooldown_frames: 10,
            ..Default::default()
        };
        let mut sim = CombatSim::new(config, 1).unwrap();
        let left = still_fighter("a", Vec2::new(230.0, 300.0), 0.0, 10.0);
        let right = still_fighter("b", Vec2::new(370.0, 300.0), PI, 25.0);
        let mut target = still_fighter("c", Vec2::new(300.0, 300.0), FRAC_PI_2, 0.0);
        target.life = 10.0;
        // Listed out of order; "a" still swings first and takes the kill
        sim.start_round_with(vec![right, target, left]).unwrap();
        let order: Vec<&str> = sim.fighters().iter().map(|f| f.id.as_str()).collect();
        assert_eq!(order, ["a", "b", "c"]);

        sim.step(FRAME_MS);
        assert_eq!(sim.fighter("c").unwrap().life, 0.0);
        assert_eq!(sim.defeated(), ["c".to_string()]);
        assert_eq!(sim.fighter("a").unwrap().cooldown, 10);
        // Nothing left alive in reach, so "b" never connects
        assert_eq!(sim.fighter("b").unwrap().cooldown, 0);
        assert_eq!(sim.phase(), RoundPhase::Playing);
    }

    /// Every draw is zero, so each range sample lands on its lower bound
    struct ZeroRng;

    impl RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0);
        }
    }

    #[test]
    fn test_injected_rng_drives_spawn() {
        let mut sim = CombatSim::with_rng(CombatConfig::default(), ZeroRng).unwrap();
        sim.start_round(&roster(1), 1).unwrap();

        // Single grid cell centered at (400, 300), jitter pulled to its minimum
        let fighter = &sim.fighters()[0];
        let jitter = Vec2::new((400.0 - 22.0) * 0.6, (300.0 - 22.0) * 0.6);
        assert!((fighter.pos - (Vec2::new(400.0, 300.0) - jitter)).length() < 1e-3);
        assert!((fighter.vel - Vec2::new(WANDER_MIN_SPEED, 0.0)).length() < 1e-5);
        assert!(fighter.weapon_angle.abs() < 1e-6);
        assert!((fighter.weapon_spin.abs() - WEAPON_MIN_SPIN).abs() < 1e-6);
    }

    #[test]
    fn test_hit_again_after_cooldown_expires() {
        let config = CombatConfig {
            hit_cooldown_frames: 3,
            ..Default::default()
        };
        let mut sim = CombatSim::new(config, 1).unwrap();
        sim.start_round_with(vec![
            still_fighter("a", Vec2::new(200.0, 300.0), 0.0, 10.0),
            still_fighter("b", Vec2::new(270.0, 300.0), 0.0, 0.0),
        ])
        .unwrap();
        // Hit on tick 1, cooldown 3 → 2, 1, 0 → hit again on tick 4
        for _ in 0..4 {
            sim.step(FRAME_MS);
        }
        assert_eq!(sim.fighter("b").unwrap().life, 80.0);
    }

    #[test]
    fn test_damage_multiplier_applies() {
        let config = CombatConfig {
            damage_multiplier: 2.5,
            ..Default::default()
        };
        let mut sim = CombatSim::new(config, 1).unwrap();
        sim.start_round_with(vec![
            still_fighter("a", Vec2::new(200.0, 300.0), 0.0, 10.0),
            still_fighter("b", Vec2::new(270.0, 300.0), 0.0, 0.0),
        ])
        .unwrap();
        sim.step(FRAME_MS);
        assert_eq!(sim.fighter("b").unwrap().life, 75.0);
    }

    #[test]
    fn test_life_floors_and_death_flips_once() {
        let config = CombatConfig {
            hit_cooldown_frames: 0,
            ..Default::default()
        };
        let mut sim = CombatSim::new(config, 1).unwrap();
        sim.start_round_with(vec![
            still_fighter("a", Vec2::new(200.0, 300.0), 0.0, 30.0),
            still_fighter("b", Vec2::new(270.0, 300.0), 0.0, 0.0),
        ])
        .unwrap();

        for expected in [70.0, 40.0, 10.0] {
            sim.step(FRAME_MS);
            let target = sim.fighter("b").unwrap();
            assert_eq!(target.life, expected);
            assert!(target.is_alive());
            assert_eq!(sim.phase(), RoundPhase::Playing);
        }

        sim.step(FRAME_MS);
        let target = sim.fighter("b").unwrap();
        assert_eq!(target.life, 0.0);
        assert!(!target.is_alive());
        assert_eq!(sim.defeated(), ["b".to_string()]);
        assert_eq!(sim.winner(), Some("a"));
        assert_eq!(sim.phase(), RoundPhase::Finished);

        // Finished rounds are frozen
        sim.step(FRAME_MS);
        assert_eq!(sim.fighter("b").unwrap().life, 0.0);
    }

    #[test]
    fn test_swept_tip_hits_between_frames() {
        let config = CombatConfig {
            late_round_speed_boost: 1.0,
            ..Default::default()
        };
        let mut sim = CombatSim::new(config, 1).unwrap();
        // Reach is 56; the tip swings from -0.5 rad to +0.5 rad past a body
        // centered straight ahead, with both endpoints outside it
        let mut attacker = still_fighter("a", Vec2::new(200.0, 300.0), -0.5, 10.0);
        attacker.weapon_spin = 1.0;
        let target = still_fighter("b", Vec2::new(256.0, 300.0), PI, 0.0);

        let reach = target.radius * HIT_RADIUS_TOLERANCE;
        let start_tip = attacker.weapon_tip();
        let end_tip = Vec2::new(200.0, 300.0) + polar_to_cartesian(56.0, 0.5);
        assert!(start_tip.distance(target.pos) > reach);
        assert!(end_tip.distance(target.pos) > reach);

        sim.start_round_with(vec![attacker, target]).unwrap();
        sim.step(FRAME_MS);
        assert_eq!(sim.fighter("b").unwrap().life, 90.0);
    }

    #[test]
    fn test_wall_bounce_reflects_axis() {
        let mut sim = CombatSim::new(CombatConfig::default(), 1).unwrap();
        let mut runner = still_fighter("a", Vec2::new(777.0, 300.0), 0.0, 0.0);
        runner.weapon_length = 0.0;
        runner.vel = Vec2::new(1.5, 0.5);
        let bystander = still_fighter("b", Vec2::new(100.0, 100.0), 0.0, 0.0);
        sim.start_round_with(vec![runner, bystander]).unwrap();

        sim.step(FRAME_MS);
        let runner = sim.fighter("a").unwrap();
        assert_eq!(runner.pos.x, 800.0 - runner.radius);
        assert!(runner.vel.x < 0.0);
        assert!(runner.vel.y > 0.0);
    }

    #[test]
    fn test_late_round_speed_boost() {
        let mut sim = CombatSim::new(CombatConfig::default(), 1).unwrap();
        let fighters: Vec<Fighter> = (0..6)
            .map(|i| {
                let pos = Vec2::new(60.0 + i as f32 * 110.0, 300.0);
                still_fighter(&format!("f{i}"), pos, 1.5, 0.0)
            })
            .collect();
        sim.start_round_with(fighters).unwrap();
        assert_eq!(sim.speed_factor(), 1.0);

        let mut fighters = sim.fighters().to_vec();
        fighters[0].life = 0.0;
        sim.start_round_with(fighters).unwrap();
        assert_eq!(sim.alive_count(), 5);
        assert_eq!(sim.speed_factor(), 20.0);
    }

    #[test]
    fn test_dead_fighters_are_skipped() {
        let mut sim = CombatSim::new(CombatConfig::default(), 1).unwrap();
        let mut dead = still_fighter("a", Vec2::new(200.0, 300.0), 0.0, 50.0);
        dead.life = 0.0;
        dead.vel = Vec2::new(1.0, 0.0);
        let target = still_fighter("b", Vec2::new(270.0, 300.0), PI, 0.0);
        let other = still_fighter("c", Vec2::new(600.0, 500.0), 0.0, 0.0);
        sim.start_round_with(vec![dead, target, other]).unwrap();

        sim.step(FRAME_MS);
        assert_eq!(sim.fighter("a").unwrap().pos, Vec2::new(200.0, 300.0));
        assert_eq!(sim.fighter("b").unwrap().life, MAX_LIFE);
    }

    #[test]
    fn test_full_round_has_one_winner() {
        let mut sim = CombatSim::new(CombatConfig::default(), 2024).unwrap();
        sim.start_round(&roster(8), 8).unwrap();
        for _ in 0..200_000 {
            sim.step(FRAME_MS);
            for fighter in sim.fighters() {
                assert!(fighter.life >= 0.0);
                assert_eq!(fighter.is_alive(), fighter.life > 0.0);
            }
            if sim.phase() == RoundPhase::Finished {
                break;
            }
        }
        assert_eq!(sim.phase(), RoundPhase::Finished);
        match sim.outcome() {
            Some(RoundOutcome::Winner(id)) => {
                assert!(sim.fighter(id).unwrap().is_alive());
                assert_eq!(sim.alive_count(), 1);
                assert_eq!(sim.defeated().len(), 7);
            }
            Some(RoundOutcome::NoSurvivor) => assert_eq!(sim.alive_count(), 0),
            None => unreachable!(),
        }
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut sim = CombatSim::new(CombatConfig::default(), 3).unwrap();
        sim.start_round(&roster(4), 4).unwrap();
        sim.step(FRAME_MS);
        let json = serde_json::to_string(&sim.snapshot()).unwrap();
        assert!(json.contains("\"weapon_tip\""));
        assert!(json.contains("\"alive\":true"));
    }
}
