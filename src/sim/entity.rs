//! Entity model for both games
//!
//! A flag token moves through a strict phase sequence
//! (active → exiting → falling → stacked) where each phase carries only its own
//! data. A fighter is a sword-spinning body with life and hit cooldown.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{EXIT_DURATION_MS, MAX_LIFE};

/// Someone who can be picked into a round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Unique identity (tallies and elimination order key on it)
    pub id: String,
    /// Display name
    pub name: String,
    /// Display glyph (flag emoji or similar)
    pub glyph: String,
}

impl Candidate {
    pub fn new(id: impl Into<String>, name: impl Into<String>, glyph: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            glyph: glyph.into(),
        }
    }
}

/// Lifecycle phase of a flag token
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum FlagPhase {
    /// Bouncing inside the arena
    Active,
    /// Flying out through the gap
    Exiting {
        /// Simulation time the flag crossed the wall (ms)
        started_ms: f64,
        /// Exit point, nudged outward past the wall
        origin: Vec2,
        /// Velocity at the moment of crossing
        velocity: Vec2,
    },
    /// Dropping toward the stack line under gravity
    Falling {
        velocity_y: f32,
        drift_x: f32,
        rotation: f32,
        opacity: f32,
    },
    /// Resting in the pile of eliminated flags (terminal)
    Stacked {
        row: usize,
        column: usize,
        rotation: f32,
        opacity: f32,
    },
}

/// Cosmetic rendering hints derived from phase state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    pub rotation: f32,
    pub scale: f32,
    pub opacity: f32,
    /// Vertical offset for the idle bob of stacked flags
    pub bob: f32,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            scale: 1.0,
            opacity: 1.0,
            bob: 0.0,
        }
    }
}

/// Elimination-game entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagToken {
    pub id: String,
    pub name: String,
    pub glyph: String,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Position in the elimination order, assigned once on exit
    pub elimination_order: Option<u32>,
    /// Passed the inner wall limit inside the gap; leaves at the next wall
    /// crossing even if the gap has rotated away meanwhile
    #[serde(default)]
    pub committed: bool,
    #[serde(flatten)]
    pub phase: FlagPhase,
}

impl FlagToken {
    pub fn new(candidate: &Candidate, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id: candidate.id.clone(),
            name: candidate.name.clone(),
            glyph: candidate.glyph.clone(),
            pos,
            vel,
            elimination_order: None,
            committed: false,
            phase: FlagPhase::Active,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self.phase, FlagPhase::Active)
    }

    /// Has left the arena (exiting, falling or stacked)
    #[inline]
    pub fn is_eliminated(&self) -> bool {
        !self.is_active()
    }

    /// Rotation/scale/opacity for renderers at simulation time `now_ms`
    pub fn appearance(&self, now_ms: f64) -> Appearance {
        match self.phase {
            FlagPhase::Active => Appearance::default(),
            FlagPhase::Exiting {
                started_ms,
                velocity,
                ..
            } => {
                let t = ((now_ms - started_ms) / EXIT_DURATION_MS).clamp(0.0, 1.0) as f32;
                let spin = if velocity.x < 0.0 { -1.0 } else { 1.0 };
                Appearance {
                    rotation: spin * t * std::f32::consts::FRAC_PI_4,
                    scale: 1.0 + 0.25 * t,
                    opacity: 1.0 - 0.15 * t,
                    bob: 0.0,
                }
            }
            FlagPhase::Falling {
                rotation, opacity, ..
            } => Appearance {
                rotation,
                scale: 1.0,
                opacity,
                bob: 0.0,
            },
            FlagPhase::Stacked {
                row,
                column,
                rotation,
                opacity,
            } => {
                let phase = (row * 3 + column) as f64 * 0.7;
                Appearance {
                    rotation,
                    scale: 1.0,
                    opacity,
                    bob: ((now_ms / 600.0 + phase).sin() * 0.006) as f32,
                }
            }
        }
    }
}

/// Combat-game entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fighter {
    pub id: String,
    pub name: String,
    pub glyph: String,
    pub pos: Vec2,
    /// Body radius
    pub radius: f32,
    /// Wander velocity (px per frame)
    pub vel: Vec2,
    /// Current weapon angle (radians)
    pub weapon_angle: f32,
    /// Weapon angular velocity (radians per frame, signed, fixed at spawn)
    pub weapon_spin: f32,
    /// Reach beyond the body edge
    pub weapon_length: f32,
    pub weapon_damage: f32,
    /// 0..=100
    pub life: f32,
    /// Frames until this fighter may land another hit
    pub cooldown: u32,
    /// Frames of hit flash left (cosmetic)
    pub hit_flash: u32,
    /// Weapon tip position at the start of the current tick
    pub prev_tip: Vec2,
}

impl Fighter {
    pub fn new(candidate: &Candidate, pos: Vec2, radius: f32, weapon_length: f32) -> Self {
        let mut fighter = Self {
            id: candidate.id.clone(),
            name: candidate.name.clone(),
            glyph: candidate.glyph.clone(),
            pos,
            radius,
            vel: Vec2::ZERO,
            weapon_angle: 0.0,
            weapon_spin: 0.0,
            weapon_length,
            weapon_damage: 0.0,
            life: MAX_LIFE,
            cooldown: 0,
            hit_flash: 0,
            prev_tip: Vec2::ZERO,
        };
        fighter.prev_tip = fighter.weapon_tip();
        fighter
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Weapon tip in world space
    #[inline]
    pub fn weapon_tip(&self) -> Vec2 {
        let reach = self.radius + self.weapon_length;
        self.pos + Vec2::new(self.weapon_angle.cos(), self.weapon_angle.sin()) * reach
    }

    /// Apply damage, flooring life at zero. Returns true if this hit was the kill.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        let was_alive = self.is_alive();
        self.life = (self.life - amount).max(0.0);
        was_alive && !self.is_alive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate() -> Candidate {
        Candidate::new("jp", "Japan", "🇯🇵")
    }

    #[test]
    fn test_new_flag_is_active() {
        let flag = FlagToken::new(&candidate(), Vec2::ZERO, Vec2::X);
        assert!(flag.is_active());
        assert!(!flag.is_eliminated());
        assert_eq!(flag.elimination_order, None);
        assert_eq!(flag.appearance(0.0), Appearance::default());
    }

    #[test]
    fn test_exit_appearance_eases() {
        let mut flag = FlagToken::new(&candidate(), Vec2::ZERO, Vec2::X);
        flag.phase = FlagPhase::Exiting {
            started_ms: 1000.0,
            origin: Vec2::X,
            velocity: Vec2::new(-1.0, 0.0),
        };
        let start = flag.appearance(1000.0);
        let end = flag.appearance(1000.0 + EXIT_DURATION_MS * 2.0);
        assert_eq!(start.scale, 1.0);
        assert!((end.scale - 1.25).abs() < 1e-6);
        assert!(end.rotation < 0.0);
    }

    #[test]
    fn test_fighter_weapon_tip() {
        let mut fighter = Fighter::new(&candidate(), Vec2::new(100.0, 50.0), 20.0, 30.0);
        assert!((fighter.weapon_tip() - Vec2::new(150.0, 50.0)).length() < 1e-4);
        assert_eq!(fighter.prev_tip, fighter.weapon_tip());
        fighter.weapon_angle = std::f32::consts::FRAC_PI_2;
        assert!((fighter.weapon_tip() - Vec2::new(100.0, 100.0)).length() < 1e-4);
    }

    #[test]
    fn test_damage_floors_at_zero() {
        let mut fighter = Fighter::new(&candidate(), Vec2::ZERO, 20.0, 30.0);
        assert!(!fighter.take_damage(60.0));
        assert!(fighter.is_alive());
        assert!(fighter.take_damage(60.0));
        assert_eq!(fighter.life, 0.0);
        assert!(!fighter.is_alive());
        // Overkill on a corpse is not a second kill
        assert!(!fighter.take_damage(10.0));
        assert_eq!(fighter.life, 0.0);
    }

    #[test]
    fn test_flag_serializes_phase_tag() {
        let flag = FlagToken::new(&candidate(), Vec2::ZERO, Vec2::ZERO);
        let json = serde_json::to_string(&flag).unwrap();
        assert!(json.contains(r#""phase":"active""#));
    }
}
