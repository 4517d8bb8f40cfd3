//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One synchronous step per animation frame
//! - Seeded (or injected) RNG only
//! - Stable iteration order (combat attackers ordered by id)
//! - No rendering or platform dependencies

pub mod combat;
pub mod elimination;
pub mod entity;
pub mod gap;
pub mod geometry;
pub mod round;

pub use combat::{CombatSim, CombatSnapshot, FighterView};
pub use elimination::{EliminationSim, EliminationSnapshot, FlagView, collide_pair};
pub use entity::{Appearance, Candidate, Fighter, FlagPhase, FlagToken};
pub use gap::{GapController, SpinDirection};
pub use geometry::{
    boundary_crossing, point_in_circle, point_in_gap, reflect_velocity, segment_hits_circle,
};
pub use round::{RoundOutcome, RoundPhase, RoundSim, Session};
