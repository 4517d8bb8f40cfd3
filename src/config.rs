//! Simulator configuration
//!
//! Every field is optional when loaded from JSON; missing fields fall back to
//! the defaults documented on each `Default` impl.

use serde::{Deserialize, Serialize};

use crate::consts::COMBAT_ENTITY_CAP;
use crate::error::{ConfigError, ensure_non_negative, ensure_positive, ensure_range};

/// Elimination ("last flag standing") game configuration
///
/// Distances are in normalized arena units: the arena is a circle of
/// `arena_radius` centered on the origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EliminationConfig {
    // === Arena ===
    /// Visual radius of the circular wall
    pub arena_radius: f32,
    /// Flag diameter
    pub entity_size: f32,
    /// Spawn disc radius as a fraction of the max center distance
    pub placement_radius_fraction: f32,
    /// Maximum flags per round
    pub max_entities: usize,

    // === Motion ===
    /// Global speed multiplier
    pub speed_multiplier: f32,
    /// Initial speed range (arena units per second)
    pub min_speed: f32,
    pub max_speed: f32,
    /// Interval between random heading changes (0 disables)
    pub velocity_change_interval_ms: f32,
    /// Largest heading change applied per interval (degrees)
    pub velocity_change_max_angle_deg: f32,

    // === Gap ===
    /// Angular width of the exit gap (degrees, >= 360 means no wall)
    pub gap_width_deg: f32,
    /// Whether the gap rotates
    pub gap_rotation_enabled: bool,
    /// User speed multiplier applied to gap rotation
    pub gap_rotation_speed: f32,

    // === Eliminated flags ===
    /// Vertical line eliminated flags fall to
    pub stack_line_y: f32,
    /// Distance between stacked flags
    pub stack_spacing: f32,
    /// Flags per stack row
    pub stack_max_per_row: usize,
    /// Fall acceleration (units per second squared)
    pub gravity: f32,
    /// Terminal fall speed (units per second)
    pub max_fall_speed: f32,
}

impl Default for EliminationConfig {
    fn default() -> Self {
        Self {
            arena_radius: 1.0,
            entity_size: 0.12,
            placement_radius_fraction: 0.6,
            max_entities: 64,

            speed_multiplier: 1.0,
            min_speed: 0.35,
            max_speed: 0.6,
            velocity_change_interval_ms: 3000.0,
            velocity_change_max_angle_deg: 35.0,

            gap_width_deg: 35.0,
            gap_rotation_enabled: true,
            gap_rotation_speed: 1.0,

            stack_line_y: 1.55,
            stack_spacing: 0.13,
            stack_max_per_row: 8,
            gravity: 3.5,
            max_fall_speed: 2.5,
        }
    }
}

impl EliminationConfig {
    /// Parse from JSON (missing fields use defaults) and validate
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would produce degenerate geometry or NaNs
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("arena_radius", self.arena_radius)?;
        ensure_positive("entity_size", self.entity_size)?;
        if self.entity_size >= self.arena_radius {
            return Err(ConfigError::EntityTooLarge {
                size: self.entity_size,
                radius: self.arena_radius,
            });
        }
        ensure_range(
            "placement_radius_fraction",
            self.placement_radius_fraction,
            0.0,
            1.0,
        )?;
        if self.max_entities == 0 {
            return Err(ConfigError::ZeroEntities);
        }
        ensure_non_negative("speed_multiplier", self.speed_multiplier)?;
        ensure_non_negative("min_speed", self.min_speed)?;
        ensure_range("max_speed", self.max_speed, self.min_speed, f32::MAX)?;
        ensure_non_negative("velocity_change_interval_ms", self.velocity_change_interval_ms)?;
        ensure_range(
            "velocity_change_max_angle_deg",
            self.velocity_change_max_angle_deg,
            0.0,
            180.0,
        )?;
        ensure_positive("gap_width_deg", self.gap_width_deg)?;
        ensure_non_negative("gap_rotation_speed", self.gap_rotation_speed)?;
        ensure_positive("stack_spacing", self.stack_spacing)?;
        if self.stack_max_per_row == 0 {
            return Err(ConfigError::NonPositive {
                name: "stack_max_per_row",
                value: 0.0,
            });
        }
        ensure_positive("gravity", self.gravity)?;
        ensure_positive("max_fall_speed", self.max_fall_speed)?;
        if !self.stack_line_y.is_finite() {
            return Err(ConfigError::NonPositive {
                name: "stack_line_y",
                value: self.stack_line_y,
            });
        }
        Ok(())
    }

    /// Furthest a flag's center may sit from the arena center (wall minus half size)
    #[inline]
    pub fn max_center_distance(&self) -> f32 {
        self.arena_radius - self.entity_size / 2.0
    }
}

/// Battle royale (sword combat) game configuration
///
/// Distances are in pixels of a `arena_width` x `arena_height` rectangle with
/// the origin at the top-left corner. Rates are per 60 Hz frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub arena_width: f32,
    pub arena_height: f32,
    /// Global speed multiplier (movement and weapon spin)
    pub speed_multiplier: f32,
    /// Global damage multiplier
    pub damage_multiplier: f32,
    /// Frames an attacker must wait after landing a hit
    pub hit_cooldown_frames: u32,
    /// Fighter body radius
    pub body_radius: f32,
    /// Weapon reach beyond the body edge
    pub weapon_length: f32,
    /// Damage per hit before the global multiplier
    pub weapon_damage: f32,
    /// Fighters per round (capped at 20)
    pub max_entities: usize,
    /// Alive count at or below which the late-round boost kicks in
    pub late_round_threshold: usize,
    /// Speed factor applied during the late round
    pub late_round_speed_boost: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            arena_width: 800.0,
            arena_height: 600.0,
            speed_multiplier: 1.0,
            damage_multiplier: 1.0,
            hit_cooldown_frames: 10,
            body_radius: 22.0,
            weapon_length: 34.0,
            weapon_damage: 10.0,
            max_entities: COMBAT_ENTITY_CAP,
            late_round_threshold: 5,
            late_round_speed_boost: 20.0,
        }
    }
}

impl CombatConfig {
    /// Parse from JSON (missing fields use defaults) and validate
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("arena_width", self.arena_width)?;
        ensure_positive("arena_height", self.arena_height)?;
        ensure_positive("body_radius", self.body_radius)?;
        let smallest_side = self.arena_width.min(self.arena_height);
        if self.body_radius * 2.0 >= smallest_side {
            return Err(ConfigError::EntityTooLarge {
                size: self.body_radius * 2.0,
                radius: smallest_side / 2.0,
            });
        }
        ensure_non_negative("speed_multiplier", self.speed_multiplier)?;
        ensure_non_negative("damage_multiplier", self.damage_multiplier)?;
        ensure_non_negative("weapon_length", self.weapon_length)?;
        ensure_non_negative("weapon_damage", self.weapon_damage)?;
        if self.max_entities == 0 {
            return Err(ConfigError::ZeroEntities);
        }
        ensure_range(
            "late_round_speed_boost",
            self.late_round_speed_boost,
            1.0,
            f32::MAX,
        )?;
        Ok(())
    }

    /// Entities per round after the hard performance cap
    #[inline]
    pub fn entity_cap(&self) -> usize {
        self.max_entities.min(COMBAT_ENTITY_CAP)
    }
}
