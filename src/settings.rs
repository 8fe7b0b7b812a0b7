//! Simulation settings
//!
//! Every tunable the core reads, fixed at construction. Loaded from JSON on
//! native hosts or handed over as a JSON string by the web host.

use std::path::Path;

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::GridMapping;

/// World units two grids' bounds may differ by and still count as the same rectangle
const GRID_COVERAGE_EPSILON: f32 = 1e-3;

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(&'static str),
}

/// Resolution and world-to-grid mapping of one raster
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub width: u32,
    pub height: u32,
    /// Grid cells per world unit, per axis
    pub scale: Vec2,
    /// Grid coordinate of the world origin
    pub offset: Vec2,
}

impl GridSpec {
    /// `width x height` cells over the square `[-half_extent, half_extent]^2`
    pub fn centered(width: u32, height: u32, half_extent: f32) -> Self {
        let mapping = GridMapping::centered(half_extent, width, height);
        Self {
            width,
            height,
            scale: mapping.scale,
            offset: mapping.offset,
        }
    }

    pub fn mapping(&self) -> GridMapping {
        GridMapping::new(self.scale, self.offset)
    }

    /// World rectangle covered, as (min, max)
    pub fn world_bounds(&self) -> (Vec2, Vec2) {
        let mapping = self.mapping();
        let a = mapping.to_world(Vec2::ZERO);
        let b = mapping.to_world(Vec2::new(self.width as f32, self.height as f32));
        (a.min(b), a.max(b))
    }
}

/// Rectangle the player is allowed to walk in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self {
            min_x: -WORLD_HALF_EXTENT,
            max_x: WORLD_HALF_EXTENT,
            min_y: -WORLD_HALF_EXTENT,
            max_y: 7.3,
        }
    }
}

impl ArenaBounds {
    /// Strictly inside (edges excluded)
    pub fn contains(&self, p: Vec2) -> bool {
        p.x > self.min_x && p.x < self.max_x && p.y > self.min_y && p.y < self.max_y
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Terrain ===
    pub height_grid: GridSpec,
    pub color_grid: GridSpec,
    /// Height every cell starts at
    pub initial_height: f32,
    /// Height removed per first contact
    pub dig_delta: f32,

    // === Bots ===
    pub bot_count: usize,
    pub bot_mass: f32,
    /// World distance a bot covers per tick
    pub bot_speed: f32,
    /// Side of the square bots spawn in, centered on the origin
    pub bot_spawn_extent: f32,
    /// Per-channel tolerance when testing ground against the player's color
    pub color_tolerance: f32,

    // === Player ===
    pub player_color: Vec4,
    pub player_step: f32,
    pub player_turn: f32,
    pub arena: ArenaBounds,

    // === Particles ===
    pub particle_capacity: usize,
    pub particle_speed_scale: f32,

    /// Seed for every random draw
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // 64x64 heights, 192x192 colors over the same 15x15 square
            height_grid: GridSpec::centered(HEIGHT_GRID_SIZE, HEIGHT_GRID_SIZE, WORLD_HALF_EXTENT),
            color_grid: GridSpec::centered(
                HEIGHT_GRID_SIZE * COLOR_GRID_FACTOR,
                HEIGHT_GRID_SIZE * COLOR_GRID_FACTOR,
                WORLD_HALF_EXTENT,
            ),
            initial_height: INITIAL_HEIGHT,
            dig_delta: DIG_DELTA,

            bot_count: BOT_COUNT,
            bot_mass: BOT_MASS,
            bot_speed: BOT_SPEED,
            bot_spawn_extent: WORLD_HALF_EXTENT,
            color_tolerance: COLOR_TOLERANCE,

            player_color: Vec4::new(0.9, 0.2, 0.1, 1.0),
            player_step: PLAYER_STEP,
            player_turn: PLAYER_TURN,
            arena: ArenaBounds::default(),

            particle_capacity: PARTICLE_CAPACITY,
            particle_speed_scale: PARTICLE_SPEED_SCALE,

            seed: 42,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        for grid in [&self.height_grid, &self.color_grid] {
            if grid.width == 0 || grid.height == 0 {
                return Err(SettingsError::Invalid("grid dimensions must be non-zero"));
            }
            if !(grid.scale.x > 0.0 && grid.scale.y > 0.0) {
                return Err(SettingsError::Invalid("grid scale must be positive"));
            }
        }
        let (h_min, h_max) = self.height_grid.world_bounds();
        let (c_min, c_max) = self.color_grid.world_bounds();
        if !(h_min.abs_diff_eq(c_min, GRID_COVERAGE_EPSILON)
            && h_max.abs_diff_eq(c_max, GRID_COVERAGE_EPSILON))
        {
            return Err(SettingsError::Invalid(
                "height and color grids must cover the same world rectangle",
            ));
        }
        if !(self.dig_delta >= 0.0) {
            return Err(SettingsError::Invalid("dig_delta must be non-negative"));
        }
        if !(self.bot_speed >= 0.0) {
            return Err(SettingsError::Invalid("bot_speed must be non-negative"));
        }
        if !(self.color_tolerance >= 0.0) {
            return Err(SettingsError::Invalid("color_tolerance must be non-negative"));
        }
        if self.particle_capacity == 0 {
            return Err(SettingsError::Invalid("particle_capacity must be non-zero"));
        }
        if !(self.arena.min_x < self.arena.max_x && self.arena.min_y < self.arena.max_y) {
            return Err(SettingsError::Invalid("arena bounds must be ordered"));
        }
        Ok(())
    }
}
