//! Color Miner - terrain-digging pursuit simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain rasters, actors, particles, tick)
//! - `settings`: Construction-time configuration
//! - `platform`: Browser host bindings (wasm32 only)

pub mod platform;
pub mod settings;
pub mod sim;

pub use settings::{ArenaBounds, GridSpec, Settings, SettingsError};

/// Simulation configuration constants
pub mod consts {
    /// Nominal frame rate the host drives the simulation at
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Half-extent of the square world the terrain covers
    pub const WORLD_HALF_EXTENT: f32 = 7.5;

    /// Height grid resolution (cells per side)
    pub const HEIGHT_GRID_SIZE: u32 = 64;
    /// Color grid is this many times denser than the height grid
    pub const COLOR_GRID_FACTOR: u32 = 3;

    /// Starting height of every terrain cell
    pub const INITIAL_HEIGHT: f32 = 0.5;
    /// Height removed from a cell the first time an actor crosses it
    pub const DIG_DELTA: f32 = 0.01;

    /// Bot pursuit distance per tick (world units)
    pub const BOT_SPEED: f32 = 0.002;
    /// Default number of bots
    pub const BOT_COUNT: usize = 6;
    /// Default bot mass
    pub const BOT_MASS: f32 = 50.0;

    /// Per-channel tolerance for "this ground is painted in my color"
    pub const COLOR_TOLERANCE: f32 = 1e-5;

    /// Default particle pool capacity
    pub const PARTICLE_CAPACITY: usize = 64;
    /// Default particle velocity scale
    pub const PARTICLE_SPEED_SCALE: f32 = 0.5;

    /// Player step per forward input (world units)
    pub const PLAYER_STEP: f32 = 0.04;
    /// Player turn per turn input (radians)
    pub const PLAYER_TURN: f32 = std::f32::consts::PI / 16.0;
}

/// Wrap an angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}
