//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host-supplied, non-decreasing time only
//! - Seeded RNG only
//! - Stable iteration order (bots in list order)
//! - No rendering or platform dependencies

pub mod actor;
pub mod controls;
pub mod error;
pub mod particles;
pub mod raster;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod visits;

pub use actor::{Actor, ActorId, colors_match};
pub use controls::{ControlInput, PlayerControls};
pub use error::SimError;
pub use particles::{
    BillboardEmitter, DigEmitter, Emitter, Particle, ParticleInstance, ParticlePool,
};
pub use raster::{Cell, GridMapping, RasterField, Rgba};
pub use state::SimState;
pub use terrain::{DeformOutcome, TerrainSurface};
pub use tick::{BotOutcome, PlayerOutcome, TickReport, pursue, step, tick};
pub use visits::VisitRegistry;
