//! Actors: the player and the bots that chase it
//!
//! Player and bots share one shape. Position z is game state but the tick
//! overwrites it from terrain height every frame.

use std::fmt;

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use super::raster::Rgba;

/// Opaque, stable actor identity assigned by the scene layer
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActorId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ActorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A moving body on the terrain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub position: Vec3,
    pub velocity: Vec3,
    pub mass: f32,
    pub color: Rgba,
}

impl Actor {
    pub fn new(id: impl Into<ActorId>, position: Vec3, color: Rgba) -> Self {
        Self {
            id: id.into(),
            position,
            velocity: Vec3::ZERO,
            mass: 1.0,
            color,
        }
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Move by a world-space delta, recording it as this frame's velocity
    pub fn displace(&mut self, delta: Vec3) {
        self.velocity = delta;
        self.position += delta;
    }
}

/// Per-channel color match: every channel within `tolerance`
#[inline]
pub fn colors_match(a: Vec4, b: Vec4, tolerance: f32) -> bool {
    (a - b).abs().cmple(Vec4::splat(tolerance)).all()
}
