//! Fixed-capacity particle pools and the emitters that drive them
//!
//! Every particle is allocated up front, invisible. Emission overwrites the
//! slot after the last one emitted, wrapping around, so the oldest emission
//! is recycled first. Integration is explicit Euler over every slot,
//! visible or not; visibility only matters to the renderer.

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::raster::Rgba;

/// A single particle slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub mass: f32,
    pub size: f32,
    pub color: Rgba,
    pub visible: bool,
    /// Simulation time this slot was last emitted at
    pub birth_time: f32,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            mass: 1.0,
            size: 1.0,
            color: Vec4::ONE,
            visible: false,
            birth_time: 0.0,
        }
    }
}

/// Per-instance draw data uploaded by the renderer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 4],
}

impl From<&Particle> for ParticleInstance {
    fn from(p: &Particle) -> Self {
        Self {
            position: p.position.to_array(),
            size: p.size,
            color: p.color.to_array(),
        }
    }
}

/// Ring buffer of pre-allocated particles
#[derive(Debug, Clone)]
pub struct ParticlePool {
    particles: Vec<Particle>,
    /// `None` until the first emission, which lands in slot 0
    last_emitted: Option<usize>,
}

impl ParticlePool {
    /// Allocate `capacity` invisible particles. A zero capacity is bumped to one.
    pub fn new(capacity: usize) -> Self {
        if capacity == 0 {
            log::warn!("Particle pool capacity 0 requested, using 1");
        }
        Self {
            particles: vec![Particle::default(); capacity.max(1)],
            last_emitted: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    pub fn last_emitted(&self) -> Option<usize> {
        self.last_emitted
    }

    /// Slot the next emission will overwrite
    pub fn next_slot(&self) -> usize {
        self.last_emitted
            .map_or(0, |i| (i + 1) % self.particles.len())
    }

    /// Emit a white particle. Returns the slot used.
    pub fn emit(
        &mut self,
        position: Vec3,
        velocity: Vec3,
        mass: f32,
        size: f32,
        birth_time: f32,
    ) -> usize {
        self.emit_colored(position, velocity, mass, size, Vec4::ONE, birth_time)
    }

    /// Emit into the next ring slot, replacing every field
    pub fn emit_colored(
        &mut self,
        position: Vec3,
        velocity: Vec3,
        mass: f32,
        size: f32,
        color: Rgba,
        birth_time: f32,
    ) -> usize {
        let slot = self.next_slot();
        self.particles[slot] = Particle {
            position,
            velocity,
            mass,
            size,
            color,
            visible: true,
            birth_time,
        };
        self.last_emitted = Some(slot);
        slot
    }

    /// `position += velocity * speed_scale * elapsed` for every slot
    pub fn integrate(&mut self, elapsed: f32, speed_scale: f32) {
        let step = speed_scale * elapsed;
        for p in &mut self.particles {
            p.position += p.velocity * step;
        }
    }

    pub fn get(&self, slot: usize) -> Option<&Particle> {
        self.particles.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Particle> {
        self.particles.get_mut(slot)
    }

    /// All slots in order
    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    /// Draw data for visible particles
    pub fn instances(&self) -> impl Iterator<Item = ParticleInstance> + Clone + '_ {
        self.particles
            .iter()
            .filter(|p| p.visible)
            .map(ParticleInstance::from)
    }

    pub fn visible_count(&self) -> usize {
        self.particles.iter().filter(|p| p.visible).count()
    }
}

/// A time-driven particle system attached to a moving anchor
pub trait Emitter: std::fmt::Debug {
    /// Advance to absolute time `t`; `anchor` is the owner's world position
    fn time_update(&mut self, t: f32, anchor: Vec3);

    fn pool(&self) -> &ParticlePool;
}

/// Seconds since the previous update; zero on the first one
#[derive(Debug, Clone, Copy, Default)]
struct Clock {
    last_time: Option<f32>,
}

impl Clock {
    fn advance(&mut self, t: f32) -> f32 {
        let elapsed = self.last_time.map_or(0.0, |last| t - last);
        self.last_time = Some(t);
        elapsed
    }
}

/// Decorative sparkle emitter: one random particle per update
#[derive(Debug, Clone)]
pub struct BillboardEmitter {
    pool: ParticlePool,
    rng: Pcg32,
    clock: Clock,
    /// Velocity multiplier applied during integration
    pub speed_scale: f32,
}

impl BillboardEmitter {
    pub const PARTICLE_MASS: f32 = 3.0;
    pub const PARTICLE_SIZE: f32 = 1.0;

    pub fn new(capacity: usize, speed_scale: f32, seed: u64) -> Self {
        Self {
            pool: ParticlePool::new(capacity),
            rng: Pcg32::seed_from_u64(seed),
            clock: Clock::default(),
            speed_scale,
        }
    }
}

impl Emitter for BillboardEmitter {
    fn time_update(&mut self, t: f32, anchor: Vec3) {
        let elapsed = self.clock.advance(t);

        let jitter = Vec3::new(
            self.rng.random::<f32>() * 0.5,
            self.rng.random::<f32>() - 0.5,
            self.rng.random::<f32>(),
        );
        let velocity = Vec3::new(
            self.rng.random::<f32>() * 0.5,
            self.rng.random::<f32>() - 0.5,
            self.rng.random::<f32>(),
        ) * 0.1;
        let color = Vec4::new(self.rng.random(), self.rng.random(), self.rng.random(), 1.0);
        self.pool.emit_colored(
            anchor + jitter,
            velocity,
            Self::PARTICLE_MASS,
            Self::PARTICLE_SIZE,
            color,
            t,
        );

        self.pool.integrate(elapsed, self.speed_scale);
    }

    fn pool(&self) -> &ParticlePool {
        &self.pool
    }
}

/// The dig effect: a single clod thrown up and back down above the anchor
#[derive(Debug, Clone)]
pub struct DigEmitter {
    pool: ParticlePool,
}

impl DigEmitter {
    /// Period of the dig arc, in time units
    pub const PERIOD: f32 = 100.0;

    pub fn new(capacity: usize) -> Self {
        Self {
            pool: ParticlePool::new(capacity),
        }
    }

    /// Height above the anchor at time `t`
    pub fn arc_height(t: f32) -> f32 {
        let t = t.rem_euclid(Self::PERIOD);
        1.0 + (-0.1 * t.powi(3) + 4.0 * t.powi(2)) / 100.0
    }
}

impl Emitter for DigEmitter {
    fn time_update(&mut self, t: f32, anchor: Vec3) {
        // Always slot 0; the ring index is never advanced
        if let Some(clod) = self.pool.get_mut(0) {
            if !clod.visible {
                clod.birth_time = t;
            }
            clod.position = Vec3::new(anchor.x, anchor.y, anchor.z + Self::arc_height(t));
            clod.visible = true;
        }
    }

    fn pool(&self) -> &ParticlePool {
        &self.pool
    }
}
