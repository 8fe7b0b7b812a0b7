//! Simulation state and setup
//!
//! Everything one frame of the simulation reads or writes lives here.

use glam::{Vec3, Vec4};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::actor::{Actor, ActorId};
use super::controls::PlayerControls;
use super::particles::{BillboardEmitter, DigEmitter, Emitter};
use super::terrain::TerrainSurface;
use crate::settings::{Settings, SettingsError};

/// Id of the single player actor
pub const PLAYER_ID: &str = "player";

/// Bots are drawn untinted
pub const BOT_COLOR: Vec4 = Vec4::ONE;

/// Complete simulation state
#[derive(Debug)]
pub struct SimState {
    pub settings: Settings,
    pub terrain: TerrainSurface,
    pub player: Actor,
    /// Pursuers, updated in list order
    pub bots: Vec<Actor>,
    pub controls: PlayerControls,
    /// Time-driven children, updated first each tick in registration order
    emitters: Vec<Box<dyn Emitter>>,
    /// Host time of the last tick
    pub time: f32,
    /// Ticks run so far
    pub ticks: u64,
}

impl SimState {
    /// Build the scene: terrain, a player at the origin, seeded bots, and
    /// the dig and sparkle particle systems.
    pub fn new(settings: Settings) -> Result<Self, SettingsError> {
        settings.validate()?;

        let terrain = TerrainSurface::from_settings(&settings);
        let player = Actor::new(PLAYER_ID, Vec3::ZERO, settings.player_color);
        let bots = spawn_bots(&settings);
        let controls =
            PlayerControls::new(settings.player_step, settings.player_turn, settings.arena);

        let emitters: Vec<Box<dyn Emitter>> = vec![
            Box::new(DigEmitter::new(1)),
            Box::new(BillboardEmitter::new(
                settings.particle_capacity,
                settings.particle_speed_scale,
                settings.seed.wrapping_add(1),
            )),
        ];

        log::info!(
            "Simulation ready: {} bots, particle capacity {}",
            bots.len(),
            settings.particle_capacity
        );

        Ok(Self {
            settings,
            terrain,
            player,
            bots,
            controls,
            emitters,
            time: 0.0,
            ticks: 0,
        })
    }

    /// Bare state around an existing terrain, with no bots and no emitters
    pub fn with_terrain(
        settings: Settings,
        terrain: TerrainSurface,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        let player = Actor::new(PLAYER_ID, Vec3::ZERO, settings.player_color);
        let controls =
            PlayerControls::new(settings.player_step, settings.player_turn, settings.arena);
        Ok(Self {
            settings,
            terrain,
            player,
            bots: Vec::new(),
            controls,
            emitters: Vec::new(),
            time: 0.0,
            ticks: 0,
        })
    }

    pub fn register_emitter(&mut self, emitter: Box<dyn Emitter>) {
        self.emitters.push(emitter);
    }

    pub fn emitters(&self) -> impl Iterator<Item = &dyn Emitter> + '_ {
        self.emitters.iter().map(|e| e.as_ref())
    }

    pub(crate) fn update_emitters(&mut self, t: f32) {
        let anchor = self.player.position;
        for emitter in &mut self.emitters {
            emitter.time_update(t, anchor);
        }
    }

    pub fn bot(&self, id: &ActorId) -> Option<&Actor> {
        self.bots.iter().find(|b| &b.id == id)
    }

    /// Remove a bot and its dig record
    pub fn despawn_bot(&mut self, id: &ActorId) -> Option<Actor> {
        let index = self.bots.iter().position(|b| &b.id == id)?;
        self.terrain.forget_actor(id);
        Some(self.bots.remove(index))
    }
}

fn spawn_bots(settings: &Settings) -> Vec<Actor> {
    let mut rng = Pcg32::seed_from_u64(settings.seed);
    let extent = settings.bot_spawn_extent;
    (0..settings.bot_count)
        .map(|i| {
            let position = Vec3::new(
                (rng.random::<f32>() - 0.5) * extent,
                (rng.random::<f32>() - 0.5) * extent,
                0.0,
            );
            Actor::new(format!("bot-{}", i), position, BOT_COLOR).with_mass(settings.bot_mass)
        })
        .collect()
}
