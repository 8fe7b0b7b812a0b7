//! Per-frame simulation step
//!
//! Order within a step is fixed:
//! 1. Time-driven children (particle emitters)
//! 2. Player footprint: snap to ground, dig, paint
//! 3. Bots in list order: pursue the player unless the destination is
//!    painted in the player's color
//!
//! Later bots see terrain and player state already updated this step.

use glam::{Vec2, Vec3};

use super::actor::{Actor, colors_match};
use super::controls::ControlInput;
use super::error::SimError;
use super::raster::Cell;
use super::state::SimState;
use super::terrain::{DeformOutcome, TerrainSurface};
use crate::settings::Settings;

/// What the player's footprint did this step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerOutcome {
    /// Footprint on both grids: height snapped, cell dug (or already dug), color painted
    Grounded {
        height: f32,
        dig: DeformOutcome,
        painted: Cell,
    },
    /// Footprint off at least one grid; terrain untouched, height unchanged
    OffGrid,
}

/// What one bot did this step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotOutcome {
    /// Committed the move. `grounded` is false when the new spot is off the
    /// height grid and z was left alone.
    Moved { grounded: bool },
    /// Destination painted in the player's color
    Blocked,
    /// Destination off the color grid
    OffGrid,
    /// Bot sits exactly on the player
    Degenerate,
}

/// Observable result of one step
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub time: f32,
    pub player: PlayerOutcome,
    /// One entry per bot, in bot order
    pub bots: Vec<BotOutcome>,
}

impl TickReport {
    pub fn moved(&self) -> usize {
        self.bots
            .iter()
            .filter(|b| matches!(b, BotOutcome::Moved { .. }))
            .count()
    }

    pub fn blocked(&self) -> usize {
        self.bots
            .iter()
            .filter(|b| **b == BotOutcome::Blocked)
            .count()
    }

    /// True if the player lowered a fresh cell this step
    pub fn dug(&self) -> bool {
        matches!(
            self.player,
            PlayerOutcome::Grounded {
                dig: DeformOutcome::Lowered { .. },
                ..
            }
        )
    }
}

/// Apply one frame of player input, then advance the simulation to `t`
pub fn tick(state: &mut SimState, input: &ControlInput, t: f32) -> TickReport {
    state.controls.apply(input, &mut state.player);
    step(state, t)
}

/// Advance the simulation to host time `t`
pub fn step(state: &mut SimState, t: f32) -> TickReport {
    let t = if t < state.time {
        log::warn!("Time went backwards ({} < {}), holding", t, state.time);
        state.time
    } else {
        t
    };
    state.time = t;
    state.ticks += 1;

    state.update_emitters(t);

    let player = match interact(&mut state.terrain, &mut state.player, &state.settings) {
        Ok(outcome) => outcome,
        Err(err) => {
            log::trace!("Player off grid: {}", err);
            PlayerOutcome::OffGrid
        }
    };

    let SimState {
        bots,
        player: target,
        terrain,
        settings,
        ..
    } = &mut *state;
    let (target, terrain, settings) = (&*target, &*terrain, &*settings);
    let bots = bots
        .iter_mut()
        .map(|bot| advance_bot(bot, target, terrain, settings))
        .collect();

    let report = TickReport { time: t, player, bots };
    log::debug!(
        "Tick {} at t={}: player {:?}, {} bots moved, {} blocked",
        state.ticks,
        t,
        report.player,
        report.moved(),
        report.blocked()
    );
    report
}

/// Snap the player to the ground under it, dig, and paint
fn interact(
    terrain: &mut TerrainSurface,
    player: &mut Actor,
    settings: &Settings,
) -> Result<PlayerOutcome, SimError> {
    let foot = player.position.truncate();
    // Both grids or neither
    terrain.footprint(foot)?;

    let height = terrain.height_at(foot)?;
    player.position.z = height;
    let dig = terrain.deform(foot, settings.dig_delta, &player.id)?;
    let painted = terrain.paint_color(foot, player.color, &player.id)?;
    Ok(PlayerOutcome::Grounded {
        height,
        dig,
        painted,
    })
}

/// Candidate position one `speed` step from `mover` toward `target`
pub fn pursue(mover: &Actor, target: &Actor, speed: f32) -> Result<Vec3, SimError> {
    let direction = (target.position - mover.position)
        .try_normalize()
        .ok_or(SimError::DegenerateDirection)?;
    Ok(mover.position + direction * speed)
}

fn advance_bot(
    bot: &mut Actor,
    player: &Actor,
    terrain: &TerrainSurface,
    settings: &Settings,
) -> BotOutcome {
    let candidate = match pursue(bot, player, settings.bot_speed) {
        Ok(candidate) => candidate,
        Err(_) => return BotOutcome::Degenerate,
    };

    // Only the destination is checked; a fast bot can hop a thin painted line
    let ground = match terrain.color_at(candidate.truncate()) {
        Ok(color) => color,
        Err(_) => return BotOutcome::OffGrid,
    };
    if colors_match(ground, player.color, settings.color_tolerance) {
        log::trace!("{} blocked by painted ground", bot.id);
        return BotOutcome::Blocked;
    }

    bot.velocity = candidate - bot.position;
    bot.position = candidate;
    let grounded = snap_to_height(terrain, &mut bot.position);
    BotOutcome::Moved { grounded }
}

fn snap_to_height(terrain: &TerrainSurface, position: &mut Vec3) -> bool {
    match terrain.height_at(Vec2::new(position.x, position.y)) {
        Ok(height) => {
            position.z = height;
            true
        }
        Err(_) => false,
    }
}
