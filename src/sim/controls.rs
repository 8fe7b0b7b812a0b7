//! Player movement deltas
//!
//! Stand-in for the host's interaction layer: turns abstract key state into
//! a heading and a position delta applied between ticks.

use glam::{Vec2, Vec3};

use super::actor::Actor;
use crate::normalize_angle;
use crate::settings::ArenaBounds;

/// Input for one frame (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlInput {
    pub forward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

#[derive(Debug, Clone)]
pub struct PlayerControls {
    /// Radians counter-clockwise from +Y
    pub heading: f32,
    pub step: f32,
    pub turn: f32,
    pub arena: ArenaBounds,
}

impl PlayerControls {
    pub fn new(step: f32, turn: f32, arena: ArenaBounds) -> Self {
        Self {
            heading: 0.0,
            step,
            turn,
            arena,
        }
    }

    /// Unit facing direction in the ground plane
    pub fn facing(&self) -> Vec2 {
        Vec2::new(-self.heading.sin(), self.heading.cos())
    }

    /// Apply turns, then try one forward step. A step that would leave the
    /// arena is refused. Returns whether the player moved.
    pub fn apply(&mut self, input: &ControlInput, player: &mut Actor) -> bool {
        if input.turn_left {
            self.heading = normalize_angle(self.heading + self.turn);
        }
        if input.turn_right {
            self.heading = normalize_angle(self.heading - self.turn);
        }
        if !input.forward {
            player.velocity = Vec3::ZERO;
            return false;
        }

        let delta = self.facing() * self.step;
        if !self.arena.contains(player.position.truncate() + delta) {
            player.velocity = Vec3::ZERO;
            return false;
        }
        player.displace(delta.extend(0.0));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;
    use std::f32::consts::FRAC_PI_2;

    fn controls() -> PlayerControls {
        PlayerControls::new(0.5, FRAC_PI_2, ArenaBounds::default())
    }

    #[test]
    fn test_forward_along_heading() {
        let mut c = controls();
        let mut p = Actor::new("player", Vec3::ZERO, Vec4::ONE);
        assert!(c.apply(&ControlInput { forward: true, ..Default::default() }, &mut p));
        assert!(p.position.abs_diff_eq(Vec3::new(0.0, 0.5, 0.0), 1e-6));

        // Quarter turn left now faces -X
        c.apply(&ControlInput { turn_left: true, ..Default::default() }, &mut p);
        c.apply(&ControlInput { forward: true, ..Default::default() }, &mut p);
        assert!(p.position.abs_diff_eq(Vec3::new(-0.5, 0.5, 0.0), 1e-6));
    }

    #[test]
    fn test_arena_edge_refuses_step() {
        let mut c = controls();
        let mut p = Actor::new("player", Vec3::new(0.0, 7.0, 0.3), Vec4::ONE);
        let moved = c.apply(&ControlInput { forward: true, ..Default::default() }, &mut p);
        assert!(!moved);
        assert_eq!(p.position, Vec3::new(0.0, 7.0, 0.3));
    }
}
