//! Deformable, paintable terrain
//!
//! Two rasters over the same world rectangle: a single-channel height field
//! and an RGBA color field, each with its own resolution and mapping.
//! Digging lowers a height cell at most once per actor. Painting always
//! overwrites.

use glam::{Vec2, Vec3, Vec4};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::actor::ActorId;
use super::error::SimError;
use super::raster::{Cell, RasterField, Rgba};
use super::visits::VisitRegistry;
use crate::settings::Settings;

/// Result of a successful (in-domain) dig
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeformOutcome {
    /// First visit by this actor: the cell now holds `height`
    Lowered { cell: Cell, height: f32 },
    /// This actor already dug here; nothing changed
    AlreadyDug { cell: Cell },
}

/// Frequency the color noise is sampled at, in noise units per cell
const COLOR_NOISE_FREQUENCY: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct TerrainSurface {
    heights: RasterField<f32>,
    colors: RasterField<Rgba>,
    visits: VisitRegistry,
}

impl TerrainSurface {
    /// Assemble from two explicitly configured fields
    ///
    /// Does not check that both fields cover the same world rectangle;
    /// `Settings::validate` enforces that for the settings path.
    pub fn new(heights: RasterField<f32>, colors: RasterField<Rgba>) -> Self {
        Self {
            heights,
            colors,
            visits: VisitRegistry::new(),
        }
    }

    /// Solid `initial_height` ground with seeded grey noise for color
    pub fn from_settings(settings: &Settings) -> Self {
        let heights = RasterField::new(
            settings.height_grid.width,
            settings.height_grid.height,
            settings.height_grid.mapping(),
            settings.initial_height,
        );
        let colors = RasterField::new(
            settings.color_grid.width,
            settings.color_grid.height,
            settings.color_grid.mapping(),
            Vec4::ZERO,
        );
        let mut terrain = Self::new(heights, colors);
        terrain.reroll_colors(settings.seed);
        log::info!(
            "Terrain: height {}x{}, color {}x{}",
            terrain.heights.width(),
            terrain.heights.height(),
            terrain.colors.width(),
            terrain.colors.height()
        );
        terrain
    }

    pub fn heights(&self) -> &RasterField<f32> {
        &self.heights
    }

    pub fn colors(&self) -> &RasterField<Rgba> {
        &self.colors
    }

    pub fn visits(&self) -> &VisitRegistry {
        &self.visits
    }

    pub fn height_at(&self, world: Vec2) -> Result<f32, SimError> {
        self.heights.get(world)
    }

    pub fn color_at(&self, world: Vec2) -> Result<Rgba, SimError> {
        self.colors.get(world)
    }

    /// Height and color cells under a world position; fails if either is off-grid
    pub fn footprint(&self, world: Vec2) -> Result<(Cell, Cell), SimError> {
        Ok((self.heights.cell_at(world)?, self.colors.cell_at(world)?))
    }

    /// Lower the height cell under `world` by `delta`, once per actor
    pub fn deform(
        &mut self,
        world: Vec2,
        delta: f32,
        actor: &ActorId,
    ) -> Result<DeformOutcome, SimError> {
        let cell = self.heights.cell_at(world)?;
        if !self.visits.record(actor, cell) {
            return Ok(DeformOutcome::AlreadyDug { cell });
        }
        let height = self.heights.get_cell(cell)? - delta;
        self.heights.set_cell(cell, height)?;
        log::trace!("{} dug ({}, {}) to {}", actor, cell.x, cell.y, height);
        Ok(DeformOutcome::Lowered { cell, height })
    }

    /// Overwrite the color cell under `world`. Last write wins.
    pub fn paint_color(
        &mut self,
        world: Vec2,
        color: Rgba,
        actor: &ActorId,
    ) -> Result<Cell, SimError> {
        let cell = self.colors.cell_at(world)?;
        self.colors.set_cell(cell, color)?;
        log::trace!("{} painted ({}, {})", actor, cell.x, cell.y);
        Ok(cell)
    }

    /// Raise `position.z` to the ground if it is below it. Returns whether it moved.
    pub fn clamp_to_ground(&self, position: &mut Vec3) -> Result<bool, SimError> {
        let ground = self.height_at(position.truncate())?;
        if position.z < ground {
            position.z = ground;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Drop an actor's dig record (actor destroyed)
    pub fn forget_actor(&mut self, actor: &ActorId) -> usize {
        self.visits.forget(actor)
    }

    /// Replace the height field with a rolling wave pattern
    pub fn reroll_heights(&mut self) {
        self.heights.fill_with(|c| {
            (2.0 * c.x as f32).sin() * 0.2 + (2.0 * c.y as f32).sin() * 0.2
        });
    }

    /// Refill the color field with seeded grey noise
    pub fn reroll_colors(&mut self, seed: u64) {
        let noise = ValueNoise::new(
            seed,
            self.colors.width() as f32 * COLOR_NOISE_FREQUENCY,
            self.colors.height() as f32 * COLOR_NOISE_FREQUENCY,
        );
        self.colors.fill_with(|c| {
            let v = noise.sample(Vec2::new(c.x as f32, c.y as f32) * COLOR_NOISE_FREQUENCY);
            let grey = v / 8.0 + 0.3;
            Vec4::new(grey, grey, grey, (v + 1.0) / 2.0)
        });
    }

    /// Paint the whole color field one color
    pub fn fill_color(&mut self, color: Rgba) {
        self.colors.fill(color);
    }

    pub fn take_height_dirty(&mut self) -> bool {
        self.heights.take_dirty()
    }

    pub fn take_color_dirty(&mut self) -> bool {
        self.colors.take_dirty()
    }
}

/// Smooth 2D value noise on a seeded lattice, output in [-1, 1]
struct ValueNoise {
    width: usize,
    lattice: Vec<f32>,
}

impl ValueNoise {
    fn new(seed: u64, extent_x: f32, extent_y: f32) -> Self {
        let width = extent_x.ceil() as usize + 2;
        let height = extent_y.ceil() as usize + 2;
        let mut rng = Pcg32::seed_from_u64(seed);
        let lattice = (0..width * height)
            .map(|_| rng.random_range(-1.0f32..=1.0))
            .collect();
        Self { width, lattice }
    }

    fn sample(&self, p: Vec2) -> f32 {
        let base = p.floor();
        let t = p - base;
        // Smoothstep fade
        let t = t * t * (Vec2::splat(3.0) - 2.0 * t);
        let (x0, y0) = (base.x as usize, base.y as usize);
        let at = |x: usize, y: usize| self.lattice[y * self.width + x];
        let top = at(x0, y0) + (at(x0 + 1, y0) - at(x0, y0)) * t.x;
        let bottom = at(x0, y0 + 1) + (at(x0 + 1, y0 + 1) - at(x0, y0 + 1)) * t.x;
        top + (bottom - top) * t.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::raster::GridMapping;
    use proptest::prelude::*;

    /// 4x4 height field at 0.5, 12x12 color field over the same 4x4 world square
    fn small_terrain() -> TerrainSurface {
        let heights = RasterField::new(4, 4, GridMapping::identity(), 0.5);
        let colors = RasterField::new(
            12,
            12,
            GridMapping::new(Vec2::splat(3.0), Vec2::ZERO),
            Vec4::ZERO,
        );
        TerrainSurface::new(heights, colors)
    }

    fn cell_center(x: u32, y: u32) -> Vec2 {
        Vec2::new(x as f32 + 0.5, y as f32 + 0.5)
    }

    #[test]
    fn test_dig_once_per_actor() {
        let mut t = small_terrain();
        let p1 = ActorId::from("p1");
        let p2 = ActorId::from("p2");
        let at = cell_center(1, 1);

        let first = t.deform(at, 0.1, &p1).unwrap();
        assert!(matches!(first, DeformOutcome::Lowered { cell, .. } if cell == Cell::new(1, 1)));
        assert!((t.height_at(at).unwrap() - 0.4).abs() < 1e-6);

        let again = t.deform(at, 0.1, &p1).unwrap();
        assert_eq!(again, DeformOutcome::AlreadyDug { cell: Cell::new(1, 1) });
        assert!((t.height_at(at).unwrap() - 0.4).abs() < 1e-6);

        t.deform(at, 0.1, &p2).unwrap();
        assert!((t.height_at(at).unwrap() - 0.3).abs() < 1e-6);

        // Everything else untouched
        for y in 0..4 {
            for x in 0..4 {
                if (x, y) != (1, 1) {
                    assert_eq!(t.heights().get_cell(Cell::new(x, y)).unwrap(), 0.5);
                }
            }
        }
    }

    #[test]
    fn test_dig_same_cell_different_world_points() {
        let mut t = small_terrain();
        let p1 = ActorId::from("p1");
        t.deform(Vec2::new(2.1, 3.1), 0.1, &p1).unwrap();
        let out = t.deform(Vec2::new(2.9, 3.9), 0.1, &p1).unwrap();
        assert!(matches!(out, DeformOutcome::AlreadyDug { .. }));
    }

    #[test]
    fn test_paint_last_write_wins() {
        let mut t = small_terrain();
        let c1 = Vec4::new(1.0, 0.0, 0.0, 1.0);
        let c2 = Vec4::new(0.0, 0.0, 1.0, 1.0);
        let at = Vec2::new(1.2, 1.2);
        t.paint_color(at, c1, &ActorId::from("a")).unwrap();
        t.paint_color(at, c2, &ActorId::from("a")).unwrap();
        assert_eq!(t.color_at(at).unwrap(), c2);
        t.paint_color(at, c1, &ActorId::from("b")).unwrap();
        assert_eq!(t.color_at(at).unwrap(), c1);
    }

    #[test]
    fn test_color_field_is_denser() {
        let mut t = small_terrain();
        let red = Vec4::new(1.0, 0.0, 0.0, 1.0);
        let cell = t.paint_color(Vec2::new(1.0, 1.0), red, &ActorId::from("a")).unwrap();
        assert_eq!(cell, Cell::new(3, 3));
        // Same height cell, different color cell
        assert_eq!(t.color_at(Vec2::new(1.5, 1.5)).unwrap(), Vec4::ZERO);
    }

    #[test]
    fn test_out_of_domain_leaves_fields_untouched() {
        let mut t = small_terrain();
        t.take_height_dirty();
        t.take_color_dirty();
        let off = Vec2::new(-1.0, 2.0);
        let p1 = ActorId::from("p1");
        assert!(t.deform(off, 0.1, &p1).is_err());
        assert!(t.paint_color(off, Vec4::ONE, &p1).is_err());
        assert!(t.heights().samples().iter().all(|&h| h == 0.5));
        assert!(t.colors().samples().iter().all(|&c| c == Vec4::ZERO));
        assert!(!t.take_height_dirty());
        assert!(!t.take_color_dirty());
        assert_eq!(t.visits().visited_count(&p1), 0);
    }

    #[test]
    fn test_footprint_off_partial_color_coverage() {
        let heights = RasterField::new(4, 4, GridMapping::identity(), 0.5);
        // Mismatched on purpose: the color field only covers the lower half
        let colors = RasterField::new(4, 2, GridMapping::identity(), Vec4::ZERO);
        let t = TerrainSurface::new(heights, colors);
        assert!(t.footprint(Vec2::new(1.0, 1.0)).is_ok());
        assert!(t.footprint(Vec2::new(1.0, 3.0)).is_err());
    }

    #[test]
    fn test_fill_color_uniform_and_dirty() {
        let mut t = small_terrain();
        t.paint_color(Vec2::new(1.0, 1.0), Vec4::X, &ActorId::from("a")).unwrap();
        t.take_color_dirty();
        let base = Vec4::new(0.2, 0.3, 0.4, 1.0);
        t.fill_color(base);
        assert!(t.colors().samples().iter().all(|&c| c == base));
        assert!(t.take_color_dirty());
        assert!(t.heights().samples().iter().all(|&h| h == 0.5));
    }

    #[test]
    fn test_clamp_to_ground_only_raises() {
        let t = small_terrain();
        let mut below = Vec3::new(1.0, 1.0, 0.1);
        assert!(t.clamp_to_ground(&mut below).unwrap());
        assert_eq!(below.z, 0.5);
        let mut above = Vec3::new(1.0, 1.0, 2.0);
        assert!(!t.clamp_to_ground(&mut above).unwrap());
        assert_eq!(above.z, 2.0);
    }

    #[test]
    fn test_forget_actor_allows_redig() {
        let mut t = small_terrain();
        let p1 = ActorId::from("p1");
        let at = cell_center(0, 0);
        t.deform(at, 0.1, &p1).unwrap();
        assert_eq!(t.forget_actor(&p1), 1);
        assert!(matches!(t.deform(at, 0.1, &p1).unwrap(), DeformOutcome::Lowered { .. }));
    }

    #[test]
    fn test_reroll_colors_deterministic() {
        let mut a = small_terrain();
        let mut b = small_terrain();
        a.reroll_colors(7);
        b.reroll_colors(7);
        assert_eq!(a.colors().samples(), b.colors().samples());
        for c in a.colors().samples() {
            assert!(c.x >= 0.3 - 0.125 - 1e-6 && c.x <= 0.3 + 0.125 + 1e-6);
            assert!(c.w >= 0.0 && c.w <= 1.0);
        }
    }

    #[test]
    fn test_reroll_heights_pattern() {
        let mut t = small_terrain();
        t.reroll_heights();
        let h = t.heights().get_cell(Cell::new(1, 0)).unwrap();
        assert!((h - 2.0f32.sin() * 0.2).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_height_never_increases(
            digs in prop::collection::vec((0u8..3, 0.0f32..4.0, 0.0f32..4.0, 0.0f32..0.2), 1..64)
        ) {
            let mut t = small_terrain();
            let actors = [ActorId::from("a"), ActorId::from("b"), ActorId::from("c")];
            let mut last = t.heights().samples().to_vec();
            for (who, x, y, delta) in digs {
                t.deform(Vec2::new(x, y), delta, &actors[who as usize]).unwrap();
                let now = t.heights().samples().to_vec();
                for (before, after) in last.iter().zip(&now) {
                    prop_assert!(after <= before);
                }
                last = now;
            }
        }

        #[test]
        fn prop_paint_keeps_last_color(
            colors in prop::collection::vec(
                (0.0f32..1.0, 0.0f32..1.0, 0.0f32..1.0, 0.0f32..1.0),
                1..16,
            ),
            x in 0.0f32..4.0,
            y in 0.0f32..4.0,
        ) {
            let mut t = small_terrain();
            let at = Vec2::new(x, y);
            let mut expected = Vec4::ZERO;
            for (i, (r, g, b, a)) in colors.into_iter().enumerate() {
                expected = Vec4::new(r, g, b, a);
                t.paint_color(at, expected, &ActorId::new(format!("a{}", i % 2))).unwrap();
            }
            prop_assert_eq!(t.color_at(at).unwrap(), expected);
        }
    }
}
