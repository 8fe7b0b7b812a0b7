//! Nearest-neighbor raster fields addressed in world space
//!
//! A field is a row-major grid of samples plus an affine world-to-grid
//! mapping. Lookups truncate the mapped coordinate to a cell index; there is
//! no interpolation and no clamping. Anything that maps outside the grid is
//! rejected with [`SimError::OutOfDomain`].

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

use super::error::SimError;

/// RGBA color sample. Channels are conventionally in [0,1] but unconstrained.
pub type Rgba = Vec4;

/// Integer cell index into a raster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
}

impl Cell {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Affine world-to-grid transform: `grid = world * scale + offset`, per axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridMapping {
    pub scale: Vec2,
    pub offset: Vec2,
}

impl GridMapping {
    pub fn new(scale: Vec2, offset: Vec2) -> Self {
        Self { scale, offset }
    }

    /// Grid coordinates coincide with world coordinates
    pub fn identity() -> Self {
        Self::new(Vec2::ONE, Vec2::ZERO)
    }

    /// Map a centered square of half-extent `half_extent` onto a
    /// `width x height` grid, origin at the grid center.
    pub fn centered(half_extent: f32, width: u32, height: u32) -> Self {
        Self::new(
            Vec2::new(width as f32 / (2.0 * half_extent), height as f32 / (2.0 * half_extent)),
            Vec2::new(width as f32 / 2.0, height as f32 / 2.0),
        )
    }

    #[inline]
    pub fn to_grid(&self, world: Vec2) -> Vec2 {
        world * self.scale + self.offset
    }

    /// World position of a cell's lower corner (inverse mapping)
    #[inline]
    pub fn to_world(&self, grid: Vec2) -> Vec2 {
        (grid - self.offset) / self.scale
    }
}

/// A 2D grid of samples with a world-space mapping and a redraw flag
#[derive(Debug, Clone)]
pub struct RasterField<T> {
    width: u32,
    height: u32,
    samples: Vec<T>,
    mapping: GridMapping,
    /// Set on every mutation; cleared by the renderer via `take_dirty`
    dirty: bool,
}

impl<T: Copy> RasterField<T> {
    /// Create a field with every cell set to `fill`
    pub fn new(width: u32, height: u32, mapping: GridMapping, fill: T) -> Self {
        Self {
            width,
            height,
            samples: vec![fill; width as usize * height as usize],
            mapping,
            dirty: true,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn mapping(&self) -> &GridMapping {
        &self.mapping
    }

    /// Row-major sample storage, for upload by the renderer
    pub fn samples(&self) -> &[T] {
        &self.samples
    }

    /// Resolve the cell a world position falls in
    pub fn cell_at(&self, world: Vec2) -> Result<Cell, SimError> {
        let grid = self.mapping.to_grid(world);
        self.grid_cell(grid)
    }

    /// Resolve the cell for an already-mapped grid coordinate
    pub fn grid_cell(&self, grid: Vec2) -> Result<Cell, SimError> {
        // Checked before truncation so (-0.5, _) is not folded onto column 0
        let inside = grid.x >= 0.0
            && grid.y >= 0.0
            && grid.x < self.width as f32
            && grid.y < self.height as f32;
        if !inside {
            return Err(SimError::OutOfDomain {
                x: grid.x,
                y: grid.y,
                width: self.width,
                height: self.height,
            });
        }
        // Float rounding can still land exactly on the edge
        let cell = Cell::new(grid.x as u32, grid.y as u32);
        self.check_cell(cell)?;
        Ok(cell)
    }

    pub fn contains(&self, world: Vec2) -> bool {
        self.cell_at(world).is_ok()
    }

    /// Sample at a world position
    pub fn get(&self, world: Vec2) -> Result<T, SimError> {
        let cell = self.cell_at(world)?;
        Ok(self.samples[self.index(cell)])
    }

    /// Overwrite the sample at a world position and mark the field dirty
    pub fn set(&mut self, world: Vec2, value: T) -> Result<(), SimError> {
        let cell = self.cell_at(world)?;
        self.write(cell, value);
        Ok(())
    }

    /// Sample by cell index
    pub fn get_cell(&self, cell: Cell) -> Result<T, SimError> {
        self.check_cell(cell)?;
        Ok(self.samples[self.index(cell)])
    }

    /// Overwrite by cell index
    pub fn set_cell(&mut self, cell: Cell, value: T) -> Result<(), SimError> {
        self.check_cell(cell)?;
        self.write(cell, value);
        Ok(())
    }

    /// Set every cell to `value`
    pub fn fill(&mut self, value: T) {
        self.samples.fill(value);
        self.dirty = true;
    }

    /// Rewrite every cell from its index
    pub fn fill_with(&mut self, mut f: impl FnMut(Cell) -> T) {
        let width = self.width;
        for (i, sample) in self.samples.iter_mut().enumerate() {
            let i = i as u32;
            *sample = f(Cell::new(i % width, i / width));
        }
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Check-and-clear the redraw flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    fn write(&mut self, cell: Cell, value: T) {
        let i = self.index(cell);
        self.samples[i] = value;
        self.dirty = true;
    }

    fn check_cell(&self, cell: Cell) -> Result<(), SimError> {
        if cell.x < self.width && cell.y < self.height {
            Ok(())
        } else {
            Err(SimError::OutOfDomain {
                x: cell.x as f32,
                y: cell.y as f32,
                width: self.width,
                height: self.height,
            })
        }
    }

    #[inline]
    fn index(&self, cell: Cell) -> usize {
        cell.y as usize * self.width as usize + cell.x as usize
    }
}
