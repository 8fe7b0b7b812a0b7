//! Recoverable simulation conditions
//!
//! Neither variant is fatal. The tick turns both into skip outcomes.

use thiserror::Error;

#[derive(Debug, Clone, Copy, Error, PartialEq)]
pub enum SimError {
    /// A world coordinate mapped outside a raster's `[0,width) x [0,height)`
    #[error("grid coordinate ({x}, {y}) outside {width}x{height} field")]
    OutOfDomain {
        x: f32,
        y: f32,
        width: u32,
        height: u32,
    },
    /// Pursuit between two coincident positions
    #[error("pursuit direction between coincident positions is undefined")]
    DegenerateDirection,
}
