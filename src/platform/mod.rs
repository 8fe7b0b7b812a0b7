//! Platform abstraction layer
//!
//! The browser host owns the frame loop, input and rendering. It drives the
//! simulation through [`web::WebSim`] once per animation frame and reads the
//! rasters back when their dirty flags are set.

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebSim;
