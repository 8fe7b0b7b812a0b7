//! wasm-bindgen surface for the browser host

use wasm_bindgen::prelude::*;

use crate::settings::Settings;
use crate::sim::{ControlInput, SimState, TickReport, tick};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    // A second init (hot reload) is harmless
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Color Miner core loaded");
}

/// Simulation handle owned by the JS frame loop
#[wasm_bindgen]
pub struct WebSim {
    state: SimState,
    input: ControlInput,
    last_report: Option<TickReport>,
}

#[wasm_bindgen]
impl WebSim {
    /// Build from a JSON settings string; empty string means defaults
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: &str) -> Result<WebSim, JsValue> {
        let settings = if settings_json.trim().is_empty() {
            Settings::default()
        } else {
            Settings::from_json(settings_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        let state = SimState::new(settings).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            state,
            input: ControlInput::default(),
            last_report: None,
        })
    }

    /// Latch key state for the next step
    pub fn set_input(&mut self, forward: bool, turn_left: bool, turn_right: bool) {
        self.input = ControlInput {
            forward,
            turn_left,
            turn_right,
        };
    }

    /// Run one frame at host time `t`
    pub fn step(&mut self, t: f32) {
        self.last_report = Some(tick(&mut self.state, &self.input, t));
    }

    /// Player position as [x, y, z]
    pub fn player_position(&self) -> Vec<f32> {
        self.state.player.position.to_array().to_vec()
    }

    pub fn player_heading(&self) -> f32 {
        self.state.controls.heading
    }

    /// Bot positions, flattened [x, y, z] triples
    pub fn bot_positions(&self) -> Vec<f32> {
        self.state
            .bots
            .iter()
            .flat_map(|b| b.position.to_array())
            .collect()
    }

    /// Bots blocked by painted ground last step
    pub fn blocked_bots(&self) -> usize {
        self.last_report.as_ref().map_or(0, TickReport::blocked)
    }

    pub fn height_width(&self) -> u32 {
        self.state.terrain.heights().width()
    }

    pub fn height_height(&self) -> u32 {
        self.state.terrain.heights().height()
    }

    /// Copy of the height samples (row-major)
    pub fn heights(&self) -> Vec<f32> {
        self.state.terrain.heights().samples().to_vec()
    }

    pub fn color_width(&self) -> u32 {
        self.state.terrain.colors().width()
    }

    pub fn color_height(&self) -> u32 {
        self.state.terrain.colors().height()
    }

    /// Copy of the color samples, RGBA per cell (row-major)
    pub fn colors(&self) -> Vec<f32> {
        bytemuck::cast_slice(self.state.terrain.colors().samples()).to_vec()
    }

    pub fn take_height_dirty(&mut self) -> bool {
        self.state.terrain.take_height_dirty()
    }

    pub fn take_color_dirty(&mut self) -> bool {
        self.state.terrain.take_color_dirty()
    }

    /// Visible particles of every emitter, flattened [x, y, z, size, r, g, b, a]
    pub fn particles(&self) -> Vec<f32> {
        let instances: Vec<_> = self
            .state
            .emitters()
            .flat_map(|e| e.pool().instances())
            .collect();
        bytemuck::cast_slice(&instances).to_vec()
    }
}
