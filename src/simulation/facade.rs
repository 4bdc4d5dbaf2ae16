use wasm_bindgen::prelude::*;

use super::{Simulation, TickStats, Tool, ToolState};

/// JS-facing handle around `Simulation`.
#[wasm_bindgen]
pub struct World {
    core: Simulation,
    brush_direction: (f32, f32),
    brush_turbulence: f32,
    brush_overwrite: bool,
}

#[wasm_bindgen]
impl World {
    /// Create a new world with given dimensions
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            core: Simulation::new(width, height),
            brush_direction: (0.0, 0.0),
            brush_turbulence: 0.0,
            brush_overwrite: false,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.core.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.core.height()
    }

    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> f64 {
        self.core.frame() as f64
    }

    /// Advance one step; false while paused.
    pub fn tick(&mut self, dt_hint: f32) -> bool {
        self.core.tick(dt_hint)
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.core.set_paused(paused);
    }

    pub fn is_paused(&self) -> bool {
        self.core.is_paused()
    }

    // === Tools ===

    pub fn set_brush_direction(&mut self, dx: f32, dy: f32) {
        self.brush_direction = (dx, dy);
    }

    pub fn set_brush_turbulence(&mut self, turbulence: f32) {
        self.brush_turbulence = turbulence;
    }

    pub fn set_brush_overwrite(&mut self, overwrite: bool) {
        self.brush_overwrite = overwrite;
    }

    /// Drag tool `tool` (with material or entity id `arg`) between two
    /// normalized points. Unknown ids do nothing.
    #[allow(clippy::too_many_arguments)]
    pub fn apply_stroke(
        &mut self,
        from_x: f32,
        from_y: f32,
        to_x: f32,
        to_y: f32,
        tool: u8,
        arg: u8,
        radius: f32,
        strength: f32,
    ) {
        let Some(tool) = Tool::from_ids(tool, arg) else {
            return;
        };
        let state = ToolState {
            tool,
            radius,
            strength,
            direction: self.brush_direction,
            turbulence: self.brush_turbulence,
            overwrite: self.brush_overwrite,
        };
        self.core.apply_stroke((from_x, from_y), (to_x, to_y), &state);
    }

    pub fn set_wind(&mut self, vx: f32, vy: f32) {
        self.core.set_wind(vx, vy);
    }

    /// Returns cells burned by the blast.
    pub fn trigger_explosion(&mut self, x: i32, y: i32, radius: u32, pressure: f32) -> u32 {
        self.core.trigger_explosion(x, y, radius, pressure).burned
    }

    /// Returns the number of branches the bolt grew.
    pub fn trigger_lightning(&mut self, x: i32, y: i32) -> u32 {
        self.core.trigger_lightning(x, y).branches as u32
    }

    // === Queries ===

    pub fn sample_material(&self, x: f32, y: f32) -> u8 {
        self.core.sample_material(x, y).id()
    }

    pub fn sample_velocity_x(&self, x: f32, y: f32) -> f32 {
        self.core.sample_velocity(x, y).0
    }

    pub fn sample_velocity_y(&self, x: f32, y: f32) -> f32 {
        self.core.sample_velocity(x, y).1
    }

    pub fn sample_pressure(&self, x: f32, y: f32) -> f32 {
        self.core.sample_pressure(x, y)
    }

    pub fn entity_count(&self) -> u32 {
        self.core.entities().len() as u32
    }

    pub fn stats(&self) -> TickStats {
        self.core.stats()
    }

    // === Render surface ===

    pub fn types_ptr(&self) -> *const u8 {
        self.core.types_ptr()
    }

    pub fn aux_ptr(&self) -> *const u8 {
        self.core.aux_ptr()
    }

    pub fn chunks_x(&self) -> u32 {
        self.core.chunks().dimensions().0
    }

    pub fn chunks_y(&self) -> u32 {
        self.core.chunks().dimensions().1
    }

    pub fn active_chunk_count(&self) -> u32 {
        self.core.chunks().active_chunk_count() as u32
    }

    pub fn dirty_chunks(&self) -> Vec<u32> {
        self.core.dirty_chunks()
    }

    pub fn clear_dirty_chunks(&mut self) {
        self.core.clear_dirty_chunks();
    }

    // === Lifecycle ===

    pub fn reset(&mut self, width: u32, height: u32) {
        self.core.reset(width, height);
    }

    pub fn clear(&mut self) {
        self.core.clear();
    }

    pub fn load_config(&mut self, json: String) -> Result<(), JsValue> {
        self.core.load_config(&json).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn config_json(&self) -> Result<String, JsValue> {
        self.core.config_json().map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
