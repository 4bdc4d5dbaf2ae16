use wasm_bindgen::prelude::*;

/// Snapshot of the last tick.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickStats {
    pub(super) tick_ms: f64,
    pub(super) rules_ms: f64,
    pub(super) air_ms: f64,
    pub(super) cells_processed: u32,
    pub(super) cells_mutated: u32,
    /// Active chunks when the tick started.
    pub(super) active_chunks: u32,
    /// Sleeping chunks re-armed by wind this tick.
    pub(super) wind_woken_chunks: u32,
    pub(super) slow_pass: bool,
    pub(super) dt_hint: f32,
}

impl TickStats {
    pub(crate) fn reset(&mut self) {
        *self = TickStats::default();
    }
}

#[wasm_bindgen]
impl TickStats {
    #[wasm_bindgen(getter)]
    pub fn tick_ms(&self) -> f64 { self.tick_ms }
    #[wasm_bindgen(getter)]
    pub fn rules_ms(&self) -> f64 { self.rules_ms }
    #[wasm_bindgen(getter)]
    pub fn air_ms(&self) -> f64 { self.air_ms }
    #[wasm_bindgen(getter)]
    pub fn cells_processed(&self) -> u32 { self.cells_processed }
    #[wasm_bindgen(getter)]
    pub fn cells_mutated(&self) -> u32 { self.cells_mutated }
    #[wasm_bindgen(getter)]
    pub fn active_chunks(&self) -> u32 { self.active_chunks }
    #[wasm_bindgen(getter)]
    pub fn wind_woken_chunks(&self) -> u32 { self.wind_woken_chunks }
    #[wasm_bindgen(getter)]
    pub fn slow_pass(&self) -> bool { self.slow_pass }
    #[wasm_bindgen(getter)]
    pub fn dt_hint(&self) -> f32 { self.dt_hint }
}
