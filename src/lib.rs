//! Dustwind Engine - pixel sandbox simulation kernel in WASM
//!
//! Architecture:
//! - core/        - RNG shared by every layer
//! - domain/      - materials, per-cell state, rule tables
//! - spatial/     - grid storage and the chunk scheduler
//! - systems/     - material behaviors, air field, trigger effects
//! - simulation/  - the `Simulation` owner, tick, tools, config, wasm facade

pub mod core;
pub mod domain;
pub mod spatial;
pub mod systems;
pub mod simulation;

pub use domain::cell_state;
pub use domain::materials;
pub use spatial::chunks;
pub use spatial::grid;
pub use systems::air;
pub use systems::behaviors;
pub use systems::effects;

use wasm_bindgen::prelude::*;

// Re-export wasm-bindgen-rayon for thread pool initialization
#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
pub use wasm_bindgen_rayon::init_thread_pool;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    #[cfg(target_arch = "wasm32")]
    {
        // A second init keeps the first logger.
        let _ = console_log::init_with_level(log::Level::Info);
    }

    web_sys::console::log_1(&"Dustwind engine initialized".into());
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Re-export main types
pub use domain::{CellState, Material, RuleRates};
pub use simulation::{ConfigError, SimConfig, Simulation, TickStats, Tool, ToolState, World};

#[wasm_bindgen]
pub fn material_count() -> u8 {
    domain::materials::MATERIAL_COUNT as u8
}

/// Display name for a material id; empty for unknown ids.
#[wasm_bindgen]
pub fn material_name(id: u8) -> String {
    Material::from_id(id).map(|m| m.name().to_string()).unwrap_or_default()
}
