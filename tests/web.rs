//! Browser smoke tests: `wasm-pack test --headless --chrome`
#![cfg(target_arch = "wasm32")]

use dustwind_engine::{Material, World};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn world_ticks_and_exposes_buffers() {
    dustwind_engine::init();
    let mut world = World::new(64, 64);
    world.apply_stroke(0.5, 0.1, 0.5, 0.1, 0, Material::Water.id(), 4.0, 1.0);
    assert!(world.tick(16.0));
    assert!(!world.types_ptr().is_null());
    assert_eq!(world.chunks_x() * world.chunks_y(), 4);
}

#[wasm_bindgen_test]
fn bad_config_is_reported_to_js() {
    let mut world = World::new(16, 16);
    assert!(world.load_config("{".to_string()).is_err());
    assert!(world.config_json().is_ok());
}
