use crate::domain::Material;
use crate::systems::effects::{self, ExplosionReport, LightningReport};

use super::Simulation;

pub(super) fn paint(sim: &mut Simulation, x: i32, y: i32, material: Material) -> bool {
    let mut ctx = sim.context();
    ctx.replace(x, y, material)
}

/// Paint a rectangle, clipped to the world. Returns cells changed.
pub(super) fn fill_rect(sim: &mut Simulation, x: i32, y: i32, w: u32, h: u32, material: Material) -> u32 {
    let mut ctx = sim.context();
    let mut changed = 0;
    for py in y..y.saturating_add(h as i32) {
        for px in x..x.saturating_add(w as i32) {
            if ctx.replace(px, py, material) {
                changed += 1;
            }
        }
    }
    changed
}

pub(super) fn clear(sim: &mut Simulation) {
    sim.grid.clear();
    sim.chunks.reset();
    sim.air.clear();
    sim.entities.clear();
    sim.stats.reset();
    log::debug!("simulation cleared ({}x{})", sim.grid.width(), sim.grid.height());
}

pub(super) fn trigger_explosion(
    sim: &mut Simulation,
    x: i32,
    y: i32,
    radius: u32,
    pressure: f32,
) -> ExplosionReport {
    if !sim.grid.in_bounds(x, y) {
        return ExplosionReport::default();
    }
    let mut ctx = sim.context();
    effects::explode(&mut ctx, x, y, radius, pressure)
}

pub(super) fn trigger_lightning(sim: &mut Simulation, x: i32, y: i32) -> LightningReport {
    if !sim.grid.in_bounds(x, y) {
        return LightningReport::default();
    }
    let mut ctx = sim.context();
    effects::strike(&mut ctx, x, y)
}
