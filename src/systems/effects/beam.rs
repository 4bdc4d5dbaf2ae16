//! Beam - heat ray traced cell by cell with a DDA walk.
//!
//! Burnables ignite, ice melts, water boils and charges are set off along the
//! way. The ray stops at the first rigid cell it reaches.

use crate::domain::cell_state::{Fuse, Instability};
use crate::domain::materials::{FLAG_BURNABLE, FLAG_INDESTRUCTIBLE};
use crate::domain::{CellState, Material};
use crate::systems::behaviors::UpdateContext;

/// Hard cap on traced cells.
const MAX_BEAM_STEPS: u32 = 1024;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BeamReport {
    /// Cells visited, including the one that stopped the ray.
    pub steps: u32,
    pub transformed: u32,
    pub stopped_at: Option<(i32, i32)>,
}

/// Heat applied to one cell; `None` leaves it alone.
pub(crate) fn heated(ctx: &mut UpdateContext, state: CellState) -> Option<CellState> {
    let rules = ctx.rules;
    let material = state.material();
    let next = match state {
        CellState::Nitro(_) => CellState::Nitro(Instability::PRIMED),
        CellState::Gunpowder(_) => CellState::Gunpowder(Instability::PRIMED),
        CellState::Methane(_) => CellState::Methane(Instability::PRIMED),
        CellState::Tnt(Fuse(0)) => CellState::Tnt(Fuse(rules.explosive.tnt_fuse.max(1))),
        CellState::Tnt(_) => return None,
        _ if material == Material::Ice => CellState::fresh(Material::Water, rules),
        _ if material == Material::Water => CellState::spawn(Material::Steam, ctx.rng, rules),
        _ if material.info().has(FLAG_BURNABLE) => CellState::spawn(Material::Fire, ctx.rng, rules),
        _ => return None,
    };
    Some(next)
}

/// Trace from the center of (x0, y0) along (dx, dy) for `length` cells.
pub fn cast_beam(ctx: &mut UpdateContext, x0: i32, y0: i32, dx: f32, dy: f32, length: u32) -> BeamReport {
    let mut report = BeamReport::default();
    let len = (dx * dx + dy * dy).sqrt();
    if !len.is_finite() || len < 1e-4 || !ctx.in_bounds(x0, y0) {
        return report;
    }
    let (ux, uy) = (dx / len, dy / len);

    let step_x = if ux > 0.0 { 1 } else if ux < 0.0 { -1 } else { 0 };
    let step_y = if uy > 0.0 { 1 } else if uy < 0.0 { -1 } else { 0 };
    let inv_x = if ux != 0.0 { 1.0 / ux.abs() } else { f32::INFINITY };
    let inv_y = if uy != 0.0 { 1.0 / uy.abs() } else { f32::INFINITY };

    let (mut cx, mut cy) = (x0, y0);
    // Start from the cell center, so the first boundary is half a cell away.
    let mut t_max_x = if step_x != 0 { 0.5 * inv_x } else { f32::INFINITY };
    let mut t_max_y = if step_y != 0 { 0.5 * inv_y } else { f32::INFINITY };

    let max_steps = length.clamp(1, MAX_BEAM_STEPS);
    while report.steps < max_steps {
        if t_max_x < t_max_y {
            cx += step_x;
            t_max_x += inv_x;
        } else {
            cy += step_y;
            t_max_y += inv_y;
        }
        if !ctx.in_bounds(cx, cy) {
            break;
        }
        report.steps += 1;

        let state = ctx.state(cx, cy);
        let info = state.material().info();
        if info.has(FLAG_INDESTRUCTIBLE) {
            report.stopped_at = Some((cx, cy));
            break;
        }
        if let Some(next) = heated(ctx, state) {
            if ctx.set(cx, cy, next) {
                report.transformed += 1;
            }
        }
        if info.is_rigid() {
            report.stopped_at = Some((cx, cy));
            break;
        }
    }
    report
}
