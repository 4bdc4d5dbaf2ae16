//! Stroke tools - a brush dragged between two normalized viewport points.
//!
//! The line is stamped at half-radius spacing; each stamp covers a disc with a
//! Gaussian falloff. Coordinates and radius are clamped, never rejected.

use crate::domain::{CellState, Material};
use crate::systems::air::AIR_SCALE;
use crate::systems::behaviors::UpdateContext;
use crate::systems::effects::{beam, cast_beam};

use super::{Entity, EntityKind, Simulation};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tool {
    Paint(Material),
    Erase,
    Wind,
    Heat,
    Cold,
    Spawn(EntityKind),
    Beam,
}

impl Tool {
    /// Decode a tool id plus its argument (material or entity kind).
    /// Unknown ids give `None`, which callers treat as a no-op.
    pub fn from_ids(tool: u8, arg: u8) -> Option<Tool> {
        match tool {
            0 => Material::from_id(arg).map(Tool::Paint),
            1 => Some(Tool::Erase),
            2 => Some(Tool::Wind),
            3 => Some(Tool::Heat),
            4 => Some(Tool::Cold),
            5 => EntityKind::from_id(arg).map(Tool::Spawn),
            6 => Some(Tool::Beam),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToolState {
    pub tool: Tool,
    /// Brush radius in cells.
    pub radius: f32,
    /// 0..=1. At 1 paint and erase cover the whole disc; below it they thin
    /// out toward the rim. Also scales wind force and heat/cold odds.
    pub strength: f32,
    /// Wind and beam direction; zero means along the stroke.
    pub direction: (f32, f32),
    /// 0..=1 random share of the injected wind.
    pub turbulence: f32,
    /// Paint over occupied cells instead of filling only empty ones.
    pub overwrite: bool,
}

impl ToolState {
    pub fn new(tool: Tool, radius: f32) -> Self {
        Self { tool, radius, strength: 1.0, direction: (0.0, 0.0), turbulence: 0.0, overwrite: false }
    }
}

#[inline]
fn unit_or_zero(v: f32) -> f32 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}

/// Normalized viewport point to world cell coordinates.
fn to_world(sim: &Simulation, (nx, ny): (f32, f32)) -> (f32, f32) {
    (
        unit_or_zero(nx) * (sim.grid.width() - 1) as f32,
        unit_or_zero(ny) * (sim.grid.height() - 1) as f32,
    )
}

fn normalized(dx: f32, dy: f32) -> Option<(f32, f32)> {
    let len = (dx * dx + dy * dy).sqrt();
    if !len.is_finite() || len < 1e-4 {
        return None;
    }
    Some((dx / len, dy / len))
}

#[inline]
fn falloff(d2: f32, radius: f32) -> f32 {
    let sigma = (radius * 0.5).max(0.5);
    (-d2 / (2.0 * sigma * sigma)).exp()
}

pub(super) fn apply_stroke(sim: &mut Simulation, from: (f32, f32), to: (f32, f32), tool: &ToolState) {
    let (x0, y0) = to_world(sim, from);
    let (x1, y1) = to_world(sim, to);
    let radius = if tool.radius.is_finite() { tool.radius.clamp(0.0, sim.config.max_brush_radius) } else { 0.0 };
    let strength = unit_or_zero(tool.strength);
    let direction = normalized(tool.direction.0, tool.direction.1).or_else(|| normalized(x1 - x0, y1 - y0));

    match tool.tool {
        Tool::Beam => {
            if let Some((dx, dy)) = direction {
                let length = sim.config.beam_length;
                let mut ctx = sim.context();
                cast_beam(&mut ctx, x1.round() as i32, y1.round() as i32, dx, dy, length);
            }
            return;
        }
        Tool::Spawn(kind) => {
            let spawned = sim.entities.spawn(Entity { x: x1, y: y1, vx: 0.0, vy: 0.0, kind });
            if spawned.is_none() {
                log::debug!("entity arena full ({}), spawn ignored", sim.entities.capacity());
            }
            return;
        }
        _ => {}
    }

    let (sx, sy) = (x1 - x0, y1 - y0);
    let spacing = (radius * 0.5).max(1.0);
    let stamps = ((sx * sx + sy * sy).sqrt() / spacing).ceil() as u32;
    for i in 0..=stamps {
        let t = if stamps == 0 { 1.0 } else { i as f32 / stamps as f32 };
        let (cx, cy) = (x0 + sx * t, y0 + sy * t);
        match tool.tool {
            Tool::Wind => stamp_wind(sim, cx, cy, radius, strength, direction, unit_or_zero(tool.turbulence)),
            _ => stamp_cells(sim, cx, cy, radius, strength, tool),
        }
    }
}

fn stamp_cells(sim: &mut Simulation, cx: f32, cy: f32, radius: f32, strength: f32, tool: &ToolState) {
    let mut ctx = sim.context();
    let transform_odds = ctx.rules.misc.tool_transform_chance * strength;
    let full = strength >= 1.0;
    let (icx, icy) = (cx.round() as i32, cy.round() as i32);
    let r = radius.ceil() as i32;

    for dy in -r..=r {
        for dx in -r..=r {
            let d2 = (dx * dx + dy * dy) as f32;
            if d2 > radius * radius {
                continue;
            }
            let (x, y) = (icx + dx, icy + dy);
            if !ctx.in_bounds(x, y) {
                continue;
            }
            let weight = falloff(d2, radius);
            match tool.tool {
                Tool::Paint(material) => {
                    if !full && !ctx.chance(strength * weight) {
                        continue;
                    }
                    let current = ctx.material(x, y);
                    if current.is_empty() || (tool.overwrite && current != material) || material.is_empty() {
                        ctx.replace(x, y, material);
                    }
                }
                Tool::Erase => {
                    if full || ctx.chance(strength * weight) {
                        ctx.clear(x, y);
                    }
                }
                Tool::Heat => {
                    if ctx.chance(transform_odds * weight) {
                        let state = ctx.state(x, y);
                        if let Some(next) = heated(&mut ctx, state) {
                            ctx.set(x, y, next);
                        }
                    }
                }
                Tool::Cold => {
                    if ctx.chance(transform_odds * weight) {
                        if let Some(next) = chilled(ctx.material(x, y)) {
                            ctx.replace(x, y, next);
                        }
                    }
                }
                Tool::Wind | Tool::Spawn(_) | Tool::Beam => {}
            }
        }
    }
}

/// Heat tool: the beam's heating plus sand vitrifying into glass.
fn heated(ctx: &mut UpdateContext, state: CellState) -> Option<CellState> {
    match state.material() {
        Material::Sand | Material::WetSand => Some(CellState::fresh(Material::Glass, ctx.rules)),
        _ => beam::heated(ctx, state),
    }
}

fn chilled(material: Material) -> Option<Material> {
    match material {
        Material::Water => Some(Material::Ice),
        Material::Lava => Some(Material::Basalt),
        Material::Steam => Some(Material::Water),
        Material::Fire | Material::Spark => Some(Material::Empty),
        _ => None,
    }
}

/// Directional strokes push velocity; a stationary click without a
/// direction pushes pressure instead.
fn stamp_wind(
    sim: &mut Simulation,
    cx: f32,
    cy: f32,
    radius: f32,
    strength: f32,
    direction: Option<(f32, f32)>,
    turbulence: f32,
) {
    let force = sim.config.wind_tool_force * strength;
    let reach = radius.max(AIR_SCALE as f32);
    let (ax0, ay0) = sim.air.cell_of(cx - reach, cy - reach);
    let (ax1, ay1) = sim.air.cell_of(cx + reach, cy + reach);
    let half = AIR_SCALE as f32 * 0.5;

    for ay in ay0..=ay1 {
        for ax in ax0..=ax1 {
            let wx = (ax * AIR_SCALE) as f32 + half - cx;
            let wy = (ay * AIR_SCALE) as f32 + half - cy;
            let d2 = wx * wx + wy * wy;
            if d2 > reach * reach {
                continue;
            }
            let push = force * falloff(d2, reach);
            match direction {
                Some((dx, dy)) => {
                    let jx = turbulence * sim.rng.signed_unit();
                    let jy = turbulence * sim.rng.signed_unit();
                    let vx = push * ((1.0 - turbulence) * dx + jx);
                    let vy = push * ((1.0 - turbulence) * dy + jy);
                    sim.air.add_velocity_cell(ax, ay, vx, vy);
                }
                None => sim.air.add_pressure_cell(ax, ay, push),
            }
        }
    }
}
