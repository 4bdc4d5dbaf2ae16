//! Lightning - a small tree of branches stepped breadth-first toward a ground target.
//!
//! The main branch steers at the best strike point below the cloud; side
//! branches wander and may fizzle. A branch ends on the first non-open cell,
//! with a shockwave and a spray of sparks sized by what it hit.

use crate::domain::materials::{FLAG_BURNABLE, FLAG_CONDUCTIVE, FLAG_WET};
use crate::domain::Material;
use crate::systems::behaviors::UpdateContext;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchRole {
    Main,
    Side,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Branch {
    pub x: i32,
    pub y: i32,
    pub active: bool,
    pub role: BranchRole,
}

impl Branch {
    fn new(x: i32, y: i32, role: BranchRole) -> Self {
        Self { x, y, active: true, role }
    }
}

/// How a branch ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    Liquid,
    Conductor,
    Solid,
    /// Side branch died out in the air.
    Faded,
    /// Left the world.
    Edge,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LightningReport {
    pub target: Option<(i32, i32)>,
    pub branches: usize,
    pub steps: u32,
    pub ends: Vec<(i32, i32, Termination)>,
}

impl LightningReport {
    pub fn hit(&self, kind: Termination) -> bool {
        self.ends.iter().any(|&(_, _, t)| t == kind)
    }
}

/// Best strike point under (x, y): the first non-open cell of each nearby
/// column, preferring conductors, then liquids, then anything solid, and
/// closer cells within a class.
fn find_target(ctx: &UpdateContext, x: i32, y: i32) -> Option<(i32, i32)> {
    let search = ctx.rules.lightning.target_search as i32;
    let height = ctx.grid.height() as i32;
    let mut best: Option<(i32, (i32, i32))> = None;
    for dx in -search..=search {
        let tx = x + dx;
        if !ctx.in_bounds(tx, y) {
            continue;
        }
        let Some(ty) = (y + 1..height).find(|&ty| !ctx.info(tx, ty).is_open()) else {
            continue;
        };
        let info = ctx.info(tx, ty);
        let class = if info.has(FLAG_CONDUCTIVE) {
            3
        } else if info.is_fluid() {
            2
        } else {
            1
        };
        let score = class * 10_000 - (ty - y) - 2 * dx.abs();
        if best.map_or(true, |(s, _)| score > s) {
            best = Some((score, (tx, ty)));
        }
    }
    best.map(|(_, at)| at)
}

fn spray_sparks(ctx: &mut UpdateContext, x: i32, y: i32, count: u32) {
    for _ in 0..count {
        let sx = x + ctx.rng.range(-2, 2);
        let sy = y + ctx.rng.range(-2, 0);
        if ctx.in_bounds(sx, sy) && ctx.material(sx, sy) == Material::Empty {
            ctx.replace(sx, sy, Material::Spark);
        }
    }
}

/// Discharge from the cloud cell at (x, y).
pub fn strike(ctx: &mut UpdateContext, x: i32, y: i32) -> LightningReport {
    let rules = ctx.rules;
    let rates = &rules.lightning;
    let height = ctx.grid.height() as i32;

    let mut report = LightningReport { target: find_target(ctx, x, y), ..Default::default() };
    let (target_x, _) = report.target.unwrap_or((x, height - 1));

    let mut branches = vec![Branch::new(x, y, BranchRole::Main)];
    let max_branches = rates.max_branches.max(1);

    while branches.iter().any(|b| b.active) {
        report.steps += 1;
        // Branches spawned during this step start moving on the next one.
        for i in 0..branches.len() {
            let b = branches[i];
            if !b.active {
                continue;
            }
            if b.role == BranchRole::Side && ctx.chance(rates.side_stop_chance) {
                branches[i].active = false;
                report.ends.push((b.x, b.y, Termination::Faded));
                continue;
            }

            let mut dx = match b.role {
                BranchRole::Main => (target_x - b.x).signum(),
                BranchRole::Side => ctx.rng.range(-1, 1),
            };
            if ctx.chance(rates.jitter) {
                dx = ctx.rng.range(-1, 1);
            }
            let (nx, ny) = (b.x + dx, b.y + 1);
            if !ctx.in_bounds(nx, ny) {
                branches[i].active = false;
                report.ends.push((b.x, b.y, Termination::Edge));
                continue;
            }

            let material = ctx.material(nx, ny);
            let info = material.info();
            if info.is_open() {
                if material != Material::Cloud {
                    if ctx.chance(rates.spark_chance) {
                        ctx.replace(nx, ny, Material::Spark);
                    } else if info.has(FLAG_BURNABLE) {
                        ctx.replace(nx, ny, Material::Fire);
                    }
                }
                ctx.push_pressure(nx, ny, rates.path_pressure);
                branches[i].x = nx;
                branches[i].y = ny;
                if b.role == BranchRole::Main
                    && branches.len() < max_branches
                    && ctx.chance(rates.side_branch_chance)
                {
                    branches.push(Branch::new(nx, ny, BranchRole::Side));
                }
                continue;
            }

            let (kind, shock) = if info.has(FLAG_CONDUCTIVE) {
                (Termination::Conductor, rates.conductor_shock)
            } else if info.is_fluid() {
                (Termination::Liquid, rates.liquid_shock)
            } else {
                (Termination::Solid, rates.solid_shock)
            };
            if kind == Termination::Liquid && info.has(FLAG_WET) {
                ctx.replace(nx, ny, Material::Steam);
            }
            ctx.air.add_radial_impulse(nx as f32 + 0.5, ny as f32 + 0.5, 6.0, shock);
            spray_sparks(ctx, b.x, b.y, rates.spray_sparks);
            branches[i].active = false;
            report.ends.push((nx, ny, kind));
        }
    }

    report.branches = branches.len();
    log::debug!(
        "lightning from ({x}, {y}): {} branches, {} steps, target {:?}",
        report.branches,
        report.steps,
        report.target
    );
    report
}
