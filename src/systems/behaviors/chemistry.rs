//! Chemistry - acid, lava, metal, ice and foam.
//!
//! Contact reactions that must happen the moment two materials meet (acid
//! eating a neighbor, lava hitting water) are exposed to the fluid pass; the
//! slow state machines (lava heat and crust, rusting, melting, foam decay)
//! run in the slow pass.

use super::{Behavior, UpdateContext, NEIGHBORS_4, NEIGHBORS_8};
use crate::domain::cell_state::{AcidState, Lifetime, LavaState};
use crate::domain::materials::{FLAG_BURNABLE, FLAG_EXPLOSIVE, FLAG_ORGANIC, FLAG_SURFACTANT, FLAG_WET};
use crate::domain::{CellState, Material};

/// Acid contact step. Returns true when the acid cell itself changed material.
pub(super) fn dissolve_neighbors(ctx: &mut UpdateContext) -> bool {
    let (x, y) = ctx.here();
    let rules = ctx.rules;
    let rates = &rules.acid;
    let CellState::Acid(AcidState { mut strength }) = ctx.state(x, y) else {
        return false;
    };

    // Surfactant neutralizes on contact.
    if let Some((nx, ny)) = ctx.find_around(x, y, &NEIGHBORS_4, |m| m.info().has(FLAG_SURFACTANT)) {
        ctx.replace(nx, ny, Material::Foam);
        ctx.replace(x, y, Material::Foam);
        return true;
    }

    let before = strength;
    for (dx, dy) in NEIGHBORS_4 {
        if strength == 0 {
            break;
        }
        let (nx, ny) = (x + dx, y + dy);
        if !ctx.in_bounds(nx, ny) {
            continue;
        }
        let target = ctx.material(nx, ny);
        let product = if target.info().has(FLAG_ORGANIC) {
            ctx.chance(rates.organic_chance).then_some(Material::Smoke)
        } else if target == Material::Metal {
            ctx.chance(rates.metal_chance).then_some(Material::Rust)
        } else if target == Material::Stone {
            ctx.chance(rates.stone_chance).then_some(Material::Gravel)
        } else {
            None
        };
        if let Some(product) = product {
            ctx.replace(nx, ny, product);
            strength = strength.saturating_sub(rates.cost);
        }
    }

    if strength == 0 {
        ctx.replace(x, y, Material::Water);
        return true;
    }
    if strength != before {
        ctx.set(x, y, CellState::Acid(AcidState { strength }));
    }
    false
}

/// Lava meeting water-like liquid solidifies; the liquid flashes to steam and
/// the air takes a pressure kick. Returns true when the lava cell is gone.
pub(super) fn quench_lava(ctx: &mut UpdateContext) -> bool {
    let (x, y) = ctx.here();
    let rules = ctx.rules;
    let rates = &rules.lava;
    let CellState::Lava(lava) = ctx.state(x, y) else {
        return false;
    };
    let wet = ctx.count_around(x, y, &NEIGHBORS_4, |m| m.info().has(FLAG_WET));
    if wet == 0 {
        return false;
    }

    let product = if lava.heat >= rates.quench_heat && wet >= rates.quench_liquid as u32 {
        Material::Obsidian
    } else {
        Material::Basalt
    };
    for (dx, dy) in NEIGHBORS_4 {
        let (nx, ny) = (x + dx, y + dy);
        if ctx.in_bounds(nx, ny) && ctx.info(nx, ny).has(FLAG_WET) {
            ctx.replace(nx, ny, Material::Steam);
        }
    }
    ctx.replace(x, y, product);
    ctx.push_pressure(x, y, rates.quench_pressure);
    true
}

pub struct ChemistryBehavior;

impl ChemistryBehavior {
    pub fn new() -> Self {
        Self
    }

    /// Heat bookkeeping: exposed lava cools, pooled lava keeps warm, cool
    /// exposed lava may crust over, hot lava breaks its crust, cold lava sets.
    fn update_lava(&self, ctx: &mut UpdateContext, lava: LavaState) {
        let (x, y) = ctx.here();
        let rules = ctx.rules;
        let rates = &rules.lava;

        let exposed = ctx.count_around(x, y, &NEIGHBORS_4, |m| m.info().is_open());
        let pooled = ctx.count_around(x, y, &NEIGHBORS_4, |m| m == Material::Lava);

        let mut heat = lava.heat.saturating_sub((exposed as u8).saturating_mul(rates.cool_per_exposure));
        if pooled >= 3 {
            heat = heat.saturating_add(rates.heat_gain).min(LavaState::MAX_HEAT);
        }
        if heat == 0 {
            ctx.replace(x, y, Material::Basalt);
            return;
        }

        let mut crust = lava.crust;
        if !crust && heat < rates.crust_heat && exposed > 0 && ctx.chance(rates.crust_chance) {
            crust = true;
        } else if crust && heat >= rates.crust_break_heat {
            crust = false;
        }

        // Charges react to the heat themselves.
        if !crust {
            for (dx, dy) in NEIGHBORS_8 {
                let (nx, ny) = (x + dx, y + dy);
                if !ctx.in_bounds(nx, ny) {
                    continue;
                }
                let info = ctx.info(nx, ny);
                if info.has(FLAG_BURNABLE)
                    && !info.has(FLAG_EXPLOSIVE)
                    && ctx.chance(rates.ignite_chance)
                {
                    ctx.replace(nx, ny, Material::Fire);
                }
            }
        }

        ctx.set(x, y, CellState::Lava(LavaState::new(heat, crust)));
    }

    /// Rust needs liquid and an oxidizer (open air or vapor) side by side;
    /// adjacent acid speeds it up. Lava melts metal.
    fn update_metal(&self, ctx: &mut UpdateContext) {
        let (x, y) = ctx.here();
        let rules = ctx.rules;
        let rates = &rules.metal;

        if ctx.count_around(x, y, &NEIGHBORS_8, |m| m == Material::Lava) > 0 && ctx.chance(rates.melt_chance) {
            ctx.replace(x, y, Material::Lava);
            return;
        }

        let liquid = ctx.count_around(x, y, &NEIGHBORS_4, |m| m.info().has(FLAG_WET));
        let oxidizer = ctx.count_around(x, y, &NEIGHBORS_4, |m| matches!(m, Material::Empty | Material::Steam));
        if liquid == 0 || oxidizer == 0 {
            return;
        }
        let acid = ctx.count_around(x, y, &NEIGHBORS_4, |m| m == Material::Acid) > 0;
        let p = if acid { rates.rust_chance * rates.acid_rust_factor } else { rates.rust_chance };
        if ctx.chance(p) {
            ctx.replace(x, y, Material::Rust);
        }
    }

    fn update_ice(&self, ctx: &mut UpdateContext) {
        let (x, y) = ctx.here();
        let melt_chance = ctx.rules.misc.ice_melt_chance;
        let warm = ctx.count_around(x, y, &NEIGHBORS_8, |m| {
            matches!(m, Material::Fire | Material::Lava | Material::Steam)
        });
        if warm > 0 && ctx.chance(melt_chance) {
            ctx.replace(x, y, Material::Water);
        }
    }

    fn update_foam(&self, ctx: &mut UpdateContext, ttl: Lifetime) {
        let (x, y) = ctx.here();
        if ttl.0 <= 1 {
            ctx.clear(x, y);
        } else {
            ctx.set(x, y, CellState::Foam(Lifetime(ttl.0 - 1)));
        }
    }
}

impl Behavior for ChemistryBehavior {
    fn update(&self, ctx: &mut UpdateContext) {
        let (x, y) = ctx.here();
        match ctx.state(x, y) {
            CellState::Lava(lava) => self.update_lava(ctx, lava),
            CellState::Inert(Material::Metal) => self.update_metal(ctx),
            CellState::Inert(Material::Ice) => self.update_ice(ctx),
            CellState::Foam(ttl) => self.update_foam(ctx, ttl),
            _ => {}
        }
    }
}
