//! GasBehavior - Physics for gases and energy cells (smoke, steam, methane, fire, spark)
//!
//! Gases rise into lighter cells, spread sideways by their dispersion and get
//! carried by strong wind. Smoke and steam live on a per-tick lifetime; steam
//! that runs out condenses into cloud high up and into water below that.
//! Fire rises erratically into empty cells only; sparks stay put and arc
//! along conductors.

use super::{random_dir, wind_sign, Behavior, UpdateContext, NEIGHBORS_4, NEIGHBORS_8};
use crate::domain::cell_state::{CloudState, Lifetime};
use crate::domain::materials::{FLAG_BURNABLE, FLAG_CONDUCTIVE, FLAG_EXPLOSIVE};
use crate::domain::{can_displace, CellState, Material};

pub struct GasBehavior;

impl GasBehavior {
    pub fn new() -> Self {
        Self
    }

    /// Wind-driven sideways step for gases light enough to be carried.
    fn drift(ctx: &mut UpdateContext) -> bool {
        let (x, y) = ctx.here();
        let rules = ctx.rules;
        let (wx, _) = ctx.wind_at(x, y);
        let pushed = wx * ctx.info(x, y).coupling;
        if pushed.abs() < rules.gas.drift_threshold || !ctx.chance(rules.gas.drift_chance) {
            return false;
        }
        ctx.move_by(wind_sign(pushed), 0)
    }

    /// Up, then up-diagonals, then sideways within the dispersion reach.
    fn rise(ctx: &mut UpdateContext) -> bool {
        if Self::drift(ctx) || ctx.move_by(0, -1) {
            return true;
        }
        let (a, b) = random_dir(ctx.rng);
        if ctx.move_by(a, -1) || ctx.move_by(b, -1) {
            return true;
        }
        let (x, y) = ctx.here();
        let me = ctx.info(x, y);
        for dir in [a, b] {
            let mut target = None;
            for d in 1..=me.dispersion as i32 {
                let tx = x + dir * d;
                if !ctx.in_bounds(tx, y) || !can_displace(me, ctx.info(tx, y)) {
                    break;
                }
                target = Some(tx);
            }
            if let Some(tx) = target {
                if ctx.try_swap_if_denser(x, y, tx, y) {
                    ctx.at(tx as u32, y as u32);
                    return true;
                }
            }
        }
        false
    }

    /// Fire rises erratically: random attempt order avoids straight pillars.
    fn update_fire(&self, ctx: &mut UpdateContext) {
        let (x, y) = ctx.here();
        let rand = ctx.rng.next_u32();
        let lateral = if rand & 4 == 0 { -1 } else { 1 };
        let attempts = match rand & 3 {
            0 => [(0, -1), (lateral, -1), (lateral, 0), (-lateral, 0)],
            1 => [(lateral, -1), (0, -1), (-lateral, -1), (lateral, 0)],
            2 => [(0, -1), (-lateral, -1), (lateral, 0), (-lateral, 0)],
            _ => [(lateral, 0), (0, -1), (lateral, -1), (-lateral, -1)],
        };
        for (dx, dy) in attempts {
            let (tx, ty) = (x + dx, y + dy);
            if ctx.in_bounds(tx, ty) && ctx.material(tx, ty) == Material::Empty {
                ctx.swap(x, y, tx, ty);
                break;
            }
        }
    }

    fn update_spark(&self, ctx: &mut UpdateContext, ttl: Lifetime) {
        let (x, y) = ctx.here();
        let rules = ctx.rules;
        let rates = &rules.spark;

        for (dx, dy) in NEIGHBORS_8 {
            let (nx, ny) = (x + dx, y + dy);
            if !ctx.in_bounds(nx, ny) {
                continue;
            }
            let info = ctx.info(nx, ny);
            if info.has(FLAG_BURNABLE) && !info.has(FLAG_EXPLOSIVE) && ctx.chance(rates.ignite_chance) {
                ctx.replace(nx, ny, Material::Fire);
            }
        }

        // Arc along conductors: a weaker spark appears on the far side of touching metal.
        if ttl.0 > 2 {
            for (dx, dy) in NEIGHBORS_4 {
                let (mx, my) = (x + dx, y + dy);
                if !ctx.in_bounds(mx, my) || !ctx.info(mx, my).has(FLAG_CONDUCTIVE) {
                    continue;
                }
                if !ctx.chance(rates.conduct_chance) {
                    continue;
                }
                let (ox, oy) = (mx + dx, my + dy);
                if let Some((sx, sy)) = ctx
                    .find_around(mx, my, &NEIGHBORS_4, |m| m == Material::Empty)
                    .filter(|&(sx, sy)| (sx, sy) != (x, y))
                    .or_else(|| ctx.is_open(ox, oy).then_some((ox, oy)))
                {
                    ctx.set(sx, sy, CellState::Spark(Lifetime(ttl.0 - 1)));
                }
            }
        }

        if ttl.0 <= 1 {
            ctx.clear(x, y);
        } else {
            ctx.set(x, y, CellState::Spark(Lifetime(ttl.0 - 1)));
        }
    }

    fn update_smoke(&self, ctx: &mut UpdateContext, ttl: Lifetime) {
        let (x, y) = ctx.here();
        if ttl.0 <= 1 {
            ctx.clear(x, y);
            return;
        }
        ctx.set(x, y, CellState::Smoke(Lifetime(ttl.0 - 1)));
        Self::rise(ctx);
    }

    fn update_steam(&self, ctx: &mut UpdateContext, ttl: Lifetime) {
        let (x, y) = ctx.here();
        let rules = ctx.rules;
        let rates = &rules.gas;

        // Steam touching a cloud feeds it.
        if let Some((cx, cy)) = ctx.find_around(x, y, &NEIGHBORS_4, |m| m == Material::Cloud) {
            if let CellState::Cloud(cloud) = ctx.state(cx, cy) {
                let water = cloud.water.saturating_add(rates.steam_merge);
                ctx.set(cx, cy, CellState::Cloud(CloudState::new(water, cloud.charged)));
                ctx.clear(x, y);
                return;
            }
        }

        if ttl.0 <= 1 {
            let ceiling = ctx.grid.height() as f32 * rates.condense_height;
            let product = if (y as f32) < ceiling { Material::Cloud } else { Material::Water };
            ctx.replace(x, y, product);
            return;
        }
        ctx.set(x, y, CellState::Steam(Lifetime(ttl.0 - 1)));
        Self::rise(ctx);
    }
}

impl Behavior for GasBehavior {
    fn update(&self, ctx: &mut UpdateContext) {
        let (x, y) = ctx.here();
        match ctx.state(x, y) {
            CellState::Empty => {}
            CellState::Fire(_) => self.update_fire(ctx),
            CellState::Spark(ttl) => self.update_spark(ctx, ttl),
            CellState::Smoke(ttl) => self.update_smoke(ctx, ttl),
            CellState::Steam(ttl) => self.update_steam(ctx, ttl),
            _ => {
                Self::rise(ctx);
            }
        }
    }
}
