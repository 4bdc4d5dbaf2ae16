//! FluidBehavior - liquids (water, oil, acid, lava, soap, nitro)
//!
//! Contact reactions run first (acid dissolving, lava quenching); a cell that
//! reacted does not move this tick. Movement is gravity, then diagonal
//! sliding, then lateral spreading up to the material's dispersion, biased
//! downwind when the surface wind is strong enough to push the liquid.

use super::chemistry::{dissolve_neighbors, quench_lava};
use super::{random_dir, wind_sign, Behavior, UpdateContext};
use crate::domain::{can_displace, Material};

pub struct FluidBehavior;

impl FluidBehavior {
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn try_diagonal(ctx: &mut UpdateContext, dx: i32) -> bool {
        let (x, y) = ctx.here();
        if ctx.info(x + dx, y).is_rigid() && ctx.info(x, y + 1).is_rigid() {
            return false;
        }
        ctx.move_by(dx, 1)
    }

    /// Furthest reachable cell along `dir` within `reach`, stopping at the
    /// first cell that cannot be displaced.
    fn lateral_target(ctx: &UpdateContext, dir: i32, reach: u8) -> Option<i32> {
        let (x, y) = ctx.here();
        let me = ctx.info(x, y);
        let mut best = None;
        for d in 1..=reach as i32 {
            let tx = x + dir * d;
            if !ctx.in_bounds(tx, y) || !can_displace(me, ctx.info(tx, y)) {
                break;
            }
            best = Some(tx);
        }
        best
    }

    fn spread(ctx: &mut UpdateContext, first: i32) -> bool {
        let (x, y) = ctx.here();
        let reach = ctx.info(x, y).dispersion;
        for dir in [first, -first] {
            if let Some(tx) = Self::lateral_target(ctx, dir, reach) {
                if ctx.try_swap_if_denser(x, y, tx, y) {
                    ctx.at(tx as u32, y as u32);
                    return true;
                }
            }
        }
        false
    }
}

impl Behavior for FluidBehavior {
    fn update(&self, ctx: &mut UpdateContext) {
        let (x, y) = ctx.here();
        let material = ctx.material(x, y);

        let reacted = match material {
            Material::Acid => dissolve_neighbors(ctx),
            Material::Lava => quench_lava(ctx),
            _ => false,
        };
        if reacted {
            return;
        }

        if ctx.move_by(0, 1) {
            return;
        }

        let (wx, _) = ctx.wind_at(x, y);
        let pushed = wx * material.info().coupling;
        let (a, b) = if pushed.abs() >= ctx.rules.powder.slide_band {
            let d = wind_sign(pushed);
            (d, -d)
        } else {
            random_dir(ctx.rng)
        };

        if Self::try_diagonal(ctx, a) || Self::try_diagonal(ctx, b) {
            return;
        }
        Self::spread(ctx, a);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::behaviors::test_support::Bench;

    #[test]
    fn water_spreads_sideways_on_a_floor() {
        let mut b = Bench::new(16, 4);
        b.floor(3);
        b.put(8, 2, Material::Water);
        b.run(&FluidBehavior::new(), 8, 2);
        assert_eq!(b.at(8, 2), Material::Empty);
        assert_eq!(b.grid.count(Material::Water), 1);
    }

    #[test]
    fn oil_rises_over_water_by_being_displaced() {
        let mut b = Bench::new(4, 4);
        b.put(1, 1, Material::Water);
        b.put(1, 2, Material::Oil);
        b.run(&FluidBehavior::new(), 1, 1);
        assert_eq!(b.at(1, 2), Material::Water);
        assert_eq!(b.at(1, 1), Material::Oil);
    }

    #[test]
    fn lateral_spread_stops_at_walls() {
        let mut b = Bench::new(16, 4);
        b.floor(3);
        b.put(7, 2, Material::Wall);
        b.put(9, 2, Material::Wall);
        b.put(8, 2, Material::Water);
        b.run(&FluidBehavior::new(), 8, 2);
        assert_eq!(b.at(8, 2), Material::Water);
    }
}
