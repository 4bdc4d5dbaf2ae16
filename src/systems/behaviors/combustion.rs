//! CombustionBehavior - fire burn-down and spread (slow pass)
//!
//! Fire movement happens in the gas pass; here a burning cell spends its
//! lifetime, ignites burnable neighbors, is put out by water, melts ice and
//! heats the air above it.

use super::{Behavior, UpdateContext, NEIGHBORS_4, NEIGHBORS_8};
use crate::domain::cell_state::Lifetime;
use crate::domain::materials::{FLAG_BURNABLE, FLAG_EXPLOSIVE};
use crate::domain::{CellState, Material};

pub struct CombustionBehavior;

impl CombustionBehavior {
    pub fn new() -> Self {
        Self
    }

    /// Water next to fire: the fire chokes into smoke and the water boils.
    fn extinguish(&self, ctx: &mut UpdateContext) -> bool {
        let (x, y) = ctx.here();
        let rules = ctx.rules;
        let Some((wx, wy)) = ctx.find_around(x, y, &NEIGHBORS_4, |m| m == Material::Water) else {
            return false;
        };
        if !ctx.chance(rules.fire.extinguish_chance) {
            return false;
        }
        ctx.replace(wx, wy, Material::Steam);
        ctx.replace(x, y, Material::Smoke);
        true
    }

    fn spread(&self, ctx: &mut UpdateContext) {
        let (x, y) = ctx.here();
        let rules = ctx.rules;
        for (dx, dy) in NEIGHBORS_8 {
            let (nx, ny) = (x + dx, y + dy);
            if !ctx.in_bounds(nx, ny) {
                continue;
            }
            let material = ctx.material(nx, ny);
            let info = material.info();
            // Charges react to heat on their own pass.
            if info.has(FLAG_BURNABLE) && !info.has(FLAG_EXPLOSIVE) {
                if ctx.chance(rules.fire.ignite_chance) {
                    ctx.replace(nx, ny, Material::Fire);
                }
            } else if material == Material::Ice && ctx.chance(rules.fire.melt_ice_chance) {
                ctx.replace(nx, ny, Material::Water);
            }
        }
    }

    fn updraft(&self, ctx: &mut UpdateContext) {
        let (x, y) = ctx.here();
        let rules = ctx.rules;
        if ctx.chance(rules.fire.updraft_chance) {
            ctx.push_pressure(x, y, rules.fire.updraft_pressure);
            ctx.push_velocity(x, y, 0.0, -rules.fire.updraft_velocity);
        }
    }

    fn burn_down(&self, ctx: &mut UpdateContext, ttl: Lifetime) {
        let (x, y) = ctx.here();
        let rules = ctx.rules;
        if ttl.0 <= 1 {
            if ctx.chance(rules.fire.smoke_chance) {
                ctx.replace(x, y, Material::Smoke);
            } else {
                ctx.clear(x, y);
            }
        } else {
            ctx.set(x, y, CellState::Fire(Lifetime(ttl.0 - 1)));
        }
    }
}

impl Behavior for CombustionBehavior {
    fn update(&self, ctx: &mut UpdateContext) {
        let (x, y) = ctx.here();
        let CellState::Fire(ttl) = ctx.state(x, y) else {
            return;
        };
        if self.extinguish(ctx) {
            return;
        }
        self.spread(ctx);
        self.updraft(ctx);
        self.burn_down(ctx, ttl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::behaviors::test_support::Bench;

    #[test]
    fn fire_ignites_wood_with_fresh_timer() {
        let mut b = Bench::new(8, 8);
        b.rules.fire.ignite_chance = 1.0;
        b.put(3, 3, Material::Fire);
        b.put(4, 3, Material::Wood);
        b.run(&CombustionBehavior::new(), 3, 3);
        match b.grid.state(4, 3) {
            CellState::Fire(Lifetime(t)) => {
                assert!((b.rules.fire.ttl_min..=b.rules.fire.ttl_max).contains(&t));
            }
            other => panic!("wood should burn, got {:?}", other),
        }
        assert!(b.grid.is_updated(4, 3));
    }

    #[test]
    fn fire_leaves_charges_to_their_own_rules() {
        let mut b = Bench::new(8, 8);
        b.rules.fire.ignite_chance = 1.0;
        b.put(3, 3, Material::Fire);
        b.put(4, 3, Material::Tnt);
        b.run(&CombustionBehavior::new(), 3, 3);
        assert_eq!(b.at(4, 3), Material::Tnt);
    }

    #[test]
    fn water_puts_fire_out() {
        let mut b = Bench::new(8, 8);
        b.rules.fire.extinguish_chance = 1.0;
        b.put(3, 3, Material::Fire);
        b.put(3, 4, Material::Water);
        b.run(&CombustionBehavior::new(), 3, 3);
        assert_eq!(b.at(3, 3), Material::Smoke);
        assert_eq!(b.at(3, 4), Material::Steam);
    }

    #[test]
    fn fire_burns_down_and_heats_air() {
        let mut b = Bench::new(8, 8);
        b.rules.fire.smoke_chance = 0.0;
        b.rules.fire.updraft_chance = 1.0;
        b.put_state(3, 3, CellState::Fire(Lifetime(2)));
        b.run(&CombustionBehavior::new(), 3, 3);
        assert_eq!(b.grid.state(3, 3), CellState::Fire(Lifetime(1)));
        assert!(b.air.sample_pressure(3.0, 3.0) > 0.0);
        assert!(b.air.sample_velocity_with(3.0, 3.0, 0.0).1 < 0.0);
        b.run(&CombustionBehavior::new(), 3, 3);
        assert_eq!(b.at(3, 3), Material::Empty);
    }
}
