//! MoistureBehavior - water uptake by sand and dirt (slow pass)
//!
//! Sand soaks up adjacent water until it turns into heavier wet sand, which
//! dries back out once nothing wet touches it. Dirt holds moisture, shares it
//! with drier dirt next to it and slowly loses it to open air.

use super::{Behavior, UpdateContext, NEIGHBORS_4};
use crate::domain::cell_state::Moisture;
use crate::domain::{CellState, Material};

/// Moisture a cell offers to whatever sits on it (seeds, roots).
pub(super) fn soil_moisture(state: CellState) -> u8 {
    match state {
        CellState::Sand(m) | CellState::WetSand(m) | CellState::Dirt(m) => m.0,
        CellState::Inert(Material::Water) => u8::MAX,
        _ => 0,
    }
}

pub struct MoistureBehavior;

impl MoistureBehavior {
    pub fn new() -> Self {
        Self
    }

    /// Pull from every adjacent water cell; each may be used up in the process.
    fn absorb(ctx: &mut UpdateContext, moisture: u8, step: u8) -> u8 {
        let (x, y) = ctx.here();
        let rules = ctx.rules;
        let mut moisture = moisture;
        for (dx, dy) in NEIGHBORS_4 {
            let (nx, ny) = (x + dx, y + dy);
            if !ctx.in_bounds(nx, ny) || ctx.material(nx, ny) != Material::Water {
                continue;
            }
            moisture = moisture.saturating_add(step);
            if ctx.chance(rules.moisture.absorb_consume) {
                ctx.clear(nx, ny);
            }
        }
        moisture
    }

    fn update_sand(&self, ctx: &mut UpdateContext, moisture: Moisture) {
        let (x, y) = ctx.here();
        let rules = ctx.rules;
        let rates = &rules.moisture;
        let mut m = Self::absorb(ctx, moisture.0, rates.absorb_step);
        if m == moisture.0 {
            m = m.saturating_sub(1);
        }
        if m >= rates.wet_threshold && ctx.chance(rates.wet_chance) {
            ctx.set(x, y, CellState::WetSand(Moisture(rates.wet_moisture)));
            return;
        }
        ctx.set(x, y, CellState::Sand(Moisture(m)));
    }

    fn update_wet_sand(&self, ctx: &mut UpdateContext, moisture: Moisture) {
        let (x, y) = ctx.here();
        let rules = ctx.rules;
        let rates = &rules.moisture;
        let wet = ctx.count_around(x, y, &NEIGHBORS_4, |m| m == Material::Water) > 0;
        if wet {
            ctx.set(x, y, CellState::WetSand(Moisture(rates.wet_moisture.max(moisture.0))));
            return;
        }
        if !ctx.chance(rates.dry_chance) {
            return;
        }
        let m = moisture.0.saturating_sub(rates.absorb_step);
        if m == 0 {
            ctx.set(x, y, CellState::Sand(Moisture(0)));
        } else {
            ctx.set(x, y, CellState::WetSand(Moisture(m)));
        }
    }

    fn update_dirt(&self, ctx: &mut UpdateContext, moisture: Moisture) {
        let (x, y) = ctx.here();
        let rules = ctx.rules;
        let rates = &rules.moisture;
        let mut m = Self::absorb(ctx, moisture.0, rates.dirt_absorb_step);

        // Share with one drier dirt neighbor.
        let start = ctx.rng.below(4) as usize;
        for i in 0..4 {
            let (dx, dy) = NEIGHBORS_4[(start + i) % 4];
            let (nx, ny) = (x + dx, y + dy);
            if let CellState::Dirt(other) = ctx.state(nx, ny) {
                if other.0 < m.saturating_sub(1) {
                    let give = (m - other.0) / 2;
                    m -= give;
                    ctx.set(nx, ny, CellState::Dirt(Moisture(other.0 + give)));
                    break;
                }
            }
        }

        if m > 0 && ctx.is_open(x, y - 1) && ctx.chance(rates.dirt_evaporate_chance) {
            m -= 1;
        }
        ctx.set(x, y, CellState::Dirt(Moisture(m)));
    }
}

impl Behavior for MoistureBehavior {
    fn update(&self, ctx: &mut UpdateContext) {
        let (x, y) = ctx.here();
        match ctx.state(x, y) {
            CellState::Sand(m) => self.update_sand(ctx, m),
            CellState::WetSand(m) => self.update_wet_sand(ctx, m),
            CellState::Dirt(m) => self.update_dirt(ctx, m),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::behaviors::test_support::Bench;

    #[test]
    fn sand_soaks_up_water_until_wet() {
        let mut b = Bench::new(8, 8);
        b.rules.moisture.absorb_consume = 0.0;
        b.rules.moisture.wet_chance = 1.0;
        b.put(3, 3, Material::Sand);
        b.put(3, 2, Material::Water);
        b.put(2, 3, Material::Water);
        for _ in 0..4 {
            b.run(&MoistureBehavior::new(), 3, 3);
        }
        assert_eq!(b.at(3, 3), Material::WetSand);
        assert_eq!(b.grid.count(Material::Water), 2);
    }

    #[test]
    fn absorbed_water_can_be_used_up() {
        let mut b = Bench::new(8, 8);
        b.rules.moisture.absorb_consume = 1.0;
        b.put(3, 3, Material::Sand);
        b.put(3, 2, Material::Water);
        b.run(&MoistureBehavior::new(), 3, 3);
        assert_eq!(b.at(3, 2), Material::Empty);
        assert_eq!(b.grid.state(3, 3), CellState::Sand(Moisture(b.rules.moisture.absorb_step)));
    }

    #[test]
    fn wet_sand_dries_without_contact() {
        let mut b = Bench::new(8, 8);
        b.rules.moisture.dry_chance = 1.0;
        b.put_state(3, 3, CellState::WetSand(Moisture(b.rules.moisture.absorb_step)));
        b.run(&MoistureBehavior::new(), 3, 3);
        assert_eq!(b.grid.state(3, 3), CellState::Sand(Moisture(0)));
    }

    #[test]
    fn dirt_shares_moisture_with_drier_dirt() {
        let mut b = Bench::new(8, 8);
        b.rules.moisture.dirt_evaporate_chance = 0.0;
        b.put(2, 3, Material::Wall);
        b.put(3, 2, Material::Wall);
        b.put(3, 4, Material::Wall);
        b.put_state(3, 3, CellState::Dirt(Moisture(100)));
        b.put_state(4, 3, CellState::Dirt(Moisture(0)));
        b.run(&MoistureBehavior::new(), 3, 3);
        assert_eq!(b.grid.state(3, 3), CellState::Dirt(Moisture(50)));
        assert_eq!(b.grid.state(4, 3), CellState::Dirt(Moisture(50)));
    }

    #[test]
    fn saturated_dirt_neighbor_takes_nothing() {
        let mut b = Bench::new(8, 8);
        b.rules.moisture.dirt_evaporate_chance = 0.0;
        b.put(2, 3, Material::Wall);
        b.put(3, 2, Material::Wall);
        b.put(3, 4, Material::Wall);
        b.put_state(3, 3, CellState::Dirt(Moisture(100)));
        b.put_state(4, 3, CellState::Dirt(Moisture(u8::MAX)));
        b.run(&MoistureBehavior::new(), 3, 3);
        assert_eq!(b.grid.state(3, 3), CellState::Dirt(Moisture(100)));
        assert_eq!(b.grid.state(4, 3), CellState::Dirt(Moisture(u8::MAX)));

        // Full dirt still shares downhill.
        b.run(&MoistureBehavior::new(), 4, 3);
        assert_eq!(b.grid.state(3, 3), CellState::Dirt(Moisture(177)));
        assert_eq!(b.grid.state(4, 3), CellState::Dirt(Moisture(178)));
    }

    #[test]
    fn soil_moisture_reads_each_substrate() {
        assert_eq!(soil_moisture(CellState::Dirt(Moisture(70))), 70);
        assert_eq!(soil_moisture(CellState::Inert(Material::Water)), u8::MAX);
        assert_eq!(soil_moisture(CellState::Inert(Material::Stone)), 0);
    }
}
