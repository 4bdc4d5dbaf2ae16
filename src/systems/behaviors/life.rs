//! LifeBehavior - seeds, sprouts, plants and vines (slow pass)
//!
//! Seeds germinate on moist ground, sprouts mature into plants that push new
//! shoots upward and eventually lignify, and vines creep along surfaces.
//! Anything that stays dry long enough withers to ash.

use super::moisture::soil_moisture;
use super::{Behavior, UpdateContext, NEIGHBORS_4, NEIGHBORS_8};
use crate::domain::cell_state::{GrowthState, SeedState, VineState};
use crate::domain::{CellState, Material};

const BELOW: [(i32, i32); 3] = [(-1, 1), (0, 1), (1, 1)];

/// Open-neighbor growth candidates for a vine; the climb weight only applies
/// where the vine has a rigid surface to hold on to.
const VINE_SIDES: [(i32, i32); 2] = [(-1, 0), (1, 0)];
const VINE_DIAGONALS: [(i32, i32); 2] = [(-1, -1), (1, -1)];

fn is_stalk(material: Material) -> bool {
    matches!(material, Material::Sprout | Material::Plant | Material::Wood)
}

pub struct LifeBehavior;

impl LifeBehavior {
    pub fn new() -> Self {
        Self
    }

    /// Water or moist soil around the cell.
    fn touches_moisture(ctx: &UpdateContext, threshold: u8) -> bool {
        let (x, y) = ctx.here();
        NEIGHBORS_4
            .iter()
            .any(|(dx, dy)| soil_moisture(ctx.state(x + dx, y + dy)) >= threshold.max(1))
    }

    fn update_seed(&self, ctx: &mut UpdateContext, seed: SeedState) {
        let (x, y) = ctx.here();
        let rules = ctx.rules;
        let rates = &rules.seed;

        let water = ctx.count_around(x, y, &NEIGHBORS_4, |m| m == Material::Water) > 0;
        let moist = water || soil_moisture(ctx.state(x, y + 1)) >= rates.germinate_moisture.max(1);

        let mut next = seed;
        if moist {
            next.dry = 0;
            let p = if water { rates.water_progress_chance } else { rates.progress_chance };
            if ctx.chance(p) {
                next.progress = (next.progress + 1).min(SeedState::MAX);
            }
            if next.progress >= rates.sprout_progress && ctx.chance(rates.sprout_chance) {
                ctx.replace(x, y, Material::Sprout);
                return;
            }
        } else if ctx.chance(rates.dry_chance) {
            next.dry = (next.dry + 1).min(SeedState::MAX);
            next.progress = next.progress.saturating_sub(1);
            if next.dry >= rates.dry_limit {
                ctx.replace(x, y, Material::Ash);
                return;
            }
        }
        ctx.set(x, y, CellState::Seed(SeedState::new(next.progress, next.dry)));
    }

    /// Stalk cells straight below, up to `limit`.
    fn stalk_height(ctx: &UpdateContext, limit: u8) -> u8 {
        let (x, y) = ctx.here();
        let mut height = 0u8;
        while height < limit && is_stalk(ctx.material(x, y + 1 + height as i32)) {
            height += 1;
        }
        height
    }

    fn update_growth(&self, ctx: &mut UpdateContext, growth: GrowthState, mature: bool) {
        let (x, y) = ctx.here();
        let rules = ctx.rules;
        let rates = &rules.plant;
        let germinate = rules.seed.germinate_moisture;

        let hydrated =
            Self::touches_moisture(ctx, germinate) || is_stalk(ctx.material(x, y + 1));

        let mut age = growth.age;
        if hydrated && ctx.chance(rates.age_chance) {
            age = age.saturating_add(1);
        }

        if !hydrated && age < rates.young_age && ctx.chance(rates.wilt_chance) {
            ctx.replace(x, y, Material::Ash);
            return;
        }

        if !mature {
            if age >= rates.mature_age {
                ctx.set(x, y, CellState::Plant(GrowthState { age }));
            } else {
                ctx.set(x, y, CellState::Sprout(GrowthState { age }));
            }
            return;
        }

        if age >= rates.wood_age && ctx.chance(rates.wood_chance) {
            ctx.replace(x, y, Material::Wood);
            return;
        }
        if hydrated
            && age >= rates.grow_age
            && ctx.material(x, y - 1) == Material::Empty
            && ctx.in_bounds(x, y - 1)
            && Self::stalk_height(ctx, rates.max_height) < rates.max_height
            && ctx.chance(rates.grow_chance)
        {
            ctx.replace(x, y - 1, Material::Sprout);
        }
        ctx.set(x, y, CellState::Plant(GrowthState { age }));
    }

    fn vine_hydrated(ctx: &UpdateContext, germinate: u8) -> bool {
        let (x, y) = ctx.here();
        if Self::touches_moisture(ctx, germinate) {
            return true;
        }
        // Water climbs from below: a watered vine or stalk underneath feeds this one.
        BELOW.iter().any(|(dx, dy)| match ctx.state(x + dx, y + dy) {
            CellState::Vine(v) => v.dry == 0,
            other => is_stalk(other.material()),
        })
    }

    fn pick_vine_growth(ctx: &mut UpdateContext) -> Option<(i32, i32)> {
        let (x, y) = ctx.here();
        let rules = ctx.rules;
        let rates = &rules.vine;

        let clinging = [(-1, 0), (1, 0), (-1, -1), (1, -1)]
            .iter()
            .any(|(dx, dy)| ctx.info(x + dx, y + dy).is_rigid() && ctx.material(x + dx, y + dy) != Material::Vine);
        let up_weight = if clinging { rates.climb_weight } else { rates.diagonal_weight };

        let mut options: [((i32, i32), u32); 5] = [((0, 0), 0); 5];
        let mut n = 0;
        let mut total = 0;
        let mut offer = |d: (i32, i32), w: u32, options: &mut [((i32, i32), u32); 5]| {
            if w > 0 && ctx.material(x + d.0, y + d.1) == Material::Empty && ctx.in_bounds(x + d.0, y + d.1) {
                options[n] = (d, w);
                n += 1;
                total += w;
            }
        };
        offer((0, -1), up_weight, &mut options);
        for d in VINE_SIDES {
            offer(d, rates.side_weight, &mut options);
        }
        for d in VINE_DIAGONALS {
            offer(d, rates.diagonal_weight, &mut options);
        }
        if total == 0 {
            return None;
        }

        let mut roll = ctx.rng.below(total);
        for &(d, w) in &options[..n] {
            if roll < w {
                return Some(d);
            }
            roll -= w;
        }
        None
    }

    fn update_vine(&self, ctx: &mut UpdateContext, vine: VineState) {
        let (x, y) = ctx.here();
        let rules = ctx.rules;
        let rates = &rules.vine;

        let mut next = vine;
        if Self::vine_hydrated(ctx, rules.seed.germinate_moisture) {
            next.dry = 0;
            if ctx.chance(rates.age_chance) {
                next.age = (next.age + 1).min(VineState::MAX_AGE);
            }
        } else if ctx.chance(rates.dry_chance) {
            next.dry = (next.dry + 1).min(VineState::MAX_DRY);
        }

        if next.age >= rates.die_age && next.dry >= rates.dry_limit {
            ctx.replace(x, y, Material::Ash);
            return;
        }

        let crowded = ctx.count_around(x, y, &NEIGHBORS_8, |m| m == Material::Vine) > 2;
        if next.dry == 0
            && !crowded
            && next.age >= rates.grow_age
            && next.age < rates.die_age
            && ctx.chance(rates.grow_chance)
        {
            if let Some((dx, dy)) = Self::pick_vine_growth(ctx) {
                ctx.set(x + dx, y + dy, CellState::Vine(VineState::new(0, 0)));
            }
        }
        ctx.set(x, y, CellState::Vine(VineState::new(next.age, next.dry)));
    }
}

impl Behavior for LifeBehavior {
    fn update(&self, ctx: &mut UpdateContext) {
        let (x, y) = ctx.here();
        match ctx.state(x, y) {
            CellState::Seed(s) => self.update_seed(ctx, s),
            CellState::Sprout(g) => self.update_growth(ctx, g, false),
            CellState::Plant(g) => self.update_growth(ctx, g, true),
            CellState::Vine(v) => self.update_vine(ctx, v),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cell_state::Moisture;
    use crate::systems::behaviors::test_support::Bench;

    fn seed_bench(moisture: u8) -> Bench {
        let mut b = Bench::new(8, 8);
        b.put_state(3, 4, CellState::Dirt(Moisture(moisture)));
        b.put(3, 3, Material::Seed);
        b
    }

    #[test]
    fn seed_on_moist_dirt_sprouts() {
        let mut b = seed_bench(200);
        b.rules.seed.progress_chance = 1.0;
        b.rules.seed.sprout_chance = 1.0;
        for _ in 0..b.rules.seed.sprout_progress {
            b.run(&LifeBehavior::new(), 3, 3);
        }
        assert_eq!(b.at(3, 3), Material::Sprout);
    }

    #[test]
    fn seed_on_dry_dirt_turns_to_ash() {
        let mut b = seed_bench(0);
        b.rules.seed.dry_chance = 1.0;
        for _ in 0..b.rules.seed.dry_limit - 1 {
            b.run(&LifeBehavior::new(), 3, 3);
            assert_eq!(b.at(3, 3), Material::Seed);
        }
        b.run(&LifeBehavior::new(), 3, 3);
        assert_eq!(b.at(3, 3), Material::Ash);
    }

    #[test]
    fn sprout_matures_into_plant_with_water() {
        let mut b = Bench::new(8, 8);
        b.rules.plant.age_chance = 1.0;
        b.put(3, 4, Material::Water);
        b.put_state(3, 3, CellState::Sprout(GrowthState { age: b.rules.plant.mature_age - 1 }));
        b.run(&LifeBehavior::new(), 3, 3);
        assert_eq!(b.at(3, 3), Material::Plant);
    }

    #[test]
    fn dry_young_sprout_wilts() {
        let mut b = Bench::new(8, 8);
        b.rules.plant.wilt_chance = 1.0;
        b.put(3, 3, Material::Sprout);
        b.run(&LifeBehavior::new(), 3, 3);
        assert_eq!(b.at(3, 3), Material::Ash);
    }

    #[test]
    fn plant_grows_upward_until_stalk_limit() {
        let mut b = Bench::new(8, 8);
        b.rules.plant.grow_chance = 1.0;
        b.rules.plant.max_height = 2;
        b.put(3, 7, Material::Water);
        b.put_state(3, 6, CellState::Plant(GrowthState { age: 20 }));
        b.run(&LifeBehavior::new(), 3, 6);
        assert_eq!(b.at(3, 5), Material::Sprout);

        b.put_state(3, 5, CellState::Plant(GrowthState { age: 20 }));
        b.put_state(3, 4, CellState::Plant(GrowthState { age: 20 }));
        b.put_state(3, 3, CellState::Plant(GrowthState { age: 20 }));
        b.run(&LifeBehavior::new(), 3, 3);
        assert_eq!(b.at(3, 2), Material::Empty);
    }

    #[test]
    fn old_dry_vine_dies() {
        let mut b = Bench::new(8, 8);
        b.put_state(3, 3, CellState::Vine(VineState::new(VineState::MAX_AGE, VineState::MAX_DRY)));
        b.run(&LifeBehavior::new(), 3, 3);
        assert_eq!(b.at(3, 3), Material::Ash);
    }

    #[test]
    fn watered_vine_climbs_a_wall() {
        let mut b = Bench::new(8, 8);
        b.rules.vine.grow_chance = 1.0;
        b.rules.vine.side_weight = 0;
        b.rules.vine.diagonal_weight = 0;
        for y in 0..8 {
            b.put(4, y, Material::Wall);
        }
        b.put(3, 5, Material::Water);
        b.put_state(3, 4, CellState::Vine(VineState::new(b.rules.vine.grow_age, 0)));
        b.run(&LifeBehavior::new(), 3, 4);
        assert_eq!(b.at(3, 3), Material::Vine);
    }
}
