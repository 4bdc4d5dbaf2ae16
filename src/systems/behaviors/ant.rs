//! AntBehavior - a walking powder cell
//!
//! Ants fall first. On the ground they keep walking along their heading,
//! occasionally turning, stepping over one-cell obstacles and turning back
//! at walls. They carry seeds around and heap up dirt they stand on.

use super::{Behavior, UpdateContext, NEIGHBORS_4};
use crate::domain::cell_state::{AntState, Heading};
use crate::domain::{CellState, Material};

pub struct AntBehavior;

impl AntBehavior {
    pub fn new() -> Self {
        Self
    }

    fn walk(ctx: &mut UpdateContext, heading: Heading) -> Heading {
        let (x, y) = ctx.here();
        let (dx, dy) = heading.delta();
        if ctx.is_open(x + dx, y + dy) && ctx.move_by(dx, dy) {
            return heading;
        }
        // Step over a one-cell obstacle.
        if dy == 0 && ctx.is_open(x, y - 1) && ctx.is_open(x + dx, y - 1) && ctx.move_by(dx, -1) {
            return heading;
        }
        heading.reversed()
    }

    /// Pick up an adjacent seed or put the carried one down above.
    fn handle_seed(ctx: &mut UpdateContext, carrying: bool) -> bool {
        let (x, y) = ctx.here();
        let rules = ctx.rules;
        if !carrying {
            if let Some((sx, sy)) = ctx.find_around(x, y, &NEIGHBORS_4, |m| m == Material::Seed) {
                if ctx.chance(rules.ant.pickup_chance) {
                    ctx.clear(sx, sy);
                    return true;
                }
            }
            return false;
        }
        if ctx.in_bounds(x, y - 1) && ctx.material(x, y - 1) == Material::Empty && ctx.chance(rules.ant.drop_chance) {
            ctx.replace(x, y - 1, Material::Seed);
            return false;
        }
        true
    }

    /// Lift the dirt underfoot by one cell, climbing on top of it.
    fn mound(ctx: &mut UpdateContext) -> bool {
        let (x, y) = ctx.here();
        let rules = ctx.rules;
        if ctx.material(x, y + 1) != Material::Dirt || !ctx.is_open(x, y - 1) {
            return false;
        }
        if !ctx.chance(rules.ant.mound_chance) {
            return false;
        }
        ctx.swap(x, y, x, y - 1);
        ctx.swap(x, y + 1, x, y);
        ctx.at(x as u32, (y - 1) as u32);
        true
    }
}

impl Behavior for AntBehavior {
    fn update(&self, ctx: &mut UpdateContext) {
        let (x, y) = ctx.here();
        let rules = ctx.rules;
        let CellState::Ant(ant) = ctx.state(x, y) else {
            return;
        };

        if ctx.is_open(x, y + 1) && ctx.move_by(0, 1) {
            return;
        }

        let mut heading = ant.heading;
        if ctx.chance(rules.ant.turn_chance) {
            heading = Heading::ALL[ctx.rng.below(4) as usize];
        }
        let carrying = Self::handle_seed(ctx, ant.carrying);

        if !Self::mound(ctx) {
            heading = Self::walk(ctx, heading);
        }

        let (x, y) = ctx.here();
        ctx.set(x, y, CellState::Ant(AntState { heading, carrying }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::behaviors::test_support::Bench;

    fn ant(heading: Heading, carrying: bool) -> CellState {
        CellState::Ant(AntState { heading, carrying })
    }

    #[test]
    fn ant_falls_into_open_space() {
        let mut b = Bench::new(8, 8);
        b.put_state(3, 3, ant(Heading::East, false));
        b.run(&AntBehavior::new(), 3, 3);
        assert_eq!(b.at(3, 3), Material::Empty);
        assert_eq!(b.grid.state(3, 4), ant(Heading::East, false));
    }

    #[test]
    fn ant_walks_and_turns_at_walls() {
        let mut b = Bench::new(8, 8);
        b.rules.ant.turn_chance = 0.0;
        b.floor(7);
        b.put(5, 6, Material::Wall);
        b.put(5, 5, Material::Wall);
        b.put_state(4, 6, ant(Heading::East, false));
        b.run(&AntBehavior::new(), 4, 6);
        assert_eq!(b.grid.state(4, 6), ant(Heading::West, false));
        b.run(&AntBehavior::new(), 4, 6);
        assert_eq!(b.grid.state(3, 6), ant(Heading::West, false));
    }

    #[test]
    fn ant_steps_over_low_obstacle() {
        let mut b = Bench::new(8, 8);
        b.rules.ant.turn_chance = 0.0;
        b.floor(7);
        b.put(5, 6, Material::Stone);
        b.put_state(4, 6, ant(Heading::East, false));
        b.run(&AntBehavior::new(), 4, 6);
        assert_eq!(b.grid.state(5, 5), ant(Heading::East, false));
    }

    #[test]
    fn ant_picks_up_a_seed() {
        let mut b = Bench::new(8, 8);
        b.rules.ant.turn_chance = 0.0;
        b.rules.ant.pickup_chance = 1.0;
        b.floor(7);
        b.put(2, 6, Material::Wall);
        b.put(4, 6, Material::Seed);
        b.put(4, 5, Material::Wall);
        b.put_state(3, 6, ant(Heading::East, false));
        b.run(&AntBehavior::new(), 3, 6);
        assert_eq!(b.grid.count(Material::Seed), 0);
        match b.grid.state(4, 6) {
            CellState::Ant(a) => assert!(a.carrying),
            other => panic!("ant should have moved onto the seed cell, got {:?}", other),
        }
    }
}
