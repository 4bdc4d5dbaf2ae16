//! ExplosiveBehavior - nitro, gunpowder, methane and TNT
//!
//! Runs before the carrier's own movement. Unstable charges build instability
//! under pressure or wind stress; any charge next to fire, a spark or open lava
//! goes off. A charge primed by a nearby blast carries maximum instability and
//! detonates the next time it is visited. TNT burns a fuse instead.

use super::{Behavior, UpdateContext, NEIGHBORS_8};
use crate::domain::cell_state::{Fuse, Instability};
use crate::domain::{CellState, Material};
use crate::systems::effects::explosion;

pub struct ExplosiveBehavior;

impl ExplosiveBehavior {
    pub fn new() -> Self {
        Self
    }

    fn radius_of(ctx: &UpdateContext, material: Material) -> u32 {
        let rates = &ctx.rules.explosive;
        match material {
            Material::Tnt => rates.tnt_radius,
            Material::Nitro => rates.nitro_radius,
            Material::Gunpowder => rates.gunpowder_radius,
            Material::Methane => rates.methane_radius,
            _ => 0,
        }
    }

    fn detonate(ctx: &mut UpdateContext, material: Material) {
        let (x, y) = ctx.here();
        let radius = Self::radius_of(ctx, material);
        let pressure = ctx.rules.explosive.pressure;
        explosion::explode(ctx, x, y, radius, pressure);
    }

    fn update_nitro(&self, ctx: &mut UpdateContext, instability: Instability) {
        let (x, y) = ctx.here();
        let rules = ctx.rules;
        let rates = &rules.explosive;

        let pressure = ctx.pressure_at(x, y).abs();
        let (wx, wy) = ctx.wind_at(x, y);
        let wind = (wx * wx + wy * wy).sqrt();

        let stressed = pressure >= rates.stress_pressure || wind >= rates.stress_wind;
        let level = if instability == Instability::PRIMED {
            instability.0
        } else if stressed {
            instability.0.saturating_add(rates.stress_gain)
        } else {
            instability.0.saturating_sub(rates.stress_decay)
        };

        if level >= rates.instability_threshold
            || pressure >= rates.detonate_pressure
            || ctx.touches_heat(x, y)
        {
            Self::detonate(ctx, Material::Nitro);
            return;
        }
        ctx.set(x, y, CellState::Nitro(Instability(level)));
    }

    fn update_tnt(&self, ctx: &mut UpdateContext, fuse: Fuse) {
        let (x, y) = ctx.here();
        let rules = ctx.rules;
        let rates = &rules.explosive;

        if fuse.0 == 0 {
            if ctx.touches_heat(x, y) {
                ctx.set(x, y, CellState::Tnt(Fuse(rates.tnt_fuse.max(1))));
            }
            return;
        }

        let left = fuse.0 - 1;
        if left == 0 {
            Self::detonate(ctx, Material::Tnt);
            return;
        }
        if ctx.chance(rates.tnt_spark_chance) {
            let start = ctx.rng.below(8) as usize;
            for i in 0..NEIGHBORS_8.len() {
                let (dx, dy) = NEIGHBORS_8[(start + i) % NEIGHBORS_8.len()];
                if ctx.in_bounds(x + dx, y + dy) && ctx.material(x + dx, y + dy) == Material::Empty {
                    ctx.replace(x + dx, y + dy, Material::Spark);
                    break;
                }
            }
        }
        ctx.set(x, y, CellState::Tnt(Fuse(left)));
    }
}

impl Behavior for ExplosiveBehavior {
    fn update(&self, ctx: &mut UpdateContext) {
        let (x, y) = ctx.here();
        match ctx.state(x, y) {
            CellState::Nitro(i) => self.update_nitro(ctx, i),
            CellState::Gunpowder(i) | CellState::Methane(i) => {
                if i == Instability::PRIMED || ctx.touches_heat(x, y) {
                    let material = ctx.material(x, y);
                    Self::detonate(ctx, material);
                }
            }
            CellState::Tnt(f) => self.update_tnt(ctx, f),
            _ => {}
        }
    }
}
