//! CloudBehavior - water content, charge, rain and lightning
//!
//! A cloud cell gathers water while it sits in a large enough cluster that
//! is lifted by updraft or pressure. Heavy clouds rain into open cells below;
//! charged heavy clouds discharge as lightning.

use super::{wind_sign, Behavior, UpdateContext, NEIGHBORS_8};
use crate::domain::cell_state::CloudState;
use crate::domain::{CellState, Material};
use crate::systems::effects::lightning;

pub struct CloudBehavior;

impl CloudBehavior {
    pub fn new() -> Self {
        Self
    }

    /// Clouds hover; only wind past the drift threshold moves them.
    fn drift(ctx: &mut UpdateContext) {
        let (x, y) = ctx.here();
        let rules = ctx.rules;
        let (wx, _) = ctx.wind_at(x, y);
        let pushed = wx * Material::Cloud.info().coupling;
        if pushed.abs() >= rules.gas.drift_threshold && ctx.chance(rules.gas.drift_chance) {
            ctx.move_by(wind_sign(pushed), 0);
        }
    }
}

impl Behavior for CloudBehavior {
    fn update(&self, ctx: &mut UpdateContext) {
        let (x, y) = ctx.here();
        let rules = ctx.rules;
        let rates = &rules.cloud;
        let CellState::Cloud(cloud) = ctx.state(x, y) else {
            return;
        };

        let mass = ctx.count_around(x, y, &NEIGHBORS_8, |m| m == Material::Cloud) + 1;
        let (_, vy) = ctx.wind_at(x, y);
        let updraft = -vy;
        let pressure = ctx.pressure_at(x, y);

        let mut water = cloud.water;
        let lifted = updraft >= rates.updraft || pressure >= rates.pressure;
        if lifted && mass >= rates.cluster_mass && ctx.chance(rates.gain_chance) {
            water = water.saturating_add(rates.gain);
        }

        let storm = mass >= rates.charge_mass && updraft >= rates.charge_updraft && water >= rates.charge_water;
        let mut charged = cloud.charged;
        if !storm {
            charged = false;
        } else if !charged && ctx.chance(rates.charge_chance) {
            charged = true;
        }

        if water >= rates.rain_water
            && ctx.material(x, y + 1) == Material::Empty
            && ctx.in_bounds(x, y + 1)
            && ctx.chance(rates.rain_chance)
        {
            ctx.replace(x, y + 1, Material::Water);
            water = water.saturating_sub(rates.rain_cost);
        }

        if charged && water >= rates.lightning_water && ctx.chance(rates.lightning_chance) {
            let report = lightning::strike(ctx, x, y);
            log::debug!("cloud at ({x}, {y}) discharged: {report:?}");
            charged = false;
            water /= 4;
        }

        ctx.set(x, y, CellState::Cloud(CloudState::new(water, charged)));
        Self::drift(ctx);
    }
}
