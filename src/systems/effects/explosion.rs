//! Explosion - blast disc plus an air shockwave.

use crate::domain::cell_state::{Fuse, Instability};
use crate::domain::materials::{FLAG_BURNABLE, FLAG_INDESTRUCTIBLE};
use crate::domain::{CellState, Material};
use crate::systems::behaviors::UpdateContext;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExplosionReport {
    /// Cells turned into fire or sparks.
    pub burned: u32,
    pub degraded: u32,
    /// Charges scheduled to go off on the next tick.
    pub primed: u32,
}

/// Maximum-instability version of a charge caught in a blast.
fn primed(state: CellState) -> Option<CellState> {
    match state {
        CellState::Nitro(_) => Some(CellState::Nitro(Instability::PRIMED)),
        CellState::Gunpowder(_) => Some(CellState::Gunpowder(Instability::PRIMED)),
        CellState::Methane(_) => Some(CellState::Methane(Instability::PRIMED)),
        CellState::Tnt(_) => Some(CellState::Tnt(Fuse(1))),
        _ => None,
    }
}

/// What a weak material breaks down into.
fn degraded(material: Material) -> Option<Material> {
    match material {
        Material::Wood | Material::Plant | Material::Sprout | Material::Vine => Some(Material::Ash),
        Material::Gravel | Material::Glass => Some(Material::Sand),
        Material::Ice => Some(Material::Water),
        _ => None,
    }
}

/// Detonate at (cx, cy). The inner core burns outright; the outer ring may
/// ignite, degrade or throw sparks with chances falling off with distance.
/// Charges in range are primed instead of chained within this tick.
pub fn explode(ctx: &mut UpdateContext, cx: i32, cy: i32, radius: u32, pressure: f32) -> ExplosionReport {
    let rules = ctx.rules;
    let rates = &rules.explosion;
    let r = radius.clamp(1, 64) as i32;
    let mut report = ExplosionReport::default();

    for dy in -r..=r {
        for dx in -r..=r {
            let d2 = dx * dx + dy * dy;
            if d2 == 0 || d2 > r * r {
                continue;
            }
            let (x, y) = (cx + dx, cy + dy);
            if !ctx.in_bounds(x, y) {
                continue;
            }
            let state = ctx.state(x, y);
            let material = state.material();
            let info = material.info();
            if info.has(FLAG_INDESTRUCTIBLE) {
                continue;
            }

            if let Some(next) = primed(state) {
                if ctx.set(x, y, next) {
                    report.primed += 1;
                }
                continue;
            }

            let dist = (d2 as f32).sqrt() / r as f32;
            if dist <= rates.core_fraction {
                if ctx.replace(x, y, Material::Fire) {
                    report.burned += 1;
                }
                continue;
            }

            let falloff = 1.0 - dist;
            if let Some(weaker) = degraded(material) {
                if ctx.chance(rates.degrade_chance * falloff) {
                    ctx.replace(x, y, weaker);
                    report.degraded += 1;
                    continue;
                }
            }
            if !ctx.chance(rates.ember_chance * falloff) {
                continue;
            }
            if info.has(FLAG_BURNABLE) {
                ctx.replace(x, y, Material::Fire);
                report.burned += 1;
            } else if info.is_open() && material != Material::Cloud {
                let ember = if ctx.rng.coin() { Material::Spark } else { Material::Fire };
                ctx.replace(x, y, ember);
                report.burned += 1;
            }
        }
    }

    ctx.air.add_radial_impulse(cx as f32 + 0.5, cy as f32 + 0.5, r as f32, pressure);
    ctx.replace(cx, cy, Material::Fire);
    log::debug!("explosion at ({cx}, {cy}) r={r}: {report:?}");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::behaviors::test_support::Bench;

    #[test]
    fn core_burns_and_walls_survive() {
        let mut b = Bench::new(32, 32);
        b.put(16, 17, Material::Stone);
        b.put(17, 16, Material::Wall);
        b.put(16, 16, Material::Nitro);
        let report = explode(&mut b.ctx(), 16, 16, 8, 10000.0);
        assert_eq!(b.at(16, 16), Material::Fire);
        assert_eq!(b.at(16, 17), Material::Fire);
        assert_eq!(b.at(17, 16), Material::Wall);
        assert!(report.burned >= 1);
    }

    #[test]
    fn nearby_charges_are_primed_for_next_tick() {
        let mut b = Bench::new(32, 32);
        b.put(16, 18, Material::Gunpowder);
        b.put(14, 16, Material::Tnt);
        let report = explode(&mut b.ctx(), 16, 16, 6, 10000.0);
        assert_eq!(report.primed, 2);
        assert_eq!(b.grid.state(16, 18), CellState::Gunpowder(Instability::PRIMED));
        assert_eq!(b.grid.state(14, 16), CellState::Tnt(Fuse(1)));
        assert!(b.grid.is_updated(16, 18), "primed cells are skipped for the rest of the tick");
    }

    #[test]
    fn shockwave_pushes_air_outward() {
        let mut b = Bench::new(64, 64);
        explode(&mut b.ctx(), 32, 32, 8, 12000.0);
        assert!(b.air.sample_pressure(32.0, 32.0) > 0.0);
        let (vx, _) = b.air.sample_velocity_with(44.0, 32.0, 0.0);
        assert!(vx > 0.0);
        assert!(b.air.is_within_bound());
    }

    #[test]
    fn outer_ring_degrades_weak_materials() {
        let mut b = Bench::new(32, 32);
        b.rules.explosion.degrade_chance = 1.0;
        b.rules.explosion.core_fraction = 0.0;
        for dy in -3..=3 {
            for dx in -3..=3 {
                b.put(16 + dx, 16 + dy, Material::Gravel);
            }
        }
        let report = explode(&mut b.ctx(), 16, 16, 8, 0.0);
        assert!(report.degraded > 0);
        assert_eq!(b.grid.count(Material::Sand), report.degraded as usize);
        assert_eq!(b.grid.count(Material::Gravel) + b.grid.count(Material::Sand), 48);
    }
}
