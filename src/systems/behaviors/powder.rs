//! PowderBehavior - granular materials (sand, dirt, gravel, ash, seeds, ...)
//!
//! Gravity first, then wind. The wind a grain feels is the local air velocity
//! scaled by its coupling; its magnitude picks one of four bands:
//! calm grains only fall, sliding grains lean downwind as they tumble, and
//! above the saltation threshold exposed grains hop along the surface.

use super::{random_dir, wind_sign, Behavior, UpdateContext};
use crate::domain::rules::PowderRates;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum WindBand {
    None,
    Slide,
    Saltation,
    Storm,
}

impl WindBand {
    pub fn classify(magnitude: f32, rates: &PowderRates) -> WindBand {
        if !(magnitude >= rates.slide_band) {
            WindBand::None
        } else if magnitude < rates.saltation_band {
            WindBand::Slide
        } else if magnitude < rates.storm_band {
            WindBand::Saltation
        } else {
            WindBand::Storm
        }
    }
}

pub struct PowderBehavior;

impl PowderBehavior {
    pub fn new() -> Self {
        Self
    }

    /// "Corner cutting" guard for diagonal moves: a 1px staircase of rigid
    /// cells must stay watertight, so refuse a diagonal when both orthogonal
    /// side cells are rigid.
    #[inline]
    fn corner_blocked(ctx: &UpdateContext, x: i32, y: i32, dx: i32, dy: i32) -> bool {
        ctx.info(x + dx, y).is_rigid() && ctx.info(x, y + dy).is_rigid()
    }

    #[inline]
    fn try_diagonal(ctx: &mut UpdateContext, dx: i32) -> bool {
        let (x, y) = ctx.here();
        !Self::corner_blocked(ctx, x, y, dx, 1) && ctx.move_by(dx, 1)
    }

    /// Straight down, then both diagonals in the given order.
    fn fall(ctx: &mut UpdateContext, first: i32, second: i32) -> bool {
        ctx.move_by(0, 1) || Self::try_diagonal(ctx, first) || Self::try_diagonal(ctx, second)
    }

    fn hop_chance(magnitude: f32, band: WindBand, rates: &PowderRates) -> f32 {
        if band == WindBand::Storm {
            return rates.hop_chance_max;
        }
        let span = (rates.storm_band - rates.saltation_band).max(1.0);
        let t = ((magnitude - rates.saltation_band) / span).clamp(0.0, 1.0);
        rates.hop_chance_min + (rates.hop_chance_max - rates.hop_chance_min) * t
    }

    /// Saltation on a surface: jump forward and up into open air, falling
    /// back to shorter jumps when the landing cell is taken.
    fn hop(ctx: &mut UpdateContext, dir: i32, band: WindBand) -> bool {
        let (x, y) = ctx.here();
        if !ctx.is_open(x, y - 1) {
            return false;
        }
        let (forward, up) = if band == WindBand::Storm {
            (ctx.rng.range(2, 5), ctx.rng.range(1, 3))
        } else {
            (ctx.rng.range(1, 3), ctx.rng.range(1, 2))
        };
        for f in (1..=forward).rev() {
            let (tx, ty) = (x + dir * f, y - up);
            if ctx.is_open(tx, ty) && ctx.is_open(x + dir, y - 1) && ctx.try_swap_if_denser(x, y, tx, ty) {
                ctx.at(tx as u32, ty as u32);
                return true;
            }
        }
        false
    }
}

impl Behavior for PowderBehavior {
    fn update(&self, ctx: &mut UpdateContext) {
        let (x, y) = ctx.here();
        let info = ctx.info(x, y);
        let rules = ctx.rules;
        let rates = &rules.powder;

        let (wx, wy) = ctx.wind_at(x, y);
        let (ex, ey) = (wx * info.coupling, wy * info.coupling);
        let magnitude = (ex * ex + ey * ey).sqrt();
        let band = WindBand::classify(magnitude, rates);

        let mut dir = wind_sign(ex);
        if dir == 0 {
            dir = ctx.rng.sign();
        }

        let below = ctx.info(x, y + 1);
        let resting = !ctx.in_bounds(x, y + 1) || !crate::domain::can_displace(info, below);

        match band {
            WindBand::None => {
                let (a, b) = random_dir(ctx.rng);
                Self::fall(ctx, a, b);
                return;
            }
            WindBand::Slide => {
                let toward = if ctx.chance(rates.downwind_bias) { dir } else { -dir };
                if !Self::fall(ctx, toward, -toward) {
                    return;
                }
            }
            WindBand::Saltation | WindBand::Storm => {
                if resting {
                    let p = Self::hop_chance(magnitude, band, rates);
                    if ctx.chance(p) && Self::hop(ctx, dir, band) {
                        return;
                    }
                    // Creep along the surface.
                    ctx.move_by(dir, 0);
                    return;
                }
                if !Self::fall(ctx, dir, -dir) {
                    return;
                }
            }
        }

        // Airborne after falling: wind pushes the grain sideways.
        let strength = (magnitude / rates.storm_band.max(1.0)).min(1.0);
        if ctx.chance(rates.airborne_nudge * strength) {
            ctx.move_by(dir, 0);
        }
    }
}
