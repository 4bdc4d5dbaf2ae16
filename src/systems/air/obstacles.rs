//! Obstacle interaction: solidity sampling, stagnation and deflection at
//! solid cells, the lee-zone shadow behind them and the venturi boost in
//! one-cell channels between them.

use super::{map_rows, AirConfig, AirField, AIR_SCALE};
use crate::domain::classify;
use crate::spatial::Grid;

/// Sample points inside one air cell, as offsets from its top-left world cell.
const SOLIDITY_SAMPLES: [(u32, u32); 4] = [(1, 1), (3, 1), (1, 3), (3, 3)];

/// Unit step pointing upstream along the dominant axis of (vx, vy).
#[inline]
fn upwind_step(vx: f32, vy: f32) -> (i32, i32) {
    if vx.abs() >= vy.abs() {
        (if vx > 0.0 { -1 } else { 1 }, 0)
    } else {
        (0, if vy > 0.0 { -1 } else { 1 })
    }
}

impl AirField {
    /// Re-sample how much rigid material covers each air cell (0..=4).
    pub fn refresh_solidity(&mut self, grid: &Grid) {
        let w = self.width as usize;
        map_rows(&mut self.solidity, w, |cx, cy| {
            let (bx, by) = (cx as u32 * AIR_SCALE, cy as u32 * AIR_SCALE);
            SOLIDITY_SAMPLES
                .iter()
                .filter(|(ox, oy)| {
                    let (x, y) = ((bx + ox) as i32, (by + oy) as i32);
                    grid.in_bounds(x, y) && classify(grid.get(x, y).id()).is_rigid()
                })
                .count() as u8
        });
    }

    #[inline]
    fn solidity_or_zero(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return 0;
        }
        self.solidity[y as usize * self.width as usize + x as usize]
    }

    /// Solid cells lose velocity in proportion to coverage; the blocked
    /// momentum turns into stagnation pressure and a sideways push on the two
    /// neighbors across the dominant flow axis.
    pub(super) fn apply_obstacles(&mut self, cfg: &AirConfig) {
        let (w, h) = (self.width as i32, self.height as i32);
        self.tmp_vx.fill(0.0);
        self.tmp_vy.fill(0.0);

        for y in 0..h {
            for x in 0..w {
                let i = (y * w + x) as usize;
                let s = self.solidity[i];
                if s == 0 {
                    continue;
                }
                let f = s as f32 / 4.0;
                let bx = self.vx[i] * f;
                let by = self.vy[i] * f;
                self.vx[i] -= bx;
                self.vy[i] -= by;
                self.p[i] += (bx.abs() + by.abs()) * cfg.stagnation;

                if bx.abs() >= by.abs() {
                    let push = bx.abs() * cfg.deflection * 0.5;
                    if y > 0 {
                        self.tmp_vy[i - w as usize] -= push;
                    }
                    if y + 1 < h {
                        self.tmp_vy[i + w as usize] += push;
                    }
                } else {
                    let push = by.abs() * cfg.deflection * 0.5;
                    if x > 0 {
                        self.tmp_vx[i - 1] -= push;
                    }
                    if x + 1 < w {
                        self.tmp_vx[i + 1] += push;
                    }
                }
            }
        }

        for i in 0..self.vx.len() {
            let open = 1.0 - self.solidity[i] as f32 / 4.0;
            self.vx[i] += self.tmp_vx[i] * open;
            self.vy[i] += self.tmp_vy[i] * open;
        }
    }

    /// Shadow behind obstacles: probe up to `lee_probe` cells upwind and
    /// attenuate velocity / induce suction by the strongest
    /// `coverage / distance` found.
    pub(super) fn apply_lee_zone(&mut self, cfg: &AirConfig) {
        if cfg.lee_probe == 0 {
            return;
        }
        let w = self.width as usize;
        let (gx, gy) = self.global_wind;
        let min_speed = cfg.lee_min_speed;
        let probe = cfg.lee_probe as i32;

        let mut shadow = std::mem::take(&mut self.tmp_p);
        let this = &*self;
        map_rows(&mut shadow, w, |x, y| {
            let i = y * w + x;
            if this.solidity[i] >= 4 {
                return 0.0;
            }
            let (mut vx, mut vy) = (this.vx[i], this.vy[i]);
            if vx.abs().max(vy.abs()) < min_speed {
                (vx, vy) = (gx, gy);
                if vx.abs().max(vy.abs()) < min_speed {
                    return 0.0;
                }
            }
            let (sx, sy) = upwind_step(vx, vy);
            let mut best = 0.0f32;
            for d in 1..=probe {
                let s = this.solidity_or_zero(x as i32 + sx * d, y as i32 + sy * d);
                best = best.max(s as f32 / 4.0 / d as f32);
            }
            best
        });

        for (i, &s) in shadow.iter().enumerate() {
            if s <= 0.0 {
                continue;
            }
            let keep = (1.0 - cfg.lee_attenuation * s).max(0.0);
            self.vx[i] *= keep;
            self.vy[i] *= keep;
            self.p[i] -= cfg.lee_suction * s;
        }
        self.tmp_p = shadow;
    }

    /// Speed up flow squeezed through a one-cell channel: open cell, solid
    /// on both sides across the dominant axis.
    pub(super) fn apply_venturi(&mut self, cfg: &AirConfig) {
        let (w, h) = (self.width as i32, self.height as i32);
        for y in 0..h {
            for x in 0..w {
                let i = (y * w + x) as usize;
                if self.solidity[i] != 0 {
                    continue;
                }
                let (vx, vy) = (self.vx[i], self.vy[i]);
                if vx == 0.0 && vy == 0.0 {
                    continue;
                }
                if vx.abs() >= vy.abs() {
                    if self.solidity_or_zero(x, y - 1) >= 2 && self.solidity_or_zero(x, y + 1) >= 2 {
                        self.vx[i] *= cfg.venturi_boost;
                    }
                } else if self.solidity_or_zero(x - 1, y) >= 2 && self.solidity_or_zero(x + 1, y) >= 2 {
                    self.vy[i] *= cfg.venturi_boost;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Rng;
    use crate::domain::{CellState, Material};

    fn wall_column(grid: &mut Grid, x0: i32, x1: i32, y0: i32, y1: i32) {
        for y in y0..y1 {
            for x in x0..x1 {
                grid.put(x, y, CellState::Inert(Material::Wall));
            }
        }
    }

    #[test]
    fn upwind_step_points_against_flow() {
        assert_eq!(upwind_step(5.0, 1.0), (-1, 0));
        assert_eq!(upwind_step(-5.0, 1.0), (1, 0));
        assert_eq!(upwind_step(0.5, -3.0), (0, 1));
    }

    #[test]
    fn lee_zone_attenuates_and_sucks() {
        let mut grid = Grid::new(64, 64);
        wall_column(&mut grid, 16, 20, 0, 64); // air column x = 4
        let mut air = AirField::new(64, 64, 30000.0);
        air.refresh_solidity(&grid);
        air.add_velocity_cell(6, 5, 1000.0, 0.0);
        air.add_velocity_cell(12, 5, 1000.0, 0.0);
        air.apply_lee_zone(&AirConfig::default());
        let (shadowed, _) = air.velocity_at(6, 5);
        let (open, _) = air.velocity_at(12, 5);
        assert!(shadowed < open);
        assert!(air.pressure_at(6, 5) < 0.0);
        assert_eq!(air.pressure_at(12, 5), 0.0);
    }

    #[test]
    fn venturi_boosts_narrow_channel_only() {
        let mut grid = Grid::new(64, 64);
        wall_column(&mut grid, 0, 64, 16, 20); // air row y = 4
        wall_column(&mut grid, 0, 64, 24, 28); // air row y = 6
        let mut air = AirField::new(64, 64, 30000.0);
        air.refresh_solidity(&grid);
        air.add_velocity_cell(3, 5, 1000.0, 0.0);
        air.add_velocity_cell(3, 10, 1000.0, 0.0);
        air.apply_venturi(&AirConfig::default());
        assert!(air.velocity_at(3, 5).0 > 1000.0);
        assert_eq!(air.velocity_at(3, 10).0, 1000.0);
    }

    #[test]
    fn deflection_pushes_flow_around_obstacle() {
        let mut grid = Grid::new(64, 64);
        wall_column(&mut grid, 32, 36, 32, 36); // single air cell (8, 8)
        let mut air = AirField::new(64, 64, 30000.0);
        air.refresh_solidity(&grid);
        air.add_velocity_cell(8, 8, 10000.0, 0.0);
        air.apply_obstacles(&AirConfig::default());
        assert_eq!(air.velocity_at(8, 8).0, 0.0);
        assert!(air.velocity_at(8, 7).1 < 0.0);
        assert!(air.velocity_at(8, 9).1 > 0.0);
        assert!(air.pressure_at(8, 8) > 0.0);
        air.step(&AirConfig::default(), &mut Rng::new(2), 1);
        assert!(air.is_within_bound());
    }
}
