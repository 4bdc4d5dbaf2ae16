//! Air field time step: diffusion, pressure-gradient forcing, self-advection
//! and divergence correction, followed by the obstacle passes.

use super::{clamp_air, map_rows, AirConfig, AirField};
use crate::core::Rng;

/// 4-neighbor average with clamp-to-edge boundaries.
#[inline]
fn neighbor_avg(buf: &[f32], w: usize, h: usize, x: usize, y: usize) -> f32 {
    let l = buf[y * w + x.saturating_sub(1)];
    let r = buf[y * w + (x + 1).min(w - 1)];
    let u = buf[y.saturating_sub(1) * w + x];
    let d = buf[(y + 1).min(h - 1) * w + x];
    (l + r + u + d) * 0.25
}

/// Central difference along x and y with clamp-to-edge boundaries.
#[inline]
fn gradient(buf: &[f32], w: usize, h: usize, x: usize, y: usize) -> (f32, f32) {
    let l = buf[y * w + x.saturating_sub(1)];
    let r = buf[y * w + (x + 1).min(w - 1)];
    let u = buf[y.saturating_sub(1) * w + x];
    let d = buf[(y + 1).min(h - 1) * w + x];
    ((r - l) * 0.5, (d - u) * 0.5)
}

/// Bilinear sample at a fractional cell position, clamped onto the field.
#[inline]
pub(super) fn sample_bilinear(buf: &[f32], w: usize, h: usize, fx: f32, fy: f32) -> f32 {
    let fx = if fx.is_finite() { fx.clamp(0.0, (w - 1) as f32) } else { 0.0 };
    let fy = if fy.is_finite() { fy.clamp(0.0, (h - 1) as f32) } else { 0.0 };
    let x0 = fx.floor() as usize;
    let y0 = fy.floor() as usize;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);
    let tx = fx - x0 as f32;
    let ty = fy - y0 as f32;
    let top = buf[y0 * w + x0] * (1.0 - tx) + buf[y0 * w + x1] * tx;
    let bottom = buf[y1 * w + x0] * (1.0 - tx) + buf[y1 * w + x1] * tx;
    top * (1.0 - ty) + bottom * ty
}

impl AirField {
    /// Advance the field by one tick.
    pub fn step(&mut self, cfg: &AirConfig, rng: &mut Rng, frame: u64) {
        self.configure(cfg);
        self.ease_global_wind(cfg);
        self.diffuse_pressure(cfg);
        self.apply_pressure_gradient(cfg);
        self.apply_turbulence(cfg, rng, frame);
        self.diffuse_velocity(cfg);
        self.advect_velocity(cfg);
        self.correct_divergence(cfg);
        self.apply_obstacles(cfg);
        self.apply_lee_zone(cfg);
        self.apply_venturi(cfg);
        self.clamp_all();
    }

    fn ease_global_wind(&mut self, cfg: &AirConfig) {
        let (gx, gy) = self.global_wind;
        let (tx, ty) = self.target_wind;
        self.global_wind = (
            clamp_air(gx + (tx - gx) * cfg.wind_ease, self.bound),
            clamp_air(gy + (ty - gy) * cfg.wind_ease, self.bound),
        );
    }

    fn diffuse_pressure(&mut self, cfg: &AirConfig) {
        let (w, h) = (self.width as usize, self.height as usize);
        let rate = cfg.pressure_diffusion;
        let p = &self.p;
        map_rows(&mut self.tmp_p, w, |x, y| {
            let c = p[y * w + x];
            c + (neighbor_avg(p, w, h, x, y) - c) * rate
        });
        std::mem::swap(&mut self.p, &mut self.tmp_p);
    }

    /// velocity = velocity * damp - grad(p) * k, nudged toward the global wind;
    /// pressure then loses a fixed share of its energy.
    fn apply_pressure_gradient(&mut self, cfg: &AirConfig) {
        let (w, h) = (self.width as usize, self.height as usize);
        let (gx, gy) = self.global_wind;
        let (damp, k, nudge) = (cfg.velocity_damping, cfg.gradient_force, cfg.wind_nudge);
        let p = &self.p;

        let vx = &self.vx;
        map_rows(&mut self.tmp_vx, w, |x, y| {
            let v = vx[y * w + x];
            let (dpx, _) = gradient(p, w, h, x, y);
            v * damp - dpx * k + (gx - v) * nudge
        });
        let vy = &self.vy;
        map_rows(&mut self.tmp_vy, w, |x, y| {
            let v = vy[y * w + x];
            let (_, dpy) = gradient(p, w, h, x, y);
            v * damp - dpy * k + (gy - v) * nudge
        });
        std::mem::swap(&mut self.vx, &mut self.tmp_vx);
        std::mem::swap(&mut self.vy, &mut self.tmp_vy);

        let decay = cfg.pressure_decay;
        for v in self.p.iter_mut() {
            *v *= decay;
        }
    }

    /// Light random gusts every `turbulence_period` ticks, scaled by global wind.
    fn apply_turbulence(&mut self, cfg: &AirConfig, rng: &mut Rng, frame: u64) {
        if cfg.turbulence_period == 0 || frame % cfg.turbulence_period as u64 != 0 {
            return;
        }
        let (gx, gy) = self.global_wind;
        let strength = ((gx * gx + gy * gy).sqrt() / self.bound).min(1.0);
        let amp = cfg.turbulence * strength;
        if !(amp > 0.0) {
            return;
        }
        for i in 0..self.vx.len() {
            self.vx[i] += rng.signed_unit() * amp;
            self.vy[i] += rng.signed_unit() * amp;
        }
    }

    fn diffuse_velocity(&mut self, cfg: &AirConfig) {
        let (w, h) = (self.width as usize, self.height as usize);
        let rate = cfg.velocity_diffusion;
        let vx = &self.vx;
        map_rows(&mut self.tmp_vx, w, |x, y| {
            let c = vx[y * w + x];
            c + (neighbor_avg(vx, w, h, x, y) - c) * rate
        });
        let vy = &self.vy;
        map_rows(&mut self.tmp_vy, w, |x, y| {
            let c = vy[y * w + x];
            c + (neighbor_avg(vy, w, h, x, y) - c) * rate
        });
        std::mem::swap(&mut self.vx, &mut self.tmp_vx);
        std::mem::swap(&mut self.vy, &mut self.tmp_vy);
    }

    /// Semi-Lagrangian self-advection: each cell pulls the velocity found one
    /// backtraced step upstream of itself.
    fn advect_velocity(&mut self, cfg: &AirConfig) {
        let (w, h) = (self.width as usize, self.height as usize);
        let (strength, blend, decay) = (cfg.advection_strength, cfg.advection_blend, cfg.velocity_decay);
        let (vx, vy) = (&self.vx, &self.vy);

        map_rows(&mut self.tmp_vx, w, |x, y| {
            let i = y * w + x;
            let bx = x as f32 - vx[i] * strength;
            let by = y as f32 - vy[i] * strength;
            let sampled = sample_bilinear(vx, w, h, bx, by);
            (vx[i] + (sampled - vx[i]) * blend) * decay
        });
        map_rows(&mut self.tmp_vy, w, |x, y| {
            let i = y * w + x;
            let bx = x as f32 - vx[i] * strength;
            let by = y as f32 - vy[i] * strength;
            let sampled = sample_bilinear(vy, w, h, bx, by);
            (vy[i] + (sampled - vy[i]) * blend) * decay
        });
        std::mem::swap(&mut self.vx, &mut self.tmp_vx);
        std::mem::swap(&mut self.vy, &mut self.tmp_vy);
    }

    /// Approximate incompressibility: outflow lowers pressure, inflow raises it.
    fn correct_divergence(&mut self, cfg: &AirConfig) {
        let (w, h) = (self.width as usize, self.height as usize);
        let k = cfg.divergence_correction;
        let (p, vx, vy) = (&self.p, &self.vx, &self.vy);
        map_rows(&mut self.tmp_p, w, |x, y| {
            let (dvx, _) = gradient(vx, w, h, x, y);
            let (_, dvy) = gradient(vy, w, h, x, y);
            p[y * w + x] - (dvx + dvy) * k
        });
        std::mem::swap(&mut self.p, &mut self.tmp_p);
    }
}
