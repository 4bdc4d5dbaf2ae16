//! Air field - coarse pressure/velocity continuum under the cell grid.
//!
//! One air cell covers an `AIR_SCALE x AIR_SCALE` block of world cells. The
//! field always advances over its full extent once per tick, independent of
//! chunk activity, so wind stays globally coherent. Every value is kept within
//! `[-bound, bound]`; NaN is coerced to 0 on every write.

use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

mod obstacles;
mod solver;

/// World cells per air cell along each axis.
pub const AIR_SCALE: u32 = 4;

/// Default saturation bound for pressure and velocity.
pub const AIR_BOUND: f32 = 30000.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirConfig {
    /// Pressure relaxation toward the 4-neighbor average.
    pub pressure_diffusion: f32,
    pub velocity_damping: f32,
    pub gradient_force: f32,
    /// Per-tick pull of every cell toward the global wind.
    pub wind_nudge: f32,
    /// Per-tick easing of the global wind toward its target.
    pub wind_ease: f32,
    /// Turbulence amplitude at full-bound global wind.
    pub turbulence: f32,
    pub turbulence_period: u32,
    pub pressure_decay: f32,
    pub velocity_diffusion: f32,
    /// Backtrace distance in air cells per unit of velocity.
    pub advection_strength: f32,
    pub advection_blend: f32,
    pub velocity_decay: f32,
    pub divergence_correction: f32,
    /// Pressure gained per unit of blocked momentum.
    pub stagnation: f32,
    /// Share of blocked momentum redirected sideways.
    pub deflection: f32,
    pub lee_probe: u32,
    pub lee_attenuation: f32,
    pub lee_suction: f32,
    /// Below this local speed the lee probe follows the global wind instead.
    pub lee_min_speed: f32,
    pub venturi_boost: f32,
    /// Share of the global wind added on top of the local cell when sampling.
    pub ambient_mix: f32,
    pub bound: f32,
}

impl Default for AirConfig {
    fn default() -> Self {
        Self {
            pressure_diffusion: 0.24,
            velocity_damping: 0.97,
            gradient_force: 0.35,
            wind_nudge: 0.02,
            wind_ease: 0.02,
            turbulence: 150.0,
            turbulence_period: 8,
            pressure_decay: 0.985,
            velocity_diffusion: 0.12,
            advection_strength: 0.0001,
            advection_blend: 0.7,
            velocity_decay: 0.995,
            divergence_correction: 0.15,
            stagnation: 0.5,
            deflection: 0.35,
            lee_probe: 4,
            lee_attenuation: 0.6,
            lee_suction: 300.0,
            lee_min_speed: 150.0,
            venturi_boost: 1.2,
            ambient_mix: 0.1,
            bound: AIR_BOUND,
        }
    }
}

/// Saturate into `[-bound, bound]`, mapping NaN to 0.
#[inline]
pub fn clamp_air(v: f32, bound: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(-bound, bound)
    }
}

/// Fill `out` row by row from `f(x, y)`; rows run on the rayon pool when available.
pub(crate) fn map_rows<T, F>(out: &mut [T], width: usize, f: F)
where
    T: Send,
    F: Fn(usize, usize) -> T + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        out.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
            for (x, v) in row.iter_mut().enumerate() {
                *v = f(x, y);
            }
        });
    }
    #[cfg(not(feature = "parallel"))]
    {
        out.chunks_mut(width).enumerate().for_each(|(y, row)| {
            for (x, v) in row.iter_mut().enumerate() {
                *v = f(x, y);
            }
        });
    }
}

pub struct AirField {
    width: u32,
    height: u32,
    bound: f32,
    ambient_mix: f32,

    p: Vec<f32>,
    vx: Vec<f32>,
    vy: Vec<f32>,
    tmp_p: Vec<f32>,
    tmp_vx: Vec<f32>,
    tmp_vy: Vec<f32>,
    /// 0..=4 solid sample points per air cell.
    solidity: Vec<u8>,

    global_wind: (f32, f32),
    target_wind: (f32, f32),
}

impl AirField {
    /// Air field covering a `world_width x world_height` cell grid.
    pub fn new(world_width: u32, world_height: u32, bound: f32) -> Self {
        let width = world_width.max(1).div_ceil(AIR_SCALE);
        let height = world_height.max(1).div_ceil(AIR_SCALE);
        let size = (width * height) as usize;
        Self {
            width,
            height,
            bound: sanitize_bound(bound),
            ambient_mix: AirConfig::default().ambient_mix,
            p: vec![0.0; size],
            vx: vec![0.0; size],
            vy: vec![0.0; size],
            tmp_p: vec![0.0; size],
            tmp_vx: vec![0.0; size],
            tmp_vy: vec![0.0; size],
            solidity: vec![0; size],
            global_wind: (0.0, 0.0),
            target_wind: (0.0, 0.0),
        }
    }

    pub fn clear(&mut self) {
        self.p.fill(0.0);
        self.vx.fill(0.0);
        self.vy.fill(0.0);
        self.solidity.fill(0);
        self.global_wind = (0.0, 0.0);
        self.target_wind = (0.0, 0.0);
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn bound(&self) -> f32 {
        self.bound
    }

    /// Adopt the bound and sampling mix of a (possibly reloaded) config.
    pub fn configure(&mut self, cfg: &AirConfig) {
        self.bound = sanitize_bound(cfg.bound);
        self.ambient_mix = if cfg.ambient_mix.is_finite() { cfg.ambient_mix } else { 0.0 };
        self.clamp_all();
    }

    #[inline]
    fn idx(&self, cx: u32, cy: u32) -> usize {
        (cy * self.width + cx) as usize
    }

    /// Air cell enclosing a world position (clamped onto the field).
    #[inline]
    pub fn cell_of(&self, world_x: f32, world_y: f32) -> (u32, u32) {
        let fx = if world_x.is_finite() { world_x } else { 0.0 };
        let fy = if world_y.is_finite() { world_y } else { 0.0 };
        let cx = (fx / AIR_SCALE as f32).floor().clamp(0.0, (self.width - 1) as f32) as u32;
        let cy = (fy / AIR_SCALE as f32).floor().clamp(0.0, (self.height - 1) as f32) as u32;
        (cx, cy)
    }

    // === Sampling ===

    /// Velocity at a world position: enclosing air cell plus the ambient wind term.
    pub fn sample_velocity(&self, world_x: f32, world_y: f32) -> (f32, f32) {
        self.sample_velocity_with(world_x, world_y, self.ambient_mix)
    }

    pub fn sample_velocity_with(&self, world_x: f32, world_y: f32, ambient_mix: f32) -> (f32, f32) {
        let (cx, cy) = self.cell_of(world_x, world_y);
        let i = self.idx(cx, cy);
        let (gx, gy) = self.global_wind;
        (
            clamp_air(self.vx[i] + gx * ambient_mix, self.bound),
            clamp_air(self.vy[i] + gy * ambient_mix, self.bound),
        )
    }

    pub fn sample_pressure(&self, world_x: f32, world_y: f32) -> f32 {
        let (cx, cy) = self.cell_of(world_x, world_y);
        self.p[self.idx(cx, cy)]
    }

    pub fn velocity_at(&self, cx: u32, cy: u32) -> (f32, f32) {
        if cx >= self.width || cy >= self.height {
            return (0.0, 0.0);
        }
        let i = self.idx(cx, cy);
        (self.vx[i], self.vy[i])
    }

    pub fn pressure_at(&self, cx: u32, cy: u32) -> f32 {
        if cx >= self.width || cy >= self.height {
            return 0.0;
        }
        self.p[self.idx(cx, cy)]
    }

    pub fn solidity_at(&self, cx: u32, cy: u32) -> u8 {
        if cx >= self.width || cy >= self.height {
            return 0;
        }
        self.solidity[self.idx(cx, cy)]
    }

    pub fn global_wind(&self) -> (f32, f32) {
        self.global_wind
    }

    pub fn target_wind(&self) -> (f32, f32) {
        self.target_wind
    }

    /// Largest absolute pressure or velocity component in the field.
    pub fn max_abs(&self) -> f32 {
        self.p
            .iter()
            .chain(self.vx.iter())
            .chain(self.vy.iter())
            .fold(0.0f32, |m, v| m.max(v.abs()))
    }

    /// True when every stored value is finite and within the bound.
    pub fn is_within_bound(&self) -> bool {
        self.p
            .iter()
            .chain(self.vx.iter())
            .chain(self.vy.iter())
            .all(|v| v.is_finite() && v.abs() <= self.bound)
    }

    // === External writes (all saturating) ===

    pub fn set_target_wind(&mut self, vx: f32, vy: f32) {
        self.target_wind = (clamp_air(vx, self.bound), clamp_air(vy, self.bound));
    }

    pub fn add_pressure(&mut self, world_x: f32, world_y: f32, amount: f32) {
        let (cx, cy) = self.cell_of(world_x, world_y);
        self.add_pressure_cell(cx, cy, amount);
    }

    pub fn add_velocity(&mut self, world_x: f32, world_y: f32, dvx: f32, dvy: f32) {
        let (cx, cy) = self.cell_of(world_x, world_y);
        self.add_velocity_cell(cx, cy, dvx, dvy);
    }

    pub fn add_pressure_cell(&mut self, cx: u32, cy: u32, amount: f32) {
        if cx >= self.width || cy >= self.height {
            return;
        }
        let i = self.idx(cx, cy);
        self.p[i] = clamp_air(self.p[i] + clamp_air(amount, self.bound), self.bound);
    }

    pub fn add_velocity_cell(&mut self, cx: u32, cy: u32, dvx: f32, dvy: f32) {
        if cx >= self.width || cy >= self.height {
            return;
        }
        let i = self.idx(cx, cy);
        self.vx[i] = clamp_air(self.vx[i] + clamp_air(dvx, self.bound), self.bound);
        self.vy[i] = clamp_air(self.vy[i] + clamp_air(dvy, self.bound), self.bound);
    }

    /// Shockwave: pressure plus outward velocity falling off linearly with distance.
    pub fn add_radial_impulse(&mut self, world_x: f32, world_y: f32, radius: f32, strength: f32) {
        let (ccx, ccy) = self.cell_of(world_x, world_y);
        let reach = (radius.max(0.0) / AIR_SCALE as f32).ceil() as i32 + 1;
        let strength = clamp_air(strength, self.bound);
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let (cx, cy) = (ccx as i32 + dx, ccy as i32 + dy);
                if cx < 0 || cy < 0 || cx >= self.width as i32 || cy >= self.height as i32 {
                    continue;
                }
                let d = ((dx * dx + dy * dy) as f32).sqrt();
                if d > reach as f32 {
                    continue;
                }
                let falloff = 1.0 - d / (reach as f32 + 1.0);
                self.add_pressure_cell(cx as u32, cy as u32, strength * falloff);
                if d > 0.0 {
                    let push = strength * falloff * 0.5;
                    self.add_velocity_cell(cx as u32, cy as u32, dx as f32 / d * push, dy as f32 / d * push);
                }
            }
        }
    }

    pub(crate) fn clamp_all(&mut self) {
        let bound = self.bound;
        for buf in [&mut self.p, &mut self.vx, &mut self.vy] {
            for v in buf.iter_mut() {
                *v = clamp_air(*v, bound);
            }
        }
    }
}

fn sanitize_bound(bound: f32) -> f32 {
    if bound.is_finite() && bound > 0.0 { bound } else { AIR_BOUND }
}
