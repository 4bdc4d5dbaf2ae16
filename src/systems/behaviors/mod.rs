//! Behaviors - per-material rule implementations
//!
//! Each behavior handles one family of materials; the registry routes a cell
//! to the right one for the pass being run. Behaviors never touch the grid
//! directly: every write goes through `UpdateContext`, which also wakes the
//! chunk neighborhood and marks the produced cell as updated.

mod ant;
mod cloud;
mod combustion;
mod chemistry;
mod explosive;
mod fluid;
mod gas;
mod life;
mod moisture;
mod powder;

pub use ant::AntBehavior;
pub use chemistry::ChemistryBehavior;
pub use cloud::CloudBehavior;
pub use combustion::CombustionBehavior;
pub use explosive::ExplosiveBehavior;
pub use fluid::FluidBehavior;
pub use gas::GasBehavior;
pub use life::LifeBehavior;
pub use moisture::MoistureBehavior;
pub use powder::{PowderBehavior, WindBand};

use crate::core::Rng;
use crate::domain::materials::{MaterialInfo, FLAG_HOT};
use crate::domain::{can_displace, classify, Category, CellState, Material, RuleRates};
use crate::spatial::{ChunkScheduler, Grid};
use crate::systems::air::AirField;

pub const NEIGHBORS_4: [(i32, i32); 4] = [(0, 1), (-1, 0), (1, 0), (0, -1)];

pub const NEIGHBORS_8: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Which scan a material is advanced in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pass {
    /// Powders, fluids and timed charges, bottom row first.
    Gravity,
    /// Gases, top row first.
    Buoyancy,
    /// Fire, life and chemistry, every few ticks.
    Slow,
}

/// Update context passed to behaviors
pub struct UpdateContext<'a> {
    pub grid: &'a mut Grid,
    pub chunks: &'a mut ChunkScheduler,
    pub air: &'a mut AirField,
    pub rng: &'a mut Rng,
    pub rules: &'a RuleRates,
    pub frame: u64,
    pub x: u32,
    pub y: u32,
    /// Writes performed through this context.
    pub mutations: u32,
}

impl<'a> UpdateContext<'a> {
    pub fn new(
        grid: &'a mut Grid,
        chunks: &'a mut ChunkScheduler,
        air: &'a mut AirField,
        rng: &'a mut Rng,
        rules: &'a RuleRates,
        frame: u64,
    ) -> Self {
        Self { grid, chunks, air, rng, rules, frame, x: 0, y: 0, mutations: 0 }
    }

    #[inline]
    pub fn at(&mut self, x: u32, y: u32) {
        self.x = x;
        self.y = y;
    }

    #[inline]
    pub fn here(&self) -> (i32, i32) {
        (self.x as i32, self.y as i32)
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.grid.in_bounds(x, y)
    }

    #[inline]
    pub fn material(&self, x: i32, y: i32) -> Material {
        self.grid.get(x, y)
    }

    #[inline]
    pub fn info(&self, x: i32, y: i32) -> &'static MaterialInfo {
        classify(self.grid.get(x, y).id())
    }

    #[inline]
    pub fn state(&self, x: i32, y: i32) -> CellState {
        self.grid.state(x, y)
    }

    /// Empty or gas, and inside the world.
    #[inline]
    pub fn is_open(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.info(x, y).is_open()
    }

    // === Mutation entry point ===

    /// The single write path for cell content. No-op when out of bounds or
    /// when nothing changes; otherwise marks the cell updated for this tick and
    /// wakes its chunk neighborhood.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, state: CellState) -> bool {
        if !self.grid.put(x, y, state) {
            return false;
        }
        self.grid.set_updated(x as u32, y as u32);
        self.chunks.mark_cell_mutated(x as u32, y as u32);
        self.mutations += 1;
        true
    }

    /// Turn a cell into `material` with a freshly constructed state.
    #[inline]
    pub fn replace(&mut self, x: i32, y: i32, material: Material) -> bool {
        let state = CellState::spawn(material, self.rng, self.rules);
        self.set(x, y, state)
    }

    #[inline]
    pub fn clear(&mut self, x: i32, y: i32) -> bool {
        self.set(x, y, CellState::Empty)
    }

    /// Exchange two cells; the mover lands at (x2, y2) and is marked updated.
    pub fn swap(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> bool {
        if !self.in_bounds(x1, y1) || !self.in_bounds(x2, y2) || (x1 == x2 && y1 == y2) {
            return false;
        }
        let (ax, ay, bx, by) = (x1 as u32, y1 as u32, x2 as u32, y2 as u32);
        self.grid.swap(ax, ay, bx, by);
        self.grid.set_updated(bx, by);
        self.chunks.mark_cell_mutated(ax, ay);
        self.chunks.mark_cell_mutated(bx, by);
        self.mutations += 1;
        true
    }

    /// Core move primitive: exchange iff the target is not rigid and strictly
    /// lighter than the source.
    #[inline]
    pub fn try_swap_if_denser(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> bool {
        if !self.in_bounds(x1, y1) || !self.in_bounds(x2, y2) {
            return false;
        }
        if !can_displace(self.info(x1, y1), self.info(x2, y2)) {
            return false;
        }
        self.swap(x1, y1, x2, y2)
    }

    /// Move the current cell and follow it.
    #[inline]
    pub fn move_by(&mut self, dx: i32, dy: i32) -> bool {
        let (x, y) = self.here();
        if self.try_swap_if_denser(x, y, x + dx, y + dy) {
            self.x = (x + dx) as u32;
            self.y = (y + dy) as u32;
            return true;
        }
        false
    }

    // === Randomness ===

    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.rng.chance(p)
    }

    // === Air coupling ===

    #[inline]
    pub fn wind_at(&self, x: i32, y: i32) -> (f32, f32) {
        self.air.sample_velocity(x as f32 + 0.5, y as f32 + 0.5)
    }

    #[inline]
    pub fn pressure_at(&self, x: i32, y: i32) -> f32 {
        self.air.sample_pressure(x as f32 + 0.5, y as f32 + 0.5)
    }

    #[inline]
    pub fn push_pressure(&mut self, x: i32, y: i32, amount: f32) {
        self.air.add_pressure(x as f32 + 0.5, y as f32 + 0.5, amount);
    }

    #[inline]
    pub fn push_velocity(&mut self, x: i32, y: i32, vx: f32, vy: f32) {
        self.air.add_velocity(x as f32 + 0.5, y as f32 + 0.5, vx, vy);
    }

    // === Neighborhood queries ===

    pub fn count_around(&self, x: i32, y: i32, offsets: &[(i32, i32)], pred: impl Fn(Material) -> bool) -> u32 {
        offsets
            .iter()
            .filter(|(dx, dy)| self.in_bounds(x + dx, y + dy) && pred(self.material(x + dx, y + dy)))
            .count() as u32
    }

    /// First neighbor (in `offsets` order) matching `pred`.
    pub fn find_around(
        &self,
        x: i32,
        y: i32,
        offsets: &[(i32, i32)],
        pred: impl Fn(Material) -> bool,
    ) -> Option<(i32, i32)> {
        offsets
            .iter()
            .map(|(dx, dy)| (x + dx, y + dy))
            .find(|&(nx, ny)| self.in_bounds(nx, ny) && pred(self.material(nx, ny)))
    }

    /// Adjacent ignition source: fire, spark, or uncrusted lava.
    pub fn touches_heat(&self, x: i32, y: i32) -> bool {
        NEIGHBORS_8.iter().any(|(dx, dy)| {
            let (nx, ny) = (x + dx, y + dy);
            if !self.in_bounds(nx, ny) || !self.info(nx, ny).has(FLAG_HOT) {
                return false;
            }
            !matches!(self.state(nx, ny), CellState::Lava(l) if l.crust)
        })
    }
}

/// Behavior trait - each material family implements this
pub trait Behavior {
    fn update(&self, ctx: &mut UpdateContext);
}

/// Scan direction for a row, alternating per tick and per row.
#[inline]
pub fn scan_left_to_right(frame: u64, y: u32) -> bool {
    ((frame + y as u64) & 1) == 0
}

/// Lateral direction pair, randomized per cell.
#[inline]
pub fn random_dir(rng: &mut Rng) -> (i32, i32) {
    if rng.coin() { (-1, 1) } else { (1, -1) }
}

/// Horizontal direction of a wind component; 0 when calm.
#[inline]
pub fn wind_sign(v: f32) -> i32 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// Pass a material belongs to in the per-tick scans (`None`: not scanned).
pub fn fast_pass_of(material: Material) -> Option<Pass> {
    match material {
        Material::Tnt => Some(Pass::Gravity),
        m => match m.info().category {
            Category::Powder | Category::Fluid => Some(Pass::Gravity),
            Category::Gas => Some(Pass::Buoyancy),
            Category::Empty | Category::Solid => None,
        },
    }
}

/// Behavior registry - dispatch by pass and material
pub struct BehaviorRegistry {
    powder: PowderBehavior,
    fluid: FluidBehavior,
    gas: GasBehavior,
    cloud: CloudBehavior,
    ant: AntBehavior,
    explosive: ExplosiveBehavior,
    combustion: CombustionBehavior,
    moisture: MoistureBehavior,
    life: LifeBehavior,
    chemistry: ChemistryBehavior,
}

impl BehaviorRegistry {
    pub fn new() -> Self {
        Self {
            powder: PowderBehavior::new(),
            fluid: FluidBehavior::new(),
            gas: GasBehavior::new(),
            cloud: CloudBehavior::new(),
            ant: AntBehavior::new(),
            explosive: ExplosiveBehavior::new(),
            combustion: CombustionBehavior::new(),
            moisture: MoistureBehavior::new(),
            life: LifeBehavior::new(),
            chemistry: ChemistryBehavior::new(),
        }
    }

    /// Advance the cell at (ctx.x, ctx.y) for `pass`.
    pub fn update(&self, pass: Pass, material: Material, ctx: &mut UpdateContext) {
        match pass {
            Pass::Gravity | Pass::Buoyancy => self.update_fast(material, ctx),
            Pass::Slow => self.update_slow(material, ctx),
        }
    }

    fn update_fast(&self, material: Material, ctx: &mut UpdateContext) {
        if material.info().has(crate::domain::materials::FLAG_EXPLOSIVE) {
            self.explosive.update(ctx);
            let (x, y) = ctx.here();
            if ctx.material(x, y) != material {
                return;
            }
        }
        match material {
            Material::Tnt => {}
            Material::Ant => self.ant.update(ctx),
            Material::Cloud => self.cloud.update(ctx),
            m => match m.info().category {
                Category::Powder => self.powder.update(ctx),
                Category::Fluid => self.fluid.update(ctx),
                Category::Gas => self.gas.update(ctx),
                Category::Empty | Category::Solid => {}
            },
        }
    }

    fn update_slow(&self, material: Material, ctx: &mut UpdateContext) {
        match material {
            Material::Fire => self.combustion.update(ctx),
            Material::Sand | Material::WetSand | Material::Dirt => self.moisture.update(ctx),
            Material::Seed | Material::Sprout | Material::Plant | Material::Vine => self.life.update(ctx),
            Material::Lava | Material::Metal | Material::Ice | Material::Foam => self.chemistry.update(ctx),
            _ => {}
        }
    }
}

impl Default for BehaviorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// True for materials with work to do in the slow pass.
pub fn has_slow_rule(material: Material) -> bool {
    matches!(
        material,
        Material::Fire
            | Material::Sand
            | Material::WetSand
            | Material::Dirt
            | Material::Seed
            | Material::Sprout
            | Material::Plant
            | Material::Vine
            | Material::Lava
            | Material::Metal
            | Material::Ice
            | Material::Foam
    )
}


#[cfg(test)]
mod tests {
    use super::test_support::Bench;
    use super::*;

    #[test]
    fn swap_follows_density_table() {
        let mut b = Bench::new(8, 8);
        b.put(1, 1, Material::Sand);
        b.put(1, 2, Material::Water);
        b.put(2, 1, Material::Water);
        b.put(2, 2, Material::Stone);
        b.put(3, 1, Material::Oil);
        b.put(3, 2, Material::Water);
        let mut ctx = b.ctx();
        assert!(ctx.try_swap_if_denser(1, 1, 1, 2), "sand sinks into water");
        assert!(!ctx.try_swap_if_denser(2, 1, 2, 2), "never into rigid");
        assert!(!ctx.try_swap_if_denser(3, 1, 3, 2), "oil floats on water");
        assert_eq!(b.at(1, 2), Material::Sand);
        assert_eq!(b.at(1, 1), Material::Water);
    }

    #[test]
    fn set_wakes_sleeping_neighborhood_and_skips_noop_writes() {
        let mut b = Bench::new(96, 96);
        for _ in 0..=crate::spatial::chunks::SLEEP_THRESHOLD {
            b.chunks.reconcile(crate::spatial::chunks::SLEEP_THRESHOLD);
        }
        assert_eq!(b.chunks.active_chunk_count(), 0);
        let mut ctx = b.ctx();
        assert!(!ctx.set(40, 40, CellState::Empty), "writing the same value is not a mutation");
        assert_eq!(ctx.mutations, 0);
        assert!(ctx.set(40, 40, CellState::from(Material::Sand)));
        assert_eq!(ctx.mutations, 1);
        assert_eq!(b.chunks.active_chunk_count(), 9);
        assert!(b.grid.is_updated(40, 40));
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut b = Bench::new(8, 8);
        let mut ctx = b.ctx();
        assert!(!ctx.set(-1, 3, CellState::from(Material::Sand)));
        assert!(!ctx.swap(0, 0, 8, 0));
        assert_eq!(ctx.material(100, 100), Material::Wall);
    }

    #[test]
    fn crusted_lava_is_not_a_heat_source() {
        use crate::domain::cell_state::LavaState;
        let mut b = Bench::new(8, 8);
        b.put_state(3, 3, CellState::Lava(LavaState::new(30, true)));
        assert!(!b.ctx().touches_heat(4, 3));
        b.put_state(3, 3, CellState::Lava(LavaState::new(30, false)));
        assert!(b.ctx().touches_heat(4, 3));
    }
}
