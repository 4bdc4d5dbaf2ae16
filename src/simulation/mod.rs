//! Simulation - single owner of the grid, air field, chunk scheduler,
//! entity arena, RNG and config.
//!
//! This type only orchestrates: the tick lives in step/, tools and direct
//! edits in commands/, construction and config in init/.

use crate::core::Rng;
use crate::domain::Material;
use crate::spatial::{ChunkScheduler, Grid};
use crate::systems::air::AirField;
use crate::systems::behaviors::{BehaviorRegistry, UpdateContext};
use crate::systems::effects::{ExplosionReport, LightningReport};

#[path = "perf/stage_clock.rs"]
mod stage_clock;
#[path = "perf/tick_stats.rs"]
mod tick_stats;
#[path = "init/config.rs"]
mod config;
#[path = "init/init.rs"]
mod init;
#[path = "step/step.rs"]
mod step;
#[path = "step/passes.rs"]
mod passes;
#[path = "commands/commands.rs"]
mod commands;
#[path = "commands/stroke.rs"]
mod stroke;
mod entities;
mod facade;

pub use config::{ConfigError, SimConfig};
pub use entities::{Entity, EntityArena, EntityHandle, EntityKind};
pub use facade::World;
pub use stroke::{Tool, ToolState};
pub use tick_stats::TickStats;

use stage_clock::StageClock;

pub struct Simulation {
    config: SimConfig,
    grid: Grid,
    chunks: ChunkScheduler,
    air: AirField,
    entities: EntityArena,
    behaviors: BehaviorRegistry,
    rng: Rng,

    frame: u64,
    paused: bool,
    stats: TickStats,
}

impl Simulation {
    pub fn new(width: u32, height: u32) -> Self {
        init::create_simulation(width, height, SimConfig::default())
    }

    /// Build with a config; an invalid one is rejected up front.
    pub fn with_config(width: u32, height: u32, config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(init::create_simulation(width, height, config))
    }

    pub fn width(&self) -> u32 { self.grid.width() }

    pub fn height(&self) -> u32 { self.grid.height() }

    pub fn frame(&self) -> u64 { self.frame }

    pub fn config(&self) -> &SimConfig { &self.config }

    pub fn grid(&self) -> &Grid { &self.grid }

    pub fn chunks(&self) -> &ChunkScheduler { &self.chunks }

    pub fn air(&self) -> &AirField { &self.air }

    pub fn entities(&self) -> &EntityArena { &self.entities }

    pub fn stats(&self) -> TickStats { self.stats }

    pub fn is_paused(&self) -> bool { self.paused }

    // === Tick ===

    /// Advance one step. Returns false when paused (nothing changes).
    pub fn tick(&mut self, dt_hint: f32) -> bool {
        step::tick(self, dt_hint)
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    // === Input ===

    /// Drag a tool from one normalized viewport point to another.
    pub fn apply_stroke(&mut self, from: (f32, f32), to: (f32, f32), tool: &ToolState) {
        stroke::apply_stroke(self, from, to, tool)
    }

    /// Place one cell with a freshly constructed state. Out of bounds is a no-op.
    pub fn paint(&mut self, x: i32, y: i32, material: Material) -> bool {
        commands::paint(self, x, y, material)
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, material: Material) -> u32 {
        commands::fill_rect(self, x, y, w, h, material)
    }

    pub fn set_wind(&mut self, vx: f32, vy: f32) {
        self.air.set_target_wind(vx, vy);
    }

    pub fn spawn_entity(&mut self, entity: Entity) -> Option<EntityHandle> {
        self.entities.spawn(entity)
    }

    pub fn entity_mut(&mut self, handle: EntityHandle) -> Option<&mut Entity> {
        self.entities.get_mut(handle)
    }

    pub fn trigger_explosion(&mut self, x: i32, y: i32, radius: u32, pressure: f32) -> ExplosionReport {
        commands::trigger_explosion(self, x, y, radius, pressure)
    }

    pub fn trigger_lightning(&mut self, x: i32, y: i32) -> LightningReport {
        commands::trigger_lightning(self, x, y)
    }

    // === Queries ===

    /// Material under a world position; outside the world reads as wall.
    pub fn sample_material(&self, world_x: f32, world_y: f32) -> Material {
        if !world_x.is_finite() || !world_y.is_finite() {
            return Material::Wall;
        }
        self.grid.get(world_x.floor() as i32, world_y.floor() as i32)
    }

    pub fn sample_velocity(&self, world_x: f32, world_y: f32) -> (f32, f32) {
        self.air.sample_velocity(world_x, world_y)
    }

    pub fn sample_pressure(&self, world_x: f32, world_y: f32) -> f32 {
        self.air.sample_pressure(world_x, world_y)
    }

    pub fn types_ptr(&self) -> *const u8 {
        self.grid.types_ptr()
    }

    pub fn aux_ptr(&self) -> *const u8 {
        self.grid.aux_ptr()
    }

    /// Chunk indices needing a redraw, row-major.
    pub fn dirty_chunks(&self) -> Vec<u32> {
        self.chunks.dirty_chunks().collect()
    }

    pub fn clear_dirty_chunks(&mut self) {
        self.chunks.clear_dirty();
    }

    // === Lifecycle ===

    /// Reallocate every buffer for a new size.
    pub fn reset(&mut self, width: u32, height: u32) {
        init::reset(self, width, height)
    }

    /// Empty the world, keeping its size.
    pub fn clear(&mut self) {
        commands::clear(self)
    }

    /// Replace the config from JSON. On error the current config stays.
    pub fn load_config(&mut self, json: &str) -> Result<(), ConfigError> {
        init::load_config(self, json)
    }

    pub fn config_json(&self) -> Result<String, ConfigError> {
        self.config.to_json()
    }

    /// Context for writes made outside the passes (tools, triggers).
    fn context(&mut self) -> UpdateContext<'_> {
        UpdateContext::new(
            &mut self.grid,
            &mut self.chunks,
            &mut self.air,
            &mut self.rng,
            &self.config.rules,
            self.frame,
        )
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
