use crate::core::Rng;
use crate::spatial::{ChunkScheduler, Grid};
use crate::systems::air::AirField;
use crate::systems::behaviors::BehaviorRegistry;

use super::{ConfigError, EntityArena, SimConfig, Simulation, TickStats};

pub(super) fn create_simulation(width: u32, height: u32, config: SimConfig) -> Simulation {
    let width = width.max(1);
    let height = height.max(1);
    let mut air = AirField::new(width, height, config.air.bound);
    air.configure(&config.air);
    log::debug!("simulation created: {width}x{height}, seed {:#x}", config.seed);

    Simulation {
        grid: Grid::new(width, height),
        chunks: ChunkScheduler::new(width, height),
        air,
        entities: EntityArena::new(config.entity_capacity),
        behaviors: BehaviorRegistry::new(),
        rng: Rng::new(config.seed),
        frame: 0,
        paused: false,
        stats: TickStats::default(),
        config,
    }
}

/// Fresh buffers for a new size; every chunk comes back active and dirty.
pub(super) fn reset(sim: &mut Simulation, width: u32, height: u32) {
    let width = width.max(1);
    let height = height.max(1);
    sim.grid = Grid::new(width, height);
    sim.chunks = ChunkScheduler::new(width, height);
    sim.air = AirField::new(width, height, sim.config.air.bound);
    sim.air.configure(&sim.config.air);
    sim.entities.clear();
    sim.rng.reseed(sim.config.seed);
    sim.frame = 0;
    sim.stats.reset();
    log::debug!("simulation reset to {width}x{height}");
}

pub(super) fn load_config(sim: &mut Simulation, json: &str) -> Result<(), ConfigError> {
    let config = match SimConfig::from_json(json) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("config rejected: {err}");
            return Err(err);
        }
    };
    sim.air.configure(&config.air);
    sim.entities.set_capacity(config.entity_capacity);
    sim.rng.reseed(config.seed);
    sim.config = config;
    log::debug!("config loaded, seed {:#x}", sim.config.seed);
    Ok(())
}
