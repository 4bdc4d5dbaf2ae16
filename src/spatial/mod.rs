//! Spatial storage: the cell grid and the chunk activity scheduler.

pub mod chunks;
pub mod grid;

pub use chunks::{ChunkScheduler, SchedulerConfig, CHUNK_SIZE};
pub use grid::Grid;
