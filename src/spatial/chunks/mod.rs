//! Chunk Scheduler - activity gating over fixed 32x32 tiles.
//!
//! Each chunk carries three pieces of scheduling state: `active` (the rule
//! engine visits it), `dirty` (an external renderer should redraw it) and a
//! sleep counter (ticks since its last observed mutation). Any write to a cell
//! wakes the owning chunk and its eight neighbors; chunks that stay untouched
//! for longer than the sleep threshold drop out of processing.

use serde::{Deserialize, Serialize};

/// Chunk size in cells (32x32 is cache-friendly)
pub const CHUNK_SIZE: u32 = 32;

/// Default ticks without mutation before a chunk sleeps.
pub const SLEEP_THRESHOLD: u16 = 64;

mod bitset;
mod lifecycle;

use bitset::ChunkBits;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub sleep_threshold: u16,
    /// Wake sleeping chunks holding loose material when wind over them is strong.
    pub wind_wakes_chunks: bool,
    pub wind_wake_speed: f32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            sleep_threshold: SLEEP_THRESHOLD,
            wind_wakes_chunks: true,
            wind_wake_speed: 3000.0,
        }
    }
}

pub struct ChunkScheduler {
    chunks_x: u32,
    chunks_y: u32,
    chunk_count: usize,

    active: ChunkBits,
    dirty: ChunkBits,
    /// Chunks written to since the last `reconcile`.
    mutated: ChunkBits,
    sleep_counter: Vec<u16>,
}

impl ChunkScheduler {
    /// Create chunk grid for given world dimensions, everything armed.
    pub fn new(world_width: u32, world_height: u32) -> Self {
        let chunks_x = world_width.max(1).div_ceil(CHUNK_SIZE);
        let chunks_y = world_height.max(1).div_ceil(CHUNK_SIZE);
        let chunk_count = (chunks_x * chunks_y) as usize;

        let mut scheduler = Self {
            chunks_x,
            chunks_y,
            chunk_count,
            active: ChunkBits::new(chunk_count),
            dirty: ChunkBits::new(chunk_count),
            mutated: ChunkBits::new(chunk_count),
            sleep_counter: vec![0; chunk_count],
        };
        scheduler.reset();
        scheduler
    }

    /// Get chunk dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.chunks_x, self.chunks_y)
    }

    /// Get total chunk count.
    pub fn total_chunks(&self) -> usize {
        self.chunk_count
    }

    pub fn active_chunk_count(&self) -> usize {
        self.active.count()
    }

    pub fn dirty_chunk_count(&self) -> usize {
        self.dirty.count()
    }
}
