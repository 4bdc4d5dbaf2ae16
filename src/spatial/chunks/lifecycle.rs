use super::*;

impl ChunkScheduler {
    /// Set active + dirty and restart the sleep counter.
    pub fn mark_active(&mut self, cx: u32, cy: u32) {
        if cx < self.chunks_x && cy < self.chunks_y {
            self.wake((cy * self.chunks_x + cx) as usize);
        }
    }

    #[inline]
    fn wake(&mut self, idx: usize) {
        self.active.set(idx);
        self.dirty.set(idx);
        self.mutated.set(idx);
        self.sleep_counter[idx] = 0;
    }

    /// Wake the chunk owning (x, y) and its eight neighbors.
    ///
    /// Swaps reach one cell across a border, so a write anywhere can change
    /// what a neighboring chunk should do next tick.
    pub fn mark_cell_mutated(&mut self, x: u32, y: u32) {
        let (cx, cy) = self.chunk_coords(x, y);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if let Some(idx) = self.chunk_slot(cx as i32 + dx, cy as i32 + dy) {
                    self.wake(idx);
                }
            }
        }
    }

    /// End-of-tick bookkeeping: mutated chunks restart their counter, quiet
    /// active chunks count up and fall asleep once past `threshold`.
    pub fn reconcile(&mut self, threshold: u16) {
        for idx in 0..self.chunk_count {
            if !self.active.get(idx) {
                continue;
            }
            if self.mutated.get(idx) {
                self.sleep_counter[idx] = 0;
                continue;
            }
            let counter = self.sleep_counter[idx].saturating_add(1);
            self.sleep_counter[idx] = counter;
            if counter > threshold {
                self.active.unset(idx);
            }
        }
        self.mutated.clear_all();
    }

    /// Re-arm every chunk: active, dirty, counters zeroed.
    pub fn reset(&mut self) {
        self.active.set_all();
        self.dirty.set_all();
        self.mutated.clear_all();
        self.sleep_counter.fill(0);
    }

    /// Indices of chunks needing a redraw, row-major.
    pub fn dirty_chunks(&self) -> impl Iterator<Item = u32> + '_ {
        self.dirty.iter_set().map(|idx| idx as u32)
    }

    /// Called by the renderer after it has consumed the dirty list.
    pub fn clear_dirty(&mut self) {
        self.dirty.clear_all();
    }
}
