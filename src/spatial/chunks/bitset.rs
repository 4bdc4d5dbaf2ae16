use super::*;

/// One flag per chunk, packed 64 to a word.
#[derive(Clone, Debug)]
pub(super) struct ChunkBits {
    words: Vec<u64>,
    len: usize,
}

impl ChunkBits {
    pub(super) fn new(len: usize) -> Self {
        Self { words: vec![0; len.div_ceil(64)], len }
    }

    #[inline(always)]
    pub(super) fn set(&mut self, idx: usize) {
        if idx < self.len {
            self.words[idx >> 6] |= 1u64 << (idx & 63);
        }
    }

    #[inline(always)]
    pub(super) fn unset(&mut self, idx: usize) {
        if idx < self.len {
            self.words[idx >> 6] &= !(1u64 << (idx & 63));
        }
    }

    #[inline(always)]
    pub(super) fn get(&self, idx: usize) -> bool {
        idx < self.len && self.words[idx >> 6] & (1u64 << (idx & 63)) != 0
    }

    pub(super) fn clear_all(&mut self) {
        self.words.fill(0);
    }

    pub(super) fn set_all(&mut self) {
        self.words.fill(u64::MAX);
        // Keep the tail of the last word clean so counts stay exact.
        let tail = self.len & 63;
        if tail != 0 {
            if let Some(last) = self.words.last_mut() {
                *last = (1u64 << tail) - 1;
            }
        }
    }

    pub(super) fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub(super) fn iter_set(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |&idx| self.get(idx))
    }
}

impl ChunkScheduler {
    #[inline]
    pub(super) fn chunk_coords(&self, x: u32, y: u32) -> (u32, u32) {
        (x / CHUNK_SIZE, y / CHUNK_SIZE)
    }

    /// Row-major index; `None` outside the chunk grid.
    #[inline]
    pub(super) fn chunk_slot(&self, cx: i32, cy: i32) -> Option<usize> {
        if cx < 0 || cy < 0 || cx >= self.chunks_x as i32 || cy >= self.chunks_y as i32 {
            return None;
        }
        Some(cy as usize * self.chunks_x as usize + cx as usize)
    }

    #[inline]
    fn slot_of(&self, cx: u32, cy: u32) -> Option<usize> {
        self.chunk_slot(cx.min(i32::MAX as u32) as i32, cy.min(i32::MAX as u32) as i32)
    }

    // === Queries ===

    #[inline]
    pub fn is_active(&self, cx: u32, cy: u32) -> bool {
        self.slot_of(cx, cy).is_some_and(|idx| self.active.get(idx))
    }

    #[inline]
    pub fn is_dirty(&self, cx: u32, cy: u32) -> bool {
        self.slot_of(cx, cy).is_some_and(|idx| self.dirty.get(idx))
    }

    /// Ticks since the chunk last saw a mutation (0 for out-of-range chunks).
    pub fn sleep_counter(&self, cx: u32, cy: u32) -> u16 {
        self.slot_of(cx, cy).map_or(0, |idx| self.sleep_counter[idx])
    }
}
