use super::*;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

impl Grid {
    // === Produced-this-pass marks ===
    //
    // A cell counts as updated when its stamp equals the grid's current one,
    // so starting a new pass is a counter bump instead of a buffer sweep.

    #[inline]
    pub fn is_updated(&self, x: u32, y: u32) -> bool {
        self.updated[self.index(x, y)] == self.stamp
    }

    #[inline]
    pub fn set_updated(&mut self, x: u32, y: u32) {
        let idx = self.index(x, y);
        self.updated[idx] = self.stamp;
    }

    pub fn reset_updated(&mut self) {
        self.stamp = self.stamp.wrapping_add(1);
        if self.stamp != 0 {
            return;
        }
        // Wrapped: old stamps could alias the new one.
        #[cfg(feature = "parallel")]
        self.updated.par_iter_mut().for_each(|s| *s = 0);
        #[cfg(not(feature = "parallel"))]
        self.updated.fill(0);
        self.stamp = 1;
    }
}
