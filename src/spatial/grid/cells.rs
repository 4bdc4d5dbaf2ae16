use super::*;

impl Grid {
    /// Material at (x, y). Out of bounds reads as `Wall`: the world edge is solid.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Material {
        if !self.in_bounds(x, y) {
            return Material::Wall;
        }
        self.types[self.index(x as u32, y as u32)]
    }

    /// Decoded state at (x, y); out of bounds reads as a wall.
    #[inline]
    pub fn state(&self, x: i32, y: i32) -> CellState {
        if !self.in_bounds(x, y) {
            return CellState::Inert(Material::Wall);
        }
        let idx = self.index(x as u32, y as u32);
        CellState::decode(self.types[idx], self.aux[idx])
    }

    #[inline]
    pub fn is_empty(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.types[self.index(x as u32, y as u32)] == Material::Empty
    }

    /// Store a state. Returns false when out of bounds or when the stored bytes
    /// already match (no mutation happened).
    ///
    /// Bypasses chunk bookkeeping; simulation code writes through
    /// `UpdateContext`, which calls this and then wakes the neighborhood.
    #[inline]
    pub(crate) fn put(&mut self, x: i32, y: i32, state: CellState) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x as u32, y as u32);
        let (material, aux) = state.encode();
        if self.types[idx] == material && self.aux[idx] == aux {
            return false;
        }
        self.types[idx] = material;
        self.aux[idx] = aux;
        true
    }

    /// Exchange two cells (tag and aux travel together). Both must be in bounds.
    #[inline]
    pub(crate) fn swap(&mut self, x1: u32, y1: u32, x2: u32, y2: u32) {
        let a = self.index(x1, y1);
        let b = self.index(x2, y2);
        self.types.swap(a, b);
        self.aux.swap(a, b);
    }
}
