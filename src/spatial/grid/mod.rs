//! Grid - Structure of Arrays (SoA) for cache-friendly cell storage
//!
//! Two parallel arrays over `width * height` cells: material tags and one aux
//! byte each. The aux byte is only reachable through `CellState`, and `put`
//! writes tag and byte together, so a material change can never keep the old
//! material's bits.

use crate::domain::{CellState, Material};

mod indexing;
mod cells;
mod updated;

pub struct Grid {
    width: u32,
    height: u32,

    types: Vec<Material>,
    aux: Vec<u8>,
    /// Cells whose stamp equals `stamp` were produced this pass and are not
    /// processed again.
    updated: Vec<u32>,
    stamp: u32,
}

impl Grid {
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let size = (width as usize) * (height as usize);
        Self {
            width,
            height,
            types: vec![Material::Empty; size],
            aux: vec![0; size],
            updated: vec![0; size],
            stamp: 1,
        }
    }

    /// Zero every buffer without reallocating.
    pub fn clear(&mut self) {
        self.types.fill(Material::Empty);
        self.aux.fill(0);
        self.updated.fill(0);
    }

    pub fn count(&self, material: Material) -> usize {
        self.types.iter().filter(|&&m| m == material).count()
    }

    pub fn non_empty_count(&self) -> usize {
        self.types.iter().filter(|m| !m.is_empty()).count()
    }

    /// Raw view for an external renderer.
    pub fn types_ptr(&self) -> *const u8 {
        self.types.as_ptr() as *const u8
    }

    pub fn aux_ptr(&self) -> *const u8 {
        self.aux.as_ptr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cell_state::{Lifetime, Moisture};

    #[test]
    fn outside_reads_as_wall() {
        let g = Grid::new(4, 3);
        assert_eq!(g.get(-1, 0), Material::Wall);
        assert_eq!(g.get(0, 3), Material::Wall);
        assert_eq!(g.state(4, 0), CellState::Inert(Material::Wall));
        assert!(!g.is_empty(9, 9));
    }

    #[test]
    fn put_reports_no_op_and_out_of_bounds() {
        let mut g = Grid::new(4, 4);
        assert!(g.put(1, 1, CellState::Sand(Moisture(3))));
        assert!(!g.put(1, 1, CellState::Sand(Moisture(3))));
        assert!(g.put(1, 1, CellState::Sand(Moisture(4))));
        assert!(!g.put(4, 1, CellState::Sand(Moisture(3))));
    }

    #[test]
    fn material_change_replaces_the_aux_byte() {
        let mut g = Grid::new(2, 2);
        g.put(0, 0, CellState::Fire(Lifetime(200)));
        g.put(0, 0, CellState::Inert(Material::Stone));
        assert_eq!(g.state(0, 0), CellState::Inert(Material::Stone));
        g.put(0, 0, CellState::Sand(Moisture(0)));
        assert_eq!(g.state(0, 0), CellState::Sand(Moisture(0)));
    }

    #[test]
    fn reset_updated_forgets_marks_even_across_wrap() {
        let mut g = Grid::new(2, 1);
        g.set_updated(0, 0);
        assert!(g.is_updated(0, 0));
        g.reset_updated();
        assert!(!g.is_updated(0, 0));

        g.stamp = u32::MAX;
        g.set_updated(1, 0);
        g.reset_updated();
        assert!(!g.is_updated(0, 0) && !g.is_updated(1, 0));
    }

    #[test]
    fn swap_moves_state_with_material() {
        let mut g = Grid::new(2, 1);
        g.put(0, 0, CellState::Fire(Lifetime(7)));
        g.swap(0, 0, 1, 0);
        assert!(g.is_empty(0, 0));
        assert_eq!(g.state(1, 0), CellState::Fire(Lifetime(7)));
    }
}
