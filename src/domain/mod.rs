//! Domain layer: what a cell is and the numbers that govern how it changes.

pub mod cell_state;
pub mod materials;
pub mod rules;

pub use cell_state::CellState;
pub use materials::{can_displace, classify, Category, Material, MaterialInfo};
pub use rules::RuleRates;
