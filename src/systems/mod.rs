//! Systems - everything that advances or perturbs the world

pub mod air;
pub mod behaviors;
pub mod effects;
