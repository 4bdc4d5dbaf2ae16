//! Core utilities shared by every layer of the engine.

pub mod random;

pub use random::{xorshift32, Rng};
