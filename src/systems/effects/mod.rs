//! Trigger effects built from grid writes and air impulses.
//!
//! Effects run through the same `UpdateContext` as material rules, so every
//! cell they touch wakes its chunk and counts as produced this tick.

pub mod beam;
pub mod explosion;
pub mod lightning;

pub use beam::{cast_beam, BeamReport};
pub use explosion::{explode, ExplosionReport};
pub use lightning::{strike, Branch, BranchRole, LightningReport, Termination};
