//! Density-field evaluation for overworld terrain generation.
//!
//! The crate is layered bottom-up: deterministic [`random`] streams feed the
//! [`noise`] primitives, which the [`noise_router`] assembles into a graph of
//! density functions. A per-chunk session evaluates that graph with caching and
//! cell interpolation, and the aquifer and ore samplers turn densities into
//! block states.

pub mod block;
pub mod math;
pub mod noise;
pub mod noise_router;
pub mod random;

pub use block::BlockStateId;
