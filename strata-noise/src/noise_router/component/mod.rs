//! The three stages of a density-function stack: base, proto and chunk.

pub mod base_noise_router;
pub mod chunk_noise_router;
pub mod proto_noise_router;
