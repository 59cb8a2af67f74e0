//! The surface pass and the rules it consults.

pub mod context;
pub mod rule;
pub mod system;

pub use context::SurfaceContext;
pub use rule::{DefaultSurfaceRule, SurfaceRule};
pub use system::SurfaceSystem;
