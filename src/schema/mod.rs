//! Schema module - Configuration and seeding types for Gray-Scott simulations.

mod config;
pub mod presets;
mod seed;

pub use config::*;
pub use seed::*;
