//! Gray-Scott - Reaction-diffusion on toroidal 2D and 3D grids.
//!
//! Two species, A and B, react (`A + 2B -> 3B`) and diffuse over a periodic
//! grid. Each step applies an explicit update using a discrete Laplacian
//! stencil, reading from one buffer pair and writing to the other.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration, parameter presets and seeding
//! - `compute`: Grid storage, stencils, forcing, stepping and export
//!
//! # Example
//!
//! ```rust
//! use gray_scott::{
//!     schema::ReactionParams,
//!     compute::{GrayScott, Pointer},
//! };
//!
//! let mut sim = GrayScott::new_2d(64, 64, ReactionParams::default()).unwrap();
//!
//! // Brush B into the middle of the grid while stepping.
//! sim.set_pointer(Pointer::from_uv(0.5, 0.5));
//! sim.run(10);
//!
//! let mut image = vec![0.0f32; 64 * 64];
//! sim.export_to(&mut image).unwrap();
//! assert!(image.iter().any(|&v| v > 0.5));
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{FieldStats, GrayScott, Pointer, Species};
pub use schema::{ReactionParams, Seed, SimulationConfig};
