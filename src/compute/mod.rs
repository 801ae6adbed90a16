//! Compute module - Numerical computation for Gray-Scott simulations.

mod export;
mod field;
mod forcing;
mod grid;
mod modulation;
mod propagator;
mod stencil;

pub use export::*;
pub use field::*;
pub use forcing::*;
pub use grid::*;
pub use modulation::*;
pub use propagator::*;
pub use stencil::*;
