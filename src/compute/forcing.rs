//! Pointer-driven forcing.
//!
//! Cells inside the brush around the pointer have their update discarded and
//! replaced by the configured seed pair, continuously injecting B.

use super::Grid;
use crate::schema::{ForcingConfig, ForcingShape};

/// Active forcing location supplied by the caller before each step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Pointer {
    /// No forcing this step.
    #[default]
    None,
    /// Position in cell units.
    Cell([f32; 3]),
    /// Position as a fraction of each grid axis.
    Normalized([f32; 3]),
}

impl Pointer {
    /// Pointer from surface texture coordinates. Only strictly positive
    /// `(u, v)` are active; anything else, including the `(-1, -1)` "not over
    /// the surface" sentinel, yields [`Pointer::None`].
    pub fn from_uv(u: f32, v: f32) -> Self {
        if u <= 0.0 || v <= 0.0 {
            Pointer::None
        } else {
            Pointer::Normalized([u, v, 0.0])
        }
    }

    /// Pointer at a grid cell.
    pub fn at_cell(x: f32, y: f32, z: f32) -> Self {
        Pointer::Cell([x, y, z])
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Pointer::None)
    }

    /// Position in cell units, if any. A negative component on any axis is
    /// the "no forcing" sentinel.
    pub fn resolve(&self, grid: Grid) -> Option<[f32; 3]> {
        match *self {
            Pointer::None => None,
            Pointer::Cell(p) | Pointer::Normalized(p) if p.iter().any(|&c| c < 0.0) => None,
            Pointer::Cell(p) => Some(p),
            Pointer::Normalized([u, v, w]) => Some([
                u * grid.width() as f32,
                v * grid.height() as f32,
                w * grid.depth() as f32,
            ]),
        }
    }
}

/// Brush resolved against a grid for one step.
#[derive(Debug, Clone, Copy)]
pub struct Brush {
    center: [f32; 3],
    shape: ForcingShape,
    seed: (f32, f32),
}

impl Brush {
    /// Resolve the pointer, or `None` when nothing should be forced.
    pub fn new(pointer: &Pointer, config: &ForcingConfig, grid: Grid) -> Option<Self> {
        pointer.resolve(grid).map(|center| Self {
            center,
            shape: config.shape,
            seed: (config.seed_a, config.seed_b),
        })
    }

    /// Concentration pair written inside the brush.
    #[inline]
    pub fn seed(&self) -> (f32, f32) {
        self.seed
    }

    /// Whether cell `(x, y, z)` lies inside the brush. Distances do not wrap.
    #[inline]
    pub fn contains(&self, x: usize, y: usize, z: usize) -> bool {
        let dx = x as f32 - self.center[0];
        let dy = y as f32 - self.center[1];
        let dz = z as f32 - self.center[2];
        match self.shape {
            ForcingShape::Box { half_width } => {
                dx.abs() < half_width && dy.abs() < half_width && dz.abs() < half_width
            }
            ForcingShape::Ball { radius } => dx * dx + dy * dy + dz * dz < radius * radius,
        }
    }

    /// Seed pair if the cell is forced.
    #[inline]
    pub fn override_at(&self, x: usize, y: usize, z: usize) -> Option<(f32, f32)> {
        self.contains(x, y, z).then_some(self.seed)
    }
}
