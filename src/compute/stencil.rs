//! Discrete Laplacian stencils.
//!
//! A stencil is a table of `(dx, dy, dz, weight)` taps plus a normalization
//! factor. The Laplacian at a cell is `normalization * sum(weight * value)`
//! over the wrapped neighbours, so the stepper never needs to know which
//! neighbourhood is in use. The sum is accumulated in `f64` and rounded once,
//! so a constant field yields exactly zero for every stencil.

use super::{FieldView, Grid};
use crate::schema::StencilKind;

/// A single neighbour sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tap {
    pub dx: isize,
    pub dy: isize,
    pub dz: isize,
    pub weight: f32,
}

const fn tap(dx: isize, dy: isize, dz: isize, weight: f32) -> Tap {
    Tap { dx, dy, dz, weight }
}

/// 5-point planar cross.
const FIVE_POINT: [Tap; 5] = [
    tap(0, 0, 0, -4.0),
    tap(-1, 0, 0, 1.0),
    tap(1, 0, 0, 1.0),
    tap(0, -1, 0, 1.0),
    tap(0, 1, 0, 1.0),
];

/// 7-point cross over three axes.
const SEVEN_POINT: [Tap; 7] = [
    tap(0, 0, -1, 1.0),
    tap(0, -1, 0, 1.0),
    tap(-1, 0, 0, 1.0),
    tap(0, 0, 0, -6.0),
    tap(1, 0, 0, 1.0),
    tap(0, 1, 0, 1.0),
    tap(0, 0, 1, 1.0),
];

/// Face neighbours weigh 6, edges 3, corners 2, center -88; scaled by 1/26.
const TWENTY_SEVEN_NORMALIZATION: f32 = 1.0 / 26.0;

/// Precomputed stencil ready for evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Stencil {
    taps: Vec<Tap>,
    normalization: f32,
}

impl Stencil {
    /// Build a stencil from an explicit tap table.
    pub fn new(taps: Vec<Tap>, normalization: f32) -> Self {
        Self {
            taps,
            normalization,
        }
    }

    pub fn from_kind(kind: StencilKind) -> Self {
        match kind {
            StencilKind::FivePoint => Self::new(FIVE_POINT.to_vec(), 1.0),
            StencilKind::SevenPoint => Self::new(SEVEN_POINT.to_vec(), 1.0),
            StencilKind::TwentySevenPoint => {
                Self::new(cubic_taps(), TWENTY_SEVEN_NORMALIZATION)
            }
        }
    }

    pub fn taps(&self) -> &[Tap] {
        &self.taps
    }

    pub fn normalization(&self) -> f32 {
        self.normalization
    }

    /// Sum of all weights; zero for a Laplacian.
    pub fn weight_sum(&self) -> f32 {
        self.taps.iter().map(|t| t.weight).sum()
    }

    /// Laplacian of both species at an in-range cell.
    #[inline]
    pub fn laplacian(&self, field: &FieldView<'_>, x: usize, y: usize, z: usize) -> (f32, f32) {
        let (x, y, z) = (x as isize, y as isize, z as isize);
        let mut sum_a = 0.0f64;
        let mut sum_b = 0.0f64;
        for t in &self.taps {
            let idx = field.grid.wrapped_idx(x + t.dx, y + t.dy, z + t.dz);
            let weight = f64::from(t.weight);
            sum_a += weight * f64::from(field.a[idx]);
            sum_b += weight * f64::from(field.b[idx]);
        }
        (self.normalize(sum_a), self.normalize(sum_b))
    }

    /// Laplacian of a single scalar grid at every cell.
    pub fn apply(&self, values: &[f32], grid: Grid) -> Vec<f32> {
        let mut out = vec![0.0f32; grid.cell_count()];
        for (idx, slot) in out.iter_mut().enumerate() {
            let (x, y, z) = grid.coords(idx);
            let (x, y, z) = (x as isize, y as isize, z as isize);
            let mut sum = 0.0f64;
            for t in &self.taps {
                let v = values[grid.wrapped_idx(x + t.dx, y + t.dy, z + t.dz)];
                sum += f64::from(t.weight) * f64::from(v);
            }
            *slot = self.normalize(sum);
        }
        out
    }

    #[inline]
    fn normalize(&self, sum: f64) -> f32 {
        (sum * f64::from(self.normalization)) as f32
    }
}

/// 3x3x3 taps, weighted by how many axes the offset moves along.
fn cubic_taps() -> Vec<Tap> {
    let mut taps = Vec::with_capacity(27);
    for dz in -1..=1isize {
        for dy in -1..=1isize {
            for dx in -1..=1isize {
                let moved = [dx, dy, dz].iter().filter(|&&d| d != 0).count();
                let weight = match moved {
                    0 => -88.0,
                    1 => 6.0,
                    2 => 3.0,
                    _ => 2.0,
                };
                taps.push(tap(dx, dy, dz, weight));
            }
        }
    }
    taps
}
