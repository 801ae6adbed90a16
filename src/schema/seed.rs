//! Seed types for initializing Gray-Scott simulations.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Complete seed specification for simulation initialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seed {
    /// Pattern to use for seeding.
    pub pattern: Pattern,
}

/// Predefined patterns for initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pattern {
    /// Same concentration pair everywhere.
    Uniform { a: f32, b: f32 },
    /// A ramps with depth (`z / depth`), B is zero.
    DepthGradient,
    /// Axis-aligned square/cube written over an `(a = 1, b = 0)` background.
    Square {
        /// Center position as fraction of grid size (0.0-1.0).
        center: (f32, f32, f32),
        /// Half-width in cells.
        half_width: f32,
        a: f32,
        b: f32,
    },
    /// A = 1 everywhere, B uniform random in [0, amplitude).
    Noise {
        amplitude: f32,
        /// Random seed.
        seed: u64,
    },
    /// Sparse overrides over a zero background; coordinates wrap.
    Custom {
        /// List of (x, y, z, a, b) entries.
        values: Vec<(i64, i64, i64, f32, f32)>,
    },
}

impl Default for Pattern {
    fn default() -> Self {
        Pattern::Uniform { a: 0.0, b: 0.0 }
    }
}

impl Seed {
    pub fn new(pattern: Pattern) -> Self {
        Self { pattern }
    }

    /// Write the initial concentrations into `a` and `b`, laid out
    /// `z * height * width + y * width + x`.
    pub fn generate_into(
        &self,
        width: usize,
        height: usize,
        depth: usize,
        a: &mut [f32],
        b: &mut [f32],
    ) {
        let layer = width * height;

        match &self.pattern {
            Pattern::Uniform { a: va, b: vb } => {
                a.fill(*va);
                b.fill(*vb);
            }
            Pattern::DepthGradient => {
                for (z, slice) in a.chunks_mut(layer).enumerate() {
                    slice.fill(z as f32 / depth as f32);
                }
                b.fill(0.0);
            }
            Pattern::Square {
                center,
                half_width,
                a: va,
                b: vb,
            } => {
                a.fill(1.0);
                b.fill(0.0);
                let cx = center.0 * width as f32;
                let cy = center.1 * height as f32;
                let cz = if depth > 1 { center.2 * depth as f32 } else { 0.0 };
                for i in 0..a.len() {
                    let x = (i % width) as f32;
                    let y = ((i / width) % height) as f32;
                    let z = (i / layer) as f32;
                    if (x - cx).abs() < *half_width
                        && (y - cy).abs() < *half_width
                        && (z - cz).abs() < *half_width
                    {
                        a[i] = *va;
                        b[i] = *vb;
                    }
                }
            }
            Pattern::Noise { amplitude, seed } => {
                let mut rng = StdRng::seed_from_u64(*seed);
                a.fill(1.0);
                for cell in b.iter_mut() {
                    *cell = amplitude * rng.r#gen::<f32>();
                }
            }
            Pattern::Custom { values } => {
                a.fill(0.0);
                b.fill(0.0);
                for &(x, y, z, va, vb) in values {
                    let x = x.rem_euclid(width as i64) as usize;
                    let y = y.rem_euclid(height as i64) as usize;
                    let z = z.rem_euclid(depth as i64) as usize;
                    let idx = z * layer + y * width + x;
                    a[idx] = va;
                    b[idx] = vb;
                }
            }
        }
    }
}
