//! Derived scalar export for visualization.
//!
//! Reads the current buffers only; never mutates simulation state.

use log::warn;

use super::FieldView;
use crate::schema::{ExportConfig, ExportMode, NonFinitePolicy};

/// Export failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExportError {
    #[error("Export buffer holds {actual} values, grid has {expected} cells")]
    BufferSize { expected: usize, actual: usize },
    #[error("Non-finite value {value} at cell ({x}, {y}, {z}) (index {index})")]
    NonFiniteValue {
        index: usize,
        x: usize,
        y: usize,
        z: usize,
        value: f32,
    },
    #[error("Export range [{min}, {max}] is empty or not finite")]
    InvalidRange { min: f32, max: f32 },
}

impl ExportMode {
    /// Derived scalar for one concentration pair.
    #[inline]
    pub fn derive(self, a: f32, b: f32) -> f32 {
        match self {
            ExportMode::AbsSum => (a + b).abs(),
            ExportMode::Difference => a - b,
            ExportMode::A => a,
            ExportMode::B => b,
        }
    }
}

/// Write the derived scalar of every cell into `out`.
///
/// With [`NonFinitePolicy::Report`] the lowest-index non-finite value is
/// reported and `out` is left untouched. With [`NonFinitePolicy::Clamp`]
/// every value is clamped into the export range.
pub fn export_into(
    field: &FieldView<'_>,
    config: &ExportConfig,
    out: &mut [f32],
) -> Result<(), ExportError> {
    let expected = field.grid.cell_count();
    if out.len() != expected {
        return Err(ExportError::BufferSize {
            expected,
            actual: out.len(),
        });
    }

    let derived = field
        .a
        .iter()
        .zip(field.b)
        .map(|(&a, &b)| config.mode.derive(a, b));

    match config.non_finite {
        NonFinitePolicy::Report => {
            let first_bad = derived.clone().enumerate().find(|(_, v)| !v.is_finite());
            if let Some((index, value)) = first_bad {
                let (x, y, z) = field.grid.coords(index);
                warn!("export hit non-finite value {value} at ({x}, {y}, {z})");
                return Err(ExportError::NonFiniteValue {
                    index,
                    x,
                    y,
                    z,
                    value,
                });
            }
            for (slot, v) in out.iter_mut().zip(derived) {
                *slot = v;
            }
        }
        NonFinitePolicy::Clamp => {
            let (lo, hi) = config.range;
            if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
                return Err(ExportError::InvalidRange { min: lo, max: hi });
            }
            for (slot, v) in out.iter_mut().zip(derived) {
                *slot = if v.is_nan() { lo } else { v.clamp(lo, hi) };
            }
        }
    }

    Ok(())
}
