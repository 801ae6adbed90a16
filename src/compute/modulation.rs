//! Spatially varying feed/kill rates.
//!
//! A modulation map stores one value in [0, 1] per cell. The stepper samples
//! it alongside the concentration stencil and blends the configured feed and
//! kill ranges with it.

use super::Grid;
use crate::schema::{ConfigError, ModulationConfig, ReactionParams};

/// Per-cell modulation values, same layout as the concentration buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct ModulationMap {
    values: Vec<f32>,
}

impl ModulationMap {
    /// Wrap raw per-cell values. Values are clamped to [0, 1].
    pub fn from_values(values: Vec<f32>, grid: Grid) -> Result<Self, ConfigError> {
        if values.len() != grid.cell_count() {
            return Err(ConfigError::ModulationSize {
                expected: grid.cell_count(),
                actual: values.len(),
            });
        }
        let values = values.into_iter().map(|v| v.clamp(0.0, 1.0)).collect();
        Ok(Self { values })
    }

    /// Resample an 8-bit luminance image (row-major, `image_width` wide) onto
    /// the grid with nearest-neighbour lookup. Every Z layer gets the same map.
    pub fn from_luma(
        pixels: &[u8],
        image_width: usize,
        image_height: usize,
        grid: Grid,
    ) -> Result<Self, ConfigError> {
        if image_width == 0 || image_height == 0 || pixels.len() != image_width * image_height {
            return Err(ConfigError::ModulationSize {
                expected: image_width * image_height,
                actual: pixels.len(),
            });
        }

        let mut layer = Vec::with_capacity(grid.layer_size());
        for y in 0..grid.height() {
            let sy = y * image_height / grid.height();
            for x in 0..grid.width() {
                let sx = x * image_width / grid.width();
                layer.push(f32::from(pixels[sy * image_width + sx]) / 255.0);
            }
        }

        let values = layer
            .iter()
            .copied()
            .cycle()
            .take(grid.cell_count())
            .collect();
        Ok(Self { values })
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

/// Where the stepper gets its feed/kill pair for a cell.
#[derive(Debug, Clone)]
pub enum RateField {
    Uniform { feed: f32, kill: f32 },
    Modulated {
        map: ModulationMap,
        config: ModulationConfig,
    },
}

impl RateField {
    pub fn uniform(params: &ReactionParams) -> Self {
        RateField::Uniform {
            feed: params.feed,
            kill: params.kill,
        }
    }

    /// `(feed, kill)` at a flat cell index.
    #[inline]
    pub fn rates(&self, idx: usize) -> (f32, f32) {
        match self {
            RateField::Uniform { feed, kill } => (*feed, *kill),
            RateField::Modulated { map, config } => {
                let m = map.values[idx];
                (mix(config.feed, m), mix(config.kill, m))
            }
        }
    }
}

#[inline]
fn mix((lo, hi): (f32, f32), t: f32) -> f32 {
    lo * (1.0 - t) + hi * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_checked() {
        let grid = Grid::new(4, 4, 1).unwrap();
        assert!(matches!(
            ModulationMap::from_values(vec![0.0; 15], grid),
            Err(ConfigError::ModulationSize {
                expected: 16,
                actual: 15
            })
        ));
    }

    #[test]
    fn test_values_clamped() {
        let grid = Grid::new(2, 1, 1).unwrap();
        let map = ModulationMap::from_values(vec![-1.0, 3.0], grid).unwrap();
        assert_eq!(map.values(), &[0.0, 1.0]);
    }

    #[test]
    fn test_luma_resampled_and_repeated() {
        // 2x2 image onto a 4x4x2 grid: each pixel covers a 2x2 block per layer.
        let grid = Grid::new(4, 4, 2).unwrap();
        let map = ModulationMap::from_luma(&[0, 255, 51, 102], 2, 2, grid).unwrap();
        let v = map.values();

        assert_eq!(v[grid.idx(0, 0, 0)], 0.0);
        assert_eq!(v[grid.idx(3, 1, 0)], 1.0);
        assert_eq!(v[grid.idx(1, 2, 0)], 0.2);
        assert_eq!(v[grid.idx(3, 3, 1)], 0.4);
        assert_eq!(v[..16], v[16..]);
    }

    #[test]
    fn test_rates_blend_ranges() {
        let grid = Grid::new(3, 1, 1).unwrap();
        let map = ModulationMap::from_values(vec![0.0, 0.5, 1.0], grid).unwrap();
        let field = RateField::Modulated {
            map,
            config: ModulationConfig::default(),
        };

        assert_eq!(field.rates(0), (0.027, 0.06));
        assert_eq!(field.rates(2), (0.037, 0.062));
        let (feed, kill) = field.rates(1);
        assert!((feed - 0.032).abs() < 1e-6);
        assert!((kill - 0.061).abs() < 1e-6);
    }

    #[test]
    fn test_uniform_rates() {
        let field = RateField::uniform(&ReactionParams::default());
        assert_eq!(field.rates(123), (0.035, 0.06));
    }
}
