//! Toroidal grid geometry.
//!
//! Every coordinate is taken modulo its axis length, so no lookup can land
//! outside the backing array.

use crate::schema::ConfigError;

/// Immutable grid dimensions. For 2D, depth = 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    depth: usize,
}

impl Grid {
    /// Create a grid, rejecting any zero dimension.
    pub fn new(width: usize, height: usize, depth: usize) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 || depth == 0 {
            return Err(ConfigError::InvalidDimensions {
                width,
                height,
                depth,
            });
        }
        Ok(Self {
            width,
            height,
            depth,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Check if this is a 3D grid (depth > 1).
    #[inline]
    pub fn is_3d(&self) -> bool {
        self.depth > 1
    }

    /// Total number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width * self.height * self.depth
    }

    /// Cells per Z layer.
    #[inline]
    pub fn layer_size(&self) -> usize {
        self.width * self.height
    }

    /// Flat index of an in-range cell.
    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        z * self.height * self.width + y * self.width + x
    }

    /// Flat index of an arbitrary coordinate after wrapping each axis.
    #[inline]
    pub fn wrapped_idx(&self, x: isize, y: isize, z: isize) -> usize {
        let x = x.rem_euclid(self.width as isize) as usize;
        let y = y.rem_euclid(self.height as isize) as usize;
        let z = z.rem_euclid(self.depth as isize) as usize;
        self.idx(x, y, z)
    }

    /// Inverse of [`Grid::idx`].
    #[inline]
    pub fn coords(&self, idx: usize) -> (usize, usize, usize) {
        let x = idx % self.width;
        let y = (idx / self.width) % self.height;
        let z = idx / self.layer_size();
        (x, y, z)
    }
}
