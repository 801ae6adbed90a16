//! Configuration types for Gray-Scott simulation parameters.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default depth for 2D simulations.
fn default_depth() -> usize {
    1
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Grid width in cells (X dimension).
    pub width: usize,
    /// Grid height in cells (Y dimension).
    pub height: usize,
    /// Grid depth in cells (Z dimension). Use 1 for 2D simulations.
    #[serde(default = "default_depth")]
    pub depth: usize,
    /// Time step size.
    pub dt: f32,
    /// Reaction-diffusion rates.
    pub params: ReactionParams,
    /// Laplacian stencil used by the stepper.
    #[serde(default)]
    pub stencil: StencilKind,
    /// Brush applied around the pointer.
    #[serde(default)]
    pub forcing: ForcingConfig,
    /// Derived-scalar export settings.
    #[serde(default)]
    pub export: ExportConfig,
    /// Clamp every computed concentration to [0, 1]. Off by default, which
    /// lets the update rule overshoot.
    #[serde(default)]
    pub clamp_concentrations: bool,
    /// Feed/kill ranges blended by a per-cell modulation map.
    #[serde(default)]
    pub modulation: Option<ModulationConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new_2d(256, 256, ReactionParams::default())
    }
}

/// The four Gray-Scott rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReactionParams {
    /// Diffusion rate of species A.
    pub diff_a: f32,
    /// Diffusion rate of species B.
    pub diff_b: f32,
    /// Feed rate (replenishes A).
    pub feed: f32,
    /// Kill rate (removes B).
    pub kill: f32,
}

impl Default for ReactionParams {
    fn default() -> Self {
        Self {
            diff_a: 0.16,
            diff_b: 0.08,
            feed: 0.035,
            kill: 0.06,
        }
    }
}

impl ReactionParams {
    pub const fn new(diff_a: f32, diff_b: f32, feed: f32, kill: f32) -> Self {
        Self {
            diff_a,
            diff_b,
            feed,
            kill,
        }
    }

    /// Same diffusion rates with a different feed/kill pair.
    pub const fn with_rates(self, feed: f32, kill: f32) -> Self {
        Self { feed, kill, ..self }
    }
}

/// Selectable Laplacian stencil.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StencilKind {
    /// 5-point planar cross.
    #[default]
    FivePoint,
    /// 7-point cross over three axes.
    SevenPoint,
    /// Full 3x3x3 neighbourhood with face/edge/corner weights.
    TwentySevenPoint,
}

impl StencilKind {
    /// Whether the stencil samples along the Z axis.
    pub fn is_volumetric(self) -> bool {
        !matches!(self, StencilKind::FivePoint)
    }
}

/// Region around the pointer that gets overwritten with the seed pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ForcingShape {
    /// Cells with `|c - p| < half_width` on every axis.
    Box { half_width: f32 },
    /// Cells with Euclidean distance to the pointer `< radius`.
    Ball { radius: f32 },
}

impl Default for ForcingShape {
    fn default() -> Self {
        ForcingShape::Box { half_width: 10.0 }
    }
}

/// Forcing (brush) parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForcingConfig {
    pub shape: ForcingShape,
    /// Concentration of A written inside the brush.
    pub seed_a: f32,
    /// Concentration of B written inside the brush.
    pub seed_b: f32,
}

impl Default for ForcingConfig {
    fn default() -> Self {
        Self {
            shape: ForcingShape::default(),
            seed_a: 0.0,
            seed_b: 0.9,
        }
    }
}

/// Derived scalar written by the exporter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportMode {
    /// `|A + B|`
    #[default]
    AbsSum,
    /// `A - B`
    Difference,
    /// Raw A.
    A,
    /// Raw B.
    B,
}

/// What the exporter does when it meets NaN or infinity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NonFinitePolicy {
    /// Fail with the lowest offending cell.
    #[default]
    Report,
    /// Clamp every exported value into the export range; NaN maps to the lower bound.
    Clamp,
}

/// Exporter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    pub mode: ExportMode,
    pub non_finite: NonFinitePolicy,
    /// Range used by [`NonFinitePolicy::Clamp`].
    pub range: (f32, f32),
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            mode: ExportMode::AbsSum,
            non_finite: NonFinitePolicy::Report,
            range: (0.0, 1.0),
        }
    }
}

/// Feed/kill ranges for spatially modulated rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModulationConfig {
    /// Feed at modulation 0 and 1.
    pub feed: (f32, f32),
    /// Kill at modulation 0 and 1.
    pub kill: (f32, f32),
}

impl Default for ModulationConfig {
    fn default() -> Self {
        Self {
            feed: (0.027, 0.037),
            kill: (0.06, 0.062),
        }
    }
}

impl SimulationConfig {
    /// Planar simulation using the 5-point stencil.
    pub fn new_2d(width: usize, height: usize, params: ReactionParams) -> Self {
        Self {
            width,
            height,
            depth: 1,
            dt: 1.0,
            params,
            stencil: StencilKind::FivePoint,
            forcing: ForcingConfig::default(),
            export: ExportConfig::default(),
            clamp_concentrations: false,
            modulation: None,
        }
    }

    /// Volumetric simulation using the 27-point stencil.
    pub fn new_3d(width: usize, height: usize, depth: usize, params: ReactionParams) -> Self {
        Self {
            depth,
            stencil: StencilKind::TwentySevenPoint,
            ..Self::new_2d(width, height, params)
        }
    }

    /// Check if this is a 3D simulation (depth > 1).
    #[inline]
    pub fn is_3d(&self) -> bool {
        self.depth > 1
    }

    /// Get total grid size (width * height * depth).
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.width * self.height * self.depth
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 || self.depth == 0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
                depth: self.depth,
            });
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::InvalidTimeStep);
        }
        let rates = [
            ("diff_a", self.params.diff_a),
            ("diff_b", self.params.diff_b),
            ("feed", self.params.feed),
            ("kill", self.params.kill),
        ];
        for (name, value) in rates {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidParameter { name, value });
            }
        }
        if self.is_3d() && !self.stencil.is_volumetric() {
            return Err(ConfigError::StencilDimension {
                stencil: self.stencil,
                depth: self.depth,
            });
        }
        let extent = match self.forcing.shape {
            ForcingShape::Box { half_width } => half_width,
            ForcingShape::Ball { radius } => radius,
        };
        if !extent.is_finite() || extent <= 0.0 {
            return Err(ConfigError::InvalidForcing);
        }
        let (lo, hi) = self.export.range;
        if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
            return Err(ConfigError::InvalidExportRange { min: lo, max: hi });
        }
        if let Some(modulation) = &self.modulation {
            for (name, (lo, hi)) in [("feed", modulation.feed), ("kill", modulation.kill)] {
                for value in [lo, hi] {
                    if !value.is_finite() || value < 0.0 {
                        return Err(ConfigError::InvalidModulation { name, value });
                    }
                }
            }
        }
        Ok(())
    }

    /// Load and validate a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: SimulationConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Pretty-printed JSON form of this configuration.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid dimensions must be at least 1, got {width}x{height}x{depth}")]
    InvalidDimensions {
        width: usize,
        height: usize,
        depth: usize,
    },
    #[error("Time step must be positive and finite")]
    InvalidTimeStep,
    #[error("Parameter {name} must be finite and non-negative, got {value}")]
    InvalidParameter { name: &'static str, value: f32 },
    #[error("Stencil {stencil:?} cannot be used on a grid with depth {depth}")]
    StencilDimension { stencil: StencilKind, depth: usize },
    #[error("Forcing brush extent must be positive")]
    InvalidForcing,
    #[error("Export range [{min}, {max}] is empty")]
    InvalidExportRange { min: f32, max: f32 },
    #[error("Modulation {name} bound must be finite and non-negative, got {value}")]
    InvalidModulation { name: &'static str, value: f32 },
    #[error("Modulation map has {actual} cells, grid has {expected}")]
    ModulationSize { expected: usize, actual: usize },
    #[error("Failed to read config: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}
