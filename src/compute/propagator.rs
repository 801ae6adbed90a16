//! Gray-Scott propagator - Main simulation driver.
//!
//! Each step reads the current buffers, writes every cell's update into the
//! next buffers, then swaps. No cell ever reads a value written in the same
//! step, so rows can be updated in parallel and still match a sequential
//! sweep bit for bit.

use log::debug;
use rayon::prelude::*;

use crate::schema::{ConfigError, ReactionParams, Seed, SimulationConfig};

use super::{
    Brush, ExportError, FieldStore, FieldView, Grid, ModulationMap, Pointer, RateField, Species,
    Stencil, export_into,
};

/// Gray-Scott reaction-diffusion simulation.
///
/// Supports both 2D and 3D grids. For 2D, depth = 1.
pub struct GrayScott {
    config: SimulationConfig,
    fields: FieldStore,
    stencil: Stencil,
    rates: RateField,
    pointer: Pointer,
    /// Current simulation time.
    time: f32,
    /// Step count.
    steps: u64,
}

impl GrayScott {
    /// Create a simulation from configuration with the default (all-zero) seed.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        Self::from_seed(config, &Seed::default())
    }

    /// 2D simulation with the 5-point stencil and reference settings.
    pub fn new_2d(width: usize, height: usize, params: ReactionParams) -> Result<Self, ConfigError> {
        Self::new(SimulationConfig::new_2d(width, height, params))
    }

    /// 3D simulation with the 27-point stencil and reference settings.
    pub fn new_3d(
        width: usize,
        height: usize,
        depth: usize,
        params: ReactionParams,
    ) -> Result<Self, ConfigError> {
        Self::new(SimulationConfig::new_3d(width, height, depth, params))
    }

    /// Create a simulation and initialize the current buffers from `seed`.
    pub fn from_seed(config: SimulationConfig, seed: &Seed) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = Grid::new(config.width, config.height, config.depth)?;

        debug!(
            "gray-scott grid {}x{}x{} stencil {:?} params {:?}",
            grid.width(),
            grid.height(),
            grid.depth(),
            config.stencil,
            config.params
        );

        Ok(Self {
            fields: FieldStore::from_seed(grid, seed),
            stencil: Stencil::from_kind(config.stencil),
            rates: RateField::uniform(&config.params),
            pointer: Pointer::None,
            time: 0.0,
            steps: 0,
            config,
        })
    }

    /// Reinitialize concentrations from a seed and reset the clock.
    pub fn reset(&mut self, seed: &Seed) {
        debug!("reseeding with {:?}", seed.pattern);
        self.fields.reseed(seed);
        self.time = 0.0;
        self.steps = 0;
    }

    /// Set the forcing location used by subsequent steps.
    pub fn set_pointer(&mut self, pointer: Pointer) {
        self.pointer = pointer;
    }

    pub fn pointer(&self) -> Pointer {
        self.pointer
    }

    /// Install (or remove) a per-cell feed/kill modulation map. Without a
    /// `modulation` section in the config the default ranges are used.
    pub fn set_modulation(&mut self, map: Option<ModulationMap>) -> Result<(), ConfigError> {
        self.rates = match map {
            None => RateField::uniform(&self.config.params),
            Some(map) => {
                let expected = self.grid().cell_count();
                if map.values().len() != expected {
                    return Err(ConfigError::ModulationSize {
                        expected,
                        actual: map.values().len(),
                    });
                }
                RateField::Modulated {
                    map,
                    config: self.config.modulation.unwrap_or_default(),
                }
            }
        };
        Ok(())
    }

    /// Overwrite the current buffers inside the brush right away.
    ///
    /// Returns the number of cells written. Does nothing without a pointer.
    pub fn apply_forcing(&mut self) -> usize {
        let grid = self.grid();
        let Some(brush) = Brush::new(&self.pointer, &self.config.forcing, grid) else {
            return 0;
        };
        let mut written = 0;
        for idx in 0..grid.cell_count() {
            let (x, y, z) = grid.coords(idx);
            if let Some(seed) = brush.override_at(x, y, z) {
                self.fields.set_current(idx, seed);
                written += 1;
            }
        }
        written
    }

    /// Perform one simulation step.
    pub fn step(&mut self) {
        let grid = self.fields.grid();
        let width = grid.width();
        let height = grid.height();
        let dt = self.config.dt;
        let params = self.config.params;
        let clamp = self.config.clamp_concentrations;
        let brush = Brush::new(&self.pointer, &self.config.forcing, grid);
        let stencil = &self.stencil;
        let rates = &self.rates;

        let (current, next_a, next_b) = self.fields.split();

        // One chunk per row; z and y follow from the row index.
        next_a
            .par_chunks_mut(width)
            .zip(next_b.par_chunks_mut(width))
            .enumerate()
            .for_each(|(row, (row_a, row_b))| {
                let y = row % height;
                let z = row / height;
                let base = row * width;
                for x in 0..width {
                    let idx = base + x;
                    let (lap_a, lap_b) = stencil.laplacian(&current, x, y, z);
                    let (feed, kill) = rates.rates(idx);
                    let (mut new_a, mut new_b) = react(
                        current.a[idx],
                        current.b[idx],
                        lap_a,
                        lap_b,
                        &params,
                        feed,
                        kill,
                        dt,
                    );
                    if clamp {
                        new_a = new_a.clamp(0.0, 1.0);
                        new_b = new_b.clamp(0.0, 1.0);
                    }
                    if let Some((seed_a, seed_b)) =
                        brush.as_ref().and_then(|b| b.override_at(x, y, z))
                    {
                        new_a = seed_a;
                        new_b = seed_b;
                    }
                    row_a[x] = new_a;
                    row_b[x] = new_b;
                }
            });

        self.fields.swap();
        self.time += dt;
        self.steps += 1;
    }

    /// Run simulation for specified number of steps.
    pub fn run(&mut self, steps: u64) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// Write the configured derived scalar into `out` (one value per cell).
    pub fn export_to(&self, out: &mut [f32]) -> Result<(), ExportError> {
        export_into(&self.fields.view(), &self.config.export, out)
    }

    /// Allocate and return the configured derived scalar.
    pub fn export(&self) -> Result<Vec<f32>, ExportError> {
        let mut out = vec![0.0f32; self.grid().cell_count()];
        self.export_to(&mut out)?;
        Ok(out)
    }

    /// Current buffer of one species.
    pub fn snapshot(&self, species: Species) -> &[f32] {
        self.fields.snapshot(species)
    }

    /// Both current buffers.
    pub fn fields(&self) -> FieldView<'_> {
        self.fields.view()
    }

    /// Concentration pair at a wrapped coordinate.
    pub fn read(&self, x: isize, y: isize, z: isize) -> (f32, f32) {
        self.fields.read(x, y, z)
    }

    pub fn grid(&self) -> Grid {
        self.fields.grid()
    }

    /// Get configuration reference.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn time(&self) -> f32 {
        self.time
    }
}

/// Gray-Scott update for one cell.
#[inline]
#[allow(clippy::too_many_arguments)]
pub fn react(
    a: f32,
    b: f32,
    lap_a: f32,
    lap_b: f32,
    params: &ReactionParams,
    feed: f32,
    kill: f32,
    dt: f32,
) -> (f32, f32) {
    let reaction = a * b * b;
    let new_a = a + dt * (params.diff_a * lap_a - reaction + feed * (1.0 - a));
    let new_b = b + dt * (params.diff_b * lap_b + reaction - (feed + kill) * b);
    (new_a, new_b)
}

/// Simulation statistics for monitoring.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FieldStats {
    pub min_a: f32,
    pub max_a: f32,
    pub mean_a: f32,
    pub min_b: f32,
    pub max_b: f32,
    pub mean_b: f32,
    /// Cells where either species is NaN or infinite.
    pub non_finite: usize,
}

impl FieldStats {
    /// Compute statistics from the current buffers.
    pub fn from_view(view: &FieldView<'_>) -> Self {
        let (min_a, max_a, mean_a) = summarize(view.a);
        let (min_b, max_b, mean_b) = summarize(view.b);
        let non_finite = view
            .a
            .iter()
            .zip(view.b)
            .filter(|(a, b)| !a.is_finite() || !b.is_finite())
            .count();

        Self {
            min_a,
            max_a,
            mean_a,
            min_b,
            max_b,
            mean_b,
            non_finite,
        }
    }

    pub fn from_sim(sim: &GrayScott) -> Self {
        Self::from_view(&sim.fields())
    }
}

fn summarize(values: &[f32]) -> (f32, f32, f32) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    let mut sum = 0.0f64;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
        sum += f64::from(v);
    }
    (min, max, (sum / values.len() as f64) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{
        ForcingShape, ModulationConfig, NonFinitePolicy, Pattern, StencilKind,
    };

    fn reference_4x4() -> GrayScott {
        GrayScott::new_2d(4, 4, ReactionParams::default()).unwrap()
    }

    #[test]
    fn test_rejects_zero_dimension() {
        assert!(matches!(
            GrayScott::new_2d(0, 4, ReactionParams::default()),
            Err(ConfigError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            GrayScott::new_3d(4, 4, 0, ReactionParams::default()),
            Err(ConfigError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_zero_field_feeds_a_only() {
        let mut sim = reference_4x4();
        sim.step();

        for &b in sim.snapshot(Species::B) {
            assert_eq!(b, 0.0);
        }
        for &a in sim.snapshot(Species::A) {
            assert_eq!(a, 0.035);
        }
        assert_eq!(sim.steps(), 1);
        assert_eq!(sim.time(), 1.0);
    }

    #[test]
    fn test_forcing_covering_grid_overrides_everything() {
        let mut sim = reference_4x4();
        sim.set_pointer(Pointer::at_cell(2.0, 2.0, 0.0));
        sim.step();

        for idx in 0..16 {
            assert_eq!(sim.snapshot(Species::A)[idx], 0.0);
            assert_eq!(sim.snapshot(Species::B)[idx], 0.9);
        }
    }

    #[test]
    fn test_forcing_containment() {
        let mut config = SimulationConfig::new_2d(32, 32, ReactionParams::default());
        config.forcing.shape = ForcingShape::Box { half_width: 3.0 };
        let seed = Seed::new(Pattern::Uniform { a: 1.0, b: 0.0 });
        let mut sim = GrayScott::from_seed(config, &seed).unwrap();
        sim.set_pointer(Pointer::at_cell(10.0, 20.0, 0.0));
        sim.step();

        let grid = sim.grid();
        for y in 0..32 {
            for x in 0..32 {
                let (a, b) = sim.read(x as isize, y as isize, 0);
                let inside = (x as f32 - 10.0).abs() < 3.0 && (y as f32 - 20.0).abs() < 3.0;
                if inside {
                    assert_eq!((a, b), (0.0, 0.9), "({}, {})", x, y);
                } else {
                    // Steady state (1, 0) is a fixed point of the update.
                    assert_eq!((a, b), (1.0, 0.0), "({}, {})", x, y);
                }
            }
        }
        assert_eq!(grid.cell_count(), 1024);
    }

    #[test]
    fn test_negative_pointer_disables_forcing() {
        for pointer in [
            Pointer::Normalized([-1.0, -1.0, 0.0]),
            Pointer::Normalized([0.5, -0.25, 0.0]),
            Pointer::Cell([-1.0, 2.0, 0.0]),
        ] {
            let mut sim = reference_4x4();
            sim.set_pointer(pointer);
            sim.step();
            assert!(
                sim.snapshot(Species::B).iter().all(|&b| b == 0.0),
                "{:?} forced the field",
                pointer
            );
        }
    }

    #[test]
    fn test_pointer_none_disables_forcing() {
        let mut sim = reference_4x4();
        sim.set_pointer(Pointer::at_cell(2.0, 2.0, 0.0));
        sim.set_pointer(Pointer::from_uv(-1.0, -1.0));
        sim.step();
        assert!(sim.snapshot(Species::B).iter().all(|&b| b == 0.0));
    }

    #[test]
    fn test_step_reads_only_pre_step_values() {
        // A single B spike: every neighbour's update must see the original
        // spike, regardless of sweep order.
        let seed = Seed::new(Pattern::Custom {
            values: vec![(4, 4, 0, 0.5, 1.0)],
        });
        let mut sim =
            GrayScott::from_seed(SimulationConfig::new_2d(9, 9, ReactionParams::default()), &seed)
                .unwrap();
        sim.step();

        let left = sim.read(3, 4, 0);
        let right = sim.read(5, 4, 0);
        let up = sim.read(4, 3, 0);
        let down = sim.read(4, 5, 0);
        assert_eq!(left, right);
        assert_eq!(up, down);
        assert_eq!(left, up);
        assert!((left.1 - 0.08).abs() < 1e-6);
    }

    #[test]
    fn test_matches_sequential_reference_sweep() {
        let seed = Seed::new(Pattern::Noise {
            amplitude: 0.5,
            seed: 11,
        });
        let config = SimulationConfig::new_2d(12, 7, ReactionParams::default());
        let mut sim = GrayScott::from_seed(config, &seed).unwrap();

        let grid = sim.grid();
        let stencil = Stencil::from_kind(StencilKind::FivePoint);
        let mut a = sim.snapshot(Species::A).to_vec();
        let mut b = sim.snapshot(Species::B).to_vec();
        let params = ReactionParams::default();

        for _ in 0..5 {
            let lap_a = stencil.apply(&a, grid);
            let lap_b = stencil.apply(&b, grid);
            let mut na = vec![0.0; a.len()];
            let mut nb = vec![0.0; b.len()];
            for i in 0..a.len() {
                (na[i], nb[i]) =
                    react(a[i], b[i], lap_a[i], lap_b[i], &params, params.feed, params.kill, 1.0);
            }
            a = na;
            b = nb;
            sim.step();
        }

        assert_eq!(sim.snapshot(Species::A), a.as_slice());
        assert_eq!(sim.snapshot(Species::B), b.as_slice());
    }

    #[test]
    fn test_determinism() {
        let seed = Seed::new(Pattern::Noise {
            amplitude: 0.3,
            seed: 5,
        });
        let config = SimulationConfig::new_3d(8, 6, 5, ReactionParams::default());
        let mut sims: Vec<GrayScott> = (0..2)
            .map(|_| GrayScott::from_seed(config.clone(), &seed).unwrap())
            .collect();

        for i in 0..20u32 {
            for sim in &mut sims {
                if i % 4 == 0 {
                    sim.set_pointer(Pointer::at_cell(i as f32 % 8.0, 3.0, 2.0));
                } else {
                    sim.set_pointer(Pointer::None);
                }
                sim.step();
            }
        }

        let first = sims[0].export().unwrap();
        let second = sims[1].export().unwrap();
        assert_eq!(first.len(), 240);
        assert_eq!(
            first.iter().map(|v| v.to_bits()).collect::<Vec<_>>(),
            second.iter().map(|v| v.to_bits()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_3d_uniform_field_stays_on_reaction_path() {
        let mut sim = GrayScott::from_seed(
            SimulationConfig::new_3d(4, 4, 4, ReactionParams::default()),
            &Seed::new(Pattern::Uniform { a: 0.5, b: 0.25 }),
        )
        .unwrap();
        sim.step();

        let params = ReactionParams::default();
        let (ea, eb) = react(0.5, 0.25, 0.0, 0.0, &params, params.feed, params.kill, 1.0);
        for (&a, &b) in sim.snapshot(Species::A).iter().zip(sim.snapshot(Species::B)) {
            assert!((a - ea).abs() < 1e-6);
            assert!((b - eb).abs() < 1e-6);
        }
    }

    #[test]
    fn test_3d_forcing_box() {
        let mut config = SimulationConfig::new_3d(12, 12, 12, ReactionParams::default());
        config.forcing.shape = ForcingShape::Box { half_width: 2.0 };
        let mut sim = GrayScott::new(config).unwrap();
        sim.set_pointer(Pointer::at_cell(6.0, 6.0, 6.0));
        sim.step();

        let forced = sim
            .snapshot(Species::B)
            .iter()
            .filter(|&&b| b == 0.9)
            .count();
        assert_eq!(forced, 27);
        assert_eq!(sim.read(6, 6, 8), (0.035, 0.0));
    }

    #[test]
    fn test_apply_forcing_writes_current_buffers() {
        let mut sim = reference_4x4();
        assert_eq!(sim.apply_forcing(), 0);

        let mut config = SimulationConfig::new_2d(8, 8, ReactionParams::default());
        config.forcing.shape = ForcingShape::Box { half_width: 1.5 };
        let mut sim = GrayScott::new(config).unwrap();
        sim.set_pointer(Pointer::at_cell(4.0, 4.0, 0.0));

        assert_eq!(sim.apply_forcing(), 9);
        assert_eq!(sim.read(3, 5, 0), (0.0, 0.9));
        assert_eq!(sim.read(2, 4, 0), (0.0, 0.0));
        assert_eq!(sim.steps(), 0);
    }

    #[test]
    fn test_clamp_option() {
        let params = ReactionParams::new(0.16, 0.08, 2.0, 0.0);
        let mut config = SimulationConfig::new_2d(4, 4, params);
        let mut unclamped = GrayScott::new(config.clone()).unwrap();
        unclamped.step();
        assert!(unclamped.snapshot(Species::A).iter().all(|&a| a == 2.0));

        config.clamp_concentrations = true;
        let mut clamped = GrayScott::new(config).unwrap();
        clamped.step();
        assert!(clamped.snapshot(Species::A).iter().all(|&a| a == 1.0));
    }

    #[test]
    fn test_forcing_applies_after_clamp() {
        let mut config = reference_4x4().config().clone();
        config.clamp_concentrations = true;
        config.forcing.seed_b = 1.5;
        let mut sim = GrayScott::new(config).unwrap();
        sim.set_pointer(Pointer::at_cell(0.0, 0.0, 0.0));
        sim.step();
        assert_eq!(sim.read(0, 0, 0).1, 1.5);
    }

    #[test]
    fn test_export_abs_sum_after_step() {
        let mut sim = reference_4x4();
        sim.step();
        let out = sim.export().unwrap();
        assert!(out.iter().all(|&v| v == 0.035));

        let mut short = vec![0.0; 3];
        assert!(matches!(
            sim.export_to(&mut short),
            Err(ExportError::BufferSize { .. })
        ));
    }

    #[test]
    fn test_runaway_parameters_detected_at_export() {
        let seed = Seed::new(Pattern::Uniform { a: 1.0, b: 1.0 });
        let params = ReactionParams::new(0.16, 0.08, 0.035, 0.06);
        let mut config = SimulationConfig::new_2d(4, 4, params);
        config.dt = 50.0;
        let mut sim = GrayScott::from_seed(config.clone(), &seed).unwrap();
        sim.run(10);

        assert!(FieldStats::from_sim(&sim).non_finite > 0);
        assert!(matches!(
            sim.export(),
            Err(ExportError::NonFiniteValue { index: 0, .. })
        ));
        let mut out = vec![0.5f32; 16];
        assert!(sim.export_to(&mut out).is_err());
        assert!(out.iter().all(|&v| v == 0.5));

        config.export.non_finite = NonFinitePolicy::Clamp;
        let mut sim = GrayScott::from_seed(config, &seed).unwrap();
        sim.run(10);
        let out = sim.export().unwrap();
        assert!(out.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_modulation_changes_rates() {
        let config = SimulationConfig::new_2d(2, 1, ReactionParams::default());
        let mut sim = GrayScott::new(config).unwrap();
        let grid = sim.grid();
        sim.set_modulation(Some(ModulationMap::from_values(vec![0.0, 1.0], grid).unwrap()))
            .unwrap();
        sim.step();

        let defaults = ModulationConfig::default();
        assert_eq!(sim.snapshot(Species::A), &[defaults.feed.0, defaults.feed.1]);

        sim.set_modulation(None).unwrap();
        sim.reset(&Seed::default());
        sim.step();
        assert_eq!(sim.snapshot(Species::A), &[0.035, 0.035]);
    }

    #[test]
    fn test_modulation_size_checked() {
        let mut sim = reference_4x4();
        let other = Grid::new(2, 2, 1).unwrap();
        let map = ModulationMap::from_values(vec![0.5; 4], other).unwrap();
        assert!(matches!(
            sim.set_modulation(Some(map)),
            Err(ConfigError::ModulationSize {
                expected: 16,
                actual: 4
            })
        ));
    }

    #[test]
    fn test_reset_restarts_clock() {
        let mut sim = reference_4x4();
        sim.run(3);
        sim.reset(&Seed::new(Pattern::Uniform { a: 1.0, b: 0.0 }));
        assert_eq!(sim.steps(), 0);
        assert_eq!(sim.time(), 0.0);
        assert!(sim.snapshot(Species::A).iter().all(|&a| a == 1.0));
    }

    #[test]
    fn test_stats() {
        let seed = Seed::new(Pattern::Custom {
            values: vec![(0, 0, 0, 1.0, 0.5)],
        });
        let sim =
            GrayScott::from_seed(SimulationConfig::new_2d(2, 2, ReactionParams::default()), &seed)
                .unwrap();
        let stats = FieldStats::from_sim(&sim);
        assert_eq!((stats.min_a, stats.max_a, stats.mean_a), (0.0, 1.0, 0.25));
        assert_eq!((stats.min_b, stats.max_b, stats.mean_b), (0.0, 0.5, 0.125));
        assert_eq!(stats.non_finite, 0);
    }
}
