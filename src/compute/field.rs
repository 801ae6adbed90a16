//! Double-buffered concentration storage.
//!
//! Both species live in two flat buffers each, indexed
//! `z * height * width + y * width + x`. A single parity bit selects which
//! buffer is current; A and B always swap together.

use super::Grid;
use crate::schema::Seed;

/// One of the two reacting species.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Species {
    A,
    B,
}

/// Read-only view of the current buffers.
#[derive(Debug, Clone, Copy)]
pub struct FieldView<'a> {
    pub a: &'a [f32],
    pub b: &'a [f32],
    pub grid: Grid,
}

impl FieldView<'_> {
    /// Concentration pair at a wrapped coordinate.
    #[inline]
    pub fn read(&self, x: isize, y: isize, z: isize) -> (f32, f32) {
        let idx = self.grid.wrapped_idx(x, y, z);
        (self.a[idx], self.b[idx])
    }
}

/// Concentration fields for A and B, each with a current and a next buffer.
#[derive(Debug, Clone)]
pub struct FieldStore {
    grid: Grid,
    a: [Vec<f32>; 2],
    b: [Vec<f32>; 2],
    current: usize,
}

impl FieldStore {
    /// Allocate zeroed buffers for `grid`.
    pub fn new(grid: Grid) -> Self {
        let size = grid.cell_count();
        Self {
            grid,
            a: [vec![0.0; size], vec![0.0; size]],
            b: [vec![0.0; size], vec![0.0; size]],
            current: 0,
        }
    }

    /// Allocate and seed the current buffers.
    pub fn from_seed(grid: Grid, seed: &Seed) -> Self {
        let mut store = Self::new(grid);
        store.reseed(seed);
        store
    }

    /// Overwrite the current buffers from a seed. The next buffers are left alone.
    pub fn reseed(&mut self, seed: &Seed) {
        let cur = self.current;
        seed.generate_into(
            self.grid.width(),
            self.grid.height(),
            self.grid.depth(),
            &mut self.a[cur],
            &mut self.b[cur],
        );
    }

    #[inline]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Index (0 or 1) of the current buffer pair.
    #[inline]
    pub fn parity(&self) -> usize {
        self.current
    }

    /// Concentration pair from the current buffers at a wrapped coordinate.
    #[inline]
    pub fn read(&self, x: isize, y: isize, z: isize) -> (f32, f32) {
        self.view().read(x, y, z)
    }

    /// Write a pair into the next buffers at a wrapped coordinate.
    #[inline]
    pub fn write(&mut self, x: isize, y: isize, z: isize, (a, b): (f32, f32)) {
        let idx = self.grid.wrapped_idx(x, y, z);
        let next = 1 - self.current;
        self.a[next][idx] = a;
        self.b[next][idx] = b;
    }

    /// Overwrite a pair in the current buffers. Used for seeding and forcing
    /// outside of a step.
    #[inline]
    pub fn set_current(&mut self, idx: usize, (a, b): (f32, f32)) {
        let cur = self.current;
        self.a[cur][idx] = a;
        self.b[cur][idx] = b;
    }

    /// Exchange the roles of current and next for both species.
    #[inline]
    pub fn swap(&mut self) {
        self.current = 1 - self.current;
    }

    /// Read-only view of the current buffers.
    #[inline]
    pub fn view(&self) -> FieldView<'_> {
        FieldView {
            a: &self.a[self.current],
            b: &self.b[self.current],
            grid: self.grid,
        }
    }

    /// Current buffer of one species.
    #[inline]
    pub fn snapshot(&self, species: Species) -> &[f32] {
        match species {
            Species::A => &self.a[self.current],
            Species::B => &self.b[self.current],
        }
    }

    /// Borrow the current buffers for reading and the next buffers for
    /// writing at the same time.
    pub fn split(&mut self) -> (FieldView<'_>, &mut [f32], &mut [f32]) {
        let (a_cur, a_next) = split_pair(&mut self.a, self.current);
        let (b_cur, b_next) = split_pair(&mut self.b, self.current);
        let view = FieldView {
            a: a_cur,
            b: b_cur,
            grid: self.grid,
        };
        (view, a_next, b_next)
    }
}

fn split_pair(pair: &mut [Vec<f32>; 2], current: usize) -> (&[f32], &mut [f32]) {
    let [first, second] = pair;
    if current == 0 {
        (first.as_slice(), second.as_mut_slice())
    } else {
        (second.as_slice(), first.as_mut_slice())
    }
}
