use crate::error::{Result, SimError};
use crate::geometry::{site_count, SquareLattice};
use crate::spins::energy;
use rand::Rng;

/// Spin grid of one Ising system together with its temperature and coupling.
///
/// Spins are stored in a flat row-major `Vec<i8>` of length `side * side`;
/// every entry is always +1 or -1.
#[derive(Debug, Clone)]
pub struct LatticeState {
    lattice: SquareLattice,
    spins: Vec<i8>,
    temperature: f64,
    coupling: f64,
}

/// Check the parameters and return the site count `side_length^2`.
fn validate(side_length: usize, temperature: f64) -> Result<usize> {
    let n_spins = match site_count(side_length) {
        Some(n) if n > 0 => n,
        _ => return Err(SimError::InvalidLatticeSize(side_length)),
    };
    if !(temperature.is_finite() && temperature > 0.0) {
        return Err(SimError::InvalidTemperature(temperature));
    }
    Ok(n_spins)
}

impl LatticeState {
    /// Initialize an `side_length x side_length` grid with independent random
    /// ±1 spins, each with probability 1/2.
    pub fn new<R: Rng + ?Sized>(side_length: usize, temperature: f64, rng: &mut R) -> Result<Self> {
        let n_spins = validate(side_length, temperature)?;
        let spins: Vec<i8> = (0..n_spins)
            .map(|_| if rng.gen::<f32>() < 0.5 { -1 } else { 1 })
            .collect();
        Ok(Self::build(side_length, temperature, spins))
    }

    /// Rebuild a state from stored spin values (flat, row-major).
    pub fn from_spins(side_length: usize, temperature: f64, spins: Vec<i8>) -> Result<Self> {
        let expected = validate(side_length, temperature)?;
        if spins.len() != expected {
            return Err(SimError::SpinCountMismatch {
                expected,
                found: spins.len(),
            });
        }
        if let Some((index, &value)) = spins.iter().enumerate().find(|&(_, &s)| s != 1 && s != -1) {
            return Err(SimError::InvalidSpin { index, value });
        }
        Ok(Self::build(side_length, temperature, spins))
    }

    /// Rebuild a state from a row-major 2D snapshot such as [`Self::grid`].
    pub fn from_grid(temperature: f64, grid: &[Vec<i8>]) -> Result<Self> {
        let side_length = grid.len();
        let expected = validate(side_length, temperature)?;
        let mut spins = Vec::with_capacity(expected);
        for row in grid {
            if row.len() != side_length {
                return Err(SimError::SpinCountMismatch {
                    expected,
                    found: grid.iter().map(Vec::len).sum(),
                });
            }
            spins.extend_from_slice(row);
        }
        Self::from_spins(side_length, temperature, spins)
    }

    fn build(side_length: usize, temperature: f64, spins: Vec<i8>) -> Self {
        let state = Self {
            lattice: SquareLattice::new(side_length),
            spins,
            temperature,
            coupling: temperature / 2.0,
        };
        tracing::debug!(
            side_length,
            temperature,
            coupling = state.coupling,
            "lattice initialized"
        );
        state
    }

    pub fn side_length(&self) -> usize {
        self.lattice.side
    }

    pub fn n_spins(&self) -> usize {
        self.lattice.n_spins
    }

    pub fn lattice(&self) -> &SquareLattice {
        &self.lattice
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Coupling constant `J`, fixed at `temperature / 2` for the life of the
    /// state. Interaction strength therefore scales with temperature and the
    /// Boltzmann factor `exp(-dE / T)` does not depend on `T` for a given
    /// configuration change.
    pub fn coupling(&self) -> f64 {
        self.coupling
    }

    /// Read-only flat view of the spins.
    pub fn spins(&self) -> &[i8] {
        &self.spins
    }

    /// Owned row-major snapshot of the grid.
    pub fn grid(&self) -> Vec<Vec<i8>> {
        self.spins
            .chunks(self.lattice.side)
            .map(<[i8]>::to_vec)
            .collect()
    }

    /// Sum of the four bond terms `-J * s(i,j) * s(neighbor)` for the right,
    /// left, down and up neighbors of cell `(row, col)`.
    pub fn neighbor_bond_energy(&self, row: usize, col: usize) -> f64 {
        self.site_bond_energy(self.lattice.flat_index(row, col))
    }

    #[inline]
    pub(crate) fn site_bond_energy(&self, i: usize) -> f64 {
        let si = self.spins[i] as f64;
        self.lattice
            .four_neighbors(i)
            .iter()
            .map(|&j| -self.coupling * si * self.spins[j] as f64)
            .sum()
    }

    /// Total energy as the sum of per-cell bond energies halved: every bond is
    /// seen once from each endpoint.
    pub fn initial_total_energy(&self) -> f64 {
        (0..self.lattice.n_spins)
            .map(|i| self.site_bond_energy(i) / 2.0)
            .sum()
    }

    /// Sum of all spins, recounted on every call.
    pub fn total_magnetization(&self) -> i64 {
        energy::magnetization(&self.spins)
    }

    #[inline]
    pub(crate) fn flip(&mut self, i: usize) {
        self.spins[i] = -self.spins[i];
    }
}
