use crate::geometry::{SquareLattice, N_DIMS};

/// Total energy of a spin configuration by a full bond sum.
///
/// Each cell contributes its right and down bonds (with wraparound), so every
/// bond of the torus is counted exactly once:
///   E = sum_i sum_d -coupling * spin[i] * spin[neighbor_fwd(i, d)]
///
/// `spins`: flat row-major slice of length `lattice.n_spins`, values +1/-1.
pub fn bond_energy(lattice: &SquareLattice, spins: &[i8], coupling: f64) -> f64 {
    let mut total = 0.0f64;
    #[allow(clippy::needless_range_loop)]
    for i in 0..lattice.n_spins {
        let si = spins[i] as f64;
        for d in 0..N_DIMS {
            let j = lattice.neighbor(i, d, true);
            total += -coupling * si * spins[j] as f64;
        }
    }
    total
}

/// Sum of all spin values.
pub fn magnetization(spins: &[i8]) -> i64 {
    spins.iter().map(|&s| s as i64).sum()
}
