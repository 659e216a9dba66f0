/// Periodic square lattice with a precomputed neighbor table.
///
/// Sites are indexed in row-major order: cell `(row, col)` lives at flat index
/// `row * side + col`. Dimension `0` runs along rows (down/up) and dimension
/// `1` along columns (right/left). Both axes wrap independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquareLattice {
    /// Side length `N`.
    pub side: usize,
    /// Total number of sites (`side * side`).
    pub n_spins: usize,
    /// Precomputed neighbor table, length `n_spins * 2 * 2`.
    /// Layout: `neighbors[(i * 2 + d) * 2 + dir]` where `dir = 0` is forward
    /// (down for `d = 0`, right for `d = 1`) and `dir = 1` is backward.
    neighbors: Vec<u32>,
}

/// Number of lattice axes.
pub const N_DIMS: usize = 2;

/// Largest site count the `u32` neighbor table can address.
pub const MAX_SPINS: u64 = u32::MAX as u64 + 1;

/// `side * side`, or `None` if it overflows or exceeds [`MAX_SPINS`].
pub fn site_count(side: usize) -> Option<usize> {
    side.checked_mul(side).filter(|&n| n as u64 <= MAX_SPINS)
}

impl SquareLattice {
    /// Build the neighbor table for an `side x side` torus.
    ///
    /// A zero side length yields an empty lattice. Callers check `side`
    /// against [`site_count`] first.
    pub(crate) fn new(side: usize) -> Self {
        let n_spins = side * side;
        let strides = [side, 1];
        let mut neighbors = vec![0u32; n_spins * N_DIMS * 2];

        for i in 0..n_spins {
            let coords = [i / side, i % side];
            for d in 0..N_DIMS {
                for (dir, sign) in [(0, 1isize), (1, -1isize)] {
                    let mut flat = 0usize;
                    for (dim, &c) in coords.iter().enumerate() {
                        let shift = if dim == d { sign } else { 0 };
                        let wrapped = (c as isize + shift).rem_euclid(side as isize) as usize;
                        flat += wrapped * strides[dim];
                    }
                    neighbors[(i * N_DIMS + d) * 2 + dir] = flat as u32;
                }
            }
        }

        Self {
            side,
            n_spins,
            neighbors,
        }
    }

    /// Return the neighbor of site `flat_idx` along axis `dim`.
    /// `forward = true` means +1, `forward = false` means -1.
    #[inline]
    pub fn neighbor(&self, flat_idx: usize, dim: usize, forward: bool) -> usize {
        self.neighbors[(flat_idx * N_DIMS + dim) * 2 + (!forward as usize)] as usize
    }

    /// The four neighbors of `flat_idx` in the order right, left, down, up.
    #[inline]
    pub fn four_neighbors(&self, flat_idx: usize) -> [usize; 4] {
        [
            self.neighbor(flat_idx, 1, true),
            self.neighbor(flat_idx, 1, false),
            self.neighbor(flat_idx, 0, true),
            self.neighbor(flat_idx, 0, false),
        ]
    }

    #[inline]
    pub fn flat_index(&self, row: usize, col: usize) -> usize {
        row * self.side + col
    }
}
