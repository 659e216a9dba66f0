pub mod lattice;

pub use lattice::{site_count, SquareLattice, MAX_SPINS, N_DIMS};
