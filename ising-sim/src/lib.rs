//! Metropolis Monte Carlo for the 2D Ising model on a periodic square lattice.
//!
//! [`LatticeState`] holds the spin grid, temperature and coupling;
//! [`MetropolisEngine`] owns one lattice and advances it one proposed spin
//! flip per [`MetropolisEngine::step`], tracking total energy, total
//! magnetization and their histories. [`run_simulation`] and
//! [`run_ensemble`] drive engines from a validated [`SimConfig`].

pub mod config;
pub mod error;
pub mod geometry;
pub mod mcmc;
pub mod simulation;
pub mod spins;
pub mod statistics;

pub use config::SimConfig;
pub use error::{Result, SimError};
pub use geometry::SquareLattice;
pub use mcmc::{metropolis_accept, MetropolisEngine, StepOutcome, StepRng};
pub use simulation::{run_ensemble, run_simulation};
pub use spins::LatticeState;
pub use statistics::{EnsembleResult, EquilCheckpoint, Observables, RunResult};
