pub mod metropolis;
pub mod rng;

pub use metropolis::{metropolis_accept, MetropolisEngine, StepOutcome};
pub use rng::StepRng;
