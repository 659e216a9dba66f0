use crate::geometry::site_count;
use serde::Deserialize;
use validator::{Validate, ValidationError};

fn validate_sim_config(cfg: &SimConfig) -> Result<(), ValidationError> {
    if cfg.side_length < 1 {
        return Err(ValidationError::new("side_length must be >= 1"));
    }
    if site_count(cfg.side_length).is_none() {
        return Err(ValidationError::new("side_length must be <= 65536"));
    }
    if !(cfg.temperature.is_finite() && cfg.temperature > 0.0) {
        return Err(ValidationError::new("temperature must be finite and > 0"));
    }
    if cfg.n_steps < 1 {
        return Err(ValidationError::new("n_steps must be >= 1"));
    }
    if cfg.warmup_steps > cfg.n_steps {
        return Err(ValidationError::new("warmup_steps must be <= n_steps"));
    }
    if cfg.n_runs < 1 {
        return Err(ValidationError::new("n_runs must be >= 1"));
    }
    if cfg.autocorrelation_max_lag == Some(0) {
        return Err(ValidationError::new("autocorrelation_max_lag must be >= 1"));
    }
    Ok(())
}

/// Parameters of one simulation run (or an ensemble of identical runs).
///
/// Step counts are in single-flip proposals, not sweeps.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
#[validate(schema(function = "validate_sim_config"))]
pub struct SimConfig {
    pub side_length: usize,
    pub temperature: f64,
    pub n_steps: u64,
    /// Leading steps excluded from the measured observables. Histories
    /// still record them.
    pub warmup_steps: u64,
    pub seed: u64,
    pub n_runs: usize,
    pub autocorrelation_max_lag: Option<usize>,
    pub equilibration_diagnostic: bool,
    /// Run ensemble members on the calling thread instead of the rayon pool.
    pub sequential: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            side_length: 8,
            temperature: 2.0,
            n_steps: 100_000,
            warmup_steps: 10_000,
            seed: 42,
            n_runs: 1,
            autocorrelation_max_lag: None,
            equilibration_diagnostic: false,
            sequential: false,
        }
    }
}

impl SimConfig {
    /// Validate and map failures to [`crate::SimError::InvalidConfig`].
    pub fn check(&self) -> crate::Result<()> {
        self.validate()
            .map_err(|e| crate::SimError::InvalidConfig(format!("{e}")))
    }
}
