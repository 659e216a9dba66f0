use super::equilibration::EquilCheckpoint;

/// Per-spin observables averaged over the measured steps of one run.
///
/// With `e = E / N²` and `m = M / N²` sampled once per measured step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observables {
    /// ⟨|m|⟩.
    pub abs_mag: f64,
    /// ⟨m²⟩.
    pub mag2: f64,
    /// ⟨m⁴⟩.
    pub mag4: f64,
    /// ⟨e⟩.
    pub energy: f64,
    /// ⟨e²⟩.
    pub energy2: f64,
    /// c = N² (⟨e²⟩ − ⟨e⟩²) / T².
    pub specific_heat: f64,
    /// χ = N² (⟨m²⟩ − ⟨|m|⟩²) / T.
    pub susceptibility: f64,
    /// U = 1 − ⟨m⁴⟩ / (3 ⟨m²⟩²), zero when ⟨m²⟩ vanishes.
    pub binder: f64,
}

impl Observables {
    /// Fill in the derived quantities from the raw moments.
    pub fn from_moments(
        abs_mag: f64,
        mag2: f64,
        mag4: f64,
        energy: f64,
        energy2: f64,
        n_spins: usize,
        temperature: f64,
    ) -> Self {
        let n = n_spins as f64;
        let binder = if mag2 > 0.0 {
            1.0 - mag4 / (3.0 * mag2 * mag2)
        } else {
            0.0
        };
        Self {
            abs_mag,
            mag2,
            mag4,
            energy,
            energy2,
            specific_heat: n * (energy2 - energy * energy) / (temperature * temperature),
            susceptibility: n * (mag2 - abs_mag * abs_mag) / temperature,
            binder,
        }
    }

    /// Arithmetic mean over independent runs.
    pub fn aggregate(items: &[Self]) -> Self {
        if items.is_empty() {
            return Self::default();
        }
        let n = items.len() as f64;
        let mut agg = Self::default();
        for o in items {
            agg.abs_mag += o.abs_mag;
            agg.mag2 += o.mag2;
            agg.mag4 += o.mag4;
            agg.energy += o.energy;
            agg.energy2 += o.energy2;
            agg.specific_heat += o.specific_heat;
            agg.susceptibility += o.susceptibility;
            agg.binder += o.binder;
        }
        for v in [
            &mut agg.abs_mag,
            &mut agg.mag2,
            &mut agg.mag4,
            &mut agg.energy,
            &mut agg.energy2,
            &mut agg.specific_heat,
            &mut agg.susceptibility,
            &mut agg.binder,
        ] {
            *v /= n;
        }
        agg
    }
}

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub seed: u64,
    /// Grid after the last step, row-major.
    pub final_grid: Vec<Vec<i8>>,
    pub final_energy: f64,
    pub final_magnetization: i64,
    /// `n_steps + 1` samples, starting with the initial energy.
    pub energy_history: Vec<f64>,
    /// `n_steps + 1` samples, starting with the initial magnetization.
    pub magnetization_history: Vec<f64>,
    pub acceptance_rate: f64,
    pub observables: Observables,
    /// Normalized autocorrelation Γ(δ) of m², length max_lag+1.
    /// Empty if autocorrelation_max_lag is None.
    pub mag2_autocorrelation: Vec<f64>,
    /// Integrated autocorrelation time of m², in steps.
    pub mag2_tau: Option<f64>,
    /// Empty unless equilibration_diagnostic is set.
    pub equil_checkpoints: Vec<EquilCheckpoint>,
}

/// Independent runs of one configuration and their averaged observables.
#[derive(Debug, Clone)]
pub struct EnsembleResult {
    pub runs: Vec<RunResult>,
    pub observables: Observables,
    pub acceptance_rate: f64,
}

impl EnsembleResult {
    pub fn aggregate(runs: Vec<RunResult>) -> Self {
        let obs: Vec<Observables> = runs.iter().map(|r| r.observables.clone()).collect();
        let acceptance_rate = if runs.is_empty() {
            0.0
        } else {
            runs.iter().map(|r| r.acceptance_rate).sum::<f64>() / runs.len() as f64
        };
        Self {
            observables: Observables::aggregate(&obs),
            acceptance_rate,
            runs,
        }
    }
}
