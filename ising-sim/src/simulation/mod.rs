use crate::config::SimConfig;
use crate::error::Result;
use crate::mcmc::MetropolisEngine;
use crate::spins::LatticeState;
use crate::statistics::{
    sokal_tau, AutocorrAccum, EnsembleResult, EquilDiagnosticAccum, Observables, RunResult,
    Statistics,
};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use rayon::prelude::*;

/// Run one seeded simulation: build a random lattice, take `n_steps`
/// Metropolis steps, and measure every step after `warmup_steps`.
///
/// The lattice is drawn from the same generator the engine then consumes, so
/// `(config, seed)` fully determines the run.
///
/// `on_progress(k)` is called after every `N²` steps (one sweep's worth) and
/// once more for any remainder, with `k` the number of steps just completed.
pub fn run_simulation(
    config: &SimConfig,
    seed: u64,
    on_progress: &(dyn Fn(u64) + Sync),
) -> Result<RunResult> {
    config.check()?;

    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
    let state = LatticeState::new(config.side_length, config.temperature, &mut rng)?;
    let n_spins = state.n_spins();
    let mut engine = MetropolisEngine::new(state, rng);

    let n = n_spins as f64;
    let n_measured = config.n_steps - config.warmup_steps;
    let mut abs_mag_stat = Statistics::new(1);
    let mut mag2_stat = Statistics::new(2);
    let mut mag4_stat = Statistics::new(4);
    let mut energy_stat = Statistics::new(1);
    let mut energy2_stat = Statistics::new(2);
    let mut m2_accum = config.autocorrelation_max_lag.map(AutocorrAccum::new);
    let mut equil_accum = config
        .equilibration_diagnostic
        .then(|| EquilDiagnosticAccum::new(n_measured));

    tracing::debug!(seed, n_steps = config.n_steps, "run started");

    let block = n_spins as u64;
    let mut pending = 0u64;
    for step_id in 0..config.n_steps {
        engine.step();

        pending += 1;
        if pending == block {
            on_progress(pending);
            pending = 0;
        }

        if step_id < config.warmup_steps {
            continue;
        }

        let e = engine.total_energy() / n;
        let m = engine.total_magnetization() as f64 / n;
        abs_mag_stat.update(m.abs());
        mag2_stat.update(m);
        mag4_stat.update(m);
        energy_stat.update(e);
        energy2_stat.update(e);

        if let Some(ref mut acc) = m2_accum {
            acc.push(m * m);
        }
        if let Some(ref mut acc) = equil_accum {
            acc.push(e, m.abs());
        }
    }
    if pending > 0 {
        on_progress(pending);
    }

    let observables = Observables::from_moments(
        abs_mag_stat.average(),
        mag2_stat.average(),
        mag4_stat.average(),
        energy_stat.average(),
        energy2_stat.average(),
        n_spins,
        config.temperature,
    );

    let mag2_autocorrelation = m2_accum.map(|acc| acc.finish()).unwrap_or_default();
    let mag2_tau = (!mag2_autocorrelation.is_empty()).then(|| sokal_tau(&mag2_autocorrelation));
    let equil_checkpoints = equil_accum.map(|acc| acc.finish()).unwrap_or_default();

    let acceptance_rate = engine.acceptance_rate();
    tracing::debug!(seed, acceptance_rate, "run finished");

    let final_grid = engine.grid();
    let final_energy = engine.total_energy();
    let final_magnetization = engine.total_magnetization();
    let (energy_history, magnetization_history) = engine.into_histories();

    Ok(RunResult {
        seed,
        final_grid,
        final_energy,
        final_magnetization,
        energy_history,
        magnetization_history,
        acceptance_rate,
        observables,
        mag2_autocorrelation,
        mag2_tau,
        equil_checkpoints,
    })
}

/// Run `n_runs` independent simulations of one configuration.
///
/// Run `r` is seeded with `seed + r` and owns its own lattice, engine and
/// generator, so runs share nothing. They are spread over the rayon pool
/// unless `sequential` is set or there is only one; for a single run the
/// call is made directly, skipping thread-pool overhead.
pub fn run_ensemble(
    config: &SimConfig,
    on_progress: &(dyn Fn(u64) + Sync),
) -> Result<EnsembleResult> {
    config.check()?;

    tracing::info!(
        n_runs = config.n_runs,
        side_length = config.side_length,
        temperature = config.temperature,
        n_steps = config.n_steps,
        "ensemble started"
    );

    let seeds: Vec<u64> = (0..config.n_runs as u64)
        .map(|r| config.seed.wrapping_add(r))
        .collect();

    let results: Vec<Result<RunResult>> = if config.sequential || seeds.len() == 1 {
        seeds
            .iter()
            .map(|&seed| run_simulation(config, seed, on_progress))
            .collect()
    } else {
        seeds
            .par_iter()
            .map(|&seed| run_simulation(config, seed, on_progress))
            .collect()
    };

    let runs: Vec<RunResult> = results.into_iter().collect::<Result<Vec<_>>>()?;
    let ensemble = EnsembleResult::aggregate(runs);

    tracing::info!(
        acceptance_rate = ensemble.acceptance_rate,
        abs_mag = ensemble.observables.abs_mag,
        energy = ensemble.observables.energy,
        "ensemble finished"
    );
    Ok(ensemble)
}
