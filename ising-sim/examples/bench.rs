use std::time::Instant;

use ising_sim::{run_ensemble, SimConfig};

const L: usize = 64;
const N_RUNS: usize = 8;
const N_SWEEPS: u64 = 20;

fn main() {
    let n_spins = (L * L) as u64;
    let config = SimConfig {
        side_length: L,
        temperature: 2.0,
        n_steps: N_SWEEPS * n_spins,
        warmup_steps: 0,
        seed: 42,
        n_runs: N_RUNS,
        autocorrelation_max_lag: None,
        equilibration_diagnostic: false,
        sequential: false,
    };

    println!(
        "Lattice: {}x{}  |  Runs: {}  |  Steps/run: {}",
        L, L, N_RUNS, config.n_steps
    );
    println!("{}", "-".repeat(70));

    let t0 = Instant::now();
    let result = run_ensemble(&config, &|_: u64| {}).unwrap();
    let elapsed = t0.elapsed().as_secs_f64();

    let total_steps = config.n_steps * N_RUNS as u64;
    println!(
        "Total: {:.3} s  |  {:.1} ns/step  |  acceptance {:.4}",
        elapsed,
        elapsed / total_steps as f64 * 1e9,
        result.acceptance_rate
    );
}
