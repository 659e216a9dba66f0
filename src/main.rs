//! Command-line driver: runs the configured simulations, prints a summary,
//! and optionally dumps histories and the final grid.

mod cli;
mod error;
mod output;
mod render;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use ising_sim::{run_ensemble, EnsembleResult};

use cli::Args;
use error::Result;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let config = args.to_config()?;

    let pb = if args.no_progress {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(config.n_steps * config.n_runs as u64)
    };
    pb.set_style(
        ProgressStyle::with_template(
            "{msg} [{bar:40}] {pos}/{len} [{elapsed_precise} < {eta_precise}, {per_sec}]",
        )
        .unwrap()
        .progress_chars("=> "),
    );
    pb.set_message("steps");

    let ensemble = run_ensemble(&config, &|k: u64| pb.inc(k))?;
    pb.finish();

    print_summary(&ensemble, config.side_length, config.temperature);

    if let Some(path) = &args.energy_out {
        for (r, run) in ensemble.runs.iter().enumerate() {
            output::write_history(
                &output::run_path(path, r, config.n_runs),
                &run.energy_history,
            )?;
        }
    }
    if let Some(path) = &args.magnetization_out {
        for (r, run) in ensemble.runs.iter().enumerate() {
            output::write_history(
                &output::run_path(path, r, config.n_runs),
                &run.magnetization_history,
            )?;
        }
    }

    if args.show_grid {
        if let Some(run) = ensemble.runs.first() {
            print!("{}", render::render_grid(&run.final_grid));
        }
    }

    Ok(())
}

fn print_summary(ensemble: &EnsembleResult, side_length: usize, temperature: f64) {
    let o = &ensemble.observables;
    println!(
        "Lattice: {}x{}  |  T = {}  |  J = {}  |  Runs: {}",
        side_length,
        side_length,
        temperature,
        temperature / 2.0,
        ensemble.runs.len()
    );
    println!("{}", "-".repeat(60));
    println!("acceptance rate   {:>12.6}", ensemble.acceptance_rate);
    println!("<e>               {:>12.6}", o.energy);
    println!("<e^2>             {:>12.6}", o.energy2);
    println!("<|m|>             {:>12.6}", o.abs_mag);
    println!("<m^2>             {:>12.6}", o.mag2);
    println!("<m^4>             {:>12.6}", o.mag4);
    println!("specific heat     {:>12.6}", o.specific_heat);
    println!("susceptibility    {:>12.6}", o.susceptibility);
    println!("Binder cumulant   {:>12.6}", o.binder);

    for run in &ensemble.runs {
        if let Some(tau) = run.mag2_tau {
            println!("run seed {:>6}: tau(m^2) = {:.2} steps", run.seed, tau);
        }
        for c in &run.equil_checkpoints {
            println!(
                "run seed {:>6}: after {:>9} steps  <e> = {:>10.6}  <|m|> = {:.6}",
                run.seed, c.step, c.energy_avg, c.abs_mag_avg
            );
        }
    }
}
