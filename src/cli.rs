use std::fs;
use std::path::PathBuf;

use clap::Parser;
use ising_sim::SimConfig;

use crate::error::Result;

/// 2D Ising model on a periodic square lattice, sampled with single-spin-flip
/// Metropolis Monte Carlo.
#[derive(Parser, Debug, Default)]
#[command(name = "ising")]
#[command(about = "Metropolis Monte Carlo for the 2D Ising model")]
pub struct Args {
    /// TOML file with `SimConfig` fields; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Lattice side length N (the grid is N x N)
    #[arg(long, short = 'n')]
    pub side_length: Option<usize>,

    /// Temperature T (the coupling is J = T / 2)
    #[arg(long, short = 't')]
    pub temperature: Option<f64>,

    /// Number of single-flip Metropolis steps per run
    #[arg(long)]
    pub steps: Option<u64>,

    /// Steps excluded from the measured averages
    #[arg(long)]
    pub warmup: Option<u64>,

    /// Base random seed; run r uses seed + r
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of independent runs
    #[arg(long)]
    pub runs: Option<usize>,

    /// Maximum lag for the m² autocorrelation
    #[arg(long)]
    pub max_lag: Option<usize>,

    /// Record running averages at doubling checkpoints
    #[arg(long)]
    pub equilibration: bool,

    /// Run ensemble members one after another on this thread
    #[arg(long)]
    pub sequential: bool,

    /// Write the energy history here
    #[arg(long)]
    pub energy_out: Option<PathBuf>,

    /// Write the magnetization history here
    #[arg(long)]
    pub magnetization_out: Option<PathBuf>,

    /// Print the final grid of the first run
    #[arg(long)]
    pub show_grid: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl Args {
    /// Start from the config file (or defaults) and apply flag overrides.
    pub fn to_config(&self) -> Result<SimConfig> {
        let mut cfg = match &self.config {
            Some(path) => toml::from_str(&fs::read_to_string(path)?)?,
            None => SimConfig::default(),
        };
        if let Some(v) = self.side_length {
            cfg.side_length = v;
        }
        if let Some(v) = self.temperature {
            cfg.temperature = v;
        }
        if let Some(v) = self.steps {
            cfg.n_steps = v;
        }
        if let Some(v) = self.warmup {
            cfg.warmup_steps = v;
        }
        if let Some(v) = self.seed {
            cfg.seed = v;
        }
        if let Some(v) = self.runs {
            cfg.n_runs = v;
        }
        if self.max_lag.is_some() {
            cfg.autocorrelation_max_lag = self.max_lag;
        }
        cfg.equilibration_diagnostic |= self.equilibration;
        cfg.sequential |= self.sequential;
        cfg.check()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use ising_sim::SimError;

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::parse_from([
            "ising",
            "-n",
            "16",
            "--temperature",
            "1.5",
            "--steps",
            "500",
            "--warmup",
            "100",
            "--runs",
            "3",
            "--equilibration",
        ]);
        let cfg = args.to_config().unwrap();
        assert_eq!(cfg.side_length, 16);
        assert_eq!(cfg.temperature, 1.5);
        assert_eq!(cfg.n_steps, 500);
        assert_eq!(cfg.warmup_steps, 100);
        assert_eq!(cfg.n_runs, 3);
        assert_eq!(cfg.seed, SimConfig::default().seed);
        assert!(cfg.equilibration_diagnostic);
    }

    #[test]
    fn test_invalid_override_is_reported() {
        let args = Args::parse_from(["ising", "--temperature", "0"]);
        assert!(args.to_config().is_err());
    }

    #[test]
    fn test_oversized_side_is_reported() {
        let args = Args::parse_from(["ising", "-n", "4294967296"]);
        assert!(matches!(
            args.to_config(),
            Err(CliError::Sim(SimError::InvalidConfig(_)))
        ));
    }

    #[test]
    fn test_config_file_then_flags() {
        let path = std::env::temp_dir().join(format!("ising_cfg_{}.toml", std::process::id()));
        fs::write(
            &path,
            "side_length = 4\ntemperature = 3.0\nn_steps = 50\nwarmup_steps = 5\n",
        )
        .unwrap();
        let args = Args {
            config: Some(path.clone()),
            steps: Some(80),
            ..Default::default()
        };
        let cfg = args.to_config().unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(cfg.side_length, 4);
        assert_eq!(cfg.temperature, 3.0);
        assert_eq!(cfg.n_steps, 80);
        assert_eq!(cfg.warmup_steps, 5);
    }
}
