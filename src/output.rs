use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Space-separated decimal text, one trailing space per value.
pub fn format_history(values: &[f64]) -> String {
    let mut out = String::with_capacity(values.len() * 8);
    for v in values {
        out.push_str(&v.to_string());
        out.push(' ');
    }
    out
}

/// Write one history sequence to `path`, replacing any existing file.
pub fn write_history(path: &Path, values: &[f64]) -> Result<()> {
    fs::write(path, format_history(values))?;
    tracing::debug!(path = %path.display(), n_values = values.len(), "history written");
    Ok(())
}

/// Path for run `run` of an ensemble: `energy.txt` becomes `energy_run3.txt`.
/// Single-run ensembles keep the path unchanged.
pub fn run_path(path: &Path, run: usize, n_runs: usize) -> PathBuf {
    if n_runs <= 1 {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}_run{run}.{}", ext.to_string_lossy()),
        None => format!("{stem}_run{run}"),
    };
    path.with_file_name(name)
}
