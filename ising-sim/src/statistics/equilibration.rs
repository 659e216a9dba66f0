/// Running averages of the measured observables at one checkpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct EquilCheckpoint {
    /// Number of measured steps averaged so far.
    pub step: u64,
    pub energy_avg: f64,
    pub abs_mag_avg: f64,
}

/// Records running averages at doubling step counts (128, 256, …) and at the
/// final measured step, to check that the averages have settled.
pub struct EquilDiagnosticAccum {
    checkpoints: Vec<u64>,
    next_ckpt_idx: usize,
    count: u64,
    sum_energy: f64,
    sum_abs_mag: f64,
    snapshots: Vec<EquilCheckpoint>,
}

impl EquilDiagnosticAccum {
    pub fn new(n_measured: u64) -> Self {
        let mut checkpoints = Vec::new();
        let mut p = 128u64;
        while p < n_measured {
            checkpoints.push(p);
            p *= 2;
        }
        if checkpoints.last() != Some(&n_measured) {
            checkpoints.push(n_measured);
        }

        Self {
            checkpoints,
            next_ckpt_idx: 0,
            count: 0,
            sum_energy: 0.0,
            sum_abs_mag: 0.0,
            snapshots: Vec::new(),
        }
    }

    pub fn push(&mut self, energy: f64, abs_mag: f64) {
        self.count += 1;
        self.sum_energy += energy;
        self.sum_abs_mag += abs_mag;

        if self.next_ckpt_idx < self.checkpoints.len()
            && self.count == self.checkpoints[self.next_ckpt_idx]
        {
            let c = self.count as f64;
            self.snapshots.push(EquilCheckpoint {
                step: self.count,
                energy_avg: self.sum_energy / c,
                abs_mag_avg: self.sum_abs_mag / c,
            });
            self.next_ckpt_idx += 1;
        }
    }

    pub fn finish(self) -> Vec<EquilCheckpoint> {
        self.snapshots
    }
}
