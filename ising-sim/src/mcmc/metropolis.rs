use crate::mcmc::rng::StepRng;
use crate::spins::LatticeState;
use rand_xoshiro::Xoshiro256StarStar;

/// Result of one proposed single-spin flip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    Accepted { delta_e: f64 },
    Rejected { delta_e: f64 },
}

impl StepOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    pub fn delta_e(&self) -> f64 {
        match *self {
            Self::Accepted { delta_e } | Self::Rejected { delta_e } => delta_e,
        }
    }
}

/// Metropolis acceptance rule.
///
/// Energy-lowering proposals are always accepted and consume no draw.
/// Otherwise one uniform `u` is drawn and the proposal is accepted iff
/// `u < exp(-delta_e / temperature)`.
#[inline]
pub fn metropolis_accept<R: StepRng + ?Sized>(delta_e: f64, temperature: f64, rng: &mut R) -> bool {
    if delta_e < 0.0 {
        return true;
    }
    rng.uniform() < (-delta_e / temperature).exp()
}

/// Single-spin-flip Metropolis sampler for one [`LatticeState`].
///
/// Keeps a running total energy that is updated incrementally from local bond
/// energies, a total magnetization recounted after every accepted flip, and
/// one history sample of each per step (plus the initial values).
pub struct MetropolisEngine<R: StepRng = Xoshiro256StarStar> {
    state: LatticeState,
    rng: R,
    total_energy: f64,
    total_magnetization: i64,
    energy_history: Vec<f64>,
    magnetization_history: Vec<f64>,
    n_steps: u64,
    n_accepted: u64,
}

impl<R: StepRng> MetropolisEngine<R> {
    /// Wrap a lattice, computing its starting energy and magnetization and
    /// seeding both histories with them.
    pub fn new(state: LatticeState, rng: R) -> Self {
        let total_energy = state.initial_total_energy();
        let total_magnetization = state.total_magnetization();
        tracing::debug!(
            side_length = state.side_length(),
            temperature = state.temperature(),
            total_energy,
            total_magnetization,
            "metropolis engine ready"
        );
        Self {
            state,
            rng,
            total_energy,
            total_magnetization,
            energy_history: vec![total_energy],
            magnetization_history: vec![total_magnetization as f64],
            n_steps: 0,
            n_accepted: 0,
        }
    }

    /// Propose flipping one uniformly chosen spin and accept or reject it.
    ///
    /// Both histories grow by exactly one sample whatever the outcome.
    pub fn step(&mut self) -> StepOutcome {
        let i = self.rng.pick_site(self.state.n_spins());

        let energy_without_site = self.total_energy - self.state.site_bond_energy(i);
        self.state.flip(i);
        let proposed_energy = energy_without_site + self.state.site_bond_energy(i);
        let delta_e = proposed_energy - self.total_energy;

        self.n_steps += 1;
        let outcome = if metropolis_accept(delta_e, self.state.temperature(), &mut self.rng) {
            self.total_energy = proposed_energy;
            self.total_magnetization = self.state.total_magnetization();
            self.n_accepted += 1;
            StepOutcome::Accepted { delta_e }
        } else {
            self.state.flip(i);
            StepOutcome::Rejected { delta_e }
        };

        self.energy_history.push(self.total_energy);
        self.magnetization_history
            .push(self.total_magnetization as f64);
        outcome
    }

    /// Run `n` consecutive steps.
    pub fn run(&mut self, n: u64) {
        for _ in 0..n {
            self.step();
        }
    }

    pub fn lattice(&self) -> &LatticeState {
        &self.state
    }

    /// Owned snapshot of the current grid.
    pub fn grid(&self) -> Vec<Vec<i8>> {
        self.state.grid()
    }

    pub fn total_energy(&self) -> f64 {
        self.total_energy
    }

    pub fn total_magnetization(&self) -> i64 {
        self.total_magnetization
    }

    pub fn energy_history(&self) -> &[f64] {
        &self.energy_history
    }

    pub fn magnetization_history(&self) -> &[f64] {
        &self.magnetization_history
    }

    /// Number of `step()` calls so far.
    pub fn n_steps(&self) -> u64 {
        self.n_steps
    }

    pub fn n_accepted(&self) -> u64 {
        self.n_accepted
    }

    /// Fraction of proposals accepted, `0` before the first step.
    pub fn acceptance_rate(&self) -> f64 {
        if self.n_steps == 0 {
            return 0.0;
        }
        self.n_accepted as f64 / self.n_steps as f64
    }

    /// Consume the engine, returning `(energy_history, magnetization_history)`.
    pub fn into_histories(self) -> (Vec<f64>, Vec<f64>) {
        (self.energy_history, self.magnetization_history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spins::energy;
    use rand::SeedableRng;
    use std::collections::VecDeque;

    /// Replays fixed site choices and acceptance draws.
    struct Scripted {
        sites: VecDeque<usize>,
        draws: VecDeque<f64>,
    }

    impl Scripted {
        fn new(sites: &[usize], draws: &[f64]) -> Self {
            Self {
                sites: sites.iter().copied().collect(),
                draws: draws.iter().copied().collect(),
            }
        }
    }

    impl StepRng for Scripted {
        fn pick_site(&mut self, n_spins: usize) -> usize {
            let i = self.sites.pop_front().expect("site script exhausted");
            assert!(i < n_spins);
            i
        }

        fn uniform(&mut self) -> f64 {
            self.draws.pop_front().expect("draw script exhausted")
        }
    }

    fn all_up(side: usize, temperature: f64) -> LatticeState {
        LatticeState::from_spins(side, temperature, vec![1; side * side]).unwrap()
    }

    #[test]
    fn test_construction_seeds_histories() {
        let engine = MetropolisEngine::new(all_up(4, 2.0), Scripted::new(&[], &[]));
        assert_eq!(engine.total_energy(), -32.0);
        assert_eq!(engine.total_magnetization(), 16);
        assert_eq!(engine.energy_history(), &[-32.0]);
        assert_eq!(engine.magnetization_history(), &[16.0]);
        assert_eq!(engine.acceptance_rate(), 0.0);
    }

    #[test]
    fn test_golden_4x4_trajectory() {
        // T = 2, J = 1, all spins up. Flipping an isolated up spin costs 8,
        // a spin with one down neighbor costs 4; exp(-4) ~ 0.0183 and
        // exp(-2) ~ 0.1353 set the acceptance thresholds.
        let sites = [5, 6, 6, 5, 6, 0, 15, 0, 3, 15];
        // Steps 4, 5 and 10 lower the energy and draw nothing.
        let draws = [0.01, 0.5, 0.1, 0.9, 0.018, 0.5, 0.13];
        let mut engine = MetropolisEngine::new(all_up(4, 2.0), Scripted::new(&sites, &draws));

        let outcomes: Vec<StepOutcome> = (0..10).map(|_| engine.step()).collect();
        let accepted: Vec<bool> = outcomes.iter().map(StepOutcome::is_accepted).collect();
        assert_eq!(
            accepted,
            [
                true, false, true, true, true, false, true, false, true, true,
            ]
        );
        let deltas: Vec<f64> = outcomes.iter().map(StepOutcome::delta_e).collect();
        assert_eq!(deltas, [8.0, 4.0, 4.0, -4.0, -8.0, 8.0, 8.0, 8.0, 4.0, -4.0]);

        assert_eq!(
            engine.energy_history(),
            &[
                -32.0, -24.0, -24.0, -20.0, -24.0, -32.0, -32.0, -24.0, -24.0, -20.0, -24.0,
            ]
        );
        assert_eq!(
            engine.magnetization_history(),
            &[
                16.0, 14.0, 14.0, 12.0, 14.0, 16.0, 16.0, 14.0, 14.0, 12.0, 14.0,
            ]
        );

        // Only (0,3) is left pointing down.
        let mut expected = vec![1i8; 16];
        expected[3] = -1;
        assert_eq!(engine.lattice().spins(), expected.as_slice());
        assert_eq!(engine.total_energy(), -24.0);
        assert_eq!(engine.total_magnetization(), 14);
        assert_eq!(engine.n_steps(), 10);
        assert_eq!(engine.n_accepted(), 7);
    }

    #[test]
    fn test_2x2_flip_delta() {
        // On the 2x2 torus each neighbor is counted twice, so flipping an up
        // spin among ups costs 2 * J * 4 = 8.
        let mut engine = MetropolisEngine::new(all_up(2, 2.0), Scripted::new(&[2], &[0.0]));
        assert_eq!(engine.total_energy(), -8.0);
        assert_eq!(engine.step(), StepOutcome::Accepted { delta_e: 8.0 });
        assert_eq!(engine.total_energy(), 0.0);
        assert_eq!(
            engine.total_energy(),
            energy::bond_energy(
                engine.lattice().lattice(),
                engine.lattice().spins(),
                engine.lattice().coupling()
            )
        );
        assert_eq!(engine.total_magnetization(), 2);
    }

    #[test]
    fn test_zero_delta_still_draws() {
        let spins = vec![1, -1, 1, 1, 1, -1, -1, -1, 1];
        let state = LatticeState::from_spins(3, 2.0, spins).unwrap();
        // Cell 4: right 5 (-1), left 3 (+1), down 7 (-1), up 1 (-1), so
        // dE = 2 * J * s * h = -4 and no draw is taken.
        // Cell 0 afterwards: right 1 (-1), left 2 (+1), down 3 (+1), up 6 (-1),
        // so dE = 0 and the single scripted draw decides.
        let mut engine = MetropolisEngine::new(state, Scripted::new(&[4, 0], &[0.999_999]));
        assert_eq!(engine.step(), StepOutcome::Accepted { delta_e: -4.0 });
        assert_eq!(engine.step(), StepOutcome::Accepted { delta_e: 0.0 });
        assert_eq!(engine.total_energy(), engine.energy_history()[1]);
    }

    #[test]
    fn test_reject_restores_state() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(5);
        let state = LatticeState::new(6, 0.5, &mut rng).unwrap();
        let mut engine = MetropolisEngine::new(state, rng);
        let mut saw_reject = false;
        let mut saw_accept = false;
        for _ in 0..2000 {
            let before = engine.lattice().spins().to_vec();
            let e_before = engine.total_energy();
            let m_before = engine.total_magnetization();
            let outcome = engine.step();
            let after = engine.lattice().spins();
            let n_diff = before.iter().zip(after).filter(|(a, b)| a != b).count();
            if outcome.is_accepted() {
                saw_accept = true;
                assert_eq!(n_diff, 1);
                let (k, _) = before
                    .iter()
                    .zip(after)
                    .enumerate()
                    .find(|(_, (a, b))| a != b)
                    .unwrap();
                assert_eq!(after[k], -before[k]);
            } else {
                saw_reject = true;
                assert_eq!(n_diff, 0);
                assert_eq!(engine.total_energy(), e_before);
                assert_eq!(engine.total_magnetization(), m_before);
            }
            assert_eq!(
                engine.total_magnetization(),
                energy::magnetization(engine.lattice().spins())
            );
        }
        assert!(saw_accept && saw_reject);
        assert_eq!(engine.energy_history().len(), 2001);
        assert_eq!(engine.magnetization_history().len(), 2001);
    }

    #[test]
    fn test_running_energy_matches_bond_sum() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(99);
        let state = LatticeState::new(10, 2.0, &mut rng).unwrap();
        let mut engine = MetropolisEngine::new(state, rng);
        engine.run(5000);
        let lat = engine.lattice();
        let full = energy::bond_energy(lat.lattice(), lat.spins(), lat.coupling());
        assert!((engine.total_energy() - full).abs() < 1e-9);
    }

    #[test]
    fn test_acceptance_frequency_matches_boltzmann() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(2024);
        let n_trials = 200_000;
        for (delta_e, temperature) in [(1.0, 2.0), (4.0, 2.0), (0.0, 1.0), (3.0, 0.7)] {
            let accepted = (0..n_trials)
                .filter(|_| metropolis_accept(delta_e, temperature, &mut rng))
                .count();
            let freq = accepted as f64 / n_trials as f64;
            let expected: f64 = (-delta_e / temperature).exp();
            assert!(
                (freq - expected).abs() < 0.01,
                "dE = {delta_e}, T = {temperature}: {freq} vs {expected}"
            );
        }
    }

    #[test]
    fn test_downhill_consumes_no_draw() {
        let mut empty = Scripted::new(&[], &[]);
        assert!(metropolis_accept(-0.5, 1.0, &mut empty));
    }
}
