use rand::Rng;

/// The two random draws a Metropolis step consumes.
///
/// Every [`rand::Rng`] is a `StepRng`; tests can drive the engine with a
/// scripted source instead.
pub trait StepRng {
    /// Uniform site index in `[0, n_spins)`.
    fn pick_site(&mut self, n_spins: usize) -> usize;

    /// Uniform draw in `[0, 1)`.
    fn uniform(&mut self) -> f64;
}

impl<R: Rng + ?Sized> StepRng for R {
    #[inline]
    fn pick_site(&mut self, n_spins: usize) -> usize {
        self.gen_range(0..n_spins)
    }

    #[inline]
    fn uniform(&mut self) -> f64 {
        self.gen::<f64>()
    }
}
