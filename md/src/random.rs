//! Source of uniform deviates consumed by the Monte Carlo sampler.

use rand::Rng;

/// Anything that can hand out uniform deviates in [0, 1).
pub trait UniformSource {
    fn uniform(&mut self) -> f64;
}

impl<R: Rng> UniformSource for R {
    #[inline]
    fn uniform(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Pick an index uniformly from `0..n` as `floor(n * u)`.
#[inline]
pub fn pick_index<U: UniformSource + ?Sized>(rng: &mut U, n: usize) -> usize {
    let idx = (n as f64 * rng.uniform()) as usize;
    // u is strictly below 1, but rounding in n * u can still land on n
    idx.min(n.saturating_sub(1))
}
