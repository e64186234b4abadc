// file: `md/src/metropolis.rs`
use crate::config::MetropolisConfig;
use crate::lj_pot::LennardJones;
use crate::random::{pick_index, UniformSource};
use itertools::Itertools;
use nalgebra::Vector2;
use tracing::debug;

/// Metropolis Monte Carlo for Lennard-Jones particles in a periodic square.
///
/// Every call to [`MetropolisSampler::step`] proposes one displacement of one
/// randomly chosen particle and either commits it or leaves the ensemble alone.
#[derive(Debug, Clone)]
pub struct MetropolisSampler {
    /// Lennard-Jones potential with PBC support
    pub lj: LennardJones,
    /// Particle positions, fixed length N
    positions: Box<[Vector2<f64>]>,
    /// Maximum displacement per axis (dr)
    pub max_step: f64,
    /// Acceptance bookkeeping
    pub stats: SamplerStatistics,
}

/// Counters for trial moves
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SamplerStatistics {
    pub attempted: u64,
    pub accepted: u64,
}

impl SamplerStatistics {
    pub fn acceptance_rate(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            self.accepted as f64 / self.attempted as f64
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Metropolis criterion: downhill moves always pass, uphill ones with
/// probability `exp(-beta dE)`. Draws a deviate only when `dE > 0`.
pub fn metropolis_accept<U: UniformSource + ?Sized>(delta_e: f64, beta: f64, rng: &mut U) -> bool {
    if delta_e <= 0.0 {
        true
    } else {
        rng.uniform() < (-beta * delta_e).exp()
    }
}

impl MetropolisSampler {
    /// All N particles start at the origin; call [`initialize`](Self::initialize)
    /// before sampling.
    pub fn new(n_particles: usize, box_length: f64, max_step: f64) -> Self {
        Self::from_positions(vec![Vector2::zeros(); n_particles], box_length, max_step)
    }

    pub fn from_config(config: &MetropolisConfig) -> Self {
        Self::new(config.n_particles, config.box_length, config.max_step)
    }

    pub fn from_positions(positions: Vec<Vector2<f64>>, box_length: f64, max_step: f64) -> Self {
        Self {
            lj: LennardJones::reduced(box_length),
            positions: positions.into_boxed_slice(),
            max_step,
            stats: SamplerStatistics::default(),
        }
    }

    pub fn box_length(&self) -> f64 {
        self.lj.box_length
    }

    pub fn n_particles(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[Vector2<f64>] {
        &self.positions
    }

    /// Uniform random positions in [0, L)^2, x then y per particle.
    pub fn initialize<U: UniformSource + ?Sized>(&mut self, rng: &mut U) {
        let l = self.box_length();
        for pos in self.positions.iter_mut() {
            pos.x = l * rng.uniform();
            pos.y = l * rng.uniform();
        }
        debug!(n = self.positions.len(), box_length = l, "initialized random positions");
    }

    /// Fold a trial position back into the box.
    ///
    /// The x axis uses exclusive branches while the two y checks are
    /// independent. With `dr < L/2` at most one branch can fire on either
    /// axis, so the difference never shows; a coordinate landing exactly on L
    /// is left there.
    fn wrap_trial(&self, mut trial: Vector2<f64>) -> Vector2<f64> {
        let l = self.box_length();

        if trial.x < 0.0 {
            trial.x += l;
        } else if trial.x > l {
            trial.x -= l;
        }

        if trial.y < 0.0 {
            trial.y += l;
        }
        if trial.y > l {
            trial.y -= l;
        }

        trial
    }

    /// One single-particle Metropolis move at inverse temperature `beta`.
    ///
    /// Consumes, in order: one deviate for the particle index, one each for
    /// the x and y displacement, and one more for the acceptance draw when the
    /// move is uphill. Returns whether the move was accepted.
    pub fn step<U: UniformSource + ?Sized>(&mut self, beta: f64, rng: &mut U) -> bool {
        let n = pick_index(rng, self.positions.len());
        let current = self.positions[n];

        let displacement = Vector2::new(
            self.max_step * (2.0 * rng.uniform() - 1.0),
            self.max_step * (2.0 * rng.uniform() - 1.0),
        );
        let trial = self.wrap_trial(current + displacement);

        let delta_e = self.lj.energy(&self.positions, n, trial)
            - self.lj.energy(&self.positions, n, current);

        self.stats.attempted += 1;
        let accept = metropolis_accept(delta_e, beta, rng);
        if accept {
            self.positions[n] = trial;
            self.stats.accepted += 1;
        }
        accept
    }

    /// Perform `n_steps` single-particle moves.
    pub fn run<U: UniformSource + ?Sized>(&mut self, beta: f64, n_steps: usize, rng: &mut U) {
        for _ in 0..n_steps {
            self.step(beta, rng);
        }
    }

    /// Number of index pairs `(n1, n2)` with `n2 >= n1 + 2`.
    pub fn skip_pair_count(n: usize) -> usize {
        if n < 3 {
            0
        } else {
            (n - 1) * (n - 2) / 2
        }
    }

    /// Mean minimum-image distance over index pairs `n2 >= n1 + 2`.
    ///
    /// Index-adjacent pairs are left out whatever their spatial separation.
    pub fn mean_nearest_distance(&self) -> f64 {
        let total: f64 = self
            .positions
            .iter()
            .enumerate()
            .tuple_combinations()
            .filter(|((n1, _), (n2, _))| *n2 >= n1 + 2)
            .map(|((_, &a), (_, &b))| self.lj.distance(a, b))
            .sum();
        total / Self::skip_pair_count(self.positions.len()) as f64
    }

    /// Total Lennard-Jones energy of the current configuration
    pub fn potential_energy(&self) -> f64 {
        self.lj.total_energy(&self.positions)
    }

    pub fn reset_statistics(&mut self) {
        self.stats.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::tests::Scripted;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cluster_sampler() -> MetropolisSampler {
        MetropolisSampler::from_positions(
            vec![
                Vector2::new(1.0, 1.0),
                Vector2::new(2.5, 1.0),
                Vector2::new(1.0, 2.5),
                Vector2::new(2.5, 2.5),
            ],
            10.0,
            0.2,
        )
    }

    #[test]
    fn test_mean_nearest_distance_skips_adjacent_indices() {
        let sampler = MetropolisSampler::from_positions(
            vec![
                Vector2::new(0.0, 0.0),
                Vector2::new(1.0, 0.0),
                Vector2::new(0.0, 1.0),
                Vector2::new(1.0, 1.0),
            ],
            10.0,
            0.1,
        );
        // pairs (0,2), (0,3), (1,3)
        let expected = (1.0 + 2.0_f64.sqrt() + 1.0) / 3.0;
        assert_relative_eq!(sampler.mean_nearest_distance(), expected, epsilon = 1e-12);
        assert_eq!(MetropolisSampler::skip_pair_count(4), 3);
    }

    #[test]
    fn test_mean_nearest_distance_uses_minimum_image() {
        let sampler = MetropolisSampler::from_positions(
            vec![Vector2::new(0.5, 5.0), Vector2::new(5.0, 5.0), Vector2::new(9.5, 5.0)],
            10.0,
            0.1,
        );
        // only pair (0,2), 1.0 apart through the boundary
        assert_relative_eq!(sampler.mean_nearest_distance(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_initialize_is_reproducible() {
        let mut a = MetropolisSampler::new(20, 6.0, 0.3);
        let mut b = MetropolisSampler::new(20, 6.0, 0.3);
        a.initialize(&mut StdRng::seed_from_u64(42));
        b.initialize(&mut StdRng::seed_from_u64(42));
        assert_eq!(a.positions(), b.positions());
        assert!(a
            .positions()
            .iter()
            .all(|p| (0.0..6.0).contains(&p.x) && (0.0..6.0).contains(&p.y)));
    }

    #[test]
    fn test_initialize_consumes_x_then_y() {
        let mut sampler = MetropolisSampler::new(2, 10.0, 0.1);
        sampler.initialize(&mut Scripted::new(&[0.1, 0.2, 0.3, 0.4]));
        assert_relative_eq!(sampler.positions()[0].x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(sampler.positions()[0].y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(sampler.positions()[1].x, 3.0, epsilon = 1e-12);
        assert_relative_eq!(sampler.positions()[1].y, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_step_changes_at_most_one_particle() {
        let mut sampler = MetropolisSampler::new(12, 6.0, 0.4);
        let mut rng = StdRng::seed_from_u64(9);
        sampler.initialize(&mut rng);

        for _ in 0..500 {
            let before = sampler.positions().to_vec();
            let accepted = sampler.step(1.0, &mut rng);
            let changed = before
                .iter()
                .zip(sampler.positions())
                .filter(|(a, b)| a != b)
                .count();
            if accepted {
                assert!(changed <= 1);
            } else {
                assert_eq!(changed, 0);
            }
        }
        assert_eq!(sampler.stats.attempted, 500);
    }

    #[test]
    fn test_downhill_move_skips_acceptance_draw() {
        let mut sampler = cluster_sampler();
        // particle 3 (u = 0.9) moves towards the others along -x: energy drops
        let mut rng = Scripted::new(&[0.9, 0.0, 0.5]);
        assert!(sampler.step(1.0, &mut rng));
        assert_eq!(rng.consumed(), 3);
        assert_relative_eq!(sampler.positions()[3].x, 2.3, epsilon = 1e-12);
        assert_relative_eq!(sampler.positions()[3].y, 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_uphill_move_rejected_by_draw() {
        let mut sampler = cluster_sampler();
        // particle 3 pulled out of the cluster along +x; last deviate rejects
        let mut rng = Scripted::new(&[0.9, 1.0 - 1e-12, 0.5, 1.0 - 1e-12]);
        let before = sampler.positions().to_vec();
        assert!(!sampler.step(1.0, &mut rng));
        assert_eq!(rng.consumed(), 4);
        assert_eq!(sampler.positions(), &before[..]);
        assert_eq!(sampler.stats.accepted, 0);
    }

    #[test]
    fn test_trial_wraps_into_box() {
        let mut sampler = MetropolisSampler::from_positions(
            vec![Vector2::new(0.05, 7.95), Vector2::new(4.0, 4.0), Vector2::new(2.0, 6.0)],
            8.0,
            0.2,
        );
        // particle 0, dx = -0.2, dy = +0.2, accepted whatever dE
        let mut rng = Scripted::new(&[0.0, 0.0, 1.0 - 1e-15, 0.0]);
        assert!(sampler.step(1.0, &mut rng));
        let p = sampler.positions()[0];
        assert_relative_eq!(p.x, 7.85, epsilon = 1e-9);
        assert_relative_eq!(p.y, 0.15, epsilon = 1e-9);
    }

    #[test]
    fn test_wrap_trial_branches() {
        let sampler = MetropolisSampler::new(3, 10.0, 1.0);
        let w = sampler.wrap_trial(Vector2::new(-0.5, 10.5));
        assert_relative_eq!(w.x, 9.5, epsilon = 1e-12);
        assert_relative_eq!(w.y, 0.5, epsilon = 1e-12);
        // exactly L stays at L
        let w = sampler.wrap_trial(Vector2::new(10.0, 10.0));
        assert_eq!(w, Vector2::new(10.0, 10.0));
    }

    #[test]
    fn test_acceptance_rate_converges() {
        let mut rng = StdRng::seed_from_u64(1234);
        let (beta, delta_e) = (2.0, 0.35);
        let trials = 200_000;
        let accepted = (0..trials)
            .filter(|_| metropolis_accept(delta_e, beta, &mut rng))
            .count();
        let rate = accepted as f64 / trials as f64;
        assert_relative_eq!(rate, (-beta * delta_e).exp(), epsilon = 5e-3);
    }

    #[test]
    fn test_non_positive_delta_always_accepted() {
        let mut rng = Scripted::new(&[0.999]);
        assert!(metropolis_accept(0.0, 1.0, &mut rng));
        assert!(metropolis_accept(-3.0, 1.0, &mut rng));
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn test_low_temperature_lowers_energy() {
        let mut sampler = MetropolisSampler::new(16, 8.0, 0.2);
        let mut rng = StdRng::seed_from_u64(5);
        sampler.initialize(&mut rng);
        let e0 = sampler.potential_energy();
        sampler.run(20.0, 20_000, &mut rng);
        assert!(sampler.potential_energy() <= e0);
        assert!(sampler.stats.acceptance_rate() > 0.0);
        assert!(sampler
            .positions()
            .iter()
            .all(|p| (0.0..=8.0).contains(&p.x) && (0.0..=8.0).contains(&p.y)));
    }
}
