// file: `md/src/lj_pot.rs`
use nalgebra::Vector2;

/// Lennard-Jones pair potential in a square periodic box of side `box_length`.
///
/// With `epsilon = sigma = 1` the pair energy is `4 (r^-12 - r^-6)`.
#[derive(Debug, Clone)]
pub struct LennardJones {
    pub epsilon: f64,
    pub sigma: f64,
    pub box_length: f64,
}

impl LennardJones {
    pub fn new(epsilon: f64, sigma: f64, box_length: f64) -> Self {
        LennardJones {
            epsilon,
            sigma,
            box_length,
        }
    }

    /// Reduced units, epsilon = sigma = 1.
    pub fn reduced(box_length: f64) -> Self {
        Self::new(1.0, 1.0, box_length)
    }

    // Apply minimum-image convention, single box image per axis
    pub fn minimum_image(&self, mut d: Vector2<f64>) -> Vector2<f64> {
        let l = self.box_length;
        for k in 0..2 {
            d[k] -= l * (d[k] / l).round();
        }
        d
    }

    pub fn pair_energy(&self, r2: f64) -> f64 {
        let inv_r2 = self.sigma * self.sigma / r2;
        let inv_r6 = inv_r2 * inv_r2 * inv_r2;
        4.0 * self.epsilon * (inv_r6 * inv_r6 - inv_r6)
    }

    /// Energy of a particle placed at `trial` against every stored particle
    /// except `excluded`.
    ///
    /// No guard against `r = 0`: a trial sitting exactly on another particle
    /// yields a non-finite energy.
    pub fn energy(&self, positions: &[Vector2<f64>], excluded: usize, trial: Vector2<f64>) -> f64 {
        positions
            .iter()
            .enumerate()
            .filter(|&(n, _)| n != excluded)
            .map(|(_, &other)| {
                let rij = self.minimum_image(other - trial);
                self.pair_energy(rij.norm_squared())
            })
            .sum()
    }

    /// Total potential energy summed over unordered pairs.
    pub fn total_energy(&self, positions: &[Vector2<f64>]) -> f64 {
        let n = positions.len();
        let mut energy = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                let rij = self.minimum_image(positions[i] - positions[j]);
                energy += self.pair_energy(rij.norm_squared());
            }
        }
        energy
    }

    /// Minimum-image distance between two points.
    pub fn distance(&self, a: Vector2<f64>, b: Vector2<f64>) -> f64 {
        self.minimum_image(a - b).norm()
    }
}
