// file: `md/src/collider.rs`
use crate::body::{Body, Walls};
use crate::run_md::ForceModel;
use nalgebra::Vector3;

/// Hertzian-like contact model: overlapping spheres repel with `k s^1.5`
/// where `s` is the overlap depth.
#[derive(Debug, Clone)]
pub struct Collider {
    pub stiffness: f64,
    pub walls: Walls,
}

impl Collider {
    pub fn new(stiffness: f64, walls: Walls) -> Self {
        Collider { stiffness, walls }
    }

    /// Contact force on `b` exerted by `a`; `a` receives the opposite.
    ///
    /// The force vector is `(r_b - r_a) * k s^1.5`, not normalised. Pairs that
    /// do not overlap (`s <= 0`) contribute zero instead of evaluating the
    /// power law on a negative base.
    pub fn contact_force(&self, a: &Body, b: &Body) -> Vector3<f64> {
        let dr = b.position() - a.position();
        let s = (a.radius() + b.radius()) - dr.norm();
        if s > 0.0 {
            dr * (self.stiffness * s.powf(1.5))
        } else {
            Vector3::zeros()
        }
    }

    /// Apply the contact force to both bodies, wall term included.
    pub fn pairwise_force(&self, a: &mut Body, b: &mut Body) {
        let df = self.contact_force(a, b);
        b.accumulate_force(df, &self.walls);
        a.accumulate_force(-df, &self.walls);
    }
}

impl ForceModel for Collider {
    fn accumulate_all_forces(&self, bodies: &mut [Body]) {
        for body in bodies.iter_mut() {
            body.reset_force();
        }

        let n = bodies.len();
        for j in 1..n {
            let (head, tail) = bodies.split_at_mut(j);
            let b = &mut tail[0];
            for a in head.iter_mut() {
                self.pairwise_force(a, b);
            }
        }
    }
}
