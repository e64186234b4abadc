use crate::body::Body;
use serde::{Deserialize, Serialize};
use tracing::trace;

pub trait ForceModel {
    /// Clear every accumulator, then sum all pair and wall contributions.
    fn accumulate_all_forces(&self, bodies: &mut [Body]);
}

pub trait Integrator {
    /// Advance the ensemble by dt
    fn advance(&self, bodies: &mut [Body], dt: f64);
}

/// Coefficients of the position-extended Forest-Ruth-like scheme
/// (Omelyan, Mryglod and Folk).
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct PefrlCoefficients {
    pub xi: f64,
    pub lambda: f64,
    pub zi: f64,
}

impl Default for PefrlCoefficients {
    fn default() -> Self {
        PefrlCoefficients {
            xi: -0.06626458266981849,
            lambda: -0.2123418310626054,
            zi: 0.1786178958448091,
        }
    }
}

impl PefrlCoefficients {
    /// (1 - 2 lambda) / 2
    pub fn coef1(&self) -> f64 {
        (1.0 - 2.0 * self.lambda) / 2.0
    }

    /// 1 - 2 (xi + zi)
    pub fn coef2(&self) -> f64 {
        1.0 - 2.0 * (self.xi + self.zi)
    }
}

/// Fourth-order symplectic integrator, four force evaluations per step.
pub struct Pefrl<F: ForceModel> {
    pub coefficients: PefrlCoefficients,
    pub(crate) provider: F,
}

impl<F: ForceModel> Pefrl<F> {
    pub fn new(provider: F, coefficients: PefrlCoefficients) -> Self {
        Pefrl {
            coefficients,
            provider,
        }
    }

    pub fn provider(&self) -> &F {
        &self.provider
    }

    fn drift(bodies: &mut [Body], dt: f64, coef: f64) {
        for body in bodies.iter_mut() {
            body.move_position(dt, coef);
        }
    }

    fn kick(bodies: &mut [Body], dt: f64, coef: f64) {
        for body in bodies.iter_mut() {
            body.move_velocity(dt, coef);
        }
    }
}

impl<F: ForceModel> Integrator for Pefrl<F> {
    fn advance(&self, bodies: &mut [Body], dt: f64) {
        let c = &self.coefficients;
        let (coef1, coef2) = (c.coef1(), c.coef2());

        Self::drift(bodies, dt, c.zi);
        self.provider.accumulate_all_forces(bodies);
        Self::kick(bodies, dt, coef1);

        Self::drift(bodies, dt, c.xi);
        self.provider.accumulate_all_forces(bodies);
        Self::kick(bodies, dt, c.lambda);

        Self::drift(bodies, dt, coef2);
        self.provider.accumulate_all_forces(bodies);
        Self::kick(bodies, dt, c.lambda);

        Self::drift(bodies, dt, c.xi);
        self.provider.accumulate_all_forces(bodies);
        Self::kick(bodies, dt, coef1);

        Self::drift(bodies, dt, c.zi);
        trace!(n_bodies = bodies.len(), dt, "PEFRL step complete");
    }
}

/// Total kinetic energy of the ensemble
pub fn kinetic_energy(bodies: &[Body]) -> f64 {
    bodies.iter().map(Body::kinetic_energy).sum()
}
