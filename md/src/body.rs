use nalgebra::{Vector2, Vector3};

/// Rectangular box `[0, lx] x [0, ly]` with soft repulsive walls.
#[derive(Debug, Clone, Copy)]
pub struct Walls {
    pub lx: f64,
    pub ly: f64,
    /// Stiffness k of the `k h^1.5` wall law
    pub stiffness: f64,
}

impl Walls {
    pub fn new(lx: f64, ly: f64, stiffness: f64) -> Self {
        Walls { lx, ly, stiffness }
    }

    /// Force on one axis for a body of radius `radius` at `coord`.
    ///
    /// The near wall (0) is checked first; the far wall only when the body is
    /// strictly clear of the near one, so at most one wall acts per axis.
    fn axis_force(&self, coord: f64, radius: f64, far: f64) -> f64 {
        let h_near = radius - (0.0 - coord).abs();
        if h_near > 0.0 {
            self.stiffness * h_near.powf(1.5)
        } else if h_near < 0.0 {
            let h_far = radius - (far - coord).abs();
            if h_far > 0.0 {
                -self.stiffness * h_far.powf(1.5)
            } else {
                0.0
            }
        } else {
            0.0
        }
    }
}

/// A soft sphere moving in the xy plane.
#[derive(Debug, Clone)]
pub struct Body {
    r: Vector3<f64>,
    v: Vector3<f64>,
    f: Vector3<f64>,
    m: f64,
    radius: f64,
}

impl Body {
    pub fn new(position: Vector2<f64>, velocity: Vector2<f64>, mass: f64, radius: f64) -> Self {
        Body {
            r: Vector3::new(position.x, position.y, 0.0),
            v: Vector3::new(velocity.x, velocity.y, 0.0),
            f: Vector3::zeros(),
            m: mass,
            radius,
        }
    }

    pub fn position(&self) -> Vector3<f64> {
        self.r
    }

    pub fn velocity(&self) -> Vector3<f64> {
        self.v
    }

    pub fn force(&self) -> Vector3<f64> {
        self.f
    }

    pub fn mass(&self) -> f64 {
        self.m
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn set_position(&mut self, position: Vector2<f64>) {
        self.r = Vector3::new(position.x, position.y, 0.0);
    }

    pub fn set_velocity(&mut self, velocity: Vector2<f64>) {
        self.v = Vector3::new(velocity.x, velocity.y, 0.0);
    }

    /// Raw addition to the force accumulator, no wall term.
    pub fn add_force(&mut self, df: Vector3<f64>) {
        self.f += df;
    }

    /// r += v * dt * coef
    #[inline]
    pub fn move_position(&mut self, dt: f64, coef: f64) {
        self.r += self.v * (dt * coef);
    }

    /// v += F/m * dt * coef
    #[inline]
    pub fn move_velocity(&mut self, dt: f64, coef: f64) {
        self.v += self.f * (dt * coef / self.m);
    }

    pub fn reset_force(&mut self) {
        self.f = Vector3::zeros();
    }

    /// Wall repulsion at the current position.
    pub fn wall_repulsion(&self, walls: &Walls) -> Vector3<f64> {
        Vector3::new(
            walls.axis_force(self.r.x, self.radius, walls.lx),
            walls.axis_force(self.r.y, self.radius, walls.ly),
            0.0,
        )
    }

    /// Adds a pair contribution together with the wall repulsion.
    ///
    /// The wall term is added on every call, so a body collects it once per
    /// pair it takes part in.
    pub fn accumulate_force(&mut self, df: Vector3<f64>, walls: &Walls) {
        let wall = self.wall_repulsion(walls);
        self.f += df + wall;
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.m * self.v.norm_squared()
    }
}
