use crate::body::Body;
use crate::run_md::PefrlCoefficients;
use color_eyre::eyre::{eyre, Result, WrapErr};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level configuration; either engine may be left out.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SimConfig {
    /// Lennard-Jones Monte Carlo run
    pub metropolis: Option<MetropolisConfig>,
    /// Soft-sphere collision run
    pub collider: Option<ColliderConfig>,
    /// Output and reporting settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Metropolis Monte Carlo parameters
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MetropolisConfig {
    /// Number of particles N
    pub n_particles: usize,
    /// Side L of the periodic box
    pub box_length: f64,
    /// Maximum trial displacement per axis (dr)
    pub max_step: f64,
    /// Inverse temperature
    pub beta: f64,
    /// Number of single-particle trial moves
    pub steps: usize,
    /// Steps between observable samples
    #[serde(default = "default_sample_interval")]
    pub sample_interval: usize,
    /// Optional random seed
    pub seed: Option<u64>,
}

/// Soft-sphere molecular dynamics parameters
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ColliderConfig {
    /// Box width
    pub lx: f64,
    /// Box height
    pub ly: f64,
    /// Time step
    pub dt: f64,
    /// Number of macro steps
    pub steps: usize,
    /// Contact and wall stiffness k
    #[serde(default = "default_stiffness")]
    pub stiffness: f64,
    /// PEFRL coefficients
    #[serde(default)]
    pub coefficients: PefrlCoefficients,
    /// Macro steps between kinetic energy reports
    #[serde(default = "default_sample_interval")]
    pub report_interval: usize,
    /// Initial bodies
    pub bodies: BodySetup,
}

/// Initial body placement
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(tag = "type")]
pub enum BodySetup {
    /// Explicit list of bodies
    #[serde(rename = "explicit")]
    Explicit { bodies: Vec<BodySpec> },
    /// Rectangular grid with thermal velocities
    #[serde(rename = "grid")]
    Grid {
        nx: usize,
        ny: usize,
        spacing: f64,
        /// Optional offset of the first body from the origin
        offset: Option<[f64; 2]>,
        mass: f64,
        radius: f64,
        /// Temperature of the velocity distribution (k_B = 1)
        #[serde(default)]
        temperature: f64,
        /// Optional random seed
        seed: Option<u64>,
    },
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BodySpec {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub vx: f64,
    #[serde(default)]
    pub vy: f64,
    pub mass: f64,
    pub radius: f64,
}

/// Output configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OutputConfig {
    /// Steps between emitted frames
    #[serde(default = "default_frame_interval")]
    pub frame_interval: usize,
    /// Radius annotation drawn around Monte Carlo particles
    #[serde(default = "default_particle_marker")]
    pub particle_marker: f64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            frame_interval: default_frame_interval(),
            particle_marker: default_particle_marker(),
        }
    }
}

// Default value functions
fn default_sample_interval() -> usize {
    100
}
fn default_stiffness() -> f64 {
    1.0e4
}
fn default_frame_interval() -> usize {
    10
}
fn default_particle_marker() -> f64 {
    0.1
}

impl SimConfig {
    /// Load configuration from YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("Unable to read configuration file: {}", path.display()))?;
        let config: SimConfig =
            serde_yml::from_str(&content).wrap_err("Failed to parse configuration file")?;
        config.validate().map_err(|e| eyre!(e))?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.metropolis.is_none() && self.collider.is_none() {
            return Err("At least one of `metropolis` or `collider` must be configured".to_string());
        }
        if let Some(mc) = &self.metropolis {
            mc.validate()?;
        }
        if let Some(md) = &self.collider {
            md.validate()?;
        }
        if self.output.frame_interval == 0 {
            return Err("Frame interval must be positive".to_string());
        }
        Ok(())
    }
}

impl MetropolisConfig {
    pub fn validate(&self) -> Result<(), String> {
        // mean_nearest_distance divides by (N-1)(N-2)/2
        if self.n_particles < 3 {
            return Err("Monte Carlo needs at least 3 particles".to_string());
        }
        if self.box_length <= 0.0 {
            return Err("Box length must be positive".to_string());
        }
        if self.max_step <= 0.0 {
            return Err("Maximum step must be positive".to_string());
        }
        // single-image wrapping only holds for dr < L/2
        if self.max_step >= 0.5 * self.box_length {
            return Err("Maximum step must be smaller than half the box length".to_string());
        }
        if self.beta <= 0.0 {
            return Err("Inverse temperature must be positive".to_string());
        }
        if self.sample_interval == 0 {
            return Err("Sample interval must be positive".to_string());
        }
        Ok(())
    }
}

impl ColliderConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.lx <= 0.0 || self.ly <= 0.0 {
            return Err("Box dimensions must be positive".to_string());
        }
        if self.dt <= 0.0 {
            return Err("Time step must be positive".to_string());
        }
        if self.stiffness <= 0.0 {
            return Err("Stiffness must be positive".to_string());
        }
        if self.report_interval == 0 {
            return Err("Report interval must be positive".to_string());
        }

        let bodies = self.generate_bodies()?;
        if bodies.len() < 2 {
            return Err("Collider needs at least 2 bodies".to_string());
        }
        for (i, body) in bodies.iter().enumerate() {
            let p = body.position();
            if p.x < 0.0 || p.x > self.lx || p.y < 0.0 || p.y > self.ly {
                return Err(format!("Body {} starts outside the box", i));
            }
        }
        Ok(())
    }

    /// Build the initial bodies described by `bodies`.
    pub fn generate_bodies(&self) -> Result<Vec<Body>, String> {
        match &self.bodies {
            BodySetup::Explicit { bodies } => bodies
                .iter()
                .map(|b| {
                    if b.mass <= 0.0 || b.radius <= 0.0 {
                        return Err("Body mass and radius must be positive".to_string());
                    }
                    Ok(Body::new(
                        Vector2::new(b.x, b.y),
                        Vector2::new(b.vx, b.vy),
                        b.mass,
                        b.radius,
                    ))
                })
                .collect(),
            BodySetup::Grid {
                nx,
                ny,
                spacing,
                offset,
                mass,
                radius,
                temperature,
                seed,
            } => {
                use rand::rngs::StdRng;
                use rand::SeedableRng;
                use rand_distr::{Distribution, StandardNormal};

                if *mass <= 0.0 || *radius <= 0.0 {
                    return Err("Body mass and radius must be positive".to_string());
                }
                if *temperature < 0.0 {
                    return Err("Temperature must be non-negative".to_string());
                }

                let offset = offset.unwrap_or([*radius, *radius]);
                let n_bodies = nx * ny;
                let mut positions = Vec::with_capacity(n_bodies);
                for i in 0..*nx {
                    for j in 0..*ny {
                        positions.push(Vector2::new(
                            offset[0] + i as f64 * spacing,
                            offset[1] + j as f64 * spacing,
                        ));
                    }
                }

                let mut rng = if let Some(seed) = seed {
                    StdRng::seed_from_u64(*seed)
                } else {
                    StdRng::from_entropy()
                };

                let sigma_v = (temperature / mass).sqrt();
                let mut velocities: Vec<Vector2<f64>> = (0..n_bodies)
                    .map(|_| {
                        let vx: f64 = StandardNormal.sample(&mut rng);
                        let vy: f64 = StandardNormal.sample(&mut rng);
                        Vector2::new(vx, vy) * sigma_v
                    })
                    .collect();

                // Remove center-of-mass motion
                if n_bodies > 1 {
                    let v_cm: Vector2<f64> =
                        velocities.iter().sum::<Vector2<f64>>() / n_bodies as f64;
                    for v in &mut velocities {
                        *v -= v_cm;
                    }
                }

                Ok(positions
                    .into_iter()
                    .zip(velocities)
                    .map(|(r, v)| Body::new(r, v, *mass, *radius))
                    .collect())
            }
        }
    }
}
