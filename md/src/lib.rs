pub mod body;
pub mod collider;
pub mod config;
pub mod io;
pub mod lj_pot;
pub mod metropolis;
pub mod random;
pub mod run_md;

pub use body::{Body, Walls};
pub use collider::Collider;
pub use config::{ColliderConfig, MetropolisConfig, SimConfig};
pub use lj_pot::LennardJones;
pub use metropolis::{metropolis_accept, MetropolisSampler, SamplerStatistics};
pub use random::UniformSource;
pub use run_md::{kinetic_energy, ForceModel, Integrator, Pefrl, PefrlCoefficients};
