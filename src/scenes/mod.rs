//! Ready-made scenarios: a material model, its initial particles and any
//! per-step post-processing layered on top of the stepper.

pub mod folding_ball;
pub mod sampling;
pub mod snow_blocks;
pub mod water_drops;

use rand::Rng;

use crate::config::SolverParams;
use crate::core::ParticleSet;
use crate::error::ConfigError;
use crate::materials::{MaterialModel, MaterialTag};

pub use folding_ball::{FoldingBall, GrowthSchedule};
pub use sampling::{Spawner, fits_grid, sample_annulus_lattice, sample_disc, sample_square};
pub use snow_blocks::SnowBlocks;
pub use water_drops::{WaterDrop, WaterDrops};

pub trait Scenario: Send + Sync + 'static {
    type Model: MaterialModel + 'static;

    fn name(&self) -> &'static str;

    /// Fresh material model for a run of this scenario.
    fn model(&self) -> Result<Self::Model, ConfigError>;

    fn solver_params(&self) -> Result<SolverParams, ConfigError> {
        Ok(SolverParams::default())
    }

    /// Seeds the initial particles.
    fn populate<R: Rng + ?Sized>(&self, spawner: &mut Spawner<'_>, rng: &mut R);

    /// Material given to interactively inserted objects.
    fn object_material(&self) -> MaterialTag;

    /// Runs after every completed step; `step` counts from 0.
    fn after_step(&self, _step: u64, _particles: &mut ParticleSet) {}
}
