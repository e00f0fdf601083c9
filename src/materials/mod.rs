//! Materials for MPM simulation
//!
//! Three families, one model each:
//!
//! * `granular` - snow with hardening and principal-stretch plasticity
//! * `fluids` - weakly compressible water
//! * `solids` - corotated elastic tissue

pub mod families;
pub mod fluids;
pub mod granular;
pub mod material_types;
pub mod solids;
pub mod utils;

use crate::core::Particle;
use crate::error::MaterialError;
use crate::math::{Matrix, Real};

pub use families::ElasticParams;
pub use fluids::water::{WaterModel, WaterParams};
pub use granular::snow::{SnowModel, SnowParams};
pub use material_types::MaterialTag;
pub use solids::tissue::TissueModel;

// Re-export physics utilities for easy access
pub use utils::check;
pub use utils::physics;

/// Lamé parameters handed to the stress computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LameParameters {
    pub mu: Real,
    pub lambda: Real,
}

impl LameParameters {
    pub const fn new(mu: Real, lambda: Real) -> Self {
        Self { mu, lambda }
    }

    pub fn from_elastic(params: &ElasticParams) -> Self {
        let (lambda, mu) = physics::lame_lambda_mu(params.young_modulus, params.poisson_ratio);
        Self { mu, lambda }
    }

    pub fn scaled(self, factor: Real) -> Self {
        Self {
            mu: self.mu * factor,
            lambda: self.lambda * factor,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.mu.is_finite() && self.lambda.is_finite()
    }
}

/// Constitutive behavior plugged into the stepper.
///
/// `material_properties` is queried once per particle during the scatter;
/// `update_deformation_gradient` receives the candidate `F' = (I + dt·C)·F`
/// at the end of the gather and decides what the particle keeps.
pub trait MaterialModel: Send + Sync {
    fn material_properties(&self, particle: &Particle) -> Result<LameParameters, MaterialError>;

    fn update_deformation_gradient(
        &self,
        particle: &mut Particle,
        candidate: Matrix,
    ) -> Result<(), MaterialError>;
}

impl<M: MaterialModel + ?Sized> MaterialModel for &M {
    fn material_properties(&self, particle: &Particle) -> Result<LameParameters, MaterialError> {
        (**self).material_properties(particle)
    }

    fn update_deformation_gradient(
        &self,
        particle: &mut Particle,
        candidate: Matrix,
    ) -> Result<(), MaterialError> {
        (**self).update_deformation_gradient(particle, candidate)
    }
}
