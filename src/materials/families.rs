//! Shared parameter packs for material families.
//!
//! Models are configured through these structs so scenarios and tooling can
//! populate material data without touching the solver.

use crate::error::ConfigError;
use crate::materials::check;
use crate::math::Real;

/// Isotropic linear elastic constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElasticParams {
    pub young_modulus: Real,
    pub poisson_ratio: Real,
}

impl ElasticParams {
    pub const fn new(young_modulus: Real, poisson_ratio: Real) -> Self {
        Self {
            young_modulus,
            poisson_ratio,
        }
    }

    pub const fn snow() -> Self {
        Self::new(1.0e4, 0.2)
    }

    pub const fn soft_tissue() -> Self {
        Self::new(100.0, 0.2)
    }

    pub const fn hard_tissue() -> Self {
        Self::new(3000.0, 0.2)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !check::young_modulus_ok(self.young_modulus) {
            return Err(ConfigError::InvalidParameter {
                name: "young_modulus",
                value: self.young_modulus,
            });
        }
        if !check::poisson_ratio_ok(self.poisson_ratio) {
            return Err(ConfigError::InvalidParameter {
                name: "poisson_ratio",
                value: self.poisson_ratio,
            });
        }
        Ok(())
    }
}
