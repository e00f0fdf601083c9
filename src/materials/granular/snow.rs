//! Snow material
//!
//! Corotated elasticity whose Lamé parameters harden exponentially with
//! compaction, plus plasticity that clamps the principal stretches of `F`.

use crate::core::Particle;
use crate::error::{ConfigError, MaterialError};
use crate::materials::families::ElasticParams;
use crate::materials::utils::physics;
use crate::materials::{LameParameters, MaterialModel, check};
use crate::math::{self, Matrix, Real, Vector};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnowParams {
    pub elastic: ElasticParams,
    pub hardening: Real,
    /// Multiplier selecting how many principal stretches are clamped:
    /// `min(2, ceil(2 · plastic))`. Zero disables plasticity.
    pub plastic: Real,
    /// Allowed principal stretch range `[1 - θc, 1 + θs]`.
    pub stretch_range: (Real, Real),
    pub plastic_jacobian_range: (Real, Real),
}

impl Default for SnowParams {
    fn default() -> Self {
        Self {
            elastic: ElasticParams::snow(),
            hardening: 10.0,
            plastic: 1.0,
            stretch_range: (1.0 - 2.5e-2, 1.0 + 7.5e-3),
            plastic_jacobian_range: (0.6, 20.0),
        }
    }
}

impl SnowParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.elastic.validate()?;
        if !(self.hardening.is_finite() && self.hardening >= 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "hardening",
                value: self.hardening,
            });
        }
        if !(self.plastic.is_finite() && self.plastic >= 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "plastic",
                value: self.plastic,
            });
        }
        let (min, max) = self.stretch_range;
        if !check::range_ok(min, max) || min <= 0.0 {
            return Err(ConfigError::InvalidRange {
                name: "stretch_range",
                min,
                max,
            });
        }
        let (min, max) = self.plastic_jacobian_range;
        if !check::range_ok(min, max) || min <= 0.0 {
            return Err(ConfigError::InvalidRange {
                name: "plastic_jacobian_range",
                min,
                max,
            });
        }
        Ok(())
    }

    /// Number of leading singular values subject to the stretch clamp.
    pub fn clamped_stretch_count(&self) -> usize {
        (2.0 * self.plastic).ceil().min(2.0) as usize
    }
}

#[derive(Debug, Clone)]
pub struct SnowModel {
    params: SnowParams,
    base: LameParameters,
}

impl Default for SnowModel {
    fn default() -> Self {
        let params = SnowParams::default();
        Self {
            base: LameParameters::from_elastic(&params.elastic),
            params,
        }
    }
}

impl SnowModel {
    pub fn new(params: SnowParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            base: LameParameters::from_elastic(&params.elastic),
            params,
        })
    }

    pub fn params(&self) -> &SnowParams {
        &self.params
    }

    /// `(μ₀, λ₀)` before hardening.
    pub fn base_parameters(&self) -> LameParameters {
        self.base
    }

    pub fn set_hardening(&mut self, hardening: Real) -> Result<(), ConfigError> {
        self.apply(SnowParams {
            hardening,
            ..self.params
        })
    }

    pub fn set_poisson_ratio(&mut self, poisson_ratio: Real) -> Result<(), ConfigError> {
        self.apply(SnowParams {
            elastic: ElasticParams {
                poisson_ratio,
                ..self.params.elastic
            },
            ..self.params
        })
    }

    pub fn set_plastic(&mut self, plastic: Real) -> Result<(), ConfigError> {
        self.apply(SnowParams {
            plastic,
            ..self.params
        })
    }

    fn apply(&mut self, params: SnowParams) -> Result<(), ConfigError> {
        *self = Self::new(params)?;
        Ok(())
    }
}

impl MaterialModel for SnowModel {
    fn material_properties(&self, particle: &Particle) -> Result<LameParameters, MaterialError> {
        let e = physics::hardening_factor(self.params.hardening, particle.plastic_jacobian);
        if !(e > 0.0 && e.is_finite()) {
            return Err(MaterialError::HardeningCollapsed { e });
        }
        Ok(self.base.scaled(e))
    }

    fn update_deformation_gradient(
        &self,
        particle: &mut Particle,
        candidate: Matrix,
    ) -> Result<(), MaterialError> {
        let svd = math::svd(&candidate);
        let (min, max) = self.params.stretch_range;

        let mut sigma = [svd.singular_values.x, svd.singular_values.y];
        for value in sigma.iter_mut().take(self.params.clamped_stretch_count()) {
            *value = value.clamp(min, max);
        }
        let projected = svd.recompose_with(Vector::from_array(sigma));

        let ratio = candidate.determinant() / projected.determinant();
        if !ratio.is_finite() {
            return Err(MaterialError::NonFiniteJacobian { j: ratio });
        }

        let (jp_min, jp_max) = self.params.plastic_jacobian_range;
        particle.plastic_jacobian = (particle.plastic_jacobian * ratio).clamp(jp_min, jp_max);
        particle.deformation_gradient = projected;
        Ok(())
    }
}
