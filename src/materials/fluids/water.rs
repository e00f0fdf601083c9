//! Water fluid material
//!
//! Handles water pressure, viscosity, and volume-ratio bounds.

use bevy::log::debug;

use crate::core::Particle;
use crate::error::{ConfigError, MaterialError};
use crate::materials::utils::{self, physics};
use crate::materials::{LameParameters, MaterialModel, check};
use crate::math::{Matrix, Real};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterParams {
    pub bulk_modulus: Real,
    pub dynamic_viscosity: Real,
    pub gamma: Real,
    pub min_j: Real,
    pub max_j: Real,
    /// Constant term of the pressure law `bulk · (offset - J^-gamma)`.
    pub pressure_offset: Real,
    /// Optional tighter band applied to the volume ratio the particle keeps.
    pub relaxation: Option<(Real, Real)>,
}

impl Default for WaterParams {
    fn default() -> Self {
        Self {
            bulk_modulus: 200.0,
            dynamic_viscosity: 0.1,
            gamma: 7.0,
            min_j: 0.9,
            max_j: 1.1,
            pressure_offset: 26.0,
            relaxation: None,
        }
    }
}

impl WaterParams {
    /// Relaxation band of the interactive water demo.
    pub const DEMO_RELAXATION: (Real, Real) = (0.95, 1.05);

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.bulk_modulus.is_finite() && self.bulk_modulus > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "bulk_modulus",
                value: self.bulk_modulus,
            });
        }
        if !check::viscosity_ok(self.dynamic_viscosity) {
            return Err(ConfigError::InvalidParameter {
                name: "dynamic_viscosity",
                value: self.dynamic_viscosity,
            });
        }
        if !(self.gamma.is_finite() && self.gamma > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "gamma",
                value: self.gamma,
            });
        }
        if !self.pressure_offset.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "pressure_offset",
                value: self.pressure_offset,
            });
        }
        if !check::range_ok(self.min_j, self.max_j) || self.min_j <= 0.0 {
            return Err(ConfigError::InvalidRange {
                name: "volume_ratio",
                min: self.min_j,
                max: self.max_j,
            });
        }
        if let Some((min, max)) = self.relaxation {
            if !check::range_ok(min, max) || min <= 0.0 {
                return Err(ConfigError::InvalidRange {
                    name: "relaxation",
                    min,
                    max,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct WaterModel {
    params: WaterParams,
}

impl WaterModel {
    pub fn new(params: WaterParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &WaterParams {
        &self.params
    }

    pub fn set_params(&mut self, params: WaterParams) -> Result<(), ConfigError> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    pub fn set_bulk_modulus(&mut self, bulk_modulus: Real) -> Result<(), ConfigError> {
        self.set_params(WaterParams {
            bulk_modulus,
            ..self.params
        })
    }

    pub fn set_viscosity(&mut self, dynamic_viscosity: Real) -> Result<(), ConfigError> {
        self.set_params(WaterParams {
            dynamic_viscosity,
            ..self.params
        })
    }

    pub fn set_gamma(&mut self, gamma: Real) -> Result<(), ConfigError> {
        self.set_params(WaterParams {
            gamma,
            ..self.params
        })
    }

    pub fn set_volume_bounds(&mut self, min_j: Real, max_j: Real) -> Result<(), ConfigError> {
        self.set_params(WaterParams {
            min_j,
            max_j,
            ..self.params
        })
    }

    fn checked_jacobian(j: Real) -> Result<Real, MaterialError> {
        if !j.is_finite() {
            return Err(MaterialError::NonFiniteJacobian { j });
        }
        if j <= 0.0 {
            return Err(MaterialError::NonPositiveJacobian { j });
        }
        Ok(j)
    }
}

impl MaterialModel for WaterModel {
    fn material_properties(&self, particle: &Particle) -> Result<LameParameters, MaterialError> {
        let p = &self.params;
        let raw = particle.jacobian();
        if !raw.is_finite() {
            return Err(MaterialError::NonFiniteJacobian { j: raw });
        }

        let (j, overshoot) = utils::clamp_with_overshoot(raw, p.min_j, p.max_j);
        if overshoot > 0.0 {
            debug!("water volume ratio {raw} outside [{}, {}], clamped", p.min_j, p.max_j);
        }

        let pressure = physics::tait_pressure(p.bulk_modulus, j, p.gamma, p.pressure_offset);
        let lame = LameParameters::new(p.dynamic_viscosity, pressure / j);
        if !lame.is_finite() {
            return Err(MaterialError::NonFiniteLame {
                lambda: lame.lambda,
                mu: lame.mu,
            });
        }
        Ok(lame)
    }

    fn update_deformation_gradient(
        &self,
        particle: &mut Particle,
        candidate: Matrix,
    ) -> Result<(), MaterialError> {
        let p = &self.params;
        let j = Self::checked_jacobian(candidate.determinant())?;

        let (clamped, overshoot) = utils::clamp_with_overshoot(j, p.min_j, p.max_j);
        particle.stability = overshoot;

        let target = match p.relaxation {
            Some((min, max)) => clamped.clamp(min, max),
            None => clamped,
        };

        particle.deformation_gradient = candidate * (target / j).sqrt();
        particle.plastic_jacobian = target;
        Ok(())
    }
}
