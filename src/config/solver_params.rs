use crate::config::constants;
use crate::core::BoundaryHandling;
use crate::error::ConfigError;
use crate::math::Real;

/// Solver parameters shared by every particle of a simulation instance.
///
/// Fields are private so that every change goes through a validating setter;
/// the cell width and its inverse are derived from the resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverParams {
    resolution: usize,
    dt: Real,
    boundary: Real,
    gravity: Real,
    particle_mass: Real,
    particle_volume: Real,
    force_scale: Real,
    boundary_handling: BoundaryHandling,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            resolution: constants::GRID_RESOLUTION,
            dt: constants::TIME_STEP,
            boundary: constants::BOUNDARY,
            gravity: constants::GRAVITY,
            particle_mass: constants::PARTICLE_MASS,
            particle_volume: constants::PARTICLE_VOLUME,
            force_scale: constants::FORCE_SCALE,
            boundary_handling: BoundaryHandling::Separate,
        }
    }
}

impl SolverParams {
    pub fn new(resolution: usize, dt: Real) -> Result<Self, ConfigError> {
        let mut params = Self::default();
        params.set_resolution(resolution)?;
        params.set_time_step(dt)?;
        Ok(params)
    }

    /// Grid resolution `n`; the grid stores `(n + 1)²` nodes.
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn dt(&self) -> Real {
        self.dt
    }

    /// Cell width `dx = 1 / n`.
    pub fn dx(&self) -> Real {
        1.0 / self.resolution as Real
    }

    pub fn inv_dx(&self) -> Real {
        self.resolution as Real
    }

    /// Wall thickness as a fraction of the unit domain.
    pub fn boundary(&self) -> Real {
        self.boundary
    }

    /// Vertical acceleration applied on the grid.
    pub fn gravity(&self) -> Real {
        self.gravity
    }

    pub fn particle_mass(&self) -> Real {
        self.particle_mass
    }

    pub fn particle_volume(&self) -> Real {
        self.particle_volume
    }

    pub fn force_scale(&self) -> Real {
        self.force_scale
    }

    pub fn boundary_handling(&self) -> BoundaryHandling {
        self.boundary_handling
    }

    pub fn set_resolution(&mut self, resolution: usize) -> Result<(), ConfigError> {
        if resolution < 4 {
            return Err(ConfigError::InvalidResolution(resolution));
        }
        self.resolution = resolution;
        Ok(())
    }

    pub fn set_time_step(&mut self, dt: Real) -> Result<(), ConfigError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(ConfigError::InvalidTimeStep(dt));
        }
        self.dt = dt;
        Ok(())
    }

    pub fn set_boundary(&mut self, boundary: Real) -> Result<(), ConfigError> {
        if !(0.0..0.5).contains(&boundary) {
            return Err(ConfigError::InvalidBoundary(boundary));
        }
        self.boundary = boundary;
        Ok(())
    }

    pub fn set_gravity(&mut self, gravity: Real) -> Result<(), ConfigError> {
        if !gravity.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "gravity",
                value: gravity,
            });
        }
        self.gravity = gravity;
        Ok(())
    }

    pub fn set_particle_mass(&mut self, mass: Real) -> Result<(), ConfigError> {
        self.particle_mass = positive("particle_mass", mass)?;
        Ok(())
    }

    pub fn set_particle_volume(&mut self, volume: Real) -> Result<(), ConfigError> {
        self.particle_volume = positive("particle_volume", volume)?;
        Ok(())
    }

    pub fn set_force_scale(&mut self, scale: Real) -> Result<(), ConfigError> {
        if !(scale.is_finite() && scale >= 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "force_scale",
                value: scale,
            });
        }
        self.force_scale = scale;
        Ok(())
    }

    pub fn set_boundary_handling(&mut self, handling: BoundaryHandling) {
        self.boundary_handling = handling;
    }

    /// Builder-style variants of the setters, for scenario presets.
    pub fn with_resolution(mut self, resolution: usize) -> Result<Self, ConfigError> {
        self.set_resolution(resolution)?;
        Ok(self)
    }

    pub fn with_gravity(mut self, gravity: Real) -> Result<Self, ConfigError> {
        self.set_gravity(gravity)?;
        Ok(self)
    }

    pub fn with_boundary_handling(mut self, handling: BoundaryHandling) -> Self {
        self.boundary_handling = handling;
        self
    }

    /// Re-checks every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut copy = Self::default();
        copy.set_resolution(self.resolution)?;
        copy.set_time_step(self.dt)?;
        copy.set_boundary(self.boundary)?;
        copy.set_gravity(self.gravity)?;
        copy.set_particle_mass(self.particle_mass)?;
        copy.set_particle_volume(self.particle_volume)?;
        copy.set_force_scale(self.force_scale)?;
        Ok(())
    }
}

pub(crate) fn positive(name: &'static str, value: Real) -> Result<Real, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}
