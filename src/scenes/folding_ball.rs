//! Folding ball
//!
//! A stiff tissue ring around a soft core. The ring "grows" during the first
//! steps by shrinking its deformation gradient, which buckles it inward.

use rand::Rng;

use crate::config::SolverParams;
use crate::config::constants::LATTICE_SPACING;
use crate::core::{BoundaryHandling, ParticleSet};
use crate::error::ConfigError;
use crate::materials::{MaterialTag, TissueModel};
use crate::math::{Point, Real};

use super::sampling::{Spawner, sample_annulus_lattice};
use super::Scenario;

/// Geometric shrink of `F` applied to one material for the first `steps`
/// steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthSchedule {
    pub material: MaterialTag,
    pub factor: Real,
    pub steps: u64,
}

impl Default for GrowthSchedule {
    fn default() -> Self {
        Self {
            material: MaterialTag::TissueHard,
            factor: 0.95,
            steps: 10,
        }
    }
}

impl GrowthSchedule {
    pub fn is_active(&self, step: u64) -> bool {
        step < self.steps
    }
}

#[derive(Debug, Clone)]
pub struct FoldingBall {
    pub center: Point,
    /// Hard ring radii.
    pub ring: (Real, Real),
    /// Soft core radii.
    pub core: (Real, Real),
    pub spacing: Real,
    pub growth: GrowthSchedule,
    /// Per-step velocity multiplier.
    pub damping: Real,
}

impl Default for FoldingBall {
    fn default() -> Self {
        Self {
            center: Point::new(0.5, 0.5),
            ring: (0.22, 0.24),
            core: (0.10, 0.22),
            spacing: LATTICE_SPACING,
            growth: GrowthSchedule::default(),
            damping: 0.9,
        }
    }
}

impl FoldingBall {
    pub const RING_COLOR: u32 = 0xED553B;
    pub const CORE_COLOR: u32 = 0x168587;
}

impl Scenario for FoldingBall {
    type Model = TissueModel;

    fn name(&self) -> &'static str {
        "folding ball"
    }

    fn model(&self) -> Result<TissueModel, ConfigError> {
        if !(self.damping.is_finite() && (0.0..=1.0).contains(&self.damping)) {
            return Err(ConfigError::InvalidParameter {
                name: "damping",
                value: self.damping,
            });
        }
        if !(self.growth.factor.is_finite() && self.growth.factor > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "growth_factor",
                value: self.growth.factor,
            });
        }
        Ok(TissueModel::default())
    }

    fn solver_params(&self) -> Result<SolverParams, ConfigError> {
        Ok(SolverParams::default()
            .with_resolution(80)?
            .with_gravity(0.0)?
            .with_boundary_handling(BoundaryHandling::Stick))
    }

    fn populate<R: Rng + ?Sized>(&self, spawner: &mut Spawner<'_>, _rng: &mut R) {
        let (ring_min, ring_max) = self.ring;
        let (core_min, core_max) = self.core;
        spawner.spawn(
            sample_annulus_lattice(self.center, ring_min, ring_max, self.spacing),
            MaterialTag::TissueHard,
            Self::RING_COLOR,
        );
        spawner.spawn(
            sample_annulus_lattice(self.center, core_min, core_max, self.spacing),
            MaterialTag::TissueSoft,
            Self::CORE_COLOR,
        );
    }

    fn object_material(&self) -> MaterialTag {
        MaterialTag::TissueSoft
    }

    fn after_step(&self, step: u64, particles: &mut ParticleSet) {
        let growing = self.growth.is_active(step);
        for particle in particles.iter_mut() {
            if growing && particle.material == self.growth.material {
                particle.deformation_gradient *= self.growth.factor;
            }
            particle.velocity *= self.damping;
        }
    }
}
