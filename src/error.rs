//! Error types for configuration, material models and the stepper.

use std::fmt;

use thiserror::Error;

use crate::core::Particle;
use crate::materials::MaterialTag;
use crate::math::{Real, Vector};

/// Rejected parameter values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid resolution must be at least 4 cells, got {0}")]
    InvalidResolution(usize),

    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(Real),

    #[error("boundary fraction must lie in [0, 0.5), got {0}")]
    InvalidBoundary(Real),

    #[error("invalid value for `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: Real },

    #[error("invalid range for `{name}`: [{min}, {max}]")]
    InvalidRange {
        name: &'static str,
        min: Real,
        max: Real,
    },
}

/// Fatal conditions raised by a constitutive model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MaterialError {
    #[error("hardening factor collapsed to {e}")]
    HardeningCollapsed { e: Real },

    #[error("volume ratio is not finite (J = {j})")]
    NonFiniteJacobian { j: Real },

    #[error("volume ratio must stay positive (J = {j})")]
    NonPositiveJacobian { j: Real },

    #[error("Lamé parameters are not finite (lambda = {lambda}, mu = {mu})")]
    NonFiniteLame { lambda: Real, mu: Real },

    #[error("no constitutive constants for material `{}`", .0.name())]
    UnknownMaterial(MaterialTag),
}

/// Per-particle quantity named in a divergence report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Position,
    Velocity,
    DeformationGradient,
    AffineMomentum,
    PlasticJacobian,
    Stress,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Position => "position",
            Self::Velocity => "velocity",
            Self::DeformationGradient => "deformation gradient",
            Self::AffineMomentum => "affine momentum",
            Self::PlasticJacobian => "plastic volume ratio",
            Self::Stress => "stress",
        };
        f.write_str(name)
    }
}

/// Fatal step failures. The simulation stops iterating once one is raised.
#[derive(Debug, Clone, Error)]
pub enum SimulationError {
    #[error("particle {index}: non-finite {quantity} ({particle:?})")]
    NonFinite {
        index: usize,
        quantity: Quantity,
        particle: Box<Particle>,
    },

    #[error("grid node {node} accumulated a non-finite value")]
    NonFiniteGrid { node: usize },

    #[error("particle {index} at {position} left the grid")]
    OutOfDomain { index: usize, position: Vector },

    #[error("particle {index}: {source}")]
    Material {
        index: usize,
        #[source]
        source: MaterialError,
    },

    #[error("simulation halted: {0}")]
    Halted(Box<SimulationError>),
}

impl SimulationError {
    pub fn material(index: usize, source: MaterialError) -> Self {
        Self::Material { index, source }
    }

    /// Index of the particle this error is about, if any.
    pub fn particle_index(&self) -> Option<usize> {
        match self {
            Self::NonFinite { index, .. }
            | Self::OutOfDomain { index, .. }
            | Self::Material { index, .. } => Some(*index),
            Self::NonFiniteGrid { .. } => None,
            Self::Halted(inner) => inner.particle_index(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
