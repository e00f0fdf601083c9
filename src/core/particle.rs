//! Material particles for MPM simulation
//!
//! Particles carry position, velocity, deformation state and the material tag
//! that selects their constitutive behavior.

use crate::error::Quantity;
use crate::materials::MaterialTag;
use crate::math::{
    Matrix, Real, Vector, identity_matrix, matrix_determinant, matrix_is_finite, zero_matrix,
    zero_vector,
};

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// World position in the unit square.
    pub position: Vector,
    pub velocity: Vector,
    pub deformation_gradient: Matrix,
    pub affine_momentum_matrix: Matrix, // APIC C matrix
    /// Volume ratio tracked by the material model (`Jp`).
    pub plastic_jacobian: Real,
    pub material: MaterialTag,
    /// Display color, `0xRRGGBB`.
    pub color: u32,
    /// Magnitude of the latest volume-bound violation; 0 when within bounds.
    pub stability: Real,
    /// One-shot force consumed by the next grid-to-particle gather.
    pub external_force: Option<Vector>,
}

impl Particle {
    pub fn new(position: Vector, material: MaterialTag, color: u32) -> Self {
        Self {
            position,
            velocity: zero_vector(),
            deformation_gradient: identity_matrix(),
            affine_momentum_matrix: zero_matrix(),
            plastic_jacobian: 1.0,
            material,
            color,
            stability: 0.0,
            external_force: None,
        }
    }

    pub fn with_velocity(mut self, velocity: Vector) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_deformation_gradient(mut self, deformation_gradient: Matrix) -> Self {
        self.deformation_gradient = deformation_gradient;
        self
    }

    #[inline(always)]
    pub fn jacobian(&self) -> Real {
        matrix_determinant(&self.deformation_gradient)
    }

    #[inline(always)]
    pub fn is_unstable(&self) -> bool {
        self.stability > 0.0
    }

    /// Takes the pending external force, leaving none behind.
    #[inline]
    pub fn take_external_force(&mut self) -> Option<Vector> {
        self.external_force.take()
    }

    /// First state quantity holding a NaN or an infinity, if any.
    pub fn first_non_finite(&self) -> Option<Quantity> {
        if !self.position.is_finite() {
            Some(Quantity::Position)
        } else if !self.velocity.is_finite() {
            Some(Quantity::Velocity)
        } else if !matrix_is_finite(&self.deformation_gradient) {
            Some(Quantity::DeformationGradient)
        } else if !matrix_is_finite(&self.affine_momentum_matrix) {
            Some(Quantity::AffineMomentum)
        } else if !self.plastic_jacobian.is_finite() {
            Some(Quantity::PlasticJacobian)
        } else {
            None
        }
    }
}
