//! Grid-to-Particle (G2P) transfer operations
//!
//! Transfers velocities and velocity gradients from grid nodes back to particles.
//! Updates particle positions and deformation state.

use crate::config::SolverParams;
use crate::core::grid::{Cell, Grid, node_index};
use crate::core::kernel::GridInterpolation;
use crate::core::Particle;
use crate::error::{MaterialError, Result, SimulationError};
use crate::materials::MaterialModel;
use crate::math::{identity_matrix, outer_product, zero_matrix, zero_vector};

/// Gathers velocity and the APIC matrix for one particle, advects it and
/// hands the candidate deformation gradient to the material model.
#[inline(always)]
pub fn gather_particle<M: MaterialModel + ?Sized>(
    cells: &[Cell],
    side: usize,
    particle: &mut Particle,
    interpolation: &GridInterpolation,
    params: &SolverParams,
    model: &M,
) -> std::result::Result<(), MaterialError> {
    let apic_scale = 4.0 * params.inv_dx();
    let dt = params.dt();

    let mut velocity = zero_vector();
    let mut affine = zero_matrix();
    for (coord, weight, offset) in interpolation.iter_neighbors() {
        let weighted_velocity = cells[node_index(coord, side)].velocity * weight;
        velocity += weighted_velocity;
        affine += outer_product(weighted_velocity, offset) * apic_scale;
    }

    if let Some(force) = particle.take_external_force() {
        velocity += force * params.force_scale();
    }

    particle.velocity = velocity;
    particle.affine_momentum_matrix = affine;
    particle.position += velocity * dt;

    // MLS-MPM deformation update: F' = (I + dt·C)·F
    let candidate = (identity_matrix() + affine * dt) * particle.deformation_gradient;
    model.update_deformation_gradient(particle, candidate)
}

/// Sequential gather for every particle, reusing the scatter's stencils.
pub fn grid_to_particle<M: MaterialModel + ?Sized>(
    grid: &Grid,
    particles: &mut [Particle],
    cache: &[GridInterpolation],
    params: &SolverParams,
    model: &M,
) -> Result<()> {
    debug_assert_eq!(particles.len(), cache.len());
    let side = grid.side();
    let cells = grid.cells();

    for (index, (particle, interpolation)) in particles.iter_mut().zip(cache).enumerate() {
        gather_particle(cells, side, particle, interpolation, params, model)
            .map_err(|source| SimulationError::material(index, source))?;
    }
    Ok(())
}
