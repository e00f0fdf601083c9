//! Particle-to-Grid (P2G) transfer operations
//!
//! Transfers mass, momentum, and forces from particles to grid nodes.
//! Includes stress calculation and APIC momentum transfer.

use crate::config::SolverParams;
use crate::core::grid::{Cell, Grid, node_index};
use crate::core::kernel::{GridInterpolation, inv_d};
use crate::core::Particle;
use crate::error::{MaterialError, Result, SimulationError};
use crate::materials::MaterialModel;
use crate::math::{Matrix, diagonal_from_value, polar_decomposition};

/// Stress and APIC terms of one particle, premultiplied so that the node at
/// offset `dpos` receives `weight · affine · dpos` of momentum.
///
/// `affine = k1·(2μ(F - R)Fᵀ + λ(J - 1)J·I) + m·C` with
/// `k1 = -4·inv_dx²·dt·vol`.
#[inline]
pub fn affine_contribution<M: MaterialModel + ?Sized>(
    particle: &Particle,
    model: &M,
    params: &SolverParams,
) -> std::result::Result<Matrix, MaterialError> {
    let lame = model.material_properties(particle)?;

    let f = particle.deformation_gradient;
    let j = f.determinant();
    let rotation = polar_decomposition(&f).rotation;

    let k1 = -inv_d(params.dx()) * params.dt() * params.particle_volume();
    let corotated = (f - rotation) * f.transpose() * (2.0 * lame.mu);
    let volumetric = diagonal_from_value(lame.lambda * (j - 1.0) * j);
    let stress = (corotated + volumetric) * k1;

    Ok(stress + particle.affine_momentum_matrix * params.particle_mass())
}

/// Adds one particle's mass and momentum to its 3x3 stencil.
#[inline(always)]
pub fn scatter_particle(
    cells: &mut [Cell],
    side: usize,
    particle: &Particle,
    interpolation: &GridInterpolation,
    affine: Matrix,
    params: &SolverParams,
) {
    let dx = params.dx();
    let mass = params.particle_mass();
    let momentum = particle.velocity * mass;

    for (coord, weight, offset) in interpolation.iter_neighbors() {
        let dpos = offset * dx;
        let contribution = (momentum + affine * dpos).extend(mass) * weight;
        cells[node_index(coord, side)].accumulate(contribution);
    }
}

/// Sequential scatter of every particle. `cache` must hold one stencil per
/// particle, all inside the grid.
pub fn particle_to_grid<M: MaterialModel + ?Sized>(
    grid: &mut Grid,
    particles: &[Particle],
    cache: &[GridInterpolation],
    params: &SolverParams,
    model: &M,
) -> Result<()> {
    debug_assert_eq!(particles.len(), cache.len());
    let side = grid.side();
    let cells = grid.cells_mut();

    for (index, (particle, interpolation)) in particles.iter().zip(cache).enumerate() {
        let affine = affine_contribution(particle, model, params)
            .map_err(|source| SimulationError::material(index, source))?;
        scatter_particle(cells, side, particle, interpolation, affine, params);
    }
    Ok(())
}
