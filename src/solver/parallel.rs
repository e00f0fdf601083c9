//! Rayon-backed transfers.
//!
//! The scatter folds particles into private per-worker grids and sums them
//! node by node, so no two workers ever write the same memory. The gather
//! only reads the grid and writes its own particle.

use rayon::prelude::*;

use crate::config::SolverParams;
use crate::core::grid::{Cell, Grid};
use crate::core::kernel::GridInterpolation;
use crate::core::Particle;
use crate::error::{Result, SimulationError};
use crate::materials::MaterialModel;

use super::g2p::gather_particle;
use super::p2g::{affine_contribution, scatter_particle};

pub fn par_particle_to_grid<M: MaterialModel + ?Sized>(
    grid: &mut Grid,
    particles: &[Particle],
    cache: &[GridInterpolation],
    params: &SolverParams,
    model: &M,
) -> Result<()> {
    debug_assert_eq!(particles.len(), cache.len());
    let side = grid.side();
    let node_count = grid.cells().len();

    let merged = particles
        .par_iter()
        .zip(cache.par_iter())
        .enumerate()
        .try_fold(
            || vec![Cell::zeroed(); node_count],
            |mut cells, (index, (particle, interpolation))| {
                let affine = affine_contribution(particle, model, params)
                    .map_err(|source| SimulationError::material(index, source))?;
                scatter_particle(&mut cells, side, particle, interpolation, affine, params);
                Ok(cells)
            },
        )
        .try_reduce(
            || vec![Cell::zeroed(); node_count],
            |mut acc, partial| {
                for (node, contribution) in acc.iter_mut().zip(&partial) {
                    node.accumulate(contribution.as_vec3());
                }
                Ok(acc)
            },
        )?;

    grid.cells_mut().copy_from_slice(&merged);
    Ok(())
}

pub fn par_grid_to_particle<M: MaterialModel + ?Sized>(
    grid: &Grid,
    particles: &mut [Particle],
    cache: &[GridInterpolation],
    params: &SolverParams,
    model: &M,
) -> Result<()> {
    debug_assert_eq!(particles.len(), cache.len());
    let side = grid.side();
    let cells = grid.cells();

    particles
        .par_iter_mut()
        .zip(cache.par_iter())
        .enumerate()
        .try_for_each(|(index, (particle, interpolation))| {
            gather_particle(cells, side, particle, interpolation, params, model)
                .map_err(|source| SimulationError::material(index, source))
        })
}
