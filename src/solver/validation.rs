//! Per-step divergence checks.
//!
//! The transfer loops stay free of diagnostics; these run once after the
//! scatter and once after the gather and turn the first NaN or infinity into
//! a [`SimulationError`] naming the particle involved.

use crate::config::SolverParams;
use crate::core::{Grid, Particle};
use crate::error::{Quantity, Result, SimulationError};
use crate::materials::MaterialModel;
use crate::math::matrix_is_finite;

use super::p2g::affine_contribution;

fn non_finite(index: usize, quantity: Quantity, particle: &Particle) -> SimulationError {
    SimulationError::NonFinite {
        index,
        quantity,
        particle: Box::new(particle.clone()),
    }
}

/// Checks the grid after the scatter. On failure, looks for the particle
/// whose state or stress produced the bad value before falling back to the
/// node index alone.
pub fn validate_grid<M: MaterialModel + ?Sized>(
    grid: &Grid,
    particles: &[Particle],
    params: &SolverParams,
    model: &M,
) -> Result<()> {
    let Some(node) = grid.first_non_finite() else {
        return Ok(());
    };

    for (index, particle) in particles.iter().enumerate() {
        if let Some(quantity) = particle.first_non_finite() {
            return Err(non_finite(index, quantity, particle));
        }
        let affine = affine_contribution(particle, model, params)
            .map_err(|source| SimulationError::material(index, source))?;
        if !matrix_is_finite(&affine) {
            return Err(non_finite(index, Quantity::Stress, particle));
        }
    }
    Err(SimulationError::NonFiniteGrid { node })
}

/// Checks every particle after the gather.
pub fn validate_particles(particles: &[Particle]) -> Result<()> {
    match particles
        .iter()
        .enumerate()
        .find_map(|(index, p)| p.first_non_finite().map(|q| (index, q)))
    {
        Some((index, quantity)) => Err(non_finite(index, quantity, &particles[index])),
        None => Ok(()),
    }
}
