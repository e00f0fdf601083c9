use bevy::log::debug;

use crate::config::SolverParams;
use crate::error::{ConfigError, Result};
use crate::materials::MaterialModel;
use crate::math::{Real, Vector, zero_vector};
use crate::solver;

use super::grid::Grid;
use super::particle::Particle;
use super::particle_set::ParticleSet;

/// Aggregate simulation state for the solver.
#[derive(Clone, Debug)]
pub struct MpmState {
    particle_set: ParticleSet,
    grid: Grid,
    solver_params: SolverParams,
}

impl Default for MpmState {
    fn default() -> Self {
        let solver_params = SolverParams::default();
        Self {
            particle_set: ParticleSet::new(),
            grid: Grid::new(solver_params.resolution()),
            solver_params,
        }
    }
}

impl MpmState {
    pub fn new(solver_params: SolverParams) -> std::result::Result<Self, ConfigError> {
        solver_params.validate()?;
        Ok(Self {
            particle_set: ParticleSet::new(),
            grid: Grid::new(solver_params.resolution()),
            solver_params,
        })
    }

    pub fn particle_set(&self) -> &ParticleSet {
        &self.particle_set
    }

    pub fn particle_set_mut(&mut self) -> &mut ParticleSet {
        &mut self.particle_set
    }

    pub fn particle_count(&self) -> usize {
        self.particle_set.len()
    }

    pub fn particles(&self) -> &[Particle] {
        self.particle_set.particles()
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        self.particle_set.particles_mut()
    }

    pub fn add_particle(&mut self, particle: Particle) -> usize {
        self.particle_set.push(particle)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn solver_params(&self) -> &SolverParams {
        &self.solver_params
    }

    /// Replaces the parameters; a resolution change resizes the grid.
    pub fn set_solver_params(
        &mut self,
        solver_params: SolverParams,
    ) -> std::result::Result<(), ConfigError> {
        solver_params.validate()?;
        if solver_params.resolution() != self.grid.resolution() {
            debug!(
                "grid resolution {} -> {}",
                self.grid.resolution(),
                solver_params.resolution()
            );
            self.grid.resize(solver_params.resolution());
        }
        self.solver_params = solver_params;
        self.particle_set.invalidate_transfer_cache();
        Ok(())
    }

    /// Drops every particle and clears the grid.
    pub fn reset(&mut self) {
        self.particle_set.clear();
        self.zero_grid();
    }

    pub fn zero_grid(&mut self) {
        self.grid.clear();
    }

    /// Stencils for the current positions; fails if a particle left the grid.
    pub fn prepare_transfers(&mut self) -> Result<()> {
        self.particle_set
            .rebuild_transfer_cache(self.solver_params.resolution())
    }

    /// Rebuilds the stencils if particles were added since the last
    /// [`prepare_transfers`](Self::prepare_transfers).
    fn ensure_transfers(&mut self) -> Result<()> {
        if self.particle_set.has_transfer_cache() {
            return Ok(());
        }
        debug!(
            "transfer cache stale ({} particles), rebuilding",
            self.particle_set.len()
        );
        self.prepare_transfers()
    }

    pub fn particle_to_grid<M: MaterialModel + ?Sized>(&mut self, model: &M) -> Result<()> {
        self.ensure_transfers()?;
        let (particles, cache) = self.particle_set.particles_and_cache();

        #[cfg(feature = "parallel")]
        solver::par_particle_to_grid(&mut self.grid, particles, cache, &self.solver_params, model)?;
        #[cfg(not(feature = "parallel"))]
        solver::particle_to_grid(&mut self.grid, particles, cache, &self.solver_params, model)?;

        solver::validate_grid(&self.grid, particles, &self.solver_params, model)
    }

    pub fn grid_update(&mut self) {
        solver::grid_update(&mut self.grid, &self.solver_params);
    }

    pub fn grid_to_particle<M: MaterialModel + ?Sized>(&mut self, model: &M) -> Result<()> {
        self.ensure_transfers()?;
        let (particles, cache) = self.particle_set.particles_mut_and_cache();

        #[cfg(feature = "parallel")]
        solver::par_grid_to_particle(&self.grid, particles, cache, &self.solver_params, model)?;
        #[cfg(not(feature = "parallel"))]
        solver::grid_to_particle(&self.grid, particles, cache, &self.solver_params, model)?;

        solver::validate_particles(particles)
    }

    /// One full step: reset grid, scatter, grid update, gather.
    pub fn step<M: MaterialModel + ?Sized>(&mut self, model: &M) -> Result<()> {
        self.zero_grid();
        self.prepare_transfers()?;
        self.particle_to_grid(model)?;
        self.grid_update();
        self.grid_to_particle(model)
    }

    pub fn total_grid_mass(&self) -> Real {
        self.grid.total_mass()
    }

    pub fn total_particle_mass(&self) -> Real {
        self.solver_params.particle_mass() * self.particle_set.len() as Real
    }

    pub fn total_momentum(&self) -> Vector {
        let mass = self.solver_params.particle_mass();
        self.particle_set
            .iter()
            .fold(zero_vector(), |acc, p| acc + p.velocity * mass)
    }

    pub fn unstable_particle_count(&self) -> usize {
        self.particle_set.unstable_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BoundaryHandling;
    use crate::error::SimulationError;
    use crate::materials::{MaterialTag, SnowModel, TissueModel, WaterModel};
    use crate::math::diagonal_from_value;
    use approx::assert_relative_eq;

    #[test]
    fn scatter_conserves_particle_mass() {
        let mut state = MpmState::default();
        for k in 0..50 {
            let t = k as Real / 50.0;
            state.add_particle(Particle::new(
                Vector::new(0.4 + 0.2 * t, 0.3 + 0.1 * t),
                MaterialTag::Snow,
                0,
            ));
        }
        state.zero_grid();
        state.prepare_transfers().unwrap();
        state.particle_to_grid(&SnowModel::default()).unwrap();
        assert_relative_eq!(state.total_grid_mass(), state.total_particle_mass(), epsilon = 1.0e-9);
        assert_relative_eq!(state.total_particle_mass(), 50.0);
    }

    #[test]
    fn stages_cover_particles_added_after_prepare() {
        let mut state = MpmState::default();
        state.add_particle(Particle::new(Vector::new(0.5, 0.5), MaterialTag::Snow, 0));
        state.zero_grid();
        state.prepare_transfers().unwrap();
        state.add_particle(Particle::new(Vector::new(0.3, 0.3), MaterialTag::Snow, 0));

        state.particle_to_grid(&SnowModel::default()).unwrap();
        assert_relative_eq!(state.total_grid_mass(), 2.0, epsilon = 1.0e-9);

        state.grid_update();
        state.add_particle(Particle::new(Vector::new(0.7, 0.7), MaterialTag::Snow, 0));
        state.grid_to_particle(&SnowModel::default()).unwrap();
        assert!(state.particles()[1].velocity.y < 0.0);
        // No mass was scattered around the late particle.
        assert_eq!(state.particles()[2].velocity, Vector::ZERO);
    }

    #[test]
    fn late_particle_outside_the_grid_fails_the_scatter() {
        let mut state = MpmState::default();
        state.add_particle(Particle::new(Vector::new(0.5, 0.5), MaterialTag::Snow, 0));
        state.prepare_transfers().unwrap();
        state.add_particle(Particle::new(Vector::new(-0.2, 0.5), MaterialTag::Snow, 0));
        assert!(matches!(
            state.particle_to_grid(&SnowModel::default()),
            Err(SimulationError::OutOfDomain { index: 1, .. })
        ));
    }

    #[test]
    fn compressed_water_counts_as_unstable() {
        let model = WaterModel::default();
        let mut state = MpmState::default();
        state.add_particle(
            Particle::new(Vector::new(0.3, 0.5), MaterialTag::Water, 0)
                .with_deformation_gradient(diagonal_from_value(1.3_f64.sqrt())),
        );
        state.add_particle(Particle::new(Vector::new(0.7, 0.5), MaterialTag::Water, 0));
        assert_eq!(state.unstable_particle_count(), 0);

        state.step(&model).unwrap();
        assert_eq!(state.unstable_particle_count(), 1);
        assert!(state.particles()[0].is_unstable());
        let jp = state.particles()[0].plastic_jacobian;
        assert!((0.9..=1.1).contains(&jp));
        assert!(!state.particles()[1].is_unstable());
    }

    #[test]
    fn resolution_change_resizes_the_grid() {
        let mut state = MpmState::default();
        let params = SolverParams::default()
            .with_resolution(80)
            .unwrap()
            .with_boundary_handling(BoundaryHandling::Stick);
        state.set_solver_params(params).unwrap();
        assert_eq!(state.grid().resolution(), 80);
        assert_eq!(state.grid().cells().len(), 81 * 81);
        assert_eq!(state.solver_params().boundary_handling(), BoundaryHandling::Stick);
    }

    #[test]
    fn step_reports_particles_leaving_the_domain() {
        let mut state = MpmState::default();
        state.add_particle(Particle::new(Vector::new(0.5, 0.5), MaterialTag::TissueSoft, 0));
        state.add_particle(Particle::new(Vector::new(1.5, 0.5), MaterialTag::TissueSoft, 0));
        assert!(matches!(
            state.step(&TissueModel::default()),
            Err(SimulationError::OutOfDomain { index: 1, .. })
        ));
    }

    #[test]
    fn reset_clears_particles_and_grid() {
        let mut state = MpmState::default();
        state.add_particle(Particle::new(Vector::new(0.5, 0.5), MaterialTag::Snow, 0));
        state.step(&SnowModel::default()).unwrap();
        assert!(state.total_grid_mass() > 0.0);

        state.reset();
        assert_eq!(state.particle_count(), 0);
        assert_eq!(state.total_grid_mass(), 0.0);
        assert_eq!(state.total_momentum(), Vector::ZERO);
    }
}
