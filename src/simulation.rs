//! Simulation driver: one scenario, its material model and the solver state,
//! plus the controls an interactive front end needs.

use bevy::log::{debug, error, info};
use bevy::prelude::Resource;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::SolverParams;
use crate::config::constants::SAMPLES_PER_OBJECT;
use crate::core::{MpmState, Particle};
use crate::error::{ConfigError, Result, SimulationError};
use crate::math::{Point, Real, Vector};
use crate::scenes::{Scenario, Spawner, sample_disc};

/// Outcome of a successful [`Simulation::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Advanced,
    Paused,
}

#[derive(Resource)]
pub struct Simulation<S: Scenario> {
    scenario: S,
    model: S::Model,
    state: MpmState,
    rng: StdRng,
    seed: Option<u64>,
    iteration: u64,
    paused: bool,
    failure: Option<SimulationError>,
}

impl<S: Scenario> Simulation<S> {
    /// Builds an empty simulation with the scenario's own solver parameters.
    /// Call [`initialize`](Self::initialize) to seed particles.
    pub fn new(scenario: S) -> std::result::Result<Self, ConfigError> {
        let params = scenario.solver_params()?;
        Self::build(scenario, params, None)
    }

    /// Like [`new`](Self::new) with a fixed sampling seed; restarts replay the
    /// same initial particles.
    pub fn with_seed(scenario: S, seed: u64) -> std::result::Result<Self, ConfigError> {
        let params = scenario.solver_params()?;
        Self::build(scenario, params, Some(seed))
    }

    pub fn with_params(
        scenario: S,
        params: SolverParams,
        seed: Option<u64>,
    ) -> std::result::Result<Self, ConfigError> {
        Self::build(scenario, params, seed)
    }

    fn build(
        scenario: S,
        params: SolverParams,
        seed: Option<u64>,
    ) -> std::result::Result<Self, ConfigError> {
        let model = scenario.model()?;
        let state = MpmState::new(params)?;
        Ok(Self {
            scenario,
            model,
            state,
            rng: Self::make_rng(seed),
            seed,
            iteration: 0,
            paused: false,
            failure: None,
        })
    }

    fn make_rng(seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Populates the initial particles of the scenario.
    pub fn initialize(&mut self) {
        let resolution = self.state.solver_params().resolution();
        let mut spawner = Spawner::new(self.state.particle_set_mut(), resolution);
        self.scenario.populate(&mut spawner, &mut self.rng);
        info!(
            "{}: initialized {} particles on a {}x{} grid",
            self.scenario.name(),
            self.state.particle_count(),
            resolution,
            resolution
        );
    }

    /// Runs one step unless paused. After a failed step every call returns
    /// [`SimulationError::Halted`] until [`restart`](Self::restart).
    pub fn advance(&mut self) -> Result<StepStatus> {
        if let Some(failure) = &self.failure {
            return Err(SimulationError::Halted(Box::new(failure.clone())));
        }
        if self.paused {
            return Ok(StepStatus::Paused);
        }

        if let Err(err) = self.state.step(&self.model) {
            error!(
                "{}: step {} failed, halting: {err}",
                self.scenario.name(),
                self.iteration
            );
            self.failure = Some(err.clone());
            return Err(err);
        }

        self.scenario
            .after_step(self.iteration, self.state.particle_set_mut());
        self.iteration += 1;
        Ok(StepStatus::Advanced)
    }

    /// Runs up to `steps` steps; stops early when paused.
    pub fn advance_by(&mut self, steps: usize) -> Result<usize> {
        let mut advanced = 0;
        for _ in 0..steps {
            match self.advance()? {
                StepStatus::Advanced => advanced += 1,
                StepStatus::Paused => break,
            }
        }
        Ok(advanced)
    }

    /// Discards all particles and the failure state, then re-initializes.
    pub fn restart(&mut self) {
        self.state.reset();
        self.iteration = 0;
        self.failure = None;
        self.rng = Self::make_rng(self.seed);
        info!("{}: restart", self.scenario.name());
        self.initialize();
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Samples a disc of particles at runtime. Samples whose stencil would
    /// leave the grid are dropped; returns how many were inserted.
    pub fn add_object(&mut self, position: Point, radius: Real, color: u32) -> usize {
        let resolution = self.state.solver_params().resolution();
        let positions = sample_disc(position, radius, SAMPLES_PER_OBJECT, &mut self.rng);
        let material = self.scenario.object_material();
        let inserted = Spawner::new(self.state.particle_set_mut(), resolution)
            .spawn(positions, material, color);
        debug!(
            "added {inserted} {} particles at ({:.3}, {:.3})",
            material.name(),
            position.x,
            position.y
        );
        inserted
    }

    /// Queues `force` on every particle strictly within `radius` of
    /// `position`, replacing any force still pending. Returns how many
    /// particles were hit.
    pub fn apply_force(&mut self, position: Point, force: Vector, radius: Real) -> usize {
        let mut count = 0;
        for particle in self
            .state
            .particle_set_mut()
            .within_radius_mut(position, radius)
        {
            particle.external_force = Some(force);
            count += 1;
        }
        debug!(
            "force ({:.4}, {:.4}) on {count} particles around ({:.3}, {:.3})",
            force.x, force.y, position.x, position.y
        );
        count
    }

    pub fn particles(&self) -> &[Particle] {
        self.state.particles()
    }

    /// Completed steps since the last (re)start.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn failure(&self) -> Option<&SimulationError> {
        self.failure.as_ref()
    }

    pub fn is_halted(&self) -> bool {
        self.failure.is_some()
    }

    pub fn scenario(&self) -> &S {
        &self.scenario
    }

    pub fn model(&self) -> &S::Model {
        &self.model
    }

    /// Live access to the material model, e.g. for parameter sliders.
    pub fn model_mut(&mut self) -> &mut S::Model {
        &mut self.model
    }

    pub fn state(&self) -> &MpmState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut MpmState {
        &mut self.state
    }

    pub fn solver_params(&self) -> &SolverParams {
        self.state.solver_params()
    }

    pub fn set_solver_params(
        &mut self,
        params: SolverParams,
    ) -> std::result::Result<(), ConfigError> {
        self.state.set_solver_params(params)
    }
}
