use std::marker::PhantomData;

use bevy::prelude::*;

pub mod config;
pub mod core;
pub mod error;
pub mod materials;
pub mod math;
pub mod scenes;
pub mod simulation;
pub mod solver;

// Public re-exports for clean API
pub use crate::config::{SolverParams, constants};
pub use crate::core::{BoundaryHandling, Grid, MpmState, Particle, ParticleSet};
pub use error::{ConfigError, MaterialError, SimulationError};
pub use materials::{MaterialModel, MaterialTag, SnowModel, TissueModel, WaterModel};
pub use scenes::{FoldingBall, Scenario, SnowBlocks, WaterDrops};
pub use simulation::{Simulation, StepStatus};

/// Runs a [`Simulation`] of `S` inside a bevy app, a fixed number of steps
/// per frame.
pub struct MpmPlugin<S> {
    pub scenario: S,
    pub steps_per_frame: usize,
    pub seed: Option<u64>,
}

impl<S: Scenario + Clone> MpmPlugin<S> {
    pub fn new(scenario: S) -> Self {
        Self {
            scenario,
            steps_per_frame: 25,
            seed: None,
        }
    }

    pub fn with_steps_per_frame(mut self, steps_per_frame: usize) -> Self {
        self.steps_per_frame = steps_per_frame;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Steps run by [`advance_simulation`] each frame.
#[derive(Resource)]
pub struct StepsPerFrame<S> {
    pub steps: usize,
    marker: PhantomData<fn() -> S>,
}

impl<S: Scenario + Clone> Plugin for MpmPlugin<S> {
    fn build(&self, app: &mut App) {
        let scenario = self.scenario.clone();
        let simulation = match self.seed {
            Some(seed) => Simulation::with_seed(scenario, seed),
            None => Simulation::new(scenario),
        };
        let mut simulation = match simulation {
            Ok(simulation) => simulation,
            Err(err) => {
                error!("{}: invalid configuration: {err}", self.scenario.name());
                return;
            }
        };
        simulation.initialize();

        app.insert_resource(simulation)
            .insert_resource(StepsPerFrame::<S> {
                steps: self.steps_per_frame,
                marker: PhantomData,
            })
            .add_systems(Update, advance_simulation::<S>);
    }
}

pub fn advance_simulation<S: Scenario>(
    mut simulation: ResMut<Simulation<S>>,
    steps: Res<StepsPerFrame<S>>,
) {
    if simulation.is_halted() {
        return;
    }
    // Failures are logged once by `Simulation::advance`.
    let _ = simulation.advance_by(steps.steps);
}
