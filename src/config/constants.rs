// Reference constants for the MLS-MPM stepper and the demo scenarios.
use crate::math::Real;

// Grid and time integration
pub const GRID_RESOLUTION: usize = 90;
pub const TIME_STEP: Real = 1.0e-4;
pub const BOUNDARY: Real = 0.05;

// Global physics
pub const GRAVITY: Real = -200.0;
pub const PARTICLE_MASS: Real = 1.0;
pub const PARTICLE_VOLUME: Real = 1.0;

// Scale applied to a user-injected force when it reaches a particle's velocity.
pub const FORCE_SCALE: Real = 100.0;

// Scene sampling
pub const SAMPLES_PER_OBJECT: usize = 1000;
pub const SQUARE_HALF_WIDTH: Real = 0.08;
pub const LATTICE_SPACING: Real = 0.005;
