pub mod grid;
pub mod kernel;
pub mod mpm_state;
pub mod particle;
pub mod particle_set;

pub use grid::{BoundaryHandling, Cell, Grid, apply_boundary_conditions, node_index};
pub use kernel::{GridInterpolation, KERNEL_SIZE, NEIGHBOR_COUNT, inv_d, quadratic_weights};
pub use mpm_state::MpmState;
pub use particle::Particle;
pub use particle_set::ParticleSet;
