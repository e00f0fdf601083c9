// src/solver/mod.rs
pub mod g2p;
pub mod grid_update;
pub mod p2g;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod validation;

// Re-export from the solver module
pub use g2p::{gather_particle, grid_to_particle};
pub use grid_update::grid_update;
pub use p2g::{affine_contribution, particle_to_grid, scatter_particle};
#[cfg(feature = "parallel")]
pub use parallel::{par_grid_to_particle, par_particle_to_grid};
pub use validation::{validate_grid, validate_particles};
