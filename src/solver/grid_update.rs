use crate::config::SolverParams;
use crate::core::Grid;

/// Grid update stage (divides momentum by mass, applies gravity, enforces boundaries).
pub fn grid_update(grid: &mut Grid, params: &SolverParams) {
    grid.calculate_grid_velocities(
        params.gravity(),
        params.dt(),
        params.boundary(),
        params.boundary_handling(),
    );
}
