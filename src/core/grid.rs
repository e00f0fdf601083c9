//! Background grid for MPM simulation
//!
//! `(n + 1)²` nodes over the unit square, rebuilt from scratch every step.

use bevy::math::IVec2;

use crate::math::{Real, Vector, Vector3, zero_vector};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    /// Momentum while particles scatter, velocity once normalized by mass.
    pub velocity: Vector,
    pub mass: Real,
}

impl Cell {
    #[inline(always)]
    pub fn zeroed() -> Self {
        Self {
            velocity: zero_vector(),
            mass: 0.0,
        }
    }

    #[inline(always)]
    pub fn zero(&mut self) {
        self.velocity = zero_vector();
        self.mass = 0.0;
    }

    /// `(momentum_x, momentum_y, mass)` packed as one vector.
    #[inline(always)]
    pub fn as_vec3(&self) -> Vector3 {
        self.velocity.extend(self.mass)
    }

    #[inline(always)]
    pub fn accumulate(&mut self, contribution: Vector3) {
        self.velocity += contribution.truncate();
        self.mass += contribution.z;
    }

    #[inline(always)]
    pub fn is_finite(&self) -> bool {
        self.velocity.is_finite() && self.mass.is_finite()
    }
}

// Boundary handling modes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BoundaryHandling {
    /// Walls and ceiling stick; the floor only stops downward motion.
    #[default]
    Separate,
    /// All four sides stick.
    Stick,
}

#[derive(Clone, Debug)]
pub struct Grid {
    resolution: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(resolution: usize) -> Self {
        let side = resolution + 1;
        Self {
            resolution,
            cells: vec![Cell::zeroed(); side * side],
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Nodes per side, `n + 1`.
    #[inline(always)]
    pub fn side(&self) -> usize {
        self.resolution + 1
    }

    #[inline(always)]
    pub fn index(&self, i: usize, j: usize) -> usize {
        i + self.side() * j
    }

    /// Linear index of a node coordinate; `None` outside the grid.
    #[inline(always)]
    pub fn coord_index(&self, coord: IVec2) -> Option<usize> {
        let side = self.side() as i32;
        if coord.x < 0 || coord.y < 0 || coord.x >= side || coord.y >= side {
            None
        } else {
            Some(node_index(coord, self.side()))
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub fn get(&self, i: usize, j: usize) -> Option<&Cell> {
        if i > self.resolution || j > self.resolution {
            return None;
        }
        self.cells.get(self.index(i, j))
    }

    /// Zeroes mass and velocity of every node.
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(Cell::zero);
    }

    /// Changes the resolution and clears every node.
    pub fn resize(&mut self, resolution: usize) {
        let side = resolution + 1;
        self.resolution = resolution;
        self.cells.clear();
        self.cells.resize(side * side, Cell::zeroed());
    }

    pub fn total_mass(&self) -> Real {
        self.cells.iter().map(|cell| cell.mass).sum()
    }

    pub fn active_cell_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.mass > 0.0).count()
    }

    /// Index of the first node holding a NaN or infinity.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.cells.iter().position(|cell| !cell.is_finite())
    }

    /// Normalizes momentum by mass, applies gravity and the boundary policy.
    pub fn calculate_grid_velocities(
        &mut self,
        gravity: Real,
        dt: Real,
        boundary: Real,
        handling: BoundaryHandling,
    ) {
        let side = self.side();
        let inv_n = 1.0 / self.resolution as Real;
        let gravity_velocity = Vector::new(0.0, gravity * dt);

        for (index, cell) in self.cells.iter_mut().enumerate() {
            if cell.mass > 0.0 {
                cell.velocity /= cell.mass;
                cell.velocity += gravity_velocity;

                let node = Vector::new((index % side) as Real, (index / side) as Real) * inv_n;
                apply_boundary_conditions(cell, node, boundary, handling);
            }
        }
    }
}

/// Linear index of an in-grid node on a grid with `side` nodes per row.
#[inline(always)]
pub fn node_index(coord: IVec2, side: usize) -> usize {
    coord.x as usize + side * coord.y as usize
}

/// Boundary policy for a node at world position `node`.
#[inline(always)]
pub fn apply_boundary_conditions(
    cell: &mut Cell,
    node: Vector,
    boundary: Real,
    handling: BoundaryHandling,
) {
    let near_wall = node.x < boundary || node.x > 1.0 - boundary;
    let near_ceiling = node.y > 1.0 - boundary;
    let near_floor = node.y < boundary;

    match handling {
        BoundaryHandling::Separate => {
            // stick
            if near_wall || near_ceiling {
                cell.velocity = zero_vector();
            }
            // separate
            if near_floor {
                cell.velocity.y = cell.velocity.y.max(0.0);
            }
        }
        BoundaryHandling::Stick => {
            if near_wall || near_ceiling || near_floor {
                cell.velocity = zero_vector();
            }
        }
    }
}
