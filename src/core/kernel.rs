use bevy::math::IVec2;

use crate::math::{Real, Vector};

/// Width of the quadratic B-spline stencil along each axis.
pub const KERNEL_SIZE: usize = 3;
/// Number of grid nodes touched by one particle.
pub const NEIGHBOR_COUNT: usize = KERNEL_SIZE * KERNEL_SIZE;

/// Inverse of the quadratic kernel's inertia-like tensor, `D⁻¹ = 4 / dx²`.
#[inline]
pub fn inv_d(cell_width: Real) -> Real {
    4.0 / (cell_width * cell_width)
}

/// Quadratic B-spline weights for the three nodes along each axis, given the
/// particle's offset `fx` from the stencil's base node in grid units.
#[inline(always)]
pub fn quadratic_weights(fx: Vector) -> [Vector; KERNEL_SIZE] {
    let a = Vector::splat(1.5) - fx;
    let b = fx - Vector::ONE;
    let c = fx - Vector::splat(0.5);
    [
        0.5 * a * a,
        Vector::splat(0.75) - b * b,
        0.5 * c * c,
    ]
}

/// Stencil of one particle: base node, fractional offset and kernel weights.
///
/// Computed once per particle per step and shared by the scatter and the
/// gather, so both transfers see identical weights.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridInterpolation {
    pub base_coord: IVec2,
    pub fx: Vector,
    pub weights: [Vector; KERNEL_SIZE],
}

impl GridInterpolation {
    #[inline(always)]
    pub fn compute_for_particle(position: Vector, inv_dx: Real) -> Self {
        let grid_position = position * inv_dx;
        let base = (grid_position - Vector::splat(0.5)).floor();
        let fx = grid_position - base;

        Self {
            base_coord: IVec2::new(base.x as i32, base.y as i32),
            fx,
            weights: quadratic_weights(fx),
        }
    }

    /// Whether the whole stencil lies on a grid of resolution `n`.
    #[inline]
    pub fn fits_grid(&self, resolution: usize) -> bool {
        let last = resolution as i32 - (KERNEL_SIZE as i32 - 1);
        self.base_coord.x >= 0
            && self.base_coord.y >= 0
            && self.base_coord.x <= last
            && self.base_coord.y <= last
    }

    #[inline(always)]
    pub fn weight(&self, i: usize, j: usize) -> Real {
        self.weights[i].x * self.weights[j].y
    }

    /// Node position relative to the particle, in grid units.
    #[inline(always)]
    pub fn offset(&self, i: usize, j: usize) -> Vector {
        Vector::new(i as Real, j as Real) - self.fx
    }

    #[inline(always)]
    pub fn node_coord(&self, i: usize, j: usize) -> IVec2 {
        self.base_coord + IVec2::new(i as i32, j as i32)
    }

    /// Iterator over `(node coordinate, weight, offset)` for the 3x3 stencil.
    #[inline(always)]
    pub fn iter_neighbors(&self) -> impl Iterator<Item = (IVec2, Real, Vector)> + '_ {
        (0..NEIGHBOR_COUNT).map(move |idx| {
            let (i, j) = (idx % KERNEL_SIZE, idx / KERNEL_SIZE);
            (self.node_coord(i, j), self.weight(i, j), self.offset(i, j))
        })
    }
}
