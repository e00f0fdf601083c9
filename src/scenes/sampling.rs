//! Particle samplers used to seed scenarios and interactive insertion.

use std::f64::consts::TAU;

use rand::Rng;

use crate::core::kernel::GridInterpolation;
use crate::core::{Particle, ParticleSet};
use crate::materials::MaterialTag;
use crate::math::{Point, Real, Vector};

/// `count` points uniformly distributed in the axis-aligned square of
/// half-width `half_width` around `center`.
pub fn sample_square<R: Rng + ?Sized>(
    center: Point,
    half_width: Real,
    count: usize,
    rng: &mut R,
) -> Vec<Point> {
    (0..count)
        .map(|_| {
            let offset = Vector::new(
                rng.random::<Real>() * 2.0 - 1.0,
                rng.random::<Real>() * 2.0 - 1.0,
            );
            center + offset * half_width
        })
        .collect()
}

/// `count` points uniformly distributed over the disc area.
pub fn sample_disc<R: Rng + ?Sized>(
    center: Point,
    radius: Real,
    count: usize,
    rng: &mut R,
) -> Vec<Point> {
    (0..count)
        .map(|_| {
            let theta = rng.random::<Real>() * TAU;
            let r = rng.random::<Real>().sqrt() * radius;
            center + Vector::new(theta.cos(), theta.sin()) * r
        })
        .collect()
}

/// Lattice points with spacing `spacing` strictly inside the annulus
/// `min_radius < |p - center| < max_radius`.
pub fn sample_annulus_lattice(
    center: Point,
    min_radius: Real,
    max_radius: Real,
    spacing: Real,
) -> Vec<Point> {
    if !(spacing > 0.0 && max_radius > 0.0) {
        return Vec::new();
    }
    let (min_sq, max_sq) = (min_radius * min_radius, max_radius * max_radius);
    let steps = (2.0 * max_radius / spacing).ceil() as usize;

    let mut points = Vec::new();
    for i in 0..steps {
        let x = -max_radius + i as Real * spacing;
        for j in 0..steps {
            let y = -max_radius + j as Real * spacing;
            let r_sq = x * x + y * y;
            if r_sq < max_sq && r_sq > min_sq {
                points.push(center + Vector::new(x, y));
            }
        }
    }
    points
}

/// Whether a particle at `position` has its whole stencil on the grid.
pub fn fits_grid(position: Point, resolution: usize) -> bool {
    position.is_finite()
        && GridInterpolation::compute_for_particle(position, resolution as Real)
            .fits_grid(resolution)
}

/// Inserts sampled particles into a set, dropping any sample whose stencil
/// would leave a grid of the given resolution.
pub struct Spawner<'a> {
    particles: &'a mut ParticleSet,
    resolution: usize,
}

impl<'a> Spawner<'a> {
    pub fn new(particles: &'a mut ParticleSet, resolution: usize) -> Self {
        Self {
            particles,
            resolution,
        }
    }

    pub fn fits(&self, position: Point) -> bool {
        fits_grid(position, self.resolution)
    }

    /// Returns how many particles were inserted.
    pub fn spawn(
        &mut self,
        positions: impl IntoIterator<Item = Point>,
        material: MaterialTag,
        color: u32,
    ) -> usize {
        let resolution = self.resolution;
        self.particles.insert_batch(
            positions
                .into_iter()
                .filter(|p| fits_grid(*p, resolution))
                .map(|position| Particle::new(position, material, color)),
        )
    }
}
