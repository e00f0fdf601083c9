use crate::core::Particle;
use crate::core::kernel::GridInterpolation;
use crate::error::SimulationError;
use crate::math::{Real, Vector};

/// Particle storage plus the per-step stencil cache.
///
/// The cache is rebuilt at the start of each step and indexed like the
/// particles, so P2G and G2P reuse the same weights.
#[derive(Clone, Debug, Default)]
pub struct ParticleSet {
    particles: Vec<Particle>,
    transfer_cache: Vec<GridInterpolation>,
}

impl ParticleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Particle> {
        self.particles.iter_mut()
    }

    pub fn push(&mut self, particle: Particle) -> usize {
        let index = self.particles.len();
        self.particles.push(particle);
        self.transfer_cache.clear();
        index
    }

    pub fn insert_batch(&mut self, batch: impl IntoIterator<Item = Particle>) -> usize {
        let before = self.particles.len();
        self.particles.extend(batch);
        self.transfer_cache.clear();
        self.particles.len() - before
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Particle> {
        self.particles.get_mut(index)
    }

    pub fn transfer_cache(&self) -> &[GridInterpolation] {
        &self.transfer_cache
    }

    pub fn particles_and_cache(&self) -> (&[Particle], &[GridInterpolation]) {
        (&self.particles, &self.transfer_cache)
    }

    pub fn particles_mut_and_cache(&mut self) -> (&mut [Particle], &[GridInterpolation]) {
        (&mut self.particles, &self.transfer_cache)
    }

    /// Whether the cache holds one stencil per particle.
    pub fn has_transfer_cache(&self) -> bool {
        self.transfer_cache.len() == self.particles.len()
    }

    pub fn invalidate_transfer_cache(&mut self) {
        self.transfer_cache.clear();
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.transfer_cache.clear();
    }

    /// Recomputes every particle's stencil for a grid of resolution `n`.
    ///
    /// Fails on the first particle whose stencil leaves the grid.
    pub fn rebuild_transfer_cache(&mut self, resolution: usize) -> Result<(), SimulationError> {
        let inv_dx = resolution as Real;
        self.transfer_cache.clear();
        self.transfer_cache.reserve(self.particles.len());

        for (index, particle) in self.particles.iter().enumerate() {
            let interpolation = GridInterpolation::compute_for_particle(particle.position, inv_dx);
            if !interpolation.fits_grid(resolution) {
                self.transfer_cache.clear();
                return Err(SimulationError::OutOfDomain {
                    index,
                    position: particle.position,
                });
            }
            self.transfer_cache.push(interpolation);
        }
        Ok(())
    }

    /// Particles whose position lies strictly within `radius` of `center`.
    pub fn within_radius_mut(
        &mut self,
        center: Vector,
        radius: Real,
    ) -> impl Iterator<Item = &mut Particle> {
        let radius_sq = radius * radius;
        self.particles
            .iter_mut()
            .filter(move |particle| particle.position.distance_squared(center) < radius_sq)
    }

    pub fn unstable_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_unstable()).count()
    }
}
