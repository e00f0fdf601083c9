//! Elastic tissue
//!
//! Plain corotated elasticity with per-material constants. The candidate
//! deformation gradient is accepted as is.

use indexmap::IndexMap;

use crate::core::Particle;
use crate::error::{ConfigError, MaterialError};
use crate::materials::families::ElasticParams;
use crate::materials::{LameParameters, MaterialModel, MaterialTag};
use crate::math::Matrix;

#[derive(Debug, Clone)]
pub struct TissueModel {
    constants: IndexMap<MaterialTag, LameParameters>,
}

impl Default for TissueModel {
    fn default() -> Self {
        let mut constants = IndexMap::new();
        constants.insert(
            MaterialTag::TissueSoft,
            LameParameters::from_elastic(&ElasticParams::soft_tissue()),
        );
        constants.insert(
            MaterialTag::TissueHard,
            LameParameters::from_elastic(&ElasticParams::hard_tissue()),
        );
        Self { constants }
    }
}

impl TissueModel {
    /// A model with no materials registered.
    pub fn empty() -> Self {
        Self {
            constants: IndexMap::new(),
        }
    }

    /// Registers or replaces the constants of `tag`.
    pub fn set_material(
        &mut self,
        tag: MaterialTag,
        params: ElasticParams,
    ) -> Result<(), ConfigError> {
        params.validate()?;
        self.constants
            .insert(tag, LameParameters::from_elastic(&params));
        Ok(())
    }

    pub fn with_material(
        mut self,
        tag: MaterialTag,
        params: ElasticParams,
    ) -> Result<Self, ConfigError> {
        self.set_material(tag, params)?;
        Ok(self)
    }

    pub fn constants(&self, tag: MaterialTag) -> Option<&LameParameters> {
        self.constants.get(&tag)
    }

    pub fn materials(&self) -> impl Iterator<Item = &MaterialTag> {
        self.constants.keys()
    }
}

impl MaterialModel for TissueModel {
    fn material_properties(&self, particle: &Particle) -> Result<LameParameters, MaterialError> {
        self.constants
            .get(&particle.material)
            .copied()
            .ok_or(MaterialError::UnknownMaterial(particle.material))
    }

    fn update_deformation_gradient(
        &self,
        particle: &mut Particle,
        candidate: Matrix,
    ) -> Result<(), MaterialError> {
        particle.deformation_gradient = candidate;
        particle.plastic_jacobian = candidate.determinant();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Vector, matrix_from_row_major};
    use approx::assert_relative_eq;

    #[test]
    fn constants_follow_the_material_tag() {
        let model = TissueModel::default();
        let soft = Particle::new(Vector::new(0.5, 0.5), MaterialTag::TissueSoft, 0x168587);
        let hard = Particle::new(Vector::new(0.5, 0.5), MaterialTag::TissueHard, 0xED553B);

        let soft = model.material_properties(&soft).unwrap();
        let hard = model.material_properties(&hard).unwrap();
        assert_relative_eq!(soft.mu, 100.0 / 2.4, epsilon = 1.0e-12);
        assert_relative_eq!(hard.mu, 3000.0 / 2.4, epsilon = 1.0e-9);
        assert_relative_eq!(hard.lambda / soft.lambda, 30.0, epsilon = 1.0e-12);

        let order: Vec<_> = model.materials().copied().collect();
        assert_eq!(order, vec![MaterialTag::TissueSoft, MaterialTag::TissueHard]);
    }

    #[test]
    fn unknown_material_is_reported() {
        let model = TissueModel::default();
        let snow = Particle::new(Vector::new(0.5, 0.5), MaterialTag::Snow, 0);
        assert_eq!(
            model.material_properties(&snow),
            Err(MaterialError::UnknownMaterial(MaterialTag::Snow))
        );
    }

    #[test]
    fn candidate_passes_through() {
        let model = TissueModel::default();
        let mut particle = Particle::new(Vector::new(0.5, 0.5), MaterialTag::TissueSoft, 0);
        let candidate = matrix_from_row_major([1.1, 0.2, -0.1, 0.9]);
        model
            .update_deformation_gradient(&mut particle, candidate)
            .unwrap();
        assert_eq!(particle.deformation_gradient, candidate);
        assert_relative_eq!(particle.plastic_jacobian, 1.01, epsilon = 1.0e-12);
    }

    #[test]
    fn materials_can_be_registered() {
        let model = TissueModel::empty()
            .with_material(MaterialTag::TissueSoft, ElasticParams::new(50.0, 0.3))
            .unwrap();
        assert!(model.constants(MaterialTag::TissueHard).is_none());
        assert!(
            TissueModel::empty()
                .with_material(MaterialTag::TissueHard, ElasticParams::new(50.0, 0.6))
                .is_err()
        );
    }
}
