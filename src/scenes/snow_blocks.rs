use rand::Rng;

use crate::config::constants::{SAMPLES_PER_OBJECT, SQUARE_HALF_WIDTH};
use crate::error::ConfigError;
use crate::materials::{MaterialTag, SnowModel, SnowParams};
use crate::math::{Point, Real};

use super::sampling::{Spawner, sample_square};
use super::Scenario;

/// Three snow squares stacked so they land on each other.
#[derive(Debug, Clone)]
pub struct SnowBlocks {
    pub blocks: Vec<(Point, u32)>,
    pub half_width: Real,
    pub samples_per_block: usize,
    pub snow: SnowParams,
}

impl Default for SnowBlocks {
    fn default() -> Self {
        Self {
            blocks: vec![
                (Point::new(0.55, 0.45), 0xED553B),
                (Point::new(0.45, 0.65), 0xF2B134),
                (Point::new(0.55, 0.85), 0x168587),
            ],
            half_width: SQUARE_HALF_WIDTH,
            samples_per_block: SAMPLES_PER_OBJECT,
            snow: SnowParams::default(),
        }
    }
}

impl Scenario for SnowBlocks {
    type Model = SnowModel;

    fn name(&self) -> &'static str {
        "snow blocks"
    }

    fn model(&self) -> Result<SnowModel, ConfigError> {
        SnowModel::new(self.snow)
    }

    fn populate<R: Rng + ?Sized>(&self, spawner: &mut Spawner<'_>, rng: &mut R) {
        for &(center, color) in &self.blocks {
            let positions = sample_square(center, self.half_width, self.samples_per_block, rng);
            spawner.spawn(positions, MaterialTag::Snow, color);
        }
    }

    fn object_material(&self) -> MaterialTag {
        MaterialTag::Snow
    }
}
