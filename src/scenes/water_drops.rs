use rand::Rng;

use crate::config::constants::SAMPLES_PER_OBJECT;
use crate::error::ConfigError;
use crate::materials::{MaterialTag, WaterModel, WaterParams};
use crate::math::{Point, Real};

use super::sampling::{Spawner, sample_disc};
use super::Scenario;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterDrop {
    pub center: Point,
    pub radius: Real,
    pub color: u32,
}

/// Two water drops falling into the tank.
#[derive(Debug, Clone)]
pub struct WaterDrops {
    pub drops: Vec<WaterDrop>,
    pub samples_per_drop: usize,
    pub water: WaterParams,
}

impl Default for WaterDrops {
    fn default() -> Self {
        Self {
            drops: vec![
                WaterDrop {
                    center: Point::new(0.40, 0.75),
                    radius: 0.12,
                    color: 0x51B8FF,
                },
                WaterDrop {
                    center: Point::new(0.55, 0.45),
                    radius: 0.10,
                    color: 0xA681FE,
                },
            ],
            samples_per_drop: SAMPLES_PER_OBJECT,
            water: WaterParams::default(),
        }
    }
}

impl Scenario for WaterDrops {
    type Model = WaterModel;

    fn name(&self) -> &'static str {
        "water drops"
    }

    fn model(&self) -> Result<WaterModel, ConfigError> {
        WaterModel::new(self.water)
    }

    fn populate<R: Rng + ?Sized>(&self, spawner: &mut Spawner<'_>, rng: &mut R) {
        for drop in &self.drops {
            let positions = sample_disc(drop.center, drop.radius, self.samples_per_drop, rng);
            spawner.spawn(positions, MaterialTag::Water, drop.color);
        }
    }

    fn object_material(&self) -> MaterialTag {
        MaterialTag::Water
    }
}
