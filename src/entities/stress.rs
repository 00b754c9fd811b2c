//! Bric stress samples

use serde::{Deserialize, Serialize};

use super::{Decode, DecodeContext};
use crate::math::StressTensor;
use crate::schema::RawBricStress;

/// Stress state of one bric in one load case, in output units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressSample {
    pub material: i32,
    #[serde(flatten)]
    pub stress: StressTensor,
}

impl StressSample {
    pub fn tensor(&self) -> &StressTensor {
        &self.stress
    }
}

impl Decode<RawBricStress> for StressSample {
    fn decode(raw: &RawBricStress, ctx: &DecodeContext<'_>) -> Option<(i32, Self)> {
        if raw.nr <= 0 {
            return None;
        }
        let scale = ctx.options.stress_scale;
        let scaled = |value: f32| f64::from(value) * scale;
        Some((
            raw.nr,
            Self {
                material: raw.mat,
                stress: StressTensor::new(
                    scaled(raw.sigx),
                    scaled(raw.sigy),
                    scaled(raw.sigz),
                    scaled(raw.tvxy),
                    scaled(raw.tvxz),
                    scaled(raw.tvyz),
                ),
            },
        ))
    }
}
