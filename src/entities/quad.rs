//! Quad shell element

use serde::{Deserialize, Serialize};

use super::{Decode, DecodeContext};
use crate::schema::RawQuad;

/// A four-node shell element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pub group: i32,
    pub nodes: [i32; 4],
    pub element_type: i32,
    /// Thickness at the element centre
    pub thickness: f64,
    pub material: i32,
    /// Area from the Jacobian determinant, `det[0] * 4`
    pub area: f64,
}

impl Decode<RawQuad> for Quad {
    fn decode(raw: &RawQuad, ctx: &DecodeContext<'_>) -> Option<(i32, Self)> {
        if raw.nr <= 0 {
            return None;
        }
        ctx.check_nodes("Quad", raw.nr, &raw.node);
        Some((
            raw.nr,
            Self {
                group: ctx.group(raw.nr),
                nodes: raw.node,
                element_type: raw.nra,
                thickness: f64::from(raw.thick[0]),
                material: raw.mat,
                area: f64::from(raw.det[0]) * 4.0,
            },
        ))
    }
}
