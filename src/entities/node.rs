//! Node - a point in 3D space with its support conditions

use serde::{Deserialize, Serialize};

use super::{decode_fixity, widen, Decode, DecodeContext, Support};
use crate::schema::RawNode;

/// A node of the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Coordinates
    pub xyz: [f64; 3],
    /// Legacy fixity token string
    pub fix: String,
    /// Typed support conditions
    pub support: Support,
}

impl Node {
    /// Create a free node at the given coordinates
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            xyz: [x, y, z],
            fix: decode_fixity(0),
            support: Support::default(),
        }
    }

    /// Get the coordinates as an array
    pub fn coords(&self) -> [f64; 3] {
        self.xyz
    }

    /// Calculate distance to another node
    pub fn distance_to(&self, other: &Node) -> f64 {
        let dx = other.xyz[0] - self.xyz[0];
        let dy = other.xyz[1] - self.xyz[1];
        let dz = other.xyz[2] - self.xyz[2];
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl Decode<RawNode> for Node {
    fn decode(raw: &RawNode, _ctx: &DecodeContext<'_>) -> Option<(i32, Self)> {
        if raw.nr <= 0 {
            return None;
        }
        Some((
            raw.nr,
            Self {
                xyz: widen(raw.xyz),
                fix: decode_fixity(raw.kfix),
                support: Support::from_bitcode(raw.kfix),
            },
        ))
    }
}
