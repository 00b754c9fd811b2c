//! Bric volume element

use serde::{Deserialize, Serialize};

use super::{Decode, DecodeContext};
use crate::schema::RawBric;

/// Shape of a bric, read from its node slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BricTopology {
    /// Last two node slots equal
    Tetrahedron,
    Hexahedron,
}

impl BricTopology {
    pub fn from_nodes(nodes: &[i32; 8]) -> Self {
        if nodes[6] == nodes[7] {
            BricTopology::Tetrahedron
        } else {
            BricTopology::Hexahedron
        }
    }

    /// Factor turning the first Jacobian determinant into a volume
    pub fn volume_factor(self) -> f64 {
        match self {
            BricTopology::Tetrahedron => 4.0 / 3.0,
            BricTopology::Hexahedron => 8.0,
        }
    }
}

/// A volume element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bric {
    pub group: i32,
    /// Node slots as stored; degenerate shapes repeat ids
    pub nodes: [i32; 8],
    pub element_type: i32,
    pub material: i32,
    pub volume: f64,
    pub topology: BricTopology,
}

impl Bric {
    /// Distinct non-zero node ids in slot order
    pub fn effective_nodes(&self) -> Vec<i32> {
        let mut nodes = Vec::with_capacity(8);
        for &node in &self.nodes {
            if node != 0 && !nodes.contains(&node) {
                nodes.push(node);
            }
        }
        nodes
    }
}

impl Decode<RawBric> for Bric {
    fn decode(raw: &RawBric, ctx: &DecodeContext<'_>) -> Option<(i32, Self)> {
        if raw.nr <= 0 {
            return None;
        }
        ctx.check_nodes("Bric", raw.nr, &raw.node);
        let topology = BricTopology::from_nodes(&raw.node);
        Some((
            raw.nr,
            Self {
                group: ctx.group(raw.nr),
                nodes: raw.node,
                element_type: raw.nra,
                material: raw.mat,
                volume: f64::from(raw.det[0]) * topology.volume_factor(),
                topology,
            },
        ))
    }
}
