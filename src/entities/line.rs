//! Line elements: beams, trusses, cables and springs

use serde::{Deserialize, Serialize};

use super::{widen, Decode, DecodeContext};
use crate::math::Mat3;
use crate::schema::{RawBeam, RawBeamSection, RawCable, RawSpring, RawTruss};

/// A beam element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beam {
    pub group: i32,
    /// Start and end node
    pub nodes: [i32; 2],
    pub length: f64,
    /// Local start coordinates
    pub x_start: [f64; 3],
    /// Local end coordinates
    pub x_end: [f64; 3],
    /// Rows of the global-to-local transformation
    pub axes: [[f64; 3]; 3],
}

impl Beam {
    /// Local x axis (beam direction)
    pub fn direction(&self) -> [f64; 3] {
        self.axes[0]
    }

    /// Global-to-local transformation matrix
    pub fn transformation(&self) -> Mat3 {
        Mat3::from_fn(|i, j| self.axes[i][j])
    }
}

impl Decode<RawBeam> for Beam {
    fn decode(raw: &RawBeam, ctx: &DecodeContext<'_>) -> Option<(i32, Self)> {
        if raw.nr <= 0 {
            return None;
        }
        ctx.check_nodes("Beam", raw.nr, &raw.node);
        Some((
            raw.nr,
            Self {
                group: ctx.group(raw.nr),
                nodes: raw.node,
                length: f64::from(raw.dl),
                x_start: raw.ex.map(|e| f64::from(e[0])),
                x_end: raw.ex.map(|e| f64::from(e[1])),
                axes: raw.t.map(widen),
            },
        ))
    }
}

/// Cross section assignment along a beam. Keyed by beam id, so the last
/// station delivered for a beam wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamSection {
    /// Station along the beam
    pub station: f64,
    pub section: i32,
    pub bitcodes: i32,
    pub hinge: i32,
}

impl Decode<RawBeamSection> for BeamSection {
    fn decode(raw: &RawBeamSection, _ctx: &DecodeContext<'_>) -> Option<(i32, Self)> {
        if raw.id <= 0 {
            return None;
        }
        Some((
            raw.id,
            Self {
                station: f64::from(raw.x),
                section: raw.nq,
                bitcodes: raw.ityp,
                hinge: raw.itp2,
            },
        ))
    }
}

/// Truss or cable: an element carrying axial force only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxialElement {
    pub group: i32,
    pub nodes: [i32; 2],
    pub length: f64,
    pub section: i32,
    pub pretension: f64,
    pub ultimate_force: f64,
    pub yield_force: f64,
    /// Cable direction, absent for trusses
    pub direction: Option<[f64; 3]>,
}

impl Decode<RawTruss> for AxialElement {
    fn decode(raw: &RawTruss, ctx: &DecodeContext<'_>) -> Option<(i32, Self)> {
        if raw.nr <= 0 {
            return None;
        }
        ctx.check_nodes("Truss", raw.nr, &raw.node);
        Some((
            raw.nr,
            Self {
                group: ctx.group(raw.nr),
                nodes: raw.node,
                length: f64::from(raw.dl),
                section: raw.nrq,
                pretension: f64::from(raw.pre),
                ultimate_force: f64::from(raw.riss),
                yield_force: f64::from(raw.flie),
                direction: None,
            },
        ))
    }
}

impl Decode<RawCable> for AxialElement {
    fn decode(raw: &RawCable, ctx: &DecodeContext<'_>) -> Option<(i32, Self)> {
        if raw.nr <= 0 {
            return None;
        }
        ctx.check_nodes("Cable", raw.nr, &raw.node);
        Some((
            raw.nr,
            Self {
                group: ctx.group(raw.nr),
                nodes: raw.node,
                length: f64::from(raw.dl),
                section: raw.nrq,
                pretension: f64::from(raw.pre),
                ultimate_force: f64::from(raw.riss),
                yield_force: f64::from(raw.flie),
                direction: Some(widen(raw.t)),
            },
        ))
    }
}

/// A spring between two nodes, or from a node to ground
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    pub group: i32,
    pub nodes: [i32; 2],
    /// Unit normal of the spring axis
    pub normal: [f64; 3],
    pub k_axial: f64,
    pub k_transverse: f64,
    pub k_rotational: f64,
}

impl Spring {
    /// Second node 0: the spring connects its node to ground
    pub fn is_support(&self) -> bool {
        self.nodes[1] == 0
    }
}

impl Decode<RawSpring> for Spring {
    fn decode(raw: &RawSpring, ctx: &DecodeContext<'_>) -> Option<(i32, Self)> {
        if raw.nr <= 0 {
            return None;
        }
        ctx.check_nodes("Spring", raw.nr, &raw.node);
        Some((
            raw.nr,
            Self {
                group: ctx.group(raw.nr),
                nodes: raw.node,
                normal: widen(raw.t),
                k_axial: f64::from(raw.cp),
                k_transverse: f64::from(raw.cq),
                k_rotational: f64::from(raw.cm),
            },
        ))
    }
}
