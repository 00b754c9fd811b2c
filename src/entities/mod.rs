//! Semantic entities decoded from raw records

mod bric;
mod line;
mod node;
mod quad;
mod stress;
mod support;
mod system;

pub use bric::{Bric, BricTopology};
pub use line::{AxialElement, Beam, BeamSection, Spring};
pub use node::Node;
pub use quad::Quad;
pub use stress::StressSample;
pub use support::{decode_fixity, Support, FIXITY_FLAGS};
pub use system::SystemInfo;

use crate::model::CdbModel;
use crate::options::ReadOptions;
use crate::schema::RawRecord;

/// What a decoder may look at besides its raw record
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext<'a> {
    /// Model built so far (system record and nodes first)
    pub model: &'a CdbModel,
    pub options: &'a ReadOptions,
}

impl<'a> DecodeContext<'a> {
    pub fn new(model: &'a CdbModel, options: &'a ReadOptions) -> Self {
        Self { model, options }
    }

    /// Group index of an element id
    pub fn group(&self, id: i32) -> i32 {
        self.model.group_of(id)
    }

    /// Warn about node ids missing from the model. Slot value 0 means
    /// "no node" and is not checked; nothing is checked before nodes are read.
    pub fn check_nodes(&self, kind: &str, id: i32, nodes: &[i32]) {
        if self.model.nodes.is_empty() {
            return;
        }
        for &node in nodes {
            if node != 0 && !self.model.nodes.contains_key(&node) {
                log::warn!("{kind} {id} references missing node {node}");
            }
        }
    }
}

/// Turn a raw record into `(id, entity)`, or `None` for an unused slot
pub trait Decode<R: RawRecord>: Sized {
    fn decode(raw: &R, ctx: &DecodeContext<'_>) -> Option<(i32, Self)>;
}

pub(crate) fn widen<const N: usize>(values: [f32; N]) -> [f64; N] {
    values.map(f64::from)
}
