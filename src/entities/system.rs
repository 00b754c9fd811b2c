//! System record

use serde::{Deserialize, Serialize};

use super::{Decode, DecodeContext};
use crate::schema::RawSystem;

/// Global model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Divisor turning element ids into group indices
    pub group_divisor: i32,
    pub problem_type: i32,
    pub node_count: i32,
    pub highest_node: i32,
    pub tolerance: f64,
}

impl SystemInfo {
    /// `id / group_divisor`, or 0 when the divisor is not positive
    pub fn group_of(&self, id: i32) -> i32 {
        if self.group_divisor > 0 {
            id / self.group_divisor
        } else {
            0
        }
    }
}

/// The system record carries no id; it is always stored under key 0.
impl Decode<RawSystem> for SystemInfo {
    fn decode(raw: &RawSystem, _ctx: &DecodeContext<'_>) -> Option<(i32, Self)> {
        if raw.igdiv <= 0 {
            log::warn!(
                "System group divisor {} is not positive, all groups are 0",
                raw.igdiv
            );
        }
        Some((
            0,
            Self {
                group_divisor: raw.igdiv,
                problem_type: raw.iprob,
                node_count: raw.nknot,
                highest_node: raw.mknot,
                tolerance: f64::from(raw.tol),
            },
        ))
    }
}
