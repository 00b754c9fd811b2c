//! CDB Reader - structural model data from a CDB engineering database
//!
//! The database is only reachable through a vendor C library exposing five
//! primitives (init, status, key check, get, close). This crate drives that
//! interface and turns its fixed-layout records into a typed model:
//! - Nodes with coordinates and support conditions
//! - Beams, trusses, cables, springs, quads and brics
//! - Bric stresses for every load case found in the database
//! - Principal stresses and directions per bric and load case
//!
//! ## Example
//! ```no_run
//! use cdb_reader::prelude::*;
//!
//! let options = ReadOptions::from_env().with_library("/opt/cdb/libcdb.so");
//! let model = CdbModel::from_library("bridge.cdb", &options)?;
//!
//! println!("{}", model.summary());
//! let report = model.principal_stresses(&options);
//! for (lc, brics) in &report.results {
//!     for (id, result) in brics {
//!         for (value, _) in result.stresses.significant(options.negligible_stress) {
//!             println!("LC {lc} bric {id}: {value:.3} MN/m²");
//!         }
//!     }
//! }
//! # Ok::<(), CdbError>(())
//! ```

pub mod access;
pub mod entities;
pub mod error;
pub mod export;
pub mod math;
pub mod model;
pub mod options;
pub mod results;
pub mod scanner;
pub mod schema;
pub mod session;

// Re-export common types
pub mod prelude {
    pub use crate::access::{CdbAccess, CdbLibrary, KeyState, MemoryCdb, ReadStatus};
    pub use crate::entities::{
        decode_fixity, AxialElement, Beam, BeamSection, Bric, BricTopology, Node, Quad, Spring,
        StressSample, Support, SystemInfo,
    };
    pub use crate::error::{CdbError, CdbResult, OpenFailure};
    pub use crate::export::{from_json, read_json, to_json, write_json};
    pub use crate::math::{principal_stresses, PrincipalStresses, StressTensor};
    pub use crate::model::CdbModel;
    pub use crate::options::{ReadOptions, SolverOptions};
    pub use crate::results::{BricPrincipal, PrincipalStressReport, StressFailure};
    pub use crate::session::Session;
}
