//! Read and solver options

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Environment variable naming the access library to load
pub const LIBRARY_ENV: &str = "CDB_LIBRARY";

/// Options for the principal stress root finder
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverOptions {
    /// Stop when |f(p)| drops below this value
    pub tolerance: f64,
    /// Newton iteration budget
    pub max_iterations: usize,
    /// Step added to an iterate whose derivative is exactly zero
    pub zero_slope_step: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-5,
            max_iterations: 100,
            zero_slope_step: 1e-3,
        }
    }
}

/// Options for reading a database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadOptions {
    /// Access library to load (discovery is left to the caller)
    pub library: Option<PathBuf>,
    /// Mode passed to the external `init` call
    pub open_mode: i32,
    /// Initial value of the read cursor, restored before every read
    pub start_position: i32,
    /// Hard cap on reads for a single record family
    pub max_reads_per_family: usize,
    /// Exclusive upper bound of secondary keys tried in enumeration mode
    pub max_secondary_key: i32,
    /// Factor applied to raw stress components (kN/m² to MN/m²)
    pub stress_scale: f64,
    /// Principal values below this magnitude are negligible for output
    pub negligible_stress: f64,
    /// Also read beam sections (record 100 at position 1)
    pub beam_sections: bool,
    /// Also read bric stresses of every load case
    pub bric_stresses: bool,
    /// Root finder settings
    pub solver: SolverOptions,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            library: None,
            open_mode: 99,
            start_position: 1,
            max_reads_per_family: 1_000_000,
            max_secondary_key: 9999,
            stress_scale: 0.001,
            negligible_stress: 1e-3,
            beam_sections: false,
            bric_stresses: true,
            solver: SolverOptions::default(),
        }
    }
}

impl ReadOptions {
    /// Defaults, with the library path taken from `CDB_LIBRARY` when set
    pub fn from_env() -> Self {
        Self {
            library: std::env::var_os(LIBRARY_ENV).map(PathBuf::from),
            ..Self::default()
        }
    }

    /// Set the access library path
    pub fn with_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.library = Some(path.into());
        self
    }

    /// Set the read loop cap
    pub fn with_max_reads(mut self, max_reads: usize) -> Self {
        self.max_reads_per_family = max_reads;
        self
    }

    /// Set the enumeration bound for secondary keys
    pub fn with_max_secondary_key(mut self, bound: i32) -> Self {
        self.max_secondary_key = bound;
        self
    }

    /// Set the stress unit scale
    pub fn with_stress_scale(mut self, scale: f64) -> Self {
        self.stress_scale = scale;
        self
    }

    /// Set the negligible principal stress threshold
    pub fn with_negligible_stress(mut self, threshold: f64) -> Self {
        self.negligible_stress = threshold;
        self
    }

    /// Choose whether beam sections are read along with the geometry
    pub fn with_beam_sections(mut self, enabled: bool) -> Self {
        self.beam_sections = enabled;
        self
    }

    /// Choose whether bric stresses are read along with the geometry
    pub fn with_bric_stresses(mut self, enabled: bool) -> Self {
        self.bric_stresses = enabled;
        self
    }

    /// Set the root finder options
    pub fn with_solver(mut self, solver: SolverOptions) -> Self {
        self.solver = solver;
        self
    }
}
