//! Principal stress results for bric stress samples

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::CdbError;
use crate::math::{principal_stresses, PrincipalStresses};
use crate::model::CdbModel;
use crate::options::ReadOptions;

/// Principal stresses of one bric in one load case
#[derive(Debug, Clone, Serialize)]
pub struct BricPrincipal {
    /// Centroid of the bric, when its nodes are known
    pub centroid: Option<[f64; 3]>,
    pub stresses: PrincipalStresses,
    /// Von Mises equivalent stress of the sample
    pub von_mises: f64,
}

/// A sample the solver could not evaluate
#[derive(Debug)]
pub struct StressFailure {
    pub load_case: i32,
    pub element: i32,
    pub error: CdbError,
}

/// Principal stresses by load case and bric id, plus per-element failures
#[derive(Debug, Default)]
pub struct PrincipalStressReport {
    pub results: BTreeMap<i32, BTreeMap<i32, BricPrincipal>>,
    pub failures: Vec<StressFailure>,
}

impl PrincipalStressReport {
    /// Solve every stress sample of `model`. Failures are collected, never
    /// propagated, so one bad sample leaves the rest of the batch intact.
    pub fn evaluate(model: &CdbModel, options: &ReadOptions) -> Self {
        let mut report = Self::default();

        for (&load_case, samples) in &model.bric_stresses {
            let mut solved = BTreeMap::new();
            for (&element, sample) in samples {
                match principal_stresses(sample.tensor(), &options.solver) {
                    Ok(stresses) => {
                        let centroid = model.bric_centroid(element).ok();
                        solved.insert(
                            element,
                            BricPrincipal {
                                centroid,
                                stresses,
                                von_mises: sample.tensor().von_mises(),
                            },
                        );
                    }
                    Err(error) => {
                        log::warn!(
                            "Load case {load_case}, bric {element}: no principal stresses: {error}"
                        );
                        report.failures.push(StressFailure {
                            load_case,
                            element,
                            error,
                        });
                    }
                }
            }
            report.results.insert(load_case, solved);
        }

        report
    }

    /// Result for one bric in one load case
    pub fn get(&self, load_case: i32, element: i32) -> Option<&BricPrincipal> {
        self.results.get(&load_case)?.get(&element)
    }

    /// True when every sample was solved
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// (load case, bric id) of every failed sample
    pub fn failed_elements(&self) -> Vec<(i32, i32)> {
        self.failures
            .iter()
            .map(|failure| (failure.load_case, failure.element))
            .collect()
    }

    /// Number of solved samples
    pub fn len(&self) -> usize {
        self.results.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
