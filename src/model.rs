//! CDB Model - decoded entities keyed by kind and id

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::access::{CdbAccess, CdbLibrary};
use crate::entities::{
    AxialElement, Beam, BeamSection, Bric, Decode, DecodeContext, Node, Quad, Spring,
    StressSample, SystemInfo,
};
use crate::error::{CdbError, CdbResult};
use crate::math;
use crate::options::ReadOptions;
use crate::results::PrincipalStressReport;
use crate::scanner::{scan_enumerated, scan_single};
use crate::schema::{
    RawBeam, RawBeamSection, RawBric, RawBricStress, RawCable, RawNode, RawQuad, RawRecord,
    RawSpring, RawSystem, RawTruss,
};
use crate::session::Session;

/// Everything read from one database. Entity kinds are separate id spaces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CdbModel {
    /// System record, if the database has one
    pub system: Option<SystemInfo>,
    pub nodes: BTreeMap<i32, Node>,
    pub beams: BTreeMap<i32, Beam>,
    pub beam_sections: BTreeMap<i32, BeamSection>,
    pub trusses: BTreeMap<i32, AxialElement>,
    pub cables: BTreeMap<i32, AxialElement>,
    pub springs: BTreeMap<i32, Spring>,
    pub quads: BTreeMap<i32, Quad>,
    pub brics: BTreeMap<i32, Bric>,
    /// Stress samples by load case, then bric id
    pub bric_stresses: BTreeMap<i32, BTreeMap<i32, StressSample>>,
}

impl CdbModel {
    /// Create a new empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `path` through `access`, read everything `options` asks for and
    /// close the database again. The database is closed on every path.
    pub fn from_database<A: CdbAccess>(
        path: impl AsRef<Path>,
        access: A,
        options: &ReadOptions,
    ) -> CdbResult<Self> {
        let mut session = Session::open(path, access, options)?;
        let model = Self::read(&mut session, options)?;
        session.close();
        Ok(model)
    }

    /// Like [`Self::from_database`], loading the access library named in
    /// `options`
    pub fn from_library(path: impl AsRef<Path>, options: &ReadOptions) -> CdbResult<Self> {
        let mut session = Session::<CdbLibrary>::open_with_library(path, options)?;
        let model = Self::read(&mut session, options)?;
        session.close();
        Ok(model)
    }

    /// Read geometry, then the optional families enabled in `options`
    pub fn read<A: CdbAccess>(session: &mut Session<A>, options: &ReadOptions) -> CdbResult<Self> {
        let mut model = Self::new();
        model.read_geometry(session, options)?;
        if options.beam_sections {
            model.read_beam_sections(session, options)?;
        }
        if options.bric_stresses {
            model.read_bric_stresses(session, options)?;
        }
        log::info!("{}", model.summary());
        Ok(model)
    }

    // ========================
    // Reading
    // ========================

    /// Read the system record, nodes and all element families, in the
    /// order group indices and node checks depend on
    pub fn read_geometry<A: CdbAccess>(
        &mut self,
        session: &mut Session<A>,
        options: &ReadOptions,
    ) -> CdbResult<()> {
        self.read_system(session, options)?;
        self.nodes = self.decode_family::<A, RawNode, _>(session, options)?;
        self.beams = self.decode_family::<A, RawBeam, _>(session, options)?;
        self.trusses = self.decode_family::<A, RawTruss, _>(session, options)?;
        self.cables = self.decode_family::<A, RawCable, _>(session, options)?;
        self.springs = self.decode_family::<A, RawSpring, _>(session, options)?;
        self.quads = self.decode_family::<A, RawQuad, _>(session, options)?;
        self.brics = self.decode_family::<A, RawBric, _>(session, options)?;
        Ok(())
    }

    /// Read the system record; without one every group index is 0
    pub fn read_system<A: CdbAccess>(
        &mut self,
        session: &mut Session<A>,
        options: &ReadOptions,
    ) -> CdbResult<()> {
        let mut systems = self.decode_family::<A, RawSystem, SystemInfo>(session, options)?;
        self.system = systems.pop_last().map(|(_, system)| system);
        Ok(())
    }

    /// Read beam cross section assignments
    pub fn read_beam_sections<A: CdbAccess>(
        &mut self,
        session: &mut Session<A>,
        options: &ReadOptions,
    ) -> CdbResult<()> {
        self.beam_sections = self.decode_family::<A, RawBeamSection, _>(session, options)?;
        Ok(())
    }

    /// Read bric stresses of every load case present
    pub fn read_bric_stresses<A: CdbAccess>(
        &mut self,
        session: &mut Session<A>,
        options: &ReadOptions,
    ) -> CdbResult<()> {
        let ctx = DecodeContext::new(self, options);
        let stresses = scan_enumerated(session, options, |raw: &RawBricStress| {
            StressSample::decode(raw, &ctx)
        })?;
        self.bric_stresses = stresses;
        Ok(())
    }

    fn decode_family<A, R, T>(
        &self,
        session: &mut Session<A>,
        options: &ReadOptions,
    ) -> CdbResult<BTreeMap<i32, T>>
    where
        A: CdbAccess,
        R: RawRecord,
        T: Decode<R>,
    {
        let ctx = DecodeContext::new(self, options);
        scan_single(session, options, |raw: &R| T::decode(raw, &ctx))
    }

    // ========================
    // Queries
    // ========================

    /// Group index of an element id
    pub fn group_of(&self, id: i32) -> i32 {
        self.system.as_ref().map_or(0, |system| system.group_of(id))
    }

    /// Coordinates of the given nodes, in order
    pub fn node_coordinates(&self, ids: &[i32]) -> CdbResult<Vec<[f64; 3]>> {
        ids.iter()
            .map(|id| {
                self.nodes
                    .get(id)
                    .map(Node::coords)
                    .ok_or(CdbError::NodeNotFound(*id))
            })
            .collect()
    }

    /// Centroid of the given nodes
    pub fn centroid(&self, ids: &[i32]) -> CdbResult<[f64; 3]> {
        let points = self.node_coordinates(ids)?;
        math::centroid(&points)
            .ok_or_else(|| CdbError::InvalidInput("centroid of an empty node list".to_string()))
    }

    /// Centroid of a bric from its effective nodes
    pub fn bric_centroid(&self, id: i32) -> CdbResult<[f64; 3]> {
        let bric = self
            .brics
            .get(&id)
            .ok_or_else(|| CdbError::InvalidInput(format!("bric {id} not found in model")))?;
        self.centroid(&bric.effective_nodes())
    }

    /// Load cases with bric stresses
    pub fn load_cases(&self) -> Vec<i32> {
        self.bric_stresses.keys().copied().collect()
    }

    /// Number of elements of all kinds
    pub fn element_count(&self) -> usize {
        self.beams.len()
            + self.trusses.len()
            + self.cables.len()
            + self.springs.len()
            + self.quads.len()
            + self.brics.len()
    }

    /// Principal stresses of every bric stress sample
    pub fn principal_stresses(&self, options: &ReadOptions) -> PrincipalStressReport {
        PrincipalStressReport::evaluate(self, options)
    }

    /// One-line description of the model contents
    pub fn summary(&self) -> String {
        format!(
            "Model: {} nodes, {} beams, {} trusses, {} cables, {} springs, {} quads, {} brics, \
             {} load cases",
            self.nodes.len(),
            self.beams.len(),
            self.trusses.len(),
            self.cables.len(),
            self.springs.len(),
            self.quads.len(),
            self.brics.len(),
            self.bric_stresses.len()
        )
    }
}
