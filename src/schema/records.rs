//! Fixed-layout raw records, one per record family
//!
//! Offsets are byte offsets from the start of the buffer. All scalars are
//! 4-byte little-endian `i32` or `f32`; arrays are stored row after row.

use super::{raw_record, RecordSchema};

raw_record! {
    /// System record `10/00`.
    ///
    /// | offset | field |
    /// |---|---|
    /// | 0 | `iprob` problem type |
    /// | 4 | `iachs` gravity axis |
    /// | 8 | `nknot` node count |
    /// | 12 | `mknot` highest node number |
    /// | 16 | `igdiv` group divisor |
    /// | 20 | `igres` result group divisor |
    /// | 24 | `tol` geometric tolerance |
    /// | 28 | `unit` unit set |
    pub struct RawSystem [32, id = igdiv] = RecordSchema::fixed("system", 10, 0);
    {
        pub iprob: i32,
        pub iachs: i32,
        pub nknot: i32,
        pub mknot: i32,
        pub igdiv: i32,
        pub igres: i32,
        pub tol: f32,
        pub unit: i32,
    }
}

raw_record! {
    /// Node record `20/00`.
    ///
    /// | offset | field |
    /// |---|---|
    /// | 0 | `nr` node number |
    /// | 4 | `inr` internal number |
    /// | 8 | `kfix` fixity bitcode |
    /// | 12 | `ncod` generation code |
    /// | 16 | `xyz[3]` coordinates |
    pub struct RawNode [28, id = nr] = RecordSchema::fixed("nodes", 20, 0);
    {
        pub nr: i32,
        pub inr: i32,
        pub kfix: i32,
        pub ncod: i32,
        pub xyz: [f32; 3],
    }
}

raw_record! {
    /// Beam record `100/00`.
    ///
    /// | offset | field |
    /// |---|---|
    /// | 0 | `nr` beam number |
    /// | 4 | `node[2]` start and end node |
    /// | 12 | `dl` length |
    /// | 16 | `t[3][3]` transformation matrix |
    /// | 52 | `ex[3][2]` local start/end coordinates, per axis |
    pub struct RawBeam [76, id = nr] = RecordSchema::fixed("beams", 100, 0);
    {
        pub nr: i32,
        pub node: [i32; 2],
        pub dl: f32,
        pub t: [[f32; 3]; 3],
        pub ex: [[f32; 2]; 3],
    }
}

raw_record! {
    /// Beam section record, read from `100/00` at position 1.
    ///
    /// | offset | field |
    /// |---|---|
    /// | 0 | `id` beam number |
    /// | 4 | `x` station along the beam |
    /// | 8 | `nq` section number |
    /// | 12 | `ityp` bitcodes |
    /// | 16 | `itp2` hinge code |
    pub struct RawBeamSection [20, id = id] =
        RecordSchema::fixed("beam_sections", 100, 0).at_position(1);
    {
        pub id: i32,
        pub x: f32,
        pub nq: i32,
        pub ityp: i32,
        pub itp2: i32,
    }
}

raw_record! {
    /// Truss record `150/00`.
    ///
    /// | offset | field |
    /// |---|---|
    /// | 0 | `nr` truss number |
    /// | 4 | `node[2]` |
    /// | 12 | `nrq` section number |
    /// | 16 | `dl` length |
    /// | 20 | `pre` prestress |
    /// | 24 | `gap` slip |
    /// | 28 | `riss` ultimate force |
    /// | 32 | `flie` yield force |
    pub struct RawTruss [36, id = nr] = RecordSchema::fixed("trusses", 150, 0);
    {
        pub nr: i32,
        pub node: [i32; 2],
        pub nrq: i32,
        pub dl: f32,
        pub pre: f32,
        pub gap: f32,
        pub riss: f32,
        pub flie: f32,
    }
}

raw_record! {
    /// Cable record `160/00`.
    ///
    /// | offset | field |
    /// |---|---|
    /// | 0 | `nr` cable number |
    /// | 4 | `node[2]` |
    /// | 12 | `nrq` section number |
    /// | 16 | `dl` length |
    /// | 20 | `t[3]` direction |
    /// | 32 | `pre` prestress |
    /// | 36 | `gap` slip |
    /// | 40 | `riss` ultimate force |
    /// | 44 | `flie` yield force |
    pub struct RawCable [48, id = nr] = RecordSchema::fixed("cables", 160, 0);
    {
        pub nr: i32,
        pub node: [i32; 2],
        pub nrq: i32,
        pub dl: f32,
        pub t: [f32; 3],
        pub pre: f32,
        pub gap: f32,
        pub riss: f32,
        pub flie: f32,
    }
}

raw_record! {
    /// Spring record `170/00`.
    ///
    /// | offset | field |
    /// |---|---|
    /// | 0 | `nr` spring number |
    /// | 4 | `node[2]`, second node 0 for support springs |
    /// | 12 | `nrq` property number |
    /// | 16 | `t[3]` unit normal |
    /// | 28 | `cp` axial stiffness |
    /// | 32 | `cq` transverse stiffness |
    /// | 36 | `cm` rotational stiffness |
    pub struct RawSpring [40, id = nr] = RecordSchema::fixed("springs", 170, 0);
    {
        pub nr: i32,
        pub node: [i32; 2],
        pub nrq: i32,
        pub t: [f32; 3],
        pub cp: f32,
        pub cq: f32,
        pub cm: f32,
    }
}

raw_record! {
    /// Quad record `200/00`.
    ///
    /// | offset | field |
    /// |---|---|
    /// | 0 | `nr` quad number |
    /// | 4 | `node[4]` |
    /// | 20 | `mat` material number |
    /// | 24 | `mrf` reinforcement material |
    /// | 28 | `nra` element type |
    /// | 32 | `det[3]` Jacobian determinant terms |
    /// | 44 | `thick[5]` thickness at centre and nodes |
    pub struct RawQuad [64, id = nr] = RecordSchema::fixed("quads", 200, 0);
    {
        pub nr: i32,
        pub node: [i32; 4],
        pub mat: i32,
        pub mrf: i32,
        pub nra: i32,
        pub det: [f32; 3],
        pub thick: [f32; 5],
    }
}

raw_record! {
    /// Bric record `300/00`.
    ///
    /// | offset | field |
    /// |---|---|
    /// | 0 | `nr` bric number |
    /// | 4 | `node[8]`, last two equal for tetrahedra |
    /// | 36 | `mat` material number |
    /// | 40 | `mrf` reinforcement material |
    /// | 44 | `nra` element type |
    /// | 48 | `det[4]` Jacobian determinant terms |
    pub struct RawBric [64, id = nr] = RecordSchema::fixed("brics", 300, 0);
    {
        pub nr: i32,
        pub node: [i32; 8],
        pub mat: i32,
        pub mrf: i32,
        pub nra: i32,
        pub det: [f32; 4],
    }
}

raw_record! {
    /// Bric stress record `310/lc`, one family per load case.
    ///
    /// | offset | field |
    /// |---|---|
    /// | 0 | `nr` bric number |
    /// | 4 | `mat` material number |
    /// | 8 | `sigx` |
    /// | 12 | `sigy` |
    /// | 16 | `sigz` |
    /// | 20 | `tvxy` |
    /// | 24 | `tvyz` |
    /// | 28 | `tvxz` |
    pub struct RawBricStress [32, id = nr] = RecordSchema::enumerated("bric_stresses", 310);
    {
        pub nr: i32,
        pub mat: i32,
        pub sigx: f32,
        pub sigy: f32,
        pub sigz: f32,
        pub tvxy: f32,
        pub tvyz: f32,
        pub tvxz: f32,
    }
}
