//! Record scanner
//!
//! Drains record families through the session's read primitive. A family
//! with a fixed secondary key is read with [`scan_single`]; families whose
//! secondary keys (load cases) are unknown are discovered with
//! [`scan_enumerated`]. Both share the same inner read loop, which keeps
//! reading while the status code is below 2 and gives up with
//! [`CdbError::ScanLimitExceeded`] after `max_reads_per_family` calls.
//! Records whose reported length differs from the layout size belong to
//! another layout sharing the family and are skipped.

use std::collections::BTreeMap;

use crate::access::{CdbAccess, KeyState};
use crate::error::{CdbError, CdbResult};
use crate::options::ReadOptions;
use crate::schema::{MinorKey, RawRecord};
use crate::session::Session;

/// Read every record of the family `(R::SCHEMA.major, minor)`.
///
/// `decode` turns each raw record into `(id, item)`; returning `None` skips
/// the slot without ending the scan. Later records overwrite earlier ones
/// with the same id.
pub fn scan_family<A, R, T, F>(
    session: &mut Session<A>,
    options: &ReadOptions,
    minor: i32,
    mut decode: F,
) -> CdbResult<BTreeMap<i32, T>>
where
    A: CdbAccess,
    R: RawRecord,
    F: FnMut(&R) -> Option<(i32, T)>,
{
    let schema = R::SCHEMA;
    let position = schema.position.unwrap_or(options.start_position);
    let mut buffer = vec![0u8; R::SIZE];
    let mut items = BTreeMap::new();
    let mut reads = 0usize;
    let mut skipped = 0usize;

    loop {
        if reads >= options.max_reads_per_family {
            return Err(CdbError::ScanLimitExceeded {
                major: schema.major,
                minor,
                limit: options.max_reads_per_family,
            });
        }
        reads += 1;

        // The primitive may rewrite both the buffer and its length
        buffer.fill(0);
        let mut length = R::SIZE as i32;
        let status = session.read(schema.major, minor, &mut buffer, &mut length, position);
        if !status.continues() {
            break;
        }
        if length != R::SIZE as i32 {
            log::trace!(
                "Record {:>4} {minor:>4}: {length} byte record is not a {} record, skipped",
                schema.major,
                schema.name
            );
            skipped += 1;
            continue;
        }

        let raw = R::decode(&buffer)?;
        match decode(&raw) {
            Some((id, item)) => {
                items.insert(id, item);
            }
            None => {
                log::trace!(
                    "Record {:>4} {minor:>4}: slot with id {} skipped",
                    schema.major,
                    raw.id()
                );
                skipped += 1;
            }
        }
    }

    log::debug!(
        "Record {:>4} {:>4}: {} {} decoded, {} slots skipped",
        schema.major,
        minor,
        items.len(),
        schema.name,
        skipped
    );
    Ok(items)
}

/// Read a family with a fixed secondary key.
///
/// Absent and empty families yield an empty map.
pub fn scan_single<A, R, T, F>(
    session: &mut Session<A>,
    options: &ReadOptions,
    decode: F,
) -> CdbResult<BTreeMap<i32, T>>
where
    A: CdbAccess,
    R: RawRecord,
    F: FnMut(&R) -> Option<(i32, T)>,
{
    let schema = R::SCHEMA;
    let MinorKey::Fixed(minor) = schema.minor else {
        return Err(CdbError::InvalidInput(format!(
            "record family {} has no fixed secondary key",
            schema.name
        )));
    };

    match session.key_state(schema.major, minor) {
        KeyState::Absent => {
            log::info!("Record {:>4} {minor:>4} does not exist", schema.major);
            Ok(BTreeMap::new())
        }
        KeyState::Empty => {
            log::info!(
                "Record {:>4} {minor:>4} exists, but does not contain data",
                schema.major
            );
            Ok(BTreeMap::new())
        }
        KeyState::Data => {
            log::info!("Record {:>4} {minor:>4} read", schema.major);
            scan_family(session, options, minor, decode)
        }
    }
}

/// Discover every secondary key below `max_secondary_key` holding data and
/// read each of them. Missing keys are skipped silently.
pub fn scan_enumerated<A, R, T, F>(
    session: &mut Session<A>,
    options: &ReadOptions,
    mut decode: F,
) -> CdbResult<BTreeMap<i32, BTreeMap<i32, T>>>
where
    A: CdbAccess,
    R: RawRecord,
    F: FnMut(&R) -> Option<(i32, T)>,
{
    let major = R::SCHEMA.major;
    let mut families = BTreeMap::new();

    for minor in 0..options.max_secondary_key {
        if !session.key_state(major, minor).is_readable() {
            continue;
        }
        log::info!("Record {major:>4} {minor:>4} read");
        let items = scan_family(session, options, minor, &mut decode)?;
        families.insert(minor, items);
    }

    Ok(families)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::MemoryCdb;
    use crate::schema::{RawBeam, RawBeamSection, RawBricStress, RawNode};
    use std::ffi::CStr;

    fn node(nr: i32, z: f32) -> RawNode {
        RawNode {
            nr,
            xyz: [0.0, 0.0, z],
            ..RawNode::default()
        }
    }

    fn decode_node(raw: &RawNode) -> Option<(i32, f32)> {
        (raw.nr > 0).then_some((raw.nr, raw.xyz[2]))
    }

    fn with_session<T>(
        db: &mut MemoryCdb,
        options: &ReadOptions,
        f: impl FnOnce(&mut Session<&mut MemoryCdb>) -> T,
    ) -> T {
        let file = tempfile::Builder::new().suffix(".cdb").tempfile().unwrap();
        let mut session = Session::open(file.path(), db, options).unwrap();
        f(&mut session)
    }

    #[test]
    fn test_sentinel_slots_are_skipped() {
        let mut db = MemoryCdb::new();
        db.push(&node(1, 1.0)).push(&node(0, 9.0)).push(&node(-5, 9.0)).push(&node(3, 3.0));
        let options = ReadOptions::default();

        let nodes = with_session(&mut db, &options, |s| {
            scan_single::<_, RawNode, _, _>(s, &options, decode_node).unwrap()
        });
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[&1], 1.0);
        assert_eq!(nodes[&3], 3.0);
    }

    #[test]
    fn test_cursor_and_length_reset_before_every_read() {
        let mut db = MemoryCdb::new();
        db.push(&node(1, 1.0)).push(&node(2, 2.0));
        let options = ReadOptions::default();

        with_session(&mut db, &options, |s| {
            scan_single::<_, RawNode, _, _>(s, &options, decode_node).unwrap()
        });
        // Two records, then the end-of-family call
        assert_eq!(db.reads.len(), 3);
        for call in &db.reads {
            assert_eq!(call.length, RawNode::SIZE as i32);
            assert_eq!(call.position, 1);
        }
    }

    #[test]
    fn test_absent_and_empty_families_are_not_read() {
        let mut db = MemoryCdb::new();
        db.declare_empty(20, 0);
        let options = ReadOptions::default();

        let nodes = with_session(&mut db, &options, |s| {
            scan_single::<_, RawNode, _, _>(s, &options, decode_node).unwrap()
        });
        assert!(nodes.is_empty());
        assert!(db.reads.is_empty());

        let mut db = MemoryCdb::new();
        let nodes = with_session(&mut db, &options, |s| {
            scan_single::<_, RawNode, _, _>(s, &options, decode_node).unwrap()
        });
        assert!(nodes.is_empty());
    }

    #[test]
    fn test_enumeration_discovers_load_cases() {
        let mut db = MemoryCdb::new();
        for (lc, nr) in [(1, 10), (1, 11), (7, 10)] {
            db.push_at(
                lc,
                &RawBricStress {
                    nr,
                    sigx: lc as f32,
                    ..RawBricStress::default()
                },
            );
        }
        db.declare_empty(310, 3);
        let options = ReadOptions::default().with_max_secondary_key(20);

        let cases = with_session(&mut db, &options, |s| {
            scan_enumerated::<_, RawBricStress, _, _>(s, &options, |raw| {
                (raw.nr > 0).then_some((raw.nr, raw.sigx))
            })
            .unwrap()
        });
        assert_eq!(cases.keys().copied().collect::<Vec<_>>(), vec![1, 7]);
        assert_eq!(cases[&1].len(), 2);
        assert_eq!(cases[&7][&10], 7.0);
    }

    #[test]
    fn test_records_of_another_layout_are_skipped() {
        let mut db = MemoryCdb::new();
        db.push(&RawBeam {
            nr: 21,
            node: [1, 2],
            dl: 4.0,
            ..RawBeam::default()
        });
        db.push(&RawBeamSection {
            id: 21,
            x: 0.5,
            nq: 3,
            ..RawBeamSection::default()
        });
        let options = ReadOptions::default();

        let beams = with_session(&mut db, &options, |s| {
            scan_single::<_, RawBeam, _, _>(s, &options, |raw| Some((raw.nr, raw.node)))
                .unwrap()
        });
        assert_eq!(beams.len(), 1);
        assert_eq!(beams[&21], [1, 2]);

        let sections = with_session(&mut db, &options, |s| {
            scan_single::<_, RawBeamSection, _, _>(s, &options, |raw| Some((raw.id, raw.nq)))
                .unwrap()
        });
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[&21], 3);
    }

    #[test]
    fn test_single_scan_rejects_enumerated_family() {
        let mut db = MemoryCdb::new();
        let options = ReadOptions::default();
        let result = with_session(&mut db, &options, |s| {
            scan_single::<_, RawBricStress, i32, _>(s, &options, |_| None)
        });
        assert!(matches!(result, Err(CdbError::InvalidInput(_))));
    }

    /// Access primitive that never reports the end of a family
    struct Endless;

    impl CdbAccess for Endless {
        fn init(&mut self, _path: &CStr, _mode: i32) -> i32 {
            1
        }
        fn status(&self, _index: i32) -> i32 {
            1
        }
        fn key_exists(&self, _major: i32, _minor: i32) -> i32 {
            2
        }
        fn get(&mut self, _: i32, _: i32, _: i32, buffer: &mut [u8], _: &mut i32, _: i32) -> i32 {
            buffer[0] = 1;
            0
        }
        fn close(&mut self, _index: i32) -> i32 {
            0
        }
    }

    #[test]
    fn test_read_loop_is_capped() {
        let file = tempfile::Builder::new().suffix(".cdb").tempfile().unwrap();
        let options = ReadOptions::default().with_max_reads(50);
        let mut session = Session::open(file.path(), Endless, &options).unwrap();

        let result = scan_single::<_, RawNode, _, _>(&mut session, &options, decode_node);
        match result {
            Err(CdbError::ScanLimitExceeded { major, minor, limit }) => {
                assert_eq!((major, minor, limit), (20, 0, 50));
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    /// Access primitive answering with fixed, possibly undocumented codes
    struct FixedCodes {
        existence: i32,
        status: i32,
        reads: usize,
    }

    impl CdbAccess for FixedCodes {
        fn init(&mut self, _path: &CStr, _mode: i32) -> i32 {
            1
        }
        fn status(&self, _index: i32) -> i32 {
            1
        }
        fn key_exists(&self, _major: i32, _minor: i32) -> i32 {
            self.existence
        }
        fn get(&mut self, _: i32, _: i32, _: i32, buffer: &mut [u8], _: &mut i32, _: i32) -> i32 {
            self.reads += 1;
            buffer[0] = 1;
            self.status
        }
        fn close(&mut self, _index: i32) -> i32 {
            0
        }
    }

    #[test]
    fn test_unknown_existence_code_reads_nothing() {
        let file = tempfile::Builder::new().suffix(".cdb").tempfile().unwrap();
        let options = ReadOptions::default();
        let mut access = FixedCodes {
            existence: 7,
            status: 0,
            reads: 0,
        };
        let mut session = Session::open(file.path(), &mut access, &options).unwrap();

        assert_eq!(session.key_state(20, 0), KeyState::Absent);
        let nodes = scan_single::<_, RawNode, _, _>(&mut session, &options, decode_node).unwrap();
        assert!(nodes.is_empty());
        drop(session);
        assert_eq!(access.reads, 0);
    }

    #[test]
    fn test_unknown_read_status_ends_family() {
        let file = tempfile::Builder::new().suffix(".cdb").tempfile().unwrap();
        let options = ReadOptions::default();
        let mut access = FixedCodes {
            existence: 2,
            status: 5,
            reads: 0,
        };
        let mut session = Session::open(file.path(), &mut access, &options).unwrap();

        let mut buffer = vec![0u8; RawNode::SIZE];
        let mut length = RawNode::SIZE as i32;
        assert_eq!(
            session.read(20, 0, &mut buffer, &mut length, 1),
            crate::access::ReadStatus::End
        );
        let nodes = scan_single::<_, RawNode, _, _>(&mut session, &options, decode_node).unwrap();
        assert!(nodes.is_empty());
        drop(session);
        // One direct read, then a single read for the scan
        assert_eq!(access.reads, 2);
    }
}
