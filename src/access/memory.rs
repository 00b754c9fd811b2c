//! In-memory database speaking the access protocol

use std::collections::{BTreeMap, HashMap};
use std::ffi::CStr;

use super::CdbAccess;
use crate::schema::{MinorKey, RawRecord};

/// One call made to [`MemoryCdb::get`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadCall {
    pub major: i32,
    pub minor: i32,
    /// Buffer length passed in
    pub length: i32,
    pub position: i32,
}

/// Encoded records held in memory, served with the same existence and
/// read-status protocol as the vendor library
#[derive(Debug, Clone)]
pub struct MemoryCdb {
    families: BTreeMap<(i32, i32), Vec<Vec<u8>>>,
    cursors: HashMap<(i32, i32), usize>,
    index: i32,
    open: bool,
    /// Path handed to `init`
    pub opened_path: Option<String>,
    /// Number of `close` calls
    pub closes: usize,
    /// Every read issued, in order
    pub reads: Vec<ReadCall>,
}

impl Default for MemoryCdb {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCdb {
    /// Empty database opening with handle index 1
    pub fn new() -> Self {
        Self {
            families: BTreeMap::new(),
            cursors: HashMap::new(),
            index: 1,
            open: false,
            opened_path: None,
            closes: 0,
            reads: Vec::new(),
        }
    }

    /// Make `init` return `index` (use <= 0 to simulate open failures)
    pub fn with_index(mut self, index: i32) -> Self {
        self.index = index;
        self
    }

    /// Append a record to its schema's family.
    ///
    /// Enumerated families land under secondary key 0; use [`Self::push_at`]
    /// to choose the key.
    pub fn push<R: RawRecord>(&mut self, record: &R) -> &mut Self {
        let minor = match R::SCHEMA.minor {
            MinorKey::Fixed(minor) => minor,
            MinorKey::Enumerated => 0,
        };
        self.push_at(minor, record)
    }

    /// Append a record under an explicit secondary key
    pub fn push_at<R: RawRecord>(&mut self, minor: i32, record: &R) -> &mut Self {
        self.push_raw(R::SCHEMA.major, minor, record.encode())
    }

    /// Append raw bytes to the (major, minor) family
    pub fn push_raw(&mut self, major: i32, minor: i32, bytes: Vec<u8>) -> &mut Self {
        self.families.entry((major, minor)).or_default().push(bytes);
        self
    }

    /// Declare a family that exists but holds no data
    pub fn declare_empty(&mut self, major: i32, minor: i32) -> &mut Self {
        self.families.entry((major, minor)).or_default();
        self
    }

    /// Whether a handle is currently open
    pub fn is_open(&self) -> bool {
        self.open
    }
}

impl CdbAccess for MemoryCdb {
    fn init(&mut self, path: &CStr, _mode: i32) -> i32 {
        self.opened_path = Some(path.to_string_lossy().into_owned());
        self.open = self.index > 0;
        self.index
    }

    fn status(&self, _index: i32) -> i32 {
        i32::from(self.open)
    }

    fn key_exists(&self, major: i32, minor: i32) -> i32 {
        match self.families.get(&(major, minor)) {
            None => 0,
            Some(records) if records.is_empty() => 1,
            Some(_) => 2,
        }
    }

    fn get(
        &mut self,
        _index: i32,
        major: i32,
        minor: i32,
        buffer: &mut [u8],
        length: &mut i32,
        position: i32,
    ) -> i32 {
        self.reads.push(ReadCall {
            major,
            minor,
            length: *length,
            position,
        });

        let Some(records) = self.families.get(&(major, minor)) else {
            return 2;
        };
        let cursor = self.cursors.entry((major, minor)).or_insert(0);
        let Some(record) = records.get(*cursor) else {
            // Exhausted: the next scan starts over
            *cursor = 0;
            *length = 0;
            return 2;
        };

        // Like the vendor library, report the stored record's own length
        let n = record.len().min(buffer.len());
        buffer[..n].copy_from_slice(&record[..n]);
        *length = i32::try_from(record.len()).unwrap_or(i32::MAX);
        *cursor += 1;

        if *cursor < records.len() {
            0
        } else {
            1
        }
    }

    fn close(&mut self, _index: i32) -> i32 {
        self.open = false;
        self.closes += 1;
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RawNode;

    #[test]
    fn test_existence_states() {
        let mut db = MemoryCdb::new();
        db.push(&RawNode {
            nr: 1,
            ..RawNode::default()
        });
        db.declare_empty(100, 0);

        assert_eq!(db.key_exists(20, 0), 2);
        assert_eq!(db.key_exists(100, 0), 1);
        assert_eq!(db.key_exists(150, 0), 0);
    }

    #[test]
    fn test_read_protocol() {
        let mut db = MemoryCdb::new();
        for nr in 1..=2 {
            db.push(&RawNode {
                nr,
                ..RawNode::default()
            });
        }

        let mut buffer = vec![0u8; RawNode::SIZE];
        let mut length = RawNode::SIZE as i32;
        assert_eq!(db.get(1, 20, 0, &mut buffer, &mut length, 1), 0);
        assert_eq!(RawNode::decode(&buffer).unwrap().nr, 1);
        assert_eq!(db.get(1, 20, 0, &mut buffer, &mut length, 1), 1);
        assert_eq!(RawNode::decode(&buffer).unwrap().nr, 2);
        assert_eq!(db.get(1, 20, 0, &mut buffer, &mut length, 1), 2);
        assert_eq!(length, 0);
        // Cursor rewinds after the end
        length = RawNode::SIZE as i32;
        assert_eq!(db.get(1, 20, 0, &mut buffer, &mut length, 1), 0);
        assert_eq!(db.reads.len(), 4);
    }

    #[test]
    fn test_reports_stored_record_length() {
        let mut db = MemoryCdb::new();
        db.push_raw(100, 0, vec![7u8; 76]);

        let mut buffer = vec![0u8; 20];
        let mut length = 20;
        assert_eq!(db.get(1, 100, 0, &mut buffer, &mut length, 1), 1);
        assert_eq!(length, 76);
        assert_eq!(buffer, vec![7u8; 20]);
    }
}
