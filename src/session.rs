//! Database session: one open handle of the external database
//!
//! A [`Session`] is opened once, used by one scan at a time and closed
//! exactly once, either explicitly through [`Session::close`] or when it is
//! dropped. Dropping covers every early return and decode error, so a
//! partially read database always releases its handle.

use std::ffi::CString;
use std::path::{Path, PathBuf};

use crate::access::{CdbAccess, CdbLibrary, KeyState, ReadStatus};
use crate::error::{CdbError, CdbResult};
use crate::options::ReadOptions;

/// Expected database file extension
pub const DATABASE_EXTENSION: &str = "cdb";

/// Check that `path` names an existing `.cdb` file and convert it for the
/// foreign `init` call.
pub fn validate_database_path(path: &Path) -> CdbResult<CString> {
    if !path.is_file() {
        return Err(CdbError::InvalidInput(format!(
            "database file {} does not exist",
            path.display()
        )));
    }
    let has_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(DATABASE_EXTENSION));
    if !has_extension {
        return Err(CdbError::InvalidInput(format!(
            "{} is not a database (.{DATABASE_EXTENSION}) file",
            path.display()
        )));
    }
    let text = path.to_str().ok_or_else(|| {
        CdbError::InvalidInput(format!("{} is not valid UTF-8", path.display()))
    })?;
    CString::new(text).map_err(|_| {
        CdbError::InvalidInput(format!("{} contains a NUL byte", path.display()))
    })
}

/// An open database handle
pub struct Session<A: CdbAccess> {
    access: A,
    index: i32,
    path: PathBuf,
    closed: bool,
}

impl<A: CdbAccess> Session<A> {
    /// Validate `path` and open it through `access`
    pub fn open(path: impl AsRef<Path>, access: A, options: &ReadOptions) -> CdbResult<Self> {
        let path = path.as_ref();
        let c_path = validate_database_path(path)?;
        Self::open_validated(path, &c_path, access, options.open_mode)
    }

    fn open_validated(path: &Path, c_path: &CString, mut access: A, mode: i32) -> CdbResult<Self> {
        log::info!("Reading CDB database from {}", path.display());

        let index = access.init(c_path, mode);
        if index <= 0 {
            let err = CdbError::open_failure(index);
            log::error!("{err}");
            return Err(err);
        }
        log::info!("CDB index {index}: database opened");

        let session = Self {
            access,
            index,
            path: path.to_path_buf(),
            closed: false,
        };
        log::info!("CDB status: {}", session.status());
        Ok(session)
    }

    /// Handle index returned by `init`
    pub fn index(&self) -> i32 {
        self.index
    }

    /// Path of the open database
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Informational status code of the handle (0 = closed)
    pub fn status(&self) -> i32 {
        self.access.status(self.index)
    }

    /// Existence of the (major, minor) record family
    pub fn key_state(&self, major: i32, minor: i32) -> KeyState {
        let code = self.access.key_exists(major, minor);
        KeyState::from_code(code).unwrap_or_else(|| {
            log::warn!("Record {major:>4} {minor:>4}: unknown existence code {code}");
            KeyState::Absent
        })
    }

    /// Read the next record of a family into `buffer`.
    ///
    /// Status codes outside 0..=2 end the family.
    pub fn read(
        &mut self,
        major: i32,
        minor: i32,
        buffer: &mut [u8],
        length: &mut i32,
        position: i32,
    ) -> ReadStatus {
        let code = self
            .access
            .get(self.index, major, minor, buffer, length, position);
        ReadStatus::from_code(code).unwrap_or_else(|| {
            log::warn!("Record {major:>4} {minor:>4}: unexpected read status {code}");
            ReadStatus::End
        })
    }

    /// Close the handle now
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        let code = self.access.close(self.index);
        if code != 0 {
            log::warn!("CDB close returned {code}");
        }
        match self.access.status(self.index) {
            0 => log::info!("CDB status: 0 - database closed"),
            status => log::info!("CDB status: {status}"),
        }
    }
}

impl Session<CdbLibrary> {
    /// Validate `path`, load the access library named in `options` and open
    pub fn open_with_library(path: impl AsRef<Path>, options: &ReadOptions) -> CdbResult<Self> {
        let path = path.as_ref();
        let c_path = validate_database_path(path)?;
        let library_path = options.library.as_deref().ok_or_else(|| {
            CdbError::InvalidInput(format!(
                "no access library configured (set {})",
                crate::options::LIBRARY_ENV
            ))
        })?;
        let library = CdbLibrary::load(library_path)?;
        Self::open_validated(path, &c_path, library, options.open_mode)
    }
}

impl<A: CdbAccess> Drop for Session<A> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::MemoryCdb;
    use crate::error::OpenFailure;

    fn database_file() -> tempfile::NamedTempFile {
        tempfile::Builder::new()
            .suffix(".cdb")
            .tempfile()
            .unwrap()
    }

    #[test]
    fn test_missing_file_fails_before_init() {
        let mut db = MemoryCdb::new();
        let result = Session::open("/nonexistent/model.cdb", &mut db, &ReadOptions::default());
        assert!(matches!(result, Err(CdbError::InvalidInput(_))));
        drop(result);
        assert!(db.opened_path.is_none());
    }

    #[test]
    fn test_wrong_extension() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        let mut db = MemoryCdb::new();
        let result = Session::open(file.path(), &mut db, &ReadOptions::default());
        assert!(matches!(result, Err(CdbError::InvalidInput(_))));
        drop(result);
        assert!(db.opened_path.is_none());
    }

    #[test]
    fn test_negative_index_is_corrupt() {
        let file = database_file();
        let mut db = MemoryCdb::new().with_index(-4);
        match Session::open(file.path(), &mut db, &ReadOptions::default()) {
            Err(CdbError::DatabaseOpen { index, reason }) => {
                assert_eq!(index, -4);
                assert_eq!(reason, OpenFailure::Corrupt);
            }
            _ => panic!("expected open failure"),
        }
        // Nothing was opened, nothing to close
        assert_eq!(db.closes, 0);
    }

    #[test]
    fn test_zero_index_is_not_a_database() {
        let file = database_file();
        let mut db = MemoryCdb::new().with_index(0);
        let result = Session::open(file.path(), &mut db, &ReadOptions::default());
        assert!(matches!(
            result,
            Err(CdbError::DatabaseOpen {
                reason: OpenFailure::NotADatabase,
                ..
            })
        ));
    }

    #[test]
    fn test_drop_closes_once() {
        let file = database_file();
        let mut db = MemoryCdb::new();
        {
            let session = Session::open(file.path(), &mut db, &ReadOptions::default()).unwrap();
            assert_eq!(session.index(), 1);
            assert_eq!(session.status(), 1);
        }
        assert_eq!(db.closes, 1);
        assert!(!db.is_open());
    }

    #[test]
    fn test_explicit_close_is_not_repeated_on_drop() {
        let file = database_file();
        let mut db = MemoryCdb::new();
        let session = Session::open(file.path(), &mut db, &ReadOptions::default()).unwrap();
        session.close();
        assert_eq!(db.closes, 1);
    }

    #[test]
    fn test_library_required() {
        let file = database_file();
        let result = Session::<CdbLibrary>::open_with_library(file.path(), &ReadOptions::default());
        assert!(matches!(result, Err(CdbError::InvalidInput(_))));
    }
}
