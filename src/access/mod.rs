//! Access primitives of the external database
//!
//! The database is only reachable through five C functions. [`CdbAccess`]
//! gives them safe signatures so the session and scanner can run against
//! the vendor library ([`CdbLibrary`]) or an in-memory replay
//! ([`MemoryCdb`]).

mod library;
mod memory;

use std::ffi::CStr;

pub use library::CdbLibrary;
pub use memory::{MemoryCdb, ReadCall};

/// The five primitives exposed by the access library
pub trait CdbAccess {
    /// Open the database at `path`; returns the handle index (> 0 on success)
    fn init(&mut self, path: &CStr, mode: i32) -> i32;

    /// Status of an open handle (0 = closed)
    fn status(&self, index: i32) -> i32;

    /// Existence of a record family: 0 absent, 1 empty, 2 has data
    fn key_exists(&self, major: i32, minor: i32) -> i32;

    /// Copy the next record of a family into `buffer`.
    ///
    /// `length` holds the buffer size on entry and may be rewritten.
    /// Returns 0 when more records follow, 1 for the final record and 2
    /// when nothing more is delivered.
    fn get(
        &mut self,
        index: i32,
        major: i32,
        minor: i32,
        buffer: &mut [u8],
        length: &mut i32,
        position: i32,
    ) -> i32;

    /// Release the handle
    fn close(&mut self, index: i32) -> i32;
}

impl<A: CdbAccess + ?Sized> CdbAccess for Box<A> {
    fn init(&mut self, path: &CStr, mode: i32) -> i32 {
        (**self).init(path, mode)
    }

    fn status(&self, index: i32) -> i32 {
        (**self).status(index)
    }

    fn key_exists(&self, major: i32, minor: i32) -> i32 {
        (**self).key_exists(major, minor)
    }

    fn get(
        &mut self,
        index: i32,
        major: i32,
        minor: i32,
        buffer: &mut [u8],
        length: &mut i32,
        position: i32,
    ) -> i32 {
        (**self).get(index, major, minor, buffer, length, position)
    }

    fn close(&mut self, index: i32) -> i32 {
        (**self).close(index)
    }
}

impl<A: CdbAccess + ?Sized> CdbAccess for &mut A {
    fn init(&mut self, path: &CStr, mode: i32) -> i32 {
        (**self).init(path, mode)
    }

    fn status(&self, index: i32) -> i32 {
        (**self).status(index)
    }

    fn key_exists(&self, major: i32, minor: i32) -> i32 {
        (**self).key_exists(major, minor)
    }

    fn get(
        &mut self,
        index: i32,
        major: i32,
        minor: i32,
        buffer: &mut [u8],
        length: &mut i32,
        position: i32,
    ) -> i32 {
        (**self).get(index, major, minor, buffer, length, position)
    }

    fn close(&mut self, index: i32) -> i32 {
        (**self).close(index)
    }
}

/// Three-state result of an existence check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    /// Family does not exist
    Absent,
    /// Family exists but holds no data
    Empty,
    /// Family exists and can be read
    Data,
}

impl KeyState {
    /// Interpret an existence code; `None` for codes outside 0..=2
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(KeyState::Absent),
            1 => Some(KeyState::Empty),
            2 => Some(KeyState::Data),
            _ => None,
        }
    }

    /// Only families with data may be read
    pub fn is_readable(self) -> bool {
        self == KeyState::Data
    }
}

/// Result of one call to the read primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatus {
    /// A record was delivered and more follow
    More,
    /// The final record was delivered
    Last,
    /// Nothing was delivered
    End,
}

impl ReadStatus {
    /// Interpret a read status code; `None` for codes outside 0..=2
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(ReadStatus::More),
            1 => Some(ReadStatus::Last),
            2 => Some(ReadStatus::End),
            _ => None,
        }
    }

    /// A record was delivered and the read loop goes on (code < 2)
    pub fn continues(self) -> bool {
        self != ReadStatus::End
    }
}
