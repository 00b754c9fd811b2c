//! Binding to the vendor access library
//!
//! All foreign calls of the crate live in this file.

use std::ffi::{c_char, c_int, c_void, CStr};
use std::path::Path;

use libloading::Library;

use super::CdbAccess;
use crate::error::{CdbError, CdbResult};

type InitFn = unsafe extern "C" fn(*const c_char, c_int) -> c_int;
type StatusFn = unsafe extern "C" fn(c_int) -> c_int;
type KeyExistFn = unsafe extern "C" fn(c_int, c_int) -> c_int;
type GetFn = unsafe extern "C" fn(c_int, c_int, c_int, *mut c_void, *mut c_int, c_int) -> c_int;
type CloseFn = unsafe extern "C" fn(c_int) -> c_int;

/// Database access primitives resolved from a shared library
pub struct CdbLibrary {
    init: InitFn,
    status: StatusFn,
    key_exist: KeyExistFn,
    get: GetFn,
    close: CloseFn,
    // Keeps the function pointers above valid
    _library: Library,
}

impl CdbLibrary {
    /// Load the library at `path` and resolve its five entry points
    pub fn load(path: impl AsRef<Path>) -> CdbResult<Self> {
        let path = path.as_ref();
        log::info!("Loading CDB access library {}", path.display());

        // SAFETY: loading runs the library's initialisers; the vendor
        // library has no initialisation side effects beyond its own state.
        let library = unsafe { Library::new(path) }
            .map_err(|e| CdbError::LibraryLoad(format!("{}: {e}", path.display())))?;

        // SAFETY: the declared types match the vendor's C prototypes.
        unsafe {
            Ok(Self {
                init: symbol(&library, b"sof_cdb_init\0")?,
                status: symbol(&library, b"sof_cdb_status\0")?,
                key_exist: symbol(&library, b"sof_cdb_kexist\0")?,
                get: symbol(&library, b"sof_cdb_get\0")?,
                close: symbol(&library, b"sof_cdb_close\0")?,
                _library: library,
            })
        }
    }
}

/// Resolve one exported function pointer.
///
/// # Safety
///
/// `T` must match the C prototype of `name`, and the pointer must not
/// outlive `library`.
unsafe fn symbol<T: Copy>(library: &Library, name: &[u8]) -> CdbResult<T> {
    library.get::<T>(name).map(|s| *s).map_err(|e| {
        let name = String::from_utf8_lossy(name.strip_suffix(b"\0").unwrap_or(name));
        CdbError::LibraryLoad(format!("missing symbol {name}: {e}"))
    })
}

impl CdbAccess for CdbLibrary {
    fn init(&mut self, path: &CStr, mode: i32) -> i32 {
        // SAFETY: `path` is NUL terminated and outlives the call.
        unsafe { (self.init)(path.as_ptr(), mode) }
    }

    fn status(&self, index: i32) -> i32 {
        // SAFETY: plain integer call.
        unsafe { (self.status)(index) }
    }

    fn key_exists(&self, major: i32, minor: i32) -> i32 {
        // SAFETY: plain integer call.
        unsafe { (self.key_exist)(major, minor) }
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
        // The library writes at most `*length` bytes.
        let capacity = i32::try_from(buffer.len()).unwrap_or(i32::MAX);
        *length = (*length).clamp(0, capacity);
        // SAFETY: `buffer` is valid for `*length` bytes and `length` is a
        // live, exclusive i32 for the duration of the call.
        unsafe {
            (self.get)(
                index,
                major,
                minor,
                buffer.as_mut_ptr().cast::<c_void>(),
                length as *mut i32,
                position,
            )
        }
    }

    fn close(&mut self, index: i32) -> i32 {
        // SAFETY: plain integer call.
        unsafe { (self.close)(index) }
    }
}
