//! Binary record schema
//!
//! Every record family of the database is read into a fixed-layout buffer
//! whose shape must match the access library's published structure exactly.
//! The raw structs in [`records`] are `#[repr(C)]` and built only from
//! 4-byte little-endian scalars, so field offsets come straight from
//! `offset_of!` and the struct size is checked at compile time.

use crate::error::{CdbError, CdbResult};

/// Declare a raw record struct with its schema and byte codec.
macro_rules! raw_record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident [$size:literal, id = $id:ident] = $schema:expr;
        {
            $( $(#[$fmeta:meta])* pub $field:ident : $ty:ty ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(C)]
        #[derive(Debug, Clone, Copy, Default, PartialEq)]
        pub struct $name {
            $( $(#[$fmeta])* pub $field: $ty ),+
        }

        const _: () = assert!(std::mem::size_of::<$name>() == $size);

        impl $crate::schema::RawRecord for $name {
            const SCHEMA: $crate::schema::RecordSchema = $schema;

            fn id(&self) -> i32 {
                self.$id
            }

            fn decode(bytes: &[u8]) -> $crate::error::CdbResult<Self> {
                $crate::schema::check_len(&Self::SCHEMA, $size, bytes)?;
                Ok(Self {
                    $( $field: <$ty as $crate::schema::Field>::read(
                        &bytes[std::mem::offset_of!($name, $field)..],
                    ), )+
                })
            }

            fn encode(&self) -> Vec<u8> {
                let mut out = vec![0u8; $size];
                $( $crate::schema::Field::write(
                    &self.$field,
                    &mut out[std::mem::offset_of!($name, $field)..],
                ); )+
                out
            }
        }
    };
}

pub(crate) use raw_record;

pub mod records;

pub use records::{
    RawBeam, RawBeamSection, RawBric, RawBricStress, RawCable, RawNode, RawQuad, RawSpring,
    RawSystem, RawTruss,
};

/// Secondary key of a record family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinorKey {
    /// Known constant secondary key
    Fixed(i32),
    /// Secondary keys must be discovered by enumeration (e.g. load cases)
    Enumerated,
}

/// Identifies a record family in the database and how to read it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSchema {
    /// Name of the family in the decoded model
    pub name: &'static str,
    /// Primary key
    pub major: i32,
    /// Secondary key
    pub minor: MinorKey,
    /// Read position overriding the configured start position
    pub position: Option<i32>,
}

impl RecordSchema {
    /// Family under a fixed (major, minor) pair
    pub const fn fixed(name: &'static str, major: i32, minor: i32) -> Self {
        Self {
            name,
            major,
            minor: MinorKey::Fixed(minor),
            position: None,
        }
    }

    /// Family whose secondary keys are enumerated
    pub const fn enumerated(name: &'static str, major: i32) -> Self {
        Self {
            name,
            major,
            minor: MinorKey::Enumerated,
            position: None,
        }
    }

    /// Always read from the given cursor position
    pub const fn at_position(mut self, position: i32) -> Self {
        self.position = Some(position);
        self
    }
}

/// A fixed-width little-endian field inside a raw record
pub trait Field: Sized {
    /// Width in bytes
    const WIDTH: usize;

    /// Read from the start of `bytes`
    fn read(bytes: &[u8]) -> Self;

    /// Write to the start of `out`
    fn write(&self, out: &mut [u8]);
}

impl Field for i32 {
    const WIDTH: usize = 4;

    fn read(bytes: &[u8]) -> Self {
        let mut word = [0u8; 4];
        word.copy_from_slice(&bytes[..4]);
        i32::from_le_bytes(word)
    }

    fn write(&self, out: &mut [u8]) {
        out[..4].copy_from_slice(&self.to_le_bytes());
    }
}

impl Field for f32 {
    const WIDTH: usize = 4;

    fn read(bytes: &[u8]) -> Self {
        let mut word = [0u8; 4];
        word.copy_from_slice(&bytes[..4]);
        f32::from_le_bytes(word)
    }

    fn write(&self, out: &mut [u8]) {
        out[..4].copy_from_slice(&self.to_le_bytes());
    }
}

impl<T: Field, const N: usize> Field for [T; N] {
    const WIDTH: usize = T::WIDTH * N;

    fn read(bytes: &[u8]) -> Self {
        std::array::from_fn(|i| T::read(&bytes[i * T::WIDTH..]))
    }

    fn write(&self, out: &mut [u8]) {
        for (i, item) in self.iter().enumerate() {
            item.write(&mut out[i * T::WIDTH..]);
        }
    }
}

/// A raw fixed-layout record as delivered by the access library
pub trait RawRecord: Sized + Default {
    /// Family descriptor
    const SCHEMA: RecordSchema;
    /// Byte size of the buffer handed to the read primitive
    const SIZE: usize = std::mem::size_of::<Self>();

    /// Declared id of the record; values <= 0 mark unused slots.
    /// The system record has no id and reports its group divisor.
    fn id(&self) -> i32;

    /// Decode from a buffer of at least [`Self::SIZE`] bytes
    fn decode(bytes: &[u8]) -> CdbResult<Self>;

    /// Encode into a buffer of exactly [`Self::SIZE`] bytes
    fn encode(&self) -> Vec<u8>;
}

pub(crate) fn check_len(schema: &RecordSchema, expected: usize, bytes: &[u8]) -> CdbResult<()> {
    if bytes.len() < expected {
        return Err(CdbError::RecordLayout {
            family: schema.name,
            expected,
            actual: bytes.len(),
        });
    }
    Ok(())
}
