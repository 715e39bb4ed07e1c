// Copyright 2026 the Marshal Reader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoder for the legacy marshal serialization format.
//!
//! The format persists a compiled unit's data graph as a stream of tagged values: a one-byte tag
//! selects the variant, scalars follow in fixed or length-prefixed form, composites recurse, and
//! interned strings can be referenced again later by index. A compiled-unit file prefixes the
//! root value with an 8-byte [`StreamHeader`].
//!
//! This crate only decodes. It does not interpret the header magic, the code record flags, or
//! the instruction bytes.
//!
//! ## Example
//! ```
//! use marshal_reader::{Value, decode_value};
//!
//! let v = decode_value(b"(\x02\x00\x00\x00NT").unwrap();
//! assert_eq!(v, Value::Tuple(vec![Value::None, Value::Bool(true)]));
//! ```
//!
//! ## Features
//! - `std`: adds [`read_from`] for decoding from a [`std::io::Read`].

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod code;
pub mod decoder;
pub mod format;
pub mod intern;
pub mod value;

pub use code::{CodeField, CodeFlags, CodeRecord, FieldRef};
pub use decoder::{Decoder, Limits};
pub use format::cursor::ByteCursor;
pub use format::header::StreamHeader;
pub use format::tag::Tag;
pub use format::{DecodeError, DecodeErrorKind};
pub use intern::InternTable;
pub use value::Value;

/// A decoded compiled-unit file: header plus root value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarshalFile {
    /// Leading header fields.
    pub header: StreamHeader,
    /// The root value, normally a [`Value::Code`].
    pub root: Value,
}

impl MarshalFile {
    /// The root code record, if the root is one.
    #[must_use]
    pub fn code(&self) -> Option<&CodeRecord> {
        self.root.as_code()
    }
}

/// Decodes a bare value (no header) with default limits.
pub fn decode_value(bytes: &[u8]) -> Result<Value, DecodeError> {
    Decoder::new(bytes).decode_value()
}

/// Decodes a header followed by one root value with default limits.
///
/// Bytes after the root value are ignored.
pub fn decode_stream(bytes: &[u8]) -> Result<MarshalFile, DecodeError> {
    decode_stream_with_limits(bytes, Limits::default())
}

/// Decodes a header followed by one root value.
pub fn decode_stream_with_limits(bytes: &[u8], limits: Limits) -> Result<MarshalFile, DecodeError> {
    let mut decoder = Decoder::with_limits(bytes, limits);
    let header = decoder.read_header()?;
    let root = decoder.decode_value()?;
    Ok(MarshalFile { header, root })
}

/// Errors from [`read_from`].
#[cfg(feature = "std")]
#[derive(Debug)]
pub enum ReadError {
    /// Reading the source failed.
    Io(std::io::Error),
    /// The bytes did not decode.
    Decode(DecodeError),
}

#[cfg(feature = "std")]
impl core::fmt::Display for ReadError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "read failed: {err}"),
            Self::Decode(err) => write!(f, "decode failed: {err}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Decode(err) => Some(err),
        }
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for ReadError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

#[cfg(feature = "std")]
impl From<DecodeError> for ReadError {
    fn from(err: DecodeError) -> Self {
        Self::Decode(err)
    }
}

/// Reads `reader` to the end and decodes it as a header plus root value.
#[cfg(feature = "std")]
pub fn read_from<R: std::io::Read>(mut reader: R, limits: Limits) -> Result<MarshalFile, ReadError> {
    let mut bytes = alloc::vec::Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(decode_stream_with_limits(&bytes, limits)?)
}
