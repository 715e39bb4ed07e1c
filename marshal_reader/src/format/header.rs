// Copyright 2026 the Marshal Reader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The fixed-width header that precedes the root value in a compiled-unit file.

use crate::format::DecodeError;
use crate::format::cursor::ByteCursor;

/// The two leading header fields.
///
/// Neither field is validated: interpreting the magic number is the caller's job.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct StreamHeader {
    /// Producer/version magic number.
    pub magic: u32,
    /// Source modification time, in seconds since the Unix epoch.
    pub mtime: u32,
}

impl StreamHeader {
    /// Encoded size of the header in bytes.
    pub const LEN: usize = 8;

    /// Reads the header from the front of `cursor`.
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        let magic = cursor.read_u32_le()?;
        let mtime = cursor.read_u32_le()?;
        Ok(Self { magic, mtime })
    }
}
