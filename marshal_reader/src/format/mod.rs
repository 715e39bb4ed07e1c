// Copyright 2026 the Marshal Reader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wire-level building blocks: the byte cursor, the tag table, the stream header, and the
//! decode error type shared by all of them.

use core::fmt;

use crate::code::CodeField;

pub mod cursor;
pub mod header;
pub mod tag;

/// What went wrong while decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// The input ended before a field or header was complete.
    UnexpectedEof,
    /// The tag byte is not part of the tag table (or is reserved and undecodable).
    InvalidTypeTag(u8),
    /// A string back-reference pointed past the end of the intern table.
    InvalidReference(u32),
    /// A length or count prefix was negative.
    MalformedLength(i32),
    /// Composite nesting exceeded [`crate::Limits::max_depth`].
    DepthExceeded {
        /// The configured ceiling.
        limit: usize,
    },
    /// The null sentinel appeared somewhere other than a dict-key position.
    UnexpectedNull,
    /// A unicode payload was not valid UTF-8.
    InvalidUtf8,
    /// A legacy float payload was not a parseable decimal number.
    InvalidFloat,
    /// A long-integer digit was outside `[0, 2^15)`.
    LongDigitOutOfRange(i16),
    /// A code record field decoded to a value of the wrong shape.
    BadCodeField(CodeField),
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => write!(f, "unexpected end of input"),
            Self::InvalidTypeTag(tag) => {
                write!(f, "invalid type tag: 0x{tag:02x}")?;
                if tag.is_ascii_graphic() {
                    write!(f, " ({:?})", char::from(*tag))?;
                }
                Ok(())
            }
            Self::InvalidReference(index) => write!(f, "string reference {index} is unresolved"),
            Self::MalformedLength(len) => write!(f, "malformed length prefix: {len}"),
            Self::DepthExceeded { limit } => write!(f, "nesting depth exceeds limit of {limit}"),
            Self::UnexpectedNull => write!(f, "null sentinel outside of a dict key position"),
            Self::InvalidUtf8 => write!(f, "unicode payload is not valid UTF-8"),
            Self::InvalidFloat => write!(f, "float payload is not a decimal number"),
            Self::LongDigitOutOfRange(d) => write!(f, "long integer digit out of range: {d}"),
            Self::BadCodeField(field) => {
                write!(f, "code field `{}` has the wrong type", field.name())
            }
        }
    }
}

/// A decode failure together with the byte offset at which it was detected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeError {
    kind: DecodeErrorKind,
    offset: usize,
}

impl DecodeError {
    /// Creates an error of `kind` at byte `offset`.
    #[must_use]
    pub const fn new(kind: DecodeErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }

    /// The failure kind.
    #[must_use]
    pub const fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }

    /// Offset (from the start of the decoded buffer) of the field that failed.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.kind, self.offset)
    }
}

impl core::error::Error for DecodeError {}
