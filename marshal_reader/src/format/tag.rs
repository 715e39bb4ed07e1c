// Copyright 2026 the Marshal Reader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The one-byte type tags of the marshal format.

/// A wire type tag.
///
/// Discriminants are the ASCII bytes written by the producer and must not change.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    /// End-of-dict sentinel.
    Null = b'0',
    /// `None`.
    None = b'N',
    /// `False`.
    False = b'F',
    /// `True`.
    True = b'T',
    /// The stop-iteration singleton.
    StopIteration = b'S',
    /// The ellipsis singleton.
    Ellipsis = b'.',
    /// Signed 32-bit integer.
    Int = b'i',
    /// 64-bit integer as two 32-bit halves.
    Int64 = b'I',
    /// Decimal text float.
    Float = b'f',
    /// IEEE-754 double.
    BinaryFloat = b'g',
    /// Decimal text complex number.
    Complex = b'x',
    /// IEEE-754 complex number.
    BinaryComplex = b'y',
    /// Arbitrary-precision integer in base 2^15 digits.
    Long = b'l',
    /// Raw byte string.
    String = b's',
    /// Byte string that is also appended to the intern table.
    Interned = b't',
    /// Back-reference into the intern table.
    StringRef = b'R',
    /// Tuple.
    Tuple = b'(',
    /// List.
    List = b'[',
    /// Dict, terminated by a null key.
    Dict = b'{',
    /// Compiled-unit record.
    Code = b'c',
    /// UTF-8 text.
    Unicode = b'u',
    /// Written by producers for unmarshallable objects; never decodable.
    Unknown = b'?',
    /// Set.
    Set = b'<',
    /// Frozen set.
    FrozenSet = b'>',
}

impl Tag {
    /// Every tag, in table order.
    pub const ALL: [Self; 24] = [
        Self::Null,
        Self::None,
        Self::False,
        Self::True,
        Self::StopIteration,
        Self::Ellipsis,
        Self::Int,
        Self::Int64,
        Self::Float,
        Self::BinaryFloat,
        Self::Complex,
        Self::BinaryComplex,
        Self::Long,
        Self::String,
        Self::Interned,
        Self::StringRef,
        Self::Tuple,
        Self::List,
        Self::Dict,
        Self::Code,
        Self::Unicode,
        Self::Unknown,
        Self::Set,
        Self::FrozenSet,
    ];

    /// The wire byte for this tag.
    #[must_use]
    #[inline]
    pub const fn byte(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Tag {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Ok(match byte {
            b'0' => Self::Null,
            b'N' => Self::None,
            b'F' => Self::False,
            b'T' => Self::True,
            b'S' => Self::StopIteration,
            b'.' => Self::Ellipsis,
            b'i' => Self::Int,
            b'I' => Self::Int64,
            b'f' => Self::Float,
            b'g' => Self::BinaryFloat,
            b'x' => Self::Complex,
            b'y' => Self::BinaryComplex,
            b'l' => Self::Long,
            b's' => Self::String,
            b't' => Self::Interned,
            b'R' => Self::StringRef,
            b'(' => Self::Tuple,
            b'[' => Self::List,
            b'{' => Self::Dict,
            b'c' => Self::Code,
            b'u' => Self::Unicode,
            b'?' => Self::Unknown,
            b'<' => Self::Set,
            b'>' => Self::FrozenSet,
            other => return Err(other),
        })
    }
}
