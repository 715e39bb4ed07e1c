// Copyright 2026 the Marshal Reader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoded value model.
//!
//! One variant per decodable wire tag. Values are plain owned trees: nested code records are held
//! by value, so a decoded graph never contains cycles.
//!
//! `Value` implements `Eq` and `Hash` so it can key dicts and populate sets. Floats compare and
//! hash by bit pattern; dicts and sets hash by length only, which is consistent with their
//! order-insensitive equality.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::hash::{Hash, Hasher};
use core::mem;

use hashbrown::{HashMap, HashSet};
use num_bigint::BigInt;

use crate::code::CodeRecord;

/// A decoded marshal value.
#[derive(Clone, Debug)]
pub enum Value {
    /// The end-of-dict sentinel. Never produced inside a decoded graph.
    Null,
    /// `None`.
    None,
    /// `False` / `True`.
    Bool(bool),
    /// The stop-iteration singleton.
    StopIteration,
    /// The ellipsis singleton.
    Ellipsis,
    /// 32-bit integer.
    Int32(i32),
    /// 64-bit integer.
    Int64(i64),
    /// Arbitrary-precision integer.
    Long(BigInt),
    /// Float that was stored as decimal text.
    LegacyFloat(f64),
    /// Float that was stored as an IEEE-754 double.
    BinaryFloat(f64),
    /// Complex number (either encoding).
    Complex {
        /// Real part.
        real: f64,
        /// Imaginary part.
        imag: f64,
    },
    /// Raw byte string.
    Bytes(Vec<u8>),
    /// Byte string that was added to the intern table.
    Interned(Vec<u8>),
    /// A resolved back-reference into the intern table.
    StringRef {
        /// Intern table index named on the wire.
        index: u32,
        /// The text it resolved to.
        text: Vec<u8>,
    },
    /// UTF-8 text.
    Unicode(String),
    /// Tuple.
    Tuple(Vec<Value>),
    /// List.
    List(Vec<Value>),
    /// Dict.
    Dict(HashMap<Value, Value>),
    /// Set.
    Set(HashSet<Value>),
    /// Frozen set.
    FrozenSet(HashSet<Value>),
    /// Compiled-unit record.
    Code(Box<CodeRecord>),
}

impl Value {
    /// Short, stable name of the variant for diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::None => "none",
            Self::Bool(_) => "bool",
            Self::StopIteration => "stop-iteration",
            Self::Ellipsis => "ellipsis",
            Self::Int32(_) => "int32",
            Self::Int64(_) => "int64",
            Self::Long(_) => "long",
            Self::LegacyFloat(_) => "legacy-float",
            Self::BinaryFloat(_) => "binary-float",
            Self::Complex { .. } => "complex",
            Self::Bytes(_) => "bytes",
            Self::Interned(_) => "interned",
            Self::StringRef { .. } => "string-ref",
            Self::Unicode(_) => "unicode",
            Self::Tuple(_) => "tuple",
            Self::List(_) => "list",
            Self::Dict(_) => "dict",
            Self::Set(_) => "set",
            Self::FrozenSet(_) => "frozenset",
            Self::Code(_) => "code",
        }
    }

    /// The payload of a byte-string variant (plain, interned, or back-reference).
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) | Self::Interned(b) | Self::StringRef { text: b, .. } => Some(b),
            _ => None,
        }
    }

    /// The payload of any string variant, unicode included, as raw bytes.
    #[must_use]
    pub fn as_text(&self) -> Option<&[u8]> {
        match self {
            Self::Unicode(s) => Some(s.as_bytes()),
            other => other.as_bytes(),
        }
    }

    /// Tuple elements.
    #[must_use]
    pub fn as_tuple(&self) -> Option<&[Self]> {
        match self {
            Self::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// The code record, if this is one.
    #[must_use]
    pub fn as_code(&self) -> Option<&CodeRecord> {
        match self {
            Self::Code(code) => Some(code),
            _ => None,
        }
    }

    fn is_payload_free(&self) -> bool {
        matches!(
            self,
            Self::Null | Self::None | Self::StopIteration | Self::Ellipsis
        )
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int32(a), Self::Int32(b)) => a == b,
            (Self::Int64(a), Self::Int64(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::LegacyFloat(a), Self::LegacyFloat(b))
            | (Self::BinaryFloat(a), Self::BinaryFloat(b)) => a.to_bits() == b.to_bits(),
            (
                Self::Complex {
                    real: ar,
                    imag: ai,
                },
                Self::Complex {
                    real: br,
                    imag: bi,
                },
            ) => ar.to_bits() == br.to_bits() && ai.to_bits() == bi.to_bits(),
            (Self::Bytes(a), Self::Bytes(b)) | (Self::Interned(a), Self::Interned(b)) => a == b,
            (
                Self::StringRef {
                    index: ai,
                    text: at,
                },
                Self::StringRef {
                    index: bi,
                    text: bt,
                },
            ) => ai == bi && at == bt,
            (Self::Unicode(a), Self::Unicode(b)) => a == b,
            (Self::Tuple(a), Self::Tuple(b)) | (Self::List(a), Self::List(b)) => a == b,
            (Self::Dict(a), Self::Dict(b)) => a == b,
            (Self::Set(a), Self::Set(b)) | (Self::FrozenSet(a), Self::FrozenSet(b)) => a == b,
            (Self::Code(a), Self::Code(b)) => a == b,
            _ => self.is_payload_free() && mem::discriminant(self) == mem::discriminant(other),
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
        match self {
            Self::Null | Self::None | Self::StopIteration | Self::Ellipsis => {}
            Self::Bool(b) => b.hash(state),
            Self::Int32(v) => v.hash(state),
            Self::Int64(v) => v.hash(state),
            Self::Long(v) => v.hash(state),
            Self::LegacyFloat(v) | Self::BinaryFloat(v) => v.to_bits().hash(state),
            Self::Complex { real, imag } => {
                real.to_bits().hash(state);
                imag.to_bits().hash(state);
            }
            Self::Bytes(b) | Self::Interned(b) => b.hash(state),
            Self::StringRef { index, text } => {
                index.hash(state);
                text.hash(state);
            }
            Self::Unicode(s) => s.hash(state),
            Self::Tuple(items) | Self::List(items) => items.hash(state),
            Self::Dict(map) => map.len().hash(state),
            Self::Set(set) | Self::FrozenSet(set) => set.len().hash(state),
            Self::Code(code) => code.hash(state),
        }
    }
}
