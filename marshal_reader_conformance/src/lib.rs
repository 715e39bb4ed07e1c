// Copyright 2026 the Marshal Reader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reference encoder for exercising `marshal_reader`.
//!
//! The decoder has no production encoder. This one exists so tests can build streams from
//! [`Value`] trees instead of hand-writing bytes. It writes exactly the tag that corresponds to
//! each variant, so `decode(encode(v)) == v` holds for every tree the decoder can produce.
//!
//! Complex numbers are always written in the binary form.

use marshal_reader::{CodeRecord, Tag, Value};
use num_bigint::{BigInt, BigUint, Sign};

/// Builds a marshal byte stream.
#[derive(Debug, Default)]
pub struct Encoder {
    out: Vec<u8>,
}

impl Encoder {
    /// Creates an empty encoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the encoded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.out
    }

    /// Writes the 8-byte stream header.
    pub fn header(&mut self, magic: u32, mtime: u32) -> &mut Self {
        self.u32(magic).u32(mtime)
    }

    /// Writes a raw byte.
    pub fn byte(&mut self, b: u8) -> &mut Self {
        self.out.push(b);
        self
    }

    /// Writes a tag byte.
    pub fn tag(&mut self, tag: Tag) -> &mut Self {
        self.byte(tag.byte())
    }

    /// Writes a little-endian `u32`.
    pub fn u32(&mut self, v: u32) -> &mut Self {
        self.raw(&v.to_le_bytes())
    }

    /// Writes a little-endian `i32`.
    pub fn i32(&mut self, v: i32) -> &mut Self {
        self.raw(&v.to_le_bytes())
    }

    /// Writes raw bytes without a prefix.
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.out.extend_from_slice(bytes);
        self
    }

    fn len(&mut self, n: usize) -> &mut Self {
        let n = i32::try_from(n).expect("length fits the wire format");
        self.i32(n)
    }

    fn sized(&mut self, bytes: &[u8]) -> &mut Self {
        self.len(bytes.len()).raw(bytes)
    }

    /// Writes one tagged value.
    pub fn value(&mut self, v: &Value) -> &mut Self {
        match v {
            Value::Null => self.tag(Tag::Null),
            Value::None => self.tag(Tag::None),
            Value::Bool(false) => self.tag(Tag::False),
            Value::Bool(true) => self.tag(Tag::True),
            Value::StopIteration => self.tag(Tag::StopIteration),
            Value::Ellipsis => self.tag(Tag::Ellipsis),
            Value::Int32(n) => self.tag(Tag::Int).i32(*n),
            Value::Int64(n) => {
                let bits = u64::from_le_bytes(n.to_le_bytes());
                let low = u32::try_from(bits & 0xffff_ffff).expect("masked to 32 bits");
                let high = u32::try_from(bits >> 32).expect("shifted to 32 bits");
                self.tag(Tag::Int64).u32(low).u32(high)
            }
            Value::Long(n) => self.long(n),
            Value::LegacyFloat(f) => {
                let text = format!("{f:?}");
                let n = u8::try_from(text.len()).expect("float text fits a byte length");
                self.tag(Tag::Float).byte(n).raw(text.as_bytes())
            }
            Value::BinaryFloat(f) => self.tag(Tag::BinaryFloat).raw(&f.to_le_bytes()),
            Value::Complex { real, imag } => self
                .tag(Tag::BinaryComplex)
                .raw(&real.to_le_bytes())
                .raw(&imag.to_le_bytes()),
            Value::Bytes(b) => self.tag(Tag::String).sized(b),
            Value::Interned(b) => self.tag(Tag::Interned).sized(b),
            Value::StringRef { index, .. } => self.tag(Tag::StringRef).u32(*index),
            Value::Unicode(s) => self.tag(Tag::Unicode).sized(s.as_bytes()),
            Value::Tuple(items) => self.tag(Tag::Tuple).items(items),
            Value::List(items) => self.tag(Tag::List).items(items),
            Value::Dict(map) => {
                self.tag(Tag::Dict);
                for (k, v) in map {
                    self.value(k).value(v);
                }
                self.tag(Tag::Null)
            }
            Value::Set(set) => self.tag(Tag::Set).items(set),
            Value::FrozenSet(set) => self.tag(Tag::FrozenSet).items(set),
            Value::Code(code) => self.tag(Tag::Code).code(code),
        }
    }

    fn items<'v>(
        &mut self,
        items: impl IntoIterator<Item = &'v Value, IntoIter: ExactSizeIterator>,
    ) -> &mut Self {
        let items = items.into_iter();
        self.len(items.len());
        for item in items {
            self.value(item);
        }
        self
    }

    fn long(&mut self, n: &BigInt) -> &mut Self {
        let mut mag: BigUint = n.magnitude().clone();
        let mask = BigUint::from(0x7fff_u32);
        let mut digits = Vec::new();
        while mag.bits() > 0 {
            let digit = u16::try_from(&(&mag & &mask)).expect("masked to 15 bits");
            digits.push(digit);
            mag >>= 15_u32;
        }
        let size = i32::try_from(digits.len()).expect("digit count fits the wire format");
        let size = if n.sign() == Sign::Minus { -size } else { size };
        self.tag(Tag::Long).i32(size);
        for d in digits {
            self.raw(&d.to_le_bytes());
        }
        self
    }

    /// Writes the payload of a code record (without the tag).
    pub fn code(&mut self, code: &CodeRecord) -> &mut Self {
        self.u32(code.argcount)
            .u32(code.nlocals)
            .u32(code.stacksize)
            .u32(code.flags.bits())
            .value(&code.code)
            .tag(Tag::Tuple)
            .items(&code.consts)
            .tag(Tag::Tuple)
            .items(&code.names)
            .tag(Tag::Tuple)
            .items(&code.varnames)
            .tag(Tag::Tuple)
            .items(&code.freevars)
            .tag(Tag::Tuple)
            .items(&code.cellvars)
            .value(&code.filename)
            .value(&code.name)
            .u32(code.firstlineno)
            .value(&code.lnotab)
    }
}

/// Encodes a single value.
#[must_use]
pub fn encode(v: &Value) -> Vec<u8> {
    let mut e = Encoder::new();
    e.value(v);
    e.into_bytes()
}

/// Encodes a header plus root value.
#[must_use]
pub fn encode_stream(magic: u32, mtime: u32, root: &Value) -> Vec<u8> {
    let mut e = Encoder::new();
    e.header(magic, mtime).value(root);
    e.into_bytes()
}

/// A code record with empty pools, the given names, and a trivial body.
#[must_use]
pub fn simple_code(name: &str, filename: &str, consts: Vec<Value>) -> CodeRecord {
    CodeRecord {
        argcount: 0,
        nlocals: 0,
        stacksize: 1,
        flags: marshal_reader::CodeFlags::from_bits(0x40),
        code: Value::Bytes(vec![0x64, 0x00, 0x00, 0x53]),
        consts,
        names: Vec::new(),
        varnames: Vec::new(),
        freevars: Vec::new(),
        cellvars: Vec::new(),
        filename: Value::Bytes(filename.as_bytes().to_vec()),
        name: Value::Bytes(name.as_bytes().to_vec()),
        firstlineno: 1,
        lnotab: Value::Bytes(Vec::new()),
    }
}
