// Copyright 2026 the Marshal Reader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recursive-descent value decoder.
//!
//! A [`Decoder`] is one decode session: it owns the cursor, the intern table, and the nesting
//! counter. Each call to [`Decoder::decode_value`] reads one tag byte and dispatches on it,
//! recursing into composite payloads. Native recursion is bounded by [`Limits::max_depth`].
//!
//! Decoding is all-or-nothing: the first error aborts the value being decoded and nothing
//! partial is returned.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};
use num_bigint::{BigInt, BigUint, Sign};

use crate::code::{CodeField, CodeFlags, CodeRecord};
use crate::format::cursor::ByteCursor;
use crate::format::header::StreamHeader;
use crate::format::tag::Tag;
use crate::format::{DecodeError, DecodeErrorKind};
use crate::intern::InternTable;
use crate::value::Value;

/// Decoder resource limits.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of simultaneously open composites (tuples, lists, dicts, sets, and code
    /// records). Opening one more fails with [`DecodeErrorKind::DepthExceeded`].
    pub max_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self { max_depth: 256 }
    }
}

/// One decode session over a byte buffer.
#[derive(Debug)]
pub struct Decoder<'a> {
    cursor: ByteCursor<'a>,
    interns: InternTable,
    limits: Limits,
    depth: usize,
}

impl<'a> Decoder<'a> {
    /// Starts a session over `bytes` with default limits.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self::with_limits(bytes, Limits::default())
    }

    /// Starts a session over `bytes` with explicit limits.
    #[must_use]
    pub fn with_limits(bytes: &'a [u8], limits: Limits) -> Self {
        Self {
            cursor: ByteCursor::new(bytes),
            interns: InternTable::new(),
            limits,
            depth: 0,
        }
    }

    /// Reads the stream header at the current position.
    pub fn read_header(&mut self) -> Result<StreamHeader, DecodeError> {
        StreamHeader::read(&mut self.cursor)
    }

    /// Decodes one complete value.
    ///
    /// The null sentinel is rejected here: it is only meaningful as a dict terminator.
    pub fn decode_value(&mut self) -> Result<Value, DecodeError> {
        self.read_element()
    }

    /// Strings interned so far in this session.
    #[must_use]
    pub fn interns(&self) -> &InternTable {
        &self.interns
    }

    /// Current byte offset.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.cursor.offset()
    }

    /// Ends the session, returning the number of unread trailing bytes.
    #[must_use]
    pub fn finish(self) -> usize {
        self.cursor.remaining()
    }

    fn read_object(&mut self) -> Result<Value, DecodeError> {
        let start = self.cursor.offset();
        let byte = self.cursor.read_u8()?;
        let tag = Tag::try_from(byte)
            .map_err(|b| DecodeError::new(DecodeErrorKind::InvalidTypeTag(b), start))?;

        Ok(match tag {
            Tag::Null => Value::Null,
            Tag::None => Value::None,
            Tag::False => Value::Bool(false),
            Tag::True => Value::Bool(true),
            Tag::StopIteration => Value::StopIteration,
            Tag::Ellipsis => Value::Ellipsis,
            Tag::Int => Value::Int32(self.cursor.read_i32_le()?),
            Tag::Int64 => Value::Int64(self.cursor.read_i64_wide()?),
            Tag::Long => Value::Long(self.read_long()?),
            Tag::Float => Value::LegacyFloat(self.read_float_text()?),
            Tag::BinaryFloat => Value::BinaryFloat(self.cursor.read_f64_le()?),
            Tag::Complex => {
                let real = self.read_float_text()?;
                let imag = self.read_float_text()?;
                Value::Complex { real, imag }
            }
            Tag::BinaryComplex => {
                let real = self.cursor.read_f64_le()?;
                let imag = self.cursor.read_f64_le()?;
                Value::Complex { real, imag }
            }
            Tag::String => Value::Bytes(self.read_sized_bytes()?.to_vec()),
            Tag::Interned => {
                let text = self.read_sized_bytes()?.to_vec();
                self.interns.intern(text.clone());
                Value::Interned(text)
            }
            Tag::StringRef => {
                let at = self.cursor.offset();
                let index = self.cursor.read_u32_le()?;
                let text = self
                    .interns
                    .resolve(index)
                    .ok_or_else(|| DecodeError::new(DecodeErrorKind::InvalidReference(index), at))?
                    .to_vec();
                Value::StringRef { index, text }
            }
            Tag::Unicode => Value::Unicode(self.read_unicode()?),
            Tag::Tuple => Value::Tuple(self.nested(start, Self::read_sequence)?),
            Tag::List => Value::List(self.nested(start, Self::read_sequence)?),
            Tag::Dict => Value::Dict(self.nested(start, Self::read_dict)?),
            Tag::Set => Value::Set(self.nested(start, Self::read_set)?),
            Tag::FrozenSet => Value::FrozenSet(self.nested(start, Self::read_set)?),
            Tag::Code => Value::Code(Box::new(self.nested(start, Self::read_code)?)),
            Tag::Unknown => {
                return Err(DecodeError::new(
                    DecodeErrorKind::InvalidTypeTag(byte),
                    start,
                ));
            }
        })
    }

    /// Reads a value that must not be the null sentinel.
    fn read_element(&mut self) -> Result<Value, DecodeError> {
        let at = self.cursor.offset();
        match self.read_object()? {
            Value::Null => Err(DecodeError::new(DecodeErrorKind::UnexpectedNull, at)),
            value => Ok(value),
        }
    }

    fn nested<T>(
        &mut self,
        start: usize,
        read: impl FnOnce(&mut Self) -> Result<T, DecodeError>,
    ) -> Result<T, DecodeError> {
        if self.depth >= self.limits.max_depth {
            return Err(DecodeError::new(
                DecodeErrorKind::DepthExceeded {
                    limit: self.limits.max_depth,
                },
                start,
            ));
        }
        self.depth += 1;
        let out = read(self);
        self.depth -= 1;
        out
    }

    /// Reads a signed 32-bit length or count that must not be negative.
    fn read_len(&mut self) -> Result<usize, DecodeError> {
        let at = self.cursor.offset();
        let n = self.cursor.read_i32_le()?;
        usize::try_from(n).map_err(|_| DecodeError::new(DecodeErrorKind::MalformedLength(n), at))
    }

    fn read_sized_bytes(&mut self) -> Result<&'a [u8], DecodeError> {
        let n = self.read_len()?;
        self.cursor.read_bytes(n)
    }

    fn read_unicode(&mut self) -> Result<String, DecodeError> {
        let n = self.read_len()?;
        let at = self.cursor.offset();
        let bytes = self.cursor.read_bytes(n)?;
        core::str::from_utf8(bytes)
            .map(String::from)
            .map_err(|_| DecodeError::new(DecodeErrorKind::InvalidUtf8, at))
    }

    fn read_float_text(&mut self) -> Result<f64, DecodeError> {
        let at = self.cursor.offset();
        let n = self.cursor.read_u8()?;
        let text = self.cursor.read_bytes(usize::from(n))?;
        core::str::from_utf8(text)
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .ok_or_else(|| DecodeError::new(DecodeErrorKind::InvalidFloat, at))
    }

    /// Reads a sign-and-magnitude integer in base 2^15, least significant digit first.
    fn read_long(&mut self) -> Result<BigInt, DecodeError> {
        let n = self.cursor.read_i32_le()?;
        let size = n.unsigned_abs();

        // Repack 15-bit digits into 32-bit words for `BigUint`.
        let mut words = Vec::new();
        let mut acc: u64 = 0;
        let mut bits: u32 = 0;
        for _ in 0..size {
            let at = self.cursor.offset();
            let raw = self.cursor.read_i16_le()?;
            let digit = u16::try_from(raw).map_err(|_| {
                DecodeError::new(DecodeErrorKind::LongDigitOutOfRange(raw), at)
            })?;
            acc |= u64::from(digit) << bits;
            bits += 15;
            if bits >= 32 {
                words.push(low_word(acc));
                acc >>= 32;
                bits -= 32;
            }
        }
        if bits > 0 {
            words.push(low_word(acc));
        }

        let sign = if n < 0 { Sign::Minus } else { Sign::Plus };
        Ok(BigInt::from_biguint(sign, BigUint::new(words)))
    }

    fn read_sequence(&mut self) -> Result<Vec<Value>, DecodeError> {
        let n = self.read_len()?;
        let mut items = Vec::with_capacity(n.min(self.cursor.remaining()));
        for _ in 0..n {
            items.push(self.read_element()?);
        }
        Ok(items)
    }

    fn read_set(&mut self) -> Result<HashSet<Value>, DecodeError> {
        let n = self.read_len()?;
        let mut set = HashSet::with_capacity(n.min(self.cursor.remaining()));
        for _ in 0..n {
            set.insert(self.read_element()?);
        }
        Ok(set)
    }

    fn read_dict(&mut self) -> Result<HashMap<Value, Value>, DecodeError> {
        let mut map = HashMap::new();
        loop {
            let key = self.read_object()?;
            if matches!(key, Value::Null) {
                return Ok(map);
            }
            let value = self.read_element()?;
            map.insert(key, value);
        }
    }

    fn read_code(&mut self) -> Result<CodeRecord, DecodeError> {
        let argcount = self.cursor.read_u32_le()?;
        let nlocals = self.cursor.read_u32_le()?;
        let stacksize = self.cursor.read_u32_le()?;
        let flags = CodeFlags::from_bits(self.cursor.read_u32_le()?);
        let code = self.read_code_value(CodeField::Code, is_bytes)?;
        let consts = self.read_code_tuple(CodeField::Consts, |_| true)?;
        let names = self.read_code_tuple(CodeField::Names, is_text)?;
        let varnames = self.read_code_tuple(CodeField::VarNames, is_text)?;
        let freevars = self.read_code_tuple(CodeField::FreeVars, is_text)?;
        let cellvars = self.read_code_tuple(CodeField::CellVars, is_text)?;
        let filename = self.read_code_value(CodeField::Filename, is_text)?;
        let name = self.read_code_value(CodeField::Name, is_text)?;
        let firstlineno = self.cursor.read_u32_le()?;
        let lnotab = self.read_code_value(CodeField::LnoTab, is_bytes)?;

        Ok(CodeRecord {
            argcount,
            nlocals,
            stacksize,
            flags,
            code,
            consts,
            names,
            varnames,
            freevars,
            cellvars,
            filename,
            name,
            firstlineno,
            lnotab,
        })
    }

    fn read_code_value(
        &mut self,
        field: CodeField,
        accept: fn(&Value) -> bool,
    ) -> Result<Value, DecodeError> {
        let at = self.cursor.offset();
        let value = self.read_element()?;
        if accept(&value) {
            Ok(value)
        } else {
            Err(DecodeError::new(DecodeErrorKind::BadCodeField(field), at))
        }
    }

    fn read_code_tuple(
        &mut self,
        field: CodeField,
        accept: fn(&Value) -> bool,
    ) -> Result<Vec<Value>, DecodeError> {
        let at = self.cursor.offset();
        match self.read_element()? {
            Value::Tuple(items) if items.iter().all(accept) => Ok(items),
            _ => Err(DecodeError::new(DecodeErrorKind::BadCodeField(field), at)),
        }
    }
}

fn is_bytes(value: &Value) -> bool {
    value.as_bytes().is_some()
}

fn is_text(value: &Value) -> bool {
    value.as_text().is_some()
}

fn low_word(acc: u64) -> u32 {
    let [a, b, c, d, ..] = acc.to_le_bytes();
    u32::from_le_bytes([a, b, c, d])
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn kind(bytes: &[u8]) -> DecodeErrorKind {
        Decoder::new(bytes).decode_value().unwrap_err().kind().clone()
    }

    fn long(n: i32, digits: &[i16]) -> Vec<u8> {
        let mut buf = vec![b'l'];
        buf.extend_from_slice(&n.to_le_bytes());
        for d in digits {
            buf.extend_from_slice(&d.to_le_bytes());
        }
        buf
    }

    fn decode(bytes: &[u8]) -> Value {
        Decoder::new(bytes).decode_value().unwrap()
    }

    #[test]
    fn singletons_consume_only_the_tag() {
        let buf = b"NFTS.";
        let mut d = Decoder::new(buf);
        assert_eq!(d.decode_value(), Ok(Value::None));
        assert_eq!(d.decode_value(), Ok(Value::Bool(false)));
        assert_eq!(d.decode_value(), Ok(Value::Bool(true)));
        assert_eq!(d.decode_value(), Ok(Value::StopIteration));
        assert_eq!(d.decode_value(), Ok(Value::Ellipsis));
        assert_eq!(d.finish(), 0);
    }

    #[test]
    fn int32_is_signed() {
        assert_eq!(decode(b"i\xfe\xff\xff\xff"), Value::Int32(-2));
    }

    #[test]
    fn long_literals() {
        assert_eq!(decode(&long(0, &[])), Value::Long(BigInt::from(0)));
        assert_eq!(decode(&long(1, &[1])), Value::Long(BigInt::from(1)));
        assert_eq!(decode(&long(-1, &[1])), Value::Long(BigInt::from(-1)));
        assert_eq!(decode(&long(2, &[3, 1])), Value::Long(BigInt::from(32771)));
    }

    #[test]
    fn long_spanning_word_boundaries() {
        // 2^75 - 1: five full digits.
        let v = decode(&long(5, &[0x7fff; 5]));
        let expected = (BigInt::from(1) << 75_u32) - 1;
        assert_eq!(v, Value::Long(expected));

        let v = decode(&long(-3, &[0, 0, 1]));
        assert_eq!(v, Value::Long(-(BigInt::from(1) << 30_u32)));
    }

    #[test]
    fn long_rejects_negative_digit() {
        assert_eq!(
            kind(&long(2, &[1, -5])),
            DecodeErrorKind::LongDigitOutOfRange(-5)
        );
    }

    #[test]
    fn legacy_float_text() {
        assert_eq!(decode(b"f\x043.25"), Value::LegacyFloat(3.25));
        assert_eq!(decode(b"f\x04-inf"), Value::LegacyFloat(f64::NEG_INFINITY));
        assert_eq!(kind(b"f\x033.x"), DecodeErrorKind::InvalidFloat);
    }

    #[test]
    fn complex_both_encodings() {
        assert_eq!(
            decode(b"x\x031.5\x02-2"),
            Value::Complex {
                real: 1.5,
                imag: -2.0
            }
        );
        let mut buf = vec![b'y'];
        buf.extend_from_slice(&0.5_f64.to_le_bytes());
        buf.extend_from_slice(&4.0_f64.to_le_bytes());
        assert_eq!(
            decode(&buf),
            Value::Complex {
                real: 0.5,
                imag: 4.0
            }
        );
    }

    #[test]
    fn interned_then_referenced() {
        let buf = b"(\x03\x00\x00\x00t\x02\x00\x00\x00abR\x00\x00\x00\x00R\x00\x00\x00\x00";
        let mut d = Decoder::new(buf);
        let v = d.decode_value().unwrap();
        let r = Value::StringRef {
            index: 0,
            text: b"ab".to_vec(),
        };
        assert_eq!(
            v,
            Value::Tuple(vec![Value::Interned(b"ab".to_vec()), r.clone(), r])
        );
        assert_eq!(d.interns().len(), 1);
    }

    #[test]
    fn forward_reference_is_rejected() {
        let err = Decoder::new(b"R\x00\x00\x00\x00").decode_value().unwrap_err();
        assert_eq!(err.kind(), &DecodeErrorKind::InvalidReference(0));
        assert_eq!(err.offset(), 1);
    }

    #[test]
    fn list_elements_land_in_the_list() {
        assert_eq!(
            decode(b"[\x02\x00\x00\x00NT"),
            Value::List(vec![Value::None, Value::Bool(true)])
        );
    }

    #[test]
    fn empty_dict() {
        assert_eq!(decode(b"{0"), Value::Dict(HashMap::new()));
    }

    #[test]
    fn dict_pairs() {
        let v = decode(b"{i\x01\x00\x00\x00NTF0");
        let mut expected = HashMap::new();
        expected.insert(Value::Int32(1), Value::None);
        expected.insert(Value::Bool(true), Value::Bool(false));
        assert_eq!(v, Value::Dict(expected));
    }

    #[test]
    fn null_outside_dict_key() {
        assert_eq!(kind(b"0"), DecodeErrorKind::UnexpectedNull);
        assert_eq!(kind(b"(\x01\x00\x00\x000"), DecodeErrorKind::UnexpectedNull);
        assert_eq!(kind(b"{N0"), DecodeErrorKind::UnexpectedNull);
    }

    #[test]
    fn sets_deduplicate() {
        let v = decode(b"<\x03\x00\x00\x00NNT");
        let Value::Set(set) = v else {
            panic!("expected a set, got {}", v.kind_name());
        };
        assert_eq!(set.len(), 2);
        assert!(matches!(decode(b">\x00\x00\x00\x00"), Value::FrozenSet(s) if s.is_empty()));
    }

    #[test]
    fn unknown_and_unassigned_tags() {
        assert_eq!(kind(b"?"), DecodeErrorKind::InvalidTypeTag(b'?'));
        assert_eq!(kind(b"Z"), DecodeErrorKind::InvalidTypeTag(b'Z'));
        let err = Decoder::new(b"(\x01\x00\x00\x00\x01").decode_value().unwrap_err();
        assert_eq!(err.offset(), 5);
    }

    #[test]
    fn negative_lengths_are_malformed() {
        assert_eq!(
            kind(b"s\xff\xff\xff\xff"),
            DecodeErrorKind::MalformedLength(-1)
        );
        assert_eq!(
            kind(b"(\xfe\xff\xff\xff"),
            DecodeErrorKind::MalformedLength(-2)
        );
    }

    #[test]
    fn truncated_string_is_eof() {
        let err = Decoder::new(b"s\x0a\x00\x00\x00abc").decode_value().unwrap_err();
        assert_eq!(err.kind(), &DecodeErrorKind::UnexpectedEof);
        assert_eq!(err.offset(), 5);
    }

    #[test]
    fn oversized_count_is_eof_not_allocation() {
        assert_eq!(
            kind(b"[\xff\xff\xff\x7fN"),
            DecodeErrorKind::UnexpectedEof
        );
    }

    #[test]
    fn invalid_utf8() {
        assert_eq!(kind(b"u\x01\x00\x00\x00\xff"), DecodeErrorKind::InvalidUtf8);
        assert_eq!(
            decode(b"u\x02\x00\x00\x00\xc3\xa9"),
            Value::Unicode("\u{e9}".into())
        );
    }

    #[test]
    fn depth_limit() {
        let limits = Limits { max_depth: 2 };
        let ok = b"(\x01\x00\x00\x00(\x00\x00\x00\x00";
        assert!(Decoder::with_limits(ok, limits).decode_value().is_ok());

        let deep = b"(\x01\x00\x00\x00(\x01\x00\x00\x00[\x00\x00\x00\x00";
        let err = Decoder::with_limits(deep, limits).decode_value().unwrap_err();
        assert_eq!(err.kind(), &DecodeErrorKind::DepthExceeded { limit: 2 });
        assert_eq!(err.offset(), 10);
    }

    #[test]
    fn depth_is_released_between_siblings() {
        let limits = Limits { max_depth: 2 };
        let wide = b"(\x03\x00\x00\x00(\x00\x00\x00\x00[\x00\x00\x00\x00{0";
        assert!(Decoder::with_limits(wide, limits).decode_value().is_ok());
    }

    #[test]
    fn adversarial_nesting_fails_cleanly() {
        let mut buf = Vec::new();
        for _ in 0..100_000 {
            buf.extend_from_slice(b"(\x01\x00\x00\x00");
        }
        buf.push(b'N');
        let limits = Limits { max_depth: 64 };
        let err = Decoder::with_limits(&buf, limits).decode_value().unwrap_err();
        assert_eq!(err.kind(), &DecodeErrorKind::DepthExceeded { limit: 64 });
        assert_eq!(err.offset(), 64 * 5);
    }
}
