// Copyright 2026 the Marshal Reader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Forward-only little-endian reader over a borrowed byte buffer.

use crate::format::{DecodeError, DecodeErrorKind};

/// Sequential reader over a finite byte buffer.
///
/// Every read either consumes exactly the requested bytes or fails with
/// [`DecodeErrorKind::UnexpectedEof`] and leaves the position untouched, so the error offset
/// always points at the start of the field that could not be read.
#[derive(Clone, Debug)]
pub struct ByteCursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    /// Creates a cursor positioned at the start of `bytes`.
    #[must_use]
    #[inline]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    /// Current read position.
    #[must_use]
    #[inline]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Number of bytes not yet consumed.
    #[must_use]
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    /// Builds an error of `kind` at the current position.
    #[must_use]
    pub fn error(&self, kind: DecodeErrorKind) -> DecodeError {
        DecodeError::new(kind, self.offset)
    }

    /// Reads `n` raw bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .offset
            .checked_add(n)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| self.error(DecodeErrorKind::UnexpectedEof))?;
        let out = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(out)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0_u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Reads one byte.
    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let [b] = self.read_array::<1>()?;
        Ok(b)
    }

    /// Reads a signed 16-bit little-endian integer.
    pub fn read_i16_le(&mut self) -> Result<i16, DecodeError> {
        self.read_array().map(i16::from_le_bytes)
    }

    /// Reads an unsigned 32-bit little-endian integer.
    pub fn read_u32_le(&mut self) -> Result<u32, DecodeError> {
        self.read_array().map(u32::from_le_bytes)
    }

    /// Reads a signed 32-bit little-endian integer.
    pub fn read_i32_le(&mut self) -> Result<i32, DecodeError> {
        self.read_array().map(i32::from_le_bytes)
    }

    /// Reads a 64-bit integer stored as two 32-bit halves, low half first.
    ///
    /// The halves are combined as `(high << 32) | low` and the result reinterpreted as signed.
    pub fn read_i64_wide(&mut self) -> Result<i64, DecodeError> {
        let start = self.offset;
        let low = self.read_u32_le()?;
        let Ok(high) = self.read_u32_le() else {
            self.offset = start;
            return Err(self.error(DecodeErrorKind::UnexpectedEof));
        };
        let bits = (u64::from(high) << 32) | u64::from(low);
        Ok(i64::from_le_bytes(bits.to_le_bytes()))
    }

    /// Reads an IEEE-754 little-endian double.
    pub fn read_f64_le(&mut self) -> Result<f64, DecodeError> {
        self.read_array().map(f64::from_le_bytes)
    }
}
