// Copyright 2026 the Marshal Reader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session-scoped table of interned strings.
//!
//! Interned strings are numbered in the order they are decoded; later string references name
//! them by that number. The table only ever grows and is dropped with its decode session.

use alloc::vec::Vec;

/// Append-only registry of interned byte strings.
#[derive(Clone, Debug, Default)]
pub struct InternTable {
    strs: Vec<Vec<u8>>,
}

impl InternTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self { strs: Vec::new() }
    }

    /// Appends `text` and returns its index (the previous length).
    ///
    /// Duplicates are not collapsed: the producer numbers every interned occurrence.
    pub fn intern(&mut self, text: Vec<u8>) -> u32 {
        let idx = u32::try_from(self.strs.len()).unwrap_or(u32::MAX);
        self.strs.push(text);
        idx
    }

    /// Looks up a previously interned string.
    #[must_use]
    pub fn resolve(&self, index: u32) -> Option<&[u8]> {
        let index = usize::try_from(index).ok()?;
        self.strs.get(index).map(Vec::as_slice)
    }

    /// Number of strings interned so far.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.strs.len()
    }

    /// Returns `true` if nothing has been interned yet.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strs.is_empty()
    }
}
