// Copyright 2026 the Marshal Reader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compiled-unit records.
//!
//! A [`CodeRecord`] holds the fourteen fields of one compiled unit. The wire order of those
//! fields is fixed by the format and mirrored by [`CodeField::ALL`]; the decoder reads them in
//! exactly that order.
//!
//! Fields that the decoder reads with a nested value decode keep the decoded [`Value`], so the
//! original string flavour (plain, interned, back-reference, unicode) is not lost. The decoder
//! checks their shape before building the record; the typed accessors below rely on that.

use alloc::vec::Vec;

use crate::value::Value;

/// One field of a code record, in wire order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CodeField {
    /// Positional parameter count.
    ArgCount,
    /// Local variable slot count.
    NLocals,
    /// Maximum evaluation-stack depth.
    StackSize,
    /// Behaviour flags.
    Flags,
    /// Raw instruction stream.
    Code,
    /// Literal pool.
    Consts,
    /// Global/attribute names.
    Names,
    /// Local variable names.
    VarNames,
    /// Names captured from enclosing units.
    FreeVars,
    /// Names captured by nested units.
    CellVars,
    /// Originating source identifier.
    Filename,
    /// The unit's own name.
    Name,
    /// First source line.
    FirstLineNo,
    /// Line-number delta table.
    LnoTab,
}

impl CodeField {
    /// All fields, in wire order.
    pub const ALL: [Self; 14] = [
        Self::ArgCount,
        Self::NLocals,
        Self::StackSize,
        Self::Flags,
        Self::Code,
        Self::Consts,
        Self::Names,
        Self::VarNames,
        Self::FreeVars,
        Self::CellVars,
        Self::Filename,
        Self::Name,
        Self::FirstLineNo,
        Self::LnoTab,
    ];

    /// Field name as used by inspection tools.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ArgCount => "argcount",
            Self::NLocals => "nlocals",
            Self::StackSize => "stacksize",
            Self::Flags => "flags",
            Self::Code => "code",
            Self::Consts => "consts",
            Self::Names => "names",
            Self::VarNames => "varnames",
            Self::FreeVars => "freevars",
            Self::CellVars => "cellvars",
            Self::Filename => "filename",
            Self::Name => "name",
            Self::FirstLineNo => "firstlineno",
            Self::LnoTab => "lnotab",
        }
    }
}

/// Opaque behaviour bitmask of a code record.
///
/// The decoder never interprets these bits. The named constants are the commonly documented
/// ones, provided for callers that do.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CodeFlags(u32);

impl CodeFlags {
    /// Locals are stored in fast slots.
    pub const OPTIMIZED: Self = Self(0x0001);
    /// A fresh locals dict is created per call.
    pub const NEWLOCALS: Self = Self(0x0002);
    /// Takes `*args`.
    pub const VARARGS: Self = Self(0x0004);
    /// Takes `**kwargs`.
    pub const VARKEYWORDS: Self = Self(0x0008);
    /// Nested inside another unit.
    pub const NESTED: Self = Self(0x0010);
    /// Generator body.
    pub const GENERATOR: Self = Self(0x0020);
    /// Has neither free nor cell variables.
    pub const NOFREE: Self = Self(0x0040);

    /// Wraps raw bits.
    #[must_use]
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// The raw bits.
    #[must_use]
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if every bit in `other` is set.
    #[must_use]
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

/// A decoded compiled unit.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CodeRecord {
    /// Positional parameter count.
    pub argcount: u32,
    /// Local variable slot count.
    pub nlocals: u32,
    /// Maximum evaluation-stack depth.
    pub stacksize: u32,
    /// Behaviour flags.
    pub flags: CodeFlags,
    /// Raw instruction stream (a byte-string value).
    pub code: Value,
    /// Literal pool; may contain nested [`Value::Code`] records.
    pub consts: Vec<Value>,
    /// Global/attribute names.
    pub names: Vec<Value>,
    /// Local variable names.
    pub varnames: Vec<Value>,
    /// Names captured from enclosing units.
    pub freevars: Vec<Value>,
    /// Names captured by nested units.
    pub cellvars: Vec<Value>,
    /// Originating source identifier.
    pub filename: Value,
    /// The unit's own name.
    pub name: Value,
    /// First source line.
    pub firstlineno: u32,
    /// Line-number delta table (a byte-string value).
    pub lnotab: Value,
}

/// A borrowed view of one code record field, see [`CodeRecord::field`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FieldRef<'a> {
    /// An integer field.
    U32(u32),
    /// The flags field.
    Flags(CodeFlags),
    /// A single nested value.
    Value(&'a Value),
    /// A tuple-valued field.
    Tuple(&'a [Value]),
}

impl CodeRecord {
    /// Instruction bytes.
    #[must_use]
    pub fn code_bytes(&self) -> &[u8] {
        self.code.as_bytes().unwrap_or_default()
    }

    /// Line-number table bytes.
    #[must_use]
    pub fn lnotab_bytes(&self) -> &[u8] {
        self.lnotab.as_bytes().unwrap_or_default()
    }

    /// Source identifier as raw text.
    #[must_use]
    pub fn filename_text(&self) -> &[u8] {
        self.filename.as_text().unwrap_or_default()
    }

    /// Unit name as raw text.
    #[must_use]
    pub fn name_text(&self) -> &[u8] {
        self.name.as_text().unwrap_or_default()
    }

    /// Returns one field by its wire position.
    #[must_use]
    pub fn field(&self, field: CodeField) -> FieldRef<'_> {
        match field {
            CodeField::ArgCount => FieldRef::U32(self.argcount),
            CodeField::NLocals => FieldRef::U32(self.nlocals),
            CodeField::StackSize => FieldRef::U32(self.stacksize),
            CodeField::Flags => FieldRef::Flags(self.flags),
            CodeField::Code => FieldRef::Value(&self.code),
            CodeField::Consts => FieldRef::Tuple(&self.consts),
            CodeField::Names => FieldRef::Tuple(&self.names),
            CodeField::VarNames => FieldRef::Tuple(&self.varnames),
            CodeField::FreeVars => FieldRef::Tuple(&self.freevars),
            CodeField::CellVars => FieldRef::Tuple(&self.cellvars),
            CodeField::Filename => FieldRef::Value(&self.filename),
            CodeField::Name => FieldRef::Value(&self.name),
            CodeField::FirstLineNo => FieldRef::U32(self.firstlineno),
            CodeField::LnoTab => FieldRef::Value(&self.lnotab),
        }
    }

    /// Code records held directly in the literal pool.
    pub fn nested_code(&self) -> impl Iterator<Item = &Self> + '_ {
        self.consts.iter().filter_map(Value::as_code)
    }

    /// Visits this record and every nested record, depth first, with its nesting depth.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Self, usize)) {
        self.walk_at(0, visit);
    }

    fn walk_at<'a>(&'a self, depth: usize, visit: &mut impl FnMut(&'a Self, usize)) {
        visit(self, depth);
        for child in self.nested_code() {
            child.walk_at(depth + 1, visit);
        }
    }
}
