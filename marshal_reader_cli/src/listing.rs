// Copyright 2026 the Marshal Reader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plain-text rendering of decoded values and code records.

use std::fmt;
use std::io::{self, Write};

use marshal_reader::{CodeField, CodeRecord, FieldRef, Value};

/// Displays a value in a compact literal-like form.
pub(crate) struct Repr<'a>(pub(crate) &'a Value);

impl fmt::Display for Repr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::Null => write!(f, "<null>"),
            Value::None => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::StopIteration => write!(f, "StopIteration"),
            Value::Ellipsis => write!(f, "Ellipsis"),
            Value::Int32(n) => write!(f, "{n}"),
            Value::Int64(n) => write!(f, "{n}"),
            Value::Long(n) => write!(f, "{n}L"),
            Value::LegacyFloat(x) | Value::BinaryFloat(x) => write!(f, "{x:?}"),
            Value::Complex { real, imag } => write!(f, "({real:?}{imag:+?}j)"),
            Value::Bytes(b) | Value::Interned(b) | Value::StringRef { text: b, .. } => {
                write_bytes(f, b)
            }
            Value::Unicode(s) => write!(f, "u{s:?}"),
            Value::Tuple(items) => write_seq(f, "(", items, ")"),
            Value::List(items) => write_seq(f, "[", items, "]"),
            Value::Dict(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", Repr(k), Repr(v))?;
                }
                write!(f, "}}")
            }
            Value::Set(set) => write_seq(f, "set([", set, "])"),
            Value::FrozenSet(set) => write_seq(f, "frozenset([", set, "])"),
            Value::Code(code) => write!(
                f,
                "<code object {} at {}, line {}>",
                String::from_utf8_lossy(code.name_text()),
                String::from_utf8_lossy(code.filename_text()),
                code.firstlineno
            ),
        }
    }
}

fn write_seq<'v>(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    items: impl IntoIterator<Item = &'v Value>,
    close: &str,
) -> fmt::Result {
    f.write_str(open)?;
    let mut count = 0_usize;
    for item in items {
        if count > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", Repr(item))?;
        count += 1;
    }
    if count == 1 && open == "(" {
        f.write_str(",")?;
    }
    f.write_str(close)
}

fn write_bytes(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    f.write_str("'")?;
    for &b in bytes {
        match b {
            b'\'' => f.write_str("\\'")?,
            b'\\' => f.write_str("\\\\")?,
            b'\n' => f.write_str("\\n")?,
            b'\r' => f.write_str("\\r")?,
            b'\t' => f.write_str("\\t")?,
            0x20..=0x7e => write!(f, "{}", char::from(b))?,
            _ => write!(f, "\\x{b:02x}")?,
        }
    }
    f.write_str("'")
}

fn hex(bytes: &[u8]) -> String {
    use fmt::Write as _;
    let mut s = String::with_capacity(2 + bytes.len() * 2);
    s.push_str("0x");
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Writes the field listing of `code`, recursing into nested code records in its literal pool.
pub(crate) fn write_code(out: &mut impl Write, code: &CodeRecord, depth: usize) -> io::Result<()> {
    let pad = "\t".repeat(depth);
    writeln!(out, "{pad}code(")?;
    for field in CodeField::ALL {
        let name = field.name();
        match code.field(field) {
            FieldRef::U32(n) => writeln!(out, "{pad}\t{name} = {n}")?,
            FieldRef::Flags(flags) => writeln!(out, "{pad}\t{name} = {:#06x}", flags.bits())?,
            FieldRef::Value(v) if field == CodeField::Code => {
                writeln!(out, "{pad}\t{name} = {}", hex(v.as_bytes().unwrap_or_default()))?;
            }
            FieldRef::Value(v) => writeln!(out, "{pad}\t{name} = {}", Repr(v))?,
            FieldRef::Tuple(items) if field == CodeField::Consts => {
                writeln!(out, "{pad}\t{name} =")?;
                for item in items {
                    match item.as_code() {
                        Some(nested) => {
                            writeln!(out, "{pad}\t----")?;
                            write_code(out, nested, depth + 1)?;
                            writeln!(out, "{pad}\t----")?;
                        }
                        None => writeln!(out, "{pad}\t\t{}", Repr(item))?,
                    }
                }
            }
            FieldRef::Tuple(items) => {
                writeln!(out, "{pad}\t{name} = {}", TupleRepr(items))?;
            }
        }
    }
    writeln!(out, "{pad})")
}

struct TupleRepr<'a>(&'a [Value]);

impl fmt::Display for TupleRepr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_seq(f, "(", self.0, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marshal_reader_conformance::simple_code;

    #[test]
    fn repr_of_scalars_and_strings() {
        assert_eq!(Repr(&Value::None).to_string(), "None");
        assert_eq!(Repr(&Value::LegacyFloat(3.25)).to_string(), "3.25");
        assert_eq!(
            Repr(&Value::Bytes(b"a'\x00".to_vec())).to_string(),
            "'a\\'\\x00'"
        );
        assert_eq!(
            Repr(&Value::Tuple(vec![Value::Int32(1)])).to_string(),
            "(1,)"
        );
        assert_eq!(
            Repr(&Value::Complex {
                real: 1.0,
                imag: -2.0
            })
            .to_string(),
            "(1.0-2.0j)"
        );
    }

    #[test]
    fn listing_follows_field_order_and_nests() {
        let inner = simple_code("inner", "m.py", vec![]);
        let outer = simple_code(
            "<module>",
            "m.py",
            vec![Value::Code(Box::new(inner)), Value::None],
        );

        let mut out = Vec::new();
        write_code(&mut out, &outer, 0).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "code(");
        assert_eq!(lines[1], "\targcount = 0");
        assert_eq!(lines[4], "\tflags = 0x0040");
        assert_eq!(lines[5], "\tcode = 0x64000053");
        assert_eq!(lines[6], "\tconsts =");
        assert_eq!(lines[7], "\t----");
        assert_eq!(lines[8], "\tcode(");
        assert!(text.contains("\t\tname = 'inner'\n"));
        assert!(text.contains("\t\tNone\n"));
        assert!(text.contains("\tname = '<module>'\n"));
        assert_eq!(lines.last(), Some(&")"));
    }
}
