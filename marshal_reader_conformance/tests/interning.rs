// Copyright 2026 the Marshal Reader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Back-reference behaviour of the intern table within one decode session.

use marshal_reader::{DecodeErrorKind, Decoder, Tag, Value};
use marshal_reader_conformance::Encoder;

fn interned(e: &mut Encoder, text: &[u8]) {
    e.tag(Tag::Interned)
        .i32(i32::try_from(text.len()).unwrap())
        .raw(text);
}

fn string_ref(index: u32, text: &[u8]) -> Value {
    Value::StringRef {
        index,
        text: text.to_vec(),
    }
}

#[test]
fn kth_interned_string_is_reachable_later() {
    let mut e = Encoder::new();
    e.tag(Tag::List).i32(6);
    interned(&mut e, b"zero");
    e.tag(Tag::String).i32(5).raw(b"plain");
    interned(&mut e, b"one");
    e.tag(Tag::StringRef).u32(1);
    e.tag(Tag::StringRef).u32(0);
    e.tag(Tag::StringRef).u32(1);
    let bytes = e.into_bytes();

    let mut d = Decoder::new(&bytes);
    let v = d.decode_value().unwrap();
    assert_eq!(
        v,
        Value::List(vec![
            Value::Interned(b"zero".to_vec()),
            Value::Bytes(b"plain".to_vec()),
            Value::Interned(b"one".to_vec()),
            string_ref(1, b"one"),
            string_ref(0, b"zero"),
            string_ref(1, b"one"),
        ])
    );
    // Plain strings are not interned.
    assert_eq!(d.interns().len(), 2);
    assert_eq!(d.interns().resolve(1), Some(&b"one"[..]));
}

#[test]
fn reference_before_its_interning_fails() {
    let mut e = Encoder::new();
    e.tag(Tag::Tuple).i32(3);
    interned(&mut e, b"zero");
    e.tag(Tag::StringRef).u32(1);
    interned(&mut e, b"one");
    let bytes = e.into_bytes();

    let err = Decoder::new(&bytes).decode_value().unwrap_err();
    assert_eq!(err.kind(), &DecodeErrorKind::InvalidReference(1));
    // tuple header (5) + interned "zero" (9) + ref tag (1)
    assert_eq!(err.offset(), 15);
}

#[test]
fn tables_are_not_shared_across_sessions() {
    let mut e = Encoder::new();
    interned(&mut e, b"name");
    let first = e.into_bytes();
    assert!(Decoder::new(&first).decode_value().is_ok());

    let mut e = Encoder::new();
    e.tag(Tag::StringRef).u32(0);
    let second = e.into_bytes();
    let err = Decoder::new(&second).decode_value().unwrap_err();
    assert_eq!(err.kind(), &DecodeErrorKind::InvalidReference(0));
}

#[test]
fn table_persists_across_values_in_one_session() {
    let mut e = Encoder::new();
    interned(&mut e, b"shared");
    e.tag(Tag::StringRef).u32(0);
    let bytes = e.into_bytes();

    let mut d = Decoder::new(&bytes);
    assert_eq!(d.decode_value(), Ok(Value::Interned(b"shared".to_vec())));
    assert_eq!(d.decode_value(), Ok(string_ref(0, b"shared")));
    assert_eq!(d.finish(), 0);
}
