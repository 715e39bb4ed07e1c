// Copyright 2026 the Marshal Reader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Values survive an encode/decode cycle through the reference encoder.

use hashbrown::{HashMap, HashSet};
use marshal_reader::{Value, decode_value};
use marshal_reader_conformance::encode;
use num_bigint::BigInt;

fn roundtrip(v: &Value) {
    let bytes = encode(v);
    let back = decode_value(&bytes)
        .unwrap_or_else(|e| panic!("{} failed to decode: {e}", v.kind_name()));
    assert_eq!(&back, v, "{} did not round-trip", v.kind_name());
}

#[test]
fn scalars() {
    let values = [
        Value::None,
        Value::Bool(false),
        Value::Bool(true),
        Value::StopIteration,
        Value::Ellipsis,
        Value::Int32(i32::MIN),
        Value::Int32(7),
        Value::Int64(i64::MIN),
        Value::Int64(-1),
        Value::Int64(1 << 40),
        Value::LegacyFloat(3.25),
        Value::LegacyFloat(-1e300),
        Value::LegacyFloat(f64::INFINITY),
        Value::BinaryFloat(0.1),
        Value::BinaryFloat(-0.0),
        Value::Complex {
            real: 1.0,
            imag: -0.5,
        },
        Value::Bytes(b"\x00\xffraw".to_vec()),
        Value::Bytes(Vec::new()),
        Value::Unicode("caf\u{e9} \u{1f600}".into()),
    ];
    for v in &values {
        roundtrip(v);
    }
}

#[test]
fn long_integers() {
    let big: BigInt = "-123456789012345678901234567890".parse().unwrap();
    for v in [
        BigInt::from(0),
        BigInt::from(32767),
        BigInt::from(32768),
        BigInt::from(-(1_i64 << 45)),
        big,
    ] {
        roundtrip(&Value::Long(v));
    }
}

#[test]
fn containers() {
    let mut set = HashSet::new();
    set.insert(Value::Int32(1));
    set.insert(Value::Bytes(b"x".to_vec()));
    set.insert(Value::Tuple(vec![Value::None]));

    let mut dict = HashMap::new();
    dict.insert(Value::Bytes(b"k".to_vec()), Value::List(vec![Value::Int32(1)]));
    dict.insert(Value::FrozenSet(set.clone()), Value::Dict(HashMap::new()));
    dict.insert(Value::Int64(5), Value::Set(set.clone()));

    roundtrip(&Value::Tuple(vec![]));
    roundtrip(&Value::List(vec![Value::Tuple(vec![Value::Ellipsis]), Value::None]));
    roundtrip(&Value::Set(set.clone()));
    roundtrip(&Value::FrozenSet(set));
    roundtrip(&Value::Dict(dict));
}

#[test]
fn interned_strings_and_references() {
    let v = Value::Tuple(vec![
        Value::Interned(b"a".to_vec()),
        Value::Interned(b"b".to_vec()),
        Value::StringRef {
            index: 1,
            text: b"b".to_vec(),
        },
        Value::StringRef {
            index: 0,
            text: b"a".to_vec(),
        },
    ]);
    roundtrip(&v);
}
