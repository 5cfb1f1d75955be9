// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Byte-exact wire layout checks and malformed-input handling.
//
// All integers are little-endian; names are 7-bit varint length + UTF-8;
// string payloads are Int32 length + ASCII.

use std::collections::HashMap;
use std::io::Cursor;
use tagwire::{Codec, CodecError, NdArray, Value, WireTag};

fn int32(v: i32) -> [u8; 4] {
    v.to_le_bytes()
}

fn name(bytes: &mut Vec<u8>, s: &str) {
    bytes.push(s.len() as u8);
    bytes.extend_from_slice(s.as_bytes());
}

fn string_value(bytes: &mut Vec<u8>, s: &str) {
    bytes.push(WireTag::String.as_u8());
    bytes.extend_from_slice(&int32(s.len() as i32));
    bytes.extend_from_slice(s.as_bytes());
}

fn int32_value(bytes: &mut Vec<u8>, v: i32) {
    bytes.push(WireTag::Int32.as_u8());
    bytes.extend_from_slice(&int32(v));
}

#[test]
fn string_hi_layout() {
    let codec = Codec::new();
    let bytes = codec.to_bytes(&String::from("hi")).expect("encode");
    assert_eq!(bytes, vec![4, 2, 0, 0, 0, 0x68, 0x69]);
    assert_eq!(codec.from_bytes::<String>(&bytes).expect("decode"), "hi");
}

#[test]
fn two_by_three_array_layout() {
    let codec = Codec::new();
    let array = NdArray::new(vec![2, 3], vec![1i32, 2, 3, 4, 5, 6]).expect("shape");
    let bytes = codec.to_bytes(&array).expect("encode");

    let mut expected = vec![3, 3, 7];
    expected.extend_from_slice(&int32(2));
    expected.extend_from_slice(&int32(2));
    expected.extend_from_slice(&int32(3));
    for v in 1..=6 {
        int32_value(&mut expected, v);
    }
    assert_eq!(bytes, expected);

    let back: NdArray<i32> = codec.from_bytes(&bytes).expect("decode");
    assert_eq!(back.rank(), 2);
    assert_eq!(back.dims(), &[2, 3]);
    assert_eq!(back.get(&[0, 2]), Some(&3));
    assert_eq!(back.get(&[1, 0]), Some(&4));
}

#[test]
fn list_and_dictionary_preserve_count() {
    let codec = Codec::new();
    let bytes = codec.to_bytes(&vec![10u8, 20, 30]).expect("encode");
    assert_eq!(&bytes[..3], &[9, 9, 5]);
    assert_eq!(&bytes[3..7], &int32(3));

    let mut map = HashMap::new();
    for i in 0..5 {
        map.insert(i, i * 10);
    }
    let bytes = codec.to_bytes(&map).expect("encode");
    assert_eq!(&bytes[..4], &[12, 12, 7, 7]);
    assert_eq!(&bytes[4..8], &int32(5));
    let back: HashMap<i32, i32> = codec.from_bytes(&bytes).expect("decode");
    assert_eq!(back, map);
}

fn duplicate_key_stream() -> Vec<u8> {
    let mut bytes = vec![12, 12, 4, 7];
    bytes.extend_from_slice(&int32(3));
    string_value(&mut bytes, "a");
    int32_value(&mut bytes, 1);
    string_value(&mut bytes, "b");
    int32_value(&mut bytes, 2);
    string_value(&mut bytes, "a");
    int32_value(&mut bytes, 3);
    bytes
}

#[test]
fn duplicate_dictionary_keys_last_write_wins() {
    let codec = Codec::new();
    let bytes = duplicate_key_stream();

    let typed: HashMap<String, i32> = codec.from_bytes(&bytes).expect("typed decode");
    assert_eq!(typed.len(), 2);
    assert_eq!(typed["a"], 3);
    assert_eq!(typed["b"], 2);

    let untyped = codec
        .deserialize_value(&mut Cursor::new(&bytes))
        .expect("untyped decode");
    let dict = untyped.as_dictionary().expect("dictionary");
    assert_eq!(dict.len(), 2);
    assert_eq!(dict.get(&Value::from("a")), Some(&Value::Int32(3)));
}

#[test]
fn unknown_object_type_is_unresolved() {
    let codec = Codec::new();
    let mut bytes = vec![13, 13];
    name(&mut bytes, "demo.Ghost");
    bytes.push(0);

    let result = codec.deserialize_value(&mut Cursor::new(bytes));
    assert!(matches!(
        result,
        Err(CodecError::UnresolvedType { name }) if name == "demo.Ghost"
    ));
    assert!(codec.type_names().is_empty());
}

#[test]
fn unknown_name_inside_container_descriptor_is_unresolved() {
    let codec = Codec::new();
    let mut bytes = vec![9, 9, 13];
    name(&mut bytes, "demo.Ghost");
    bytes.extend_from_slice(&int32(0));

    assert!(matches!(
        codec.deserialize_value(&mut Cursor::new(bytes)),
        Err(CodecError::UnresolvedType { .. })
    ));
}

#[test]
fn invalid_tags_are_malformed() {
    let codec = Codec::new();
    for tag in [0u8, 14, 0x80, 0xff] {
        assert!(matches!(
            codec.deserialize_value(&mut Cursor::new(vec![tag])),
            Err(CodecError::MalformedStream(_))
        ));
    }
}

#[test]
fn truncated_input_is_malformed() {
    let codec = Codec::new();
    let bytes = codec
        .to_bytes(&vec![String::from("alpha"), String::from("beta")])
        .expect("encode");

    for cut in 0..bytes.len() {
        let result = codec.deserialize_value(&mut Cursor::new(&bytes[..cut]));
        assert!(
            matches!(result, Err(CodecError::MalformedStream(_))),
            "cut at {cut}: {result:?}"
        );
    }
}

#[test]
fn negative_count_is_malformed() {
    let codec = Codec::new();
    let mut bytes = vec![9, 9, 7];
    bytes.extend_from_slice(&int32(-1));
    assert!(matches!(
        codec.deserialize_value(&mut Cursor::new(bytes)),
        Err(CodecError::MalformedStream(_))
    ));
}

#[test]
fn null_is_a_bare_tag() {
    let codec = Codec::new();
    assert_eq!(codec.to_bytes(&None::<i32>).expect("encode"), vec![1]);
    assert_eq!(
        codec.to_bytes(&vec![None::<String>]).expect("encode"),
        vec![9, 9, 4, 1, 0, 0, 0, 1]
    );
}
