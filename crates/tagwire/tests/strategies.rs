// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Field-extraction strategies: named fallback, positional, custom, and the
// failure modes shared by all of them.

use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::Arc;
use tagwire::{
    Codec, CodecConfig, CodecError, DefaultStrategy, FieldKey, ListValue, PositionalStrategy,
    ReflectionBuilder, TypeDescriptor, Value,
};

#[derive(Debug, Clone, PartialEq)]
struct Account {
    owner: String,
    balance: i64,
    limits: Vec<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

impl Point {
    fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

struct Wide;

tagwire::wire_object!(Account, Point, Wide);

fn account_reflection() -> ReflectionBuilder<Account> {
    ReflectionBuilder::<Account>::new()
        .field("owner", |a| &a.owner)
        .field("balance", |a| &a.balance)
        .field("limits", |a| &a.limits)
        .constructor(&["owner", "balance", "limits"], |args| {
            Ok(Account {
                owner: args.next()?,
                balance: args.next()?,
                limits: args.next()?,
            })
        })
}

fn account() -> Account {
    Account {
        owner: "ada".into(),
        balance: 1_000_000,
        limits: vec![10, 20],
    }
}

fn codec_with(strategy: DefaultStrategy) -> Codec {
    let codec = Codec::with_config(CodecConfig::default().default_strategy(strategy))
        .expect("config");
    codec
        .declare_as("bank.Account", account_reflection())
        .expect("declare");
    codec
}

#[test]
fn named_fallback_preserves_field_set() {
    let codec = codec_with(DefaultStrategy::Named);
    assert!(!codec
        .serializers()
        .is_bound(std::any::TypeId::of::<Account>()));

    let original = account();
    let bytes = codec.to_bytes(&original).expect("encode");
    let value = codec
        .deserialize_value(&mut Cursor::new(&bytes))
        .expect("decode");

    let fields: BTreeMap<String, Value> = value
        .as_object()
        .expect("object")
        .record()
        .iter()
        .map(|(key, value)| (key.name().expect("named key").to_string(), value.clone()))
        .collect();

    let mut expected = BTreeMap::new();
    expected.insert("owner".to_string(), codec.to_value(&original.owner).unwrap());
    expected.insert("balance".to_string(), Value::Int64(original.balance));
    expected.insert("limits".to_string(), codec.to_value(&original.limits).unwrap());
    assert_eq!(fields, expected);

    assert_eq!(codec.from_bytes::<Account>(&bytes).expect("typed"), original);
}

#[test]
fn named_extraction_is_sorted_by_key() {
    let codec = codec_with(DefaultStrategy::Named);
    let value = codec.to_value(&account()).expect("extract");
    let keys: Vec<&FieldKey> = value.as_object().expect("object").record().keys().collect();
    assert_eq!(
        keys,
        vec![
            &FieldKey::from("balance"),
            &FieldKey::from("limits"),
            &FieldKey::from("owner")
        ]
    );
}

#[test]
fn named_reconstruction_ignores_wire_order() {
    let codec = codec_with(DefaultStrategy::Named);
    let mut bytes = vec![13, 13, 12];
    bytes.extend_from_slice(b"bank.Account");
    bytes.push(3);
    for (key, value) in [
        ("owner", Value::from("bob")),
        ("limits", Value::List(ListValue::new(TypeDescriptor::Int32, vec![]))),
        ("balance", Value::Int64(-5)),
    ] {
        bytes.push(key.len() as u8);
        bytes.extend_from_slice(key.as_bytes());
        codec.serialize_value(&mut bytes, &value).expect("field");
    }

    let account: Account = codec.from_bytes(&bytes).expect("decode");
    assert_eq!(
        account,
        Account {
            owner: "bob".into(),
            balance: -5,
            limits: vec![],
        }
    );
}

#[test]
fn positional_is_strictly_shorter_than_named() {
    let named = codec_with(DefaultStrategy::Named);
    let positional = codec_with(DefaultStrategy::Positional);

    let named_bytes = named.to_bytes(&account()).expect("named");
    let positional_bytes = positional.to_bytes(&account()).expect("positional");
    assert!(positional_bytes.len() < named_bytes.len());

    let back: Account = positional.from_bytes(&positional_bytes).expect("decode");
    assert_eq!(back, account());

    let value = positional
        .deserialize_value(&mut Cursor::new(&positional_bytes))
        .expect("untyped");
    let keys: Vec<FieldKey> = value
        .as_object()
        .expect("object")
        .record()
        .keys()
        .cloned()
        .collect();
    assert_eq!(keys, vec![0usize.into(), 1usize.into(), 2usize.into()]);
}

#[test]
fn per_type_strategy_overrides_default() {
    let codec = codec_with(DefaultStrategy::Named);
    codec
        .register_strategy_as::<Account>("bank.Account", Arc::new(PositionalStrategy))
        .expect("register");

    let bytes = codec.to_bytes(&account()).expect("encode");
    let fallback = codec_with(DefaultStrategy::Positional)
        .to_bytes(&account())
        .expect("encode");
    assert_eq!(bytes, fallback);
}

#[test]
fn custom_point_roundtrip() {
    let codec = Codec::new();
    codec
        .register_as::<Point, _, _>(
            "geo.Point",
            |p, out| {
                out.push(&p.x)?;
                out.push(&p.y)
            },
            |args| Ok(Point::new(args.next()?, args.next()?)),
        )
        .expect("register");

    let bytes = codec.to_bytes(&Point::new(3, 4)).expect("encode");
    let mut expected = vec![13, 13, 9];
    expected.extend_from_slice(b"geo.Point");
    expected.extend_from_slice(&[2, 7, 3, 0, 0, 0, 7, 4, 0, 0, 0]);
    assert_eq!(bytes, expected);

    assert_eq!(
        codec.from_bytes::<Point>(&bytes).expect("decode"),
        Point::new(3, 4)
    );
}

#[test]
fn too_many_fields_overflow() {
    let codec = Codec::new();
    codec
        .register_as::<Wide, _, _>(
            "demo.Wide",
            |_, out| {
                for i in 0..256i32 {
                    out.push(&i)?;
                }
                Ok(())
            },
            |_| Ok(Wide),
        )
        .expect("register");

    let mut sink = Vec::new();
    let err = codec.serialize(&mut sink, &Wide).unwrap_err();
    assert!(matches!(
        err,
        CodecError::FieldCountOverflow {
            count: 256,
            max: 255,
            ..
        }
    ));
}

#[test]
fn reconstruct_wanting_more_values_is_mismatch() {
    let codec = Codec::new();
    codec
        .register_as::<Point, _, _>(
            "geo.Point",
            |p, out| out.push(&p.x),
            |args| Ok(Point::new(args.next()?, args.next()?)),
        )
        .expect("register");

    let bytes = codec.to_bytes(&Point::new(1, 2)).expect("encode");
    assert!(matches!(
        codec.from_bytes::<Point>(&bytes),
        Err(CodecError::StrategyMismatch { .. })
    ));
}

#[test]
fn reconstruct_leaving_values_is_mismatch() {
    let codec = Codec::new();
    codec
        .register_as::<Point, _, _>(
            "geo.Point",
            |p, out| {
                out.push(&p.x)?;
                out.push(&p.y)?;
                out.push(&0i32)
            },
            |args| Ok(Point::new(args.next()?, args.next()?)),
        )
        .expect("register");

    let bytes = codec.to_bytes(&Point::new(1, 2)).expect("encode");
    assert!(matches!(
        codec.from_bytes::<Point>(&bytes),
        Err(CodecError::StrategyMismatch { .. })
    ));
}

#[test]
fn named_record_missing_field_is_mismatch() {
    let codec = codec_with(DefaultStrategy::Named);
    let mut bytes = vec![13, 13, 12];
    bytes.extend_from_slice(b"bank.Account");
    bytes.push(1);
    bytes.push(5);
    bytes.extend_from_slice(b"owner");
    codec
        .serialize_value(&mut bytes, &Value::from("eve"))
        .expect("field");

    assert!(matches!(
        codec.from_bytes::<Account>(&bytes),
        Err(CodecError::StrategyMismatch { .. })
    ));
}

#[test]
fn reflective_strategy_without_declaration_is_unsupported() {
    let codec = Codec::new();
    codec
        .register_strategy_as::<Wide>("demo.Wide", Arc::new(PositionalStrategy))
        .expect("register");
    assert!(matches!(
        codec.to_bytes(&Wide),
        Err(CodecError::UnsupportedShape(_))
    ));
}
