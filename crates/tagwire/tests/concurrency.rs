// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Shared-codec behaviour: concurrent decoders on one type name cache,
// file-backed streams, and the process-wide facade.

use std::io::{BufReader, BufWriter, Seek, SeekFrom, Write};
use std::any::TypeId;
use std::sync::{Arc, Barrier};
use tagwire::{Codec, ReflectionBuilder, Value};

#[derive(Debug, Clone, PartialEq)]
struct Reading {
    station: String,
    values: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Tick(i64);

tagwire::wire_object!(Reading, Tick);

fn reading_reflection() -> ReflectionBuilder<Reading> {
    ReflectionBuilder::<Reading>::new()
        .field("station", |r| &r.station)
        .field("values", |r| &r.values)
        .constructor(&["station", "values"], |args| {
            Ok(Reading {
                station: args.next()?,
                values: args.next()?,
            })
        })
}

fn readings(n: usize) -> Vec<Reading> {
    (0..n)
        .map(|i| Reading {
            station: format!("st-{i}"),
            values: (0..i).map(|v| v as f64 * 0.5).collect(),
        })
        .collect()
}

#[test]
fn concurrent_decoders_share_cache() {
    let expected = readings(16);
    let bytes = {
        let writer = Codec::new();
        writer
            .declare_as("wx.Reading", reading_reflection())
            .expect("declare");
        writer.to_bytes(&expected).expect("encode")
    };

    let codec = Codec::new();
    codec
        .declare_as("wx.Reading", reading_reflection())
        .expect("declare");
    assert!(codec.type_names().is_empty());

    let threads = 8;
    let start = Barrier::new(threads);
    let handles: Vec<_> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..threads)
            .map(|_| {
                scope.spawn(|| {
                    start.wait();
                    let decoded: Vec<Reading> = codec.from_bytes(&bytes).expect("decode");
                    assert_eq!(decoded, expected);
                    codec.resolve_name("wx.Reading").expect("cached")
                })
            })
            .collect();
        workers
            .into_iter()
            .map(|worker| worker.join().expect("decoder thread"))
            .collect()
    });

    assert_eq!(codec.type_names().len(), 1);
    assert!(codec.type_names().contains("wx.Reading"));
    for handle in &handles {
        assert_eq!(handle.type_id(), TypeId::of::<Reading>());
        assert_eq!(handle.name(), "wx.Reading");
        assert!(handle.reflection().is_some());
    }
}

#[test]
fn concurrent_encoders_and_registration() {
    let codec = Arc::new(Codec::new());
    codec
        .declare_as("wx.Reading", reading_reflection())
        .expect("declare");

    std::thread::scope(|scope| {
        for t in 0..4i64 {
            let codec = Arc::clone(&codec);
            scope.spawn(move || {
                codec
                    .register_as::<Tick, _, _>("wx.Tick", |tick, out| out.push(&tick.0), |args| {
                        Ok(Tick(args.next()?))
                    })
                    .expect("register");
                let bytes = codec.to_bytes(&Tick(t)).expect("encode");
                assert_eq!(codec.from_bytes::<Tick>(&bytes).expect("decode"), Tick(t));
            });
        }
    });
}

#[test]
fn file_backed_stream_holds_consecutive_values() {
    let codec = Codec::new();
    codec
        .declare_as("wx.Reading", reading_reflection())
        .expect("declare");

    let mut file = tempfile::tempfile().expect("tempfile");
    {
        let mut sink = BufWriter::new(&mut file);
        for reading in readings(4) {
            codec.serialize(&mut sink, &reading).expect("encode");
        }
        codec
            .serialize(&mut sink, &String::from("end"))
            .expect("encode");
        sink.flush().expect("flush");
    }

    file.seek(SeekFrom::Start(0)).expect("rewind");
    let mut source = BufReader::new(&mut file);
    for expected in readings(4) {
        let reading: Reading = codec.deserialize(&mut source).expect("decode");
        assert_eq!(reading, expected);
    }
    let trailer = codec.deserialize_value(&mut source).expect("trailer");
    assert_eq!(trailer, Value::from("end"));
}

#[test]
fn global_facade_roundtrip() {
    tagwire::declare(reading_reflection()).expect("declare");

    let mut buf = Vec::new();
    let expected = readings(3);
    tagwire::serialize(&mut buf, &expected).expect("encode");
    let decoded: Vec<Reading> = tagwire::deserialize(&mut buf.as_slice()).expect("decode");
    assert_eq!(decoded, expected);

    let mut buf = Vec::new();
    tagwire::serialize_value(&mut buf, &Value::Int16(7)).expect("encode");
    assert_eq!(
        tagwire::deserialize_value(&mut buf.as_slice()).expect("decode"),
        Value::Int16(7)
    );

    tagwire::register::<Tick, _, _>(|tick, out| out.push(&tick.0), |args| Ok(Tick(args.next()?)))
        .expect("register");
    let mut buf = Vec::new();
    tagwire::serialize(&mut buf, &Tick(42)).expect("encode");
    assert_eq!(
        tagwire::deserialize::<Tick, _>(&mut buf.as_slice()).expect("decode"),
        Tick(42)
    );
}
