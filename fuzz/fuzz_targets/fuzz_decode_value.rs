// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;
use std::sync::OnceLock;
use tagwire::{Codec, CodecConfig};

fn codec() -> &'static Codec {
    static CODEC: OnceLock<Codec> = OnceLock::new();
    CODEC.get_or_init(|| {
        Codec::with_config(CodecConfig::default().max_depth(32)).unwrap_or_default()
    })
}

fuzz_target!(|data: &[u8]| {
    // Any input decodes to a value or an error, never a panic.
    if let Ok(value) = codec().deserialize_value(&mut Cursor::new(data)) {
        // Decoded values encode again.
        let mut buf = Vec::new();
        let _ = codec().serialize_value(&mut buf, &value);
    }
});
