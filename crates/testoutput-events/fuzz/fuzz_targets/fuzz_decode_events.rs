// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for the event stream decoder
//!
//! Arbitrary bytes go through decoding and every grouped view; none of it
//! may panic.

#![no_main]

use libfuzzer_sys::fuzz_target;

use testoutput_events::{Outcome, decode_events};

fuzz_target!(|data: &[u8]| {
    let mut sink = Vec::new();
    if let Ok(log) = decode_events(data, Some(&mut sink)) {
        let failing = log
            .events()
            .with_test()
            .with_package()
            .by_key()
            .filter_by_result(Outcome::Fail);
        for (_, events) in &failing {
            let _ = events.output();
        }
    }
});
