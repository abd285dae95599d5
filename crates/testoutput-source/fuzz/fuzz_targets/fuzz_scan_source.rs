// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for the Go source scanner

#![no_main]

use libfuzzer_sys::fuzz_target;

use testoutput_source::scan_source;

fuzz_target!(|data: &[u8]| {
    if let Ok(source) = std::str::from_utf8(data) {
        // scan_source should never panic on any input
        let _ = scan_source(source);
    }
});
