// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

use std::fmt::Write as _;

use criterion::{Criterion, criterion_group, criterion_main};
use testoutput_events::{Outcome, decode_events};

/// A synthetic `go test -json` stream with `tests` tests across ten packages
fn synthetic_stream(tests: usize) -> String {
    let mut out = String::new();
    for i in 0..tests {
        let package = format!("example.com/bench/pkg{}", i % 10);
        let test = format!("Test{i}");
        let result = if i % 7 == 0 { "fail" } else { "pass" };
        for (action, output) in [
            ("run", ""),
            ("output", "=== RUN   TestX\\n"),
            ("output", "    x_test.go:10: message\\n"),
            (result, ""),
        ] {
            let _ = writeln!(
                out,
                r#"{{"Time":"2024-01-01T00:00:00.{i:09}Z","Action":"{action}","Package":"{package}","Test":"{test}","Output":"{output}"}}"#
            );
        }
    }
    out
}

fn events_benchmark(c: &mut Criterion) {
    let input = synthetic_stream(2_000);

    c.bench_function("decode_events", |b| {
        b.iter(|| decode_events(std::hint::black_box(input.as_bytes()), None))
    });

    let log = decode_events(input.as_bytes(), None).expect("synthetic stream decodes");
    c.bench_function("failing_by_key", |b| {
        b.iter(|| {
            log.events()
                .with_test()
                .with_package()
                .by_key()
                .filter_by_result(Outcome::Fail)
                .len()
        })
    });
}

criterion_group!(benches, events_benchmark);
criterion_main!(benches);
