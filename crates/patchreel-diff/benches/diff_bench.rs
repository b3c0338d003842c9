// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use patchreel_diff::{CommitStream, parse_commits, scan_commits};

/// Build a synthetic log with `commits` commits touching a handful of files
fn synthetic_log(commits: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for i in 0..commits {
        lines.push(format!("commit {:040x}", i));
        lines.push(format!("Author: Author {} <author{}@example.com>", i % 5, i % 5));
        lines.push("Date:   Mon Nov 14 13:45:44 2022 +0100".to_string());
        lines.push(String::new());
        lines.push(format!("    Change number {}", i));
        lines.push(String::new());
        for f in 0..3 {
            let name = format!("src/file_{}.rs", (i + f) % 7);
            lines.push(format!("diff --git a/{name} b/{name}"));
            lines.push(format!("--- a/{name}"));
            lines.push(format!("+++ b/{name}"));
            lines.push("@@ -10,6 +10,8 @@ fn example() {".to_string());
            lines.push("     let a = 1;".to_string());
            lines.push(format!("-    let b = {};", i));
            lines.push(format!("+    let b = {};", i + 1));
            lines.push("     let c = 3;".to_string());
            lines.push("+    let d = 4;".to_string());
            lines.push("+    let e = 5;".to_string());
            lines.push("-    old_call();".to_string());
            lines.push("+    new_call(a, b);".to_string());
            lines.push("     done();".to_string());
        }
    }
    lines
}

fn parse_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for size in [10, 100, 1000] {
        let log = synthetic_log(size);

        group.bench_with_input(BenchmarkId::new("scan_commits", size), &log, |b, log| {
            b.iter(|| scan_commits(log).expect("scan failed"))
        });

        group.bench_with_input(BenchmarkId::new("parse_commits", size), &log, |b, log| {
            b.iter(|| parse_commits(log).expect("parse failed"))
        });
    }

    let log = synthetic_log(1000);
    group.bench_function("stream_first_10_of_1000", |b| {
        b.iter(|| {
            CommitStream::new(&log)
                .take(10)
                .collect::<Result<Vec<_>, _>>()
                .expect("parse failed")
        })
    });

    group.finish();
}

criterion_group!(benches, parse_benchmarks);
criterion_main!(benches);
