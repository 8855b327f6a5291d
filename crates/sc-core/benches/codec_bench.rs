//! Criterion benchmarks for the configuration codec.
//!
//! Measures assembling text into the binary format, disassembling it back,
//! and the full round trip, for a small layout and for one that fills blocks
//! to the 255-byte limit.
//!
//! Run with:
//! ```bash
//! cargo bench --package sc-core --bench codec_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sc_core::{assemble_str, disassemble};

// ── Fixtures ──────────────────────────────────────────────────────────────────

fn small_layout() -> String {
    "ifset set2\n\
     remapblock\n\
     CAPSLOCK LCTRL\n\
     LCTRL CAPS_LOCK\n\
     endblock\n\
     macroblock\n\
     macro A LCTRL\n\
     PRESS B\n\
     onbreak\n\
     BREAK B\n\
     endmacro\n\
     endblock\n"
        .to_string()
}

/// Eight full layer blocks plus eight macro blocks of 32 steps each.
fn large_layout() -> String {
    let mut text = String::new();
    for select in 1..=7 {
        text.push_str(&format!("ifselect {select}\nlayerblock\n"));
        for i in 0..126 {
            text.push_str(&format!("FN{} {}\n", i % 8 + 1, i + 1));
        }
        text.push_str("endblock\n");
    }
    text.push_str("ifselect any\n");
    for _ in 0..8 {
        text.push_str("macroblock\nmacro F1 CTRL -SHIFT\n");
        for _ in 0..16 {
            text.push_str("PUSH_META SET_META LALT\nPRESS TAB\nPOP_META\n");
        }
        text.push_str("endmacro\nendblock\n");
    }
    text
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_assemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble");
    for (name, text) in [("small", small_layout()), ("large", large_layout())] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &text, |b, text| {
            b.iter(|| assemble_str(black_box(text)).unwrap())
        });
    }
    group.finish();
}

fn bench_disassemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("disassemble");
    for (name, text) in [("small", small_layout()), ("large", large_layout())] {
        let bytes = assemble_str(&text).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(name), &bytes, |b, bytes| {
            b.iter(|| {
                let mut out = Vec::with_capacity(bytes.len() * 16);
                disassemble(black_box(bytes), &mut out).unwrap();
                out
            })
        });
    }
    group.finish();
}

fn bench_round_trip(c: &mut Criterion) {
    let bytes = assemble_str(&large_layout()).unwrap();
    c.bench_function("round_trip_large", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            disassemble(black_box(&bytes), &mut out).unwrap();
            let text = String::from_utf8(out).unwrap();
            assemble_str(&text).unwrap()
        })
    });
}

criterion_group!(benches, bench_assemble, bench_disassemble, bench_round_trip);
criterion_main!(benches);
