//! Benchmark for per-frame geometry and text work.
//!
//! A wheel redraw builds one sector per prize and wraps every text run, on
//! every frame of a spin.
//!
//! Run with: cargo bench --package luckydraw_core --bench geometry_benchmark

use std::f64::consts::PI;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use luckydraw_core::geometry::{round_rect, sector};
use luckydraw_core::gradient::GradientSpec;
use luckydraw_core::text::layout_lines;
use luckydraw_core::Rect;

fn benchmark_sector(c: &mut Criterion) {
    c.bench_function("sector_quarter_turn", |b| {
        b.iter(|| black_box(sector(black_box(40.0), 200.0, 0.0, PI / 2.0, 4.0)));
    });

    c.bench_function("sector_full_turn", |b| {
        b.iter(|| black_box(sector(black_box(40.0), 200.0, -PI / 2.0, 1.5 * PI, 4.0)));
    });
}

fn benchmark_wheel_frame(c: &mut Criterion) {
    c.bench_function("wheel_frame_12_sectors", |b| {
        let span = 2.0 * PI / 12.0;
        let mut rotation = 0.0f64;
        b.iter(|| {
            rotation += 0.05;
            for i in 0..12 {
                let mid = rotation + f64::from(i) * span;
                black_box(sector(40.0, 200.0, mid - span / 2.0, mid + span / 2.0, 4.0));
            }
        });
    });
}

fn benchmark_round_rect(c: &mut Criterion) {
    let rect = Rect::new(10.0, 10.0, 120.0, 80.0);
    c.bench_function("round_rect", |b| {
        b.iter(|| black_box(round_rect(black_box(rect), 20.0)));
    });
}

fn benchmark_gradient(c: &mut Criterion) {
    let spec = GradientSpec::parse("linear-gradient(130deg, #fff, 0.5 #ffce98, #000 100%)")
        .unwrap_or_else(|e| panic!("{e}"));
    let rect = Rect::new(0.0, 0.0, 300.0, 300.0);
    c.bench_function("gradient_line", |b| {
        b.iter(|| black_box(spec.line(black_box(rect))));
    });
}

fn benchmark_text_wrap(c: &mut Criterion) {
    let measure = |s: &str| s.chars().count() as f64 * 9.5;
    c.bench_function("wrap_shrinking_bound", |b| {
        b.iter(|| {
            black_box(layout_lines(
                black_box("Grand prize: a weekend for two at the seaside"),
                true,
                measure,
                |line| 160.0 - 25.0 * line as f64,
            ))
        });
    });
}

criterion_group!(
    benches,
    benchmark_sector,
    benchmark_wheel_frame,
    benchmark_round_rect,
    benchmark_gradient,
    benchmark_text_wrap,
);
criterion_main!(benches);
