//! Benchmarks for the geometric transform engine.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic pages laid out like a dense scanned book page.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ocrdoc::model::{BBox, Baseline, Dimensions, Line, Page, Word};
use ocrdoc::transform::{recompute_line_bbox, rotate_line, rotate_page};

/// Creates a synthetic page with the given number of lines of twelve words.
fn create_test_page(line_count: usize) -> Page {
    let mut page = Page::new(0, Dimensions::new(2550.0, 3300.0));
    for l in 0..line_count {
        let top = 150.0 + l as f64 * 48.0;
        let mut line = Line::new(BBox::default(), Baseline::new(0.001, -7.0), Some(28.0), Some(19.0));
        for w in 0..12 {
            let left = 180.0 + w as f64 * 180.0;
            line.push_word(Word::new(
                format!("word_{}_{}", l, w),
                "benchmark",
                BBox::new(left, top, left + 160.0, top + 36.0),
            ));
        }
        recompute_line_bbox(&mut line);
        page.push_line(line);
    }
    page
}

/// Benchmark line box recomputation.
fn bench_recompute(c: &mut Criterion) {
    let page = create_test_page(1);
    c.bench_function("recompute_line_bbox", |b| {
        b.iter(|| {
            let mut line = page.lines[0].clone();
            recompute_line_bbox(black_box(&mut line))
        });
    });
}

/// Benchmark rotating a single line.
fn bench_rotate_line(c: &mut Criterion) {
    let page = create_test_page(1);
    c.bench_function("rotate_line", |b| {
        b.iter(|| {
            let mut line = page.lines[0].clone();
            rotate_line(black_box(&mut line), 0.7, page.dims);
        });
    });
}

/// Benchmark rotating whole pages at various sizes.
fn bench_rotate_page(c: &mut Criterion) {
    let mut group = c.benchmark_group("rotate_page");

    for line_count in [10, 60, 200].iter() {
        let page = create_test_page(*line_count);
        group.bench_function(format!("{}_lines", line_count), |b| {
            b.iter(|| {
                let mut p = page.clone();
                rotate_page(black_box(&mut p), -1.3);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_recompute, bench_rotate_line, bench_rotate_page);
criterion_main!(benches);
