//! Benchmarks for frame composition.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dotgrid::camera::Transform;
use dotgrid::layout::GridLayout;
use dotgrid::render::{
    render_frame, resolve_paint, ColorOverride, FrameInput, PaintContext, RecordingSurface, Rgb,
    Theme,
};

/// A hundred years of days.
const CENTURY: u32 = 36_500;

fn paint_context(theme: &Theme, passed_cells: u32) -> PaintContext<'_> {
    PaintContext {
        passed_cells,
        theme,
        day_fraction: 0.5,
        hovered: Some(42),
        color_override: None,
    }
}

/// Full repaint of grids of increasing size
fn bench_render_frame(c: &mut Criterion) {
    let theme = Theme::default();
    let layout = GridLayout::new(1200.0, 12.0, 6.0);
    let mut group = c.benchmark_group("render_frame");

    for total in [365_u32, 3_650, CENTURY] {
        group.throughput(Throughput::Elements(u64::from(total)));
        group.bench_with_input(BenchmarkId::from_parameter(total), &total, |b, &total| {
            let mut surface = RecordingSurface::new();
            b.iter(|| {
                surface.clear_ops();
                render_frame(
                    &mut surface,
                    black_box(&FrameInput {
                        total_cells: total,
                        layout: &layout,
                        transform: Transform::IDENTITY,
                        dpr: 2.0,
                        paint: paint_context(&theme, total / 2),
                    }),
                )
            });
        });
    }
    group.finish();
}

/// Repaint with a closure override marking every third cell
fn bench_render_frame_with_override(c: &mut Criterion) {
    let theme = Theme::default();
    let layout = GridLayout::new(1200.0, 12.0, 6.0);
    let mark = Rgb::new(0x22, 0xc5, 0x5e);
    let color_override = move |index: u32| (index % 3 == 0).then_some(mark);

    c.bench_function("render_frame_century_override", |b| {
        let mut surface = RecordingSurface::new();
        b.iter(|| {
            surface.clear_ops();
            let paint = PaintContext {
                color_override: Some(&color_override as &dyn ColorOverride),
                ..paint_context(&theme, CENTURY / 2)
            };
            render_frame(
                &mut surface,
                black_box(&FrameInput {
                    total_cells: CENTURY,
                    layout: &layout,
                    transform: Transform::IDENTITY,
                    dpr: 1.0,
                    paint,
                }),
            )
        });
    });
}

/// Paint resolution alone, without surface overhead
fn bench_resolve_paint(c: &mut Criterion) {
    let theme = Theme::default();
    let ctx = paint_context(&theme, CENTURY / 2);

    c.bench_function("resolve_paint_century", |b| {
        b.iter(|| {
            let mut glowing = 0_u32;
            for index in 0..CENTURY {
                if resolve_paint(black_box(index), &ctx).glow.is_some() {
                    glowing += 1;
                }
            }
            glowing
        });
    });
}

criterion_group!(
    benches,
    bench_render_frame,
    bench_render_frame_with_override,
    bench_resolve_paint
);
criterion_main!(benches);
