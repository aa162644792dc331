//! # Frame Benchmark
//!
//! A full frame (begin, widgets, end, replay) has to fit comfortably in a
//! fraction of a 60 Hz budget with a realistic window count.
//!
//! Run with: `cargo bench --package tessera_ui`

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tessera_ui::render::RecordingRenderer;
use tessera_ui::{Context, ContextConfig, DockPosition, FrameHints, Options, Rect, Request};

fn build_frame(ctx: &mut Context, windows: usize, rows: usize) {
    ctx.begin(FrameHints::default());
    for w in 0..windows {
        let name = format!("Window {w}");
        #[allow(clippy::cast_precision_loss)]
        let rect = Rect::new(20.0 * w as f32, 16.0 * w as f32, 320.0, 240.0);
        if ctx.begin_window(&name, rect, Options::NONE) {
            for row in 0..rows {
                ctx.layout_row(&[90.0, -1.0], 0.0);
                let label = ctx.layout_next();
                ctx.push_id(&row.to_le_bytes());
                let id = ctx.get_id(b"value");
                let field = ctx.layout_next();
                ctx.update_control(id, field, Options::NONE, tessera_ui::ElementType::Button);
                let style = ctx.control_style(id, tessera_ui::ElementType::Button);
                ctx.draw_frame(field, &style);
                ctx.draw_control_text("value", label, &style, Options::NONE);
                ctx.pop_id();
            }
            ctx.end_window();
        }
    }
    ctx.end(true);
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");

    for windows in [1_usize, 8, 32] {
        let mut ctx = Context::new(ContextConfig::default());
        build_frame(&mut ctx, windows, 20);

        group.bench_with_input(BenchmarkId::from_parameter(windows), &windows, |b, &n| {
            b.iter(|| {
                build_frame(&mut ctx, n, 20);
                black_box(ctx.commands().len())
            });
        });
    }

    group.finish();
}

fn bench_docked_frame(c: &mut Criterion) {
    let mut ctx = Context::new(ContextConfig::default());
    build_frame(&mut ctx, 4, 10);
    let refs: Vec<_> = (0..4).filter_map(|w| ctx.container_by_name(&format!("Window {w}"))).collect();

    ctx.begin(FrameHints::default());
    for pair in refs.windows(2) {
        ctx.request(Request::Dock {
            child: pair[1],
            parent: pair[0],
            position: DockPosition::Right,
            ratio: 0.5,
        });
    }
    ctx.end(true);

    c.bench_function("frame_docked_4", |b| {
        b.iter(|| {
            build_frame(&mut ctx, 4, 10);
            black_box(ctx.dock().split_count())
        });
    });
}

fn bench_replay(c: &mut Criterion) {
    let mut ctx = Context::new(ContextConfig::default());
    build_frame(&mut ctx, 8, 20);
    let mut renderer = RecordingRenderer::new();

    c.bench_function("replay_8_windows", |b| {
        b.iter(|| {
            renderer.clear();
            black_box(ctx.render(&mut renderer))
        });
    });
}

criterion_group!(benches, bench_frame, bench_docked_frame, bench_replay);
criterion_main!(benches);
