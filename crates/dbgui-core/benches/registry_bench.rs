//! Benchmarks for sorted registration.
//!
//! Run with: cargo bench -p dbgui-core

use std::hint::black_box;
use std::rc::Rc;

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use dbgui_core::geometry::{PanelGeometry, ResizeHandle, Viewport};
use dbgui_core::{MemoryHost, Panel, PanelConfig, SortedRegistry, button};

/// Deterministic pseudo-random keys (xorshift) so runs are comparable.
fn shuffled_keys(n: usize) -> Vec<String> {
    let mut state = 0x9E37_79B9_7F4A_7C15_u64;
    (0..n)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            format!("key-{state:016x}")
        })
        .collect()
}

fn bench_registry_upsert(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry/upsert");
    for n in [16, 128, 1024] {
        let keys = shuffled_keys(n);
        group.bench_with_input(BenchmarkId::new("shuffled", n), &keys, |b, keys| {
            b.iter_batched(
                SortedRegistry::<String>::new,
                |mut registry| {
                    for key in keys {
                        registry.upsert(key.clone());
                    }
                    black_box(registry.len())
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_panel_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("panel/add");
    for n in [16, 128] {
        let keys = shuffled_keys(n);
        group.bench_with_input(BenchmarkId::new("buttons", n), &keys, |b, keys| {
            b.iter_batched(
                || {
                    let host = Rc::new(MemoryHost::default());
                    Panel::new(host, PanelConfig::default()).expect("panel")
                },
                |mut panel| {
                    for key in keys {
                        panel.add(key, button(key.as_str())).expect("add");
                    }
                    black_box(panel.keys().count())
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_geometry_drag(c: &mut Criterion) {
    let viewport = Viewport::new(1920.0, 1080.0);
    c.bench_function("geometry/drag_corner_100_moves", |b| {
        b.iter_batched(
            || PanelGeometry::initial(viewport, 10.0),
            |mut geometry| {
                for step in 0..100 {
                    let delta = if step % 2 == 0 { 37.5 } else { -21.0 };
                    geometry.resize(ResizeHandle::SouthEast, delta, delta, viewport);
                }
                black_box(geometry.rect())
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_registry_upsert,
    bench_panel_add,
    bench_geometry_drag
);
criterion_main!(benches);
