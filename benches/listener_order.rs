use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use orbit_render::camera::OrbitCameraController;
use orbit_render::core::{FrameContext, ListenerRegistry, RenderListener};

/// Registry with `count` listeners spread over a handful of priorities
fn populated_registry(count: usize) -> ListenerRegistry<u64> {
    let mut registry = ListenerRegistry::new();
    for i in 0..count {
        let priority = ((i * 7919) % 16) as i32 - 8;
        registry.add(RenderListener::from_fn(
            priority,
            move |frame: &mut FrameContext<u64>| {
                frame.pass += i as u64;
                Ok(())
            },
        ));
    }
    registry
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("listener_snapshot");

    for count in [4usize, 64, 1024] {
        let registry = populated_registry(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &registry, |b, registry| {
            b.iter(|| black_box(registry.snapshot()))
        });
    }

    group.finish();
}

fn bench_camera_matrices(c: &mut Criterion) {
    let mut camera = OrbitCameraController::default();
    camera.on_pointer_down(0.0, 0.0);
    camera.on_pointer_move(120.0, 45.0);

    c.bench_function("orbit_view_projection", |b| {
        b.iter(|| black_box(camera.view_projection_matrix(black_box(16.0 / 9.0))))
    });
}

criterion_group!(benches, bench_snapshot, bench_camera_matrices);
criterion_main!(benches);
