// This file contains benchmarks for the purpose of guarding against
// performance regressions. To run them, use `cargo bench`.

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use glam::Vec3;
use rand::{Rng, SeedableRng};
use viewtrace::{Camera, Material, RenderConfig, RenderSession, Scene, VoxelChunk};

fn build_scene() -> Arc<Scene> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0x5eed);
    let mut scene = Scene::new();

    let diffuse = scene.add_material(Material::diffuse(Vec3::new(0.7, 0.4, 0.3)));
    let mirror = scene.add_material(Material::mirror(Vec3::splat(0.9)));
    let emitter = scene.add_material(Material::emitter(Vec3::splat(4.0)));

    for i in 0..64 {
        let center = Vec3::new(
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-2.0..6.0),
            rng.gen_range(-10.0..10.0),
        );
        let material = if i % 3 == 0 { mirror } else { diffuse };
        scene
            .add_sphere(center, rng.gen_range(0.3..1.2), material)
            .unwrap();
    }
    scene
        .add_sphere(Vec3::new(0.0, 20.0, 0.0), 2.0, emitter)
        .unwrap();

    // Ground slab plus a scattered voxel field.
    scene
        .add_mesh(
            &[
                Vec3::new(-15.0, -3.0, -15.0),
                Vec3::new(15.0, -3.0, -15.0),
                Vec3::new(15.0, -3.0, 15.0),
                Vec3::new(-15.0, -3.0, 15.0),
            ],
            &[[0, 1, 2], [0, 2, 3]],
            diffuse,
        )
        .unwrap();

    let chunk = VoxelChunk::new(Vec3::new(-8.0, -3.0, -8.0), [16, 4, 16], 1.0);
    let cells: Vec<i32> = (0..chunk.cell_count())
        .map(|_| if rng.gen_bool(0.1) { diffuse } else { -1 })
        .collect();
    scene.set_voxels(chunk, cells).unwrap();

    Arc::new(scene)
}

fn bench_camera(width: u32, height: u32) -> Camera {
    Camera::look_at(
        Vec3::new(0.0, 4.0, 18.0),
        Vec3::ZERO,
        Vec3::Y,
        width,
        height,
        70.0,
        0.0,
    )
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let scene = build_scene();
    let mut group = c.benchmark_group("Performance regression tests");
    group.sample_size(10);

    group.bench_function("Hit resolution (4096 rays)", |b| {
        let view = scene.view();
        let camera = bench_camera(64, 64);
        let rays: Vec<_> = (0..4096u32)
            .map(|i| kernels::raygen_pixel(&camera, 0, i % 64, i / 64))
            .collect();
        b.iter(|| {
            let mut hits = 0u32;
            for ray in &rays {
                let hit = view.resolve_hit(
                    ray,
                    0.001,
                    viewtrace::ResolvePolicy::ClosestOpaque,
                );
                hits += hit.is_hit() as u32;
            }
            hits
        })
    });

    group.bench_function("Full frame 320x180, 4 bounces", |b| {
        let mut session = RenderSession::new(scene.clone(), RenderConfig::default());
        let camera = bench_camera(320, 180);
        b.iter(|| session.render(&camera).map(|f| f.color.len()).unwrap())
    });

    group.bench_function("Full frame 320x180, filtered", |b| {
        let config = RenderConfig {
            spatial_window: 5,
            ..RenderConfig::default()
        };
        let mut session = RenderSession::new(scene.clone(), config);
        let camera = bench_camera(320, 180);
        b.iter(|| session.render(&camera).map(|f| f.color.len()).unwrap())
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
