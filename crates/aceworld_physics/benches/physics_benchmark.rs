//! # Physics Tick Benchmark
//!
//! Per-tick cost of the player and grenade integrators on a full-size map.
//!
//! Run with: `cargo bench --package aceworld_physics`

#![allow(missing_docs)]

use aceworld_map::VoxelMap;
use aceworld_physics::{cast_ray, GrenadeState, PlayerState};
use aceworld_shared::Vector3;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const DT: f64 = 1.0 / 60.0;

fn arena() -> VoxelMap {
    let mut map = VoxelMap::new(512);
    map.initialise_floor(62);
    for x in (0..512).step_by(8) {
        for y in 0..512 {
            map.set_point(x, y, 61, 0xFF00_FF00);
        }
    }
    map
}

fn bench_player_tick(c: &mut Criterion) {
    let map = arena();
    let mut player = PlayerState::new(Vector3::new(256.5, 256.5, 59.7));
    player.input.forward = true;
    player.set_orientation(0.6, 0.8, 0.0);
    let mut time = 0.0;

    c.bench_function("player_tick", |b| {
        b.iter(|| {
            time += DT;
            if player.position.x > 500.0 || player.position.y > 500.0 {
                player.position = Vector3::new(16.5, 16.5, 59.7);
            }
            black_box(player.update(&map, DT, time))
        });
    });
}

fn bench_grenade_tick(c: &mut Criterion) {
    let map = arena();
    c.bench_function("grenade_flight_until_rest", |b| {
        b.iter(|| {
            let mut grenade = GrenadeState::new(Vector3::new(100.5, 100.5, 30.0), Vector3::new(8.0, 3.0, -6.0));
            let mut ticks = 0u32;
            while ticks < 1000 && !grenade.update(&map, DT, 0.0) {
                ticks += 1;
            }
            black_box(ticks)
        });
    });
}

fn bench_cast_ray(c: &mut Criterion) {
    let map = arena();
    c.bench_function("cast_ray_128", |b| {
        b.iter(|| {
            black_box(cast_ray(
                &map,
                black_box(Vector3::new(3.5, 3.5, 40.0)),
                Vector3::new(1.0, 0.7, 0.2),
                128.0,
                true,
            ))
        });
    });
}

criterion_group!(benches, bench_player_tick, bench_grenade_tick, bench_cast_ray);
criterion_main!(benches);
