//! Performance benchmarks for road-network-lib
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use glam::DVec3;
use road_network_lib::{Config, GeoPosition, LanePosition, RoadGeometryBuilder};

/// Build a grid of parallel multi-lane roads with gently curved centerlines
fn build_network(num_roads: usize, points_per_road: usize) -> road_network_lib::RoadGeometry {
    let mut builder = RoadGeometryBuilder::new("bench", Config::default());
    for road in 0..num_roads {
        let y_base = road as f64 * 50.0;
        let centerline: Vec<DVec3> = (0..points_per_road)
            .map(|i| {
                let x = i as f64 * 10.0;
                DVec3::new(x, y_base + (x * 0.01).sin() * 5.0, 0.0)
            })
            .collect();
        builder
            .add_junction(format!("j{road}"))
            .add_segment(format!("s{road}"), centerline, 3, None);
    }
    builder.build().unwrap()
}

fn bench_lane_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_lane_position");

    for points in [100usize, 1_000, 10_000] {
        let rg = build_network(1, points);
        let lane = rg.junction(0).segment(0).lane(0);
        let query = GeoPosition::new(points as f64 * 5.0, 2.0, 0.0);

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(points), &points, |b, _| {
            b.iter(|| lane.to_lane_position(&query));
        });
    }

    group.finish();
}

fn bench_network_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_road_position");

    for roads in [10usize, 100] {
        let rg = build_network(roads, 200);
        let query = GeoPosition::new(500.0, roads as f64 * 25.0, 0.0);

        group.bench_with_input(BenchmarkId::from_parameter(roads), &roads, |b, _| {
            b.iter(|| rg.to_road_position(&query));
        });
    }

    group.finish();
}

fn bench_round_trip(c: &mut Criterion) {
    let rg = build_network(1, 1_000);
    let lane = rg.junction(0).segment(0).lane(1);
    let pos = LanePosition::new(lane.length() / 2.0, 0.5, 0.0);

    c.bench_function("round_trip", |b| {
        b.iter(|| {
            let geo = lane.to_geo_position(&pos);
            lane.to_lane_position(&geo)
        });
    });
}

criterion_group!(
    benches,
    bench_lane_projection,
    bench_network_query,
    bench_round_trip
);
criterion_main!(benches);
