use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use hypercent_core::Graph;
use hypercent_core::graph::GraphBuilder;
use hypercent_metrics::betweenness::betweenness_centrality;
use hypercent_metrics::distance::distance_centrality;
use hypercent_metrics::exec::ExecutionConfig;
use hypercent_metrics::pagerank::{PageRankConfig, pagerank};

const SIZES: [usize; 3] = [250, 1_000, 4_000];

/// Sparse random graph with roughly three edges per node.
#[allow(clippy::cast_possible_wrap)]
fn random_graph(nodes: usize, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut b = GraphBuilder::plain();
    for _ in 0..nodes * 3 {
        let u = rng.gen_range(0..nodes) as i64;
        let v = rng.gen_range(0..nodes) as i64;
        b.edge(u, v);
    }
    b.finish()
}

/// Random hypergraph: `members` real ids spread over hyperedges of 2..=6.
#[allow(clippy::cast_possible_wrap)]
fn random_hypergraph(members: usize, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut b = GraphBuilder::hypergraph(4_000_000);
    for _ in 0..members / 2 {
        let size = rng.gen_range(2..=6);
        let edge: Vec<i64> = (0..size)
            .map(|_| rng.gen_range(0..members) as i64)
            .collect();
        b.hyperedge(&edge).expect("hyperedge id");
    }
    b.finish()
}

fn bench_betweenness(c: &mut Criterion) {
    let mut group = c.benchmark_group("betweenness");
    group.sample_size(10);
    let exec = ExecutionConfig::default();

    for n in SIZES {
        let graph = random_graph(n, 0xB7_u64 + n as u64);
        let hyper = random_hypergraph(n, 0x4E_u64 + n as u64);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("graph", n), &graph, |b, g| {
            b.iter(|| black_box(betweenness_centrality(g, &exec)));
        });
        group.bench_with_input(BenchmarkId::new("hypergraph", n), &hyper, |b, g| {
            b.iter(|| black_box(betweenness_centrality(g, &exec)));
        });
    }
    group.finish();
}

fn bench_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("distance");
    group.sample_size(10);
    let exec = ExecutionConfig::default();

    for n in SIZES {
        let hyper = random_hypergraph(n, 0xD1_u64 + n as u64);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("hypergraph", n), &hyper, |b, g| {
            b.iter(|| black_box(distance_centrality(g, &exec)));
        });
    }
    group.finish();
}

fn bench_pagerank(c: &mut Criterion) {
    let mut group = c.benchmark_group("pagerank");
    let config = PageRankConfig::default();

    for n in SIZES {
        let graph = random_graph(n, 0x9A_u64 + n as u64);
        group.bench_with_input(BenchmarkId::from_parameter(n), &graph, |b, g| {
            b.iter(|| black_box(pagerank(g, &config)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_betweenness, bench_distance, bench_pagerank);
criterion_main!(benches);
