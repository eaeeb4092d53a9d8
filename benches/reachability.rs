//! Benchmarks for reachability recompute.
//!
//! These measure the per-mutation cost the host pays:
//! - Forward BFS over linear, fan-out, and cyclic topologies
//! - Snapshot extraction from a populated store

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use flowlattice::graph::{GraphSnapshot, GraphStore, ReachabilityEngine, SnapshotEdge};
use flowlattice::node::Node;
use flowlattice::types::{EdgeKind, NodeKind};

fn exec_edge(id: usize, source: &str, target: &str) -> SnapshotEdge {
    SnapshotEdge {
        id: format!("e{id}"),
        source: source.to_string(),
        target: target.to_string(),
        kind: EdgeKind::Execution,
    }
}

/// start -> n0 -> n1 -> ... -> n(n-1)
fn linear_snapshot(node_count: usize) -> GraphSnapshot {
    let mut edges = Vec::with_capacity(node_count);
    if node_count > 0 {
        edges.push(exec_edge(0, "start", "n0"));
    }
    for i in 0..node_count.saturating_sub(1) {
        edges.push(exec_edge(i + 1, &format!("n{i}"), &format!("n{}", i + 1)));
    }
    GraphSnapshot {
        revision: 1,
        starting_points: vec!["start".to_string()],
        edges,
    }
}

/// start fans out to `width` workers, each closing back into a sink.
fn fanout_snapshot(width: usize) -> GraphSnapshot {
    let mut edges = Vec::with_capacity(width * 2);
    for i in 0..width {
        edges.push(exec_edge(i * 2, "start", &format!("w{i}")));
        edges.push(exec_edge(i * 2 + 1, &format!("w{i}"), "sink"));
    }
    GraphSnapshot {
        revision: 1,
        starting_points: vec!["start".to_string()],
        edges,
    }
}

/// One big ring reachable from the start node.
fn cycle_snapshot(node_count: usize) -> GraphSnapshot {
    let mut edges = vec![exec_edge(0, "start", "n0")];
    for i in 0..node_count {
        let next = (i + 1) % node_count;
        edges.push(exec_edge(i + 1, &format!("n{i}"), &format!("n{next}")));
    }
    GraphSnapshot {
        revision: 1,
        starting_points: vec!["start".to_string()],
        edges,
    }
}

fn bench_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("reachability_compute");

    for size in [10, 100, 1000] {
        let snapshot = linear_snapshot(size);
        group.bench_with_input(BenchmarkId::new("linear", size), &snapshot, |b, snap| {
            b.iter(|| ReachabilityEngine::compute(snap));
        });
    }

    for width in [10, 100, 1000] {
        let snapshot = fanout_snapshot(width);
        group.bench_with_input(BenchmarkId::new("fanout", width), &snapshot, |b, snap| {
            b.iter(|| ReachabilityEngine::compute(snap));
        });
    }

    for size in [10, 100, 1000] {
        let snapshot = cycle_snapshot(size);
        group.bench_with_input(BenchmarkId::new("cycle", size), &snapshot, |b, snap| {
            b.iter(|| ReachabilityEngine::compute(snap));
        });
    }

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_snapshot");

    for size in [10, 100, 1000] {
        let mut store = GraphStore::new();
        store
            .add_node(Node::new("start", NodeKind::Trigger).as_starting_point())
            .expect("fresh store");
        for i in 0..size {
            store
                .add_node(Node::new(format!("n{i}"), NodeKind::AiAgent))
                .expect("unique ids");
        }

        group.bench_with_input(BenchmarkId::new("nodes", size), &store, |b, store| {
            b.iter(|| store.snapshot());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compute, bench_snapshot);
criterion_main!(benches);
