//! # Finality Gadget Propagation Benchmarks
//!
//! | Scenario | Walk |
//! |----------|------|
//! | Linear chain | backward over strong parents, payload cascade per message |
//! | Random DAG | backward over a wide past cone |
//! | Branch chain | forward over consumers inside one branch |
//! | No-op update | early exit on an already final marker |
//!
//! Every iteration runs on a freshly booked tangle so grades start at `None`.

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use finality_gadget::{FinalityConfig, Gadget, GradeOfFinality, HasGradeOfFinality, MessageDag};
use finality_tests::fixtures::{build_branch_chain, build_chain, build_random_dag, RecordingSetup};
use std::time::Duration;

fn bench_marker_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("marker-chain");
    group.measurement_time(Duration::from_secs(10));

    for length in [100u64, 1_000, 5_000] {
        group.throughput(Throughput::Elements(length));
        group.bench_with_input(BenchmarkId::new("handle_marker", length), &length, |b, &length| {
            b.iter_batched(
                || {
                    let setup = RecordingSetup::new(FinalityConfig::default());
                    let chain = build_chain(&setup.tangle, length, 50);
                    (setup, chain.tip_marker())
                },
                |(setup, tip)| black_box(setup.gadget.handle_marker(&tip, 0.9)),
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

fn bench_marker_random_dag(c: &mut Criterion) {
    let mut group = c.benchmark_group("marker-random-dag");
    group.measurement_time(Duration::from_secs(10));

    for size in [1_000u64, 10_000] {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::new("handle_marker", size), &size, |b, &size| {
            b.iter_batched(
                || {
                    let setup = RecordingSetup::new(FinalityConfig::default());
                    let dag = build_random_dag(&setup.tangle, size, 42);
                    let tip = dag.markers[dag.markers.len() - 1];
                    (setup, tip)
                },
                |(setup, tip)| black_box(setup.gadget.handle_marker(&tip, 0.9)),
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

fn bench_branch_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("branch-chain");
    group.measurement_time(Duration::from_secs(10));

    for length in [100u64, 1_000] {
        group.throughput(Throughput::Elements(length));
        group.bench_with_input(BenchmarkId::new("handle_branch", length), &length, |b, &length| {
            b.iter_batched(
                || {
                    let setup = RecordingSetup::new(FinalityConfig::default());
                    let branch = build_branch_chain(&setup.tangle, 1, length);
                    for message_id in &branch.attachments {
                        if let Some(metadata) = setup.tangle.message_metadata(message_id) {
                            metadata.raise_grade_of_finality(GradeOfFinality::High);
                        }
                    }
                    (setup, branch.branch_id)
                },
                |(setup, branch_id)| black_box(setup.gadget.handle_branch(&branch_id, 0.9)),
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

fn bench_noop_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("noop-update");

    let setup = RecordingSetup::new(FinalityConfig::default());
    let chain = build_chain(&setup.tangle, 1_000, 50);
    let tip = chain.tip_marker();
    let _ = setup.gadget.handle_marker(&tip, 0.9);

    group.bench_function("handle_marker_already_final", |b| {
        b.iter(|| black_box(setup.gadget.handle_marker(&tip, 0.95)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_marker_chain,
    bench_marker_random_dag,
    bench_branch_chain,
    bench_noop_update,
);

criterion_main!(benches);
