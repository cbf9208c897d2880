use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::time::{Duration, Instant};
use submit_throttle::{
    AdmissionGate, Clock, Document, GateConfig, SubmissionRequest, SubmissionTask, SystemClock,
};

/// Benchmark admission decisions on a single thread
fn bench_single_threaded_admission(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_threaded");
    group.throughput(Throughput::Elements(1000));

    // Huge capacity: every call is admitted
    group.bench_function("admit", |b| {
        let gate = AdmissionGate::new(GateConfig::new(usize::MAX, Duration::from_secs(3600)).unwrap());
        let now = Instant::now();
        b.iter(|| {
            for _ in 0..1000 {
                black_box(gate.try_admit(black_box(now)));
            }
        })
    });

    // Window full: every call is rejected
    group.bench_function("reject", |b| {
        let gate = AdmissionGate::new(GateConfig::new(1, Duration::from_secs(3600)).unwrap());
        let now = Instant::now();
        gate.try_admit(now);
        b.iter(|| {
            for _ in 0..1000 {
                black_box(gate.try_admit(black_box(now)));
            }
        })
    });

    // Real clock with a short window, so rollovers happen along the way
    group.bench_function("system_clock_rollover", |b| {
        let gate = AdmissionGate::new(GateConfig::new(100, Duration::from_micros(50)).unwrap());
        let clock = SystemClock::new();
        b.iter(|| {
            for _ in 0..1000 {
                black_box(gate.try_admit(clock.now()));
            }
        })
    });

    group.finish();
}

/// Benchmark contention on the shared window
fn bench_concurrent_admission(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent");

    for num_threads in [2, 4, 8].iter() {
        group.throughput(Throughput::Elements(1000 * *num_threads as u64));

        group.bench_with_input(
            BenchmarkId::new("threads", num_threads),
            num_threads,
            |b, &num_threads| {
                let gate = Arc::new(AdmissionGate::new(
                    GateConfig::new(500, Duration::from_millis(1)).unwrap(),
                ));
                let clock = SystemClock::new();

                b.iter(|| {
                    std::thread::scope(|s| {
                        for _ in 0..num_threads {
                            let gate = Arc::clone(&gate);
                            s.spawn(move || {
                                for _ in 0..1000 {
                                    black_box(gate.try_admit(clock.now()));
                                }
                            });
                        }
                    });
                })
            },
        );
    }

    group.finish();
}

/// Benchmark request body encoding
fn bench_encoding(c: &mut Criterion) {
    let task = SubmissionTask::new(SubmissionRequest::new(
        Document::default(),
        "c2lnbmF0dXJl",
    ));

    c.bench_function("encode_empty_document", |b| {
        b.iter(|| black_box(task.encode().unwrap()))
    });
}

criterion_group!(
    benches,
    bench_single_threaded_admission,
    bench_concurrent_admission,
    bench_encoding
);
criterion_main!(benches);
