use criterion::{Criterion, criterion_group, criterion_main};
use nbench_core::perf::scenarios::{Scale, benchmarks};
use std::hint::black_box;

fn bench_workload_scenarios(c: &mut Criterion) {
    for bench in benchmarks() {
        let arg = bench.arg(Scale::Quick);
        let workload = bench.workload();
        bench
            .run_verified(Scale::Quick)
            .expect("quick scenario must match its oracle before benchmarking");
        c.bench_function(&bench.bench_case_name(Scale::Quick), move |b| {
            b.iter(|| black_box(workload(black_box(arg))));
        });
    }
}

criterion_group!(workloads, bench_workload_scenarios);
criterion_main!(workloads);
