use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use num_rs_kernel::{DenseMatrix, DenseVector, Kernel, SequentialScheduler};

fn sample_matrix(rows: usize, cols: usize) -> DenseMatrix {
    let data: Vec<f64> = (0..rows * cols).map(|i| (i % 13) as f64 - 6.0).collect();
    DenseMatrix::from_vec(data, rows, cols).expect("sample matrix")
}

fn bench_multiply(c: &mut Criterion) {
    let parallel = Kernel::default();
    let sequential = Kernel::new(SequentialScheduler);
    let mut group = c.benchmark_group("multiply");
    for &size in &[64usize, 128, 256] {
        let a = sample_matrix(size, size);
        let b = sample_matrix(size, size);
        group.bench_with_input(BenchmarkId::new("parallel", size), &size, |bench, _| {
            bench.iter(|| parallel.multiply(&a, &b).expect("multiply"))
        });
        group.bench_with_input(BenchmarkId::new("sequential", size), &size, |bench, _| {
            bench.iter(|| sequential.multiply(&a, &b).expect("multiply"))
        });
    }
    group.finish();
}

fn bench_multiply_vector(c: &mut Criterion) {
    let kernel = Kernel::default();
    let mut group = c.benchmark_group("multiply_vector");
    for &size in &[256usize, 1024] {
        let a = sample_matrix(size, size);
        let v = DenseVector::from((0..size).map(|i| i as f64).collect::<Vec<_>>());
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |bench, _| {
            bench.iter(|| kernel.multiply_vector(&a, &v).expect("multiply_vector"))
        });
    }
    group.finish();
}

fn bench_pointwise(c: &mut Criterion) {
    let kernel = Kernel::default();
    let mut group = c.benchmark_group("pointwise");
    for &size in &[256usize, 1024] {
        let a = sample_matrix(size, size);
        let b = sample_matrix(size, size);
        group.bench_with_input(BenchmarkId::new("multiply", size), &size, |bench, _| {
            bench.iter(|| kernel.pointwise_multiply(&a, &b).expect("pointwise_multiply"))
        });
        group.bench_with_input(BenchmarkId::new("add_assign", size), &size, |bench, _| {
            let mut target = a.clone();
            bench.iter(|| kernel.add_assign(&mut target, &b).expect("add_assign"))
        });
    }
    group.finish();
}

fn bench_kronecker(c: &mut Criterion) {
    let kernel = Kernel::default();
    let a = sample_matrix(16, 16);
    let b = sample_matrix(16, 16);
    c.bench_function("kronecker_16x16", |bench| {
        bench.iter(|| kernel.kronecker(&a, &b).expect("kronecker"))
    });
}

criterion_group!(
    benches,
    bench_multiply,
    bench_multiply_vector,
    bench_pointwise,
    bench_kronecker
);
criterion_main!(benches);
