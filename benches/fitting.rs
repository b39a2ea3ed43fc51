use criterion::{criterion_group, criterion_main, Criterion};
use sigfit::{
    config::ApproxConfig,
    domain::{Domain, SampleSet},
    export::{Exporter, GoExporter},
    model::{FitMethod, PolynomialModel},
    report,
    target::Logistic,
    MonomialFit,
};
use std::hint::black_box;

fn credit_samples(n: usize) -> SampleSet {
    let domain = Domain::new(-3.0, -1.0).expect("valid domain");
    SampleSet::new(domain, n, &Logistic).expect("finite samples")
}

fn criterion_benchmark(c: &mut Criterion) {
    //
    // How the least-squares solve scales with the number of samples
    println!("Benchmarking fit vs n (Degree=3)...");
    test_linear_criterion_group(
        c,
        "fit_vs_n",
        &[
            CriterionTestEntry::new("n=100", 1e2, credit_samples(100)),
            CriterionTestEntry::new("n=1_000", 1e3, credit_samples(1_000)),
            CriterionTestEntry::new("n=10_000", 1e4, credit_samples(10_000)),
            CriterionTestEntry::new("n=100_000", 1e5, credit_samples(100_000)),
        ],
        |b, samples| b.iter(|| PolynomialModel::fit(black_box(samples), 3)),
    );

    //
    // Same grid, increasing degree
    println!("Benchmarking fit vs degree (n=1000)...");
    let samples = credit_samples(1_000);
    let mut group = c.benchmark_group("fit_vs_degree");
    for degree in [1, 3, 5, 7, 9] {
        group.bench_function(format!("Degree={degree}"), |b| {
            b.iter(|| PolynomialModel::fit(black_box(&samples), degree));
        });
    }
    group.finish();

    //
    // Least squares against Chebyshev-node interpolation
    println!("Benchmarking fit vs method (Degree=5, n=1000)...");
    let mut group = c.benchmark_group("fit_vs_method");
    for method in [FitMethod::LeastSquares, FitMethod::ChebyshevInterpolation] {
        group.bench_function(method.to_string(), |b| {
            b.iter(|| PolynomialModel::fit_with(method, &Logistic, black_box(&samples), 5));
        });
    }
    group.finish();

    //
    // A whole batch: sample, fit, analyze and export degrees 3, 5 and 7
    println!("Benchmarking full credit-scoring batch...");
    let config = ApproxConfig::credit_scoring();
    let exporters: Vec<Box<dyn Exporter>> = vec![Box::new(GoExporter)];
    c.bench_function("batch", |b| {
        b.iter(|| report::run(black_box(&config), &Logistic, &exporters));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

fn get_data_for_run<V>(group_id: &str, tests: &[CriterionTestEntry<V>]) -> Option<Vec<(f64, f64)>> {
    // Each test corresponds to a different x value in the series
    tests
        .iter()
        .map(|test| {
            let y = get_sample_for_run(group_id, &test.id)?;
            Some((test.x, y))
        })
        .collect()
}

fn get_sample_for_run(group_id: &str, test_id: &str) -> Option<f64> {
    #[derive(serde::Deserialize)]
    struct CriterionSamples {
        iters: Vec<f64>,
        times: Vec<f64>,
    }

    // Missing when criterion runs in test mode
    let raw = std::fs::read_to_string(format!(
        "target/criterion/{group_id}/{test_id}/new/sample.json"
    ))
    .ok()?;
    let samples: CriterionSamples = serde_json::from_str(&raw).ok()?;

    let mean = samples
        .iters
        .iter()
        .zip(samples.times.iter())
        .map(|(i, t)| t / i)
        .sum::<f64>()
        / (samples.iters.len() as f64);
    Some(mean)
}

struct CriterionTestEntry<V> {
    id: String,
    x: f64,
    values: V,
}
impl<V> CriterionTestEntry<V> {
    pub fn new(id: &str, x: f64, values: V) -> Self {
        Self {
            id: id.to_string(),
            x,
            values,
        }
    }
}

fn test_linear_criterion_group<F, V>(
    c: &mut Criterion,
    id: &str,
    samples: &[CriterionTestEntry<V>],
    runner: F,
) where
    for<'a, 'b, 'c> F: Fn(&'a mut criterion::Bencher<'b>, &'c V),
{
    let mut group = c.benchmark_group(id);
    for sample in samples {
        group.bench_with_input(&sample.id, &sample.values, &runner);
    }
    group.finish();

    // The solve should be linear in n; report how straight the line is
    let Some(data) = get_data_for_run(id, samples) else {
        return;
    };
    if let Ok(linear_fit) = MonomialFit::new(&data, 1) {
        println!("{id}: time ~ {} (r² = {:.4})", linear_fit.equation(), linear_fit.r_squared());
    }
}
