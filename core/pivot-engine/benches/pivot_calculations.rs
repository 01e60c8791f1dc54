use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use pivot_engine::{calculate_crosstab, render_summary, PivotDefinition, Record, SummaryLayout, SummaryStyles};
use serde_json::{json, Value};

fn generate_records(count: usize, providers: usize, statuses: usize) -> Vec<Record> {
    (0..count)
        .filter_map(|i| match json!({
            "provider": format!("provider_{}", (i * 7) % providers),
            "status": format!("status_{}", (i * 13 + i / 3) % statuses),
            "number": format!("09{:08}", i),
        }) {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .collect()
}

fn bench_crosstab(c: &mut Criterion) {
    let mut group = c.benchmark_group("pivot/crosstab");
    let definition = PivotDefinition::new("provider", "status");

    for count in [1_000usize, 10_000, 100_000].iter() {
        let records = generate_records(*count, 12, 6);
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, _| {
            b.iter(|| {
                let tab = calculate_crosstab(black_box(&records), &definition).unwrap();
                black_box(tab);
            });
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("pivot/render");
    let definition = PivotDefinition::new("provider", "status");
    let layout = SummaryLayout::default();
    let styles = SummaryStyles::standard();

    for providers in [10usize, 100, 1_000].iter() {
        let records = generate_records(50_000, *providers, 20);
        let tab = calculate_crosstab(&records, &definition).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(providers), providers, |b, _| {
            b.iter(|| black_box(render_summary(&tab, &layout, &styles)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_crosstab, bench_render);
criterion_main!(benches);
