use criterion::{black_box, criterion_group, criterion_main, Criterion};
use php_array_json::{convert, parse, ConvertOptions};

// A "medium" PHP config file
const MEDIUM_PHP: &str = include_str!("../tests/fixtures/config.php");

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("PHP Array Parsing");

    group.bench_function("parse", |b| {
        b.iter(|| parse(black_box(MEDIUM_PHP)).unwrap())
    });

    // A wide literal, to see tokenizer throughput.
    let wide = format!(
        "[{}]",
        (0..1_000)
            .map(|i| format!("'key_{i}' => ['id' => {i}, 'ok' => true]"))
            .collect::<Vec<_>>()
            .join(", ")
    );
    group.bench_function("parse wide literal", |b| {
        b.iter(|| parse(black_box(&wide)).unwrap())
    });

    group.finish();
}

fn bench_converting(c: &mut Criterion) {
    let mut group = c.benchmark_group("PHP Array to JSON");

    group.bench_function("convert (pretty)", |b| {
        b.iter(|| convert(black_box(MEDIUM_PHP)).unwrap())
    });

    let compact = ConvertOptions::default().pretty(false);
    group.bench_function("convert (compact)", |b| {
        b.iter(|| php_array_json::convert_with(black_box(MEDIUM_PHP), &compact).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_converting);
criterion_main!(benches);
