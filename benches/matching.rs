use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use slirc_bot::handlers::{BoxedHandler, CommandRegistry, Request, ResponseWriter};
use slirc_pattern::{match_tokens, tokenize};
use std::sync::Arc;

// Pattern work happens once per registered command per message, so these
// numbers bound the cost of a lookup in a large registry.

fn tokenize_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");
    group.throughput(Throughput::Elements(1));

    group.bench_function("four_words", |b| {
        b.iter(|| tokenize(black_box("deploy <env> to <region>")))
    });

    group.finish();
}

fn match_benchmark(c: &mut Criterion) {
    let tokens = tokenize("deploy <env> to <region>");
    let mut group = c.benchmark_group("match");
    group.throughput(Throughput::Elements(1));

    group.bench_function("hit", |b| {
        b.iter(|| match_tokens(&tokens, black_box("deploy prod to eu-west")))
    });
    group.bench_function("arity_miss", |b| {
        b.iter(|| match_tokens(&tokens, black_box("deploy prod")))
    });
    group.bench_function("literal_miss", |b| {
        b.iter(|| match_tokens(&tokens, black_box("deploy prod in eu-west")))
    });

    group.finish();
}

fn registry_benchmark(c: &mut Criterion) {
    let noop: BoxedHandler = Arc::new(|_req: Request, _res: ResponseWriter| async {});
    let mut registry = CommandRegistry::new();
    for i in 0..100 {
        registry.register(&format!("command{i} <arg>"), "Generated", Arc::clone(&noop));
    }
    registry.prepend_help(None);

    let mut group = c.benchmark_group("registry");
    group.bench_function("last_of_100", |b| {
        b.iter(|| registry.find_match(black_box("command99 value"), None).is_some())
    });
    group.bench_function("miss_with_pretext", |b| {
        b.iter(|| {
            registry
                .find_match(black_box("unknown words here"), Some("also unknown"))
                .is_none()
        })
    });
    group.finish();
}

criterion_group!(benches, tokenize_benchmark, match_benchmark, registry_benchmark);
criterion_main!(benches);
