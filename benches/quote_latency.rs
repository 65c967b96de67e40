use criterion::{black_box, criterion_group, criterion_main, Criterion};

use transquote::domain::QuoteRequest;
use transquote::pricing::{parse_json, PricingRules};
use transquote::quote::{calculate_quote, validate_surcharges};

const RULES: &str = include_str!("../pricing.json");

fn rules() -> PricingRules {
    parse_json(RULES).expect("canonical pricing rules must parse")
}

fn bench_calculate_quote(c: &mut Criterion) {
    let rules = rules();

    let plain = QuoteRequest::new("en-ko", "general", 1000);
    c.bench_function("calculate_quote_no_surcharges", |b| {
        b.iter(|| calculate_quote(black_box(&plain), black_box(&rules)))
    });

    let loaded = QuoteRequest::new("ko-en", "legal", 8)
        .with_unit("pages")
        .with_surcharges(["urgent", "dtp", "night"]);
    c.bench_function("calculate_quote_three_surcharges", |b| {
        b.iter(|| calculate_quote(black_box(&loaded), black_box(&rules)))
    });

    let rejected = QuoteRequest::new("ko-en", "general", 1000).with_surcharges(["urgent", "semi_urgent"]);
    c.bench_function("calculate_quote_rejected_conflict", |b| {
        b.iter(|| calculate_quote(black_box(&rejected), black_box(&rules)))
    });
}

fn bench_validate_surcharges(c: &mut Criterion) {
    let rules = rules();
    let selected: Vec<String> = ["semi_urgent", "dtp", "night"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    c.bench_function("validate_surcharges", |b| {
        b.iter(|| validate_surcharges(black_box(&selected), black_box(&rules)).is_ok())
    });
}

fn bench_load_rules(c: &mut Criterion) {
    c.bench_function("parse_json_rules", |b| b.iter(|| parse_json(black_box(RULES))));
}

criterion_group!(
    benches,
    bench_calculate_quote,
    bench_validate_surcharges,
    bench_load_rules
);
criterion_main!(benches);
