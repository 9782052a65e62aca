mod common;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use whileparse::parser::{self, ParseOptions};

fn bench_frontend(c: &mut Criterion) {
    for (label, source) in common::workloads() {
        let tokens = common::tokens_for(&source);

        c.bench_function(&format!("frontend_parse_{label}"), |b| {
            b.iter(|| {
                let out = parser::parse_tokens(black_box(tokens.clone()), ParseOptions::default());
                black_box(out);
            })
        });
    }
}

criterion_group!(benches, bench_frontend);
criterion_main!(benches);
