extern crate criterion;

use criterion::{criterion_group, criterion_main, Criterion};

use stylepad_lib::classify::classify;
use stylepad_lib::parser::html::create_dom_tree;
use stylepad_lib::store::{MatchMode, RuleSet};

fn bench_large_document(c: &mut Criterion) {
    let mut big_html = String::with_capacity(10_000_000);
    big_html.push_str("<div class=\"logo-slider\">");
    for i in 0..100_000 {
        big_html.push_str(&format!("<p class=\"item-{}\">Test</p>", i % 7));
    }
    big_html.push_str("</div>");

    c.bench_function("large_document", |b| {
        b.iter(|| {
            let document = create_dom_tree(&big_html);
            document
                .elements()
                .iter()
                .filter_map(|node| node.borrow().as_element().map(classify))
                .count()
        })
    });
}

fn bench_deep_nesting(c: &mut Criterion) {
    let mut deep_html = String::new();
    for _ in 0..1000 {
        deep_html.push_str("<div>");
    }
    deep_html.push_str("Content");
    for _ in 0..1000 {
        deep_html.push_str("</div>");
    }

    c.bench_function("deep_nesting", |b| b.iter(|| create_dom_tree(&deep_html)));
}

fn bench_stylesheet_upserts(c: &mut Criterion) {
    let mut rules = RuleSet::new();
    for i in 0..500 {
        rules.upsert_declaration(&format!(".rule-{}", i), "color", "#123456", MatchMode::Exact);
    }
    let css = rules.serialize();

    c.bench_function("stylesheet_upsert", |b| {
        b.iter(|| {
            let mut rules = RuleSet::parse(&css);
            rules.upsert_declaration(".rule-250", "font-size", "24px", MatchMode::Exact);
            rules.serialize()
        })
    });
}

criterion_group!(
    benches,
    bench_large_document,
    bench_deep_nesting,
    bench_stylesheet_upserts
);
criterion_main!(benches);
