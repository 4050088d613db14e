//! Benchmarks for the structural comparator and the text codec.
//!
//! The comparator runs once per located node on every reconciliation, so
//! these cover the shapes it meets most: a primitive with attribute groups and
//! operations, a mirrored colocation, and an order constraint over many sets.

use cib_reconcile::cib::{xml, Node};
use cib_reconcile::equivalence::{ChildMatching, Comparator};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// A primitive with `pairs` instance attributes and `ops` operations.
fn primitive(pairs: usize, ops: usize) -> String {
    let mut text =
        String::from(r#"<primitive id="db" class="ocf" provider="heartbeat" type="pgsql">"#);
    text.push_str(r#"<instance_attributes id="db-instance_attributes">"#);
    for i in 0..pairs {
        text.push_str(&format!(
            r#"<nvpair id="db-instance_attributes-p{i}" name="p{i}" value="v{i}"/>"#
        ));
    }
    text.push_str("</instance_attributes><operations>");
    for i in 0..ops {
        text.push_str(&format!(
            r#"<op id="db-monitor-interval-{i}s" name="monitor" interval="{i}s"/>"#
        ));
    }
    text.push_str("</operations></primitive>");
    text
}

/// An order constraint over `sets` sets of `members` resources each.
fn order_set(sets: usize, members: usize) -> String {
    let mut text = String::from(r#"<rsc_order id="big" kind="Mandatory">"#);
    for s in 0..sets {
        text.push_str(&format!(r#"<resource_set id="rsc_set_{s}">"#));
        for m in 0..members {
            text.push_str(&format!(r#"<resource_ref id="r{s}_{m}"/>"#));
        }
        text.push_str("</resource_set>");
    }
    text.push_str("</rsc_order>");
    text
}

fn parse(text: &str) -> Node {
    xml::parse(text).unwrap()
}

fn bench_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare");
    let comparator = Comparator::default();

    let current = parse(&primitive(50, 10));
    let desired = current.clone();
    group.bench_function("primitive_equivalent", |b| {
        b.iter(|| comparator.compare(black_box(&current), black_box(&desired)))
    });

    let changed = parse(&primitive(50, 10).replace(r#"value="v49""#, r#"value="changed""#));
    group.bench_function("primitive_last_pair_differs", |b| {
        b.iter(|| comparator.compare(black_box(&current), black_box(&changed)))
    });

    let forward = parse(
        r#"<rsc_colocation id="c1" rsc="a" rsc-role="Master" with-rsc="b" score="INFINITY"/>"#,
    );
    let mirrored = parse(
        r#"<rsc_colocation id="c2" rsc="b" with-rsc="a" with-rsc-role="Master" score="INFINITY"/>"#,
    );
    group.bench_function("colocation_mirror", |b| {
        b.iter(|| comparator.compare(black_box(&forward), black_box(&mirrored)))
    });

    let sets = parse(&order_set(20, 20));
    let sets_copy = sets.clone();
    group.bench_function("order_set_20x20", |b| {
        b.iter(|| comparator.compare(black_box(&sets), black_box(&sets_copy)))
    });

    group.finish();
}

fn bench_matching_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("child_matching");
    let mut text = String::from(r#"<primitive id="p"><operations id="ops">"#);
    for i in 0..100 {
        text.push_str(&format!(r#"<op name="monitor" interval="{i}s"/>"#));
    }
    text.push_str("</operations></primitive>");
    let node = parse(&text);

    for matching in [ChildMatching::OneToOne, ChildMatching::Existential] {
        let comparator = Comparator::new(matching);
        group.bench_function(format!("{:?}", matching), |b| {
            b.iter(|| comparator.compare(black_box(&node), black_box(&node)))
        });
    }

    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let text = primitive(100, 20);
    let node = parse(&text);

    group.bench_function("parse", |b| b.iter(|| xml::parse(black_box(&text))));
    group.bench_function("serialize", |b| b.iter(|| xml::serialize(black_box(&node))));

    group.finish();
}

criterion_group!(benches, bench_compare, bench_matching_modes, bench_codec);
criterion_main!(benches);
