//! Benchmark: lookup hot path and reload swap.
//!
//! Run with: `cargo bench -p lingo --bench resolve_bench`
//!
//! Measures single-threaded lookup latency (hit, miss, plural, with
//! substitution) and multi-threaded lookup throughput while a writer keeps
//! reloading the catalog.

use std::sync::{Arc, Barrier};
use std::thread;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use lingo::catalog::{Context, Document, Message, Translation};
use lingo::{CatalogIndex, CatalogStore, IndexConfig, Query};

/// A catalog shaped like a mid-sized application: 40 contexts × 50 messages.
fn sample_document() -> Document {
    let mut document = Document::new("ru");
    for c in 0..40 {
        let mut context = Context::new(format!("Context{c}"));
        for m in 0..50 {
            let message = if m % 10 == 0 {
                Message::new(format!("%n item(s) {m}")).with_translation(Translation::plural([
                    format!("%n элемент {m}"),
                    format!("%n элемента {m}"),
                    format!("%n элементов {m}"),
                ]))
            } else {
                Message::new(format!("Message {m} with %1"))
                    .with_translation(Translation::single(format!("Сообщение {m} с %1")))
            };
            context = context.with_message(message);
        }
        document = document.with_context(context);
    }
    document
}

// ===========================================================================
// Single-threaded lookup latency
// ===========================================================================

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    let index = CatalogIndex::build(&sample_document(), "ru");

    group.bench_function("translate/hit", |b| {
        b.iter(|| black_box(index.translate("Context17", "Message 23 with %1", "")));
    });
    group.bench_function("translate/miss", |b| {
        b.iter(|| black_box(index.translate("Context17", "Not in the catalog", "")));
    });
    group.bench_function("select/plural", |b| {
        let query = Query::new("Context17", "%n item(s) 20").count(5);
        b.iter(|| black_box(index.select(black_box(&query))));
    });
    group.bench_function("resolve/substitute", |b| {
        b.iter(|| black_box(index.resolve("Context17", "Message 23 with %1", "", None, &[&42])));
    });

    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let document = sample_document();
    c.bench_function("index/build_2000", |b| {
        b.iter(|| black_box(CatalogIndex::build(black_box(&document), "ru")));
    });
}

// ===========================================================================
// Multi-threaded: 8 readers + 1 reloading writer
// ===========================================================================

fn bench_reads_during_reload(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_8r1w");
    let num_readers = 8;
    let reads_per_thread = 10_000;
    let reloads = 10;
    let document = Arc::new(sample_document());

    group.bench_function("translate", |b| {
        b.iter(|| {
            let store = Arc::new(CatalogStore::from_document(&document, IndexConfig::new()));
            let barrier = Arc::new(Barrier::new(num_readers + 1));

            let writer = {
                let s = Arc::clone(&store);
                let d = Arc::clone(&document);
                let bar = Arc::clone(&barrier);
                thread::spawn(move || {
                    bar.wait();
                    for _ in 0..reloads {
                        s.reload(&d);
                        thread::yield_now();
                    }
                })
            };

            let readers: Vec<_> = (0..num_readers)
                .map(|_| {
                    let s = Arc::clone(&store);
                    let bar = Arc::clone(&barrier);
                    thread::spawn(move || {
                        bar.wait();
                        for _ in 0..reads_per_thread {
                            let snapshot = s.load();
                            black_box(snapshot.translate("Context3", "Message 7 with %1", ""));
                        }
                    })
                })
                .collect();

            writer.join().unwrap();
            for h in readers {
                h.join().unwrap();
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_lookup, bench_build, bench_reads_during_reload);
criterion_main!(benches);
