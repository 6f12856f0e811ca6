use criterion::{black_box, criterion_group, criterion_main, Criterion};
use folio_resolver::{Resolver, ResolverConfig};
use folio_storage::{MemoryCache, MemoryStore};
use serde_json::json;
use std::sync::Arc;

const SECTIONS: usize = 50;
const PAGES_PER_SECTION: usize = 40;

fn build_site() -> MemoryStore {
    let store = MemoryStore::default();
    for s in 0..SECTIONS {
        let section = format!("section-{s}");
        store
            .insert_page(&section, json!({"uuid": format!("s-{s}")}))
            .unwrap();
        for p in 0..PAGES_PER_SECTION {
            let path = format!("{section}/page-{p}");
            store
                .insert_page(&path, json!({"uuid": format!("p-{s}-{p}")}))
                .unwrap();
            store
                .insert_file(&path, "cover.jpg", json!({"uuid": format!("f-{s}-{p}")}))
                .unwrap();
        }
    }
    store
}

fn bench_resolve(c: &mut Criterion) {
    let store = Arc::new(build_site());
    let target = format!("page://p-{}-{}", SECTIONS - 1, PAGES_PER_SECTION - 1);

    let cached = Resolver::new(store.clone(), Arc::new(MemoryCache::new()));
    cached.reindex().unwrap();
    c.bench_function("resolve_page_cache_hit", |b| {
        b.iter(|| {
            let ctx = cached.context();
            black_box(cached.resolve(&ctx, black_box(&target)).unwrap())
        })
    });

    let uncached = Resolver::new(store.clone(), Arc::new(MemoryCache::new())).with_config(
        ResolverConfig {
            populate_cache_on_miss: false,
            ..ResolverConfig::default()
        },
    );
    c.bench_function("resolve_page_index_scan", |b| {
        b.iter(|| {
            let ctx = uncached.context();
            black_box(uncached.resolve(&ctx, black_box(&target)).unwrap())
        })
    });

    let file_target = format!("file://f-{}-{}", SECTIONS - 1, PAGES_PER_SECTION - 1);
    c.bench_function("resolve_file_index_scan", |b| {
        b.iter(|| {
            let ctx = uncached.context();
            black_box(uncached.resolve(&ctx, black_box(&file_target)).unwrap())
        })
    });

    c.bench_function("generate_short_id", |b| {
        b.iter(|| {
            let ctx = uncached.context();
            black_box(uncached.generate(&ctx).unwrap())
        })
    });
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
