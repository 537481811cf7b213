//! Benchmarks for layout resolution.
//!
//! Measures plain, many-section and dual module resolution, and catalog
//! generation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_cabinet_core::{
    Catalog, CatalogRequest, LayoutEngine, ModuleArchetype, ModuleSpec, SectionHeight,
    SectionSpec,
};

fn bench_resolve_sections(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_sections");
    let engine = LayoutEngine::default();

    for &n in &[2, 5, 10] {
        let spec = ModuleSpec::new(600.0, 2400.0, 600.0).with_sections(
            (0..n)
                .map(|i| {
                    let height = SectionHeight::Percentage(100.0 / n as f64);
                    match i % 3 {
                        0 => SectionSpec::drawer(height, 2),
                        1 => SectionSpec::shelf(height).with_shelf_count(2),
                        _ => SectionSpec::hanging(height),
                    }
                })
                .collect(),
        );

        group.bench_with_input(BenchmarkId::new("mixed", n), &spec, |b, spec| {
            b.iter(|| {
                let layout = engine.resolve(black_box(spec));
                black_box(layout)
            })
        });
    }
    group.finish();
}

fn bench_resolve_archetypes(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_archetypes");
    let engine = LayoutEngine::default();

    for archetype in [
        ModuleArchetype::FourDrawerWardrobe,
        ModuleArchetype::DualDrawerStyler,
        ModuleArchetype::DualDrawerPantsHanger,
    ] {
        let width = if archetype.is_dual() { 1200.0 } else { 600.0 };
        let spec = archetype.spec(width, 2400.0);
        group.bench_with_input(BenchmarkId::new("archetype", archetype.prefix()), &spec, |b, spec| {
            b.iter(|| black_box(engine.resolve(black_box(spec))))
        });
    }
    group.finish();
}

fn bench_catalog(c: &mut Criterion) {
    let request = CatalogRequest::new(600.0, 3, 2400.0);
    c.bench_function("catalog_generate", |b| {
        b.iter(|| Catalog::generate(black_box(&request)))
    });
}

criterion_group!(benches, bench_resolve_sections, bench_resolve_archetypes, bench_catalog);
criterion_main!(benches);
