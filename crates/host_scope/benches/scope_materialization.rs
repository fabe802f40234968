use criterion::{Criterion, criterion_group, criterion_main};
use host_scope::{BrowserFamily, BrowserIdentity, GlobalScope, HostScopeEngine, default_registry};
use std::hint::black_box;

/// Whole global scope for every current browser, sequential engine queries vs the parallel walk.
fn bench_global_scope(criterion: &mut Criterion) {
    let Ok(registry) = default_registry() else {
        return;
    };

    criterion.bench_function("global_scope_all_browsers", |bencher| {
        bencher.iter(|| {
            for identity in BrowserIdentity::all_current() {
                black_box(GlobalScope::resolve(registry, identity).len());
            }
        });
    });

    let names = registry.class_names();
    let chrome = BrowserIdentity::current(BrowserFamily::Chrome);
    criterion.bench_function("constants_every_class_uncached", |bencher| {
        let engine = HostScopeEngine::new(registry);
        bencher.iter(|| {
            for name in &names {
                black_box(engine.constants(chrome, name).map(|constants| constants.len()).ok());
            }
        });
    });
    criterion.bench_function("constants_every_class_cached", |bencher| {
        let engine = HostScopeEngine::new(registry).with_cache();
        bencher.iter(|| {
            for name in &names {
                black_box(engine.constants(chrome, name).map(|constants| constants.len()).ok());
            }
        });
    });
}

criterion_group!(scope_benches, bench_global_scope);
criterion_main!(scope_benches);
