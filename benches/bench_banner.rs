use criterion::{Criterion, criterion_group, criterion_main};
use termcolor::Ansi;

fn bench_render_banner(c: &mut Criterion) {
    c.bench_function("render_banner", |b| {
        b.iter(ghost_lib::banner::render_banner)
    });
}

fn bench_write_banner_ansi(c: &mut Criterion) {
    c.bench_function("write_banner_ansi", |b| {
        b.iter(|| {
            let mut buf = Ansi::new(Vec::with_capacity(1024));
            let _ = ghost_lib::banner::write_banner(&mut buf);
        })
    });
}

fn bench_demo_run(c: &mut Criterion) {
    let opts = ghost_lib::report::DemoOptions {
        batches: 500,
        seed: Some(1),
        ..Default::default()
    };
    c.bench_function("demo_500_batches", |b| {
        b.iter(|| {
            let _ = ghost_lib::report::run_demo(&opts);
        })
    });
}

criterion_group!(benches, bench_render_banner, bench_write_banner_ansi, bench_demo_run);
criterion_main!(benches);
