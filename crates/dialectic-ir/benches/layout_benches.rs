use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dialectic_core::{Point2D, Size2D};
use dialectic_ir::{arrange, Arrangement, Direction, Effect, SceneScript, Text};

fn sizes(n: usize) -> Vec<Size2D> {
    (0..n)
        .map(|i| Size2D::new(1.0 + (i % 7) as f64 * 0.3, 0.25 + (i % 3) as f64 * 0.1))
        .collect()
}

/// Two labelled columns side by side, the shape of a detail scene.
fn build_columns(items: usize) -> dialectic_ir::Scene {
    let mut s = SceneScript::new("bench_columns");
    let mut columns = Vec::new();
    for side in 0..2 {
        let mut members = vec![s
            .define_shape(Text::new(format!("Column {}", side), 32.0))
            .unwrap()];
        for i in 0..items {
            members.push(s.define_shape(Text::new(format!("item {}", i), 24.0)).unwrap());
        }
        let column = s.group(&members).unwrap();
        s.arrange(column, Arrangement::column()).unwrap();
        columns.push(column);
    }
    let content = s.group(&columns).unwrap();
    s.arrange(content, Arrangement::row(2.0)).unwrap();
    s.shift(content, Point2D::DOWN * 0.5).unwrap();
    s.play(Effect::FadeIn { shift: Some(Point2D::UP) }, &[content])
        .unwrap();
    s.build()
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("dialectic_layout");

    let small = sizes(8);
    group.bench_function("arrange_8", |b| {
        let policy = Arrangement::new(Direction::Down).aligned(Direction::Left);
        b.iter(|| arrange(black_box(&small), black_box(&policy)))
    });

    let large = sizes(1_000);
    group.bench_function("arrange_1000", |b| {
        let policy = Arrangement::row(0.5);
        b.iter(|| arrange(black_box(&large), black_box(&policy)))
    });

    group.bench_function("script_two_columns_50", |b| {
        b.iter(|| build_columns(black_box(50)))
    });

    group.finish();
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
