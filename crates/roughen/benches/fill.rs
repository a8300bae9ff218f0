use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use roughen::fill::fill_polygons;
use roughen::{FillStyle, Options, Point, RandomSource};

fn star(points: usize) -> Vec<Point> {
    (0..points * 2)
        .map(|i| {
            let r = if i % 2 == 0 { 400.0 } else { 160.0 };
            let a = i as f64 * std::f64::consts::PI / points as f64;
            Point::new(500.0 + r * a.cos(), 500.0 + r * a.sin())
        })
        .collect()
}

fn fill_styles(c: &mut Criterion) {
    let polygons = vec![star(12)];
    let mut group = c.benchmark_group("fill");
    for style in [
        FillStyle::Hachure,
        FillStyle::CrossHatch,
        FillStyle::ZigZag,
        FillStyle::ZigZagLine,
        FillStyle::Dots,
        FillStyle::Dashed,
        FillStyle::Solid,
    ] {
        let o = Options::new().with_fill("black").with_fill_style(style).resolve().unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(style.name()), &o, |b, o| {
            b.iter(|| {
                let mut rng = RandomSource::new(1).unwrap();
                fill_polygons(black_box(&polygons), o, &mut rng)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, fill_styles);
criterion_main!(benches);
