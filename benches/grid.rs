use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use arrsweeper::{sweep, Arrangement, LinearGeometry, LinearObject, Sweeper};
use kurbo::Point;

// `n` horizontal and `n` vertical segments, crossing in `n * n` points.
fn axis_grid(n: usize) -> Vec<LinearObject> {
    let len = n as f64;
    let mut ret = Vec::with_capacity(2 * n);
    for i in 0..n {
        let t = i as f64 + 0.5;
        ret.push(LinearObject::Segment(Point::new(0.0, t), Point::new(len, t)));
        ret.push(LinearObject::Segment(Point::new(t, 0.0), Point::new(t, len)));
    }
    ret
}

// `n` segments of slope 1 and `n` of slope -1, crossing on half-integer
// coordinates.
fn diagonal_grid(n: usize) -> Vec<LinearObject> {
    let len = n as f64;
    let mut ret = Vec::with_capacity(2 * n);
    for i in 0..n {
        let t = i as f64;
        ret.push(LinearObject::Segment(
            Point::new(0.0, t),
            Point::new(len, t + len),
        ));
        ret.push(LinearObject::Segment(
            Point::new(0.0, t + len),
            Point::new(len, t),
        ));
    }
    ret
}

fn grids(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid");
    for n in [8, 32, 128] {
        let axis = axis_grid(n);
        group.bench_with_input(BenchmarkId::new("axis", n), &axis, |b, input| {
            b.iter(|| {
                let mut arr = Arrangement::new();
                sweep(&LinearGeometry, black_box(input.clone()), &mut arr).unwrap();
                arr
            })
        });

        let diagonal = diagonal_grid(n);
        group.bench_with_input(BenchmarkId::new("diagonal", n), &diagonal, |b, input| {
            b.iter(|| {
                let mut arr = Arrangement::new();
                sweep(&LinearGeometry, black_box(input.clone()), &mut arr).unwrap();
                arr
            })
        });
    }
    group.finish();
}

fn just_the_setup(c: &mut Criterion) {
    let input = axis_grid(128);
    c.bench_function("grid: insert curves", |b| {
        b.iter(|| {
            let mut sweeper = Sweeper::new(&LinearGeometry);
            sweeper.insert_curves(black_box(input.clone())).unwrap();
            sweeper.queue().len()
        })
    });
}

criterion_group!(benches, grids, just_the_setup);
criterion_main!(benches);
