use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tactile_foundation::{GestureCallbacks, GestureReferee, PinchRecognizer, TouchSample};
use tactile_geometry::Point;

const MOVES_PER_GESTURE: u64 = 120;
const FINGER_SAMPLES: &[usize] = &[2, 3, 5];

fn finger_start(index: usize) -> Point {
    Point::new(200.0 + 60.0 * index as f32, 400.0 + 15.0 * index as f32)
}

/// Runs one full pinch-out: all fingers down, a stream of batched moves
/// spreading them from their centroid, then every finger up.
fn pinch_out(fingers: usize) {
    let mut referee = GestureReferee::default();
    referee.attach(
        PinchRecognizer::new(fingers, 5.0)
            .with_callbacks(GestureCallbacks::new().on_action_update(|event| {
                black_box(event.scale);
            })),
    );

    for index in 0..fingers {
        referee.handle_touch(&TouchSample::down(index as i32, finger_start(index), 0));
    }

    let center = Point::new(
        (0..fingers).map(|i| finger_start(i).x).sum::<f32>() / fingers as f32,
        (0..fingers).map(|i| finger_start(i).y).sum::<f32>() / fingers as f32,
    );
    let mut frame = Vec::with_capacity(fingers);
    for step in 1..=MOVES_PER_GESTURE {
        let spread = 1.0 + step as f32 / 100.0;
        frame.clear();
        frame.extend((0..fingers).map(|index| {
            let start = finger_start(index);
            let position = Point::new(
                center.x + (start.x - center.x) * spread,
                center.y + (start.y - center.y) * spread,
            );
            TouchSample::moved(index as i32, position, step * 8)
        }));
        referee.handle_touch_batch(&frame);
    }

    let end = MOVES_PER_GESTURE * 8 + 8;
    for index in 0..fingers {
        referee.handle_touch(&TouchSample::up(index as i32, finger_start(index), end));
    }
    black_box(referee.is_settled());
}

fn bench_pinch(c: &mut Criterion) {
    let mut group = c.benchmark_group("pinch_gesture");
    for &fingers in FINGER_SAMPLES {
        group.bench_with_input(
            BenchmarkId::from_parameter(fingers),
            &fingers,
            |b, &fingers| b.iter(|| pinch_out(fingers)),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_pinch);
criterion_main!(benches);
