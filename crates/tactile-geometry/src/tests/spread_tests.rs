use super::{average_deviation, centroid};
use crate::Point;

#[test]
fn centroid_of_empty_set_is_none() {
    assert_eq!(centroid(std::iter::empty::<Point>()), None);
}

#[test]
fn centroid_is_mean_position() {
    let points = [Point::new(100.0, 100.0), Point::new(200.0, 300.0)];
    assert_eq!(centroid(points), Some(Point::new(150.0, 200.0)));
}

#[test]
fn horizontal_pair_deviation_is_half_the_gap() {
    let points = [Point::new(100.0, 100.0), Point::new(200.0, 100.0)];
    assert!((average_deviation(points) - 50.0).abs() < 1e-4);

    let spread = [Point::new(80.0, 100.0), Point::new(220.0, 100.0)];
    assert!((average_deviation(spread) - 70.0).abs() < 1e-4);
}

#[test]
fn deviation_combines_both_axes() {
    // dev_x = 3, dev_y = 4
    let points = [Point::new(-3.0, -4.0), Point::new(3.0, 4.0)];
    assert!((average_deviation(points) - 5.0).abs() < 1e-4);
}

#[test]
fn single_point_has_no_spread() {
    assert_eq!(average_deviation([Point::new(12.0, 7.0)]), 0.0);
    assert_eq!(average_deviation(Vec::<Point>::new()), 0.0);
}
