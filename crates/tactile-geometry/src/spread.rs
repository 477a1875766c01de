//! Multi-finger spread measures.
//!
//! Pinch detection needs a scalar that grows as fingers move apart. Instead of
//! summing pairwise distances, the average deviation from the centroid is used:
//! it is monotonic with the physical pinch distance and linear in the number
//! of fingers.

use crate::Point;

/// Arithmetic mean of `points`, or `None` when the iterator is empty.
pub fn centroid<I>(points: I) -> Option<Point>
where
    I: IntoIterator<Item = Point>,
{
    let mut sum_x = 0.0f64;
    let mut sum_y = 0.0f64;
    let mut count = 0usize;
    for point in points {
        sum_x += point.x as f64;
        sum_y += point.y as f64;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    Some(Point::new(
        (sum_x / count as f64) as f32,
        (sum_y / count as f64) as f32,
    ))
}

/// Average deviation of `points` around their centroid.
///
/// Computes the mean absolute deviation on each axis and combines the two as
/// `sqrt(dev_x² + dev_y²)`. Returns `0.0` for an empty set.
pub fn average_deviation<I>(points: I) -> f32
where
    I: IntoIterator<Item = Point>,
    I::IntoIter: Clone,
{
    let points = points.into_iter();
    let Some(center) = centroid(points.clone()) else {
        return 0.0;
    };

    let mut diff_x = 0.0f64;
    let mut diff_y = 0.0f64;
    let mut count = 0usize;
    for point in points {
        diff_x += (point.x - center.x).abs() as f64;
        diff_y += (point.y - center.y).abs() as f64;
        count += 1;
    }
    let dev_x = diff_x / count as f64;
    let dev_y = diff_y / count as f64;
    (dev_x * dev_x + dev_y * dev_y).sqrt() as f32
}

#[cfg(test)]
#[path = "tests/spread_tests.rs"]
mod tests;
