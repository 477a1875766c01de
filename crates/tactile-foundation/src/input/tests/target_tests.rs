use super::{TargetGeometry, TargetRects, Unbounded};
use tactile_geometry::{Point, Rect};

#[test]
fn unbounded_hits_everything_and_keeps_coordinates() {
    let point = Point::new(-40.0, 9000.0);
    assert!(Unbounded.contains(1, point));
    assert_eq!(Unbounded.to_local(1, point), point);
}

#[test]
fn rects_map_into_local_space() {
    let mut targets = TargetRects::new();
    targets.insert(4, Rect::new(10.0, 20.0, 100.0, 50.0));

    assert!(targets.contains(4, Point::new(60.0, 40.0)));
    assert!(!targets.contains(4, Point::new(5.0, 40.0)));
    assert_eq!(targets.to_local(4, Point::new(60.0, 40.0)), Point::new(50.0, 20.0));
}

#[test]
fn unknown_node_is_never_hit() {
    let mut targets = TargetRects::new();
    targets.insert(4, Rect::new(0.0, 0.0, 10.0, 10.0));
    assert_eq!(targets.remove(4), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));

    assert!(!targets.contains(4, Point::new(5.0, 5.0)));
    assert_eq!(targets.to_local(4, Point::new(5.0, 5.0)), Point::new(5.0, 5.0));
    assert!(targets.bounds(4).is_none());
}
