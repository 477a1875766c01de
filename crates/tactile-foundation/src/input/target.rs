//! Geometry of the elements recognizers are attached to.
//!
//! A recognizer only keeps the [`NodeId`] of its element. Whenever it needs to
//! know whether a finger landed inside the element, or where a point falls in
//! the element's local space, it asks the host through [`TargetGeometry`].

use tactile_core::collections::map::HashMap;
use tactile_core::NodeId;
use tactile_geometry::{Point, Rect};

pub trait TargetGeometry {
    /// Whether `point` (in dispatch-root coordinates) lies inside `node`.
    fn contains(&self, node: NodeId, point: Point) -> bool;

    /// Maps `point` into `node`'s local coordinate space.
    fn to_local(&self, node: NodeId, point: Point) -> Point;
}

/// Host without element geometry: every point hits, coordinates are untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unbounded;

impl TargetGeometry for Unbounded {
    fn contains(&self, _node: NodeId, _point: Point) -> bool {
        true
    }

    fn to_local(&self, _node: NodeId, point: Point) -> Point {
        point
    }
}

/// Axis-aligned bounds per node, enough for hosts without transforms.
///
/// A node with no registered bounds is treated as detached: nothing hits it.
#[derive(Clone, Debug, Default)]
pub struct TargetRects {
    bounds: HashMap<NodeId, Rect>,
}

impl TargetRects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: NodeId, rect: Rect) {
        self.bounds.insert(node, rect);
    }

    pub fn remove(&mut self, node: NodeId) -> Option<Rect> {
        self.bounds.remove(&node)
    }

    pub fn bounds(&self, node: NodeId) -> Option<Rect> {
        self.bounds.get(&node).copied()
    }
}

impl TargetGeometry for TargetRects {
    fn contains(&self, node: NodeId, point: Point) -> bool {
        self.bounds
            .get(&node)
            .is_some_and(|rect| rect.contains_point(point))
    }

    fn to_local(&self, node: NodeId, point: Point) -> Point {
        match self.bounds.get(&node) {
            Some(rect) => rect.to_local(point),
            None => point,
        }
    }
}

#[cfg(test)]
#[path = "tests/target_tests.rs"]
mod tests;
