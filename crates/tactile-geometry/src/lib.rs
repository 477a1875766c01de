//! Pure math/data for touch geometry in Tactile
//!
//! This crate contains the geometry primitives shared by the input model and
//! the recognizers: points, rectangles and the spread/centroid helpers used by
//! multi-finger gestures.

mod geometry;
mod spread;

pub use geometry::*;
pub use spread::*;

pub mod prelude {
    pub use crate::geometry::{Point, Rect, Size};
    pub use crate::spread::{average_deviation, centroid};
}
