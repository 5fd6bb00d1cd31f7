//! Pure geometry for sketchpad.
//!
//! Everything here is stateless and referentially transparent: the same
//! input always yields the same [`PathData`]. Degenerate or non-finite input
//! produces empty or single-point paths instead of panicking.

pub mod arrow;
pub mod freehand;
pub mod path;
pub mod point;
pub mod polygon;
pub mod sketchy;
pub mod viewport;

pub use arrow::arrow_path;
pub use freehand::{StrokeOptions, StrokeSample, brush_path, freehand_stroke};
pub use path::{PathCommand, PathData};
pub use point::{Bounds, Point};
pub use polygon::{ellipse_path, rect_path, regular_polygon_path, star_path, triangle_path};
pub use sketchy::{sketchy_ellipse, sketchy_line, sketchy_rect, sketchy_triangle};
pub use viewport::{Viewport, ZoomLimits};
