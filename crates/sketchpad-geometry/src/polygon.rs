//! Closed outlines: regular polygons, stars and the bounding-box primitives
//! (rectangle, ellipse, triangle).

use std::f64::consts::{FRAC_PI_2, PI};

use crate::path::PathData;
use crate::point::{Bounds, Point};

/// Below this radius a polygon or star collapses to its center point
pub const MIN_RADIUS: f64 = 1.0;

/// Fewest sides a regular polygon is built with
pub const MIN_SIDES: u32 = 3;

/// Number of vertices in a star (5 points, 5 notches)
pub const STAR_VERTICES: usize = 10;

/// Cubic control-point factor approximating a quarter circle
const KAPPA: f64 = 0.552_284_749_8;

/// Vertices of a regular polygon, the first one straight above the center
pub fn regular_polygon_vertices(center: Point, sides: u32, radius: f64) -> Vec<Point> {
    let sides = sides.max(MIN_SIDES);
    let step = 2.0 * PI / f64::from(sides);
    (0..sides)
        .map(|i| Point::polar(center, radius, f64::from(i) * step - FRAC_PI_2))
        .collect()
}

/// Closed regular polygon; a single point when `radius < 1`
pub fn regular_polygon_path(center: Point, sides: u32, radius: f64) -> PathData {
    if !center.is_finite() {
        return PathData::new();
    }
    // Negated comparison so NaN radii collapse as well
    if !(radius >= MIN_RADIUS) {
        return PathData::point(center);
    }
    PathData::polyline(&regular_polygon_vertices(center, sides, radius), true)
}

/// Ten star vertices alternating outer/inner radius, 36° apart from -90°
pub fn star_vertices(center: Point, outer_radius: f64, inner_radius: f64) -> Vec<Point> {
    let step = PI / 5.0;
    (0..STAR_VERTICES)
        .map(|i| {
            let radius = if i % 2 == 0 { outer_radius } else { inner_radius };
            Point::polar(center, radius, i as f64 * step - FRAC_PI_2)
        })
        .collect()
}

/// Closed five-point star; a single point when `outer_radius < 1`
pub fn star_path(center: Point, outer_radius: f64, inner_radius: f64) -> PathData {
    if !center.is_finite() {
        return PathData::new();
    }
    if !(outer_radius >= MIN_RADIUS) {
        return PathData::point(center);
    }
    PathData::polyline(&star_vertices(center, outer_radius, inner_radius), true)
}

/// Isosceles triangle inscribed in `bounds`, apex at the top edge midpoint
pub fn triangle_vertices(bounds: &Bounds) -> [Point; 3] {
    [
        Point::new(bounds.center().x, bounds.min.y),
        bounds.max,
        Point::new(bounds.min.x, bounds.max.y),
    ]
}

pub fn triangle_path(bounds: &Bounds) -> PathData {
    PathData::polyline(&triangle_vertices(bounds), true)
}

/// Rectangle outline with optional rounded corners
pub fn rect_path(bounds: &Bounds, corner_radius: f64) -> PathData {
    let (min, max) = (bounds.min, bounds.max);
    let r = corner_radius
        .max(0.0)
        .min(bounds.width() / 2.0)
        .min(bounds.height() / 2.0);

    if !(r > 0.0) {
        return PathData::polyline(
            &[min, Point::new(max.x, min.y), max, Point::new(min.x, max.y)],
            true,
        );
    }

    let k = r * (1.0 - KAPPA);
    let mut path = PathData::new();
    path.move_to(Point::new(min.x + r, min.y))
        .line_to(Point::new(max.x - r, min.y))
        .cubic_to(
            Point::new(max.x - k, min.y),
            Point::new(max.x, min.y + k),
            Point::new(max.x, min.y + r),
        )
        .line_to(Point::new(max.x, max.y - r))
        .cubic_to(
            Point::new(max.x, max.y - k),
            Point::new(max.x - k, max.y),
            Point::new(max.x - r, max.y),
        )
        .line_to(Point::new(min.x + r, max.y))
        .cubic_to(
            Point::new(min.x + k, max.y),
            Point::new(min.x, max.y - k),
            Point::new(min.x, max.y - r),
        )
        .line_to(Point::new(min.x, min.y + r))
        .cubic_to(
            Point::new(min.x, min.y + k),
            Point::new(min.x + k, min.y),
            Point::new(min.x + r, min.y),
        )
        .close();
    path
}

/// Ellipse inscribed in `bounds`, four cubic quarter arcs
pub fn ellipse_path(bounds: &Bounds) -> PathData {
    let c = bounds.center();
    let rx = bounds.width() / 2.0;
    let ry = bounds.height() / 2.0;
    let (kx, ky) = (rx * KAPPA, ry * KAPPA);

    let mut path = PathData::new();
    path.move_to(Point::new(c.x + rx, c.y))
        .cubic_to(
            Point::new(c.x + rx, c.y + ky),
            Point::new(c.x + kx, c.y + ry),
            Point::new(c.x, c.y + ry),
        )
        .cubic_to(
            Point::new(c.x - kx, c.y + ry),
            Point::new(c.x - rx, c.y + ky),
            Point::new(c.x - rx, c.y),
        )
        .cubic_to(
            Point::new(c.x - rx, c.y - ky),
            Point::new(c.x - kx, c.y - ry),
            Point::new(c.x, c.y - ry),
        )
        .cubic_to(
            Point::new(c.x + kx, c.y - ry),
            Point::new(c.x + rx, c.y - ky),
            Point::new(c.x + rx, c.y),
        )
        .close();
    path
}
