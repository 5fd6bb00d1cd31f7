//! Hand-drawn style outlines.
//!
//! Every edge is drawn twice as a slightly bowed cubic whose endpoints and
//! control points are jittered, which gives the overshooting "marker on
//! paper" look. All randomness comes from a seeded [`StdRng`], so the same
//! input and seed always give the same path.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::path::PathData;
use crate::point::{Bounds, Point};
use crate::polygon::triangle_vertices;

/// Perpendicular bow of each edge relative to its length
pub const BOWING: f64 = 1.0;

/// Largest random endpoint displacement at roughness 1
pub const MAX_RANDOMNESS_OFFSET: f64 = 2.0;

/// Default roughness used when sketch mode is switched on
pub const DEFAULT_ROUGHNESS: f64 = 1.0;

/// Points sampled around an ellipse per pass
const ELLIPSE_STEPS: usize = 18;

struct Jitter {
    rng: StdRng,
    roughness: f64,
}

impl Jitter {
    fn new(roughness: f64, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            roughness,
        }
    }

    /// Uniform offset in `[-amount, amount]` scaled by roughness and `gain`
    fn offset(&mut self, amount: f64, gain: f64) -> f64 {
        let r: f64 = self.rng.random();
        self.roughness * gain * (r * 2.0 * amount - amount)
    }

    fn unit(&mut self) -> f64 {
        self.rng.random()
    }
}

/// Long edges wobble less than short ones
fn roughness_gain(length: f64) -> f64 {
    if length < 200.0 {
        1.0
    } else if length > 500.0 {
        0.4
    } else {
        -0.001_666_8 * length + 1.233_334
    }
}

/// One bowed, jittered pass over `a -> b`
fn rough_segment(path: &mut PathData, jitter: &mut Jitter, a: Point, b: Point, overlay: bool) {
    let length = a.distance(b);
    let gain = roughness_gain(length);

    let mut offset = MAX_RANDOMNESS_OFFSET;
    if offset * offset * 100.0 > length * length {
        offset = length / 10.0;
    }
    let half = offset / 2.0;
    let spread = if overlay { half } else { offset };

    let diverge = 0.2 + jitter.unit() * 0.2;
    let bow_x = BOWING * MAX_RANDOMNESS_OFFSET * (b.y - a.y) / 200.0;
    let bow_y = BOWING * MAX_RANDOMNESS_OFFSET * (a.x - b.x) / 200.0;
    let bow = Point::new(jitter.offset(bow_x, gain), jitter.offset(bow_y, gain));

    let start = Point::new(
        a.x + jitter.offset(spread, gain),
        a.y + jitter.offset(spread, gain),
    );
    let ctrl1 = Point::new(
        bow.x + a.x + (b.x - a.x) * diverge + jitter.offset(spread, gain),
        bow.y + a.y + (b.y - a.y) * diverge + jitter.offset(spread, gain),
    );
    let ctrl2 = Point::new(
        bow.x + a.x + 2.0 * (b.x - a.x) * diverge + jitter.offset(spread, gain),
        bow.y + a.y + 2.0 * (b.y - a.y) * diverge + jitter.offset(spread, gain),
    );
    let end = Point::new(
        b.x + jitter.offset(spread, gain),
        b.y + jitter.offset(spread, gain),
    );
    path.move_to(start).cubic_to(ctrl1, ctrl2, end);
}

fn rough_edges(vertices: &[Point], closed: bool, roughness: f64, seed: u64) -> PathData {
    let mut path = PathData::new();
    if vertices.iter().any(|p| !p.is_finite()) || vertices.len() < 2 {
        return path;
    }
    let mut jitter = Jitter::new(roughness, seed);
    let count = if closed { vertices.len() } else { vertices.len() - 1 };
    for i in 0..count {
        let a = vertices[i];
        let b = vertices[(i + 1) % vertices.len()];
        rough_segment(&mut path, &mut jitter, a, b, false);
        rough_segment(&mut path, &mut jitter, a, b, true);
    }
    path
}

/// Hand-drawn straight line
pub fn sketchy_line(start: Point, end: Point, roughness: f64, seed: u64) -> PathData {
    rough_edges(&[start, end], false, roughness, seed)
}

/// Hand-drawn rectangle outline
pub fn sketchy_rect(bounds: &Bounds, roughness: f64, seed: u64) -> PathData {
    let (min, max) = (bounds.min, bounds.max);
    let corners = [min, Point::new(max.x, min.y), max, Point::new(min.x, max.y)];
    rough_edges(&corners, true, roughness, seed)
}

/// Hand-drawn triangle inscribed in `bounds`
pub fn sketchy_triangle(bounds: &Bounds, roughness: f64, seed: u64) -> PathData {
    rough_edges(&triangle_vertices(bounds), true, roughness, seed)
}

/// Hand-drawn ellipse inscribed in `bounds`: two wobbly closed curves
pub fn sketchy_ellipse(bounds: &Bounds, roughness: f64, seed: u64) -> PathData {
    let mut path = PathData::new();
    let c = bounds.center();
    if !c.is_finite() {
        return path;
    }
    let rx = bounds.width() / 2.0;
    let ry = bounds.height() / 2.0;
    let mut jitter = Jitter::new(roughness, seed);

    for pass in 0..2 {
        let start_angle = jitter.unit() * PI / 6.0;
        let step = 2.0 * PI / ELLIPSE_STEPS as f64;
        let wobble = if pass == 0 { 0.04 } else { 0.02 };

        let points: Vec<Point> = (0..ELLIPSE_STEPS)
            .map(|i| {
                let angle = start_angle + i as f64 * step;
                let kx = 1.0 + jitter.offset(wobble, 1.0);
                let ky = 1.0 + jitter.offset(wobble, 1.0);
                Point::new(c.x + rx * kx * angle.cos(), c.y + ry * ky * angle.sin())
            })
            .collect();
        closed_curve(&mut path, &points);
    }
    path
}

/// Closed Catmull-Rom spline through `points`, emitted as cubics
fn closed_curve(path: &mut PathData, points: &[Point]) {
    let n = points.len();
    if n < 3 {
        return;
    }
    path.move_to(points[0]);
    for i in 0..n {
        let p0 = points[(i + n - 1) % n];
        let p1 = points[i];
        let p2 = points[(i + 1) % n];
        let p3 = points[(i + 2) % n];
        let c1 = p1 + (p2 - p0) * (1.0 / 6.0);
        let c2 = p2 - (p3 - p1) * (1.0 / 6.0);
        path.cubic_to(c1, c2, p2);
    }
    path.close();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_same_seed() {
        let b = Bounds::from_corners(Point::ZERO, Point::new(100.0, 60.0));
        assert_eq!(sketchy_rect(&b, 1.0, 42), sketchy_rect(&b, 1.0, 42));
        assert_ne!(sketchy_rect(&b, 1.0, 42), sketchy_rect(&b, 1.0, 43));
    }

    #[test]
    fn rect_is_drawn_twice_per_edge() {
        let b = Bounds::from_corners(Point::ZERO, Point::new(100.0, 60.0));
        assert_eq!(sketchy_rect(&b, 1.0, 7).subpath_count(), 8);
        assert_eq!(sketchy_triangle(&b, 1.0, 7).subpath_count(), 6);
        assert_eq!(sketchy_line(Point::ZERO, Point::new(50.0, 0.0), 1.0, 7).subpath_count(), 2);
    }

    #[test]
    fn zero_roughness_is_crisp() {
        let path = sketchy_line(Point::ZERO, Point::new(50.0, 0.0), 0.0, 9);
        let v = path.vertices();
        assert_eq!(v[0], Point::ZERO);
        assert_eq!(v[1], Point::new(50.0, 0.0));
    }

    #[test]
    fn stays_near_the_crisp_outline() {
        let b = Bounds::from_corners(Point::new(10.0, 10.0), Point::new(110.0, 70.0));
        let pb = sketchy_ellipse(&b, 1.0, 3).bounds().unwrap();
        assert!(pb.min.x > 0.0 && pb.max.x < 120.0);
        assert!(pb.min.y > 0.0 && pb.max.y < 80.0);
    }

    #[test]
    fn nan_input_is_empty() {
        assert!(sketchy_line(Point::new(f64::NAN, 0.0), Point::ZERO, 1.0, 1).is_empty());
    }
}
