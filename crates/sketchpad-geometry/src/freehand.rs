//! Variable-width freehand stroke outlines.
//!
//! A stroke is rebuilt from the whole sample list on every call: samples are
//! streamlined towards the previous point, each surviving point gets a radius
//! from its (real or simulated) pressure, and the left and right offsets are
//! joined with round caps into one closed outline.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::path::PathData;
use crate::point::Point;

/// How quickly simulated pressure follows pointer speed
const RATE_OF_PRESSURE_CHANGE: f64 = 0.275;

/// Segments used for round caps and single-point dots
const CAP_STEPS: usize = 8;

/// Pressure assumed for samples that carry none
pub const DEFAULT_PRESSURE: f64 = 0.5;

/// One pointer sample in document space. Pressure is kept within (0, 1];
/// a missing, zero or non-finite reading becomes [`DEFAULT_PRESSURE`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeSample {
    pub x: f64,
    pub y: f64,
    pub pressure: f64,
}

impl StrokeSample {
    pub fn new(x: f64, y: f64, pressure: f64) -> Self {
        Self { x, y, pressure: clean_pressure(pressure) }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy, pressure: self.pressure }
    }

    fn effective_pressure(&self) -> f64 {
        clean_pressure(self.pressure)
    }
}

fn clean_pressure(pressure: f64) -> f64 {
    if pressure.is_finite() && pressure > 0.0 {
        pressure.min(1.0)
    } else {
        DEFAULT_PRESSURE
    }
}

/// Shape parameters for a stroke outline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeOptions {
    /// Nominal diameter at half pressure
    pub size: f64,
    /// How strongly pressure changes the width, 0 = constant width
    pub thinning: f64,
    /// Minimum spacing of outline points as a fraction of `size`
    pub smoothing: f64,
    /// How far each point is pulled towards its predecessor, 0..1
    pub streamline: f64,
    /// Derive pressure from pointer speed instead of sample pressure
    pub simulate_pressure: bool,
}

impl Default for StrokeOptions {
    fn default() -> Self {
        Self {
            size: 8.0,
            thinning: 0.5,
            smoothing: 0.5,
            streamline: 0.5,
            simulate_pressure: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct StrokePoint {
    point: Point,
    pressure: f64,
    /// Unit vector pointing back towards the previous point
    vector: Point,
    distance: f64,
}

/// Radius of the stroke at a given pressure
pub fn stroke_radius(size: f64, thinning: f64, pressure: f64) -> f64 {
    (size * (0.5 - thinning * (0.5 - pressure))).max(0.0)
}

fn stroke_points(samples: &[StrokeSample], streamline: f64) -> Vec<StrokePoint> {
    let t = 0.15 + (1.0 - streamline.clamp(0.0, 1.0)) * 0.85;
    let mut out: Vec<StrokePoint> = Vec::with_capacity(samples.len());

    for sample in samples {
        let Some(prev) = out.last() else {
            out.push(StrokePoint {
                point: sample.point(),
                pressure: sample.effective_pressure(),
                vector: Point::new(1.0, 0.0),
                distance: 0.0,
            });
            continue;
        };
        let point = prev.point.lerp(sample.point(), t);
        let distance = point.distance(prev.point);
        if distance <= f64::EPSILON {
            continue;
        }
        out.push(StrokePoint {
            point,
            pressure: sample.effective_pressure(),
            vector: (prev.point - point).normalized(),
            distance,
        });
    }

    if out.len() > 1 {
        out[0].vector = out[1].vector;
    }
    out
}

/// Closed outline polygon of a stroke. Empty for no samples, a round dot for
/// a single (or stationary) sample.
pub fn freehand_outline(samples: &[StrokeSample], options: &StrokeOptions) -> Vec<Point> {
    let samples: Vec<StrokeSample> = samples
        .iter()
        .copied()
        .filter(|s| s.point().is_finite())
        .collect();
    let points = stroke_points(&samples, options.streamline);
    let Some(first) = points.first() else {
        return Vec::new();
    };

    let size = options.size.max(f64::EPSILON);
    if points.len() == 1 {
        let radius = stroke_radius(size, options.thinning, first.pressure).max(0.5);
        return (0..CAP_STEPS * 2)
            .map(|i| Point::polar(first.point, radius, i as f64 * PI / CAP_STEPS as f64))
            .collect();
    }

    let min_distance_sq = (size * options.smoothing).powi(2);
    let mut left: Vec<Point> = Vec::with_capacity(points.len());
    let mut right: Vec<Point> = Vec::with_capacity(points.len());
    let mut prev_pressure = first.pressure;
    let mut radius = stroke_radius(size, options.thinning, first.pressure);
    let mut first_radius = None;

    for (i, sp) in points.iter().enumerate() {
        let pressure = if options.simulate_pressure {
            let speed = (sp.distance / size).min(1.0);
            let target = 1.0 - speed;
            (prev_pressure + (target - prev_pressure) * (speed * RATE_OF_PRESSURE_CHANGE)).min(1.0)
        } else {
            sp.pressure
        };
        radius = stroke_radius(size, options.thinning, pressure);
        first_radius.get_or_insert(radius);

        let next_vector = points.get(i + 1).map_or(sp.vector, |n| n.vector);
        let next_dot = dot(sp.vector, next_vector);
        let offset = next_vector.lerp(sp.vector, next_dot.clamp(0.0, 1.0)).normalized().perpendicular() * radius;

        let tl = sp.point - offset;
        let tr = sp.point + offset;
        if i <= 1 || left.last().is_none_or(|pl| distance_sq(*pl, tl) > min_distance_sq) {
            left.push(tl);
        }
        if i <= 1 || right.last().is_none_or(|pr| distance_sq(*pr, tr) > min_distance_sq) {
            right.push(tr);
        }
        prev_pressure = pressure;
    }

    let last = points[points.len() - 1];
    let travel = last.vector * -1.0;
    let start_travel = points[0].vector;

    let mut outline = Vec::with_capacity(left.len() + right.len() + CAP_STEPS * 2);
    outline.extend(left.iter().copied());
    if let (Some(&l), Some(&r)) = (left.last(), right.last()) {
        outline.extend(cap(last.point, l, r, travel, radius));
    }
    outline.extend(right.iter().rev().copied());
    if let (Some(&r), Some(&l)) = (right.first(), left.first()) {
        outline.extend(cap(points[0].point, r, l, start_travel, first_radius.unwrap_or(radius)));
    }
    outline
}

/// Round cap from `from` to `to` around `center`, bulging towards `outward`
fn cap(center: Point, from: Point, to: Point, outward: Point, radius: f64) -> Vec<Point> {
    let start = (from.y - center.y).atan2(from.x - center.x);
    let towards = outward.y.atan2(outward.x);
    let delta = (towards - start + PI).rem_euclid(2.0 * PI) - PI;
    let sweep = if delta >= 0.0 { PI } else { -PI };
    let r = if center.distance(from) > 0.0 { center.distance(from) } else { radius };

    let mut pts: Vec<Point> = (1..CAP_STEPS)
        .map(|i| Point::polar(center, r, start + sweep * i as f64 / CAP_STEPS as f64))
        .collect();
    pts.push(to);
    pts
}

/// Smoothed, filled outline path for a stroke; empty for no samples
pub fn freehand_stroke(samples: &[StrokeSample], options: &StrokeOptions) -> PathData {
    smooth_closed_path(&freehand_outline(samples, options))
}

/// Closed path through `outline` using midpoint quadratic smoothing
pub fn smooth_closed_path(outline: &[Point]) -> PathData {
    if outline.len() < 3 {
        return PathData::polyline(outline, true);
    }
    let mut path = PathData::new();
    path.move_to(outline[0]);
    for (i, p) in outline.iter().enumerate() {
        let next = outline[(i + 1) % outline.len()];
        path.quad_to(*p, p.midpoint(next));
    }
    path.close();
    path
}

/// Open centerline path for broad brush strokes (stroked, not filled)
pub fn brush_path(points: &[Point]) -> PathData {
    let points: Vec<Point> = points.iter().copied().filter(|p| p.is_finite()).collect();
    let mut path = PathData::new();
    let Some((&first, rest)) = points.split_first() else {
        return path;
    };
    path.move_to(first);
    if rest.is_empty() {
        // Zero-length segment so round caps still paint a dot
        path.line_to(first);
        return path;
    }
    for pair in points.windows(2) {
        path.quad_to(pair[0], pair[0].midpoint(pair[1]));
    }
    path.line_to(points[points.len() - 1]);
    path
}

fn dot(a: Point, b: Point) -> f64 {
    a.x * b.x + a.y * b.y
}

fn distance_sq(a: Point, b: Point) -> f64 {
    let d = a - b;
    d.x * d.x + d.y * d.y
}
