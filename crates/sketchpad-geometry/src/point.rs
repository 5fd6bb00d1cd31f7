use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A position in document (scene) space. Screen positions use the same type
/// and are converted through [`crate::Viewport`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at `radius` from `center` in direction `angle` (radians)
    pub fn polar(center: Point, radius: f64, angle: f64) -> Self {
        Self {
            x: center.x + radius * angle.cos(),
            y: center.y + radius * angle.sin(),
        }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Linear interpolation towards `other`; `t = 0` is `self`
    pub fn lerp(self, other: Point, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    pub fn midpoint(self, other: Point) -> Self {
        self.lerp(other, 0.5)
    }

    /// Unit vector in the same direction, or zero for a zero-length vector
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > 0.0 { self * (1.0 / len) } else { Point::ZERO }
    }

    /// Vector rotated a quarter turn counter-clockwise
    pub fn perpendicular(self) -> Self {
        Self { x: -self.y, y: self.x }
    }

    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned bounding box. `min` is always the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Bounds spanning two arbitrary corners, independent of their order
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn from_origin_size(origin: Point, width: f64, height: f64) -> Self {
        Self::from_corners(origin, origin.translated(width, height))
    }

    /// Smallest bounds containing every point, `None` for an empty iterator
    pub fn enclosing(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Bounds { min: first, max: first };
        for p in iter {
            bounds.include(p);
        }
        Some(bounds)
    }

    pub fn include(&mut self, p: Point) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn union(self, other: Bounds) -> Self {
        let mut out = self;
        out.include(other.min);
        out.include(other.max);
        out
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        self.min.midpoint(self.max)
    }

    pub fn top_left(&self) -> Point {
        self.min
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            min: self.min.translated(dx, dy),
            max: self.max.translated(dx, dy),
        }
    }

    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min: self.min.translated(-margin, -margin),
            max: self.max.translated(margin, margin),
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Map a point inside `self` to the corresponding point inside `target`.
    /// A zero extent on either axis maps onto the target's minimum.
    pub fn map_to(&self, target: &Bounds, p: Point) -> Point {
        let scale = |from_min: f64, from_len: f64, to_min: f64, to_len: f64, v: f64| {
            if from_len.abs() > f64::EPSILON {
                to_min + (v - from_min) / from_len * to_len
            } else {
                to_min
            }
        };
        Point::new(
            scale(self.min.x, self.width(), target.min.x, target.width(), p.x),
            scale(self.min.y, self.height(), target.min.y, target.height(), p.y),
        )
    }
}
