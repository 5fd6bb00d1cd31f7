//! Shape types for sketchpad.
//!
//! `ShapeKind` holds the kind-specific geometry, always in the coordinate
//! space named by the owning shape's [`CoordSpace`]. Rotation and flips are
//! stored as flags and only applied by [`ShapeTransform`] when rendering or
//! hit-testing.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sketchpad_geometry::freehand::StrokeSample;
use sketchpad_geometry::polygon::{ellipse_path, rect_path, triangle_path};
use sketchpad_geometry::{
    arrow_path, brush_path, regular_polygon_path, star_path, Bounds, PathData, Point,
};

use crate::style::Style;

/// Shape identifier - UUID so duplicated and imported shapes never collide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeId(pub Uuid);

impl ShapeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Stable per-shape seed for hand-drawn rendering
    pub fn seed(&self) -> u64 {
        let v = self.0.as_u128();
        (v as u64) ^ ((v >> 64) as u64)
    }
}

impl Default for ShapeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ShapeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which space a shape's stored geometry is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordSpace {
    /// Absolute document coordinates
    #[default]
    Document,
    /// Relative to the origin of the group that owns the shape
    Group,
}

/// Freehand input device profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenKind {
    /// Mouse-style input, pressure simulated from speed
    #[default]
    Pencil,
    /// Pressure-sensitive stylus
    Pen,
}

/// Whether sketch mode replaces this kind with a hand-drawn rendering
pub fn sketchable(kind: &ShapeKind) -> bool {
    matches!(
        kind,
        ShapeKind::Rectangle { .. }
            | ShapeKind::Ellipse { .. }
            | ShapeKind::Triangle { .. }
            | ShapeKind::Line { .. }
    )
}

/// Reference to an inserted bitmap; decoding is done by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// File path or URL the host resolved the bitmap from
    pub href: String,
    /// Intrinsic pixel size
    pub width: u32,
    pub height: u32,
}

/// Independent direct-manipulation locks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Locks {
    pub movement: bool,
    pub scaling: bool,
    pub rotation: bool,
}

/// Different types of shapes we can draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeKind {
    /// Filled variable-width stroke outline (pencil / pen)
    Freehand {
        samples: Vec<StrokeSample>,
        pen: PenKind,
        outline: PathData,
    },
    /// Broad continuous stroke (brush / eraser), stroked along its centerline
    Brush { points: Vec<Point>, eraser: bool },
    Line { start: Point, end: Point },
    /// Line with heads as configured by the shape's style
    Arrow { start: Point, end: Point },
    Rectangle { bounds: Bounds },
    Ellipse { bounds: Bounds },
    Triangle { bounds: Bounds },
    /// Regular polygon, side count taken from the shape's style
    Polygon { center: Point, radius: f64 },
    Star {
        center: Point,
        outer_radius: f64,
        inner_radius: f64,
    },
    /// Text anchored at its top-left corner
    Text { origin: Point, content: String },
    Image { bounds: Bounds, image: ImageRef },
    /// Hand-drawn rendering of a rectangle, ellipse, triangle or line
    Sketch { base: Box<ShapeKind>, path: PathData },
    /// Member geometry is relative to `origin`
    Group { origin: Point, members: Vec<Shape> },
}

impl ShapeKind {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Freehand { .. } => "freehand",
            ShapeKind::Brush { eraser: false, .. } => "brush",
            ShapeKind::Brush { eraser: true, .. } => "eraser",
            ShapeKind::Line { .. } => "line",
            ShapeKind::Arrow { .. } => "arrow",
            ShapeKind::Rectangle { .. } => "rectangle",
            ShapeKind::Ellipse { .. } => "ellipse",
            ShapeKind::Triangle { .. } => "triangle",
            ShapeKind::Polygon { .. } => "polygon",
            ShapeKind::Star { .. } => "star",
            ShapeKind::Text { .. } => "text",
            ShapeKind::Image { .. } => "image",
            ShapeKind::Sketch { .. } => "sketch",
            ShapeKind::Group { .. } => "group",
        }
    }

    /// Copy with every stored point passed through the affine map `f`;
    /// radii are multiplied by `scale`.
    pub fn map_geometry(&self, f: &dyn Fn(Point) -> Point, scale: f64) -> ShapeKind {
        let map_bounds = |b: &Bounds| Bounds::from_corners(f(b.min), f(b.max));
        match self {
            ShapeKind::Freehand { samples, pen, outline } => ShapeKind::Freehand {
                samples: samples
                    .iter()
                    .map(|s| {
                        let p = f(s.point());
                        StrokeSample::new(p.x, p.y, s.pressure)
                    })
                    .collect(),
                pen: *pen,
                outline: outline.map_points(f),
            },
            ShapeKind::Brush { points, eraser } => ShapeKind::Brush {
                points: points.iter().map(|p| f(*p)).collect(),
                eraser: *eraser,
            },
            ShapeKind::Line { start, end } => ShapeKind::Line { start: f(*start), end: f(*end) },
            ShapeKind::Arrow { start, end } => ShapeKind::Arrow { start: f(*start), end: f(*end) },
            ShapeKind::Rectangle { bounds } => ShapeKind::Rectangle { bounds: map_bounds(bounds) },
            ShapeKind::Ellipse { bounds } => ShapeKind::Ellipse { bounds: map_bounds(bounds) },
            ShapeKind::Triangle { bounds } => ShapeKind::Triangle { bounds: map_bounds(bounds) },
            ShapeKind::Polygon { center, radius } => ShapeKind::Polygon {
                center: f(*center),
                radius: radius * scale,
            },
            ShapeKind::Star { center, outer_radius, inner_radius } => ShapeKind::Star {
                center: f(*center),
                outer_radius: outer_radius * scale,
                inner_radius: inner_radius * scale,
            },
            ShapeKind::Text { origin, content } => ShapeKind::Text {
                origin: f(*origin),
                content: content.clone(),
            },
            ShapeKind::Image { bounds, image } => ShapeKind::Image {
                bounds: map_bounds(bounds),
                image: image.clone(),
            },
            ShapeKind::Sketch { base, path } => ShapeKind::Sketch {
                base: Box::new(base.map_geometry(f, scale)),
                path: path.map_points(f),
            },
            ShapeKind::Group { origin, members } => {
                let new_origin = f(*origin);
                let relative = |p: Point| f(*origin + p) - new_origin;
                ShapeKind::Group {
                    origin: new_origin,
                    members: members
                        .iter()
                        .map(|m| Shape {
                            kind: m.kind.map_geometry(&relative, scale),
                            ..m.clone()
                        })
                        .collect(),
                }
            }
        }
    }

    pub fn translated(&self, dx: f64, dy: f64) -> ShapeKind {
        self.map_geometry(&|p| p.translated(dx, dy), 1.0)
    }
}

/// Render-time rotation and mirroring about the shape's bounds center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeTransform {
    pub center: Point,
    /// Degrees, clockwise in screen space
    pub angle: f64,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl ShapeTransform {
    pub fn is_identity(&self) -> bool {
        self.angle == 0.0 && !self.flip_x && !self.flip_y
    }

    /// Local geometry point to rendered position
    pub fn apply(&self, p: Point) -> Point {
        let mut d = p - self.center;
        if self.flip_x {
            d.x = -d.x;
        }
        if self.flip_y {
            d.y = -d.y;
        }
        let (sin, cos) = self.angle.to_radians().sin_cos();
        self.center + Point::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
    }

    /// Affine form `[a, b, c, d, e, f]` as used by SVG `matrix(...)`:
    /// `x' = a*x + c*y + e`, `y' = b*x + d*y + f`
    pub fn matrix(&self) -> [f64; 6] {
        let o = self.apply(Point::ZERO);
        let ex = self.apply(Point::new(1.0, 0.0)) - o;
        let ey = self.apply(Point::new(0.0, 1.0)) - o;
        [ex.x, ex.y, ey.x, ey.y, o.x, o.y]
    }

    /// Rendered position back to local geometry
    pub fn invert(&self, p: Point) -> Point {
        let d = p - self.center;
        let (sin, cos) = (-self.angle).to_radians().sin_cos();
        let mut d = Point::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos);
        if self.flip_x {
            d.x = -d.x;
        }
        if self.flip_y {
            d.y = -d.y;
        }
        self.center + d
    }
}

fn yes() -> bool {
    true
}

/// A drawable entity with its own style snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    pub kind: ShapeKind,
    pub style: Style,
    #[serde(default)]
    pub space: CoordSpace,
    /// Rotation in degrees
    #[serde(default)]
    pub angle: f64,
    #[serde(default)]
    pub flip_x: bool,
    #[serde(default)]
    pub flip_y: bool,
    #[serde(default)]
    pub locks: Locks,
    #[serde(default = "yes")]
    pub visible: bool,
    /// Interaction state only; cleared while a drawing tool is active
    #[serde(skip, default = "yes")]
    pub selectable: bool,
}

impl Shape {
    pub fn new(kind: ShapeKind, style: Style) -> Self {
        Self {
            id: ShapeId::new(),
            kind,
            style,
            space: CoordSpace::Document,
            angle: 0.0,
            flip_x: false,
            flip_y: false,
            locks: Locks::default(),
            visible: true,
            selectable: true,
        }
    }

    /// Axis-aligned bounds of the unrotated geometry, in the shape's own space
    pub fn bounds(&self) -> Option<Bounds> {
        let half_width = self.style.stroke_width.max(0.0) / 2.0;
        match &self.kind {
            ShapeKind::Freehand { outline, samples, .. } => {
                outline.bounds().or_else(|| Bounds::enclosing(samples.iter().map(|s| s.point())))
            }
            ShapeKind::Brush { points, .. } => {
                Bounds::enclosing(points.iter().copied()).map(|b| b.expanded(half_width))
            }
            ShapeKind::Line { start, end } | ShapeKind::Arrow { start, end } => {
                Some(Bounds::from_corners(*start, *end))
            }
            ShapeKind::Rectangle { bounds }
            | ShapeKind::Ellipse { bounds }
            | ShapeKind::Triangle { bounds }
            | ShapeKind::Image { bounds, .. } => Some(*bounds),
            ShapeKind::Polygon { center, radius } => Some(radial_bounds(*center, *radius)),
            ShapeKind::Star { center, outer_radius, .. } => Some(radial_bounds(*center, *outer_radius)),
            ShapeKind::Text { origin, content } => Some(text_bounds(*origin, content, &self.style)),
            ShapeKind::Sketch { base, path } => {
                let inner = Shape { kind: (**base).clone(), ..self.clone() };
                inner.bounds().or_else(|| path.bounds())
            }
            ShapeKind::Group { origin, members } => members
                .iter()
                .filter_map(Shape::bounds)
                .reduce(Bounds::union)
                .map(|b| b.translated(origin.x, origin.y)),
        }
    }

    pub fn transform(&self) -> ShapeTransform {
        ShapeTransform {
            center: self.bounds().map_or(Point::ZERO, |b| b.center()),
            angle: self.angle,
            flip_x: self.flip_x,
            flip_y: self.flip_y,
        }
    }

    /// Untransformed outline used for stroking (and selection outlines for
    /// text and images). Empty for groups.
    pub fn path(&self) -> PathData {
        let style = &self.style;
        match &self.kind {
            ShapeKind::Freehand { outline, .. } => outline.clone(),
            ShapeKind::Brush { points, .. } => brush_path(points),
            ShapeKind::Line { start, end } => PathData::polyline(&[*start, *end], false),
            ShapeKind::Arrow { start, end } => arrow_path(
                *start,
                *end,
                style.stroke_width,
                style.start_arrowhead,
                style.end_arrowhead,
            ),
            ShapeKind::Rectangle { bounds } => rect_path(bounds, style.corner_radius),
            ShapeKind::Ellipse { bounds } => ellipse_path(bounds),
            ShapeKind::Triangle { bounds } => triangle_path(bounds),
            ShapeKind::Polygon { center, radius } => regular_polygon_path(*center, style.sides, *radius),
            ShapeKind::Star { center, outer_radius, inner_radius } => {
                star_path(*center, *outer_radius, *inner_radius)
            }
            ShapeKind::Sketch { path, .. } => path.clone(),
            ShapeKind::Text { .. } | ShapeKind::Image { .. } => {
                self.bounds().map_or_else(PathData::new, |b| rect_path(&b, 0.0))
            }
            ShapeKind::Group { .. } => PathData::new(),
        }
    }

    /// Path painted with [`Shape::fill_color`], if any
    pub fn fill_path(&self) -> Option<PathData> {
        match &self.kind {
            ShapeKind::Freehand { outline, .. } => Some(outline.clone()),
            ShapeKind::Rectangle { .. }
            | ShapeKind::Ellipse { .. }
            | ShapeKind::Triangle { .. }
            | ShapeKind::Polygon { .. }
            | ShapeKind::Star { .. } => self.style.fill.as_ref().map(|_| self.path()),
            ShapeKind::Sketch { base, .. } if self.style.fill.is_some() => {
                let crisp = Shape { kind: (**base).clone(), ..self.clone() };
                crisp.path().is_closed().then(|| crisp.path())
            }
            _ => None,
        }
    }

    /// Freehand outlines are filled with the stroke color
    pub fn fill_color(&self) -> Option<&str> {
        match &self.kind {
            ShapeKind::Freehand { .. } => Some(&self.style.stroke_color),
            _ => self.style.fill.as_deref(),
        }
    }

    /// Path stroked with the style's stroke color and width, if any
    pub fn stroke_path(&self) -> Option<PathData> {
        match &self.kind {
            ShapeKind::Freehand { .. }
            | ShapeKind::Text { .. }
            | ShapeKind::Image { .. }
            | ShapeKind::Group { .. } => None,
            _ => Some(self.path()),
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.kind = self.kind.translated(dx, dy);
    }

    /// Scale the geometry so its bounds become `target`
    pub fn resize_to(&mut self, target: &Bounds) -> bool {
        let Some(from) = self.bounds() else {
            return false;
        };
        let sx = if from.width() > f64::EPSILON { target.width() / from.width() } else { 1.0 };
        let sy = if from.height() > f64::EPSILON { target.height() / from.height() } else { 1.0 };
        let scale = (sx.abs() + sy.abs()) / 2.0;
        let map = |p: Point| from.map_to(target, p);
        self.kind = self.kind.map_geometry(&map, scale);
        true
    }

    /// Re-express the geometry relative to a group origin
    pub fn into_group_space(mut self, origin: Point) -> Self {
        if self.space == CoordSpace::Document {
            self.translate(-origin.x, -origin.y);
            self.space = CoordSpace::Group;
        }
        self
    }

    /// Restore absolute coordinates for a member of the group at `origin`
    pub fn into_document_space(mut self, origin: Point) -> Self {
        if self.space == CoordSpace::Group {
            self.translate(origin.x, origin.y);
            self.space = CoordSpace::Document;
        }
        self
    }

    /// Deep copy with fresh ids, including group members
    pub fn duplicated(&self) -> Self {
        let mut copy = self.clone();
        copy.id = ShapeId::new();
        if let ShapeKind::Group { members, .. } = &mut copy.kind {
            for m in members.iter_mut() {
                *m = m.duplicated();
            }
        }
        copy.selectable = true;
        copy
    }

    /// Whether `p` (in the shape's own space) touches the rendered shape
    pub fn hit(&self, p: Point, tolerance: f64) -> bool {
        if !self.visible || !p.is_finite() {
            return false;
        }
        let local = self.transform().invert(p);
        let reach = tolerance + self.style.stroke_width.max(0.0) / 2.0;
        match &self.kind {
            ShapeKind::Line { start, end } | ShapeKind::Arrow { start, end } => {
                segment_distance(local, *start, *end) <= reach
            }
            ShapeKind::Brush { points, .. } => match points.as_slice() {
                [] => false,
                [only] => only.distance(local) <= reach,
                _ => points.windows(2).any(|w| segment_distance(local, w[0], w[1]) <= reach),
            },
            ShapeKind::Group { origin, members } => {
                let rel = local - *origin;
                members.iter().any(|m| m.hit(rel, tolerance))
            }
            _ => self.bounds().is_some_and(|b| b.expanded(reach).contains(local)),
        }
    }
}

fn radial_bounds(center: Point, radius: f64) -> Bounds {
    let r = radius.max(0.0);
    Bounds::from_corners(center.translated(-r, -r), center.translated(r, r))
}

/// Estimated text block extent; exact metrics belong to the renderer
pub fn text_bounds(origin: Point, content: &str, style: &Style) -> Bounds {
    let longest = content.lines().map(|l| l.chars().count()).max().unwrap_or(0);
    let lines = content.lines().count().max(1);
    Bounds::from_origin_size(
        origin,
        longest as f64 * style.font_size * 0.6,
        lines as f64 * style.font_size * 1.2,
    )
}

fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.x * ab.x + ab.y * ab.y;
    if len_sq <= f64::EPSILON {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * ab.x + (p.y - a.y) * ab.y) / len_sq).clamp(0.0, 1.0);
    p.distance(a.lerp(b, t))
}
