//! Backend-neutral path description.
//!
//! Every geometry builder in this crate produces a [`PathData`]; renderers
//! (SVG, raster) translate the commands into their own path types.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::point::{Bounds, Point};

/// A single path drawing command in absolute coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo { to: Point },
    LineTo { to: Point },
    QuadTo { ctrl: Point, to: Point },
    CubicTo { ctrl1: Point, ctrl2: Point, to: Point },
    Close,
}

impl PathCommand {
    /// End point of the command (`None` for close)
    pub fn end_point(&self) -> Option<Point> {
        match self {
            PathCommand::MoveTo { to }
            | PathCommand::LineTo { to }
            | PathCommand::QuadTo { to, .. }
            | PathCommand::CubicTo { to, .. } => Some(*to),
            PathCommand::Close => None,
        }
    }

    fn map_points(&self, f: &impl Fn(Point) -> Point) -> Self {
        match *self {
            PathCommand::MoveTo { to } => PathCommand::MoveTo { to: f(to) },
            PathCommand::LineTo { to } => PathCommand::LineTo { to: f(to) },
            PathCommand::QuadTo { ctrl, to } => PathCommand::QuadTo { ctrl: f(ctrl), to: f(to) },
            PathCommand::CubicTo { ctrl1, ctrl2, to } => PathCommand::CubicTo {
                ctrl1: f(ctrl1),
                ctrl2: f(ctrl2),
                to: f(to),
            },
            PathCommand::Close => PathCommand::Close,
        }
    }
}

/// An ordered list of path commands, possibly made of several subpaths
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathData {
    commands: Vec<PathCommand>,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    /// A path made of a single point, the degenerate form of every closed shape
    pub fn point(at: Point) -> Self {
        Self {
            commands: vec![PathCommand::MoveTo { to: at }],
        }
    }

    /// Straight-edged path through `points`, closed if requested
    pub fn polyline(points: &[Point], closed: bool) -> Self {
        let mut path = Self::new();
        let Some((first, rest)) = points.split_first() else {
            return path;
        };
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
        if closed {
            path.close();
        }
        path
    }

    pub fn move_to(&mut self, to: Point) -> &mut Self {
        self.commands.push(PathCommand::MoveTo { to });
        self
    }

    pub fn line_to(&mut self, to: Point) -> &mut Self {
        self.commands.push(PathCommand::LineTo { to });
        self
    }

    pub fn quad_to(&mut self, ctrl: Point, to: Point) -> &mut Self {
        self.commands.push(PathCommand::QuadTo { ctrl, to });
        self
    }

    pub fn cubic_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) -> &mut Self {
        self.commands.push(PathCommand::CubicTo { ctrl1, ctrl2, to });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }

    /// Append every command of `other`
    pub fn extend(&mut self, other: &PathData) {
        self.commands.extend_from_slice(&other.commands);
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// On-curve points (command end points) in order
    pub fn vertices(&self) -> Vec<Point> {
        self.commands.iter().filter_map(PathCommand::end_point).collect()
    }

    /// Number of subpaths (one per move-to)
    pub fn subpath_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::MoveTo { .. }))
            .count()
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.commands.last(), Some(PathCommand::Close))
    }

    /// Bounds of all points including control points
    pub fn bounds(&self) -> Option<Bounds> {
        let mut points = Vec::with_capacity(self.commands.len());
        for cmd in &self.commands {
            match *cmd {
                PathCommand::MoveTo { to } | PathCommand::LineTo { to } => points.push(to),
                PathCommand::QuadTo { ctrl, to } => points.extend([ctrl, to]),
                PathCommand::CubicTo { ctrl1, ctrl2, to } => points.extend([ctrl1, ctrl2, to]),
                PathCommand::Close => {}
            }
        }
        Bounds::enclosing(points)
    }

    /// Copy with every coordinate passed through `f`
    pub fn map_points(&self, f: impl Fn(Point) -> Point) -> Self {
        Self {
            commands: self.commands.iter().map(|c| c.map_points(&f)).collect(),
        }
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        self.map_points(|p| p.translated(dx, dy))
    }

    /// SVG path data (`d` attribute)
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        for cmd in &self.commands {
            if !out.is_empty() {
                out.push(' ');
            }
            // Writing into a String cannot fail
            let _ = match cmd {
                PathCommand::MoveTo { to } => write!(out, "M {} {}", fmt_coord(to.x), fmt_coord(to.y)),
                PathCommand::LineTo { to } => write!(out, "L {} {}", fmt_coord(to.x), fmt_coord(to.y)),
                PathCommand::QuadTo { ctrl, to } => write!(
                    out,
                    "Q {} {} {} {}",
                    fmt_coord(ctrl.x),
                    fmt_coord(ctrl.y),
                    fmt_coord(to.x),
                    fmt_coord(to.y)
                ),
                PathCommand::CubicTo { ctrl1, ctrl2, to } => write!(
                    out,
                    "C {} {} {} {} {} {}",
                    fmt_coord(ctrl1.x),
                    fmt_coord(ctrl1.y),
                    fmt_coord(ctrl2.x),
                    fmt_coord(ctrl2.y),
                    fmt_coord(to.x),
                    fmt_coord(to.y)
                ),
                PathCommand::Close => write!(out, "Z"),
            };
        }
        out
    }
}

/// Format a coordinate with at most two decimals and no trailing zeros
fn fmt_coord(v: f64) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}
