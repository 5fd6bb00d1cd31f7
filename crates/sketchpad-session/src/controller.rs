//! Pointer and wheel handling: the drag lifecycle.
//!
//! `pointer_down` opens a [`DragSession`], `pointer_move` rebuilds the
//! provisional geometry from scratch, `pointer_up` finalizes and commits one
//! snapshot. Only one drag runs at a time; a second pointer-down while one is
//! active is ignored. Pan and zoom never touch the document or history.

use tracing::debug;

use sketchpad_core::shapes::sketchable;
use sketchpad_core::{PenKind, Shape, ShapeId, ShapeKind};
use sketchpad_geometry::viewport::wheel_zoom_factor;
use sketchpad_geometry::{
    Bounds, Point, StrokeOptions, StrokeSample, freehand_stroke, sketchy_ellipse,
    sketchy_line, sketchy_rect, sketchy_triangle,
};

use crate::config::StrokeProfile;
use crate::drag::DragSession;
use crate::editor::EditorSession;
use crate::input::{PointerEvent, WheelEvent};
use crate::tools::Tool;

impl EditorSession {
    /// Returns true when the event started a drag or changed state
    pub fn pointer_down(&mut self, event: &PointerEvent) -> bool {
        if self.drag.is_some() {
            debug!("pointer down ignored, drag already active");
            return false;
        }
        let screen = event.position();
        if !screen.is_finite() {
            return false;
        }
        let p = self.viewport.screen_to_document(screen);

        match self.tool {
            Tool::Pan => {
                self.drag = Some(DragSession::Pan { last: screen });
            }
            Tool::Select => {
                self.blur_text();
                return self.select_at(p, event.modifiers.shift);
            }
            Tool::Text => {
                self.begin_text(p);
            }
            Tool::Image => return false,
            tool if tool.is_stroke() => {
                self.blur_text();
                let sample = StrokeSample::new(p.x, p.y, event.pressure);
                let kind = self.stroke_kind(tool, &[sample]);
                let id = self.add_provisional(kind, tool);
                self.drag = Some(DragSession::Stroke { id, tool, samples: vec![sample] });
            }
            tool => {
                self.blur_text();
                let kind = self.shape_kind(tool, p, p);
                let id = self.add_provisional(kind, tool);
                self.drag = Some(DragSession::Shape { id, tool, start: p });
            }
        }
        if let Some(drag) = &self.drag {
            debug!(drag = drag.name(), x = p.x, y = p.y, "drag started");
        }
        true
    }

    /// Non-finite samples are dropped
    pub fn pointer_move(&mut self, event: &PointerEvent) -> bool {
        let screen = event.position();
        if !screen.is_finite() {
            return false;
        }
        let Some(mut drag) = self.drag.take() else {
            return false;
        };
        let p = self.viewport.screen_to_document(screen);

        match &mut drag {
            DragSession::Pan { last } => {
                self.viewport.pan(screen.x - last.x, screen.y - last.y);
                *last = screen;
            }
            DragSession::Stroke { id, tool, samples } => {
                samples.push(StrokeSample::new(p.x, p.y, event.pressure));
                let kind = self.stroke_kind(*tool, samples);
                self.doc.replace_kind(*id, kind);
            }
            DragSession::Shape { id, tool, start } => {
                let kind = self.shape_kind(*tool, *start, p);
                self.doc.replace_kind(*id, kind);
            }
            DragSession::Move { last, moved, .. } => {
                let (dx, dy) = (p.x - last.x, p.y - last.y);
                if (dx != 0.0 || dy != 0.0) && self.translate_selection(dx, dy) {
                    *moved = true;
                }
                *last = p;
            }
        }
        self.drag = Some(drag);
        true
    }

    /// Finalize the drag. The release position counts as a last move.
    pub fn pointer_up(&mut self, event: &PointerEvent) -> bool {
        self.pointer_move(event);
        let Some(drag) = self.drag.take() else {
            return false;
        };
        match drag {
            DragSession::Pan { .. } => {}
            DragSession::Stroke { id, tool, .. } | DragSession::Shape { id, tool, .. } => {
                self.finalize(id, tool);
                self.commit();
            }
            DragSession::Move { moved, .. } => {
                if moved {
                    debug!("selection moved");
                    self.commit();
                }
            }
        }
        true
    }

    /// Command/ctrl zooms about the cursor, shift pans horizontally, plain
    /// wheel pans
    pub fn wheel(&mut self, event: &WheelEvent) -> bool {
        let (dx, dy) = (event.delta_x, event.delta_y);
        if !dx.is_finite() || !dy.is_finite() {
            return false;
        }
        if event.modifiers.command() {
            let factor = wheel_zoom_factor(dy, self.config.wheel_zoom_base);
            self.viewport.zoom_at(event.position(), factor, &self.config.zoom);
        } else if event.modifiers.shift {
            self.viewport.pan(-dy, 0.0);
        } else {
            self.viewport.pan(-dx, -dy);
        }
        true
    }

    fn select_at(&mut self, p: Point, shift: bool) -> bool {
        let tolerance = self.config.hit_tolerance / self.viewport.zoom;
        let Some(id) = self.doc.shape_at(p, tolerance) else {
            if !shift {
                self.doc.clear_selection();
            }
            return false;
        };
        if shift {
            self.doc.toggle_selected(id);
        } else if !self.doc.selection().contains(id) {
            self.doc.set_selection([id]);
        }
        if self.doc.selection().contains(id) {
            self.drag = Some(DragSession::Move {
                last: p,
                before: Box::new(self.doc.clone()),
                moved: false,
            });
        }
        true
    }

    fn add_provisional(&mut self, kind: ShapeKind, tool: Tool) -> ShapeId {
        let mut style = self.style.clone();
        if matches!(tool, Tool::Brush | Tool::Eraser) {
            style.stroke_width *= self.profile(tool).width_multiplier;
        }
        if tool == Tool::Eraser {
            style.stroke_color = self.doc.background.clone();
            style.fill = None;
        }
        let mut shape = Shape::new(kind, style);
        shape.selectable = false;
        self.doc.add_shape(shape)
    }

    /// Sketch mode swaps in the hand-drawn rendering here and nowhere else
    fn finalize(&mut self, id: ShapeId, tool: Tool) {
        let selectable = self.tool == Tool::Select;
        let sketch = self.sketch_mode;
        let roughness = self.config.sketch_roughness;
        let Some(shape) = self.doc.get_mut(id) else {
            return;
        };
        if sketch && sketchable(&shape.kind) {
            let seed = shape.id.seed();
            let path = match &shape.kind {
                ShapeKind::Rectangle { bounds } => sketchy_rect(bounds, roughness, seed),
                ShapeKind::Ellipse { bounds } => sketchy_ellipse(bounds, roughness, seed),
                ShapeKind::Triangle { bounds } => sketchy_triangle(bounds, roughness, seed),
                ShapeKind::Line { start, end } => sketchy_line(*start, *end, roughness, seed),
                _ => return,
            };
            let base = Box::new(shape.kind.clone());
            shape.kind = ShapeKind::Sketch { base, path };
        }
        shape.selectable = selectable;
        debug!(%id, %tool, kind = shape.kind.name(), "shape finalized");
    }

    fn profile(&self, tool: Tool) -> StrokeProfile {
        match tool {
            Tool::Pen => self.config.pen,
            Tool::Brush => self.config.brush,
            Tool::Eraser => self.config.eraser,
            _ => self.config.pencil,
        }
    }

    /// Geometry for a stroke tool, rebuilt from the whole sample buffer
    pub(crate) fn stroke_kind(&self, tool: Tool, samples: &[StrokeSample]) -> ShapeKind {
        match tool {
            Tool::Brush | Tool::Eraser => {
                let points: Vec<Point> = samples.iter().map(StrokeSample::point).collect();
                ShapeKind::Brush { points, eraser: tool == Tool::Eraser }
            }
            _ => {
                let profile = self.profile(tool);
                let options = StrokeOptions {
                    size: self.style.stroke_width * profile.width_multiplier,
                    thinning: profile.thinning,
                    smoothing: self.config.stroke_smoothing,
                    streamline: self.config.stroke_streamline,
                    simulate_pressure: profile.simulate_pressure,
                };
                let pen = if tool == Tool::Pen { PenKind::Pen } else { PenKind::Pencil };
                ShapeKind::Freehand {
                    samples: samples.to_vec(),
                    pen,
                    outline: freehand_stroke(samples, &options),
                }
            }
        }
    }

    /// Geometry for a drag-to-size tool between `start` and `current`.
    /// Box shapes normalize the corners so drag direction does not matter.
    pub(crate) fn shape_kind(&self, tool: Tool, start: Point, current: Point) -> ShapeKind {
        match tool {
            Tool::Line => ShapeKind::Line { start, end: current },
            Tool::Arrow => ShapeKind::Arrow { start, end: current },
            Tool::Ellipse => ShapeKind::Ellipse { bounds: Bounds::from_corners(start, current) },
            Tool::Triangle => ShapeKind::Triangle { bounds: Bounds::from_corners(start, current) },
            Tool::Polygon => ShapeKind::Polygon {
                center: start.midpoint(current),
                radius: start.distance(current) / 2.0,
            },
            Tool::Star => {
                let outer_radius = start.distance(current) / 2.0;
                ShapeKind::Star {
                    center: start.midpoint(current),
                    outer_radius,
                    inner_radius: outer_radius * self.config.star_inner_ratio,
                }
            }
            _ => ShapeKind::Rectangle { bounds: Bounds::from_corners(start, current) },
        }
    }
}
