//! State of one in-progress pointer drag.
//!
//! A drag exists from pointer-down to pointer-up (or cancel). Everything the
//! move handlers need lives here rather than on the session, so a finished
//! drag leaves nothing behind.

use sketchpad_core::{Document, ShapeId};
use sketchpad_geometry::{Point, StrokeSample};

use crate::tools::Tool;

#[derive(Debug, Clone)]
pub enum DragSession {
    /// Viewport pan; `last` is in screen space
    Pan { last: Point },
    /// Continuous stroke; the provisional shape is rebuilt from every sample
    Stroke {
        id: ShapeId,
        tool: Tool,
        samples: Vec<StrokeSample>,
    },
    /// Drag-to-size shape anchored at `start` (document space)
    Shape { id: ShapeId, tool: Tool, start: Point },
    /// Moving the selection; `before` restores the document on cancel
    Move {
        last: Point,
        before: Box<Document>,
        moved: bool,
    },
}

impl DragSession {
    /// Id of the provisional shape, if this drag created one
    pub fn provisional(&self) -> Option<ShapeId> {
        match self {
            DragSession::Stroke { id, .. } | DragSession::Shape { id, .. } => Some(*id),
            DragSession::Pan { .. } | DragSession::Move { .. } => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DragSession::Pan { .. } => "pan",
            DragSession::Stroke { .. } => "stroke",
            DragSession::Shape { .. } => "shape",
            DragSession::Move { .. } => "move",
        }
    }
}
