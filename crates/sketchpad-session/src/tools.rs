//! The active tool. Exactly one is active at a time; switching is immediate.

use serde::{Deserialize, Serialize};

/// Available drawing tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    #[default]
    Select,
    Pan,
    Pencil,
    Pen,
    Brush,
    Eraser,
    Line,
    Arrow,
    Rectangle,
    Ellipse,
    Triangle,
    Polygon,
    Star,
    Text,
    /// One-shot: requests an image insert and falls back to `Select`
    Image,
}

impl Tool {
    pub const ALL: [Tool; 15] = [
        Tool::Select,
        Tool::Pan,
        Tool::Pencil,
        Tool::Pen,
        Tool::Brush,
        Tool::Eraser,
        Tool::Line,
        Tool::Arrow,
        Tool::Rectangle,
        Tool::Ellipse,
        Tool::Triangle,
        Tool::Polygon,
        Tool::Star,
        Tool::Text,
        Tool::Image,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Tool::Select => "Select",
            Tool::Pan => "Pan",
            Tool::Pencil => "Pencil",
            Tool::Pen => "Pen",
            Tool::Brush => "Brush",
            Tool::Eraser => "Eraser",
            Tool::Line => "Line",
            Tool::Arrow => "Arrow",
            Tool::Rectangle => "Rectangle",
            Tool::Ellipse => "Ellipse",
            Tool::Triangle => "Triangle",
            Tool::Polygon => "Polygon",
            Tool::Star => "Star",
            Tool::Text => "Text",
            Tool::Image => "Image",
        }
    }

    /// Single-key shortcut (lowercase)
    pub fn shortcut(&self) -> char {
        match self {
            Tool::Select => 'v',
            Tool::Pan => 'h',
            Tool::Pencil => 'p',
            Tool::Pen => 'n',
            Tool::Brush => 'b',
            Tool::Eraser => 'e',
            Tool::Line => 'l',
            Tool::Arrow => 'a',
            Tool::Rectangle => 'r',
            Tool::Ellipse => 'o',
            Tool::Triangle => 'd',
            Tool::Polygon => 'g',
            Tool::Star => 's',
            Tool::Text => 't',
            Tool::Image => 'i',
        }
    }

    pub fn from_shortcut(key: char) -> Option<Tool> {
        let key = key.to_ascii_lowercase();
        Tool::ALL.into_iter().find(|t| t.shortcut() == key)
    }

    /// Continuous-stroke capture tools
    pub fn is_stroke(&self) -> bool {
        matches!(self, Tool::Pencil | Tool::Pen | Tool::Brush | Tool::Eraser)
    }

    /// Drag-to-size shape tools
    pub fn is_shape(&self) -> bool {
        matches!(
            self,
            Tool::Line
                | Tool::Arrow
                | Tool::Rectangle
                | Tool::Ellipse
                | Tool::Triangle
                | Tool::Polygon
                | Tool::Star
        )
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
