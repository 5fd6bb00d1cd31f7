//! Core document model for sketchpad.
//!
//! This crate provides:
//! - [`Shape`] / [`ShapeKind`]: drawable entities with their style snapshot
//! - [`Style`] / [`StylePatch`] / [`ColorHistory`]: the current style record
//! - [`Document`]: ordered shape list, z-order, grouping and selection

pub mod document;
pub mod selection;
pub mod shapes;
pub mod style;

pub use document::{Document, ReorderOp};
pub use selection::Selection;
pub use shapes::{CoordSpace, ImageRef, Locks, PenKind, Shape, ShapeId, ShapeKind, ShapeTransform};
pub use style::{ColorHistory, DashPattern, Style, StylePatch};
