//! The document: an ordered shape list plus background and pixel size.
//!
//! Shape order is paint order (later = on top). The selection lives here too
//! so removing a shape can never leave a dangling selected id, but it is not
//! part of the persisted form.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use sketchpad_geometry::{Bounds, Point};

use crate::selection::Selection;
use crate::shapes::{Shape, ShapeId, ShapeKind};
use crate::style::{Style, StylePatch};

pub const DEFAULT_WIDTH: u32 = 1200;
pub const DEFAULT_HEIGHT: u32 = 800;
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

/// Z-order operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReorderOp {
    /// Topmost
    Front,
    /// Bottommost
    Back,
    /// One step up
    Forward,
    /// One step down
    Backward,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub width: u32,
    pub height: u32,
    pub background: String,
    shapes: Vec<Shape>,
    #[serde(skip)]
    selection: Selection,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl Document {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: DEFAULT_BACKGROUND.to_string(),
            shapes: Vec::new(),
            selection: Selection::new(),
        }
    }

    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    // ---- shapes ----

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| s.id == id)
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id == id)
    }

    /// Append on top; returns the shape's id
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id;
        self.shapes.push(shape);
        id
    }

    /// Remove a shape, dropping it from the selection as well
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.index_of(id)?;
        self.selection.remove(id);
        Some(self.shapes.remove(index))
    }

    /// Replace the geometry of an existing shape wholesale
    pub fn replace_kind(&mut self, id: ShapeId, kind: ShapeKind) -> bool {
        match self.get_mut(id) {
            Some(shape) => {
                shape.kind = kind;
                true
            }
            None => false,
        }
    }

    /// Move one shape in the paint order. Returns false when the shape is
    /// unknown or already at that extreme.
    pub fn reorder(&mut self, id: ShapeId, op: ReorderOp) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let last = self.shapes.len() - 1;
        let target = match op {
            ReorderOp::Front => last,
            ReorderOp::Back => 0,
            ReorderOp::Forward => (index + 1).min(last),
            ReorderOp::Backward => index.saturating_sub(1),
        };
        if target == index {
            return false;
        }
        let shape = self.shapes.remove(index);
        self.shapes.insert(target, shape);
        true
    }

    /// Group at least two top-level shapes. Members keep their paint order
    /// and are stored relative to the group's bounding-box top-left; the
    /// group takes the slot of the highest member.
    pub fn group(&mut self, ids: &[ShapeId]) -> Option<ShapeId> {
        let indices: Vec<usize> = self
            .shapes
            .iter()
            .enumerate()
            .filter(|(_, s)| ids.contains(&s.id))
            .map(|(i, _)| i)
            .collect();
        if indices.len() < 2 {
            debug!(count = indices.len(), "group needs at least two shapes");
            return None;
        }

        let origin = indices
            .iter()
            .filter_map(|&i| self.shapes[i].bounds())
            .reduce(Bounds::union)
            .map_or(Point::ZERO, |b| b.top_left());

        let highest = indices[indices.len() - 1];
        let insert_at = highest + 1 - indices.len();

        let mut members = Vec::with_capacity(indices.len());
        for &i in indices.iter().rev() {
            let shape = self.shapes.remove(i);
            self.selection.remove(shape.id);
            members.push(shape.into_group_space(origin));
        }
        members.reverse();

        let group = Shape::new(ShapeKind::Group { origin, members }, Style::default());
        let group_id = group.id;
        self.shapes.insert(insert_at, group);
        self.selection.set([group_id]);
        info!(%group_id, members = indices.len(), "grouped shapes");
        Some(group_id)
    }

    /// Dissolve a group back into absolute top-level shapes at its slot
    pub fn ungroup(&mut self, id: ShapeId) -> Option<Vec<ShapeId>> {
        let index = self.index_of(id)?;
        if !matches!(self.shapes[index].kind, ShapeKind::Group { .. }) {
            debug!(%id, "ungroup target is not a group");
            return None;
        }
        let group = self.shapes.remove(index);
        self.selection.remove(id);
        let ShapeKind::Group { origin, members } = group.kind else {
            return None;
        };

        let group_opacity = u16::from(group.style.opacity.min(100));
        let mut ids = Vec::with_capacity(members.len());
        for (offset, member) in members.into_iter().enumerate() {
            let mut member = member.into_document_space(origin);
            // Keep the group's opacity visible once the members stand alone
            member.style.opacity = (u16::from(member.style.opacity.min(100)) * group_opacity / 100) as u8;
            ids.push(member.id);
            self.shapes.insert(index + offset, member);
        }
        self.selection.set(ids.iter().copied());
        info!(%id, members = ids.len(), "ungrouped shapes");
        Some(ids)
    }

    /// Clone shapes with fresh ids, offset by (dx, dy), on top of everything
    pub fn duplicate(&mut self, ids: &[ShapeId], dx: f64, dy: f64) -> Vec<ShapeId> {
        let copies: Vec<Shape> = self
            .shapes
            .iter()
            .filter(|s| ids.contains(&s.id))
            .map(|s| {
                let mut copy = s.duplicated();
                copy.translate(dx, dy);
                copy
            })
            .collect();
        let new_ids: Vec<ShapeId> = copies.iter().map(|s| s.id).collect();
        self.shapes.extend(copies);
        new_ids
    }

    /// Push the visual style subset onto the given shapes; returns how many
    /// were touched. A group passes the patch on to its members, except for
    /// opacity, which stays on the group and multiplies into the members when
    /// painted.
    pub fn apply_style(&mut self, ids: &[ShapeId], patch: &StylePatch) -> usize {
        let mut touched = 0;
        for shape in self.shapes.iter_mut().filter(|s| ids.contains(&s.id)) {
            restyle(shape, patch);
            touched += 1;
        }
        touched
    }

    /// Top-most visible, selectable shape under `p`
    pub fn shape_at(&self, p: Point, tolerance: f64) -> Option<ShapeId> {
        self.shapes
            .iter()
            .rev()
            .find(|s| s.selectable && s.hit(p, tolerance))
            .map(|s| s.id)
    }

    /// Set whether top-level shapes respond to pointer selection
    pub fn set_selectable(&mut self, selectable: bool) {
        for shape in &mut self.shapes {
            shape.selectable = selectable;
        }
        if !selectable {
            self.selection.clear();
        }
    }

    // ---- document settings ----

    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 || (width, height) == (self.width, self.height) {
            return false;
        }
        self.width = width;
        self.height = height;
        true
    }

    pub fn set_background(&mut self, color: impl Into<String>) -> bool {
        let color = color.into();
        if color == self.background {
            return false;
        }
        self.background = color;
        true
    }

    pub fn center(&self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    // ---- selection ----

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_ids(&self) -> Vec<ShapeId> {
        self.selection.ids().to_vec()
    }

    /// Select a top-level shape; unknown ids are ignored
    pub fn select(&mut self, id: ShapeId) -> bool {
        self.get(id).is_some() && self.selection.insert(id)
    }

    pub fn toggle_selected(&mut self, id: ShapeId) {
        if self.get(id).is_some() {
            self.selection.toggle(id);
        }
    }

    pub fn set_selection(&mut self, ids: impl IntoIterator<Item = ShapeId>) {
        let ids: Vec<ShapeId> = ids.into_iter().filter(|id| self.get(*id).is_some()).collect();
        self.selection.set(ids);
    }

    pub fn select_all(&mut self) {
        let ids: Vec<ShapeId> = self.shapes.iter().map(|s| s.id).collect();
        self.selection.set(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }
}

fn restyle(shape: &mut Shape, patch: &StylePatch) {
    shape.style.merge_visual(patch);
    if let ShapeKind::Group { members, .. } = &mut shape.kind {
        let inherited = StylePatch { opacity: None, ..patch.clone() };
        for member in members {
            restyle(member, &inherited);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::CoordSpace;

    fn rect(x: f64, y: f64) -> Shape {
        Shape::new(
            ShapeKind::Rectangle { bounds: Bounds::from_origin_size(Point::new(x, y), 10.0, 10.0) },
            Style::default(),
        )
    }

    fn doc_with(n: usize) -> (Document, Vec<ShapeId>) {
        let mut doc = Document::default();
        let ids = (0..n).map(|i| doc.add_shape(rect(i as f64 * 20.0, 5.0))).collect();
        (doc, ids)
    }

    fn order(doc: &Document) -> Vec<ShapeId> {
        doc.shapes().iter().map(|s| s.id).collect()
    }

    #[test]
    fn removing_a_selected_shape_deselects_it() {
        let (mut doc, ids) = doc_with(2);
        doc.select(ids[0]);
        doc.remove_shape(ids[0]);
        assert!(doc.selection().is_empty());
    }

    #[test]
    fn reorder_moves_one_step_or_to_extreme() {
        let (mut doc, ids) = doc_with(4);
        assert!(doc.reorder(ids[0], ReorderOp::Forward));
        assert_eq!(order(&doc), vec![ids[1], ids[0], ids[2], ids[3]]);
        assert!(doc.reorder(ids[0], ReorderOp::Front));
        assert_eq!(order(&doc), vec![ids[1], ids[2], ids[3], ids[0]]);
        assert!(!doc.reorder(ids[0], ReorderOp::Front));
        assert!(!doc.reorder(ids[1], ReorderOp::Backward));
        assert!(doc.reorder(ids[0], ReorderOp::Back));
        assert_eq!(order(&doc), ids);
    }

    #[test]
    fn reorder_never_touches_geometry() {
        let (mut doc, ids) = doc_with(3);
        let before = doc.get(ids[1]).cloned();
        doc.reorder(ids[1], ReorderOp::Front);
        assert_eq!(doc.get(ids[1]).cloned(), before);
    }

    #[test]
    fn group_takes_the_highest_member_slot() {
        let (mut doc, ids) = doc_with(5);
        let group = doc.group(&[ids[1], ids[3]]).unwrap();
        assert_eq!(order(&doc), vec![ids[0], ids[2], group, ids[4]]);
        assert_eq!(doc.selected_ids(), vec![group]);

        let ShapeKind::Group { origin, members } = &doc.get(group).unwrap().kind else {
            panic!("expected a group");
        };
        assert_eq!(*origin, Point::new(20.0, 5.0));
        assert_eq!(members[0].id, ids[1]);
        assert_eq!(members[0].space, CoordSpace::Group);
        assert_eq!(members[0].bounds().unwrap().min, Point::ZERO);
    }

    #[test]
    fn group_needs_two_shapes() {
        let (mut doc, ids) = doc_with(2);
        assert!(doc.group(&[ids[0]]).is_none());
        assert!(doc.group(&[ids[0], ShapeId::new()]).is_none());
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn ungroup_restores_absolute_positions() {
        let (mut doc, ids) = doc_with(3);
        let before: Vec<Shape> = doc.shapes().to_vec();
        let group = doc.group(&ids).unwrap();
        let restored = doc.ungroup(group).unwrap();
        assert_eq!(restored, ids);
        assert_eq!(doc.shapes(), before.as_slice());
    }

    #[test]
    fn restyling_a_group_reaches_its_members() {
        let (mut doc, ids) = doc_with(2);
        let group = doc.group(&ids).unwrap();
        let patch = StylePatch {
            stroke_color: Some("#ff0000".into()),
            opacity: Some(50),
            ..StylePatch::default()
        };
        assert_eq!(doc.apply_style(&[group], &patch), 1);

        let shape = doc.get(group).unwrap();
        assert_eq!(shape.style.opacity, 50);
        let ShapeKind::Group { members, .. } = &shape.kind else {
            panic!("expected a group");
        };
        for member in members {
            assert_eq!(member.style.stroke_color, "#ff0000");
            assert_eq!(member.style.opacity, 100);
        }

        let freed = doc.ungroup(group).unwrap();
        for id in freed {
            assert_eq!(doc.get(id).unwrap().style.opacity, 50);
        }
    }

    #[test]
    fn ungroup_non_group_is_noop() {
        let (mut doc, ids) = doc_with(1);
        assert!(doc.ungroup(ids[0]).is_none());
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn duplicate_offsets_and_appends() {
        let (mut doc, ids) = doc_with(2);
        let copies = doc.duplicate(&[ids[0]], 10.0, 10.0);
        assert_eq!(copies.len(), 1);
        assert_eq!(doc.len(), 3);
        let copy = doc.shapes().last().unwrap();
        assert_eq!(copy.bounds().unwrap().min, Point::new(10.0, 15.0));
    }

    #[test]
    fn shape_at_prefers_top_most() {
        let mut doc = Document::default();
        let below = doc.add_shape(rect(0.0, 0.0));
        let above = doc.add_shape(rect(5.0, 5.0));
        assert_eq!(doc.shape_at(Point::new(7.0, 7.0), 0.0), Some(above));
        assert_eq!(doc.shape_at(Point::new(2.0, 2.0), 0.0), Some(below));
        doc.set_selectable(false);
        assert_eq!(doc.shape_at(Point::new(7.0, 7.0), 0.0), None);
    }

    #[test]
    fn selection_is_not_serialized() {
        let (mut doc, ids) = doc_with(1);
        doc.select(ids[0]);
        let json = serde_json::to_string(&doc).unwrap();
        let back: Document = serde_json::from_str(&json).unwrap();
        assert!(back.selection().is_empty());
        assert_eq!(back.shapes(), doc.shapes());
    }
}
