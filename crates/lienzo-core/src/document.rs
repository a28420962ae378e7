//! Document model: the ordered list of drawable objects and their labeling.
//!
//! Objects are stored back to front. Grid lines share the `grid` id, always sit at the
//! start of the list and are invisible to every index-based operation here: all indices
//! are positions within the non-grid subsequence.

use crate::shapes::{Group, ObjectId, ObjectMeta, SerializableColor, Shape};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

/// Offset applied to duplicated and pasted objects.
pub const DEFAULT_DUPLICATE_OFFSET: f64 = 20.0;

/// Document errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("Failed to restore snapshot: {0}")]
    Restore(#[source] serde_json::Error),
}

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Immutable serialized copy of the user content of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    json: String,
    object_count: usize,
}

impl Snapshot {
    /// Number of non-grid objects captured.
    pub fn object_count(&self) -> usize {
        self.object_count
    }

    /// Serialized size in bytes.
    pub fn size(&self) -> usize {
        self.json.len()
    }
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    background: Option<SerializableColor>,
    objects: Vec<&'a Shape>,
}

#[derive(Deserialize)]
struct SnapshotBody {
    #[serde(default)]
    background: Option<SerializableColor>,
    objects: Vec<Shape>,
}

/// A vector drawing: objects in stacking order plus the canvas background.
#[derive(Debug, Clone)]
pub struct Document {
    /// Unique document identifier.
    pub id: String,
    /// Document name.
    pub name: String,
    /// Grid lines first, then content back to front.
    objects: Vec<Shape>,
    /// Monotonic labeling counter. Not captured in snapshots.
    counter: u64,
    /// Canvas background; `None` is transparent.
    background: Option<SerializableColor>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a new empty document with a white background.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Untitled".to_string(),
            objects: Vec::new(),
            counter: 0,
            background: Some(SerializableColor::white()),
        }
    }

    fn grid_len(&self) -> usize {
        self.objects.iter().take_while(|s| s.is_grid()).count()
    }

    fn content(&self) -> &[Shape] {
        &self.objects[self.grid_len()..]
    }

    /// Assign the next `<Label>-<n>` id to a shape. The name follows the id.
    fn label(&mut self, shape: &mut Shape) -> ObjectId {
        self.counter += 1;
        let id = ObjectId::new(format!("{}-{}", shape.kind().label(), self.counter));
        shape.meta_mut().assign(id.clone());
        id
    }

    /// Label every child of a group afresh, depth first.
    fn label_children(&mut self, shape: &mut Shape) {
        let Some(group) = shape.as_group_mut() else {
            return;
        };
        for child in group.children_mut() {
            self.label(child);
            self.label_children(child);
        }
    }

    /// Append an object on top of the stack, labeling it. Does not touch history.
    pub fn add_object(&mut self, mut shape: Shape) -> ObjectId {
        let id = self.label(&mut shape);
        shape.meta_mut().selectable = true;
        log::debug!("Added {id}");
        self.objects.push(shape);
        id
    }

    /// Remove an object by id. Grid lines cannot be removed this way.
    pub fn remove_object(&mut self, id: &ObjectId) -> Option<Shape> {
        if id.is_grid() {
            return None;
        }
        let pos = self.objects.iter().position(|s| s.id() == id)?;
        Some(self.objects.remove(pos))
    }

    /// Remove the object at a stack index.
    pub fn remove_at(&mut self, index: usize) -> Option<Shape> {
        if index >= self.len() {
            return None;
        }
        let offset = self.grid_len();
        Some(self.objects.remove(offset + index))
    }

    /// Move the object at `from` so that it ends up at `to`.
    ///
    /// Returns false when the indices are equal or out of range.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let n = self.len();
        if from == to || from >= n || to >= n {
            return false;
        }

        let (grid, mut content): (Vec<Shape>, Vec<Shape>) =
            std::mem::take(&mut self.objects).into_iter().partition(Shape::is_grid);
        let moved = content.remove(from);
        content.insert(to, moved);

        self.objects = grid;
        self.objects.extend(content);
        true
    }

    /// Layer-panel "up": one step toward stack index 0.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 {
            return false;
        }
        self.reorder(index, index - 1)
    }

    /// Layer-panel "down": one step toward the last stack index.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index >= self.len().saturating_sub(1) {
            return false;
        }
        self.reorder(index, index + 1)
    }

    /// Move to stack index 0.
    pub fn move_to_front(&mut self, index: usize) -> bool {
        if index == 0 {
            return false;
        }
        self.reorder(index, 0)
    }

    /// Move to the last stack index.
    pub fn move_to_back(&mut self, index: usize) -> bool {
        let n = self.len();
        if n == 0 || index >= n - 1 {
            return false;
        }
        self.reorder(index, n - 1)
    }

    /// Flip visibility of the object at `index`. Returns false if out of range.
    pub fn toggle_visibility(&mut self, index: usize) -> bool {
        match self.get_at_mut(index) {
            Some(shape) => {
                let meta = shape.meta_mut();
                meta.visible = !meta.visible;
                true
            }
            None => false,
        }
    }

    /// Clone the object at `index`, offset by 20px, and append it on top with a fresh id.
    pub fn duplicate(&mut self, index: usize) -> Option<ObjectId> {
        self.duplicate_with_offset(index, DEFAULT_DUPLICATE_OFFSET)
    }

    pub fn duplicate_with_offset(&mut self, index: usize, offset: f64) -> Option<ObjectId> {
        let copy = self.get_at(index)?.clone();
        Some(self.add_copy(copy, offset))
    }

    /// Append a copy of an existing object, offset by `offset` on both axes.
    ///
    /// Nested children are labeled before the copy itself, so no id in the document repeats.
    pub fn add_copy(&mut self, mut copy: Shape, offset: f64) -> ObjectId {
        copy.translate(offset, offset);
        self.label_children(&mut copy);
        self.add_object(copy)
    }

    /// Set the display name of the object at `index`.
    pub fn rename(&mut self, index: usize, name: impl Into<String>) -> bool {
        match self.get_at_mut(index) {
            Some(shape) => {
                shape.meta_mut().name = name.into();
                true
            }
            None => false,
        }
    }

    /// Remove everything, grid included, and restart labeling at 1.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.counter = 0;
    }

    /// Get an object by id.
    pub fn get(&self, id: &ObjectId) -> Option<&Shape> {
        if id.is_grid() {
            return None;
        }
        self.content().iter().find(|s| s.id() == id)
    }

    pub fn get_mut(&mut self, id: &ObjectId) -> Option<&mut Shape> {
        if id.is_grid() {
            return None;
        }
        self.objects.iter_mut().find(|s| s.id() == id)
    }

    /// Stack index of an object.
    pub fn index_of(&self, id: &ObjectId) -> Option<usize> {
        if id.is_grid() {
            return None;
        }
        self.content().iter().position(|s| s.id() == id)
    }

    pub fn get_at(&self, index: usize) -> Option<&Shape> {
        self.content().get(index)
    }

    pub fn get_at_mut(&mut self, index: usize) -> Option<&mut Shape> {
        let offset = self.grid_len();
        self.objects.get_mut(offset..)?.get_mut(index)
    }

    /// Non-grid objects, back to front.
    pub fn objects(&self) -> impl DoubleEndedIterator<Item = &Shape> + ExactSizeIterator {
        self.content().iter()
    }

    pub fn objects_mut(&mut self) -> impl Iterator<Item = &mut Shape> {
        self.objects.iter_mut().filter(|s| !s.is_grid())
    }

    /// Every object including grid lines, in paint order.
    pub fn render_order(&self) -> &[Shape] {
        &self.objects
    }

    /// Number of non-grid objects.
    pub fn len(&self) -> usize {
        self.objects.len() - self.grid_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn grid_line_count(&self) -> usize {
        self.grid_len()
    }

    /// Replace the grid with new lines, placed behind all content.
    pub fn set_grid_lines(&mut self, lines: Vec<Shape>) {
        self.clear_grid();
        let content = std::mem::take(&mut self.objects);
        self.objects = lines
            .into_iter()
            .map(|mut line| {
                *line.meta_mut() = ObjectMeta::grid();
                line
            })
            .collect();
        self.objects.extend(content);
    }

    pub fn clear_grid(&mut self) {
        self.objects.retain(|s| !s.is_grid());
    }

    pub fn background(&self) -> Option<SerializableColor> {
        self.background
    }

    pub fn set_background(&mut self, background: Option<SerializableColor>) {
        self.background = background;
    }

    /// Current value of the labeling counter.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Group the given objects into a single group placed at the frontmost member's slot.
    /// Returns the new group's id, or None if fewer than 2 objects were found.
    pub fn group(&mut self, ids: &[ObjectId]) -> Option<ObjectId> {
        let members: Vec<usize> = self
            .content()
            .iter()
            .enumerate()
            .filter(|(_, s)| ids.contains(s.id()))
            .map(|(i, _)| i)
            .collect();
        let &top = members.last()?;
        if members.len() < 2 {
            return None;
        }

        let offset = self.grid_len();
        let mut children = Vec::with_capacity(members.len());
        for &i in members.iter().rev() {
            children.push(self.objects.remove(offset + i));
        }
        children.reverse();

        let mut group = Shape::Group(Group::new(children));
        let group_id = self.label(&mut group);
        let insert_at = offset + top + 1 - members.len();
        self.objects.insert(insert_at, group);
        Some(group_id)
    }

    /// Replace a group with its children at the group's slot.
    ///
    /// Children without an id, or whose id is already taken, are labeled afresh.
    pub fn ungroup(&mut self, id: &ObjectId) -> Option<Vec<ObjectId>> {
        let index = self.index_of(id)?;
        if !self.get_at(index)?.is_group() {
            return None;
        }
        let offset = self.grid_len();
        let Shape::Group(group) = self.objects.remove(offset + index) else {
            return None;
        };

        let mut taken: HashSet<ObjectId> = self.objects().map(|s| s.id().clone()).collect();
        let mut child_ids = Vec::new();
        for (i, mut child) in group.ungroup().into_iter().enumerate() {
            if child.id().is_unassigned() || child.id().is_grid() || taken.contains(child.id()) {
                self.label(&mut child);
            }
            taken.insert(child.id().clone());
            child_ids.push(child.id().clone());
            self.objects.insert(offset + index + i, child);
        }
        Some(child_ids)
    }

    /// Bounding box of all visible content.
    pub fn bounds(&self) -> Option<Rect> {
        self.objects()
            .filter(|s| s.is_visible())
            .map(Shape::bounds)
            .reduce(|acc, b| acc.union(b))
    }

    /// Ids of visible objects under a point, frontmost first.
    pub fn objects_at_point(&self, point: Point, tolerance: f64) -> Vec<ObjectId> {
        self.objects()
            .rev()
            .filter(|s| s.is_visible() && s.meta().selectable && s.hit_test(point, tolerance))
            .map(|s| s.id().clone())
            .collect()
    }

    /// Capture the background and all non-grid objects in stacking order.
    pub fn serialize(&self) -> DocumentResult<Snapshot> {
        let body = SnapshotRef {
            background: self.background,
            objects: self.objects().collect(),
        };
        let object_count = body.objects.len();
        let json = serde_json::to_string(&body).map_err(DocumentError::Serialize)?;
        Ok(Snapshot { json, object_count })
    }

    /// Replace all non-grid objects and the background with a snapshot's content.
    ///
    /// Grid lines and the labeling counter are left as they are. On error the document
    /// is untouched.
    pub fn restore(&mut self, snapshot: &Snapshot) -> DocumentResult<()> {
        let body: SnapshotBody =
            serde_json::from_str(&snapshot.json).map_err(DocumentError::Restore)?;

        self.clear_content();
        self.objects
            .extend(body.objects.into_iter().filter(|s| !s.is_grid()));
        self.background = body.background;
        Ok(())
    }

    fn clear_content(&mut self) {
        self.objects.retain(Shape::is_grid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Ellipse, Line, Rectangle};

    fn rect(x: f64) -> Shape {
        Shape::Rectangle(Rectangle::new(Point::new(x, 0.0), 10.0, 10.0))
    }

    fn ids(doc: &Document) -> Vec<String> {
        doc.objects().map(|s| s.id().to_string()).collect()
    }

    fn doc_with(n: usize) -> Document {
        let mut doc = Document::new();
        for i in 0..n {
            doc.add_object(rect(i as f64 * 20.0));
        }
        doc
    }

    fn grid_line() -> Shape {
        Shape::Line(Line::new(Point::new(0.0, 0.0), Point::new(0.0, 100.0)))
    }

    #[test]
    fn test_labeling() {
        let mut doc = Document::new();
        let a = doc.add_object(rect(0.0));
        let b = doc.add_object(Shape::Ellipse(Ellipse::circle(Point::ZERO, 5.0)));
        assert_eq!(a.as_str(), "Rectángulo-1");
        assert_eq!(b.as_str(), "Círculo-2");
        assert_eq!(doc.get(&a).map(Shape::name), Some("Rectángulo-1"));
    }

    #[test]
    fn test_counter_not_reused_after_removal() {
        let mut doc = doc_with(2);
        doc.remove_object(&ObjectId::new("Rectángulo-2"));
        let id = doc.add_object(rect(0.0));
        assert_eq!(id.as_str(), "Rectángulo-3");
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut doc = doc_with(1);
        assert!(doc.remove_object(&ObjectId::new("nope")).is_none());
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_reorder() {
        let mut doc = doc_with(3);
        assert!(doc.reorder(0, 2));
        assert_eq!(ids(&doc), ["Rectángulo-2", "Rectángulo-3", "Rectángulo-1"]);
        assert!(!doc.reorder(1, 1));
        assert!(!doc.reorder(0, 3));
        assert!(!doc.reorder(5, 0));
    }

    #[test]
    fn test_move_boundaries_are_noops() {
        let mut doc = doc_with(3);
        assert!(!doc.move_up(0));
        assert!(!doc.move_to_front(0));
        assert!(!doc.move_down(2));
        assert!(!doc.move_to_back(2));
        assert_eq!(ids(&doc), ["Rectángulo-1", "Rectángulo-2", "Rectángulo-3"]);
    }

    #[test]
    fn test_move_wrappers() {
        let mut doc = doc_with(3);
        assert!(doc.move_up(2));
        assert_eq!(ids(&doc), ["Rectángulo-1", "Rectángulo-3", "Rectángulo-2"]);
        assert!(doc.move_down(0));
        assert_eq!(ids(&doc), ["Rectángulo-3", "Rectángulo-1", "Rectángulo-2"]);
        assert!(doc.move_to_front(2));
        assert_eq!(ids(&doc), ["Rectángulo-2", "Rectángulo-3", "Rectángulo-1"]);
    }

    #[test]
    fn test_back_then_front_restores_order() {
        let mut doc = doc_with(4);
        let before = ids(&doc);
        assert!(doc.move_to_back(0));
        assert!(doc.move_to_front(3));
        assert_eq!(ids(&doc), before);
    }

    #[test]
    fn test_reorder_keeps_grid_in_front_of_vector() {
        let mut doc = doc_with(2);
        doc.set_grid_lines(vec![grid_line(), grid_line()]);
        assert!(doc.reorder(1, 0));
        assert_eq!(doc.grid_line_count(), 2);
        assert!(doc.render_order()[0].is_grid());
        assert!(doc.render_order()[1].is_grid());
        assert_eq!(doc.len(), 2);
        assert_eq!(ids(&doc), ["Rectángulo-2", "Rectángulo-1"]);
    }

    #[test]
    fn test_grid_excluded_from_lookups() {
        let mut doc = doc_with(1);
        doc.set_grid_lines(vec![grid_line()]);
        assert!(doc.get(&ObjectId::grid()).is_none());
        assert!(doc.remove_object(&ObjectId::grid()).is_none());
        assert_eq!(doc.get_at(0).map(|s| s.id().as_str()), Some("Rectángulo-1"));
        assert!(doc.objects_at_point(Point::new(0.0, 50.0), 2.0).is_empty());
    }

    #[test]
    fn test_duplicate_offsets_and_relabels() {
        let mut doc = doc_with(1);
        let copy = doc.duplicate(0).unwrap();
        assert_eq!(copy.as_str(), "Rectángulo-2");
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.get(&copy).unwrap().position(), Point::new(20.0, 20.0));
        assert!(doc.duplicate(7).is_none());
    }

    #[test]
    fn test_duplicate_group_relabels_children() {
        let mut doc = doc_with(2);
        let group = doc
            .group(&[ObjectId::new("Rectángulo-1"), ObjectId::new("Rectángulo-2")])
            .unwrap();
        let copy = doc.duplicate(0).unwrap();
        assert_ne!(copy, group);

        let children: Vec<&str> = doc
            .get(&copy)
            .and_then(Shape::as_group)
            .unwrap()
            .children()
            .iter()
            .map(|s| s.id().as_str())
            .collect();
        assert_eq!(children, ["Rectángulo-4", "Rectángulo-5"]);
        assert_eq!(copy.as_str(), "Grupo-6");
        assert_eq!(doc.get(&copy).unwrap().position(), Point::new(20.0, 20.0));
    }

    #[test]
    fn test_move_past_end_does_not_overflow() {
        let mut doc = doc_with(2);
        assert!(!doc.move_down(usize::MAX));
        assert!(!doc.move_to_back(usize::MAX));
        let mut empty = Document::new();
        assert!(!empty.move_down(0));
        assert!(!empty.move_to_back(0));
    }

    #[test]
    fn test_toggle_visibility_and_rename() {
        let mut doc = doc_with(1);
        assert!(doc.toggle_visibility(0));
        assert!(!doc.get_at(0).unwrap().is_visible());
        assert!(!doc.toggle_visibility(3));
        assert!(doc.rename(0, "Fondo"));
        assert_eq!(doc.get_at(0).unwrap().name(), "Fondo");
        assert_eq!(doc.get_at(0).unwrap().id().as_str(), "Rectángulo-1");
    }

    #[test]
    fn test_clear_resets_counter() {
        let mut doc = doc_with(3);
        doc.set_grid_lines(vec![grid_line()]);
        doc.clear();
        assert_eq!(doc.render_order().len(), 0);
        assert_eq!(doc.add_object(rect(0.0)).as_str(), "Rectángulo-1");
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut doc = doc_with(2);
        doc.set_grid_lines(vec![grid_line()]);
        doc.set_background(None);
        let snapshot = doc.serialize().unwrap();
        assert_eq!(snapshot.object_count(), 2);

        doc.remove_at(0);
        doc.set_background(Some(SerializableColor::black()));
        doc.restore(&snapshot).unwrap();

        assert_eq!(ids(&doc), ["Rectángulo-1", "Rectángulo-2"]);
        assert_eq!(doc.background(), None);
        assert_eq!(doc.grid_line_count(), 1);
    }

    #[test]
    fn test_group_and_ungroup() {
        let mut doc = doc_with(4);
        let a = ObjectId::new("Rectángulo-2");
        let b = ObjectId::new("Rectángulo-3");
        let group = doc.group(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(group.as_str(), "Grupo-5");
        assert_eq!(ids(&doc), ["Rectángulo-1", "Grupo-5", "Rectángulo-4"]);

        let children = doc.ungroup(&group).unwrap();
        assert_eq!(children, vec![a, b]);
        assert_eq!(
            ids(&doc),
            ["Rectángulo-1", "Rectángulo-2", "Rectángulo-3", "Rectángulo-4"]
        );
    }

    #[test]
    fn test_group_needs_two() {
        let mut doc = doc_with(2);
        assert!(doc.group(&[ObjectId::new("Rectángulo-1")]).is_none());
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_ungroup_labels_anonymous_children() {
        let mut doc = Document::new();
        let group = doc.add_object(Shape::Group(Group::new(vec![rect(0.0), rect(30.0)])));
        let children = doc.ungroup(&group).unwrap();
        assert_eq!(children[0].as_str(), "Rectángulo-2");
        assert_eq!(children[1].as_str(), "Rectángulo-3");
    }

    #[test]
    fn test_objects_at_point_front_first() {
        let mut doc = Document::new();
        doc.add_object(rect(0.0));
        doc.add_object(rect(5.0));
        let hits = doc.objects_at_point(Point::new(7.0, 5.0), 0.0);
        assert_eq!(hits[0].as_str(), "Rectángulo-2");
        assert_eq!(hits.len(), 2);
    }
}
