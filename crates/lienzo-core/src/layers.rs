//! Layer panel model.
//!
//! The panel lists objects topmost first, the reverse of stacking order. A display index
//! `d` maps to stack index `(count - 1) - d`.

use crate::document::Document;
use crate::shapes::{ObjectId, ShapeKind};

/// One row of the layer panel.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerEntry {
    /// Row position, 0 = topmost object.
    pub display_index: usize,
    /// Position in the document's stacking order, 0 = back-most.
    pub stack_index: usize,
    pub id: ObjectId,
    pub name: String,
    pub kind: ShapeKind,
    pub visible: bool,
    pub selected: bool,
}

/// Convert a panel row into a stack index.
pub fn display_to_stack(count: usize, display_index: usize) -> Option<usize> {
    (display_index < count).then(|| count - 1 - display_index)
}

/// Convert a stack index into a panel row.
pub fn stack_to_display(count: usize, stack_index: usize) -> Option<usize> {
    display_to_stack(count, stack_index)
}

/// Build the panel rows, topmost object first.
pub fn layer_list(document: &Document, selection: &[ObjectId]) -> Vec<LayerEntry> {
    let count = document.len();
    document
        .objects()
        .enumerate()
        .rev()
        .map(|(stack_index, shape)| LayerEntry {
            display_index: count - 1 - stack_index,
            stack_index,
            id: shape.id().clone(),
            name: shape.name().to_string(),
            kind: shape.kind(),
            visible: shape.is_visible(),
            selected: selection.contains(shape.id()),
        })
        .collect()
}

/// Apply a drag-and-drop move from one panel row to another.
pub fn drop_reorder(document: &mut Document, old_display: usize, new_display: usize) -> bool {
    let count = document.len();
    match (
        display_to_stack(count, old_display),
        display_to_stack(count, new_display),
    ) {
        (Some(from), Some(to)) => document.reorder(from, to),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Rectangle, Shape};
    use kurbo::Point;

    fn doc_with(n: usize) -> Document {
        let mut doc = Document::new();
        for _ in 0..n {
            doc.add_object(Shape::Rectangle(Rectangle::new(Point::ZERO, 10.0, 10.0)));
        }
        doc
    }

    #[test]
    fn test_index_conversion() {
        assert_eq!(display_to_stack(3, 0), Some(2));
        assert_eq!(display_to_stack(3, 2), Some(0));
        assert_eq!(display_to_stack(3, 3), None);
        assert_eq!(stack_to_display(3, 2), Some(0));
        assert_eq!(display_to_stack(0, 0), None);
    }

    #[test]
    fn test_layer_list_is_reversed() {
        let doc = doc_with(3);
        let selection = vec![ObjectId::new("Rectángulo-1")];
        let layers = layer_list(&doc, &selection);

        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0].id.as_str(), "Rectángulo-3");
        assert_eq!(layers[0].display_index, 0);
        assert_eq!(layers[0].stack_index, 2);
        assert!(layers[2].selected);
        assert!(!layers[0].selected);
    }

    #[test]
    fn test_drop_reorder_top_row_to_bottom() {
        let mut doc = doc_with(3);
        // Drag the topmost row to the bottom of the panel
        assert!(drop_reorder(&mut doc, 0, 2));
        let order: Vec<_> = doc.objects().map(|s| s.id().to_string()).collect();
        assert_eq!(order, ["Rectángulo-3", "Rectángulo-1", "Rectángulo-2"]);
        assert!(!drop_reorder(&mut doc, 1, 1));
        assert!(!drop_reorder(&mut doc, 0, 9));
    }
}
