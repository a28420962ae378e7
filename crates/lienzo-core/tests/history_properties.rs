//! Undo/redo and layer ordering behavior seen through the public API.

use kurbo::{Point, Size};
use lienzo_core::shapes::{Ellipse, Line, Rectangle};
use lienzo_core::{
    Document, EditorConfig, EditorSession, HistoryLog, Shape, drop_reorder, grid_lines,
    layer_list,
};

fn rect(x: f64) -> Shape {
    Shape::Rectangle(Rectangle::new(Point::new(x, 0.0), 10.0, 10.0))
}

fn order(doc: &Document) -> Vec<String> {
    doc.objects().map(|s| s.id().to_string()).collect()
}

#[test]
fn undo_at_oldest_entry_changes_nothing() {
    let mut session = EditorSession::default();
    session.add_object(rect(0.0));
    assert!(session.undo());
    let before = session.document().serialize().unwrap();
    let cursor = session.history().cursor();

    assert!(!session.undo());
    assert!(!session.undo());
    assert_eq!(session.document().serialize().unwrap(), before);
    assert_eq!(session.history().cursor(), cursor);
}

#[test]
fn redo_at_newest_entry_changes_nothing() {
    let mut session = EditorSession::default();
    session.add_object(rect(0.0));
    let before = session.document().serialize().unwrap();
    assert!(!session.redo());
    assert_eq!(session.document().serialize().unwrap(), before);
}

#[test]
fn edit_after_undo_prunes_redo_branch() {
    let mut session = EditorSession::default();
    session.add_object(rect(0.0));
    session.add_object(rect(20.0));
    session.add_object(rect(40.0));
    session.undo();
    session.undo();

    session.add_object(Shape::Ellipse(Ellipse::circle(Point::new(50.0, 50.0), 10.0)));
    assert!(!session.history().can_redo());
    assert!(!session.redo());
    assert_eq!(order(session.document()), ["Rectángulo-1", "Círculo-4"]);
}

#[test]
fn capacity_keeps_newest_entries() {
    let config = EditorConfig {
        history_capacity: 4,
        ..EditorConfig::default()
    };
    let mut session = EditorSession::new(config);
    for i in 0..10 {
        session.add_object(rect(i as f64));
    }
    assert_eq!(session.history().len(), 4);
    assert_eq!(session.history().cursor(), Some(3));

    let mut undos = 0;
    while session.undo() {
        undos += 1;
    }
    assert_eq!(undos, 3);
    assert_eq!(session.document().len(), 7);
}

#[test]
fn snapshot_round_trip_restores_equal_content() {
    let mut doc = Document::new();
    doc.add_object(rect(0.0));
    doc.add_object(Shape::Line(Line::new(Point::ZERO, Point::new(30.0, 40.0))));
    doc.rename(0, "Fondo");
    doc.toggle_visibility(1);
    let snapshot = doc.serialize().unwrap();

    let mut other = Document::new();
    other.add_object(rect(99.0));
    other.restore(&snapshot).unwrap();

    assert_eq!(other.serialize().unwrap(), snapshot);
    assert_eq!(other.get_at(0).map(Shape::name), Some("Fondo"));
    assert!(!other.get_at(1).unwrap().is_visible());
}

#[test]
fn history_log_restores_every_step() {
    let mut doc = Document::new();
    let mut history = HistoryLog::new(10);
    history.save(&doc).unwrap();
    for i in 0..3 {
        doc.add_object(rect(i as f64));
        history.save(&doc).unwrap();
    }
    for expected in (0..3).rev() {
        assert!(history.undo(&mut doc));
        assert_eq!(doc.len(), expected);
    }
    for expected in 1..=3 {
        assert!(history.redo(&mut doc));
        assert_eq!(doc.len(), expected);
    }
}

#[test]
fn panel_drop_matches_stack_reorder() {
    let mut by_drop = Document::new();
    let mut by_stack = Document::new();
    for i in 0..5 {
        by_drop.add_object(rect(i as f64));
        by_stack.add_object(rect(i as f64));
    }
    let n = by_drop.len();
    for (old, new) in [(0, 4), (3, 1), (2, 0), (4, 2)] {
        assert!(drop_reorder(&mut by_drop, old, new));
        assert!(by_stack.reorder(n - 1 - old, n - 1 - new));
        assert_eq!(order(&by_drop), order(&by_stack));
    }
}

#[test]
fn layer_list_is_reverse_of_stack() {
    let mut doc = Document::new();
    for i in 0..3 {
        doc.add_object(rect(i as f64));
    }
    let names: Vec<String> = layer_list(&doc, &[]).into_iter().map(|l| l.name).collect();
    let mut stack = order(&doc);
    stack.reverse();
    assert_eq!(names, stack);
}

#[test]
fn grid_never_reaches_users() {
    let mut doc = Document::new();
    doc.add_object(rect(0.0));
    doc.add_object(rect(10.0));
    doc.set_grid_lines(grid_lines(Size::new(100.0, 100.0), 20.0));
    let grid = doc.grid_line_count();
    assert!(grid > 0);

    assert_eq!(doc.len(), 2);
    assert_eq!(layer_list(&doc, &[]).len(), 2);
    assert!(doc.reorder(0, 1));
    assert!(doc.duplicate(0).is_some());
    assert!(doc.objects().all(|s| !s.is_grid()));

    let snapshot = doc.serialize().unwrap();
    assert_eq!(snapshot.object_count(), 3);
    doc.clear_grid();
    doc.restore(&snapshot).unwrap();
    assert_eq!(doc.grid_line_count(), 0);

    doc.set_grid_lines(grid_lines(Size::new(100.0, 100.0), 20.0));
    doc.restore(&snapshot).unwrap();
    assert_eq!(doc.grid_line_count(), grid);
    assert!(doc.render_order()[..grid].iter().all(Shape::is_grid));
}

#[test]
fn duplicate_offsets_by_twenty() {
    let mut session = EditorSession::default();
    session.add_object(Shape::Rectangle(Rectangle::new(Point::new(35.0, 45.0), 10.0, 10.0)));
    let copy = session.duplicate(0).unwrap();

    let doc = session.document();
    let original = doc.get_at(0).unwrap();
    let duplicate = doc.get(&copy).unwrap();
    assert_ne!(original.id(), duplicate.id());
    assert_eq!(duplicate.position(), Point::new(55.0, 65.0));
    assert_eq!(doc.index_of(&copy), Some(1));
}

#[test]
fn labels_are_never_reused_after_undo() {
    let mut session = EditorSession::default();
    session.add_object(rect(0.0));
    session.add_object(rect(10.0));
    session.undo();
    let id = session.add_object(rect(20.0));
    assert_eq!(id.as_str(), "Rectángulo-3");
}

#[test]
fn move_to_back_then_front_is_identity() {
    let mut session = EditorSession::default();
    for i in 0..4 {
        session.add_object(rect(i as f64));
    }
    let before = order(session.document());
    assert!(session.move_to_back(0));
    assert!(session.move_to_front(3));
    assert_eq!(order(session.document()), before);
    assert!(!session.move_up(0));
    assert!(!session.move_down(3));
}
