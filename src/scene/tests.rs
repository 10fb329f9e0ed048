use super::*;
use crate::draw::{Color, ResizeHandle};
use crate::util::{Point, Rect};
use std::sync::Arc;

fn rect_shape(x1: f64, y1: f64, x2: f64, y2: f64) -> Shape {
    Shape::Rectangle {
        top_left: Point::new(x1, y1),
        bottom_right: Point::new(x2, y2),
        fill: None,
        stroke: Color::rgb(255, 0, 0),
        stroke_width: 2.0,
        corner_radius: 0.0,
    }
}

fn marker(document: &Document, x: f64) -> Shape {
    Shape::NumberMarker {
        center: Point::new(x, 10.0),
        index: document.scene().next_marker_index(),
        color: Color::rgb(0, 0, 255),
        radius: 8.0,
    }
}

fn marker_index(document: &Document, id: AnnotationId) -> u32 {
    match document.scene().get(id).map(|a| &a.shape) {
        Some(Shape::NumberMarker { index, .. }) => *index,
        other => panic!("expected a marker, found {other:?}"),
    }
}

/// Asserts that undo restores `before` and redo restores `after`.
fn assert_round_trip(document: &mut Document, before: &Scene) {
    let after = document.scene().clone();
    assert!(document.undo().unwrap());
    assert_eq!(document.scene(), before);
    assert!(document.redo().unwrap());
    assert_eq!(document.scene(), &after);
}

#[test]
fn insert_assigns_increasing_ids() {
    let mut document = Document::default();
    let a = document.insert(rect_shape(0.0, 0.0, 5.0, 5.0)).unwrap();
    let b = document.insert(rect_shape(1.0, 1.0, 5.0, 5.0)).unwrap();
    assert!(b > a);
    assert_eq!(document.scene().len(), 2);
    assert_eq!(document.scene().annotations()[1].id, b);
}

#[test]
fn undo_redo_round_trips_every_command() {
    let mut document = Document::default();

    let before = document.scene().clone();
    let a = document.insert(rect_shape(0.0, 0.0, 10.0, 10.0)).unwrap();
    assert_round_trip(&mut document, &before);

    let b = document.insert(rect_shape(5.0, 5.0, 20.0, 20.0)).unwrap();
    let c = document.insert(rect_shape(8.0, 8.0, 30.0, 30.0)).unwrap();

    let before = document.scene().clone();
    document.update(b, rect_shape(1.0, 2.0, 3.0, 4.0)).unwrap();
    assert_round_trip(&mut document, &before);

    let before = document.scene().clone();
    document.reorder(c, 0).unwrap();
    assert_eq!(document.scene().index_of(c), Some(0));
    assert_round_trip(&mut document, &before);

    let before = document.scene().clone();
    document.reorder(c, 99).unwrap();
    assert_eq!(document.scene().index_of(c), Some(2));
    assert_round_trip(&mut document, &before);

    document.select(Some(a)).unwrap();
    let before = document.scene().clone();
    document.remove(a).unwrap();
    assert_eq!(document.scene().selection(), None);
    assert_round_trip(&mut document, &before);
    assert_eq!(document.scene().index_of(b), Some(0));

    let before = document.scene().clone();
    document
        .set_background(Background::Solid {
            color: Color::rgb(1, 2, 3),
        })
        .unwrap();
    assert_round_trip(&mut document, &before);

    document.select(Some(c)).unwrap();
    let before = document.scene().clone();
    assert!(document.clear_annotations().unwrap());
    assert!(document.scene().is_empty());
    assert_eq!(document.scene().selection(), None);
    assert_round_trip(&mut document, &before);

    let before = document.scene().clone();
    document
        .set_frame_config(FrameConfig {
            padding: 3,
            ..FrameConfig::default()
        })
        .unwrap();
    assert_round_trip(&mut document, &before);
}

#[test]
fn undo_restores_removed_annotation_at_its_index() {
    let mut document = Document::default();
    let a = document.insert(rect_shape(0.0, 0.0, 1.0, 1.0)).unwrap();
    let b = document.insert(rect_shape(0.0, 0.0, 2.0, 2.0)).unwrap();
    let c = document.insert(rect_shape(0.0, 0.0, 3.0, 3.0)).unwrap();
    document.remove(b).unwrap();
    document.undo().unwrap();
    let order: Vec<_> = document.scene().annotations().iter().map(|a| a.id).collect();
    assert_eq!(order, vec![a, b, c]);
}

#[test]
fn drag_preview_commits_as_single_replace() {
    let mut document = Document::default();
    let id = document.insert(rect_shape(0.0, 0.0, 10.0, 10.0)).unwrap();
    let before = document.scene().clone();
    let original = document.scene().get(id).unwrap().shape.clone();

    for step in 1..=5 {
        let mut shape = original.clone();
        shape.translate(step as f64, 0.0);
        document.preview_update(id, shape).unwrap();
    }
    assert_eq!(document.history().undo_len(), 1);
    assert!(document.commit_preview(id, original).unwrap());
    assert_eq!(document.history().undo_len(), 2);

    assert_round_trip(&mut document, &before);
}

#[test]
fn commit_without_movement_records_nothing() {
    let mut document = Document::default();
    let id = document.insert(rect_shape(0.0, 0.0, 10.0, 10.0)).unwrap();
    let original = document.scene().get(id).unwrap().shape.clone();
    assert!(!document.commit_preview(id, original).unwrap());
    assert_eq!(document.history().undo_len(), 1);
}

#[test]
fn new_edit_after_undo_clears_redo() {
    let mut document = Document::default();
    let _a = document.insert(rect_shape(0.0, 0.0, 1.0, 1.0)).unwrap();
    let b = document.insert(rect_shape(0.0, 0.0, 2.0, 2.0)).unwrap();
    document.undo().unwrap();
    let _c = document.insert(rect_shape(0.0, 0.0, 3.0, 3.0)).unwrap();

    assert!(!document.can_redo());
    assert!(!document.redo().unwrap());
    assert!(!document.scene().contains(b));
    assert_eq!(document.scene().len(), 2);
}

#[test]
fn undo_and_redo_on_empty_history_are_noops() {
    let mut document = Document::default();
    let before = document.scene().clone();
    assert!(!document.undo().unwrap());
    assert!(!document.redo().unwrap());
    assert_eq!(document.scene(), &before);
}

#[test]
fn unknown_ids_are_reported() {
    let mut document = Document::default();
    let ghost = AnnotationId(42);
    assert!(matches!(
        document.remove(ghost),
        Err(EngineError::UnknownAnnotationId(id)) if id == ghost
    ));
    assert!(document.select(Some(ghost)).is_err());
    assert!(document.update(ghost, rect_shape(0.0, 0.0, 1.0, 1.0)).is_err());
    assert!(document.reorder(ghost, 0).is_err());
    assert!(!document.can_undo());
}

#[test]
fn ids_are_not_reused_after_undo() {
    let mut document = Document::default();
    let a = document.insert(rect_shape(0.0, 0.0, 1.0, 1.0)).unwrap();
    document.undo().unwrap();
    let b = document.insert(rect_shape(0.0, 0.0, 1.0, 1.0)).unwrap();
    assert_ne!(a, b);
}

#[test]
fn marker_numbers_survive_deletion() {
    let mut document = Document::default();
    let first = document.insert(marker(&document, 10.0)).unwrap();
    let second = document.insert(marker(&document, 30.0)).unwrap();
    let third = document.insert(marker(&document, 50.0)).unwrap();
    assert_eq!(marker_index(&document, first), 1);
    assert_eq!(marker_index(&document, second), 2);

    document.remove(second).unwrap();
    assert_eq!(marker_index(&document, third), 3);

    let fourth = document.insert(marker(&document, 70.0)).unwrap();
    assert_eq!(marker_index(&document, fourth), 4);
}

#[test]
fn image_background_round_trips_by_identity() {
    let mut document = Document::default();
    let source = Arc::new(crate::draw::Raster::filled(2, 2, Color::rgb(0, 0, 0)).unwrap());
    let before = document.scene().clone();
    document
        .set_background(Background::Image { source })
        .unwrap();
    assert_round_trip(&mut document, &before);
}

#[test]
fn hit_test_returns_topmost_overlapping_rect() {
    let mut document = Document::default();
    let _bottom = document.insert(rect_shape(10.0, 10.0, 50.0, 50.0)).unwrap();
    let top = document.insert(rect_shape(10.0, 10.0, 50.0, 50.0)).unwrap();

    assert_eq!(hit_test(document.scene(), Point::new(30.0, 30.0)), Some(top));
    assert_eq!(hit_test(document.scene(), Point::new(200.0, 5.0)), None);
}

#[test]
fn stroke_hits_use_width_and_slack() {
    let mut document = Document::default();
    let pen = document
        .insert(Shape::Pen {
            points: vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)],
            color: Color::rgb(0, 0, 0),
            width: 4.0,
        })
        .unwrap();
    assert_eq!(hit_test(document.scene(), Point::new(50.0, 5.5)), Some(pen));
    assert_eq!(hit_test(document.scene(), Point::new(50.0, 7.0)), None);
}

#[test]
fn ellipse_corners_are_not_hits() {
    let mut document = Document::default();
    let ellipse = document
        .insert(Shape::Ellipse {
            bounds: Rect::new(0.0, 0.0, 100.0, 50.0),
            fill: None,
            stroke: Color::rgb(0, 0, 0),
            stroke_width: 2.0,
        })
        .unwrap();
    assert_eq!(hit_test(document.scene(), Point::new(50.0, 25.0)), Some(ellipse));
    assert_eq!(hit_test(document.scene(), Point::new(3.0, 3.0)), None);
}

#[test]
fn handle_test_finds_corners_and_endpoints() {
    let mut document = Document::default();
    let rect = document.insert(rect_shape(10.0, 10.0, 50.0, 40.0)).unwrap();
    let line = document
        .insert(Shape::Line {
            start: Point::new(0.0, 100.0),
            end: Point::new(80.0, 100.0),
            color: Color::rgb(0, 0, 0),
            width: 2.0,
            arrow_head: false,
            head_size: 20.0,
        })
        .unwrap();

    let rect = document.scene().get(rect).unwrap();
    assert_eq!(
        handle_test(rect, Point::new(49.0, 41.0), 3.0),
        Some(ResizeHandle::BottomRight)
    );
    assert_eq!(handle_test(rect, Point::new(30.0, 25.0), 3.0), None);

    let line = document.scene().get(line).unwrap();
    assert_eq!(
        handle_test(line, Point::new(79.0, 100.0), 3.0),
        Some(ResizeHandle::End)
    );
}

#[test]
fn clearing_keeps_counters_moving_forward() {
    let mut document = Document::default();
    let first = document.insert(marker(&document, 10.0)).unwrap();
    document.insert(marker(&document, 30.0)).unwrap();
    assert!(document.clear_annotations().unwrap());
    assert!(!document.clear_annotations().unwrap());
    assert_eq!(document.history().undo_len(), 3);

    let next = document.insert(marker(&document, 50.0)).unwrap();
    assert!(next > first);
    assert_eq!(marker_index(&document, next), 3);

    // Restoring the cleared markers must not collide with the new id.
    document.undo().unwrap();
    document.undo().unwrap();
    assert_eq!(document.scene().len(), 2);
    assert_eq!(marker_index(&document, first), 1);
}

#[test]
fn retracted_insert_leaves_no_history() {
    let mut document = Document::default();
    let a = document.insert(rect_shape(0.0, 0.0, 5.0, 5.0)).unwrap();
    let before = document.scene().clone();
    let b = document.insert(rect_shape(1.0, 1.0, 5.0, 5.0)).unwrap();
    document.select(Some(b)).unwrap();

    document.retract_insert(b).unwrap();
    assert_eq!(document.scene(), &before);
    assert_eq!(document.history().undo_len(), 1);
    assert!(!document.can_redo());

    // Not the latest insert: falls back to an undoable remove.
    document.update(a, rect_shape(0.0, 0.0, 9.0, 9.0)).unwrap();
    document.retract_insert(a).unwrap();
    assert!(document.scene().is_empty());
    assert_eq!(document.history().undo_len(), 3);
    document.undo().unwrap();
    assert!(document.scene().contains(a));
}
