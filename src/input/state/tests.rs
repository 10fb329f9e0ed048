use super::*;
use crate::draw::{Color, ResizeHandle, Shape};
use crate::input::{Key, MouseButton, Tool};
use crate::scene::{AnnotationId, Document, hit_test};
use crate::util::Point;

fn setup(tool: Tool) -> (InputState, Document) {
    let mut document = Document::default();
    let mut input = InputState::default();
    input.set_tool(&mut document, tool).unwrap();
    (input, document)
}

fn drag(input: &mut InputState, document: &mut Document, from: (f64, f64), to: (f64, f64)) {
    let from = Point::new(from.0, from.1);
    let to = Point::new(to.0, to.1);
    input
        .on_mouse_press(document, MouseButton::Left, from)
        .unwrap();
    input.on_mouse_motion(document, to).unwrap();
    input
        .on_mouse_release(document, MouseButton::Left, to)
        .unwrap();
}

fn click(input: &mut InputState, document: &mut Document, at: (f64, f64)) {
    drag(input, document, at, at);
}

fn press_keys(input: &mut InputState, document: &mut Document, keys: &[Key]) {
    for key in keys {
        input.on_key_press(document, *key).unwrap();
        input.on_key_release(*key);
    }
}

fn ctrl(input: &mut InputState, document: &mut Document, c: char) {
    input.on_key_press(document, Key::Ctrl).unwrap();
    input.on_key_press(document, Key::Char(c)).unwrap();
    input.on_key_release(Key::Char(c));
    input.on_key_release(Key::Ctrl);
}

fn only_id(document: &Document) -> AnnotationId {
    assert_eq!(document.scene().len(), 1);
    document.scene().annotations()[0].id
}

fn only_text(document: &Document) -> AnnotationId {
    let texts: Vec<_> = document
        .scene()
        .annotations()
        .iter()
        .filter(|a| matches!(a.shape, Shape::Text { .. }))
        .map(|a| a.id)
        .collect();
    assert_eq!(texts.len(), 1);
    texts[0]
}

fn text_of(document: &Document, id: AnnotationId) -> String {
    match &document.scene().get(id).unwrap().shape {
        Shape::Text { content, .. } => content.clone(),
        other => panic!("expected text, found {other:?}"),
    }
}

#[test]
fn square_tool_inserts_normalized_rectangle() {
    let (mut input, mut document) = setup(Tool::Square);
    drag(&mut input, &mut document, (40.0, 30.0), (10.0, 5.0));

    let id = only_id(&document);
    match &document.scene().get(id).unwrap().shape {
        Shape::Rectangle {
            top_left,
            bottom_right,
            stroke,
            ..
        } => {
            assert_eq!(*top_left, Point::new(10.0, 5.0));
            assert_eq!(*bottom_right, Point::new(40.0, 30.0));
            assert_eq!(*stroke, input.style.color);
        }
        other => panic!("expected rectangle, found {other:?}"),
    }
    assert_eq!(input.state, DrawingState::Idle);
    assert!(input.in_progress_shape().is_none());
}

#[test]
fn shift_constrains_square_tool() {
    let (mut input, mut document) = setup(Tool::Square);
    input.on_key_press(&mut document, Key::Shift).unwrap();
    drag(&mut input, &mut document, (0.0, 0.0), (30.0, 10.0));

    let frame = document.scene().annotations()[0].shape.frame();
    assert_eq!((frame.width, frame.height), (30.0, 30.0));
}

#[test]
fn drawing_exposes_in_progress_shape() {
    let (mut input, mut document) = setup(Tool::Pen);
    input
        .on_mouse_press(&mut document, MouseButton::Left, Point::new(1.0, 1.0))
        .unwrap();
    input
        .on_mouse_motion(&mut document, Point::new(5.0, 1.0))
        .unwrap();
    input
        .on_mouse_motion(&mut document, Point::new(9.0, 4.0))
        .unwrap();

    match input.in_progress_shape() {
        Some(Shape::Pen { points, .. }) => assert_eq!(points.len(), 3),
        other => panic!("expected pen preview, found {other:?}"),
    }
    assert!(document.scene().is_empty());
}

#[test]
fn zero_area_gestures_are_discarded() {
    for tool in [
        Tool::Square,
        Tool::Circle,
        Tool::Line,
        Tool::Arrow,
        Tool::Censor,
        Tool::Pen,
        Tool::Highlighter,
    ] {
        let (mut input, mut document) = setup(tool);
        click(&mut input, &mut document, (20.0, 20.0));
        assert!(document.scene().is_empty(), "{} kept an empty shape", tool.name());
        assert!(!document.can_undo());
        assert_eq!(input.state, DrawingState::Idle);
    }
}

#[test]
fn number_tool_places_sequential_markers() {
    let (mut input, mut document) = setup(Tool::Number);
    click(&mut input, &mut document, (10.0, 10.0));
    click(&mut input, &mut document, (40.0, 10.0));

    let indices: Vec<u32> = document
        .scene()
        .annotations()
        .iter()
        .map(|a| match a.shape {
            Shape::NumberMarker { index, .. } => index,
            _ => 0,
        })
        .collect();
    assert_eq!(indices, vec![1, 2]);

    let last = document.scene().annotations()[1].id;
    assert_eq!(input.state, DrawingState::Selected { id: last });
    assert_eq!(document.scene().selection(), Some(last));
}

#[test]
fn text_tool_edits_and_commits() {
    let (mut input, mut document) = setup(Tool::Text);
    click(&mut input, &mut document, (5.0, 5.0));

    let id = only_id(&document);
    assert!(input.is_editing_text());
    assert_eq!(document.scene().selection(), Some(id));

    press_keys(
        &mut input,
        &mut document,
        &[Key::Char('H'), Key::Char('i'), Key::Char('x'), Key::Backspace],
    );
    input.on_key_press(&mut document, Key::Shift).unwrap();
    input.on_key_press(&mut document, Key::Return).unwrap();
    input.on_key_release(Key::Shift);
    press_keys(&mut input, &mut document, &[Key::Char('!'), Key::Return]);

    assert_eq!(text_of(&document, id), "Hi\n!");
    assert_eq!(input.state, DrawingState::Selected { id });
    // Insert plus one edit.
    assert_eq!(document.history().undo_len(), 2);

    ctrl(&mut input, &mut document, 'z');
    assert_eq!(text_of(&document, id), "");
}

#[test]
fn return_on_selected_text_reenters_editing() {
    let (mut input, mut document) = setup(Tool::Text);
    click(&mut input, &mut document, (5.0, 5.0));
    press_keys(&mut input, &mut document, &[Key::Char('a'), Key::Escape]);
    let id = only_id(&document);

    press_keys(&mut input, &mut document, &[Key::Return, Key::Char('b'), Key::Return]);
    assert_eq!(text_of(&document, id), "ab");
    assert_eq!(document.history().undo_len(), 3);
}

#[test]
fn abandoned_text_box_leaves_nothing_behind() {
    let (mut input, mut document) = setup(Tool::Square);
    drag(&mut input, &mut document, (40.0, 40.0), (60.0, 60.0));
    input.set_tool(&mut document, Tool::Text).unwrap();
    let before = document.scene().clone();

    click(&mut input, &mut document, (5.0, 5.0));
    press_keys(&mut input, &mut document, &[Key::Space, Key::Escape]);

    assert_eq!(document.scene(), &before);
    assert_eq!(document.history().undo_len(), 1);
    assert_eq!(input.state, DrawingState::Idle);
    assert_eq!(hit_test(document.scene(), Point::new(6.0, 6.0)), None);

    // Clicking elsewhere finishes the blank box the same way.
    click(&mut input, &mut document, (5.0, 5.0));
    click(&mut input, &mut document, (20.0, 5.0));
    let id = only_text(&document);
    assert!(input.is_editing_text());
    assert_eq!(document.history().undo_len(), 2);
    assert_eq!(text_of(&document, id), "");
}

#[test]
fn erasing_existing_text_removes_it_undoably() {
    let (mut input, mut document) = setup(Tool::Text);
    click(&mut input, &mut document, (5.0, 5.0));
    press_keys(&mut input, &mut document, &[Key::Char('a'), Key::Return]);
    let id = only_id(&document);

    press_keys(
        &mut input,
        &mut document,
        &[Key::Return, Key::Backspace, Key::Return],
    );
    assert!(document.scene().is_empty());
    assert_eq!(input.state, DrawingState::Idle);
    // Insert, first edit, removal.
    assert_eq!(document.history().undo_len(), 3);

    ctrl(&mut input, &mut document, 'z');
    assert_eq!(text_of(&document, id), "a");
}

#[test]
fn select_drag_commits_single_replace() {
    let (mut input, mut document) = setup(Tool::Square);
    drag(&mut input, &mut document, (10.0, 10.0), (50.0, 50.0));
    input.set_tool(&mut document, Tool::Select).unwrap();
    let id = only_id(&document);
    let before = document.scene().clone();

    input
        .on_mouse_press(&mut document, MouseButton::Left, Point::new(30.0, 30.0))
        .unwrap();
    for step in 1..=4 {
        input
            .on_mouse_motion(&mut document, Point::new(30.0 + step as f64 * 5.0, 30.0))
            .unwrap();
    }
    input
        .on_mouse_release(&mut document, MouseButton::Left, Point::new(50.0, 30.0))
        .unwrap();

    assert_eq!(input.state, DrawingState::Selected { id });
    assert_eq!(
        document.scene().get(id).unwrap().shape.frame().x,
        30.0
    );
    assert_eq!(document.history().undo_len(), 2);

    ctrl(&mut input, &mut document, 'z');
    assert_eq!(document.scene().annotations(), before.annotations());
}

#[test]
fn select_handle_resizes_selected_annotation() {
    let (mut input, mut document) = setup(Tool::Square);
    drag(&mut input, &mut document, (10.0, 10.0), (50.0, 50.0));
    input.set_tool(&mut document, Tool::Select).unwrap();
    let id = only_id(&document);
    click(&mut input, &mut document, (30.0, 30.0));
    assert_eq!(input.state, DrawingState::Selected { id });

    input
        .on_mouse_press(&mut document, MouseButton::Left, Point::new(51.0, 49.0))
        .unwrap();
    assert!(matches!(
        input.state,
        DrawingState::Dragging {
            kind: DragKind::Resize(ResizeHandle::BottomRight),
            ..
        }
    ));
    input
        .on_mouse_motion(&mut document, Point::new(80.0, 70.0))
        .unwrap();
    input
        .on_mouse_release(&mut document, MouseButton::Left, Point::new(80.0, 70.0))
        .unwrap();

    let frame = document.scene().get(id).unwrap().shape.frame();
    assert_eq!((frame.x, frame.y, frame.width, frame.height), (10.0, 10.0, 70.0, 60.0));
}

#[test]
fn clicking_empty_space_clears_selection() {
    let (mut input, mut document) = setup(Tool::Square);
    drag(&mut input, &mut document, (10.0, 10.0), (50.0, 50.0));
    input.set_tool(&mut document, Tool::Select).unwrap();
    click(&mut input, &mut document, (30.0, 30.0));
    assert!(document.scene().selection().is_some());

    click(&mut input, &mut document, (300.0, 300.0));
    assert_eq!(document.scene().selection(), None);
    assert_eq!(input.state, DrawingState::Idle);
}

#[test]
fn delete_removes_selection() {
    let (mut input, mut document) = setup(Tool::Number);
    click(&mut input, &mut document, (10.0, 10.0));
    press_keys(&mut input, &mut document, &[Key::Delete]);
    assert!(document.scene().is_empty());
    assert_eq!(input.state, DrawingState::Idle);

    ctrl(&mut input, &mut document, 'z');
    assert_eq!(document.scene().len(), 1);
    let id = only_id(&document);
    assert_eq!(input.state, DrawingState::Selected { id });
}

#[test]
fn escape_cancels_drag_and_restores_geometry() {
    let (mut input, mut document) = setup(Tool::Square);
    drag(&mut input, &mut document, (10.0, 10.0), (50.0, 50.0));
    input.set_tool(&mut document, Tool::Select).unwrap();
    let before = document.scene().clone();

    input
        .on_mouse_press(&mut document, MouseButton::Left, Point::new(30.0, 30.0))
        .unwrap();
    input
        .on_mouse_motion(&mut document, Point::new(90.0, 90.0))
        .unwrap();
    input.on_key_press(&mut document, Key::Escape).unwrap();

    assert_eq!(document.scene().annotations(), before.annotations());
    assert_eq!(document.history().undo_len(), 1);
}

#[test]
fn right_click_cancels_drawing() {
    let (mut input, mut document) = setup(Tool::Circle);
    input
        .on_mouse_press(&mut document, MouseButton::Left, Point::new(0.0, 0.0))
        .unwrap();
    input
        .on_mouse_motion(&mut document, Point::new(20.0, 20.0))
        .unwrap();
    input
        .on_mouse_press(&mut document, MouseButton::Right, Point::new(20.0, 20.0))
        .unwrap();
    input
        .on_mouse_release(&mut document, MouseButton::Left, Point::new(20.0, 20.0))
        .unwrap();

    assert!(document.scene().is_empty());
    assert_eq!(input.state, DrawingState::Idle);
}

#[test]
fn redo_shortcuts_reapply() {
    let (mut input, mut document) = setup(Tool::Line);
    drag(&mut input, &mut document, (0.0, 0.0), (10.0, 10.0));
    ctrl(&mut input, &mut document, 'z');
    assert!(document.scene().is_empty());

    ctrl(&mut input, &mut document, 'y');
    assert_eq!(document.scene().len(), 1);

    ctrl(&mut input, &mut document, 'z');
    input.on_key_press(&mut document, Key::Shift).unwrap();
    ctrl(&mut input, &mut document, 'Z');
    input.on_key_release(Key::Shift);
    assert_eq!(document.scene().len(), 1);
}

#[test]
fn switching_to_drawing_tool_clears_selection() {
    let (mut input, mut document) = setup(Tool::Number);
    click(&mut input, &mut document, (10.0, 10.0));
    assert!(document.scene().selection().is_some());

    input.set_tool(&mut document, Tool::Pen).unwrap();
    assert_eq!(document.scene().selection(), None);
    assert_eq!(input.state, DrawingState::Idle);
}

#[test]
fn highlighter_uses_fixed_alpha() {
    let (mut input, mut document) = setup(Tool::Highlighter);
    input.style.color = Color::rgb(255, 255, 0);
    drag(&mut input, &mut document, (0.0, 0.0), (40.0, 0.0));

    match &document.scene().annotations()[0].shape {
        Shape::Highlighter { color, width, .. } => {
            assert_eq!(color.a, 77);
            assert_eq!(*width, input.style.highlighter_width);
        }
        other => panic!("expected highlighter, found {other:?}"),
    }
}

#[test]
fn handle_tolerance_follows_zoom() {
    let (mut input, mut document) = setup(Tool::Square);
    drag(&mut input, &mut document, (10.0, 10.0), (50.0, 50.0));
    input.set_tool(&mut document, Tool::Select).unwrap();
    click(&mut input, &mut document, (30.0, 30.0));

    // At 4x zoom the 8px screen tolerance is 2 image pixels.
    input.view = crate::input::ViewTransform::new(4.0, 0.0, 0.0);
    input
        .on_mouse_press(&mut document, MouseButton::Left, Point::new(54.0, 54.0))
        .unwrap();
    assert!(!matches!(
        input.state,
        DrawingState::Dragging {
            kind: DragKind::Resize(_),
            ..
        }
    ));
}
