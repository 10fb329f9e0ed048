use super::*;
use crate::draw::{Color, Shape};
use crate::source::RasterSource;

fn flat_session() -> EditorSession {
    let mut session = EditorSession::new(
        ToolStyle {
            color: Color::rgb(0, 0, 255),
            fill: Some(Color::rgb(0, 0, 255)),
            ..ToolStyle::default()
        },
        Background::Solid {
            color: Color::rgb(255, 0, 0),
        },
        FrameConfig {
            padding: 10,
            corner_radius: 0,
            aspect_ratio: None,
            shadow_enabled: false,
        },
    );
    session.load_subject(Raster::filled(20, 20, Color::rgb(255, 255, 255)).unwrap());
    session
}

fn drag(session: &mut EditorSession, from: (f64, f64), to: (f64, f64)) {
    session
        .pointer_press(MouseButton::Left, Point::new(from.0, from.1))
        .unwrap();
    session.pointer_motion(Point::new(to.0, to.1)).unwrap();
    session
        .pointer_release(MouseButton::Left, Point::new(to.0, to.1))
        .unwrap();
}

#[test]
fn drawn_rectangle_appears_in_export() {
    let mut session = flat_session();
    session.set_tool(Tool::Square).unwrap();
    drag(&mut session, (2.0, 2.0), (12.0, 12.0));

    let raster = session.export_raster().unwrap();
    assert_eq!(raster.size(), (40, 40));
    assert_eq!(raster.pixel(0, 0), Some(Color::rgb(255, 0, 0)));
    assert_eq!(raster.pixel(17, 17), Some(Color::rgb(0, 0, 255)));
    assert_eq!(raster.pixel(27, 27), Some(Color::rgb(255, 255, 255)));

    session.undo().unwrap();
    let raster = session.export_raster().unwrap();
    assert_eq!(raster.pixel(17, 17), Some(Color::rgb(255, 255, 255)));
}

#[test]
fn preview_is_displayed_but_not_exported() {
    let mut session = flat_session();
    session.set_tool(Tool::Square).unwrap();
    session
        .pointer_press(MouseButton::Left, Point::new(2.0, 2.0))
        .unwrap();
    session.pointer_motion(Point::new(12.0, 12.0)).unwrap();

    assert_eq!(session.display_snapshot().shapes.len(), 1);
    assert!(session.export_snapshot().shapes.is_empty());

    let display = session.render_display(40, 40).unwrap();
    assert_eq!(display.pixel(17, 17), Some(Color::rgb(0, 0, 255)));
    let export = session.export_raster().unwrap();
    assert_eq!(export.pixel(17, 17), Some(Color::rgb(255, 255, 255)));
}

#[test]
fn display_render_fits_viewport() {
    let mut session = flat_session();
    let display = session.render_display(20, 100).unwrap();
    assert_eq!(display.size(), (20, 20));
    assert_eq!(session.canvas_size().unwrap(), (40, 40));
}

#[test]
fn render_without_subject_reports_missing_source() {
    let mut session = EditorSession::default();
    assert!(matches!(
        session.export_raster(),
        Err(EngineError::RenderSourceMissing)
    ));
    assert!(matches!(
        session.render_display(100, 100),
        Err(EngineError::RenderSourceMissing)
    ));
}

#[test]
fn unknown_id_faults_session() {
    let mut session = flat_session();
    let ghost = AnnotationId(404);
    assert!(matches!(
        session.select(Some(ghost)),
        Err(EngineError::UnknownAnnotationId(id)) if id == ghost
    ));
    assert!(session.is_faulted());
    assert!(matches!(
        session.set_tool(Tool::Pen),
        Err(EngineError::SessionFaulted)
    ));
    // Rendering still works so the user can export what they have.
    assert!(session.export_raster().is_ok());
}

#[test]
fn frame_and_background_edits_are_undoable() {
    let mut session = flat_session();
    session
        .set_frame_config(FrameConfig {
            padding: 0,
            corner_radius: 0,
            aspect_ratio: None,
            shadow_enabled: false,
        })
        .unwrap();
    assert_eq!(session.canvas_size().unwrap(), (20, 20));

    session.undo().unwrap();
    assert_eq!(session.canvas_size().unwrap(), (40, 40));
}

#[test]
fn reorder_and_select_through_session() {
    let mut session = flat_session();
    session.set_tool(Tool::Number).unwrap();
    drag(&mut session, (5.0, 5.0), (5.0, 5.0));
    drag(&mut session, (15.0, 5.0), (15.0, 5.0));
    let first = session.scene().annotations()[0].id;

    session.reorder(first, 1).unwrap();
    assert_eq!(session.scene().index_of(first), Some(1));

    session.select(Some(first)).unwrap();
    assert_eq!(
        session.input().state,
        crate::input::DrawingState::Selected { id: first }
    );
    session.select(None).unwrap();
    assert_eq!(session.input().state, crate::input::DrawingState::Idle);
}

#[test]
fn redraw_flag_is_consumed() {
    let mut session = flat_session();
    assert!(session.take_needs_redraw());
    assert!(!session.take_needs_redraw());
    session.set_tool(Tool::Circle).unwrap();
    assert!(session.take_needs_redraw());
}

#[test]
fn closed_session_refuses_edits() {
    let mut session = flat_session();
    session.close();
    assert!(session.is_closed());
    assert!(matches!(
        session.set_tool(Tool::Text),
        Err(EngineError::SessionClosed)
    ));
    assert!(matches!(
        session.export_raster(),
        Err(EngineError::SessionClosed)
    ));
    assert!(matches!(
        session.request_export(ExportDestination::ClipboardOnly, None),
        Err(ExportError::Cancelled(_))
    ));
}

#[test]
fn from_config_applies_settings() {
    let config = Config::from_toml_str(
        r#"
        [frame]
        padding = 5
        corner_radius = 0
        shadow = false

        [background]
        type = "solid"
        color = "black"
        "#,
    )
    .unwrap();
    let mut session = EditorSession::from_config(&config);
    session.load_subject(Raster::filled(4, 4, Color::rgb(255, 255, 255)).unwrap());

    assert_eq!(session.canvas_size().unwrap(), (14, 14));
    let raster = session.export_raster().unwrap();
    assert_eq!(raster.pixel(0, 0), Some(Color::rgb(0, 0, 0)));
}

#[tokio::test]
async fn requested_exports_use_the_configured_format() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::from_toml_str("[export]\nformat = \"webp\"").unwrap();
    let manager = ExportManager::new(&tokio::runtime::Handle::current());
    let mut session = EditorSession::from_config(&config).with_export_manager(manager.clone());
    session.load_subject(Raster::filled(4, 4, Color::rgb(255, 255, 255)).unwrap());
    assert_eq!(session.export_format(), ExportFormat::Webp);

    session
        .request_export(
            ExportDestination::FileOnly,
            Some(SaveLocation::Exact(dir.path().join("shot"))),
        )
        .unwrap();
    let outcome = loop {
        if let Some(outcome) = manager.try_take_result() {
            break outcome;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    };
    match outcome {
        crate::export::ExportOutcome::Success(result) => {
            assert_eq!(result.saved_path, Some(dir.path().join("shot.webp")));
        }
        other => panic!("export failed: {other:?}"),
    }

    session.set_export_format(ExportFormat::Jpeg);
    assert_eq!(session.export_format(), ExportFormat::Jpeg);
}

#[tokio::test]
async fn load_from_source() {
    let mut session = EditorSession::default();
    let source = RasterSource::new(Raster::filled(6, 3, Color::rgb(1, 2, 3)).unwrap());
    session.load_from(&source).await.unwrap();
    assert_eq!(session.subject().unwrap().size(), (6, 3));
}

#[tokio::test]
async fn close_cancels_attached_exports() {
    let manager = ExportManager::new(&tokio::runtime::Handle::current());
    let mut session = flat_session().with_export_manager(manager.clone());
    session.close();
    assert!(manager.is_cancelled());
}

#[test]
fn export_requires_manager() {
    let session = flat_session();
    assert!(matches!(
        session.request_export(ExportDestination::ClipboardOnly, None),
        Err(ExportError::Task(_))
    ));
}

#[test]
fn text_shape_round_trip_through_session() {
    let mut session = flat_session();
    session.set_tool(Tool::Text).unwrap();
    drag(&mut session, (3.0, 3.0), (3.0, 3.0));
    for c in "ok".chars() {
        session.key_press(Key::Char(c)).unwrap();
        session.key_release(Key::Char(c));
    }
    session.key_press(Key::Return).unwrap();

    match &session.scene().annotations()[0].shape {
        Shape::Text { content, .. } => assert_eq!(content, "ok"),
        other => panic!("expected text, found {other:?}"),
    }
}

#[test]
fn loading_a_new_subject_starts_a_fresh_scene() {
    let mut session = flat_session();
    session.set_tool(Tool::Square).unwrap();
    drag(&mut session, (2.0, 2.0), (12.0, 12.0));
    session.set_tool(Tool::Number).unwrap();
    drag(&mut session, (15.0, 15.0), (15.0, 15.0));
    session.set_tool(Tool::Circle).unwrap();
    session
        .pointer_press(MouseButton::Left, Point::new(3.0, 3.0))
        .unwrap();
    assert!(session.input().in_progress_shape().is_some());
    assert!(session.document().can_undo());

    session.load_subject(Raster::filled(10, 10, Color::rgb(0, 255, 0)).unwrap());

    assert!(session.scene().is_empty());
    assert!(!session.document().can_undo());
    assert_eq!(session.input().state, crate::input::DrawingState::Idle);
    assert_eq!(session.scene().next_marker_index(), 1);
    assert_eq!(
        *session.scene().background(),
        Background::Solid {
            color: Color::rgb(255, 0, 0)
        }
    );
    assert_eq!(session.canvas_size().unwrap(), (30, 30));

    session.undo().unwrap();
    assert!(session.scene().is_empty());
    let raster = session.export_raster().unwrap();
    assert_eq!(raster.pixel(15, 15), Some(Color::rgb(0, 255, 0)));
}

#[test]
fn reload_lifts_a_fault() {
    let mut session = flat_session();
    let _ = session.select(Some(AnnotationId(7)));
    assert!(session.is_faulted());
    session.load_subject(Raster::filled(4, 4, Color::rgb(0, 0, 0)).unwrap());
    assert!(!session.is_faulted());
    assert!(session.set_tool(Tool::Pen).is_ok());
}

#[test]
fn clear_annotations_is_one_undo_step() {
    let mut session = flat_session();
    session.set_tool(Tool::Square).unwrap();
    drag(&mut session, (2.0, 2.0), (12.0, 12.0));
    drag(&mut session, (4.0, 4.0), (8.0, 8.0));
    session.set_tool(Tool::Number).unwrap();
    drag(&mut session, (15.0, 15.0), (15.0, 15.0));

    session.clear_annotations().unwrap();
    assert!(session.scene().is_empty());
    assert_eq!(session.input().state, crate::input::DrawingState::Idle);
    let raster = session.export_raster().unwrap();
    assert_eq!(raster.pixel(17, 17), Some(Color::rgb(255, 255, 255)));

    session.undo().unwrap();
    assert_eq!(session.scene().len(), 3);
}

#[test]
fn hidden_annotations_skip_display_and_export() {
    let mut session = flat_session();
    session.set_tool(Tool::Square).unwrap();
    drag(&mut session, (2.0, 2.0), (12.0, 12.0));
    let _ = session.take_needs_redraw();

    session.set_annotations_visible(false);
    assert!(!session.annotations_visible());
    assert!(session.take_needs_redraw());
    assert_eq!(
        session.export_raster().unwrap().pixel(17, 17),
        Some(Color::rgb(255, 255, 255))
    );
    assert_eq!(
        session.render_display(40, 40).unwrap().pixel(17, 17),
        Some(Color::rgb(255, 255, 255))
    );
    // Hiding is view state: the annotation and its history stay.
    assert_eq!(session.scene().len(), 1);
    assert_eq!(session.document().history().undo_len(), 1);

    session.set_annotations_visible(true);
    assert_eq!(
        session.export_raster().unwrap().pixel(17, 17),
        Some(Color::rgb(0, 0, 255))
    );
}
