//! End-to-end editing scenarios driven through the public session surface.

use sketchpad_core::{ShapeKind, StylePatch};
use sketchpad_geometry::Point;
use sketchpad_session::{
    EditorConfig, EditorSession, Key, KeyInput, Modifiers, PointerEvent, Tool, WheelEvent,
};

fn session() -> EditorSession {
    EditorSession::new(EditorConfig::default()).unwrap()
}

fn draw(session: &mut EditorSession, tool: Tool, from: (f64, f64), to: (f64, f64)) {
    session.set_tool(tool);
    session.pointer_down(&PointerEvent::at(from.0, from.1));
    session.pointer_move(&PointerEvent::at(to.0, to.1));
    session.pointer_up(&PointerEvent::at(to.0, to.1));
}

#[test]
fn history_keeps_the_sixty_most_recent_states() {
    let mut s = session();
    for i in 0..100 {
        let x = f64::from(i) * 5.0;
        draw(&mut s, Tool::Rectangle, (x, 0.0), (x + 4.0, 4.0));
    }
    assert_eq!(s.history().len(), 60);

    let mut undone = 0;
    while s.undo() {
        undone += 1;
    }
    assert_eq!(undone, 59);
    assert_eq!(s.document().len(), 41);
}

#[test]
fn sketch_is_applied_only_when_the_drag_ends() {
    let mut s = session();
    s.set_sketch_mode(true);
    s.set_tool(Tool::Rectangle);
    s.pointer_down(&PointerEvent::at(10.0, 10.0));
    s.pointer_move(&PointerEvent::at(80.0, 60.0));
    assert!(matches!(s.document().shapes()[0].kind, ShapeKind::Rectangle { .. }));

    s.pointer_up(&PointerEvent::at(80.0, 60.0));
    match &s.document().shapes()[0].kind {
        ShapeKind::Sketch { base, path } => {
            assert!(matches!(**base, ShapeKind::Rectangle { .. }));
            assert!(!path.is_empty());
        }
        other => panic!("expected a sketch, got {other:?}"),
    }
}

#[test]
fn sketch_mode_leaves_other_kinds_crisp() {
    let mut s = session();
    s.set_sketch_mode(true);
    draw(&mut s, Tool::Star, (0.0, 0.0), (50.0, 50.0));
    assert!(matches!(s.document().shapes()[0].kind, ShapeKind::Star { .. }));
}

#[test]
fn viewport_changes_never_touch_history() {
    let mut s = session();
    draw(&mut s, Tool::Ellipse, (0.0, 0.0), (40.0, 40.0));
    let doc = s.document().clone();
    let entries = s.history().len();

    draw(&mut s, Tool::Pan, (100.0, 100.0), (160.0, 130.0));
    assert_eq!((s.viewport().pan_x, s.viewport().pan_y), (60.0, 30.0));
    s.wheel(&WheelEvent { x: 10.0, y: 10.0, delta_x: 0.0, delta_y: 120.0, modifiers: Modifiers::ctrl() });
    s.wheel(&WheelEvent { x: 0.0, y: 0.0, delta_x: 5.0, delta_y: 5.0, modifiers: Modifiers::NONE });

    assert_eq!(s.history().len(), entries);
    assert_eq!(s.document(), &doc);
}

#[test]
fn zoom_is_clamped() {
    let mut s = session();
    for _ in 0..50 {
        s.wheel(&WheelEvent { x: 0.0, y: 0.0, delta_x: 0.0, delta_y: -5000.0, modifiers: Modifiers::ctrl() });
    }
    assert_eq!(s.viewport().zoom, 20.0);
    for _ in 0..50 {
        s.wheel(&WheelEvent { x: 0.0, y: 0.0, delta_x: 0.0, delta_y: 5000.0, modifiers: Modifiers::ctrl() });
    }
    assert_eq!(s.viewport().zoom, 0.05);
}

#[test]
fn drawing_happens_in_document_space() {
    let mut s = session();
    draw(&mut s, Tool::Pan, (0.0, 0.0), (100.0, 50.0));
    draw(&mut s, Tool::Line, (100.0, 50.0), (200.0, 50.0));
    match &s.document().shapes()[0].kind {
        ShapeKind::Line { start, end } => {
            assert_eq!(*start, Point::new(0.0, 0.0));
            assert_eq!(*end, Point::new(100.0, 0.0));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn style_edit_reaches_exactly_the_selection() {
    let mut s = session();
    for i in 0..4 {
        let x = f64::from(i) * 50.0;
        draw(&mut s, Tool::Rectangle, (x, 0.0), (x + 30.0, 30.0));
    }
    s.set_tool(Tool::Select);
    let ids: Vec<_> = s.document().shapes().iter().map(|sh| sh.id).collect();
    for id in &ids[..3] {
        s.select(*id);
    }
    let entries = s.history().len();

    s.set_style(&StylePatch::stroke_color("#ff0000"));

    for id in &ids[..3] {
        assert_eq!(s.document().get(*id).unwrap().style.stroke_color, "#ff0000");
    }
    assert_eq!(s.document().get(ids[3]).unwrap().style.stroke_color, "#000000");
    assert_eq!(s.color_history().colors()[0], "#ff0000");
    assert_eq!(s.history().len(), entries + 1);
}

#[test]
fn style_edit_without_selection_only_changes_the_current_style() {
    let mut s = session();
    draw(&mut s, Tool::Rectangle, (0.0, 0.0), (30.0, 30.0));
    let entries = s.history().len();
    s.set_style(&StylePatch::stroke_width(6.0));
    assert_eq!(s.style().stroke_width, 6.0);
    assert_eq!(s.history().len(), entries);

    draw(&mut s, Tool::Line, (0.0, 50.0), (30.0, 50.0));
    assert_eq!(s.document().shapes()[1].style.stroke_width, 6.0);
    assert_eq!(s.document().shapes()[0].style.stroke_width, 2.0);
}

#[test]
fn cancel_discards_the_provisional_shape() {
    let mut s = session();
    s.set_tool(Tool::Rectangle);
    s.pointer_down(&PointerEvent::at(0.0, 0.0));
    s.pointer_move(&PointerEvent::at(40.0, 40.0));
    assert_eq!(s.document().len(), 1);

    assert!(s.handle_key(&KeyInput::new(Key::Escape, Modifiers::NONE)));
    assert!(s.document().is_empty());
    assert_eq!(s.history().len(), 1);
    assert!(!s.pointer_up(&PointerEvent::at(40.0, 40.0)));
    assert_eq!(s.history().len(), 1);
}

#[test]
fn cancel_restores_a_moved_selection() {
    let mut s = session();
    draw(&mut s, Tool::Rectangle, (0.0, 0.0), (20.0, 20.0));
    s.set_tool(Tool::Select);
    s.pointer_down(&PointerEvent::at(10.0, 10.0));
    s.pointer_move(&PointerEvent::at(60.0, 60.0));
    assert!(s.cancel_drag());

    let bounds = s.document().shapes()[0].bounds().unwrap();
    assert_eq!(bounds.top_left(), Point::new(0.0, 0.0));
    assert_eq!(s.history().len(), 2);
}

#[test]
fn switching_tools_mid_drag_cancels_it() {
    let mut s = session();
    s.set_tool(Tool::Pencil);
    s.pointer_down(&PointerEvent::at(0.0, 0.0));
    s.pointer_move(&PointerEvent::at(5.0, 5.0));
    s.set_tool(Tool::Select);
    assert!(!s.is_dragging());
    assert!(s.document().is_empty());
}

#[test]
fn text_commits_on_blur() {
    let mut s = session();
    s.set_tool(Tool::Text);
    s.pointer_down(&PointerEvent::at(40.0, 40.0));
    for c in "Hi".chars() {
        s.handle_key(&KeyInput::char(c));
    }
    assert_eq!(s.history().len(), 1);
    // Shortcut letters are typed, not interpreted
    s.handle_key(&KeyInput::char('v'));
    assert_eq!(s.tool(), Tool::Text);

    s.set_tool(Tool::Select);
    assert_eq!(s.history().len(), 2);
    match &s.document().shapes()[0].kind {
        ShapeKind::Text { origin, content } => {
            assert_eq!(content, "Hiv");
            assert_eq!(*origin, Point::new(40.0, 40.0));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn clicking_elsewhere_with_text_tool_starts_new_text() {
    let mut s = session();
    s.set_tool(Tool::Text);
    s.pointer_down(&PointerEvent::at(0.0, 0.0));
    s.set_text("first");
    s.pointer_down(&PointerEvent::at(0.0, 100.0));
    assert_eq!(s.document().len(), 2);
    assert_eq!(s.history().len(), 2);
    s.set_tool(Tool::Select);
    assert_eq!(s.document().len(), 1);
    assert_eq!(s.history().len(), 2);
}

#[test]
fn shapes_are_click_through_while_drawing() {
    let mut s = session();
    draw(&mut s, Tool::Rectangle, (0.0, 0.0), (50.0, 50.0));
    draw(&mut s, Tool::Rectangle, (10.0, 10.0), (20.0, 20.0));
    assert_eq!(s.document().len(), 2);
    assert!(s.document().shapes().iter().all(|sh| !sh.selectable));

    s.set_tool(Tool::Select);
    assert!(s.document().shapes().iter().all(|sh| sh.selectable));
    s.undo();
    assert!(s.document().shapes().iter().all(|sh| sh.selectable));
}

#[test]
fn keyboard_shortcuts_drive_the_session() {
    let mut s = session();
    assert!(s.handle_key(&KeyInput::char('r')));
    assert_eq!(s.tool(), Tool::Rectangle);
    s.pointer_down(&PointerEvent::at(0.0, 0.0));
    s.pointer_up(&PointerEvent::at(30.0, 30.0));

    assert!(s.handle_key(&KeyInput::command('a')));
    assert_eq!(s.tool(), Tool::Select);
    assert!(s.handle_key(&KeyInput::command('d')));
    assert_eq!(s.document().len(), 2);
    assert!(s.handle_key(&KeyInput::new(Key::Delete, Modifiers::NONE)));
    assert_eq!(s.document().len(), 1);
    assert!(s.handle_key(&KeyInput::command('z')));
    assert_eq!(s.document().len(), 2);
    assert!(s.handle_key(&KeyInput::command('y')));
    assert_eq!(s.document().len(), 1);
}

#[test]
fn group_and_ungroup_through_the_session() {
    let mut s = session();
    draw(&mut s, Tool::Rectangle, (0.0, 0.0), (10.0, 10.0));
    draw(&mut s, Tool::Ellipse, (30.0, 30.0), (50.0, 50.0));
    s.set_tool(Tool::Select);
    s.select_all();

    let group = s.group_selected().unwrap();
    assert_eq!(s.document().len(), 1);
    assert_eq!(s.document().selected_ids(), vec![group]);

    let members = s.ungroup_selected();
    assert_eq!(members.len(), 2);
    let b = s.document().get(members[1]).unwrap().bounds().unwrap();
    assert_eq!(b.top_left(), Point::new(30.0, 30.0));
    assert!(s.ungroup_selected().is_empty());
}

#[test]
fn stroke_with_unreadable_pressure_survives_undo_and_redo() {
    let mut s = session();
    s.set_tool(Tool::Pen);
    s.pointer_down(&PointerEvent::at(0.0, 0.0).with_pressure(f64::NAN));
    s.pointer_move(&PointerEvent::at(20.0, 5.0).with_pressure(f64::INFINITY));
    s.pointer_up(&PointerEvent::at(40.0, 10.0).with_pressure(f64::NAN));

    let snapshot = s.history().current().unwrap().to_string();
    let parsed: sketchpad_core::Document = serde_json::from_str(&snapshot).unwrap();
    assert_eq!(parsed.len(), 1);

    assert!(s.undo());
    assert!(s.document().is_empty());
    assert!(s.redo());
    assert_eq!(s.document().len(), 1);
}
