//! Event scripts: a JSON list of input events replayed against an editor
//! session. This is how the headless binary stands in for an interactive
//! host.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use sketchpad_core::{Locks, ReorderOp, StylePatch};
use sketchpad_session::{EditorSession, KeyInput, PointerEvent, Tool, WheelEvent};

use crate::presets;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScriptEvent {
    Tool { tool: Tool },
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
    Wheel(WheelEvent),
    Key(KeyInput),
    Style { patch: StylePatch },
    /// Replace the content of the text in edit focus
    Text { text: String },
    Blur,
    SketchMode { enabled: bool },
    SelectAll,
    ClearSelection,
    Delete,
    Duplicate,
    Group,
    Ungroup,
    Reorder { op: ReorderOp },
    Move { dx: f64, dy: f64 },
    Rotate { degrees: f64 },
    Flip { horizontal: bool },
    Lock { locks: Locks },
    Undo,
    Redo,
    CancelDrag,
    ResizeDocument { width: u32, height: u32 },
    Preset { name: String },
    Background { color: String },
    /// Decode an image file and insert it at the document center
    Image { path: PathBuf },
    /// Replace the document with a saved one; undo brings the old one back
    Open { path: PathBuf },
}

/// Counters reported after a replay
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub ignored: usize,
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptEvent>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read script {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse script {}", path.display()))
}

/// Feed `events` to the session in order. Image and document paths are
/// resolved against `base_dir`. An unfinished drag is cancelled and focused text is
/// committed at the end.
pub fn replay(session: &mut EditorSession, events: &[ScriptEvent], base_dir: &Path) -> Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();
    for (index, event) in events.iter().enumerate() {
        let applied = apply(session, event, base_dir)
            .with_context(|| format!("script event {index} ({})", event_name(event)))?;
        summary.events += 1;
        if !applied {
            summary.ignored += 1;
            debug!(index, event = event_name(event), "event had no effect");
        }
        if session.take_image_request() {
            debug!(index, "image tool picked; scripts insert images with the image event");
        }
    }
    if session.is_dragging() {
        warn!("script ended mid-drag; cancelling");
        session.cancel_drag();
    }
    session.blur_text();
    Ok(summary)
}

fn apply(session: &mut EditorSession, event: &ScriptEvent, base_dir: &Path) -> Result<bool> {
    let applied = match event {
        ScriptEvent::Tool { tool } => {
            session.set_tool(*tool);
            true
        }
        ScriptEvent::PointerDown(e) => session.pointer_down(e),
        ScriptEvent::PointerMove(e) => session.pointer_move(e),
        ScriptEvent::PointerUp(e) => session.pointer_up(e),
        ScriptEvent::Wheel(e) => session.wheel(e),
        ScriptEvent::Key(k) => session.handle_key(k),
        ScriptEvent::Style { patch } => {
            session.set_style(patch);
            true
        }
        ScriptEvent::Text { text } => session.set_text(text),
        ScriptEvent::Blur => session.blur_text(),
        ScriptEvent::SketchMode { enabled } => {
            session.set_sketch_mode(*enabled);
            true
        }
        ScriptEvent::SelectAll => {
            session.select_all();
            true
        }
        ScriptEvent::ClearSelection => {
            session.clear_selection();
            true
        }
        ScriptEvent::Delete => session.delete_selected(),
        ScriptEvent::Duplicate => !session.duplicate_selected().is_empty(),
        ScriptEvent::Group => session.group_selected().is_some(),
        ScriptEvent::Ungroup => !session.ungroup_selected().is_empty(),
        ScriptEvent::Reorder { op } => session.reorder_selected(*op),
        ScriptEvent::Move { dx, dy } => session.move_selected(*dx, *dy),
        ScriptEvent::Rotate { degrees } => session.rotate_selected(*degrees),
        ScriptEvent::Flip { horizontal } => session.flip_selected(*horizontal),
        ScriptEvent::Lock { locks } => session.set_locks(*locks),
        ScriptEvent::Undo => session.undo(),
        ScriptEvent::Redo => session.redo(),
        ScriptEvent::CancelDrag => session.cancel_drag(),
        ScriptEvent::ResizeDocument { width, height } => session.resize_document(*width, *height),
        ScriptEvent::Preset { name } => {
            let Some(preset) = presets::find(name) else {
                bail!("unknown preset {name:?}");
            };
            session.resize_document(preset.width, preset.height)
        }
        ScriptEvent::Background { color } => session.set_background(color.clone()),
        ScriptEvent::Image { path } => {
            let resolved = resolve(base_dir, path);
            let (width, height) = image::image_dimensions(&resolved)
                .with_context(|| format!("failed to read image {}", resolved.display()))?;
            session
                .insert_image(path.to_string_lossy(), width, height)
                .is_some()
        }
        ScriptEvent::Open { path } => {
            let doc = sketchpad_export::load_document(&resolve(base_dir, path))?;
            session.load_document(doc);
            true
        }
    };
    Ok(applied)
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_relative() { base_dir.join(path) } else { path.to_path_buf() }
}

fn event_name(event: &ScriptEvent) -> &'static str {
    match event {
        ScriptEvent::Tool { .. } => "tool",
        ScriptEvent::PointerDown(_) => "pointer_down",
        ScriptEvent::PointerMove(_) => "pointer_move",
        ScriptEvent::PointerUp(_) => "pointer_up",
        ScriptEvent::Wheel(_) => "wheel",
        ScriptEvent::Key(_) => "key",
        ScriptEvent::Style { .. } => "style",
        ScriptEvent::Text { .. } => "text",
        ScriptEvent::Blur => "blur",
        ScriptEvent::SketchMode { .. } => "sketch_mode",
        ScriptEvent::SelectAll => "select_all",
        ScriptEvent::ClearSelection => "clear_selection",
        ScriptEvent::Delete => "delete",
        ScriptEvent::Duplicate => "duplicate",
        ScriptEvent::Group => "group",
        ScriptEvent::Ungroup => "ungroup",
        ScriptEvent::Reorder { .. } => "reorder",
        ScriptEvent::Move { .. } => "move",
        ScriptEvent::Rotate { .. } => "rotate",
        ScriptEvent::Flip { .. } => "flip",
        ScriptEvent::Lock { .. } => "lock",
        ScriptEvent::Undo => "undo",
        ScriptEvent::Redo => "redo",
        ScriptEvent::CancelDrag => "cancel_drag",
        ScriptEvent::ResizeDocument { .. } => "resize_document",
        ScriptEvent::Preset { .. } => "preset",
        ScriptEvent::Background { .. } => "background",
        ScriptEvent::Image { .. } => "image",
        ScriptEvent::Open { .. } => "open",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketchpad_core::ShapeKind;
    use sketchpad_session::EditorConfig;

    fn session() -> EditorSession {
        EditorSession::new(EditorConfig::default()).unwrap()
    }

    fn parse(json: &str) -> Vec<ScriptEvent> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn draws_a_rectangle_and_styles_it() {
        let events = parse(
            r##"[
                {"event": "tool", "tool": "rectangle"},
                {"event": "pointer_down", "x": 10, "y": 10},
                {"event": "pointer_move", "x": 50, "y": 40},
                {"event": "pointer_up", "x": 60, "y": 50},
                {"event": "select_all"},
                {"event": "style", "patch": {"stroke_color": "#ff0000", "fill": "#00ff00"}}
            ]"##,
        );
        let mut s = session();
        let summary = replay(&mut s, &events, Path::new(".")).unwrap();
        assert_eq!(summary, ReplaySummary { events: 6, ignored: 0 });

        let shape = &s.document().shapes()[0];
        assert!(matches!(shape.kind, ShapeKind::Rectangle { .. }));
        assert_eq!(shape.style.stroke_color, "#ff0000");
        assert_eq!(shape.style.fill.as_deref(), Some("#00ff00"));
    }

    #[test]
    fn keys_and_text_round_out_a_session() {
        let events = parse(
            r#"[
                {"event": "key", "key": {"char": "t"}},
                {"event": "pointer_down", "x": 5, "y": 5},
                {"event": "text", "text": "hello"},
                {"event": "key", "key": {"char": "v"}},
                {"event": "key", "key": "escape"},
                {"event": "key", "key": {"char": "z"}, "modifiers": {"ctrl": true}}
            ]"#,
        );
        let mut s = session();
        replay(&mut s, &events, Path::new(".")).unwrap();
        assert!(s.document().is_empty());
        assert!(s.history().can_redo());
    }

    #[test]
    fn unfinished_drag_is_cancelled() {
        let events = parse(
            r#"[
                {"event": "tool", "tool": "ellipse"},
                {"event": "pointer_down", "x": 0, "y": 0},
                {"event": "pointer_move", "x": 30, "y": 30}
            ]"#,
        );
        let mut s = session();
        replay(&mut s, &events, Path::new(".")).unwrap();
        assert!(s.document().is_empty());
        assert!(!s.is_dragging());
    }

    #[test]
    fn unknown_preset_fails_with_context() {
        let events = parse(r#"[{"event": "blur"}, {"event": "preset", "name": "billboard"}]"#);
        let err = replay(&mut session(), &events, Path::new(".")).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("script event 1"));
        assert!(msg.contains("billboard"));
    }

    #[test]
    fn images_are_measured_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbaImage::new(4000, 100).save(dir.path().join("wide.png")).unwrap();
        let events = parse(r#"[{"event": "image", "path": "wide.png"}]"#);
        let mut s = session();
        replay(&mut s, &events, dir.path()).unwrap();

        let shape = &s.document().shapes()[0];
        let bounds = shape.bounds().unwrap();
        assert!((bounds.width() - 960.0).abs() < 1e-6);
        match &shape.kind {
            ShapeKind::Image { image, .. } => assert_eq!(image.href, "wide.png"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn opening_a_document_is_undoable() {
        let dir = tempfile::tempdir().unwrap();
        let mut saved = sketchpad_core::Document::new(300, 200).with_background("#000000");
        saved.add_shape(sketchpad_core::Shape::new(
            ShapeKind::Line {
                start: sketchpad_geometry::Point::ZERO,
                end: sketchpad_geometry::Point::new(10.0, 10.0),
            },
            sketchpad_core::Style::default(),
        ));
        sketchpad_export::save_document(&saved, &dir.path().join("saved.json")).unwrap();

        let mut s = session();
        let events = parse(r#"[{"event": "open", "path": "saved.json"}]"#);
        replay(&mut s, &events, dir.path()).unwrap();
        assert_eq!(s.document().shapes(), saved.shapes());
        assert_eq!((s.document().width, s.document().height), (300, 200));

        assert!(s.undo());
        assert!(s.document().is_empty());
        assert!(s.redo());
        assert_eq!(s.document().len(), 1);
    }

    #[test]
    fn opening_a_missing_document_fails() {
        let dir = tempfile::tempdir().unwrap();
        let events = parse(r#"[{"event": "open", "path": "absent.json"}]"#);
        assert!(replay(&mut session(), &events, dir.path()).is_err());
    }

    #[test]
    fn scripts_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.json");
        fs::write(&path, r#"[{"event": "undo"}]"#).unwrap();
        assert_eq!(load_script(&path).unwrap(), vec![ScriptEvent::Undo]);
        fs::write(&path, r#"[{"event": "teleport"}]"#).unwrap();
        assert!(load_script(&path).is_err());
    }
}
