//! Persistence format: the document as a versioned JSON envelope.
//!
//! Parsing finishes before anything is handed back, so a malformed payload
//! can never leave a half-imported document behind.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::info;

use sketchpad_core::Document;

/// Tag identifying sketchpad files
pub const FORMAT_NAME: &str = "sketchpad";

/// Current envelope version; newer files are rejected
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    format: &'a str,
    version: u32,
    document: &'a Document,
}

#[derive(Deserialize)]
struct Envelope {
    format: String,
    version: u32,
    document: Document,
}

/// Serialize a document into the persistence format
pub fn to_json(doc: &Document) -> Result<String> {
    let envelope = EnvelopeRef { format: FORMAT_NAME, version: FORMAT_VERSION, document: doc };
    serde_json::to_string_pretty(&envelope).context("failed to serialize document")
}

/// Parse the persistence format
pub fn from_json(payload: &str) -> Result<Document> {
    let envelope: Envelope = serde_json::from_str(payload).context("malformed sketchpad document")?;
    if envelope.format != FORMAT_NAME {
        bail!("not a sketchpad document (format {:?})", envelope.format);
    }
    if envelope.version > FORMAT_VERSION {
        bail!(
            "document version {} is newer than supported version {}",
            envelope.version,
            FORMAT_VERSION
        );
    }
    let doc = envelope.document;
    if doc.width == 0 || doc.height == 0 {
        bail!("document has zero size ({}x{})", doc.width, doc.height);
    }
    Ok(doc)
}

pub fn save_document(doc: &Document, path: &Path) -> Result<()> {
    let json = to_json(doc)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), shapes = doc.len(), "saved document");
    Ok(())
}

pub fn load_document(path: &Path) -> Result<Document> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let doc = from_json(&content).with_context(|| format!("failed to load {}", path.display()))?;
    info!(path = %path.display(), shapes = doc.len(), "loaded document");
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketchpad_core::{PenKind, Shape, ShapeKind, Style};
    use sketchpad_geometry::{Bounds, Point, StrokeOptions, StrokeSample, freehand_stroke};

    fn sample() -> Document {
        let mut doc = Document::new(640, 480).with_background("#fafafa");
        doc.add_shape(Shape::new(
            ShapeKind::Rectangle { bounds: Bounds::from_origin_size(Point::new(1.5, 2.25), 30.0, 40.0) },
            Style::default(),
        ));
        doc
    }

    #[test]
    fn round_trip_is_stable() {
        let doc = sample();
        let json = to_json(&doc).unwrap();
        let back = from_json(&json).unwrap();
        assert_eq!(to_json(&back).unwrap(), json);
        assert_eq!(back.shapes(), doc.shapes());
    }

    #[test]
    fn rejects_foreign_format() {
        let json = r##"{"format":"drawio","version":1,"document":{"width":1,"height":1,"background":"#fff","shapes":[]}}"##;
        assert!(from_json(json).is_err());
    }

    #[test]
    fn stroke_with_unreadable_pressure_round_trips() {
        let samples: Vec<StrokeSample> = [(0.0, 0.0, f64::NAN), (10.0, 4.0, f64::INFINITY), (20.0, 8.0, 0.8)]
            .into_iter()
            .map(|(x, y, p)| StrokeSample::new(x, y, p))
            .collect();
        let outline = freehand_stroke(&samples, &StrokeOptions::default());
        let mut doc = Document::new(100, 100);
        doc.add_shape(Shape::new(ShapeKind::Freehand { samples, pen: PenKind::Pen, outline }, Style::default()));

        let back = from_json(&to_json(&doc).unwrap()).unwrap();
        assert_eq!(back.shapes(), doc.shapes());
    }

    #[test]
    fn rejects_newer_version() {
        let json = to_json(&sample()).unwrap().replace("\"version\": 1", "\"version\": 99");
        let err = from_json(&json).unwrap_err();
        assert!(err.to_string().contains("newer"));
    }

    #[test]
    fn rejects_garbage() {
        assert!(from_json("{ not json").is_err());
        assert!(from_json(r#"{"format":"sketchpad","version":1}"#).is_err());
    }
}
