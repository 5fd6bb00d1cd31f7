//! SVG export.
//!
//! One element per painted path, in paint order. Rotation and mirroring are
//! emitted as a `matrix(...)` transform; group members sit inside a `<g>`
//! translated to the group origin. Export is one-way.

use std::fmt::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use sketchpad_core::{Document, Shape, ShapeKind, Style};
use sketchpad_geometry::{PathData, Point};

/// Export a document to an SVG string
pub fn export_svg(doc: &Document) -> String {
    let mut output = String::new();
    let (w, h) = (doc.width, doc.height);

    let _ = writeln!(
        output,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    let _ = writeln!(
        output,
        r#"  <rect width="100%" height="100%" fill="{}"/>"#,
        escape(&doc.background)
    );

    for shape in doc.shapes() {
        render_shape(&mut output, shape, 1);
    }

    let _ = writeln!(output, "</svg>");
    output
}

/// Save SVG to a file
pub fn save_svg(doc: &Document, path: &Path) -> Result<()> {
    let svg = export_svg(doc);
    std::fs::write(path, svg).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "exported svg");
    Ok(())
}

fn render_shape(output: &mut String, shape: &Shape, depth: usize) {
    if !shape.visible {
        return;
    }
    let pad = "  ".repeat(depth);
    let transform = shape.transform();
    let mut attrs = String::new();
    if !transform.is_identity() {
        let [a, b, c, d, e, f] = transform.matrix();
        let _ = write!(
            attrs,
            r#" transform="matrix({} {} {} {} {} {})""#,
            num(a),
            num(b),
            num(c),
            num(d),
            num(e),
            num(f)
        );
    }
    if shape.style.opacity < 100 {
        let _ = write!(attrs, r#" opacity="{}""#, num(shape.style.alpha()));
    }

    match &shape.kind {
        ShapeKind::Group { origin, members } => {
            let _ = writeln!(output, "{pad}<g{attrs}>");
            let _ = writeln!(
                output,
                r#"{pad}  <g transform="translate({} {})">"#,
                num(origin.x),
                num(origin.y)
            );
            for member in members {
                render_shape(output, member, depth + 2);
            }
            let _ = writeln!(output, "{pad}  </g>");
            let _ = writeln!(output, "{pad}</g>");
        }
        ShapeKind::Text { origin, content } => {
            render_text(output, &pad, &attrs, *origin, content, &shape.style);
        }
        ShapeKind::Image { bounds, image } => {
            let _ = writeln!(
                output,
                r#"{pad}<image x="{}" y="{}" width="{}" height="{}" href="{}" preserveAspectRatio="none"{attrs}/>"#,
                num(bounds.min.x),
                num(bounds.min.y),
                num(bounds.width()),
                num(bounds.height()),
                escape(&image.href)
            );
        }
        _ => {
            let fill = shape.fill_path().zip(shape.fill_color());
            let stroke = shape.stroke_path();
            if fill.is_some() && stroke.is_some() {
                let _ = writeln!(output, "{pad}<g{attrs}>");
                write_paths(output, &format!("{pad}  "), "", fill, stroke, &shape.style);
                let _ = writeln!(output, "{pad}</g>");
            } else {
                write_paths(output, &pad, &attrs, fill, stroke, &shape.style);
            }
        }
    }
}

fn write_paths(
    output: &mut String,
    pad: &str,
    attrs: &str,
    fill: Option<(PathData, &str)>,
    stroke: Option<PathData>,
    style: &Style,
) {
    if let Some((path, color)) = fill
        && !path.is_empty()
    {
        let _ = writeln!(
            output,
            r#"{pad}<path d="{}" fill="{}" stroke="none"{attrs}/>"#,
            path.to_svg(),
            escape(color)
        );
    }
    if let Some(path) = stroke
        && !path.is_empty()
    {
        let mut dash = String::new();
        let intervals = style.dash.intervals(style.stroke_width);
        if !intervals.is_empty() {
            let list: Vec<String> = intervals.into_iter().map(num).collect();
            let _ = write!(dash, r#" stroke-dasharray="{}""#, list.join(" "));
        }
        let _ = writeln!(
            output,
            r#"{pad}<path d="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round"{dash}{attrs}/>"#,
            path.to_svg(),
            escape(&style.stroke_color),
            num(style.stroke_width)
        );
    }
}

/// Text is anchored at its top-left; one `tspan` per line
fn render_text(output: &mut String, pad: &str, attrs: &str, origin: Point, content: &str, style: &Style) {
    let weight = if style.bold { "bold" } else { "normal" };
    let font_style = if style.italic { "italic" } else { "normal" };
    let _ = writeln!(
        output,
        r#"{pad}<text x="{}" y="{}" font-family="{}" font-size="{}" font-weight="{weight}" font-style="{font_style}" fill="{}" dominant-baseline="hanging"{attrs}>"#,
        num(origin.x),
        num(origin.y),
        escape(&style.font_family),
        num(style.font_size),
        escape(&style.stroke_color)
    );
    let line_height = style.font_size * 1.2;
    for (i, line) in content.lines().enumerate() {
        let _ = writeln!(
            output,
            r#"{pad}  <tspan x="{}" y="{}">{}</tspan>"#,
            num(origin.x),
            num(origin.y + i as f64 * line_height),
            escape(line)
        );
    }
    let _ = writeln!(output, "{pad}</text>");
}

fn num(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
