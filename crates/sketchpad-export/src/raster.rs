//! Raster export: render the document with tiny-skia and encode PNG with
//! the `image` crate.
//!
//! Output is `scale` times the document's pixel size (2x by default).
//! Text is not rasterized; there is no bundled font.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat, RgbaImage};
use tiny_skia::{
    Color, FillRule, IntSize, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke,
    StrokeDash, Transform,
};
use tracing::{debug, info, warn};

use sketchpad_core::{Document, Shape, ShapeKind};
use sketchpad_geometry::{Bounds, PathCommand, PathData};

/// Default export scale relative to document pixels
pub const EXPORT_SCALE: f32 = 2.0;

#[derive(Debug, Clone)]
pub struct RasterOptions {
    pub scale: f32,
    /// Relative image hrefs are resolved against this directory
    pub image_root: Option<PathBuf>,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self { scale: EXPORT_SCALE, image_root: None }
    }
}

/// Render the document into a pixmap
pub fn rasterize(doc: &Document, options: &RasterOptions) -> Result<Pixmap> {
    let width = (doc.width as f32 * options.scale).round() as u32;
    let height = (doc.height as f32 * options.scale).round() as u32;
    let mut pixmap = Pixmap::new(width, height)
        .with_context(|| format!("cannot allocate a {width}x{height} canvas"))?;
    pixmap.fill(parse_color(&doc.background).unwrap_or(Color::WHITE));

    let base = Transform::from_scale(options.scale, options.scale);
    for shape in doc.shapes() {
        render_shape(&mut pixmap, shape, base, 1.0, options);
    }
    Ok(pixmap)
}

/// Encode the rendered document as PNG bytes
pub fn export_png(doc: &Document, options: &RasterOptions) -> Result<Vec<u8>> {
    let pixmap = rasterize(doc, options)?;
    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    let image = RgbaImage::from_raw(pixmap.width(), pixmap.height(), rgba)
        .context("pixel buffer does not match canvas size")?;
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .context("failed to encode png")?;
    Ok(bytes)
}

pub fn save_png(doc: &Document, path: &Path, options: &RasterOptions) -> Result<()> {
    let bytes = export_png(doc, options)?;
    std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), scale = options.scale, "exported png");
    Ok(())
}

/// `inherited` is the product of enclosing group opacities
fn render_shape(
    pixmap: &mut Pixmap,
    shape: &Shape,
    parent: Transform,
    inherited: f32,
    options: &RasterOptions,
) {
    if !shape.visible {
        return;
    }
    let [a, b, c, d, e, f] = shape.transform().matrix().map(|v| v as f32);
    let transform = parent.pre_concat(Transform::from_row(a, b, c, d, e, f));
    let alpha = inherited * shape.style.alpha() as f32;

    match &shape.kind {
        ShapeKind::Group { origin, members } => {
            let inner = transform.pre_translate(origin.x as f32, origin.y as f32);
            for member in members {
                render_shape(pixmap, member, inner, alpha, options);
            }
        }
        ShapeKind::Text { .. } => {
            debug!(id = %shape.id, "text is not rasterized");
        }
        ShapeKind::Image { bounds, image } => {
            let path = resolve(&image.href, options.image_root.as_deref());
            match load_pixmap(&path) {
                Ok(img) => draw_image(pixmap, &img, bounds, transform, alpha),
                Err(e) => warn!(path = %path.display(), error = %format!("{e:#}"), "skipping image"),
            }
        }
        _ => {
            if let (Some(path), Some(color)) = (shape.fill_path(), shape.fill_color())
                && let (Some(path), Some(color)) = (to_skia_path(&path), parse_color(color))
            {
                let paint = paint_for(color, alpha);
                pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
            }
            if shape.style.stroke_width > 0.0
                && let Some(path) = shape.stroke_path().as_ref().and_then(to_skia_path)
                && let Some(color) = parse_color(&shape.style.stroke_color)
            {
                let paint = paint_for(color, alpha);
                let style = &shape.style;
                let intervals: Vec<f32> =
                    style.dash.intervals(style.stroke_width).into_iter().map(|v| v as f32).collect();
                let stroke = Stroke {
                    width: style.stroke_width as f32,
                    line_cap: LineCap::Round,
                    line_join: LineJoin::Round,
                    dash: StrokeDash::new(intervals, 0.0),
                    ..Default::default()
                };
                pixmap.stroke_path(&path, &paint, &stroke, transform, None);
            }
        }
    }
}

fn paint_for(mut color: Color, alpha: f32) -> Paint<'static> {
    color.apply_opacity(alpha);
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    paint
}

fn to_skia_path(path: &PathData) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for cmd in path.commands() {
        match *cmd {
            PathCommand::MoveTo { to } => pb.move_to(to.x as f32, to.y as f32),
            PathCommand::LineTo { to } => pb.line_to(to.x as f32, to.y as f32),
            PathCommand::QuadTo { ctrl, to } => {
                pb.quad_to(ctrl.x as f32, ctrl.y as f32, to.x as f32, to.y as f32)
            }
            PathCommand::CubicTo { ctrl1, ctrl2, to } => pb.cubic_to(
                ctrl1.x as f32,
                ctrl1.y as f32,
                ctrl2.x as f32,
                ctrl2.y as f32,
                to.x as f32,
                to.y as f32,
            ),
            PathCommand::Close => pb.close(),
        }
    }
    pb.finish()
}

fn resolve(href: &str, root: Option<&Path>) -> PathBuf {
    let path = PathBuf::from(href);
    match root {
        Some(root) if path.is_relative() => root.join(path),
        _ => path,
    }
}

/// Decode an image file into a premultiplied pixmap
fn load_pixmap(path: &Path) -> Result<Pixmap> {
    let rgba = image::open(path)
        .with_context(|| format!("failed to decode {}", path.display()))?
        .to_rgba8();
    let (w, h) = rgba.dimensions();
    let mut data = rgba.into_raw();
    for px in data.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        for channel in &mut px[..3] {
            *channel = ((u16::from(*channel) * a + 127) / 255) as u8;
        }
    }
    let size = IntSize::from_wh(w, h).context("image has zero size")?;
    Pixmap::from_vec(data, size).context("image buffer does not match its size")
}

fn draw_image(pixmap: &mut Pixmap, img: &Pixmap, bounds: &Bounds, transform: Transform, alpha: f32) {
    let sx = bounds.width() as f32 / img.width() as f32;
    let sy = bounds.height() as f32 / img.height() as f32;
    let placement = transform
        .pre_translate(bounds.min.x as f32, bounds.min.y as f32)
        .pre_scale(sx, sy);
    let paint = PixmapPaint { opacity: alpha, ..PixmapPaint::default() };
    pixmap.draw_pixmap(0, 0, img.as_ref(), &paint, placement, None);
}

/// CSS-style color: `#rgb`, `#rrggbb`, `#rrggbbaa` or a few common names
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    let named = match s.to_ascii_lowercase().as_str() {
        "transparent" | "none" => Some(Color::TRANSPARENT),
        "black" => Some(Color::BLACK),
        "white" => Some(Color::WHITE),
        "red" => Some(Color::from_rgba8(255, 0, 0, 255)),
        "green" => Some(Color::from_rgba8(0, 128, 0, 255)),
        "blue" => Some(Color::from_rgba8(0, 0, 255, 255)),
        _ => None,
    };
    if named.is_some() {
        return named;
    }

    let hex = s.strip_prefix('#')?;
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    let nibble = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok().map(|v| v * 17);
    match hex.len() {
        3 => Some(Color::from_rgba8(nibble(0)?, nibble(1)?, nibble(2)?, 255)),
        6 => Some(Color::from_rgba8(byte(0)?, byte(2)?, byte(4)?, 255)),
        8 => Some(Color::from_rgba8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}
