//! Pan/zoom transform between screen space and document space.
//!
//! Shapes always live in document coordinates; the viewport is applied only
//! when mapping pointer input in and rendering out.

use serde::{Deserialize, Serialize};

use crate::point::Point;

pub const MIN_ZOOM: f64 = 0.05;
pub const MAX_ZOOM: f64 = 20.0;

/// Inclusive range the zoom factor is clamped to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self { min: MIN_ZOOM, max: MAX_ZOOM }
    }
}

impl ZoomLimits {
    pub fn clamp(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min, self.max)
    }
}

/// `screen = document * zoom + pan`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Viewport {
    pub fn screen_to_document(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan_x) / self.zoom,
            (screen.y - self.pan_y) / self.zoom,
        )
    }

    pub fn document_to_screen(&self, doc: Point) -> Point {
        Point::new(doc.x * self.zoom + self.pan_x, doc.y * self.zoom + self.pan_y)
    }

    /// Shift the view by a screen-space offset
    pub fn pan(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dy.is_finite() {
            self.pan_x += dx;
            self.pan_y += dy;
        }
    }

    /// Multiply the zoom by `factor`, keeping the document point under
    /// `anchor` (screen space) fixed.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64, limits: &ZoomLimits) {
        if !anchor.is_finite() || !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let doc = self.screen_to_document(anchor);
        self.zoom = limits.clamp(self.zoom * factor);
        self.pan_x = anchor.x - doc.x * self.zoom;
        self.pan_y = anchor.y - doc.y * self.zoom;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Zoom factor for a wheel delta: `base ^ delta_y`, so scrolling up zooms in
pub fn wheel_zoom_factor(delta_y: f64, base: f64) -> f64 {
    base.powf(delta_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn identity_maps_straight_through() {
        let vp = Viewport::default();
        assert_eq!(vp.screen_to_document(Point::new(50.0, 75.0)), Point::new(50.0, 75.0));
    }

    #[test]
    fn pan_and_zoom_round_trip() {
        let vp = Viewport { pan_x: 30.0, pan_y: -12.0, zoom: 2.5 };
        let p = Point::new(17.0, 4.0);
        let back = vp.screen_to_document(vp.document_to_screen(p));
        assert!((back.x - p.x).abs() < EPS && (back.y - p.y).abs() < EPS);
    }

    #[test]
    fn zoom_keeps_anchor_fixed() {
        let mut vp = Viewport { pan_x: 10.0, pan_y: 20.0, zoom: 1.0 };
        let anchor = Point::new(200.0, 150.0);
        let before = vp.screen_to_document(anchor);
        vp.zoom_at(anchor, 1.7, &ZoomLimits::default());
        let after = vp.screen_to_document(anchor);
        assert!((before.x - after.x).abs() < EPS);
        assert!((before.y - after.y).abs() < EPS);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut vp = Viewport::default();
        vp.zoom_at(Point::ZERO, 1000.0, &ZoomLimits::default());
        assert_eq!(vp.zoom, MAX_ZOOM);
        vp.zoom_at(Point::ZERO, 1e-9, &ZoomLimits::default());
        assert_eq!(vp.zoom, MIN_ZOOM);
    }

    #[test]
    fn wheel_up_zooms_in() {
        assert!(wheel_zoom_factor(-100.0, 0.999) > 1.0);
        assert!(wheel_zoom_factor(100.0, 0.999) < 1.0);
    }
}
