//! Property tests for the geometry builders.

use proptest::prelude::*;
use sketchpad_geometry::polygon::{star_vertices, MIN_RADIUS};
use sketchpad_geometry::{
    arrow_path, freehand_stroke, regular_polygon_path, sketchy_rect, star_path, Bounds, PathData,
    Point, StrokeOptions, StrokeSample, Viewport, ZoomLimits,
};

fn coord() -> impl Strategy<Value = f64> {
    -1000.0..1000.0f64
}

proptest! {
    #[test]
    fn small_polygons_collapse_to_their_center(
        cx in coord(), cy in coord(), sides in 0u32..20, radius in 0.0..MIN_RADIUS,
    ) {
        let c = Point::new(cx, cy);
        prop_assert_eq!(regular_polygon_path(c, sides, radius), PathData::point(c));
    }

    #[test]
    fn small_stars_collapse_to_their_center(
        cx in coord(), cy in coord(), outer in 0.0..MIN_RADIUS, inner in 0.0..10.0f64,
    ) {
        let c = Point::new(cx, cy);
        prop_assert_eq!(star_path(c, outer, inner), PathData::point(c));
    }

    #[test]
    fn polygons_have_one_vertex_per_side(
        cx in coord(), cy in coord(), sides in 3u32..24, radius in 1.0..500.0f64,
    ) {
        let path = regular_polygon_path(Point::new(cx, cy), sides, radius);
        prop_assert!(path.is_closed());
        prop_assert_eq!(path.vertices().len(), sides as usize);
    }

    #[test]
    fn star_vertices_alternate(outer in 1.0..300.0f64, inner in 0.0..300.0f64) {
        let verts = star_vertices(Point::ZERO, outer, inner);
        for (i, v) in verts.iter().enumerate() {
            let r = if i % 2 == 0 { outer } else { inner };
            prop_assert!((v.length() - r).abs() < 1e-6);
        }
    }

    #[test]
    fn arrow_shaft_is_exact(
        x1 in coord(), y1 in coord(), x2 in coord(), y2 in coord(), width in 0.5..20.0f64,
        start in any::<bool>(), end in any::<bool>(),
    ) {
        let path = arrow_path(Point::new(x1, y1), Point::new(x2, y2), width, start, end);
        let v = path.vertices();
        prop_assert_eq!(v[0], Point::new(x1, y1));
        prop_assert_eq!(v[1], Point::new(x2, y2));
        prop_assert_eq!(path.subpath_count(), 1 + 2 * (start as usize + end as usize));
    }

    #[test]
    fn freehand_is_deterministic(
        pts in prop::collection::vec((coord(), coord(), 0.0..1.0f64), 0..40),
    ) {
        let samples: Vec<StrokeSample> =
            pts.iter().map(|&(x, y, p)| StrokeSample::new(x, y, p)).collect();
        let options = StrokeOptions::default();
        let a = freehand_stroke(&samples, &options);
        prop_assert_eq!(&a, &freehand_stroke(&samples, &options));
        prop_assert_eq!(a.is_empty(), samples.is_empty());
    }

    #[test]
    fn sketchy_is_deterministic(
        x in coord(), y in coord(), w in 0.0..400.0f64, h in 0.0..400.0f64, seed in any::<u64>(),
    ) {
        let b = Bounds::from_origin_size(Point::new(x, y), w, h);
        prop_assert_eq!(sketchy_rect(&b, 1.0, seed), sketchy_rect(&b, 1.0, seed));
    }

    #[test]
    fn zoom_stays_within_limits(factors in prop::collection::vec(0.01..100.0f64, 1..20)) {
        let limits = ZoomLimits::default();
        let mut vp = Viewport::default();
        for f in factors {
            vp.zoom_at(Point::new(10.0, 10.0), f, &limits);
            prop_assert!(vp.zoom >= limits.min && vp.zoom <= limits.max);
        }
    }
}
