//! Arrow geometry: a straight shaft plus open chevron heads.

use std::f64::consts::PI;

use crate::path::PathData;
use crate::point::Point;

/// Angle between the shaft direction and each head stroke (135°)
pub const HEAD_ANGLE: f64 = PI * 3.0 / 4.0;

/// Head stroke length never drops below this, even for hairline strokes
pub const MIN_HEAD_LENGTH: f64 = 14.0;

/// Head stroke length as a multiple of the stroke width
pub const HEAD_WIDTH_FACTOR: f64 = 5.0;

/// Length of each head stroke for a given stroke width
pub fn head_length(stroke_width: f64) -> f64 {
    (stroke_width * HEAD_WIDTH_FACTOR).max(MIN_HEAD_LENGTH)
}

/// Build an arrow from `start` to `end`.
///
/// The shaft is the first subpath; each requested head adds two open
/// subpaths (one per chevron stroke) starting at its endpoint. Heads point
/// back along the shaft at ±135° from the direction of travel into that
/// endpoint. Non-finite input yields an empty path.
pub fn arrow_path(
    start: Point,
    end: Point,
    stroke_width: f64,
    start_head: bool,
    end_head: bool,
) -> PathData {
    let mut path = PathData::new();
    if !start.is_finite() || !end.is_finite() {
        return path;
    }

    path.move_to(start).line_to(end);

    let angle = (end.y - start.y).atan2(end.x - start.x);
    let len = head_length(stroke_width);

    if end_head {
        push_head(&mut path, end, angle, len);
    }
    if start_head {
        push_head(&mut path, start, angle + PI, len);
    }
    path
}

/// Append the two chevron strokes at `tip` for a shaft arriving with `angle`
fn push_head(path: &mut PathData, tip: Point, angle: f64, len: f64) {
    for side in [HEAD_ANGLE, -HEAD_ANGLE] {
        path.move_to(tip).line_to(Point::polar(tip, len, angle + side));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathCommand;

    const EPS: f64 = 1e-9;

    #[test]
    fn end_head_has_two_strokes_of_min_length() {
        let path = arrow_path(Point::ZERO, Point::new(100.0, 0.0), 2.0, false, true);
        // shaft + two head strokes
        assert_eq!(path.subpath_count(), 3);

        let cmds = path.commands();
        assert_eq!(cmds[0], PathCommand::MoveTo { to: Point::ZERO });
        assert_eq!(cmds[1], PathCommand::LineTo { to: Point::new(100.0, 0.0) });

        let tips: Vec<Point> = cmds[3..]
            .iter()
            .step_by(2)
            .filter_map(PathCommand::end_point)
            .collect();
        assert_eq!(tips.len(), 2);
        for tip in tips {
            let d = tip - Point::new(100.0, 0.0);
            assert!((d.length() - 14.0).abs() < EPS);
            // Both barbs point back towards the start
            assert!(d.x < 0.0);
            let barb_angle = d.y.atan2(d.x).abs();
            assert!((barb_angle - HEAD_ANGLE).abs() < EPS);
        }
    }

    #[test]
    fn head_length_scales_with_width() {
        assert_eq!(head_length(2.0), 14.0);
        assert_eq!(head_length(4.0), 20.0);
    }

    #[test]
    fn no_heads_is_just_the_shaft() {
        let path = arrow_path(Point::ZERO, Point::new(5.0, 5.0), 1.0, false, false);
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn both_heads() {
        let path = arrow_path(Point::ZERO, Point::new(0.0, 50.0), 1.0, true, true);
        assert_eq!(path.subpath_count(), 5);
    }

    #[test]
    fn nan_input_is_empty() {
        let path = arrow_path(Point::new(f64::NAN, 0.0), Point::ZERO, 1.0, true, true);
        assert!(path.is_empty());
    }
}
