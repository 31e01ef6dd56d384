/// Coordinate-space conversions between viewport-local pixels, capture-frame
/// pixels and absolute multi-monitor screen pixels.
///
/// Everything here is pure: identical inputs always give identical outputs,
/// and "not ready" or degenerate input is `None` rather than an error.
use crate::geometry::types::{DragSelection, LocalPoint, Point, Rect, SourceFrame, Viewport};

/// Map a drag over a displayed frame to a rectangle in screen pixels.
///
/// Returns `None` when the viewport has no layout yet or when the drag covers
/// less than one viewport pixel on either axis (a plain click is not a region).
pub fn drag_to_rect(
    selection: &DragSelection,
    frame: &SourceFrame,
    viewport: Viewport,
) -> Option<Rect> {
    if !viewport.is_laid_out() {
        return None;
    }

    let min_x = clamp(selection.start.x.min(selection.current.x), 0.0, viewport.width);
    let max_x = clamp(selection.start.x.max(selection.current.x), 0.0, viewport.width);
    let min_y = clamp(selection.start.y.min(selection.current.y), 0.0, viewport.height);
    let max_y = clamp(selection.start.y.max(selection.current.y), 0.0, viewport.height);

    let width_px = max_x - min_x;
    let height_px = max_y - min_y;
    if width_px < 1.0 || height_px < 1.0 {
        return None;
    }

    let scale_x = f64::from(frame.pixel_width) / viewport.width;
    let scale_y = f64::from(frame.pixel_height) / viewport.height;

    Some(Rect {
        x: frame.origin_x + round_i32(min_x * scale_x),
        y: frame.origin_y + round_i32(min_y * scale_y),
        width: round_u32(width_px * scale_x).max(1),
        height: round_u32(height_px * scale_y).max(1),
    })
}

/// `round(origin + point * scale)` per axis.
pub fn local_point_to_global(point: LocalPoint, window_origin: Point, scale_factor: f64) -> Point {
    Point {
        x: round_i32(f64::from(window_origin.x) + point.x * scale_factor),
        y: round_i32(f64::from(window_origin.y) + point.y * scale_factor),
    }
}

/// Normalize two screen-space corners (in any drag direction) to a rectangle.
pub fn rect_from_corners(a: Point, b: Point) -> Option<Rect> {
    let width = a.x.abs_diff(b.x);
    let height = a.y.abs_diff(b.y);
    if width == 0 || height == 0 {
        return None;
    }
    Some(Rect {
        x: a.x.min(b.x),
        y: a.y.min(b.y),
        width,
        height,
    })
}

/// Clamp a local point into the viewport, as pointer capture does for drags
/// that leave the canvas.
pub fn clamp_to_viewport(point: LocalPoint, viewport: Viewport) -> LocalPoint {
    LocalPoint {
        x: clamp(point.x, 0.0, viewport.width.max(0.0)),
        y: clamp(point.y, 0.0, viewport.height.max(0.0)),
    }
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

// JS-style rounding (half towards +inf) keeps results stable for negative
// offsets on monitors left of the primary.
fn round_i32(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

fn round_u32(value: f64) -> u32 {
    (value + 0.5).floor().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FULL_HD: SourceFrame = SourceFrame {
        origin_x: 0,
        origin_y: 0,
        pixel_width: 1920,
        pixel_height: 1080,
    };
    const HALF: Viewport = Viewport::new(960.0, 540.0);

    fn drag(x0: f64, y0: f64, x1: f64, y1: f64) -> DragSelection {
        DragSelection {
            start: LocalPoint::new(x0, y0),
            current: LocalPoint::new(x1, y1),
        }
    }

    #[test]
    fn scales_drag_to_frame_pixels() {
        let rect = drag_to_rect(&drag(10.0, 10.0, 110.0, 150.0), &FULL_HD, HALF);
        assert_eq!(rect, Some(Rect { x: 20, y: 20, width: 200, height: 280 }));

        let rect = drag_to_rect(&drag(100.0, 50.0, 200.0, 150.0), &FULL_HD, HALF);
        assert_eq!(rect, Some(Rect { x: 200, y: 100, width: 200, height: 200 }));
    }

    #[test]
    fn zero_area_drag_is_not_a_region() {
        assert_eq!(drag_to_rect(&drag(10.0, 10.0, 10.0, 10.0), &FULL_HD, HALF), None);
        assert_eq!(drag_to_rect(&drag(10.0, 10.0, 300.0, 10.5), &FULL_HD, HALF), None);
    }

    #[test]
    fn offset_display_keeps_negative_origin() {
        let frame = SourceFrame { origin_x: -1920, ..FULL_HD };
        let rect = drag_to_rect(&drag(0.0, 0.0, 100.0, 100.0), &frame, HALF);
        assert_eq!(rect, Some(Rect { x: -1920, y: 0, width: 200, height: 200 }));
    }

    #[test]
    fn viewport_without_layout_is_not_ready() {
        let rect = drag_to_rect(&drag(0.0, 0.0, 50.0, 50.0), &FULL_HD, Viewport::new(0.0, 540.0));
        assert_eq!(rect, None);
    }

    #[test]
    fn points_outside_viewport_are_clamped() {
        let rect = drag_to_rect(&drag(-40.0, -40.0, 2000.0, 2000.0), &FULL_HD, HALF);
        assert_eq!(rect, Some(Rect { x: 0, y: 0, width: 1920, height: 1080 }));
    }

    #[test]
    fn local_point_scales_around_window_origin() {
        let p = local_point_to_global(LocalPoint::new(100.0, 50.0), Point::new(-1920, 200), 1.5);
        assert_eq!(p, Point::new(-1770, 275));
        let p = local_point_to_global(LocalPoint::new(80.0, 40.0), Point::new(0, 0), 1.25);
        assert_eq!(p, Point::new(100, 50));
    }

    #[test]
    fn corners_normalize_in_any_direction() {
        let expected = Some(Rect { x: 10, y: 20, width: 30, height: 40 });
        assert_eq!(rect_from_corners(Point::new(10, 20), Point::new(40, 60)), expected);
        assert_eq!(rect_from_corners(Point::new(40, 60), Point::new(10, 20)), expected);
        assert_eq!(rect_from_corners(Point::new(40, 20), Point::new(10, 60)), expected);
        assert_eq!(rect_from_corners(Point::new(10, 20), Point::new(10, 60)), None);
    }

    proptest! {
        #[test]
        fn drag_is_direction_independent(
            x0 in -50.0f64..1010.0, y0 in -50.0f64..590.0,
            x1 in -50.0f64..1010.0, y1 in -50.0f64..590.0,
        ) {
            let sel = drag(x0, y0, x1, y1);
            let forward = drag_to_rect(&sel, &FULL_HD, HALF);
            prop_assert_eq!(forward, drag_to_rect(&sel.reversed(), &FULL_HD, HALF));
            if let Some(rect) = forward {
                prop_assert!(rect.width >= 1 && rect.height >= 1);
            }
        }

        #[test]
        fn sub_pixel_drags_yield_nothing(
            x0 in 0.0f64..960.0, y0 in 0.0f64..540.0,
            dx in -0.99f64..0.99, dy in -500.0f64..500.0,
        ) {
            prop_assert_eq!(drag_to_rect(&drag(x0, y0, x0 + dx, y0 + dy), &FULL_HD, HALF), None);
            prop_assert_eq!(drag_to_rect(&drag(x0, y0, x0 + dy, y0 + dx), &FULL_HD, HALF), None);
        }

        #[test]
        fn local_mapping_is_deterministic(
            x in -5000.0f64..5000.0, y in -5000.0f64..5000.0,
            ox in -4000i32..4000, oy in -4000i32..4000, scale in 0.5f64..3.0,
        ) {
            let a = local_point_to_global(LocalPoint::new(x, y), Point::new(ox, oy), scale);
            let b = local_point_to_global(LocalPoint::new(x, y), Point::new(ox, oy), scale);
            prop_assert_eq!(a, b);
        }
    }
}
