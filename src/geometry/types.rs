use serde::{Deserialize, Serialize};

/// Integer pixel position in absolute (multi-monitor) screen space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Position relative to a window or canvas, in the units the host reported it
/// (usually fractional CSS/logical pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct LocalPoint {
    pub x: f64,
    pub y: f64,
}

impl LocalPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Screen rectangle. Origin is absolute screen pixels, size is never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Centre in screen pixels, rounded towards the origin.
    pub fn center(&self) -> Point {
        Point::new(
            self.x + (self.width / 2) as i32,
            self.y + (self.height / 2) as i32,
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        let dx = i64::from(point.x) - i64::from(self.x);
        let dy = i64::from(point.y) - i64::from(self.y);
        dx >= 0 && dy >= 0 && dx < i64::from(self.width) && dy < i64::from(self.height)
    }
}

/// In-progress drag in viewport-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragSelection {
    pub start: LocalPoint,
    pub current: LocalPoint,
}

impl DragSelection {
    pub fn at(point: LocalPoint) -> Self {
        Self {
            start: point,
            current: point,
        }
    }

    pub fn reversed(&self) -> Self {
        Self {
            start: self.current,
            current: self.start,
        }
    }
}

/// Geometry of a captured frame: where it sits on the desktop and how many
/// device pixels it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFrame {
    pub origin_x: i32,
    pub origin_y: i32,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

/// Laid-out size of the surface the frame is displayed on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// False until the host has produced a real layout.
    pub fn is_laid_out(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Window/monitor origin and DPI scale, sampled once per gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureSnapshot {
    pub origin_x: i32,
    pub origin_y: i32,
    pub scale_factor: f64,
}

impl GestureSnapshot {
    /// Local coordinates already are screen coordinates.
    pub const IDENTITY: GestureSnapshot = GestureSnapshot {
        origin_x: 0,
        origin_y: 0,
        scale_factor: 1.0,
    };

    pub fn origin(&self) -> Point {
        Point::new(self.origin_x, self.origin_y)
    }

    /// Snapshot for a screenshot shown at `display_scale` of its native size
    /// (e.g. 0.8 in the action recorder window).
    pub fn for_scaled_preview(origin: Point, display_scale: f64) -> Self {
        let scale_factor = if display_scale > 0.0 { 1.0 / display_scale } else { 1.0 };
        Self {
            origin_x: origin.x,
            origin_y: origin.y,
            scale_factor,
        }
    }
}

impl Default for GestureSnapshot {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_is_half_open() {
        let rect = Rect { x: -10, y: 0, width: 20, height: 5 };
        assert!(rect.contains(Point::new(-10, 0)));
        assert!(rect.contains(Point::new(9, 4)));
        assert!(!rect.contains(Point::new(10, 4)));
        assert!(!rect.contains(Point::new(0, 5)));
        assert_eq!(rect.center(), Point::new(0, 2));
    }

    #[test]
    fn preview_snapshot_inverts_display_scale() {
        let snap = GestureSnapshot::for_scaled_preview(Point::new(0, 0), 0.8);
        assert!((snap.scale_factor - 1.25).abs() < 1e-12);
        assert_eq!(GestureSnapshot::for_scaled_preview(Point::new(1, 2), 0.0).scale_factor, 1.0);
    }
}
