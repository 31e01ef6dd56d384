use crate::geometry::{local_point_to_global, rect_from_corners, GestureSnapshot, LocalPoint, Rect};

const STATUS_IDLE: &str = "Click upper-left corner";
const STATUS_DRAGGING: &str = "Drag to lower-right corner";
const STATUS_ADJUSTING: &str = "Release to confirm lower-right corner";

#[derive(Debug, Clone, Copy)]
struct OverlayGesture {
    snapshot: Option<GestureSnapshot>,
    start: LocalPoint,
    current: Option<LocalPoint>,
}

/// Two-corner region selection on a transparent overlay covering the desktop.
///
/// Points are kept in overlay-local logical pixels until release. The window
/// geometry lookup is asynchronous, so a gesture may begin before a snapshot
/// exists; the first snapshot that arrives is latched for the rest of the
/// gesture.
#[derive(Debug, Default)]
pub struct OverlayPicker {
    latest: Option<GestureSnapshot>,
    gesture: Option<OverlayGesture>,
    error: Option<String>,
}

impl OverlayPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_snapshot(&mut self, snapshot: GestureSnapshot) {
        self.latest = Some(snapshot);
        if let Some(gesture) = self.gesture.as_mut() {
            gesture.snapshot.get_or_insert(snapshot);
        }
    }

    pub fn pointer_down(&mut self, point: LocalPoint) {
        self.error = None;
        self.gesture = Some(OverlayGesture {
            snapshot: self.latest,
            start: point,
            current: None,
        });
    }

    pub fn pointer_move(&mut self, point: LocalPoint) {
        if let Some(gesture) = self.gesture.as_mut() {
            gesture.current = Some(point);
        }
    }

    /// Map both corners to screen pixels and normalize. `None` for a click
    /// without movement or a release with no geometry.
    pub fn pointer_up(&mut self, point: LocalPoint) -> Option<Rect> {
        let gesture = self.gesture.take()?;
        let Some(snapshot) = gesture.snapshot else {
            tracing::warn!("window geometry never arrived; dropping overlay selection");
            self.error = Some("Window geometry unavailable, try again".to_string());
            return None;
        };
        let origin = snapshot.origin();
        let a = local_point_to_global(gesture.start, origin, snapshot.scale_factor);
        let b = local_point_to_global(point, origin, snapshot.scale_factor);
        let rect = rect_from_corners(a, b);
        match rect {
            Some(rect) => tracing::info!(
                x = rect.x,
                y = rect.y,
                width = rect.width,
                height = rect.height,
                "overlay region selected"
            ),
            None => tracing::debug!("overlay selection had zero area"),
        }
        rect
    }

    /// Local corners of the selection being dragged, for drawing.
    pub fn selection(&self) -> Option<(LocalPoint, LocalPoint)> {
        let gesture = self.gesture.as_ref()?;
        Some((gesture.start, gesture.current.unwrap_or(gesture.start)))
    }

    pub fn status(&self) -> &str {
        if let Some(error) = self.error.as_deref() {
            return error;
        }
        match self.gesture {
            None => STATUS_IDLE,
            Some(OverlayGesture { current: None, .. }) => STATUS_DRAGGING,
            Some(_) => STATUS_ADJUSTING,
        }
    }

    pub fn cancel(&mut self) {
        self.gesture = None;
        self.error = None;
    }
}
