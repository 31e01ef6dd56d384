/// Region dragging over a captured frame shown in a preview canvas.
use crate::geometry::{clamp_to_viewport, drag_to_rect, DragSelection, LocalPoint, SourceFrame, Viewport};
use crate::region::draft::{Region, RegionDraft};

#[derive(Debug, Clone, Copy)]
struct FrameGesture {
    // Frame geometry as of pointer-down; later frames do not affect this drag.
    frame: SourceFrame,
    selection: DragSelection,
}

#[derive(Debug, Default)]
pub struct FramePicker {
    frame: Option<SourceFrame>,
    disabled: bool,
    gesture: Option<FrameGesture>,
    pending: Option<RegionDraft>,
    region_count: usize,
}

impl FramePicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest captured frame geometry; `None` while the stream is stopped.
    pub fn set_frame(&mut self, frame: Option<SourceFrame>) {
        self.frame = frame;
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.gesture = None;
        }
    }

    /// Number of regions the profile already has, used for default names.
    pub fn set_region_count(&mut self, count: usize) {
        self.region_count = count;
    }

    /// Begin a drag. Ignored without a frame or while disabled.
    pub fn pointer_down(&mut self, point: LocalPoint, viewport: Viewport) -> bool {
        let Some(frame) = self.frame else {
            return false;
        };
        if self.disabled {
            return false;
        }
        let point = clamp_to_viewport(point, viewport);
        self.gesture = Some(FrameGesture {
            frame,
            selection: DragSelection::at(point),
        });
        self.pending = None;
        true
    }

    pub fn pointer_move(&mut self, point: LocalPoint, viewport: Viewport) {
        if let Some(gesture) = self.gesture.as_mut() {
            gesture.selection.current = clamp_to_viewport(point, viewport);
        }
    }

    /// Finish the drag against the canvas's current layout. Produces a draft
    /// unless the drag was degenerate or the canvas has no layout.
    pub fn pointer_up(&mut self, viewport: Viewport) -> Option<&RegionDraft> {
        let gesture = self.gesture.take()?;
        match drag_to_rect(&gesture.selection, &gesture.frame, viewport) {
            Some(rect) => {
                tracing::debug!(
                    x = rect.x,
                    y = rect.y,
                    width = rect.width,
                    height = rect.height,
                    "region drafted"
                );
                self.pending = Some(RegionDraft::with_defaults(rect, self.region_count));
                self.pending.as_ref()
            }
            None => {
                tracing::debug!("drag produced no region");
                None
            }
        }
    }

    /// Selection to draw while dragging, in viewport coordinates.
    pub fn selection(&self) -> Option<DragSelection> {
        self.gesture.map(|g| g.selection)
    }

    pub fn pending(&self) -> Option<&RegionDraft> {
        self.pending.as_ref()
    }

    pub fn commit(&mut self, id: Option<&str>, name: Option<&str>) -> Option<Region> {
        let region = self.pending.take()?.commit(id, name);
        self.region_count += 1;
        tracing::info!(id = %region.id, "region added");
        Some(region)
    }

    pub fn cancel(&mut self) {
        self.gesture = None;
        self.pending = None;
    }
}
