pub mod mapper;
pub mod types;

pub use mapper::{clamp_to_viewport, drag_to_rect, local_point_to_global, rect_from_corners};
pub use types::{DragSelection, GestureSnapshot, LocalPoint, Point, Rect, SourceFrame, Viewport};
