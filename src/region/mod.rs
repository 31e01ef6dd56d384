pub mod draft;
pub mod frame_picker;
pub mod overlay;

pub use draft::{generate_region_id, Region, RegionDraft};
pub use frame_picker::FramePicker;
pub use overlay::OverlayPicker;
