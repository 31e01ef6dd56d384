pub mod capture;
pub mod event;

pub use capture::{FixedGeometry, GeometryProvider, InputCapture, ScriptedCapture};
pub use event::{KeyState, PointerPhase, RawInputEvent};
