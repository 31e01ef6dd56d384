pub mod coalescer;
pub mod driver;
pub mod event_bus;
pub mod session;

pub use coalescer::TextCoalescer;
pub use driver::{Recorder, RecorderCommand, RecorderHandle};
pub use event_bus::{RecorderBus, RecorderUpdate};
pub use session::{RecordedEvent, Recording, RecordingSession, SessionPreview, SessionState};
