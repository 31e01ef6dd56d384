pub mod action;
pub mod config;
pub mod errors;
pub mod geometry;
pub mod input;
pub mod keys;
pub mod recorder;
pub mod region;

pub use action::{Action, ActionList, MouseButton};
pub use errors::{LoopAutomaError, LoopAutomaResult};
pub use geometry::{GestureSnapshot, LocalPoint, Point, Rect, SourceFrame, Viewport};
pub use recorder::{Recorder, RecorderBus, RecorderCommand, RecorderHandle, RecorderUpdate, RecordingSession};

/// Install the global tracing subscriber. `RUST_LOG` wins; otherwise `info`.
pub fn init_tracing() {
    // Load .env file if present so RUST_LOG can come from it
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
}
