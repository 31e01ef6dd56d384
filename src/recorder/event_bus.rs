use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::SendError;

use crate::recorder::session::{Recording, SessionPreview};

/// Updates the recorder publishes for UI subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecorderUpdate {
    Started {
        session_id: String,
        /// Geometry lookup failed; pointer coordinates are taken as-is.
        degraded: bool,
    },
    Preview(SessionPreview),
    Completed(Recording),
    Cancelled,
    Error {
        message: String,
    },
}

#[derive(Clone)]
pub struct RecorderBus {
    tx: broadcast::Sender<RecorderUpdate>,
}

impl RecorderBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RecorderUpdate> {
        self.tx.subscribe()
    }

    pub fn send(&self, update: RecorderUpdate) -> Result<(), SendError<RecorderUpdate>> {
        self.tx.send(update).map(|_| ())
    }

    /// Send, ignoring the no-subscriber case.
    pub fn publish(&self, update: RecorderUpdate) {
        if self.send(update).is_err() {
            tracing::trace!("recorder update dropped: no subscribers");
        }
    }
}

impl Default for RecorderBus {
    fn default() -> Self {
        Self::new(100)
    }
}
