use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::errors::{LoopAutomaError, LoopAutomaResult};
use crate::geometry::GestureSnapshot;
use crate::input::event::RawInputEvent;

/// OS-level input hook. `start` hands the backend a sink; the recorder drops
/// the receiving end on stop, so anything sent afterwards goes nowhere.
pub trait InputCapture: Send {
    fn start(&mut self, sink: mpsc::Sender<RawInputEvent>) -> LoopAutomaResult<()>;
    fn stop(&mut self) -> LoopAutomaResult<()>;
}

/// Source of the window/monitor origin and DPI scale for a gesture.
#[async_trait]
pub trait GeometryProvider: Send + Sync {
    async fn snapshot(&self) -> LoopAutomaResult<GestureSnapshot>;
}

/// Geometry that never changes, e.g. a single-monitor setup or tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeometry(pub GestureSnapshot);

#[async_trait]
impl GeometryProvider for FixedGeometry {
    async fn snapshot(&self) -> LoopAutomaResult<GestureSnapshot> {
        Ok(self.0)
    }
}

/// Replays a fixed list of events once per `start`. Used by the CLI and tests.
pub struct ScriptedCapture {
    script: Vec<RawInputEvent>,
    task: Option<JoinHandle<()>>,
    done: Option<tokio::sync::oneshot::Sender<usize>>,
}

impl ScriptedCapture {
    pub fn new(script: Vec<RawInputEvent>) -> Self {
        Self {
            script,
            task: None,
            done: None,
        }
    }

    /// Like `new`, plus a receiver that fires with the number of delivered
    /// events once the script has been fully sent.
    pub fn with_completion(
        script: Vec<RawInputEvent>,
    ) -> (Self, tokio::sync::oneshot::Receiver<usize>) {
        let (tx, rx) = tokio::sync::oneshot::channel();
        let mut capture = Self::new(script);
        capture.done = Some(tx);
        (capture, rx)
    }
}

impl InputCapture for ScriptedCapture {
    fn start(&mut self, sink: mpsc::Sender<RawInputEvent>) -> LoopAutomaResult<()> {
        if self.task.is_some() {
            return Err(LoopAutomaError::Capture("scripted capture already running".into()));
        }
        let script = self.script.clone();
        let done = self.done.take();
        self.task = Some(tokio::spawn(async move {
            let mut delivered = 0usize;
            for event in script {
                if sink.send(event).await.is_err() {
                    tracing::debug!(delivered, "script sink closed early");
                    break;
                }
                delivered += 1;
            }
            if let Some(done) = done {
                let _ = done.send(delivered);
            }
        }));
        tracing::debug!(events = self.script.len(), "scripted capture started");
        Ok(())
    }

    fn stop(&mut self) -> LoopAutomaResult<()> {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        Ok(())
    }
}

impl Drop for ScriptedCapture {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
