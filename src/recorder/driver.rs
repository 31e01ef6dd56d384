use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::RecordingConfig;
use crate::geometry::GestureSnapshot;
use crate::input::{GeometryProvider, InputCapture, RawInputEvent};
use crate::recorder::event_bus::{RecorderBus, RecorderUpdate};
use crate::recorder::session::RecordingSession;

const INPUT_BUFFER: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderCommand {
    Start,
    Stop,
    Cancel,
    Flush,
    Shutdown,
}

/// Handle for driving a running [`Recorder`].
#[derive(Clone)]
pub struct RecorderHandle {
    pub tx: mpsc::Sender<RecorderCommand>,
}

impl RecorderHandle {
    pub async fn send(&self, command: RecorderCommand) -> bool {
        self.tx.send(command).await.is_ok()
    }
}

/// Owns one [`RecordingSession`] and pumps the capture backend into it.
///
/// Commands and input are consumed on one task, so the session never sees
/// two events interleave.
pub struct Recorder {
    session: RecordingSession,
    capture: Box<dyn InputCapture>,
    geometry: Arc<dyn GeometryProvider>,
    bus: RecorderBus,
    commands: mpsc::Receiver<RecorderCommand>,
    input: Option<mpsc::Receiver<RawInputEvent>>,
}

impl Recorder {
    pub fn new(
        config: RecordingConfig,
        capture: Box<dyn InputCapture>,
        geometry: Arc<dyn GeometryProvider>,
        bus: RecorderBus,
    ) -> (Self, RecorderHandle) {
        let (tx, commands) = mpsc::channel(32);
        let recorder = Self {
            session: RecordingSession::new(config),
            capture,
            geometry,
            bus,
            commands,
            input: None,
        };
        (recorder, RecorderHandle { tx })
    }

    pub fn session(&self) -> &RecordingSession {
        &self.session
    }

    pub async fn run_loop(&mut self) {
        loop {
            tokio::select! {
                biased;
                command = self.commands.recv() => match command {
                    Some(RecorderCommand::Start) => self.start().await,
                    Some(RecorderCommand::Stop) => self.stop(),
                    Some(RecorderCommand::Cancel) => self.cancel(),
                    Some(RecorderCommand::Flush) => {
                        self.session.flush();
                        self.publish_preview();
                    }
                    Some(RecorderCommand::Shutdown) | None => {
                        self.cancel();
                        break;
                    }
                },
                Some(event) = next_input(&mut self.input) => {
                    if self.session.handle_event(event) {
                        self.publish_preview();
                    }
                }
            }
        }
        tracing::info!("recorder loop exited");
    }

    async fn start(&mut self) {
        if self.session.is_recording() {
            tracing::debug!("start ignored: already recording");
            return;
        }

        // The snapshot must be in hand before the first pointer is mapped.
        let (snapshot, degraded) = match self.geometry.snapshot().await {
            Ok(snapshot) => (snapshot, false),
            Err(e) => {
                tracing::warn!(error = %e, "geometry unavailable; recording in degraded identity mode");
                (GestureSnapshot::IDENTITY, true)
            }
        };

        let (sink, input) = mpsc::channel(INPUT_BUFFER);
        if let Err(e) = self.capture.start(sink) {
            tracing::error!(error = %e, "failed to start input capture");
            self.bus.publish(RecorderUpdate::Error { message: e.to_string() });
            return;
        }
        self.input = Some(input);
        self.session.start_with(snapshot);

        let session_id = self.session.session_id().unwrap_or_default().to_string();
        self.bus.publish(RecorderUpdate::Started { session_id, degraded });
    }

    fn stop(&mut self) {
        if !self.session.is_recording() {
            return;
        }
        // Deliver whatever the backend queued before the stop request.
        if let Some(input) = self.input.as_mut() {
            while let Ok(event) = input.try_recv() {
                self.session.handle_event(event);
            }
        }
        self.unsubscribe();
        if let Some(recording) = self.session.stop() {
            self.bus.publish(RecorderUpdate::Completed(recording));
        }
    }

    fn cancel(&mut self) {
        self.unsubscribe();
        if self.session.cancel() {
            self.bus.publish(RecorderUpdate::Cancelled);
        }
    }

    fn unsubscribe(&mut self) {
        if self.input.take().is_some() {
            if let Err(e) = self.capture.stop() {
                tracing::warn!(error = %e, "input capture did not stop cleanly");
            }
        }
    }

    fn publish_preview(&self) {
        self.bus.publish(RecorderUpdate::Preview(self.session.preview()));
    }
}

async fn next_input(input: &mut Option<mpsc::Receiver<RawInputEvent>>) -> Option<RawInputEvent> {
    match input {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
