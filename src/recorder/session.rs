/// Recording state machine: one owned struct, one mutation entry point.
///
/// `handle_event` is the only place raw input turns into actions. Clicks and
/// focus loss close the current typing burst; keyboard input feeds the
/// coalescer; everything else is kept for the timeline only.
use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::action::{Action, MouseButton};
use crate::config::{KeyTextSource, RecordingConfig, SpecialKeyMode};
use crate::geometry::{local_point_to_global, GestureSnapshot, LocalPoint};
use crate::input::{KeyState, PointerPhase, RawInputEvent};
use crate::keys::{self, KeyCombo, Modifiers};
use crate::recorder::coalescer::{printable_char, TextCoalescer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Recording,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedEvent {
    /// Position in the full event stream, including entries already evicted
    /// from the display window.
    pub seq: u64,
    pub at: DateTime<Utc>,
    pub event: RawInputEvent,
}

/// Frozen result of one start→stop cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub session_id: String,
    pub actions: Vec<Action>,
    pub event_count: u64,
    /// Most recent raw events, for display only.
    pub recent_events: Vec<RecordedEvent>,
    pub started_at: DateTime<Utc>,
    pub stopped_at: DateTime<Utc>,
}

/// Live view of a session: committed actions plus the pending burst.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPreview {
    pub state: SessionState,
    pub actions: Vec<Action>,
    pub pending_text: Option<String>,
    pub timeline: Vec<String>,
}

impl SessionPreview {
    /// Steps the user would get if they stopped now.
    pub fn step_count(&self) -> usize {
        self.actions.len()
    }
}

#[derive(Debug, Clone, Copy)]
enum KeyOutcome {
    Char(char),
    Special,
}

// Input held back behind a key-down that is still waiting for its key-up
// text (late-text hosts). Released strictly in arrival order.
#[derive(Debug, Clone)]
enum Held {
    Key {
        key: String,
        modifiers: Modifiers,
        outcome: Option<KeyOutcome>,
    },
    Click(Action),
}

impl Held {
    fn is_ready(&self) -> bool {
        !matches!(self, Held::Key { outcome: None, .. })
    }
}

#[derive(Debug)]
pub struct RecordingSession {
    state: SessionState,
    config: RecordingConfig,
    snapshot: GestureSnapshot,
    coalescer: TextCoalescer,
    events: VecDeque<RecordedEvent>,
    timeline: VecDeque<String>,
    event_count: u64,
    actions: Vec<Action>,
    held: VecDeque<Held>,
    session_id: String,
    started_at: DateTime<Utc>,
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self::new(RecordingConfig::default())
    }
}

impl RecordingSession {
    pub fn new(config: RecordingConfig) -> Self {
        Self {
            state: SessionState::Idle,
            config,
            snapshot: GestureSnapshot::IDENTITY,
            coalescer: TextCoalescer::new(),
            events: VecDeque::new(),
            timeline: VecDeque::new(),
            event_count: 0,
            actions: Vec::new(),
            held: VecDeque::new(),
            session_id: String::new(),
            started_at: Utc::now(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    pub fn session_id(&self) -> Option<&str> {
        self.is_recording().then_some(self.session_id.as_str())
    }

    /// Start with pointer coordinates taken as screen coordinates.
    pub fn start(&mut self) -> bool {
        self.start_with(GestureSnapshot::IDENTITY)
    }

    /// Start recording; `snapshot` maps pointer coordinates to the screen for
    /// the whole session. A second start while recording is ignored.
    pub fn start_with(&mut self, snapshot: GestureSnapshot) -> bool {
        if self.is_recording() {
            tracing::debug!(session = %self.session_id, "start ignored: already recording");
            return false;
        }
        self.reset();
        self.snapshot = snapshot;
        self.session_id = uuid::Uuid::new_v4().to_string();
        self.started_at = Utc::now();
        self.state = SessionState::Recording;
        tracing::info!(
            session = %self.session_id,
            scale = snapshot.scale_factor,
            origin_x = snapshot.origin_x,
            origin_y = snapshot.origin_y,
            "recording started"
        );
        true
    }

    /// Feed one raw event. Returns false when the session is not recording.
    pub fn handle_event(&mut self, event: RawInputEvent) -> bool {
        if !self.is_recording() {
            tracing::trace!("event dropped: session idle");
            return false;
        }
        self.record(&event);

        match &event {
            RawInputEvent::Pointer { phase: PointerPhase::Down, x, y, button, .. } => {
                let point = local_point_to_global(
                    LocalPoint::new(*x, *y),
                    self.snapshot.origin(),
                    self.snapshot.scale_factor,
                );
                let button = button.unwrap_or(MouseButton::Left);
                tracing::debug!(x = point.x, y = point.y, button = button.as_str(), "click recorded");
                let click = Action::Click { x: point.x, y: point.y, button };
                if self.held.is_empty() {
                    self.push_click(click);
                } else {
                    self.held.push_back(Held::Click(click));
                }
            }
            RawInputEvent::Pointer { .. } | RawInputEvent::Scroll { .. } => {}
            RawInputEvent::Focus { focused: false } => self.flush(),
            RawInputEvent::Focus { focused: true } => {}
            RawInputEvent::Key { state: KeyState::Down, key, text, modifiers } => {
                self.on_key_down(key, text.as_deref(), *modifiers)
            }
            RawInputEvent::Key { state: KeyState::Up, key, text, .. } => {
                self.on_key_up(key, text.as_deref())
            }
        }

        if let Some(label) = event.timeline_label() {
            self.push_label(label);
        }
        true
    }

    /// Close the current typing burst, if any. Keys still waiting for their
    /// key-up text are settled as markers first.
    pub fn flush(&mut self) {
        while let Some(held) = self.held.pop_front() {
            self.release(held);
        }
        self.commit_text();
    }

    /// Flush and hand over the recording. `None` when already idle.
    pub fn stop(&mut self) -> Option<Recording> {
        if !self.is_recording() {
            tracing::debug!("stop ignored: not recording");
            return None;
        }
        self.flush();
        debug_assert!(self.coalescer.is_empty(), "buffer must be empty after flush");
        debug_assert!(self.held.is_empty(), "held input must be released after flush");

        self.state = SessionState::Idle;
        let recording = Recording {
            session_id: std::mem::take(&mut self.session_id),
            actions: std::mem::take(&mut self.actions),
            event_count: self.event_count,
            recent_events: self.events.drain(..).collect(),
            started_at: self.started_at,
            stopped_at: Utc::now(),
        };
        tracing::info!(
            session = %recording.session_id,
            actions = recording.actions.len(),
            events = recording.event_count,
            "recording stopped"
        );
        Some(recording)
    }

    /// Discard everything recorded so far. Returns false when already idle.
    pub fn cancel(&mut self) -> bool {
        if !self.is_recording() {
            return false;
        }
        tracing::info!(
            session = %self.session_id,
            discarded = self.actions.len(),
            "recording cancelled"
        );
        self.reset();
        self.state = SessionState::Idle;
        true
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn pending_text(&self) -> &str {
        self.coalescer.pending()
    }

    pub fn recent_events(&self) -> impl Iterator<Item = &RecordedEvent> {
        self.events.iter()
    }

    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    /// Display labels for recent input and committed text, oldest first.
    pub fn timeline(&self) -> Vec<String> {
        self.timeline.iter().cloned().collect()
    }

    pub fn preview(&self) -> SessionPreview {
        let mut actions = self.actions.clone();
        let pending = self.coalescer.pending();
        if !pending.is_empty() {
            actions.push(Action::type_text(pending));
        }
        SessionPreview {
            state: self.state,
            actions,
            pending_text: (!pending.is_empty()).then(|| pending.to_string()),
            timeline: self.timeline(),
        }
    }

    fn reset(&mut self) {
        self.coalescer.clear();
        self.events.clear();
        self.timeline.clear();
        self.event_count = 0;
        self.actions.clear();
        self.held.clear();
        self.session_id.clear();
    }

    fn record(&mut self, event: &RawInputEvent) {
        self.event_count += 1;
        let capacity = self.config.timeline_capacity;
        if capacity == 0 {
            return;
        }
        while self.events.len() >= capacity {
            self.events.pop_front();
        }
        self.events.push_back(RecordedEvent {
            seq: self.event_count,
            at: Utc::now(),
            event: event.clone(),
        });
    }

    fn push_label(&mut self, label: String) {
        let capacity = self.config.timeline_capacity;
        if capacity == 0 {
            return;
        }
        while self.timeline.len() >= capacity {
            self.timeline.pop_front();
        }
        self.timeline.push_back(label);
    }

    fn commit_text(&mut self) {
        if let Some(action) = self.coalescer.flush() {
            tracing::debug!(action = %action.describe(), "text flushed");
            if let Action::Type { text } = &action {
                self.push_label(format!("type \"{text}\""));
            }
            self.actions.push(action);
        }
    }

    fn push_click(&mut self, click: Action) {
        self.commit_text();
        self.actions.push(click);
    }

    fn on_key_down(&mut self, key: &str, text: Option<&str>, modifiers: Modifiers) {
        if keys::is_modifier_key(key) {
            return;
        }

        let typed = text.filter(|t| !t.is_empty()).unwrap_or(key);
        let outcome = if let Some(ch) = printable_char(typed, &modifiers) {
            Some(KeyOutcome::Char(ch))
        } else if self.config.key_text == KeyTextSource::LateKeyUp
            && text.is_none()
            && !modifiers.blocks_text()
            && keys::table::lookup(key).is_none()
        {
            None
        } else {
            Some(KeyOutcome::Special)
        };

        match outcome {
            Some(outcome) if self.held.is_empty() => self.apply_key(key, &modifiers, outcome),
            outcome => self.held.push_back(Held::Key {
                key: key.to_string(),
                modifiers,
                outcome,
            }),
        }
    }

    // A key-up settles every press of that key still waiting for text, then
    // releases whatever is no longer blocked.
    fn on_key_up(&mut self, key: &str, text: Option<&str>) {
        let mut settled = false;
        for held in self.held.iter_mut() {
            if let Held::Key { key: held_key, modifiers, outcome } = held {
                if outcome.is_none() && held_key.as_str() == key {
                    *outcome = Some(match text.and_then(|t| printable_char(t, modifiers)) {
                        Some(ch) => KeyOutcome::Char(ch),
                        None => KeyOutcome::Special,
                    });
                    settled = true;
                }
            }
        }
        if !settled {
            return;
        }
        while self.held.front().is_some_and(Held::is_ready) {
            if let Some(held) = self.held.pop_front() {
                self.release(held);
            }
        }
    }

    fn release(&mut self, held: Held) {
        match held {
            Held::Key { key, modifiers, outcome } => {
                self.apply_key(&key, &modifiers, outcome.unwrap_or(KeyOutcome::Special))
            }
            Held::Click(click) => self.push_click(click),
        }
    }

    fn apply_key(&mut self, key: &str, modifiers: &Modifiers, outcome: KeyOutcome) {
        match outcome {
            KeyOutcome::Char(ch) => self.coalescer.on_printable_char(ch),
            KeyOutcome::Special => self.on_special_key(key, modifiers),
        }
    }

    fn on_special_key(&mut self, key: &str, modifiers: &Modifiers) {
        match self.config.special_keys {
            SpecialKeyMode::Inline => self.coalescer.on_non_printable_key(key, modifiers),
            SpecialKeyMode::Discrete => {
                self.commit_text();
                let combo = KeyCombo::new(key, modifiers);
                self.actions.push(Action::Key { key: combo.payload() });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn recording() -> RecordingSession {
        let mut session = RecordingSession::default();
        assert!(session.start());
        session
    }

    fn click(x: i32, y: i32) -> Action {
        Action::Click { x, y, button: MouseButton::Left }
    }

    #[test]
    fn typing_then_click() {
        let mut session = recording();
        session.handle_event(RawInputEvent::key_down("h"));
        session.handle_event(RawInputEvent::key_down("i"));
        session.handle_event(RawInputEvent::pointer_down(100.0, 100.0, MouseButton::Left));
        session.handle_event(RawInputEvent::pointer_up(100.0, 100.0, MouseButton::Left));
        let recording = session.stop().unwrap();
        assert_eq!(recording.actions, vec![Action::type_text("hi"), click(100, 100)]);
    }

    #[test]
    fn lone_special_key_becomes_marker() {
        let mut session = recording();
        session.handle_event(RawInputEvent::key_down("Enter"));
        let recording = session.stop().unwrap();
        assert_eq!(recording.actions, vec![Action::type_text("{Key:Enter}")]);
    }

    #[test]
    fn special_keys_stay_in_the_burst() {
        let mut session = recording();
        for key in ["H", "i", "Enter", "o", "k"] {
            session.handle_event(RawInputEvent::key_down(key));
        }
        session.handle_event(RawInputEvent::key_down_with("s", Modifiers { control: true, ..Modifiers::NONE }));
        session.handle_event(RawInputEvent::key_down_with("!", Modifiers { shift: true, ..Modifiers::NONE }));
        assert_eq!(session.stop().unwrap().actions, vec![Action::type_text("Hi{Key:Enter}ok{Key:Ctrl+s}!")]);
    }

    #[test]
    fn modifier_only_keys_are_ignored() {
        let mut session = recording();
        session.handle_event(RawInputEvent::key_down_with("Shift", Modifiers { shift: true, ..Modifiers::NONE }));
        session.handle_event(RawInputEvent::key_down("Control"));
        session.handle_event(RawInputEvent::key_up("Shift"));
        assert_eq!(session.pending_text(), "");
        assert!(session.stop().unwrap().actions.is_empty());
    }

    #[test]
    fn double_start_keeps_single_state() {
        let mut session = RecordingSession::default();
        assert!(session.start());
        assert!(!session.start());
        session.handle_event(RawInputEvent::pointer_down(5.0, 6.0, MouseButton::Left));
        assert_eq!(session.stop().unwrap().actions, vec![click(5, 6)]);
        assert!(session.stop().is_none());
    }

    #[test]
    fn cancel_discards_and_next_cycle_is_clean() {
        let mut session = recording();
        session.handle_event(RawInputEvent::key_down("x"));
        session.handle_event(RawInputEvent::pointer_down(1.0, 1.0, MouseButton::Right));
        session.handle_event(RawInputEvent::key_down("y"));
        assert!(session.cancel());
        assert!(!session.cancel());
        assert!(!session.handle_event(RawInputEvent::key_down("z")));

        assert!(session.start());
        session.handle_event(RawInputEvent::key_down("a"));
        let recording = session.stop().unwrap();
        assert_eq!(recording.actions, vec![Action::type_text("a")]);
        assert_eq!(recording.event_count, 1);
    }

    #[test]
    fn moves_scrolls_and_releases_produce_no_actions() {
        let mut session = recording();
        session.handle_event(RawInputEvent::pointer_move(3.0, 4.0));
        session.handle_event(RawInputEvent::scroll(0.0, -3.0));
        session.handle_event(RawInputEvent::pointer_up(3.0, 4.0, MouseButton::Left));
        assert_eq!(session.timeline(), vec!["scroll Δ0,-3".to_string(), "Left release".to_string()]);
        assert!(session.stop().unwrap().actions.is_empty());
    }

    #[test]
    fn focus_loss_flushes_the_burst() {
        let mut session = recording();
        session.handle_event(RawInputEvent::key_down("a"));
        session.handle_event(RawInputEvent::focus_lost());
        session.handle_event(RawInputEvent::key_down("b"));
        assert_eq!(
            session.stop().unwrap().actions,
            vec![Action::type_text("a"), Action::type_text("b")]
        );
    }

    #[test]
    fn clicks_map_through_the_session_snapshot() {
        let mut session = RecordingSession::default();
        session.start_with(GestureSnapshot::for_scaled_preview(crate::geometry::Point::new(0, 0), 0.8));
        session.handle_event(RawInputEvent::pointer_down(80.0, 40.0, MouseButton::Middle));
        assert_eq!(
            session.stop().unwrap().actions,
            vec![Action::Click { x: 100, y: 50, button: MouseButton::Middle }]
        );
    }

    #[test]
    fn event_window_is_bounded_but_actions_are_not() {
        let config = RecordingConfig { timeline_capacity: 3, ..RecordingConfig::default() };
        let mut session = RecordingSession::new(config);
        session.start();
        for i in 0..10 {
            session.handle_event(RawInputEvent::pointer_down(f64::from(i), 0.0, MouseButton::Left));
        }
        assert_eq!(session.recent_events().count(), 3);
        assert_eq!(session.recent_events().next().map(|e| e.seq), Some(8));
        let recording = session.stop().unwrap();
        assert_eq!(recording.actions.len(), 10);
        assert_eq!(recording.event_count, 10);
    }

    #[test]
    fn preview_projects_pending_text() {
        let mut session = recording();
        session.handle_event(RawInputEvent::pointer_down(1.0, 2.0, MouseButton::Left));
        session.handle_event(RawInputEvent::key_down("o"));
        let preview = session.preview();
        assert_eq!(preview.pending_text.as_deref(), Some("o"));
        assert_eq!(preview.actions, vec![click(1, 2), Action::type_text("o")]);
        assert_eq!(preview.step_count(), 2);
        // The projection does not commit anything.
        assert_eq!(session.actions(), &[click(1, 2)]);
    }

    #[test]
    fn discrete_mode_emits_key_actions() {
        let config = RecordingConfig {
            special_keys: SpecialKeyMode::Discrete,
            ..RecordingConfig::default()
        };
        let mut session = RecordingSession::new(config);
        session.start();
        session.handle_event(RawInputEvent::key_down("a"));
        session.handle_event(RawInputEvent::key_down("Return"));
        session.handle_event(RawInputEvent::key_down_with("Tab", Modifiers { shift: true, ..Modifiers::NONE }));
        assert_eq!(
            session.stop().unwrap().actions,
            vec![
                Action::type_text("a"),
                Action::Key { key: "Enter".into() },
                Action::Key { key: "Shift+Tab".into() },
            ]
        );
    }

    #[test]
    fn late_key_up_text_is_not_lost() {
        let config = RecordingConfig {
            key_text: KeyTextSource::LateKeyUp,
            ..RecordingConfig::default()
        };
        let mut session = RecordingSession::new(config);
        session.start();
        let down = |key: &str| RawInputEvent::key(KeyState::Down, key, None, Modifiers::NONE);
        let up = |key: &str, text: Option<&str>| RawInputEvent::key(KeyState::Up, key, text, Modifiers::NONE);

        session.handle_event(down("KeyO"));
        session.handle_event(up("KeyO", Some("o")));
        session.handle_event(down("Enter"));
        session.handle_event(down("KeyK"));
        session.handle_event(up("KeyK", Some("k")));
        // Final key never receives its key-up before stop.
        session.handle_event(down("Insert"));
        assert_eq!(
            session.stop().unwrap().actions,
            vec![Action::type_text("o{Key:Enter}k{Key:Insert}")]
        );
    }

    fn late_text_session() -> RecordingSession {
        let config = RecordingConfig {
            key_text: KeyTextSource::LateKeyUp,
            ..RecordingConfig::default()
        };
        let mut session = RecordingSession::new(config);
        session.start();
        session
    }

    fn late_down(key: &str) -> RawInputEvent {
        RawInputEvent::key(KeyState::Down, key, None, Modifiers::NONE)
    }

    fn late_up(key: &str, text: &str) -> RawInputEvent {
        RawInputEvent::key(KeyState::Up, key, Some(text), Modifiers::NONE)
    }

    #[test]
    fn late_text_survives_key_rollover() {
        let mut session = late_text_session();
        session.handle_event(late_down("KeyH"));
        session.handle_event(late_down("KeyI"));
        session.handle_event(late_up("KeyH", "h"));
        session.handle_event(late_up("KeyI", "i"));
        assert_eq!(session.stop().unwrap().actions, vec![Action::type_text("hi")]);
    }

    #[test]
    fn late_text_keeps_press_order_when_released_out_of_order() {
        let mut session = late_text_session();
        session.handle_event(late_down("KeyA"));
        session.handle_event(late_down("KeyB"));
        session.handle_event(late_up("KeyB", "b"));
        assert_eq!(session.pending_text(), "");
        session.handle_event(late_up("KeyA", "a"));
        assert_eq!(session.pending_text(), "ab");
        assert_eq!(session.stop().unwrap().actions, vec![Action::type_text("ab")]);
    }

    #[test]
    fn click_before_late_key_up_keeps_the_character() {
        let mut session = late_text_session();
        session.handle_event(late_down("KeyA"));
        session.handle_event(RawInputEvent::pointer_down(1.0, 1.0, MouseButton::Left));
        assert!(session.actions().is_empty());
        session.handle_event(late_up("KeyA", "a"));
        session.handle_event(late_down("KeyB"));
        session.handle_event(late_up("KeyB", "b"));
        assert_eq!(
            session.stop().unwrap().actions,
            vec![Action::type_text("a"), click(1, 1), Action::type_text("b")]
        );
    }

    #[test]
    fn focus_loss_settles_keys_still_waiting_for_text() {
        let mut session = late_text_session();
        session.handle_event(late_down("KeyQ"));
        session.handle_event(RawInputEvent::focus_lost());
        session.handle_event(late_up("KeyQ", "q"));
        assert_eq!(session.stop().unwrap().actions, vec![Action::type_text("{Key:KeyQ}")]);
    }

    #[test]
    fn timeline_shows_committed_bursts() {
        let mut session = recording();
        session.handle_event(RawInputEvent::key_down("h"));
        session.handle_event(RawInputEvent::key_down("i"));
        session.handle_event(RawInputEvent::pointer_down(100.0, 100.0, MouseButton::Left));
        assert_eq!(
            session.timeline(),
            vec![
                "text \"h\"".to_string(),
                "text \"i\"".to_string(),
                "type \"hi\"".to_string(),
                "Left click @ 100,100".to_string(),
            ]
        );
    }

    #[test]
    fn timeline_is_bounded() {
        let config = RecordingConfig { timeline_capacity: 2, ..RecordingConfig::default() };
        let mut session = RecordingSession::new(config);
        session.start();
        session.handle_event(RawInputEvent::key_down("a"));
        session.handle_event(RawInputEvent::focus_lost());
        assert_eq!(
            session.timeline(),
            vec!["type \"a\"".to_string(), "focus lost".to_string()]
        );
    }

    #[test]
    fn key_up_is_ignored_in_key_down_mode() {
        let mut session = recording();
        session.handle_event(RawInputEvent::key(KeyState::Up, "KeyA", Some("a"), Modifiers::NONE));
        assert_eq!(session.pending_text(), "");
        assert!(session.stop().unwrap().actions.is_empty());
    }

    proptest! {
        #[test]
        fn uninterrupted_burst_is_one_type(text in "[a-zA-Z0-9 !?.,]{1,40}") {
            let mut session = recording();
            for ch in text.chars() {
                session.handle_event(RawInputEvent::key_down(&ch.to_string()));
            }
            let actions = session.stop().unwrap().actions;
            prop_assert_eq!(actions, vec![Action::type_text(text.clone())]);
        }

        #[test]
        fn action_count_is_clicks_plus_flushes(steps in proptest::collection::vec(any::<bool>(), 0..30)) {
            // true = click, false = printable key
            let mut session = recording();
            let mut clicks = 0;
            let mut flushes = 0;
            let mut pending = false;
            for &is_click in &steps {
                if is_click {
                    if pending { flushes += 1; pending = false; }
                    clicks += 1;
                    session.handle_event(RawInputEvent::pointer_down(1.0, 1.0, MouseButton::Left));
                } else {
                    pending = true;
                    session.handle_event(RawInputEvent::key_down("a"));
                }
            }
            if pending { flushes += 1; }
            let actions = session.stop().unwrap().actions;
            prop_assert_eq!(actions.len(), clicks + flushes);
            prop_assert!(actions.iter().all(|a| !a.is_empty_type()));
        }
    }
}
