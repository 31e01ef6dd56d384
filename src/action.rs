use serde::{Deserialize, Serialize};

use crate::keys::{self, Segment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    pub fn as_str(&self) -> &'static str {
        match self {
            MouseButton::Left => "Left",
            MouseButton::Right => "Right",
            MouseButton::Middle => "Middle",
        }
    }
}

/// One replayable automation step, as handed to the profile editor/executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    MoveCursor { x: i32, y: i32 },
    Click { x: i32, y: i32, button: MouseButton },
    /// Literal text; may embed `{Key:...}` markers.
    Type { text: String },
    Key { key: String },
}

impl Action {
    pub fn type_text(text: impl Into<String>) -> Self {
        Action::Type { text: text.into() }
    }

    pub fn is_empty_type(&self) -> bool {
        matches!(self, Action::Type { text } if text.is_empty())
    }

    /// Short human-readable form used in logs and the CLI.
    pub fn describe(&self) -> String {
        match self {
            Action::MoveCursor { x, y } => format!("Move cursor to ({x},{y})"),
            Action::Click { x, y, button } => format!("Click {} ({x},{y})", button.as_str()),
            Action::Type { text } => format!("Type \"{text}\""),
            Action::Key { key } => format!("Key {key}"),
        }
    }
}

/// One `Type` action per literal/marker segment of `text`.
///
/// Empty text gives the single `Type{""}` placeholder.
pub fn split_type_text(text: &str) -> Vec<Action> {
    let actions: Vec<Action> = keys::split(text)
        .into_iter()
        .filter(|segment| !segment.is_empty())
        .map(|segment| Action::Type { text: segment.to_text() })
        .collect();
    if actions.is_empty() {
        vec![Action::type_text("")]
    } else {
        actions
    }
}

/// Lower a recorded list to executor steps: clicks gain an explicit cursor
/// move, marker text becomes literal `Type`s interleaved with `Key`s.
pub fn expand_for_replay(actions: &[Action]) -> Vec<Action> {
    let mut steps = Vec::with_capacity(actions.len());
    for action in actions {
        match action {
            Action::Click { x, y, button } => {
                steps.push(Action::MoveCursor { x: *x, y: *y });
                steps.push(Action::Click { x: *x, y: *y, button: *button });
            }
            Action::Type { text } => {
                for segment in keys::split(text) {
                    match segment {
                        Segment::Literal(literal) if literal.is_empty() => {}
                        Segment::Literal(literal) => steps.push(Action::Type { text: literal }),
                        Segment::Marker(combo) => steps.push(Action::Key { key: combo.payload() }),
                    }
                }
            }
            other => steps.push(other.clone()),
        }
    }
    steps
}

/// Ordered action list with the small edits the recorder window offers
/// before the list is handed over.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionList(Vec<Action>);

impl ActionList {
    pub fn new(actions: Vec<Action>) -> Self {
        Self(actions)
    }

    pub fn as_slice(&self) -> &[Action] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn remove(&mut self, index: usize) -> Option<Action> {
        (index < self.0.len()).then(|| self.0.remove(index))
    }

    /// Returns false when `index` is already first (or out of range).
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.0.len() {
            return false;
        }
        self.0.swap(index, index - 1);
        true
    }

    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.0.len() {
            return false;
        }
        self.0.swap(index, index + 1);
        true
    }

    pub fn into_inner(self) -> Vec<Action> {
        self.0
    }
}

impl From<Vec<Action>> for ActionList {
    fn from(actions: Vec<Action>) -> Self {
        Self(actions)
    }
}
