use serde::{Deserialize, Serialize};

use crate::action::MouseButton;
use crate::geometry::LocalPoint;
use crate::keys::Modifiers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerPhase {
    Down,
    Up,
    Move,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyState {
    Down,
    Up,
}

/// Raw event as delivered by the OS hook or the capture surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawInputEvent {
    Pointer {
        #[serde(rename = "type")]
        phase: PointerPhase,
        x: f64,
        y: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        button: Option<MouseButton>,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Key {
        state: KeyState,
        key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Scroll {
        delta_x: f64,
        delta_y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// The capture surface gained or lost keyboard focus.
    Focus { focused: bool },
}

impl RawInputEvent {
    pub fn pointer(phase: PointerPhase, x: f64, y: f64, button: Option<MouseButton>) -> Self {
        RawInputEvent::Pointer {
            phase,
            x,
            y,
            button,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_down(x: f64, y: f64, button: MouseButton) -> Self {
        Self::pointer(PointerPhase::Down, x, y, Some(button))
    }

    pub fn pointer_up(x: f64, y: f64, button: MouseButton) -> Self {
        Self::pointer(PointerPhase::Up, x, y, Some(button))
    }

    pub fn pointer_move(x: f64, y: f64) -> Self {
        Self::pointer(PointerPhase::Move, x, y, None)
    }

    /// Key-down the way browsers report it: `key` is the character for
    /// printable keys and the key name otherwise.
    pub fn key_down(key: &str) -> Self {
        Self::key(KeyState::Down, key, None, Modifiers::NONE)
    }

    pub fn key_down_with(key: &str, modifiers: Modifiers) -> Self {
        Self::key(KeyState::Down, key, None, modifiers)
    }

    pub fn key_up(key: &str) -> Self {
        Self::key(KeyState::Up, key, None, Modifiers::NONE)
    }

    pub fn key(state: KeyState, key: &str, text: Option<&str>, modifiers: Modifiers) -> Self {
        RawInputEvent::Key {
            state,
            key: key.to_string(),
            text: text.map(str::to_string),
            modifiers,
        }
    }

    pub fn scroll(delta_x: f64, delta_y: f64) -> Self {
        RawInputEvent::Scroll {
            delta_x,
            delta_y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn focus_lost() -> Self {
        RawInputEvent::Focus { focused: false }
    }

    pub fn local_point(&self) -> Option<LocalPoint> {
        match self {
            RawInputEvent::Pointer { x, y, .. } => Some(LocalPoint::new(*x, *y)),
            _ => None,
        }
    }

    /// Timeline label, `None` for events too noisy to show (pointer moves).
    pub fn timeline_label(&self) -> Option<String> {
        match self {
            RawInputEvent::Pointer { phase: PointerPhase::Move, .. } => None,
            RawInputEvent::Pointer { phase: PointerPhase::Down, x, y, button, .. } => Some(format!(
                "{} click @ {},{}",
                button.unwrap_or(MouseButton::Left).as_str(),
                x.round(),
                y.round()
            )),
            RawInputEvent::Pointer { phase: PointerPhase::Up, button, .. } => Some(format!(
                "{} release",
                button.unwrap_or(MouseButton::Left).as_str()
            )),
            RawInputEvent::Key { state: KeyState::Up, .. } => None,
            RawInputEvent::Key { key, text, .. } => {
                let shown = text.as_deref().unwrap_or(key);
                if shown.chars().count() == 1 && shown != " " {
                    Some(format!("text \"{shown}\""))
                } else {
                    Some(format!("key {}", crate::keys::normalize(key)))
                }
            }
            RawInputEvent::Scroll { delta_x, delta_y, .. } => {
                Some(format!("scroll Δ{delta_x},{delta_y}"))
            }
            RawInputEvent::Focus { focused } => {
                Some(if *focused { "focus gained" } else { "focus lost" }.to_string())
            }
        }
    }
}
