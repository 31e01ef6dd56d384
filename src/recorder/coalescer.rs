use crate::action::Action;
use crate::keys::{self, Modifiers};

/// Pending text for one typing burst.
///
/// Printable characters and special-key markers go into the same buffer, so
/// `Hello{Key:Enter}continue` stays a single `Type`. Deciding *when* to flush
/// is the session's job.
#[derive(Debug, Default, Clone)]
pub struct TextCoalescer {
    buffer: String,
}

impl TextCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_printable_char(&mut self, ch: char) {
        self.buffer.push(ch);
    }

    pub fn on_non_printable_key(&mut self, key: &str, modifiers: &Modifiers) {
        self.buffer.push_str(&keys::format_combo(key, modifiers));
    }

    pub fn flush(&mut self) -> Option<Action> {
        if self.buffer.is_empty() {
            return None;
        }
        Some(Action::Type {
            text: std::mem::take(&mut self.buffer),
        })
    }

    pub fn pending(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

/// The character `text` types, if it is a single printable code point and no
/// Ctrl/Alt/Meta is held.
pub fn printable_char(text: &str, modifiers: &Modifiers) -> Option<char> {
    if modifiers.blocks_text() {
        return None;
    }
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if !ch.is_control() => Some(ch),
        _ => None,
    }
}
