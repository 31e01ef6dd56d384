use serde::{Deserialize, Serialize};

/// Modifier state attached to every raw input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub control: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    pub fn is_empty(&self) -> bool {
        !(self.shift || self.control || self.alt || self.meta)
    }

    /// Ctrl, Alt or Meta held. Shift alone still produces printable text.
    pub fn blocks_text(&self) -> bool {
        self.control || self.alt || self.meta
    }

    /// Held modifiers as marker prefixes, always in Ctrl, Alt, Shift, Meta order.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names = Vec::with_capacity(4);
        if self.control {
            names.push("Ctrl");
        }
        if self.alt {
            names.push("Alt");
        }
        if self.shift {
            names.push("Shift");
        }
        if self.meta {
            names.push("Meta");
        }
        names
    }
}

/// Canonical marker spelling for a modifier name, if it is one.
pub fn canonical_modifier(name: &str) -> Option<&'static str> {
    match name.trim().to_ascii_lowercase().as_str() {
        "ctrl" | "control" => Some("Ctrl"),
        "alt" | "option" => Some("Alt"),
        "shift" => Some("Shift"),
        "meta" | "cmd" | "command" | "super" | "win" => Some("Meta"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_use_fixed_priority_order() {
        let all = Modifiers { shift: true, control: true, alt: true, meta: true };
        assert_eq!(all.names(), vec!["Ctrl", "Alt", "Shift", "Meta"]);
        let shift_meta = Modifiers { shift: true, meta: true, ..Modifiers::NONE };
        assert_eq!(shift_meta.names(), vec!["Shift", "Meta"]);
        assert!(Modifiers::NONE.names().is_empty());
    }

    #[test]
    fn shift_alone_does_not_block_text() {
        assert!(!Modifiers { shift: true, ..Modifiers::NONE }.blocks_text());
        assert!(Modifiers { alt: true, ..Modifiers::NONE }.blocks_text());
    }
}
