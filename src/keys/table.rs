/// Canonical special-key names and the labels the editor shows for them.
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpecialKey {
    pub value: &'static str,
    pub label: &'static str,
}

const fn key(value: &'static str, label: &'static str) -> SpecialKey {
    SpecialKey { value, label }
}

pub const SPECIAL_KEYS: &[SpecialKey] = &[
    key("Enter", "Enter ↵"),
    key("Escape", "Escape ⎋"),
    key("Tab", "Tab ⇥"),
    key("Backspace", "Backspace"),
    key("Delete", "Delete"),
    key("ArrowUp", "Arrow ↑"),
    key("ArrowDown", "Arrow ↓"),
    key("ArrowLeft", "Arrow ←"),
    key("ArrowRight", "Arrow →"),
    key("Home", "Home"),
    key("End", "End"),
    key("PageUp", "Page Up"),
    key("PageDown", "Page Down"),
    key("Space", "Space"),
    key("F1", "F1"),
    key("F2", "F2"),
    key("F3", "F3"),
    key("F4", "F4"),
    key("F5", "F5"),
    key("F6", "F6"),
    key("F7", "F7"),
    key("F8", "F8"),
    key("F9", "F9"),
    key("F10", "F10"),
    key("F11", "F11"),
    key("F12", "F12"),
];

// Names X11/Win32 hooks report for the same physical keys.
const ALIASES: &[(&str, &str)] = &[
    ("return", "Enter"),
    ("esc", "Escape"),
    ("del", "Delete"),
    ("back", "Backspace"),
    ("up", "ArrowUp"),
    ("down", "ArrowDown"),
    ("left", "ArrowLeft"),
    ("right", "ArrowRight"),
    ("prior", "PageUp"),
    ("next", "PageDown"),
    ("pgup", "PageUp"),
    ("pgdn", "PageDown"),
    ("spacebar", "Space"),
];

pub fn special_keys() -> &'static [SpecialKey] {
    SPECIAL_KEYS
}

/// Case-insensitive lookup of a canonical key name (aliases included).
pub fn lookup(name: &str) -> Option<&'static str> {
    SPECIAL_KEYS
        .iter()
        .find(|k| k.value.eq_ignore_ascii_case(name))
        .map(|k| k.value)
        .or_else(|| {
            ALIASES
                .iter()
                .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
                .map(|(_, canonical)| *canonical)
        })
}

pub fn label_for(name: &str) -> Option<&'static str> {
    let canonical = lookup(name)?;
    SPECIAL_KEYS.iter().find(|k| k.value == canonical).map(|k| k.label)
}

/// True for keys that only ever act as modifiers (`Shift`, `Control_L`, ...).
pub fn is_modifier_key(name: &str) -> bool {
    let lower = name.trim().to_ascii_lowercase();
    let base = lower
        .trim_end_matches("_l")
        .trim_end_matches("_r")
        .trim_end_matches("left")
        .trim_end_matches("right");
    matches!(
        base,
        "shift" | "control" | "ctrl" | "alt" | "altgr" | "meta" | "super" | "os" | "cmd" | "command" | "option"
    )
}
