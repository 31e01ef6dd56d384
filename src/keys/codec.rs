/// Inline special-key markers: `{Key:Enter}`, `{Key:Ctrl+Shift+K}`.
///
/// Markers are flat and regex-scannable. Anything that does not match the
/// marker pattern is literal text and is never touched.
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::keys::modifiers::{canonical_modifier, Modifiers};
use crate::keys::table;

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\{\s*Key\s*:\s*([^}]+)\}").expect("marker pattern is valid")
});

/// Canonical spelling of a key name. Unknown names pass through trimmed.
pub fn normalize(raw: &str) -> String {
    if raw == " " {
        return "Space".to_string();
    }
    let trimmed = raw.trim();
    match table::lookup(trimmed) {
        Some(canonical) => canonical.to_string(),
        None => trimmed.to_string(),
    }
}

pub fn format(key: &str) -> String {
    format!("{{Key:{}}}", normalize(key))
}

/// Marker for a key pressed with `modifiers` held, e.g. `{Key:Ctrl+Shift+K}`.
pub fn format_combo(key: &str, modifiers: &Modifiers) -> String {
    KeyCombo::new(key, modifiers).to_string()
}

pub fn contains_marker(text: &str) -> bool {
    MARKER_RE
        .captures_iter(text)
        .any(|caps| !caps[1].trim().is_empty())
}

/// A key plus the modifiers held with it, as carried inside one marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyCombo {
    pub modifiers: Vec<String>,
    pub key: String,
}

impl KeyCombo {
    pub fn new(key: &str, modifiers: &Modifiers) -> Self {
        Self {
            modifiers: modifiers.names().into_iter().map(str::to_string).collect(),
            key: normalize(key),
        }
    }

    /// Parse a marker payload such as `ctrl + k` or `Ctrl++`.
    pub fn parse(payload: &str) -> Self {
        let payload = payload.trim();
        let (mods, key): (Vec<&str>, &str) = if payload == "+" {
            (Vec::new(), "+")
        } else if let Some(rest) = payload.strip_suffix("++") {
            (rest.split('+').collect(), "+")
        } else if let Some((rest, key)) = payload.rsplit_once('+') {
            (rest.split('+').collect(), key)
        } else {
            (Vec::new(), payload)
        };

        let modifiers = mods
            .into_iter()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(|m| canonical_modifier(m).map(str::to_string).unwrap_or_else(|| m.to_string()))
            .collect();
        let key = if key == "+" { key.to_string() } else { normalize(key) };
        Self { modifiers, key }
    }

    /// `Ctrl+Shift+K`, the text between `{Key:` and `}`.
    pub fn payload(&self) -> String {
        let mut parts: Vec<&str> = self.modifiers.iter().map(String::as_str).collect();
        parts.push(&self.key);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{Key:{}}}", self.payload())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Segment {
    Literal(String),
    Marker(KeyCombo),
}

impl Segment {
    pub fn is_empty(&self) -> bool {
        matches!(self, Segment::Literal(text) if text.is_empty())
    }

    pub fn to_text(&self) -> String {
        match self {
            Segment::Literal(text) => text.clone(),
            Segment::Marker(combo) => combo.to_string(),
        }
    }
}

/// Split `text` into literal runs and markers, in order.
///
/// Text without markers comes back as a single literal, even when empty.
pub fn split(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in MARKER_RE.captures_iter(text) {
        let payload = caps[1].trim();
        if payload.is_empty() {
            continue;
        }
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            segments.push(Segment::Literal(text[last..whole.start()].to_string()));
        }
        segments.push(Segment::Marker(KeyCombo::parse(payload)));
        last = whole.end();
    }

    if last < text.len() || segments.is_empty() {
        segments.push(Segment::Literal(text[last..].to_string()));
    }
    segments
}

/// Inverse of [`split`].
pub fn join(segments: &[Segment]) -> String {
    segments.iter().map(Segment::to_text).collect()
}
