use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// A committed watch region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub rect: Rect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Result of one drag-and-release, waiting for the user to confirm it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionDraft {
    pub rect: Rect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl RegionDraft {
    pub fn new(rect: Rect) -> Self {
        Self { rect, id: None, name: None }
    }

    /// Draft pre-filled with `Region <n+1>` and a fresh id.
    pub fn with_defaults(rect: Rect, existing_regions: usize) -> Self {
        Self {
            rect,
            id: Some(generate_region_id()),
            name: Some(format!("Region {}", existing_regions + 1)),
        }
    }

    /// Turn the draft into a region. Overrides replace the draft's values;
    /// a blank id is regenerated and a blank name is dropped.
    pub fn commit(self, id: Option<&str>, name: Option<&str>) -> Region {
        let id = id
            .or(self.id.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(generate_region_id);
        let name = name
            .or(self.name.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Region { id, rect: self.rect, name }
    }
}

/// `region-<base36 unix millis>`.
pub fn generate_region_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
    format!("region-{}", to_base36(millis))
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
