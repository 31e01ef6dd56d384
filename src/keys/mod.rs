pub mod codec;
pub mod modifiers;
pub mod table;

pub use codec::{contains_marker, format, format_combo, join, normalize, split, KeyCombo, Segment};
pub use modifiers::Modifiers;
pub use table::{is_modifier_key, special_keys, SpecialKey};
