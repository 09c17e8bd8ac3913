//! The persisted subset of the canvas view state.
//!
//! The canvas keeps a large transient app state (zoom, scroll, selection,
//! open menus, ...). Only the keys listed here survive a save.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canvas app-state keys persisted with a board.
pub const PERSISTED_KEYS: &[&str] = &[
    "viewBackgroundColor",
    "currentItemStrokeColor",
    "currentItemBackgroundColor",
];

/// Persisted view settings. Keys missing from the source app state stay
/// missing in the serialized form; keys present with a `null` value are
/// written as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_background_color: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_item_stroke_color: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_item_background_color: Option<Value>,
}

impl ViewState {
    /// Extract the persisted subset from a full canvas app state.
    pub fn from_app_state(app_state: &Value) -> Self {
        let pick = |key: &str| app_state.get(key).cloned();
        Self {
            view_background_color: pick(PERSISTED_KEYS[0]),
            current_item_stroke_color: pick(PERSISTED_KEYS[1]),
            current_item_background_color: pick(PERSISTED_KEYS[2]),
        }
    }

    /// Serialize to the stored string form.
    pub fn to_json(&self) -> String {
        // A struct of optional JSON values always serializes.
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
