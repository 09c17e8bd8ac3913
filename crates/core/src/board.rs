//! Board document constants, validation, and the partial-update patch.
//!
//! Shared between the repository layer (which applies patches), the HTTP
//! API (which validates them), and the client synchronizer (which builds
//! them from canvas snapshots).

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{BoardId, OwnerId, Timestamp};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// A full board document as returned by `GET /boards/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub owner_id: OwnerId,
    pub title: String,
    pub elements: String,
    pub view_state: String,
    pub file_blobs: Option<String>,
    pub thumbnail: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Board {
    /// Apply a patch to this in-memory copy, mirroring what the repository
    /// does to the stored row. Timestamps are left alone.
    pub fn apply(&mut self, patch: &BoardPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(elements) = &patch.elements {
            self.elements = elements.clone();
        }
        if let Some(view_state) = &patch.view_state {
            self.view_state = view_state.clone();
        }
        if let Some(file_blobs) = &patch.file_blobs {
            self.file_blobs = file_blobs.clone();
        }
        if let Some(thumbnail) = &patch.thumbnail {
            self.thumbnail = thumbnail.clone();
        }
    }
}

/// A row of the board list, without the heavy content columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSummary {
    pub id: BoardId,
    pub title: String,
    pub thumbnail: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Response of `POST /boards`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreatedBoard {
    pub id: BoardId,
}

/// Response of `PUT /boards/{id}`. The content is not echoed back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardUpdated {
    pub id: BoardId,
    pub updated_at: Timestamp,
}

/// Request body of `POST /boards`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBoard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Title given to boards created without one.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Serialized element list of a freshly created board.
pub const EMPTY_ELEMENTS: &str = "[]";

/// Serialized view state of a freshly created board.
pub const EMPTY_VIEW_STATE: &str = "{}";

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Entity name used in not-found errors.
pub const BOARD_ENTITY: &str = "Board";

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Normalize a user-supplied title: trims whitespace and rejects empty or
/// over-long values.
pub fn normalize_title(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Title must not be empty".to_string());
    }
    let len = trimmed.chars().count();
    if len > MAX_TITLE_LEN {
        return Err(format!(
            "Title must be at most {MAX_TITLE_LEN} characters, got {len}"
        ));
    }
    Ok(trimmed.to_string())
}

/// Coerce a title from an outside source into one [`normalize_title`]
/// accepts: trimmed, cut to [`MAX_TITLE_LEN`] characters, and
/// [`DEFAULT_TITLE`] when nothing is left.
pub fn lenient_title(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return DEFAULT_TITLE.to_string();
    }
    trimmed
        .chars()
        .take(MAX_TITLE_LEN)
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Check that a serialized field holds a JSON document of the expected shape.
///
/// `elements` must be an array and `view_state` an object; both are opaque
/// to the server otherwise.
pub fn validate_serialized(field: &str, raw: &str, expect_array: bool) -> Result<(), String> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| format!("{field} is not valid JSON: {e}"))?;
    let shape_ok = if expect_array {
        value.is_array()
    } else {
        value.is_object()
    };
    if !shape_ok {
        let expected = if expect_array { "an array" } else { "an object" };
        return Err(format!("{field} must be {expected}"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Partial update
// ---------------------------------------------------------------------------

/// A partial update of a board. Absent fields are left untouched.
///
/// `file_blobs` and `thumbnail` are nullable columns, so they use
/// `Option<Option<String>>`: `None` leaves the column alone, `Some(None)`
/// clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_state: Option<String>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub file_blobs: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub thumbnail: Option<Option<String>>,
}

impl BoardPatch {
    /// Patch that only renames the board.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Patch carrying the three canvas-derived fields written by autosave.
    pub fn content(elements: String, view_state: String, file_blobs: Option<String>) -> Self {
        Self {
            elements: Some(elements),
            view_state: Some(view_state),
            file_blobs: Some(file_blobs),
            ..Self::default()
        }
    }

    /// Whether the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.elements.is_none()
            && self.view_state.is_none()
            && self.file_blobs.is_none()
            && self.thumbnail.is_none()
    }

    /// Validate every present field, normalizing the title in place.
    pub fn validate(&mut self) -> Result<(), String> {
        if let Some(title) = &self.title {
            self.title = Some(normalize_title(title)?);
        }
        if let Some(elements) = &self.elements {
            validate_serialized("elements", elements, true)?;
        }
        if let Some(view_state) = &self.view_state {
            validate_serialized("view_state", view_state, false)?;
        }
        if let Some(Some(files)) = &self.file_blobs {
            validate_serialized("file_blobs", files, false)?;
        }
        Ok(())
    }
}

/// Deserialize a present field (including an explicit `null`) as `Some(..)`.
///
/// Combined with `#[serde(default)]`, a missing key stays `None`.
fn explicit_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
