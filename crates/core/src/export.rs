//! Downloadable canvas file export.
//!
//! Produces the `.excalidraw` JSON document understood by the drawing
//! library's own "open file" action, so a board can leave the service
//! without a share link.

use serde::Serialize;
use serde_json::Value;

use crate::error::CoreError;

/// `type` field of the exported document.
pub const CANVAS_FILE_TYPE: &str = "excalidraw";

/// Schema version of the exported document.
pub const CANVAS_FILE_VERSION: u32 = 2;

/// File extension of exported boards.
pub const CANVAS_FILE_EXTENSION: &str = "excalidraw";

/// `source` field of the exported document.
pub const CANVAS_FILE_SOURCE: &str = "inkboard";

/// MIME type served for exported boards.
pub const CANVAS_FILE_MIME: &str = "application/json";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CanvasFile {
    #[serde(rename = "type")]
    kind: &'static str,
    version: u32,
    source: &'static str,
    elements: Value,
    app_state: Value,
    files: Value,
}

/// Render a board's stored content as a pretty-printed canvas file.
///
/// A missing `file_blobs` column becomes an empty `files` object.
pub fn canvas_file(
    elements: &str,
    view_state: &str,
    file_blobs: Option<&str>,
) -> Result<String, CoreError> {
    let parse = |field: &str, raw: &str| {
        serde_json::from_str::<Value>(raw)
            .map_err(|e| CoreError::Internal(format!("stored {field} is not valid JSON: {e}")))
    };

    let file = CanvasFile {
        kind: CANVAS_FILE_TYPE,
        version: CANVAS_FILE_VERSION,
        source: CANVAS_FILE_SOURCE,
        elements: parse("elements", elements)?,
        app_state: parse("view_state", view_state)?,
        files: match file_blobs {
            Some(raw) => parse("file_blobs", raw)?,
            None => Value::Object(Default::default()),
        },
    };

    serde_json::to_string_pretty(&file).map_err(|e| CoreError::Internal(e.to_string()))
}

/// File name offered for a board download. Characters that are unsafe in
/// file names or header values are replaced with `_`.
pub fn download_filename(title: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = if stem.is_empty() {
        crate::board::DEFAULT_TITLE.to_string()
    } else {
        stem
    };
    format!("{stem}.{CANVAS_FILE_EXTENSION}")
}
