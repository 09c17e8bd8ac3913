//! Share-link codec.
//!
//! A board is shared by packing its content into the URL fragment of a
//! `/share` link, so no share session is stored server-side and the token
//! never appears in request logs. The token is the zlib-deflated JSON of a
//! [`SharePayload`], base64-encoded with the URL-safe alphabet and no
//! padding.
//!
//! The zlib stream format matches what browsers emit for
//! `CompressionStream("deflate")`, so links minted by the web client decode
//! here and vice versa. Raw deflate streams are accepted on decode as well.

use std::io::{Read, Write};

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use flate2::read::{DeflateDecoder, ZlibDecoder};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};

/// Links longer than this may be truncated or rejected by older browsers
/// and some proxies.
pub const MAX_SHARE_URL_LEN: usize = 100_000;

/// Upper bound on the inflated payload size accepted by [`decode`].
pub const MAX_DECODED_BYTES: u64 = 64 * 1024 * 1024;

/// Fragment parameter carrying the token.
pub const FRAGMENT_PARAM: &str = "data";

/// Path of the import route on the web client.
pub const SHARE_PATH: &str = "/share";

/// Board content carried inside a share token. No identity, no owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharePayload {
    pub title: String,
    pub elements: String,
    #[serde(rename = "appState", alias = "viewState")]
    pub view_state: String,
    #[serde(rename = "files", alias = "fileBlobs", default)]
    pub file_blobs: Option<String>,
}

/// Errors produced while decoding a share token.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ShareError {
    /// The fragment carried no token at all.
    #[error("No share data found")]
    MissingData,

    /// The token could not be turned back into a payload.
    #[error("Malformed share data: {0}")]
    Malformed(String),
}

/// Encode a payload into a URL-safe token.
pub fn encode(payload: &SharePayload) -> Result<String, ShareError> {
    let json = serde_json::to_vec(payload).map_err(|e| ShareError::Malformed(e.to_string()))?;

    let mut encoder = ZlibEncoder::new(Vec::with_capacity(json.len() / 2), Compression::default());
    encoder
        .write_all(&json)
        .map_err(|e| ShareError::Malformed(e.to_string()))?;
    let compressed = encoder
        .finish()
        .map_err(|e| ShareError::Malformed(e.to_string()))?;

    Ok(URL_SAFE_NO_PAD.encode(compressed))
}

/// Decode a token produced by [`encode`] (or by the web client).
pub fn decode(token: &str) -> Result<SharePayload, ShareError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ShareError::MissingData);
    }

    let mut base64: String = token
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    while base64.len() % 4 != 0 {
        base64.push('=');
    }

    let compressed = STANDARD
        .decode(base64.as_bytes())
        .map_err(|e| ShareError::Malformed(format!("invalid base64: {e}")))?;

    let json = inflate(&compressed)?;

    serde_json::from_slice(&json).map_err(|e| ShareError::Malformed(format!("invalid payload: {e}")))
}

/// Build the full share link for a token.
pub fn share_url(origin: &str, token: &str) -> String {
    format!(
        "{}{SHARE_PATH}#{FRAGMENT_PARAM}={token}",
        origin.trim_end_matches('/')
    )
}

/// Whether a share link is past the practical URL length limit.
pub fn exceeds_url_limit(url: &str) -> bool {
    url.len() > MAX_SHARE_URL_LEN
}

/// Extract the token from a URL fragment such as `#data=...` or
/// `data=...&other=1`. Returns `None` when the parameter is absent or empty.
pub fn token_from_fragment(fragment: &str) -> Option<&str> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    fragment
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == FRAGMENT_PARAM)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

fn inflate(compressed: &[u8]) -> Result<Vec<u8>, ShareError> {
    let mut out = Vec::new();
    let zlib = ZlibDecoder::new(compressed)
        .take(MAX_DECODED_BYTES + 1)
        .read_to_end(&mut out);

    if zlib.is_err() {
        out.clear();
        DeflateDecoder::new(compressed)
            .take(MAX_DECODED_BYTES + 1)
            .read_to_end(&mut out)
            .map_err(|e| ShareError::Malformed(format!("corrupt compressed stream: {e}")))?;
    }

    if out.len() as u64 > MAX_DECODED_BYTES {
        return Err(ShareError::Malformed(format!(
            "payload exceeds {MAX_DECODED_BYTES} bytes"
        )));
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use flate2::write::DeflateEncoder;

    fn notes() -> SharePayload {
        SharePayload {
            title: "Notes".to_string(),
            elements: "[]".to_string(),
            view_state: "{}".to_string(),
            file_blobs: None,
        }
    }

    #[test]
    fn notes_round_trip() {
        let token = encode(&notes()).unwrap();
        assert_eq!(decode(&token).unwrap(), notes());
    }

    #[test]
    fn round_trip_with_content_and_files() {
        let payload = SharePayload {
            title: "Flow chart ✏️".to_string(),
            elements: r#"[{"id":"a","type":"rectangle","x":10,"y":20}]"#.to_string(),
            view_state: r##"{"viewBackgroundColor":"#fff"}"##.to_string(),
            file_blobs: Some(r#"{"f1":{"dataURL":"data:image/png;base64,AAAA"}}"#.to_string()),
        };
        assert_eq!(decode(&encode(&payload).unwrap()).unwrap(), payload);
    }

    #[test]
    fn token_is_url_safe() {
        let elements: Vec<String> = (0..200).map(|i| format!("{{\"n\":{i}}}")).collect();
        let payload = SharePayload {
            elements: format!("[{}]", elements.join(",")),
            ..notes()
        };
        let token = encode(&payload).unwrap();
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn payload_uses_client_json_keys() {
        let json = serde_json::to_value(notes()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "Notes",
                "elements": "[]",
                "appState": "{}",
                "files": null,
            })
        );
    }

    #[test]
    fn decode_empty_is_missing_data() {
        assert_eq!(decode(""), Err(ShareError::MissingData));
        assert_eq!(decode("   "), Err(ShareError::MissingData));
    }

    #[test]
    fn decode_rejects_invalid_base64() {
        assert_matches!(decode("not*valid*base64!"), Err(ShareError::Malformed(_)));
    }

    #[test]
    fn decode_rejects_non_deflate_bytes() {
        let token = URL_SAFE_NO_PAD.encode(b"plain text, not compressed");
        assert_matches!(decode(&token), Err(ShareError::Malformed(_)));
    }

    #[test]
    fn decode_rejects_schema_mismatch() {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(br#"{"title":"x"}"#).unwrap();
        let token = URL_SAFE_NO_PAD.encode(encoder.finish().unwrap());
        assert_matches!(decode(&token), Err(ShareError::Malformed(_)));
    }

    #[test]
    fn decode_accepts_raw_deflate() {
        let json = serde_json::to_vec(&notes()).unwrap();
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&json).unwrap();
        let token = URL_SAFE_NO_PAD.encode(encoder.finish().unwrap());
        assert_eq!(decode(&token).unwrap(), notes());
    }

    #[test]
    fn decode_accepts_padded_standard_alphabet() {
        let json = serde_json::to_vec(&notes()).unwrap();
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&json).unwrap();
        let token = STANDARD.encode(encoder.finish().unwrap());
        assert_eq!(decode(&token).unwrap(), notes());
    }

    #[test]
    fn missing_files_key_decodes_as_none() {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(br#"{"title":"t","elements":"[]","appState":"{}"}"#)
            .unwrap();
        let token = URL_SAFE_NO_PAD.encode(encoder.finish().unwrap());
        assert_eq!(decode(&token).unwrap().file_blobs, None);
    }

    #[test]
    fn share_url_builds_fragment() {
        assert_eq!(
            share_url("https://app.example.com/", "abc"),
            "https://app.example.com/share#data=abc"
        );
    }

    #[test]
    fn fragment_parsing() {
        assert_eq!(token_from_fragment("#data=abc"), Some("abc"));
        assert_eq!(token_from_fragment("x=1&data=abc"), Some("abc"));
        assert_eq!(token_from_fragment("#data="), None);
        assert_eq!(token_from_fragment(""), None);
        assert_eq!(token_from_fragment("#other=1"), None);
    }

    #[test]
    fn url_limit() {
        assert!(!exceeds_url_limit(&"a".repeat(MAX_SHARE_URL_LEN)));
        assert!(exceeds_url_limit(&"a".repeat(MAX_SHARE_URL_LEN + 1)));
    }
}
