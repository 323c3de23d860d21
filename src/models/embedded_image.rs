//! Inline image payloads.
//!
//! Images travel through the content model as self-describing data URLs
//! (`data:{media-type};base64,{payload}`). Anything else (a plain URL, a relative
//! path) is kept as an external reference and never decoded. Payloads written
//! by the image optimizer carry an `optimized=1` parameter so later save cycles
//! leave them alone.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DATA_URL_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64";
const OPTIMIZED_PARAM: &str = "optimized=1";

pub const MEDIA_TYPE_PNG: &str = "image/png";
pub const MEDIA_TYPE_JPEG: &str = "image/jpeg";
pub const MEDIA_TYPE_SVG: &str = "image/svg+xml";

/// Errors raised when reading the bytes out of an image payload.
#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("image is an external reference, not an inline payload")]
    NotInline,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// An image embedded in the content tree as inline text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmbeddedImage(String);

struct DataUrl<'a> {
    media_type: &'a str,
    base64: bool,
    optimized: bool,
    payload: &'a str,
}

impl EmbeddedImage {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Build a base64 data URL from raw bytes.
    pub fn from_bytes(media_type: &str, bytes: &[u8]) -> Self {
        Self(format!(
            "{DATA_URL_PREFIX}{media_type}{BASE64_MARKER},{}",
            STANDARD.encode(bytes)
        ))
    }

    /// Build a base64 data URL tagged as optimizer output.
    pub fn optimized_from_bytes(media_type: &str, bytes: &[u8]) -> Self {
        Self(format!(
            "{DATA_URL_PREFIX}{media_type};{OPTIMIZED_PARAM}{BASE64_MARKER},{}",
            STANDARD.encode(bytes)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    fn data_url(&self) -> Option<DataUrl<'_>> {
        let rest = self.0.strip_prefix(DATA_URL_PREFIX)?;
        let (header, payload) = rest.split_once(',')?;
        let (media_type, params) = match header.split_once(';') {
            Some((media_type, params)) => (media_type, Some(params)),
            None => (header, None),
        };
        let has_param = |name: &str| {
            params
                .map(|p| p.split(';').any(|param| param.trim().eq_ignore_ascii_case(name)))
                .unwrap_or(false)
        };
        Some(DataUrl {
            media_type,
            base64: has_param("base64"),
            optimized: has_param(OPTIMIZED_PARAM),
            payload,
        })
    }

    /// True when the image carries its own bytes.
    pub fn is_inline(&self) -> bool {
        self.data_url().is_some()
    }

    /// Media type declared by the payload, e.g. `image/png`.
    pub fn media_type(&self) -> Option<&str> {
        self.data_url().map(|d| d.media_type)
    }

    /// True when the payload was written by the image optimizer.
    pub fn is_optimized(&self) -> bool {
        self.data_url().is_some_and(|d| d.optimized)
    }

    pub fn is_vector(&self) -> bool {
        self.media_type()
            .map(|m| m.to_ascii_lowercase().contains("svg"))
            .unwrap_or(false)
    }

    pub fn is_png(&self) -> bool {
        self.media_type()
            .map(|m| m.eq_ignore_ascii_case(MEDIA_TYPE_PNG))
            .unwrap_or(false)
    }

    /// Size of the decoded bytes, computed from the encoded length.
    pub fn decoded_len(&self) -> Option<usize> {
        let data = self.data_url()?;
        if !data.base64 {
            return Some(percent_decoded_len(data.payload));
        }
        let payload = data.payload.trim_end();
        let len = payload.len();
        let padding = payload.bytes().rev().take_while(|b| *b == b'=').count().min(2);
        Some(if len % 4 == 0 {
            (len / 4) * 3 - padding
        } else {
            (len * 3) / 4
        })
    }

    /// Decode the payload bytes.
    pub fn decode(&self) -> Result<Vec<u8>, PayloadError> {
        let data = self.data_url().ok_or(PayloadError::NotInline)?;
        if data.base64 {
            Ok(STANDARD.decode(data.payload.trim())?)
        } else {
            Ok(percent_decode(data.payload))
        }
    }
}

impl From<String> for EmbeddedImage {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for EmbeddedImage {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// Byte at `i` and the number of input bytes it consumes (`%XX` escapes take 3).
fn percent_byte(bytes: &[u8], i: usize) -> (u8, usize) {
    if bytes[i] == b'%'
        && i + 2 < bytes.len()
        && let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2]))
    {
        return (hi << 4 | lo, 3);
    }
    (bytes[i], 1)
}

fn percent_decode(input: &str) -> Vec<u8> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let (byte, consumed) = percent_byte(bytes, i);
        out.push(byte);
        i += consumed;
    }
    out
}

fn percent_decoded_len(input: &str) -> usize {
    let bytes = input.as_bytes();
    let mut len = 0;
    let mut i = 0;
    while i < bytes.len() {
        i += percent_byte(bytes, i).1;
        len += 1;
    }
    len
}

fn hex_value(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|d| d as u8)
}
