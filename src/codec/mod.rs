//! Decoders for the scalar encodings used by the member site.
//!
//! The member site's JSON is inconsistent about how it writes numbers, times and
//! durations. Each type in this module owns exactly one of those wire forms and
//! converts it to and from a regular Rust value:
//!
//! | Type | Wire form |
//! |---|---|
//! | [`Timestamp`] | `1700000000000` (Unix milliseconds) |
//! | [`SimTime`] | `"2023-11-14 12:00:00"` (UTC wall clock) |
//! | [`Milliseconds`] | `90500` (signed millisecond count) |
//! | [`Laptime`] | `"1:43.580"` |
//! | [`StringifiedUint64`] | `"1,234,567"` |
//! | [`Rating`] | `1350` or `"---"` |
//!
//! Every type has a `decode` function over the raw JSON token text and an
//! `encode` function producing it, plus `Serialize`/`Deserialize` impls so they
//! can be used directly as struct fields.
//!
//! ```
//! use irapi::codec::{Laptime, Rating};
//!
//! let lap = Laptime::decode(r#""1:43.580""#).unwrap();
//! assert_eq!(lap.as_millis(), 103_580);
//! assert_eq!(lap.to_string(), "1:43.580");
//!
//! assert!(Rating::decode(r#""---""#).unwrap().is_unrated());
//! ```

mod number;
mod time;

pub use number::{Rating, StringifiedUint64};
pub use time::{Laptime, Milliseconds, SimTime, Timestamp};

use percent_encoding::percent_decode_str;

/// A scalar value did not match its wire format.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind} value {input:?}: {reason}")]
pub struct FormatError {
    /// Name of the codec that rejected the input.
    pub kind: &'static str,
    /// The offending input, as received.
    pub input: String,
    /// What was wrong with it.
    pub reason: String,
}

impl FormatError {
    pub(crate) fn new(kind: &'static str, input: &str, reason: impl Into<String>) -> Self {
        Self {
            kind,
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Strips one pair of surrounding double quotes from a JSON string token.
pub(crate) fn unquote<'a>(kind: &'static str, raw: &'a str) -> Result<&'a str, FormatError> {
    raw.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| FormatError::new(kind, raw, "expected a quoted string"))
}

/// Strips surrounding quotes if present, for tokens that arrive either way.
pub(crate) fn trim_quotes(raw: &str) -> &str {
    raw.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw)
}

/// Reverses the query-string escaping the member site wraps around its JSON.
///
/// `+` becomes a space and `%XX` sequences are decoded. A `%` that is not
/// followed by two hex digits is rejected, as is a result that is not UTF-8.
///
/// ```
/// let body = irapi::codec::unescape_body("%7B%22name%22%3A%22Jane+Doe%22%7D").unwrap();
/// assert_eq!(body, r#"{"name":"Jane Doe"}"#);
/// ```
pub fn unescape_body(raw: &str) -> Result<String, FormatError> {
    let bytes = raw.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'%' {
            let valid = bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                let end = (i + 3).min(bytes.len());
                return Err(FormatError::new(
                    "body",
                    &String::from_utf8_lossy(&bytes[i..end]),
                    "invalid percent escape",
                ));
            }
        }
    }

    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| FormatError::new("body", raw, e.to_string()))
}
