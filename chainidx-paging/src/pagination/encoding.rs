//! Token envelope for cursor serialization.
//!
//! A token is the URL-safe, unpadded base64 form of a compact JSON envelope:
//!
//! ```text
//! {"v":1,"f":[["vega_time",{"timestamp":1659430800000000000}],["id",{"text":"ab"}]]}
//! ```
//!
//! The version tag lets a later format coexist with tokens already handed
//! out; unknown versions and unknown envelope keys are rejected.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use crate::builder::Value;

/// The only envelope version this codec reads and writes.
pub(super) const CURSOR_VERSION: u8 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    v: u8,
    f: &'a [(String, Value)],
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct Envelope {
    pub(super) v: u8,
    pub(super) f: Vec<(String, Value)>,
}

/// Serialize named fields into a token.
pub(super) fn encode_envelope(fields: &[(String, Value)]) -> String {
    let envelope = EnvelopeRef {
        v: CURSOR_VERSION,
        f: fields,
    };
    // Strings, integers, and booleans always serialize
    let json = serde_json::to_vec(&envelope).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

/// Base64-decode a token into envelope bytes.
///
/// Accepts the URL-safe alphabet only, without padding.
pub(super) fn base64_decode(token: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(token)
}

/// Parse envelope bytes.
pub(super) fn parse_envelope(bytes: &[u8]) -> Result<Envelope, serde_json::Error> {
    serde_json::from_slice(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_layout() {
        let fields = vec![
            ("block_height".to_string(), Value::Int(7)),
            ("node_id".to_string(), Value::Text("n1".into())),
        ];
        let token = encode_envelope(&fields);
        let json = String::from_utf8(base64_decode(&token).unwrap()).unwrap();
        assert_eq!(
            json,
            r#"{"v":1,"f":[["block_height",{"int":7}],["node_id",{"text":"n1"}]]}"#
        );
    }

    #[test]
    fn test_token_is_url_safe() {
        // Enough varied bytes to exercise the characters that differ between alphabets
        let fields = vec![("id".to_string(), Value::Text("~~~???>>>".repeat(8)))];
        let token = encode_envelope(&fields);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_rejects_unknown_envelope_keys() {
        assert!(parse_envelope(br#"{"v":1,"f":[],"x":0}"#).is_err());
        assert!(parse_envelope(br#"{"f":[]}"#).is_err());
    }
}
