//! Attribute payload codec
//!
//! Structured handler data rides through the parser as a single string
//! attribute holding base64-encoded JSON. Decoding is total: the attribute
//! may come from stale content or from someone crafting markup by hand, so
//! every failure yields an empty map instead of an error.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, Engine as _, GeneralPurpose, GeneralPurposeConfig};
use serde_json::Value;

/// Decoded attribute payload
pub type AttributeMap = serde_json::Map<String, Value>;

/// Standard alphabet, padding written on encode but optional on decode
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode a payload as base64(JSON)
pub fn encode_attributes(attributes: &AttributeMap) -> String {
    let json = serde_json::to_vec(attributes).unwrap_or_else(|_| b"{}".to_vec());
    PAYLOAD_ENGINE.encode(json)
}

/// Decode a base64(JSON) attribute value.
///
/// JSON arrays become maps keyed by their decimal index. Empty input,
/// invalid base64, invalid UTF-8, invalid JSON and JSON scalars all
/// decode to an empty map.
pub fn parse_attributes(encoded: &str) -> AttributeMap {
    let encoded = encoded.trim();
    if encoded.is_empty() {
        return AttributeMap::new();
    }

    let bytes = match PAYLOAD_ENGINE.decode(encoded) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::trace!("Ignoring attribute payload with invalid base64: {}", err);
            return AttributeMap::new();
        }
    };

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => map,
        Ok(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(index, value)| (index.to_string(), value))
            .collect(),
        Ok(other) => {
            tracing::trace!("Ignoring scalar attribute payload: {}", other);
            AttributeMap::new()
        }
        Err(err) => {
            tracing::trace!("Ignoring attribute payload with invalid JSON: {}", err);
            AttributeMap::new()
        }
    }
}
