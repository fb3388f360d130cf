//! Payload encoding
//!
//! Turns the values of one write call into the bytes that travel through the
//! queue. The plain path joins rendered values with a separator; the JSON path
//! serializes a single object and ignores the separator.

use super::error::Result;
use super::value::Value;
use serde::Serialize;
use std::fmt::Write as _;

/// Encoded bytes of one write call
///
/// Moved into the queue on enqueue and consumed exactly once by the service loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload(Vec<u8>);

impl Payload {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload(bytes)
    }
}

/// Encodes value lists and JSON objects into payloads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoder {
    separator: String,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new(" ")
    }
}

impl Encoder {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn set_separator(&mut self, separator: impl Into<String>) {
        self.separator = separator.into();
    }

    /// Join the rendered values with the separator
    ///
    /// No separator is written before the first value and none after the last.
    #[must_use]
    pub fn encode(&self, values: &[Value<'_>]) -> Payload {
        let mut buf = Vec::new();
        for (i, value) in values.iter().enumerate() {
            if i != 0 {
                buf.extend_from_slice(self.separator.as_bytes());
            }
            match value {
                Value::Bytes(bytes) => buf.extend_from_slice(bytes),
                Value::Text(text) => buf.extend_from_slice(text.as_bytes()),
                Value::Display(display) => {
                    // Only fails if the Display impl itself reports an error;
                    // whatever it rendered so far is kept.
                    let mut rendered = String::new();
                    let _ = write!(rendered, "{}", display);
                    buf.extend_from_slice(rendered.as_bytes());
                }
            }
        }
        Payload(buf)
    }

    /// Serialize one object as compact JSON
    pub fn encode_json<T: Serialize + ?Sized>(&self, object: &T) -> Result<Payload> {
        Ok(Payload(serde_json::to_vec(object)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::LoggerError;
    use std::collections::HashMap;
    use std::fmt;

    #[test]
    fn test_encode_joins_with_separator() {
        let encoder = Encoder::new(" | ");
        let count = 3_u32;
        let payload = encoder.encode(&[
            Value::text("user"),
            Value::display(&count),
            Value::text("done"),
        ]);
        assert_eq!(payload.as_bytes(), b"user | 3 | done");
    }

    #[test]
    fn test_encode_single_and_empty() {
        let encoder = Encoder::default();
        assert_eq!(encoder.encode(&[Value::text("only")]).as_bytes(), b"only");
        assert!(encoder.encode(&[]).is_empty());
    }

    #[test]
    fn test_bytes_are_verbatim() {
        let encoder = Encoder::new(",");
        let raw = [0x00_u8, 0xff, b'\n', 0x80];
        let payload = encoder.encode(&[Value::bytes(&raw), Value::text("tail")]);
        assert_eq!(payload.as_bytes(), &[0x00, 0xff, b'\n', 0x80, b',', b't', b'a', b'i', b'l']);
    }

    #[test]
    fn test_separator_inside_values_is_not_escaped() {
        let encoder = Encoder::new(" ");
        let payload = encoder.encode(&[Value::text("a b"), Value::text("c")]);
        assert_eq!(payload.as_bytes(), b"a b c");
    }

    #[test]
    fn test_failing_display_keeps_partial_output() {
        struct Broken;
        impl fmt::Display for Broken {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("half")?;
                Err(fmt::Error)
            }
        }

        let payload = Encoder::default().encode(&[Value::display(&Broken), Value::text("next")]);
        assert_eq!(payload.as_bytes(), b"half next");
    }

    #[test]
    fn test_encode_json() -> Result<()> {
        let encoder = Encoder::new("ignored");
        let payload = encoder.encode_json(&serde_json::json!({"event": "login", "id": 7}))?;
        assert_eq!(payload.as_bytes(), br#"{"event":"login","id":7}"#);
        Ok(())
    }

    #[test]
    fn test_encode_json_rejects_non_string_keys() {
        let mut map = HashMap::new();
        map.insert((1_u8, 2_u8), "pair");

        let err = Encoder::default().encode_json(&map).unwrap_err();
        assert!(matches!(err, LoggerError::JsonError(_)));
    }
}
