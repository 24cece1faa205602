//! Pluggable request/response codec.
//!
//! The transport encodes structured bodies and decodes response text
//! through a [`Codec`]. Any error the codec returns is classified as
//! [`Error::Serialization`](crate::Error::Serialization), which keeps
//! codec failures distinct from transport and server failures.

use serde_json::Value;

use crate::error::CodecError;

/// Encode/decode pair used by the transport. The default is JSON; a
/// custom impl can swap in a different wire representation without
/// touching the request pipeline.
pub trait Codec: Send + Sync {
    fn encode(&self, value: &Value) -> Result<String, CodecError>;
    fn decode(&self, text: &str) -> Result<Value, CodecError>;
}

/// `serde_json`-backed codec used unless one is supplied at build time.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode(&self, value: &Value) -> Result<String, CodecError> {
        Ok(serde_json::to_string(value)?)
    }

    fn decode(&self, text: &str) -> Result<Value, CodecError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_round_trip() {
        let codec = JsonCodec;
        let encoded = codec.encode(&json!({"query": "RETURN 1"})).unwrap();
        assert_eq!(codec.decode(&encoded).unwrap(), json!({"query": "RETURN 1"}));
    }

    #[test]
    fn test_decode_rejects_invalid_json() {
        assert!(JsonCodec.decode("{not json").is_err());
    }
}
