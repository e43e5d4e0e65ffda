//! Pluggable structured encode/decode.
//!
//! The client never calls a serializer directly; it goes through a `Codec`
//! so callers can swap formats or tweak JSON behaviour without touching the
//! request pipeline. `JsonCodec` is the default.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CodecError;

/// Byte-level serializer/deserializer pair used for request bodies and
/// typed responses.
pub trait Codec: Send + Sync + 'static {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError>;

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError>;
}

/// `Codec` backed by serde_json.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(value)?)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        id: u32,
        name: String,
    }

    #[test]
    fn json_codec_decodes_struct() {
        let user: User = JsonCodec.decode(br#"{"id":7,"name":"ada"}"#).unwrap();
        assert_eq!(
            user,
            User {
                id: 7,
                name: "ada".to_string()
            }
        );
    }

    #[test]
    fn json_codec_reports_shape_mismatch() {
        let err = JsonCodec.decode::<User>(br#"{"id":"seven"}"#).unwrap_err();
        assert!(err.message().contains("invalid type"), "{err}");
    }

    #[test]
    fn json_codec_rejects_non_string_map_keys() {
        let mut map = HashMap::new();
        map.insert((1, 2), "pair");
        assert!(JsonCodec.encode(&map).is_err());
    }
}
