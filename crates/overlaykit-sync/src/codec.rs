//! Serialization codec abstraction.
//!
//! The engine never assumes a particular wire format: anything that can
//! encode and decode serde values can carry snapshots and sync messages.
//! The portability check is defined against a codec, not a runtime API:
//! "can this value survive a round trip through format X" is the general
//! form of the deep-clonability requirement.

use overlaykit_core::SyncError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A serialization format the sync layer can target.
pub trait Codec {
    /// Short format name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Encode a value to bytes.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, SyncError>;

    /// Decode a value from bytes.
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, SyncError>;
}

/// JSON wire format, the default codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, SyncError> {
        serde_json::to_vec(value).map_err(|e| SyncError::EncodeFailed {
            reason: e.to_string(),
        })
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, SyncError> {
        serde_json::from_slice(bytes).map_err(|e| SyncError::MalformedMessage {
            reason: e.to_string(),
        })
    }
}

/// Verify a value survives an encode → decode → encode round trip under the
/// given codec without diverging.
///
/// # Errors
/// Returns [`SyncError::NonPortableState`] when encoding fails (e.g. a NaN
/// coordinate under JSON) or when the re-encoded bytes differ from the
/// original encoding.
pub fn check_portable<C: Codec, T>(codec: &C, value: &T) -> Result<(), SyncError>
where
    T: Serialize + DeserializeOwned,
{
    let encoded = codec.encode(value).map_err(|e| SyncError::NonPortableState {
        codec: codec.name().to_string(),
        reason: e.to_string(),
    })?;
    let decoded: T = codec
        .decode(&encoded)
        .map_err(|e| SyncError::NonPortableState {
            codec: codec.name().to_string(),
            reason: e.to_string(),
        })?;
    let reencoded = codec
        .encode(&decoded)
        .map_err(|e| SyncError::NonPortableState {
            codec: codec.name().to_string(),
            reason: e.to_string(),
        })?;
    if reencoded != encoded {
        return Err(SyncError::NonPortableState {
            codec: codec.name().to_string(),
            reason: "round trip diverged from original encoding".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Payload {
        name: String,
        value: f64,
    }

    #[test]
    fn json_round_trip() {
        let codec = JsonCodec;
        let payload = Payload {
            name: "cpu".to_string(),
            value: 42.5,
        };
        let bytes = codec.encode(&payload).unwrap();
        let back: Payload = codec.decode(&bytes).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn portable_value_passes() {
        let payload = Payload {
            name: "ok".to_string(),
            value: 1.0,
        };
        assert!(check_portable(&JsonCodec, &payload).is_ok());
    }

    #[test]
    fn nan_is_not_portable_under_json() {
        let payload = Payload {
            name: "bad".to_string(),
            value: f64::NAN,
        };
        let err = check_portable(&JsonCodec, &payload).unwrap_err();
        assert!(matches!(err, SyncError::NonPortableState { .. }));
    }

    #[test]
    fn garbage_bytes_fail_decode() {
        let codec = JsonCodec;
        assert!(codec.decode::<Payload>(b"not json").is_err());
    }
}
