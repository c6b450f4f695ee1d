//! Payload encoding for tiers that store strings.

use serde::{de::DeserializeOwned, Serialize};
use strata_core::StrataResult;

/// Converts values to and from the string payloads a remote store holds.
pub trait Codec: Send + Sync + 'static {
    /// Encodes a value.
    fn encode<T: Serialize>(&self, value: &T) -> StrataResult<String>;

    /// Decodes a payload produced by [`Codec::encode`].
    fn decode<T: DeserializeOwned>(&self, payload: &str) -> StrataResult<T>;
}

/// JSON codec backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> StrataResult<String> {
        Ok(serde_json::to_string(value)?)
    }

    fn decode<T: DeserializeOwned>(&self, payload: &str) -> StrataResult<T> {
        Ok(serde_json::from_str(payload)?)
    }
}
