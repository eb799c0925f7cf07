//! Decode targets for response payloads.

use serde::de::DeserializeOwned;
use serde::Deserialize;

/// A caller-owned value that a JSON payload is decoded into.
///
/// Implemented for every `DeserializeOwned + Send` type: on success the
/// target is replaced by the decoded value, on failure it is left untouched.
pub trait DecodeTarget: Send {
    /// Decode `data` as exactly one JSON value.
    fn decode_json(&mut self, data: &[u8]) -> serde_json::Result<()>;

    /// Decode the first JSON value of `data`; anything after it is ignored.
    fn decode_json_stream(&mut self, data: &[u8]) -> serde_json::Result<()>;
}

impl<T> DecodeTarget for T
where
    T: DeserializeOwned + Send,
{
    fn decode_json(&mut self, data: &[u8]) -> serde_json::Result<()> {
        *self = serde_json::from_slice(data)?;
        Ok(())
    }

    fn decode_json_stream(&mut self, data: &[u8]) -> serde_json::Result<()> {
        let mut de = serde_json::Deserializer::from_slice(data);
        *self = T::deserialize(&mut de)?;
        Ok(())
    }
}
