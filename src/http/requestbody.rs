//! Request body supplied by the caller.

use crate::http::body::Body;
use bytes::{Bytes, BytesMut};
use futures::stream::Stream;
use serde::Serialize;
use std::fmt;
use std::io;
use tokio::io::AsyncRead;

type Encoder = Box<dyn FnOnce() -> serde_json::Result<Vec<u8>> + Send>;

/// A value that is serialized to JSON when the request is built.
pub struct JsonBody {
    encode: Encoder,
}

impl JsonBody {
    pub fn new<T>(value: T) -> Self
    where
        T: Serialize + Send + 'static,
    {
        Self {
            encode: Box::new(move || serde_json::to_vec(&value)),
        }
    }

    /// Serialize the value.
    pub fn encode(self) -> serde_json::Result<Vec<u8>> {
        (self.encode)()
    }
}

impl fmt::Debug for JsonBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JsonBody")
    }
}

/// Body of an outgoing call.
///
/// Raw bytes, buffers and streams reach the transport unchanged; anything
/// else goes through [`RequestBody::json`] and is sent as its JSON encoding.
#[derive(Debug)]
pub enum RequestBody {
    /// Raw bytes.
    Bytes(Bytes),
    /// Buffered byte source.
    Buffer(BytesMut),
    /// Already-open stream.
    Stream(Body),
    /// Structured value, JSON-encoded by the pipeline.
    Json(JsonBody),
}

impl RequestBody {
    /// JSON-encode `value` when the request is built.
    pub fn json<T>(value: T) -> Self
    where
        T: Serialize + Send + 'static,
    {
        RequestBody::Json(JsonBody::new(value))
    }

    /// Send the chunks of `stream` as they are produced.
    pub fn stream<S>(stream: S) -> Self
    where
        S: Stream<Item = io::Result<Bytes>> + Send + 'static,
    {
        RequestBody::Stream(Body::from_stream(stream))
    }

    /// Send everything `reader` yields until EOF.
    pub fn reader<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + 'static,
    {
        RequestBody::Stream(Body::from_reader(reader))
    }

    /// Turn the body into its wire form, encoding JSON values.
    pub fn into_body(self) -> serde_json::Result<Body> {
        match self {
            RequestBody::Bytes(b) => Ok(Body::full(b)),
            RequestBody::Buffer(buf) => Ok(Body::full(buf.freeze())),
            RequestBody::Stream(body) => Ok(body),
            RequestBody::Json(value) => value.encode().map(Body::full),
        }
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(v: Vec<u8>) -> Self {
        RequestBody::Bytes(Bytes::from(v))
    }
}

impl From<&'static [u8]> for RequestBody {
    fn from(b: &'static [u8]) -> Self {
        RequestBody::Bytes(Bytes::from_static(b))
    }
}

impl From<Bytes> for RequestBody {
    fn from(b: Bytes) -> Self {
        RequestBody::Bytes(b)
    }
}

impl From<BytesMut> for RequestBody {
    fn from(buf: BytesMut) -> Self {
        RequestBody::Buffer(buf)
    }
}

impl From<Body> for RequestBody {
    fn from(body: Body) -> Self {
        RequestBody::Stream(body)
    }
}

impl From<serde_json::Value> for RequestBody {
    fn from(value: serde_json::Value) -> Self {
        RequestBody::json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_bytes_pass_through() {
        let body = RequestBody::from(b"raw".to_vec()).into_body().unwrap();
        assert_eq!(body.bytes().await.unwrap(), Bytes::from_static(b"raw"));
    }

    #[tokio::test]
    async fn test_buffer_pass_through() {
        let buf = BytesMut::from(&b"buffered"[..]);
        let body = RequestBody::from(buf).into_body().unwrap();
        assert_eq!(body.bytes().await.unwrap(), Bytes::from_static(b"buffered"));
    }

    #[tokio::test]
    async fn test_string_is_json_encoded() {
        let body = RequestBody::json("test-body".to_string())
            .into_body()
            .unwrap();
        assert_eq!(body.bytes().await.unwrap(), Bytes::from_static(b"\"test-body\""));
    }

    #[tokio::test]
    async fn test_value_is_json_encoded() {
        let body = RequestBody::from(serde_json::json!({"x": "y"}))
            .into_body()
            .unwrap();
        assert_eq!(body.bytes().await.unwrap(), Bytes::from_static(br#"{"x":"y"}"#));
    }

    #[test]
    fn test_unencodable_value_fails() {
        let mut map = HashMap::new();
        map.insert((1, 2), 3);
        assert!(RequestBody::json(map).into_body().is_err());
    }

    #[test]
    fn test_stream_variant() {
        let body = RequestBody::from(Body::from("s"));
        assert!(matches!(body, RequestBody::Stream(_)));
    }
}
