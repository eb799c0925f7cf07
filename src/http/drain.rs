//! Non-destructive body duplication.
//!
//! A body stream can be read once. [`drain_body`] reads it into a single
//! `Bytes` snapshot and hands back two independent bodies over it, so one can
//! be inspected while the other keeps flowing through the pipeline.

use crate::http::body::Body;
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use std::io;
use thiserror::Error;

/// Two independent readers over the same content.
#[derive(Debug)]
pub struct Drained {
    /// Takes the place of the original body.
    pub replacement: Body,
    /// Free to be consumed by the caller.
    pub copy: Body,
}

/// Reading the original body failed.
///
/// `body` is the original stream with the bytes read so far put back in
/// front, so its remaining content is what it was before the drain.
#[derive(Debug, Error)]
#[error("drain body failed: {source}")]
pub struct DrainError {
    pub body: Body,
    #[source]
    pub source: io::Error,
}

/// Read `body` fully and return two independent copies of it.
pub async fn drain_body(body: Body) -> Result<Drained, DrainError> {
    if body.is_empty() {
        return Ok(Drained {
            replacement: Body::empty(),
            copy: Body::empty(),
        });
    }

    let mut stream = body.into_stream();
    let mut buf = BytesMut::new();
    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(chunk) => buf.extend_from_slice(&chunk),
            Err(source) => {
                let consumed = buf.freeze();
                // The failure is replayed after the prefix; most streams end
                // once they have yielded an error.
                let replayed = io::Error::new(source.kind(), source.to_string());
                let restored = futures::stream::iter((!consumed.is_empty()).then(|| Ok(consumed)))
                    .chain(futures::stream::iter([Err(replayed)]))
                    .chain(stream);
                return Err(DrainError {
                    body: Body::from_stream(restored),
                    source,
                });
            }
        }
    }

    let snapshot: Bytes = buf.freeze();
    Ok(Drained {
        replacement: Body::full(snapshot.clone()),
        copy: Body::full(snapshot),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_drain_empty_keeps_sentinel() {
        let drained = drain_body(Body::empty()).await.unwrap();
        assert!(drained.replacement.is_empty());
        assert!(drained.copy.is_empty());
    }

    #[tokio::test]
    async fn test_drain_yields_identical_copies() {
        let chunks = vec![Ok(Bytes::from("{\"a\":")), Ok(Bytes::from("1}"))];
        let drained = drain_body(Body::from_stream(futures::stream::iter(chunks)))
            .await
            .unwrap();

        let copy = drained.copy.bytes().await.unwrap();
        let replacement = drained.replacement.bytes().await.unwrap();
        assert_eq!(copy, Bytes::from_static(b"{\"a\":1}"));
        assert_eq!(replacement, copy);
    }

    #[tokio::test]
    async fn test_drain_read_failure_returns_original() {
        let chunks = vec![
            Ok(Bytes::from("partial")),
            Err(io::Error::new(io::ErrorKind::UnexpectedEof, "eof")),
            Ok(Bytes::from("-rest")),
        ];
        let err = drain_body(Body::from_stream(futures::stream::iter(chunks)))
            .await
            .unwrap_err();
        assert_eq!(err.source.kind(), io::ErrorKind::UnexpectedEof);

        let mut restored = err.body.into_stream();
        assert_eq!(restored.next().await.unwrap().unwrap(), Bytes::from_static(b"partial"));
        let replayed = restored.next().await.unwrap().unwrap_err();
        assert_eq!(replayed.kind(), io::ErrorKind::UnexpectedEof);
        assert_eq!(restored.next().await.unwrap().unwrap(), Bytes::from_static(b"-rest"));
    }

    #[tokio::test]
    async fn test_drain_failure_survives_stream_that_ends() {
        let chunks = vec![
            Ok(Bytes::from("head")),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
        ];
        let err = drain_body(Body::from_stream(futures::stream::iter(chunks)))
            .await
            .unwrap_err();

        let again = err.body.bytes().await.unwrap_err();
        assert_eq!(again.kind(), io::ErrorKind::ConnectionReset);
        assert_eq!(again.to_string(), "reset");
    }
}
