//! Wire body shared by requests, responses and transports.
//!
//! A [`Body`] is either the empty sentinel, a fully buffered chunk, or a
//! once-readable stream of byte chunks. It implements [`http_body::Body`] so
//! hyper can send and receive it directly.

use bytes::Bytes;
use futures::stream::{BoxStream, Stream, StreamExt, TryStreamExt};
use http_body::{Frame, SizeHint};
use http_body_util::BodyExt;
use std::fmt;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

enum Kind {
    Empty,
    Full(Option<Bytes>),
    Stream(BoxStream<'static, io::Result<Bytes>>),
}

/// Request or response body.
pub struct Body {
    kind: Kind,
}

impl Body {
    /// The "no body" sentinel.
    pub fn empty() -> Self {
        Self { kind: Kind::Empty }
    }

    /// Body backed by an in-memory buffer.
    pub fn full(data: impl Into<Bytes>) -> Self {
        Self {
            kind: Kind::Full(Some(data.into())),
        }
    }

    /// Body backed by a stream of byte chunks.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = io::Result<Bytes>> + Send + 'static,
    {
        Self {
            kind: Kind::Stream(stream.boxed()),
        }
    }

    /// Body read from an async reader until EOF.
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + 'static,
    {
        Self::from_stream(ReaderStream::new(reader))
    }

    /// Body adapted from any [`http_body::Body`], e.g. hyper's `Incoming`.
    pub fn from_http_body<B>(body: B) -> Self
    where
        B: http_body::Body<Data = Bytes> + Send + 'static,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::from_stream(body.into_data_stream().map_err(io::Error::other))
    }

    /// True only for the empty sentinel.
    pub fn is_empty(&self) -> bool {
        matches!(self.kind, Kind::Empty)
    }

    /// Read the whole body into memory.
    pub async fn bytes(self) -> io::Result<Bytes> {
        let collected = self.collect().await?;
        Ok(collected.to_bytes())
    }

    /// Split off the stream so a reader can take chunks one by one.
    pub(crate) fn into_stream(self) -> BoxStream<'static, io::Result<Bytes>> {
        match self.kind {
            Kind::Empty => futures::stream::empty().boxed(),
            Kind::Full(data) => futures::stream::iter(data.map(Ok)).boxed(),
            Kind::Stream(stream) => stream,
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Kind::Empty => f.write_str("Body(Empty)"),
            Kind::Full(data) => f
                .debug_tuple("Body")
                .field(&data.as_ref().map_or(0, Bytes::len))
                .finish(),
            Kind::Stream(_) => f.write_str("Body(Stream)"),
        }
    }
}

impl From<Bytes> for Body {
    fn from(b: Bytes) -> Self {
        Body::full(b)
    }
}

impl From<Vec<u8>> for Body {
    fn from(v: Vec<u8>) -> Self {
        Body::full(v)
    }
}

impl From<&'static str> for Body {
    fn from(s: &'static str) -> Self {
        Body::full(Bytes::from_static(s.as_bytes()))
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Body::full(s)
    }
}

impl http_body::Body for Body {
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match &mut self.kind {
            Kind::Empty => Poll::Ready(None),
            Kind::Full(data) => Poll::Ready(data.take().map(|b| Ok(Frame::data(b)))),
            Kind::Stream(stream) => stream
                .poll_next_unpin(cx)
                .map(|chunk| chunk.map(|r| r.map(Frame::data))),
        }
    }

    fn is_end_stream(&self) -> bool {
        match &self.kind {
            Kind::Empty => true,
            Kind::Full(data) => data.is_none(),
            Kind::Stream(_) => false,
        }
    }

    fn size_hint(&self) -> SizeHint {
        match &self.kind {
            Kind::Empty => SizeHint::with_exact(0),
            Kind::Full(data) => {
                SizeHint::with_exact(data.as_ref().map_or(0, |b| b.len() as u64))
            }
            Kind::Stream(_) => SizeHint::default(),
        }
    }
}
