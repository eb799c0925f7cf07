//! Pluggable transports.
//!
//! A [`Transport`] takes a fully built request and returns a response or a
//! failure. The pipeline never looks past this trait, so tests and offline
//! modes can swap the network for a closure ([`TransportFn`]) or a canned
//! answer ([`FakeTransport`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use restclient::transport::{TransportFn, Transport};
//! use restclient::http::Body;
//!
//! let transport = TransportFn::new(|req| async move {
//!     assert_eq!(req.uri().path(), "/items/5");
//!     Ok(http::Response::new(Body::empty()))
//! });
//! ```

mod fake;
mod hyperclient;

pub use fake::FakeTransport;
pub use hyperclient::HyperTransport;

use crate::base::clienterror::BoxError;
use crate::http::body::Body;
use http::{Request, Response};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Alias for the `Future` returned by a transport.
pub type RoundTrip = Pin<Box<dyn Future<Output = Result<Response<Body>, BoxError>> + Send>>;

/// Sends one request and yields its response.
///
/// Implementations are shared by every concurrent call of a client and must
/// be usable through `&self`.
pub trait Transport: Send + Sync {
    fn round_trip(&self, req: Request<Body>) -> RoundTrip;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn round_trip(&self, req: Request<Body>) -> RoundTrip {
        (**self).round_trip(req)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn round_trip(&self, req: Request<Body>) -> RoundTrip {
        (**self).round_trip(req)
    }
}

/// Transport backed by a closure.
pub struct TransportFn<F> {
    f: F,
}

impl<F, Fut> TransportFn<F>
where
    F: Fn(Request<Body>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response<Body>, BoxError>> + Send + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F, Fut> Transport for TransportFn<F>
where
    F: Fn(Request<Body>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response<Body>, BoxError>> + Send + 'static,
{
    fn round_trip(&self, req: Request<Body>) -> RoundTrip {
        Box::pin((self.f)(req))
    }
}

impl<F> fmt::Debug for TransportFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportFn").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[tokio::test]
    async fn test_transport_fn_round_trip() {
        let transport = TransportFn::new(|req: Request<Body>| async move {
            let mut resp = Response::new(Body::empty());
            if req.uri().path() == "/missing" {
                *resp.status_mut() = StatusCode::NOT_FOUND;
            }
            Ok::<_, BoxError>(resp)
        });

        let req = Request::get("http://h/missing").body(Body::empty()).unwrap();
        let resp = transport.round_trip(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_arc_transport() {
        let transport: Arc<dyn Transport> = Arc::new(FakeTransport::new());
        let req = Request::get("http://h/").body(Body::empty()).unwrap();
        let resp = transport.round_trip(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_transport_fn_error() {
        let transport = TransportFn::new(|_req: Request<Body>| async move {
            Err::<Response<Body>, BoxError>("connection refused".into())
        });
        let req = Request::get("http://h/").body(Body::empty()).unwrap();
        let err = transport.round_trip(req).await.unwrap_err();
        assert_eq!(err.to_string(), "connection refused");
    }
}
