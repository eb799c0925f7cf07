//! Network transport on top of hyper's pooled client.

use super::{RoundTrip, Transport};
use crate::base::clienterror::BoxError;
use crate::http::body::Body;
use http::{Request, Response};
use hyper::body::Incoming;
use hyper_util::client::legacy::connect::{Connect, HttpConnector};
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::fmt;

/// Transport that sends requests with `hyper_util`'s legacy client.
///
/// Connection pooling, keep-alive and protocol negotiation are the client's
/// business. The default connector speaks plain HTTP; wrap a TLS connector
/// and pass it to [`HyperTransport::with_connector`] for HTTPS.
#[derive(Clone)]
pub struct HyperTransport<C = HttpConnector> {
    client: Client<C, Body>,
}

impl HyperTransport<HttpConnector> {
    /// Create a transport with a plain HTTP connector.
    pub fn new() -> Self {
        Self::with_connector(HttpConnector::new())
    }
}

impl Default for HyperTransport<HttpConnector> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> HyperTransport<C>
where
    C: Connect + Clone + Send + Sync + 'static,
{
    /// Create a transport over a custom connector.
    pub fn with_connector(connector: C) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Self { client }
    }
}

impl<C> Transport for HyperTransport<C>
where
    C: Connect + Clone + Send + Sync + 'static,
{
    fn round_trip(&self, req: Request<Body>) -> RoundTrip {
        let pending = self.client.request(req);
        Box::pin(async move {
            let resp: Response<Incoming> = pending.await?;
            Ok::<_, BoxError>(resp.map(Body::from_http_body))
        })
    }
}

impl<C> fmt::Debug for HyperTransport<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HyperTransport").finish_non_exhaustive()
    }
}
