use super::{RoundTrip, Transport};
use crate::base::clienterror::BoxError;
use crate::http::body::Body;
use http::{Request, Response, StatusCode};

/// Transport that answers every request with `200 OK` and no body.
///
/// Logs the request it swallows; useful for dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct FakeTransport;

impl FakeTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for FakeTransport {
    fn round_trip(&self, req: Request<Body>) -> RoundTrip {
        tracing::debug!(method = %req.method(), path = %req.uri().path(), "fake transport");
        Box::pin(async move {
            let mut resp = Response::new(Body::empty());
            *resp.status_mut() = StatusCode::OK;
            Ok::<_, BoxError>(resp)
        })
    }
}
