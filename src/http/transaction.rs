//! Request execution pipeline.
//!
//! One [`HttpTransaction`] runs one call: compose the URL, encode the body,
//! build the request, run the auth hook, merge headers, dispatch through the
//! transport, then classify the status and decode the payload. Every failure
//! comes back as a [`ClientError`] whose endpoint never includes the query.

use crate::base::clienterror::{BoxError, ClientError, ErrorKind, ResponseBodyError};
use crate::base::context::ErrorContext;
use crate::http::body::Body;
use crate::http::decode::DecodeTarget;
use crate::http::drain::drain_body;
use crate::http::dump::{self, RequestSnapshot, ResponseSnapshot};
use crate::http::headers::{default_content_type, merge_headers};
use crate::http::query::Query;
use crate::http::requestbody::RequestBody;
use crate::transport::Transport;
use crate::urlrequest::context::CallContext;
use crate::urlrequest::endpoint::Endpoint;
use bytes::Bytes;
use http::{HeaderMap, Method, Request, Response};
use std::sync::Arc;
use url::Url;

/// Hook that mutates every outgoing request, typically to add credentials.
pub type AuthFn = Arc<dyn Fn(&mut Request<Body>) + Send + Sync>;

/// Everything one call needs.
#[derive(Default)]
pub struct Call<'a> {
    pub ctx: CallContext,
    /// Passed through untouched; an empty method means `GET`.
    pub method: String,
    pub path: String,
    pub query: Query,
    pub headers: HeaderMap,
    pub body: Option<RequestBody>,
    /// Decoded from the body of a successful response.
    pub response: Option<&'a mut dyn DecodeTarget>,
    /// Decoded from the body of a response with status >= 400.
    pub error: Option<&'a mut dyn DecodeTarget>,
}

impl<'a> Call<'a> {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Default::default()
        }
    }
}

/// Status codes at or above 400 are failures.
pub fn is_error_code(status: u16) -> bool {
    status >= 400
}

pub struct HttpTransaction<'c> {
    endpoint: &'c Endpoint,
    auth: Option<&'c AuthFn>,
    transport: &'c dyn Transport,
}

impl<'c> HttpTransaction<'c> {
    pub fn new(
        endpoint: &'c Endpoint,
        auth: Option<&'c AuthFn>,
        transport: &'c dyn Transport,
    ) -> Self {
        Self {
            endpoint,
            auth,
            transport,
        }
    }

    pub async fn execute(self, call: Call<'_>) -> Result<(), ClientError> {
        let Call {
            ctx,
            method,
            path,
            query,
            headers,
            body,
            response,
            error,
        } = call;

        let mut url = self.endpoint.url_for(&path);
        // Captured before the query is attached; the query may carry secrets.
        let safe_url = url.as_str().to_owned();

        let encoded = query.encode();
        if !encoded.is_empty() {
            url.set_query(Some(&encoded));
        }

        let has_body = body.is_some();
        let wire_body = match body {
            Some(body) => body
                .into_body()
                .client_context(ErrorKind::Encode, &safe_url, 0)?,
            None => Body::empty(),
        };

        let mut req = build_request(&method, &url, wire_body)
            .client_context(ErrorKind::Construct, &safe_url, 0)?;

        if let Some(auth) = self.auth {
            auth(&mut req);
        }

        merge_headers(req.headers_mut(), &headers);

        if has_body {
            default_content_type(req.headers_mut());
        }

        let snapshot = if dump::dump_requests_enabled() {
            Some(snapshot_request(&mut req).await)
        } else {
            None
        };

        tracing::debug!(method = %req.method(), url = %safe_url, "dispatching request");

        let resp = match ctx.run(self.transport.round_trip(req)).await {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => {
                tracing::debug!(url = %safe_url, error = %e, "transport failed");
                return Err(ClientError::with_kind(ErrorKind::Dispatch, &safe_url, 0, e));
            }
            Err(aborted) => {
                tracing::debug!(url = %safe_url, reason = %aborted, "request aborted");
                return Err(ClientError::with_kind(ErrorKind::Dispatch, &safe_url, 0, aborted));
            }
        };

        let status = resp.status().as_u16();
        tracing::debug!(url = %safe_url, status, "response received");

        let resp = match snapshot {
            Some(req_snapshot) => dump_exchange(&req_snapshot, resp).await,
            None => resp,
        };
        let body = resp.into_body();

        if is_error_code(status) {
            let data = read_body(&ctx, body)
                .await
                .client_context(ErrorKind::ResponseRead, &safe_url, status)?;

            if let Some(target) = error {
                target
                    .decode_json(&data)
                    .client_context(ErrorKind::Decode, &safe_url, status)?;
            }

            return Err(ClientError::with_kind(
                ErrorKind::HttpStatus,
                &safe_url,
                status,
                ResponseBodyError::new(String::from_utf8_lossy(&data)),
            ));
        }

        match response {
            Some(target) => {
                let data = read_body(&ctx, body)
                    .await
                    .client_context(ErrorKind::ResponseRead, &safe_url, status)?;
                target
                    .decode_json_stream(&data)
                    .client_context(ErrorKind::Decode, &safe_url, status)?;
            }
            None => {
                if let Err(e) = read_body(&ctx, body).await {
                    tracing::debug!(url = %safe_url, error = %e, "discarded response body failed to read");
                }
            }
        }

        Ok(())
    }
}

fn build_request(method: &str, url: &Url, body: Body) -> Result<Request<Body>, http::Error> {
    let method = if method.is_empty() {
        Method::GET
    } else {
        Method::from_bytes(method.as_bytes())?
    };
    Request::builder().method(method).uri(url.as_str()).body(body)
}

async fn read_body(ctx: &CallContext, body: Body) -> Result<Bytes, BoxError> {
    match ctx.run(body.bytes()).await {
        Ok(Ok(data)) => Ok(data),
        Ok(Err(e)) => Err(e.into()),
        Err(aborted) => Err(aborted.into()),
    }
}

/// Drain the request body so the dump can show it while the live request
/// still carries the full content.
async fn snapshot_request(req: &mut Request<Body>) -> RequestSnapshot {
    let body = std::mem::take(req.body_mut());
    let (live, copy) = match drain_body(body).await {
        Ok(drained) => (
            drained.replacement,
            drained.copy.bytes().await.unwrap_or_default(),
        ),
        Err(e) => {
            tracing::warn!(error = %e.source, "request body not captured for dump");
            (e.body, Bytes::new())
        }
    };
    *req.body_mut() = live;

    RequestSnapshot {
        method: req.method().clone(),
        uri: req.uri().clone(),
        version: req.version(),
        headers: req.headers().clone(),
        body: copy,
    }
}

async fn dump_exchange(req: &RequestSnapshot, resp: Response<Body>) -> Response<Body> {
    let (parts, body) = resp.into_parts();
    let (live, copy) = match drain_body(body).await {
        Ok(drained) => (
            drained.replacement,
            drained.copy.bytes().await.unwrap_or_default(),
        ),
        Err(e) => {
            tracing::warn!(error = %e.source, "response body not captured for dump");
            (e.body, Bytes::new())
        }
    };

    dump::emit(
        req,
        &ResponseSnapshot {
            version: parts.version,
            status: parts.status,
            headers: parts.headers.clone(),
            body: copy,
        },
    );
    Response::from_parts(parts, live)
}
