//! HTTP client with builder pattern.
//!
//! A [`Client`] is bound to one endpoint (scheme and host). Each call names a
//! path, optional query, headers and body, and optional targets to decode the
//! success or error payload into.
//!
//! # Example
//!
//! ```rust,ignore
//! use restclient::Client;
//! use std::collections::HashMap;
//!
//! let client = Client::new("http://localhost:8080")?;
//!
//! let mut item: HashMap<String, String> = HashMap::new();
//! client.get("/items/5")
//!     .query_pair("fields", "name")
//!     .decode_into(&mut item)
//!     .send()
//!     .await?;
//! ```

use crate::base::clienterror::{ClientError, ErrorKind};
use crate::http::body::Body;
use crate::http::decode::DecodeTarget;
use crate::http::query::Query;
use crate::http::requestbody::RequestBody;
use crate::http::transaction::{AuthFn, Call, HttpTransaction};
use crate::transport::{HyperTransport, Transport};
use crate::urlrequest::context::CallContext;
use crate::urlrequest::endpoint::Endpoint;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::{Method, Request};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// HTTP client for one service endpoint.
///
/// Cloning is cheap; clones share the transport and auth hook.
#[derive(Clone)]
pub struct Client {
    endpoint: Endpoint,
    auth: Option<AuthFn>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint.to_string())
            .field("auth", &self.auth.is_some())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client for `address` using the hyper transport.
    pub fn new(address: &str) -> Result<Self, ClientError> {
        Self::builder().endpoint(address).build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Install a hook run on every request right after it is built.
    ///
    /// Configure before sharing the client between tasks.
    pub fn set_auth_function<F>(&mut self, auth: F)
    where
        F: Fn(&mut Request<Body>) + Send + Sync + 'static,
    {
        self.auth = Some(Arc::new(auth));
    }

    /// Replace the transport. Configure before sharing the client.
    pub fn set_transport<T>(&mut self, transport: T)
    where
        T: Transport + 'static,
    {
        self.transport = Arc::new(transport);
    }

    pub fn get<'a>(&self, path: impl Into<String>) -> RequestBuilder<'a> {
        self.request(Method::GET, path)
    }

    pub fn post<'a>(&self, path: impl Into<String>) -> RequestBuilder<'a> {
        self.request(Method::POST, path)
    }

    pub fn put<'a>(&self, path: impl Into<String>) -> RequestBuilder<'a> {
        self.request(Method::PUT, path)
    }

    pub fn patch<'a>(&self, path: impl Into<String>) -> RequestBuilder<'a> {
        self.request(Method::PATCH, path)
    }

    pub fn delete<'a>(&self, path: impl Into<String>) -> RequestBuilder<'a> {
        self.request(Method::DELETE, path)
    }

    /// Start a request with any method, including extension methods.
    pub fn request<'a>(&self, method: impl AsRef<str>, path: impl Into<String>) -> RequestBuilder<'a> {
        RequestBuilder {
            client: self.clone(),
            call: Call::new(method.as_ref(), path),
            error: None,
        }
    }

    /// Run one call through the pipeline.
    pub async fn execute(&self, call: Call<'_>) -> Result<(), ClientError> {
        HttpTransaction::new(&self.endpoint, self.auth.as_ref(), &*self.transport)
            .execute(call)
            .await
    }
}

/// Builder for creating a [`Client`].
#[derive(Default)]
pub struct ClientBuilder {
    address: Option<String>,
    auth: Option<AuthFn>,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    /// Service address, e.g. `https://api.example.com`.
    pub fn endpoint(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn auth<F>(mut self, auth: F) -> Self
    where
        F: Fn(&mut Request<Body>) + Send + Sync + 'static,
    {
        self.auth = Some(Arc::new(auth));
        self
    }

    /// Use `transport` instead of the default hyper client.
    pub fn transport<T>(mut self, transport: T) -> Self
    where
        T: Transport + 'static,
    {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn build(self) -> Result<Client, ClientError> {
        let Some(address) = self.address else {
            return Err(ClientError::new(
                ErrorKind::Config,
                "",
                0,
                ErrorKind::Config.message(),
                Some("no endpoint configured".into()),
            ));
        };
        let endpoint = Endpoint::parse(&address)?;
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(HyperTransport::new()));

        tracing::debug!(endpoint = %endpoint, "client created");

        Ok(Client {
            endpoint,
            auth: self.auth,
            transport,
        })
    }
}

/// Builder for a single call.
///
/// `'a` is the lifetime of the decode targets.
pub struct RequestBuilder<'a> {
    client: Client,
    call: Call<'a>,
    error: Option<http::Error>,
}

impl<'a> RequestBuilder<'a> {
    /// Replace the query parameters.
    pub fn query(mut self, query: impl Into<Query>) -> Self {
        self.call.query = query.into();
        self
    }

    /// Append one query parameter.
    pub fn query_pair(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.call.query.add(key, value);
        self
    }

    /// Append a header. An invalid name or value fails the call when sent.
    pub fn header<K, V>(mut self, key: K, value: V) -> Self
    where
        HeaderName: TryFrom<K>,
        <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
    {
        if self.error.is_some() {
            return self;
        }
        let name = match HeaderName::try_from(key) {
            Ok(name) => name,
            Err(e) => {
                self.error = Some(e.into());
                return self;
            }
        };
        match HeaderValue::try_from(value) {
            Ok(value) => {
                self.call.headers.append(name, value);
            }
            Err(e) => self.error = Some(e.into()),
        }
        self
    }

    /// Add every header in `headers`.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        let mut last = None;
        for (name, value) in headers {
            // `None` names continue the previous one.
            if let Some(name) = name {
                last = Some(name);
            }
            if let Some(name) = &last {
                self.call.headers.append(name.clone(), value);
            }
        }
        self
    }

    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.call.body = Some(body.into());
        self
    }

    /// Send `value` encoded as JSON.
    pub fn json<T>(self, value: T) -> Self
    where
        T: serde::Serialize + Send + 'static,
    {
        self.body(RequestBody::json(value))
    }

    /// Decode a successful response into `target`.
    pub fn decode_into<T: DecodeTarget>(mut self, target: &'a mut T) -> Self {
        self.call.response = Some(target);
        self
    }

    /// Decode the body of an error response into `target`.
    pub fn decode_error_into<T: DecodeTarget>(mut self, target: &'a mut T) -> Self {
        self.call.error = Some(target);
        self
    }

    pub fn context(mut self, ctx: CallContext) -> Self {
        self.call.ctx = ctx;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.call.ctx = std::mem::take(&mut self.call.ctx).with_timeout(timeout);
        self
    }

    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.call.ctx = std::mem::take(&mut self.call.ctx).with_cancellation(token);
        self
    }

    /// Send the request.
    pub async fn send(self) -> Result<(), ClientError> {
        if let Some(e) = self.error {
            let url = self.client.endpoint.url_for(&self.call.path);
            return Err(ClientError::with_kind(
                ErrorKind::Construct,
                url.as_str(),
                0,
                e,
            ));
        }
        self.client.execute(self.call).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::FakeTransport;

    #[test]
    fn test_builder_requires_endpoint() {
        let err = Client::builder().build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert_eq!(err.status_code(), 0);
    }

    #[test]
    fn test_new_rejects_bad_address() {
        let err = Client::new("::not-an-address").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[tokio::test]
    async fn test_fake_transport_call() {
        let client = Client::builder()
            .endpoint("http://h/")
            .transport(FakeTransport::new())
            .build()
            .unwrap();
        assert_eq!(client.endpoint().to_string(), "http://h");
        client.get("/items/5").query_pair("a", "1").send().await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_header_fails_at_send() {
        let client = Client::builder()
            .endpoint("http://h")
            .transport(FakeTransport::new())
            .build()
            .unwrap();
        let err = client
            .get("/x")
            .header("bad header", "v")
            .send()
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Construct);
        assert_eq!(err.endpoint(), "http://h/x");
    }
}
