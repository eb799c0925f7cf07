//! # restclient
//!
//! A small HTTP helper for JSON services.
//!
//! A [`Client`] targets one endpoint. Each call composes the URL from the
//! endpoint and a path, runs an optional auth hook, encodes the body,
//! dispatches through a pluggable [`Transport`](transport::Transport) and
//! decodes the success or error payload into caller-supplied targets.
//! Failures come back as a [`ClientError`] that never contains the query
//! string.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use restclient::Client;
//! use serde_json::Value;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), restclient::ClientError> {
//!     let client = Client::new("http://localhost:8080")?;
//!     let mut created = Value::Null;
//!     let mut problem = Value::Null;
//!     client
//!         .post("/items")
//!         .json(serde_json::json!({"name": "widget"}))
//!         .decode_into(&mut created)
//!         .decode_error_into(&mut problem)
//!         .send()
//!         .await
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error model
//! - [`http`] - Request pipeline, bodies, traffic dump
//! - [`transport`] - Transport trait and implementations
//! - [`urlrequest`] - Endpoint and call context

pub mod base;
pub mod client;
pub mod http;
pub mod transport;
pub mod urlrequest;

pub use base::clienterror::{BoxError, ClientError, ErrorKind, ResponseBodyError};
pub use client::{Client, ClientBuilder, RequestBuilder};
pub use crate::http::dump::{dump_requests_enabled, set_dump_requests};
pub use crate::http::{Body, RequestBody};
pub use urlrequest::CallContext;
