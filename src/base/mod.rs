//! Base types and error handling.
//!
//! - [`ClientError`](clienterror::ClientError): the structured error every call returns
//! - [`ErrorContext`](context::ErrorContext): `Result` extension for wrapping causes

pub mod clienterror;
pub mod context;
