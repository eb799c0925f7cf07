//! Structured client error.
//!
//! Every failure produced by the request pipeline is wrapped in a
//! [`ClientError`]: the redacted endpoint, the HTTP status (0 when the
//! failure happened before a response existed), a short message and the
//! original cause.

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Boxed error used for causes and transport failures.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Tag prepended to every rendered [`ClientError`].
pub const ERROR_TAG: &str = "restclient: ";

/// Classification of a [`ClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Client configuration was rejected (unparseable address).
    Config,
    /// Request body could not be serialized.
    Encode,
    /// Outgoing request could not be built.
    Construct,
    /// Transport failed, or the call was cancelled / timed out.
    Dispatch,
    /// Response body could not be read.
    ResponseRead,
    /// Response body was not valid JSON for the decode target.
    Decode,
    /// Server answered with a status code >= 400.
    HttpStatus,
}

impl ErrorKind {
    /// Default message rendered for this kind.
    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::Config => "cannot parse url",
            ErrorKind::Encode => "encode request body failed",
            ErrorKind::Construct => "create http request failed",
            ErrorKind::Dispatch => "http do request failed",
            ErrorKind::ResponseRead => "read response body failed",
            ErrorKind::Decode => "decode response body failed",
            ErrorKind::HttpStatus => "http returned error status code",
        }
    }
}

/// Error returned by every client call.
///
/// Values are immutable once built. Use [`StdError::source`] (or
/// [`ClientError::cause`]) to reach the wrapped failure, e.g. to downcast
/// to `serde_json::Error` or [`ResponseBodyError`].
#[derive(Debug)]
pub struct ClientError {
    kind: ErrorKind,
    endpoint: String,
    status_code: u16,
    message: String,
    cause: Option<BoxError>,
}

impl ClientError {
    pub fn new(
        kind: ErrorKind,
        endpoint: impl Into<String>,
        status_code: u16,
        message: impl Into<String>,
        cause: Option<BoxError>,
    ) -> Self {
        Self {
            kind,
            endpoint: endpoint.into(),
            status_code,
            message: message.into(),
            cause,
        }
    }

    /// Build an error using the default message of `kind`.
    pub fn with_kind(
        kind: ErrorKind,
        endpoint: impl Into<String>,
        status_code: u16,
        cause: impl Into<BoxError>,
    ) -> Self {
        Self::new(kind, endpoint, status_code, kind.message(), Some(cause.into()))
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Endpoint URL without its query string.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// HTTP status, or 0 when no response was involved.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Take ownership of the wrapped cause.
    pub fn into_cause(self) -> Option<BoxError> {
        self.cause
    }

    /// True when the server answered with an error status.
    pub fn is_status(&self) -> bool {
        self.kind == ErrorKind::HttpStatus
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(ERROR_TAG)?;
        if !self.endpoint.is_empty() {
            write!(f, "url={} ", self.endpoint)?;
        }
        if self.status_code > 0 {
            write!(f, "statusCode={} ", self.status_code)?;
        }
        if !self.message.is_empty() {
            f.write_str(&self.message)?;
        }
        if let Some(cause) = &self.cause {
            write!(f, ": {}", cause)?;
        }
        Ok(())
    }
}

impl StdError for ClientError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

/// Raw body of a response whose status was >= 400.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{body}")]
pub struct ResponseBodyError {
    body: String,
}

impl ResponseBodyError {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Dispatch aborted by the call context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("request canceled")]
    Canceled,
    #[error("deadline exceeded")]
    DeadlineExceeded,
}
