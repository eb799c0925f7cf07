//! Ergonomic error context helpers.
//!
//! Provides an extension trait for converting any `Result` into a
//! `Result<T, ClientError>` annotated with kind, endpoint and status.

use crate::base::clienterror::{BoxError, ClientError, ErrorKind};

/// Extension trait for wrapping foreign errors into [`ClientError`].
pub trait ErrorContext<T> {
    /// Wrap the error with `kind` and its default message.
    ///
    /// # Example
    /// ```ignore
    /// use restclient::base::context::ErrorContext;
    ///
    /// let bytes = serde_json::to_vec(&value)
    ///     .client_context(ErrorKind::Encode, "http://h/items", 0)?;
    /// // Error: "restclient: url=http://h/items encode request body failed: ..."
    /// ```
    fn client_context(self, kind: ErrorKind, endpoint: &str, status: u16)
        -> Result<T, ClientError>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: Into<BoxError>,
{
    fn client_context(
        self,
        kind: ErrorKind,
        endpoint: &str,
        status: u16,
    ) -> Result<T, ClientError> {
        self.map_err(|e| ClientError::with_kind(kind, endpoint, status, e))
    }
}
