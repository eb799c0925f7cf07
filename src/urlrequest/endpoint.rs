//! Base address of a client.

use crate::base::clienterror::{ClientError, ErrorKind};
use crate::base::context::ErrorContext;
use url::Url;

/// Scheme and host (with port) every call is sent to.
///
/// Path, query, fragment and credentials of the configured address are
/// dropped; each call supplies its own path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: Url,
}

impl Endpoint {
    /// Parse and validate `address`, trimming trailing slashes.
    pub fn parse(address: &str) -> Result<Self, ClientError> {
        let trimmed = address.trim_end_matches('/');
        let mut base = Url::parse(trimmed).client_context(ErrorKind::Config, "", 0)?;

        if base.cannot_be_a_base() || !base.has_host() {
            return Err(ClientError::new(
                ErrorKind::Config,
                "",
                0,
                ErrorKind::Config.message(),
                Some(format!("{trimmed:?} has no host").into()),
            ));
        }

        base.set_path("");
        base.set_query(None);
        base.set_fragment(None);
        // Cannot fail once the URL has a host.
        let _ = base.set_username("");
        let _ = base.set_password(None);

        Ok(Self { base })
    }

    pub fn scheme(&self) -> &str {
        self.base.scheme()
    }

    pub fn host(&self) -> &str {
        self.base.host_str().unwrap_or_default()
    }

    /// Explicit port, if the address had a non-default one.
    pub fn port(&self) -> Option<u16> {
        self.base.port()
    }

    /// Fresh URL for `path`; the endpoint itself is never modified.
    pub fn url_for(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        url.set_path(path);
        url
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.base.as_str().trim_end_matches('/'))
    }
}
