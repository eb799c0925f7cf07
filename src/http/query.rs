//! Query string parameters.

use http::{Request, Uri};
use std::collections::BTreeMap;
use url::form_urlencoded;
use url::Url;

/// Query parameters keyed by name, each name holding one or more values.
///
/// Encoding is deterministic: names in ascending order, values in the
/// order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: BTreeMap<String, Vec<String>>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to the values of `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.params.entry(key.into()).or_default().push(value.into());
        self
    }

    /// Replace all values of `key` with `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.params.insert(key.into(), vec![value.into()]);
        self
    }

    /// First value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn get_all(&self, key: &str) -> &[String] {
        self.params.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn remove(&mut self, key: &str) {
        self.params.remove(key);
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// `application/x-www-form-urlencoded` form, e.g. `a=1&b=x+y`.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.params {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }
}

impl<K, V> FromIterator<(K, V)> for Query
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Query::new();
        for (key, value) in iter {
            query.add(key, value);
        }
        query
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Query
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Append `key=value` to the query string of an in-flight request.
///
/// Intended for auth hooks that pass credentials in the query.
pub fn add_query_param<B>(req: &mut Request<B>, key: &str, value: &str) -> Result<(), http::Error> {
    let Ok(mut url) = Url::parse(&req.uri().to_string()) else {
        // relative URIs have no query to extend; nothing the hook can do
        return Ok(());
    };
    url.query_pairs_mut().append_pair(key, value);
    *req.uri_mut() = url.as_str().parse::<Uri>()?;
    Ok(())
}
