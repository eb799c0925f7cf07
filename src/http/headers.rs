//! Header helpers used while building requests.

use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue};

pub const MIME_APPLICATION_JSON: &str = "application/json";

/// Merge `src` into `dst`.
///
/// Every name present in `src` replaces all values `dst` had for it;
/// other names in `dst` are left alone.
pub fn merge_headers(dst: &mut HeaderMap, src: &HeaderMap) {
    for name in src.keys() {
        dst.remove(name);
        for value in src.get_all(name) {
            dst.append(name.clone(), value.clone());
        }
    }
}

/// Set `Content-Type: application/json` unless a content type is present.
pub fn default_content_type(headers: &mut HeaderMap) {
    if !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(MIME_APPLICATION_JSON));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::AUTHORIZATION;

    #[test]
    fn test_merge_overwrites_same_name() {
        let mut dst = HeaderMap::new();
        dst.insert(AUTHORIZATION, HeaderValue::from_static("Bearer hook"));
        dst.insert("x-keep", HeaderValue::from_static("1"));

        let mut src = HeaderMap::new();
        src.append(AUTHORIZATION, HeaderValue::from_static("Bearer caller"));
        src.append("x-multi", HeaderValue::from_static("a"));
        src.append("x-multi", HeaderValue::from_static("b"));

        merge_headers(&mut dst, &src);

        assert_eq!(dst.get(AUTHORIZATION).unwrap(), "Bearer caller");
        assert_eq!(dst.get_all(AUTHORIZATION).iter().count(), 1);
        assert_eq!(dst.get("x-keep").unwrap(), "1");
        let multi: Vec<_> = dst.get_all("x-multi").iter().collect();
        assert_eq!(multi, ["a", "b"]);
    }

    #[test]
    fn test_default_content_type() {
        let mut headers = HeaderMap::new();
        default_content_type(&mut headers);
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), MIME_APPLICATION_JSON);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        default_content_type(&mut headers);
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "text/plain");
    }
}
