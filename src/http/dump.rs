//! Traffic dump for debugging.
//!
//! When enabled with [`set_dump_requests`], every completed exchange is
//! printed to stdout: an equivalent `curl` command, the raw request and
//! response heads, and pretty-printed JSON bodies. The dump always works on
//! drained copies of the bodies (see [`drain_body`](crate::http::drain::drain_body)).

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, Method, StatusCode, Uri, Version};
use std::sync::atomic::{AtomicBool, Ordering};

static DUMP_REQUESTS: AtomicBool = AtomicBool::new(false);

const MIME_JSON: &str = "application/json";
const MIME_FORM: &str = "application/x-www-form-urlencoded";

/// Turn the process-wide traffic dump on or off.
pub fn set_dump_requests(enabled: bool) {
    DUMP_REQUESTS.store(enabled, Ordering::Relaxed);
}

/// Whether exchanges are currently dumped.
pub fn dump_requests_enabled() -> bool {
    DUMP_REQUESTS.load(Ordering::Relaxed)
}

/// Request as it was handed to the transport.
#[derive(Debug, Clone)]
pub struct RequestSnapshot {
    pub method: Method,
    pub uri: Uri,
    pub version: Version,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Response as it came back from the transport.
#[derive(Debug, Clone)]
pub struct ResponseSnapshot {
    pub version: Version,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Print the exchange to stdout.
pub fn emit(req: &RequestSnapshot, resp: &ResponseSnapshot) {
    println!("{}", render(req, resp));
}

/// Render the full dump of one exchange.
pub fn render(req: &RequestSnapshot, resp: &ResponseSnapshot) -> String {
    let mut buf = String::new();
    let content_type = header_str(&req.headers, CONTENT_TYPE.as_str());

    buf.push('\n');
    buf.push_str("=================\n");
    buf.push_str(">>>> request <<<<\n");
    buf.push_str("=================\n");
    buf.push('\n');

    buf.push_str(">>>> command <<<<\n");
    buf.push('\n');
    if req.method == Method::GET
        || content_type.contains(MIME_JSON)
        || content_type.contains(MIME_FORM)
    {
        buf.push_str(&curl_command(req));
        buf.push('\n');
    }

    buf.push('\n');
    buf.push_str(">>>> request dump <<<<\n");
    buf.push('\n');
    buf.push_str(&request_head(req));

    if content_type.contains(MIME_JSON) {
        if let Some(pretty) = indent_json(&req.body) {
            buf.push_str(&pretty);
        }
        buf.push_str("\n\n");
    }

    buf.push_str("**** response ****\n");
    buf.push('\n');
    buf.push_str(&response_head(resp));
    if let Some(pretty) = indent_json(&resp.body) {
        buf.push_str(&pretty);
    }
    buf.push('\n');

    buf.push_str("=====================\n");
    buf.push_str(">>>> end request <<<<\n");
    buf.push_str("=====================\n");
    buf
}

/// Wrap `s` in single quotes for a POSIX shell.
pub fn bash_escape(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Equivalent `curl` invocation, headers sorted by name.
pub fn curl_command(req: &RequestSnapshot) -> String {
    let mut cmd = vec!["curl".to_string()];

    if req.uri.scheme_str() == Some("https") {
        cmd.push("-k".to_string());
    }

    cmd.push("-X".to_string());
    cmd.push(bash_escape(req.method.as_str()));

    if !req.body.is_empty() {
        cmd.push("-d".to_string());
        cmd.push(bash_escape(&String::from_utf8_lossy(&req.body)));
    }

    for name in sorted_names(&req.headers) {
        let values = req
            .headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect::<Vec<_>>()
            .join(" ");
        cmd.push("-H".to_string());
        cmd.push(bash_escape(&format!("{}: {}", name, values)));
    }

    cmd.push(bash_escape(&req.uri.to_string()));
    cmd.join(" ")
}

/// JSON re-indented with two spaces, `None` if `data` is not JSON.
pub fn indent_json(data: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(data).ok()?;
    serde_json::to_string_pretty(&value).ok()
}

fn request_head(req: &RequestSnapshot) -> String {
    let mut out = String::new();
    let target = req
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    out.push_str(&format!("{} {} {:?}\r\n", req.method, target, req.version));
    if let Some(authority) = req.uri.authority() {
        out.push_str(&format!("Host: {}\r\n", authority));
    }
    write_headers(&mut out, &req.headers);
    out.push_str("\r\n");
    out
}

fn response_head(resp: &ResponseSnapshot) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:?} {}\r\n", resp.version, resp.status));
    write_headers(&mut out, &resp.headers);
    out.push_str("\r\n");
    out
}

fn write_headers(out: &mut String, headers: &HeaderMap) {
    for name in sorted_names(headers) {
        for value in headers.get_all(name) {
            out.push_str(&format!("{}: {}\r\n", name, String::from_utf8_lossy(value.as_bytes())));
        }
    }
}

fn sorted_names(headers: &HeaderMap) -> Vec<&http::header::HeaderName> {
    let mut names: Vec<_> = headers.keys().collect();
    names.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    names
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}
