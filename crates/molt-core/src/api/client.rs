//! Authenticated HTTP client
//!
//! Every request carries `Authorization: Bearer <key>` and a JSON content
//! type. Two calling modes share the same request construction:
//!
//! - `request` returns the failure to the caller, which ends the command
//! - `request_safe` logs the failure and yields `None`, for commands that
//!   aggregate several independent reads and should show what they can

use std::error::Error as _;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ConfigStore;
use crate::error::{MoltError, Result};
use crate::settings::Settings;

/// Blocking client for the Moltbook REST API
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    timeout_secs: u64,
}

impl ApiClient {
    /// Build a client authenticated with the configured API key
    ///
    /// Fails with `NoApiKey` when neither config.json nor the environment
    /// provides one.
    pub fn new(settings: &Settings, config: &ConfigStore) -> Result<Self> {
        let api_key = config.api_key()?;
        Self::with_key(settings, &api_key)
    }

    /// Build a client with an explicit API key
    pub fn with_key(settings: &Settings, api_key: &str) -> Result<Self> {
        Self::build(settings, api_key, true)
    }

    fn build(settings: &Settings, api_key: &str, system_proxy: bool) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| MoltError::InvalidApiKey)?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("molt/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers);
        if !system_proxy {
            builder = builder.no_proxy();
        }
        let timeout_secs = settings.timeout.as_secs();
        let http = builder
            .build()
            .map_err(|e| MoltError::Connection(describe_transport(&e, timeout_secs)))?;

        Ok(Self {
            http,
            base_url: settings.api_base.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }

    fn prepare(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut builder = self.http.request(method, url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        builder
    }

    /// Send a request and return the decoded JSON body
    ///
    /// Non-success statuses become `Http` with the server's `error` text
    /// when the body carries one. Unreachable hosts and timeouts become
    /// `Connection`.
    pub fn request(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        debug!("{} {}", method, endpoint);

        let response = self
            .prepare(method, endpoint, query, body)
            .send()
            .map_err(|e| MoltError::Connection(describe_transport(&e, self.timeout_secs)))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| MoltError::Connection(describe_transport(&e, self.timeout_secs)))?;

        if !status.is_success() {
            return Err(MoltError::Http {
                status: status.as_u16(),
                message: error_message(status.as_u16(), &text),
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }
        serde_json::from_str(&text).map_err(|e| MoltError::Decode(e.to_string()))
    }

    /// Like [`request`](Self::request), but any failure yields `None`
    pub fn request_safe(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Option<Value> {
        let label = format!("{} {}", method, endpoint);
        match self.request(method, endpoint, query, body) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("{} unavailable: {}", label, e);
                None
            }
        }
    }

    /// GET `endpoint` and decode the JSON found under `key`
    pub fn get_field<T>(&self, endpoint: &str, query: &[(&str, String)], key: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let value = self.request(Method::GET, endpoint, query, None)?;
        decode_field(&value, key)
    }

    /// Safe-mode counterpart of [`get_field`](Self::get_field)
    pub fn get_field_safe<T>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
        key: &str,
    ) -> Option<T>
    where
        T: DeserializeOwned + Default,
    {
        let value = self.request_safe(Method::GET, endpoint, query, None)?;
        match decode_field(&value, key) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!("GET {} unavailable: {}", endpoint, e);
                None
            }
        }
    }
}

/// Decode `value[key]`, treating a missing or null field as the default
pub(crate) fn decode_field<T>(value: &Value, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match value.get(key) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(field) => {
            serde_json::from_value(field.clone()).map_err(|e| MoltError::Decode(e.to_string()))
        }
    }
}

/// Human-readable message for a non-success response body
///
/// A JSON object's `error` field wins; a JSON object without one yields
/// the raw body; anything else is reported with the status code.
pub(crate) fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("error") {
            Some(Value::String(msg)) => msg.clone(),
            Some(Value::Null) | None => body.to_string(),
            Some(other) => other.to_string(),
        },
        _ if body.trim().is_empty() => format!("HTTP {}", status),
        _ => format!("HTTP {}: {}", status, body.trim()),
    }
}

/// Describe a transport failure by its innermost cause
fn describe_transport(error: &reqwest::Error, timeout_secs: u64) -> String {
    if error.is_timeout() {
        return format!("request timed out after {}s", timeout_secs);
    }
    let mut source = error.source();
    let mut reason = error.to_string();
    while let Some(inner) = source {
        reason = inner.to_string();
        source = inner.source();
    }
    reason
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};
    use std::time::Duration;

    /// Client pointed at `base`, bypassing any proxy from the environment
    pub(crate) fn test_client(base: &str) -> ApiClient {
        let mut settings = Settings::with_data_dir("/nonexistent").with_api_base(base);
        settings.timeout = Duration::from_secs(5);
        ApiClient::build(&settings, "test-key", false).unwrap()
    }

    /// A loopback address with nothing listening on it
    pub(crate) fn unreachable_base() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    /// Answer exactly one HTTP request with `status_line` and `body`
    ///
    /// The join handle yields the raw request text.
    pub(crate) fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut received = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = stream.read(&mut chunk).unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&chunk[..n]);
                if request_complete(&received) {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            String::from_utf8_lossy(&received).to_string()
        });

        (format!("http://{}", addr), handle)
    }

    fn request_complete(received: &[u8]) -> bool {
        let text = String::from_utf8_lossy(received);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        received.len() >= header_end + 4 + content_length
    }

    #[test]
    fn test_error_message_prefers_error_field() {
        assert_eq!(
            error_message(404, r#"{"error": "Post not found"}"#),
            "Post not found"
        );
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(error_message(400, r#"{"detail": "x"}"#), r#"{"detail": "x"}"#);
        assert_eq!(error_message(502, "Bad Gateway"), "HTTP 502: Bad Gateway");
        assert_eq!(error_message(500, ""), "HTTP 500");
        assert_eq!(error_message(422, r#"{"error": {"code": 1}}"#), r#"{"code":1}"#);
    }

    #[test]
    fn test_decode_field_defaults() {
        let value = json!({"posts": null});
        let posts: Vec<String> = decode_field(&value, "posts").unwrap();
        assert!(posts.is_empty());

        let missing: Vec<String> = decode_field(&value, "other").unwrap();
        assert!(missing.is_empty());
    }

    #[test]
    fn test_invalid_api_key_header() {
        let settings = Settings::with_data_dir("/nonexistent");
        let result = ApiClient::with_key(&settings, "bad\nkey");
        assert!(matches!(result, Err(MoltError::InvalidApiKey)));
    }

    #[test]
    fn test_request_sends_bearer_and_parses_json() {
        let (base, server) = serve_once("200 OK", r#"{"posts": [{"id": "abcd1234-1"}]}"#);
        let client = test_client(&base);

        let value = client
            .request(Method::GET, "/posts", &[("limit", "5".to_string())], None)
            .unwrap();
        assert_eq!(value["posts"][0]["id"], "abcd1234-1");

        let raw = server.join().unwrap().to_lowercase();
        assert!(raw.starts_with("get /posts?limit=5 "));
        assert!(raw.contains("authorization: bearer test-key"));
        assert!(raw.contains("content-type: application/json"));
    }

    #[test]
    fn test_request_http_error_uses_body_message() {
        let (base, server) = serve_once("404 Not Found", r#"{"error": "Post not found"}"#);
        let client = test_client(&base);

        let err = client
            .request(Method::GET, "/posts/nope", &[], None)
            .unwrap_err();
        server.join().unwrap();

        match err {
            MoltError::Http { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Post not found");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_request_safe_absorbs_http_error() {
        let (base, server) = serve_once("500 Internal Server Error", "boom");
        let client = test_client(&base);

        assert!(client.request_safe(Method::GET, "/agents/me", &[], None).is_none());
        server.join().unwrap();
    }

    #[test]
    fn test_unreachable_host_strict_vs_safe() {
        let client = test_client(&unreachable_base());

        let err = client.request(Method::GET, "/posts", &[], None).unwrap_err();
        assert!(matches!(err, MoltError::Connection(_)));
        assert!(err.to_string().starts_with("Connection error:"));

        assert!(client.request_safe(Method::GET, "/posts", &[], None).is_none());
    }

    #[test]
    fn test_post_body_is_json() {
        let (base, server) = serve_once("200 OK", r#"{"success": true}"#);
        let client = test_client(&base);

        let body = json!({"content": "hello"});
        client
            .request(Method::POST, "/posts/abc/comments", &[], Some(&body))
            .unwrap();

        let raw = server.join().unwrap();
        assert!(raw.starts_with("POST /posts/abc/comments "));
        assert!(raw.ends_with(r#"{"content":"hello"}"#));
    }
}
