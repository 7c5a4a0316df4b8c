//! Transport primitive - one HTTP request in, one JSON value (or error) out
//!
//! Every resource client funnels through [`HttpTransport::request`]:
//!
//! - JSON bodies get `Accept`/`Content-Type: application/json` unless the
//!   caller already set them (caller headers win, case-insensitively)
//! - multipart bodies are sent as-is; no `Content-Type` is injected so the
//!   multipart boundary header stays intact
//! - non-2xx answers become [`PesoError::Request`] with the backend's
//!   `error`/`message` field, else `"Request failed"`
//! - 2xx answers are parsed and returned without schema validation
//!
//! The transport holds no state across calls besides the pooled client.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::auth::AuthTokenProvider;
use crate::error::{PesoError, Result};
use crate::util::{CONNECT_TIMEOUT, REDIRECT_LIMIT, REQUEST_FAILED, USER_AGENT};

pub use reqwest::Method;

/// Request headers, name → value
pub type Headers = BTreeMap<String, String>;

// ============================================================================
// REQUEST BODY
// ============================================================================

/// Body of an outgoing request
#[derive(Debug, Clone, Default)]
pub enum Body {
    /// No body (query-parameter driven calls)
    #[default]
    Empty,
    /// Serialized as JSON
    Json(Value),
    /// Sent as `multipart/form-data`
    Multipart(MultipartForm),
}

impl Body {
    /// Serialize any payload into a JSON body
    pub fn json<T: Serialize + ?Sized>(payload: &T) -> Result<Self> {
        Ok(Body::Json(serde_json::to_value(payload)?))
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self, Body::Multipart(_))
    }
}

/// One part of a multipart form
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        mime: Option<String>,
        bytes: Vec<u8>,
    },
}

/// Inspectable multipart payload, converted to reqwest's form at send time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Append a file field
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: Option<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push(FormPart::File {
            name: name.into(),
            file_name: file_name.into(),
            mime,
            bytes,
        });
        self
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    fn into_reqwest(self) -> Result<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();
        for part in self.parts {
            form = match part {
                FormPart::Text { name, value } => form.text(name, value),
                FormPart::File {
                    name,
                    file_name,
                    mime,
                    bytes,
                } => {
                    let mut file = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
                    if let Some(mime) = mime {
                        file = file.mime_str(&mime).map_err(|e| PesoError::Upload {
                            reason: format!("Invalid MIME type '{}': {}", mime, e),
                        })?;
                    }
                    form.part(name, file)
                }
            };
        }
        Ok(form)
    }
}

// ============================================================================
// PURE HELPERS
// ============================================================================

/// Insert a header, replacing any existing header with the same name
/// regardless of case
fn set_header(headers: &mut Headers, name: &str, value: &str) {
    headers.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
    headers.insert(name.to_string(), value.to_string());
}

/// Case-insensitive header lookup
pub fn has_header(headers: &Headers, name: &str) -> bool {
    headers.keys().any(|k| k.eq_ignore_ascii_case(name))
}

/// Compute the headers actually sent for a body
///
/// Multipart bodies keep the caller's headers untouched. Everything else
/// starts from the JSON defaults and lets caller headers override them.
pub fn prepare_headers(body: &Body, caller: Option<&Headers>) -> Headers {
    let mut headers = Headers::new();

    if !body.is_multipart() {
        headers.insert("Accept".to_string(), "application/json".to_string());
        headers.insert("Content-Type".to_string(), "application/json".to_string());
    }

    if let Some(caller) = caller {
        for (name, value) in caller {
            set_header(&mut headers, name, value);
        }
    }

    headers
}

/// Message for a failed response: `error`, else `message`, else the fallback.
/// Never fails, whatever the body holds.
pub fn error_message(body: &[u8]) -> String {
    let parsed: Option<Value> = serde_json::from_slice(body).ok();

    parsed
        .as_ref()
        .and_then(|v| message_field(v, "error").or_else(|| message_field(v, "message")))
        .unwrap_or_else(|| REQUEST_FAILED.to_string())
}

fn message_field(body: &Value, field: &str) -> Option<String> {
    match body.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse a successful response body. Empty bodies (e.g. 204) yield `Null`.
pub fn parse_success_body(url: &str, body: &[u8]) -> Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| PesoError::InvalidResponse {
        url: url.to_string(),
        details: e.to_string(),
    })
}

// ============================================================================
// HTTP TRANSPORT
// ============================================================================

/// Shared HTTP transport (connection pooling, optional bearer auth)
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    auth: Option<Arc<dyn AuthTokenProvider>>,
}

impl HttpTransport {
    /// Transport without a request timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(None)
    }

    /// Transport with an optional whole-request timeout
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(REDIRECT_LIMIT))
            .user_agent(USER_AGENT);

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| PesoError::Config {
            reason: format!("Failed to build HTTP client: {}", e),
        })?;

        Ok(Self { client, auth: None })
    }

    /// Attach a token provider; its token is sent as a bearer header
    pub fn with_auth(mut self, provider: Arc<dyn AuthTokenProvider>) -> Self {
        self.auth = Some(provider);
        self
    }

    /// Execute one request and return the parsed JSON body
    #[instrument(skip(self, headers, body), fields(method = %method, url = %url))]
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        headers: Option<&Headers>,
        body: Body,
    ) -> Result<Value> {
        let mut final_headers = prepare_headers(&body, headers);

        if let Some(token) = self.auth.as_ref().and_then(|auth| auth.token()) {
            if !has_header(&final_headers, "Authorization") {
                final_headers.insert("Authorization".to_string(), format!("Bearer {}", token));
            }
        }

        debug!(
            multipart = body.is_multipart(),
            headers = final_headers.len(),
            "Sending request"
        );

        let mut request = self.client.request(method, url);
        for (name, value) in &final_headers {
            request = request.header(name.as_str(), value.as_str());
        }

        request = match body {
            Body::Empty => request,
            Body::Json(value) => request.body(serde_json::to_vec(&value)?),
            Body::Multipart(form) => request.multipart(form.into_reqwest()?),
        };

        let response = request.send().await.map_err(|e| {
            if e.is_builder() {
                PesoError::InvalidUrl {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            } else {
                PesoError::Network {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();

        if !status.is_success() {
            // An unreadable error body still yields the generic message
            let bytes = response.bytes().await.unwrap_or_else(|e| {
                debug!(error = %e, "Failed to read error body");
                Default::default()
            });
            let message = error_message(&bytes);
            warn!(status = %status, error = %message, "Request failed");
            return Err(PesoError::Request {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await.map_err(|e| PesoError::Network {
            url: url.to_string(),
            message: format!("Failed to read response: {}", e),
        })?;

        debug!(status = %status, bytes = bytes.len(), "Response received");
        parse_success_body(url, &bytes)
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("auth", &self.auth.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn headers(pairs: &[(&str, &str)]) -> Headers {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // ═══════════════════════════════════════════════════════════════
    // Header preparation
    // ═══════════════════════════════════════════════════════════════

    #[test]
    fn json_body_gets_json_headers() {
        let prepared = prepare_headers(&Body::Json(json!({"a": 1})), None);
        assert_eq!(
            prepared,
            headers(&[
                ("Accept", "application/json"),
                ("Content-Type", "application/json"),
            ])
        );
    }

    #[test]
    fn empty_body_also_gets_json_headers() {
        let prepared = prepare_headers(&Body::Empty, None);
        assert!(has_header(&prepared, "content-type"));
        assert!(has_header(&prepared, "accept"));
    }

    #[test]
    fn caller_headers_win_case_insensitively() {
        let caller = headers(&[("content-type", "text/plain"), ("X-Trace", "1")]);
        let prepared = prepare_headers(&Body::Json(json!("x")), Some(&caller));

        assert_eq!(
            prepared,
            headers(&[
                ("Accept", "application/json"),
                ("X-Trace", "1"),
                ("content-type", "text/plain"),
            ])
        );
    }

    #[test]
    fn multipart_body_gets_no_content_type() {
        let form = MultipartForm::new().file("file", "permit.pdf", None, vec![1, 2, 3]);
        let prepared = prepare_headers(&Body::Multipart(form), None);
        assert!(prepared.is_empty());
    }

    #[test]
    fn multipart_body_passes_caller_headers_as_is() {
        let caller = headers(&[("X-Role", "employer")]);
        let prepared = prepare_headers(&Body::Multipart(MultipartForm::new()), Some(&caller));
        assert_eq!(prepared, caller);
    }

    // ═══════════════════════════════════════════════════════════════
    // Error messages
    // ═══════════════════════════════════════════════════════════════

    #[test]
    fn error_field_takes_precedence() {
        let body = br#"{"error":"Not found","message":"ignored"}"#;
        assert_eq!(error_message(body), "Not found");
    }

    #[test]
    fn message_field_is_second_choice() {
        assert_eq!(error_message(br#"{"message":"Email taken"}"#), "Email taken");
        assert_eq!(
            error_message(br#"{"error":"","message":"Email taken"}"#),
            "Email taken"
        );
    }

    #[test]
    fn unusable_bodies_fall_back() {
        assert_eq!(error_message(b""), "Request failed");
        assert_eq!(error_message(b"<html>502</html>"), "Request failed");
        assert_eq!(error_message(br#"{"detail":"x"}"#), "Request failed");
        assert_eq!(error_message(br#"["error"]"#), "Request failed");
        assert_eq!(error_message(br#"{"error":null}"#), "Request failed");
    }

    // ═══════════════════════════════════════════════════════════════
    // Success bodies
    // ═══════════════════════════════════════════════════════════════

    #[test]
    fn success_body_is_returned_as_is() {
        let value = parse_success_body("u", br#"{"content":[1,2]}"#).unwrap();
        assert_eq!(value, json!({"content": [1, 2]}));
    }

    #[test]
    fn empty_success_body_is_null() {
        assert_eq!(parse_success_body("u", b"").unwrap(), Value::Null);
        assert_eq!(parse_success_body("u", b"  \n").unwrap(), Value::Null);
    }

    #[test]
    fn non_json_success_body_is_invalid_response() {
        let err = parse_success_body("http://x/jobs", b"<html>").unwrap_err();
        assert!(matches!(err, PesoError::InvalidResponse { .. }));
    }

    #[test]
    fn body_json_serializes_payload() {
        #[derive(Serialize)]
        struct Job {
            title: &'static str,
        }
        match Body::json(&Job { title: "Welder" }).unwrap() {
            Body::Json(v) => assert_eq!(v, json!({"title": "Welder"})),
            other => panic!("expected JSON body, got {:?}", other),
        }
    }
}
