//! Request pipeline.
//!
//! Every call passes through an ordered list of [`Middleware`] stages:
//! `before_send` may rewrite the outgoing request, `after_receive` and
//! `on_failure` observe the outcome. Normalization into a
//! [`UniformError`](crate::UniformError) happens after the stages run and is
//! not itself a stage, so no middleware can change what the caller sees.

use std::rc::Rc;

use reqwest::Method;

use crate::error::UniformError;

/// Header the session token is sent in.
pub const AUTHORIZATION: &str = "Authorization";

/// Read access to the current session token.
pub trait TokenSource {
    fn token(&self) -> Option<String>;
}

impl<F> TokenSource for F
where
    F: Fn() -> Option<String>,
{
    fn token(&self) -> Option<String> {
        self()
    }
}

/// A single file sent as a multipart form.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FilePart {
    /// Part under the `file` field, as the upload endpoint expects.
    pub fn file(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            field: "file".to_string(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum Body {
    #[default]
    Empty,
    Json(serde_json::Value),
    File(FilePart),
}

/// Per-call options for [`ApiClient::send`](crate::ApiClient::send).
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub query: Vec<(String, String)>,
    pub body: Body,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::get()
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self { method: Method::GET, query: Vec::new(), body: Body::Empty }
    }

    pub fn delete() -> Self {
        Self { method: Method::DELETE, ..Self::get() }
    }

    pub fn post_json(body: serde_json::Value) -> Self {
        Self { method: Method::POST, body: Body::Json(body), ..Self::get() }
    }

    pub fn put_json(body: serde_json::Value) -> Self {
        Self { method: Method::PUT, body: Body::Json(body), ..Self::get() }
    }

    pub fn upload(part: FilePart) -> Self {
        Self { method: Method::POST, body: Body::File(part), ..Self::get() }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// The request as the middleware stages see it.
#[derive(Debug, Clone)]
pub struct OutgoingRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

impl OutgoingRequest {
    pub fn new(url: impl Into<String>, options: RequestOptions) -> Self {
        Self {
            method: options.method,
            url: url.into(),
            query: options.query,
            headers: Vec::new(),
            body: options.body,
        }
    }

    /// Header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set a header, replacing any existing value.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.into()));
    }
}

/// Status and body of any response that arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Why a call failed, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// No response was received
    Transport(String),
    /// A response arrived with a non-success status
    Status(RawResponse),
}

impl Failure {
    pub fn normalize(&self) -> UniformError {
        match self {
            Failure::Transport(_) => UniformError::unknown(),
            Failure::Status(response) => UniformError::from_body(&response.body),
        }
    }
}

/// One stage of the pipeline.
pub trait Middleware {
    fn name(&self) -> &'static str;

    fn before_send(&self, _request: &mut OutgoingRequest) {}

    fn after_receive(&self, _request: &OutgoingRequest, _response: &RawResponse) {}

    fn on_failure(&self, _request: &OutgoingRequest, _failure: &Failure) {}
}

/// Attaches the session token, verbatim, as the `Authorization` value.
pub struct AuthHeader {
    tokens: Rc<dyn TokenSource>,
}

impl AuthHeader {
    pub fn new(tokens: Rc<dyn TokenSource>) -> Self {
        Self { tokens }
    }
}

impl Middleware for AuthHeader {
    fn name(&self) -> &'static str {
        "auth-header"
    }

    fn before_send(&self, request: &mut OutgoingRequest) {
        match self.tokens.token() {
            Some(token) if !token.is_empty() => request.set_header(AUTHORIZATION, token),
            _ => {}
        }
    }
}

/// Diagnostic logging of requests and raw outcomes. Secret values are
/// replaced with [`REDACTED`] before anything is written.
pub struct DebugLog;

/// Stand-in for a secret value in debug output.
const REDACTED: &str = "<redacted>";

/// Body fields and query parameters never written to the log.
const SECRET_FIELDS: [&str; 2] = ["token", "password"];

fn is_secret(name: &str) -> bool {
    SECRET_FIELDS.iter().any(|s| s.eq_ignore_ascii_case(name))
}

fn redact_value(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if is_secret(key) {
                    *field = serde_json::Value::String(REDACTED.to_string());
                } else {
                    redact_value(field);
                }
            }
        }
        serde_json::Value::Array(items) => items.iter_mut().for_each(redact_value),
        _ => {}
    }
}

/// Body as logged: JSON with secret fields replaced, anything else as text.
fn loggable_body(body: &[u8]) -> String {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(mut value) => {
            redact_value(&mut value);
            value.to_string()
        }
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    }
}

fn loggable_query(query: &[(String, String)]) -> Vec<(&str, &str)> {
    query
        .iter()
        .map(|(k, v)| (k.as_str(), if is_secret(k) { REDACTED } else { v.as_str() }))
        .collect()
}

impl Middleware for DebugLog {
    fn name(&self) -> &'static str {
        "debug-log"
    }

    fn before_send(&self, request: &mut OutgoingRequest) {
        let headers: Vec<&str> = request.headers.iter().map(|(k, _)| k.as_str()).collect();
        log::debug!(
            "API Request: {} {} query={:?} headers={:?}",
            request.method,
            request.url,
            loggable_query(&request.query),
            headers
        );
    }

    fn after_receive(&self, request: &OutgoingRequest, response: &RawResponse) {
        log::debug!(
            "API Response: {} {} -> {} {}",
            request.method,
            request.url,
            response.status,
            loggable_body(&response.body)
        );
    }

    fn on_failure(&self, request: &OutgoingRequest, failure: &Failure) {
        match failure {
            Failure::Transport(msg) => {
                log::debug!("API Error: {} {} -> transport: {}", request.method, request.url, msg)
            }
            Failure::Status(response) => log::debug!(
                "API Error: {} {} -> {} {}",
                request.method,
                request.url,
                response.status,
                loggable_body(&response.body)
            ),
        }
    }
}

/// Ordered middleware stages.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Middleware>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token injection, plus request logging when `debug` is set.
    pub fn standard(tokens: Rc<dyn TokenSource>, debug: bool) -> Self {
        let pipeline = Self::new().with(AuthHeader::new(tokens));
        if debug {
            pipeline.with(DebugLog)
        } else {
            pipeline
        }
    }

    pub fn with(mut self, stage: impl Middleware + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn before_send(&self, request: &mut OutgoingRequest) {
        for stage in &self.stages {
            stage.before_send(request);
        }
    }

    pub fn after_receive(&self, request: &OutgoingRequest, response: &RawResponse) {
        for stage in &self.stages {
            stage.after_receive(request, response);
        }
    }

    pub fn on_failure(&self, request: &OutgoingRequest, failure: &Failure) {
        for stage in &self.stages {
            stage.on_failure(request, failure);
        }
    }
}
