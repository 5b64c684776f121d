//! File host HTTP gateway.
//!
//! Blocking reqwest client moved onto smol's blocking pool with
//! `smol::unblock`, so callers on a single-threaded executor only yield
//! while a request is in flight.

use std::rc::Rc;
use std::time::Duration;

use filehost_config::ClientConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ClientError, UniformError};
use crate::pipeline::{
    Body, Failure, FilePart, OutgoingRequest, Pipeline, RawResponse, RequestOptions, TokenSource,
};

/// File host API client.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::blocking::Client,
    config: ClientConfig,
    pipeline: Rc<Pipeline>,
}

/// A successful (2xx) response, body untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Decode the body. A body that does not match `T` is an unexpected
    /// failure, not an API error.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| ClientError::Unexpected(format!("Invalid response body: {}", e)))
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }
}

impl ApiClient {
    /// Client with the standard pipeline: token injection, plus request
    /// logging when `config.debug` is set.
    pub fn new(config: ClientConfig, tokens: Rc<dyn TokenSource>) -> Self {
        let pipeline = Pipeline::standard(tokens, config.debug);
        Self::with_pipeline(config, pipeline)
    }

    /// Client with an explicit pipeline.
    pub fn with_pipeline(config: ClientConfig, pipeline: Pipeline) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("filehost/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Failed to configure HTTP client ({}), using defaults", e);
                reqwest::blocking::Client::new()
            });

        log::debug!("API client for {} with stages {:?}", config.api_base, pipeline.names());
        Self { http, config, pipeline: Rc::new(pipeline) }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send one request. Every failure, with or without a response, comes
    /// back as a [`UniformError`].
    pub async fn send(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, UniformError> {
        let mut request = OutgoingRequest::new(self.config.endpoint(path), options);
        self.pipeline.before_send(&mut request);

        // The body goes to the blocking pool alone; stages observe the rest.
        let body = std::mem::take(&mut request.body);
        let http = self.http.clone();
        let (request, outcome) = smol::unblock(move || {
            let outcome = dispatch(&http, &request, body);
            (request, outcome)
        })
        .await;

        let failure = match outcome {
            Ok(response) => {
                self.pipeline.after_receive(&request, &response);
                if response.is_success() {
                    return Ok(ApiResponse { status: response.status, body: response.body });
                }
                Failure::Status(response)
            }
            Err(msg) => Failure::Transport(msg),
        };

        self.pipeline.on_failure(&request, &failure);
        Err(failure.normalize())
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(path, RequestOptions::get()).await?.json()
    }

    pub async fn get_json_with<T>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        self.send(path, options).await?.json()
    }

    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = to_json(body)?;
        self.send(path, RequestOptions::post_json(body)).await?.json()
    }

    pub async fn put_json<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = to_json(body)?;
        self.send(path, RequestOptions::put_json(body)).await?.json()
    }

    /// DELETE, ignoring the success body.
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.send(path, RequestOptions::delete()).await?;
        Ok(())
    }

    /// Multipart upload, ignoring the success body.
    pub async fn upload(&self, path: &str, part: FilePart) -> Result<(), ClientError> {
        self.send(path, RequestOptions::upload(part)).await?;
        Ok(())
    }

    /// GET raw bytes.
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ClientError> {
        Ok(self.send(path, RequestOptions::get()).await?.into_bytes())
    }
}

fn to_json<B: Serialize + ?Sized>(body: &B) -> Result<serde_json::Value, ClientError> {
    serde_json::to_value(body)
        .map_err(|e| ClientError::Unexpected(format!("Failed to encode request body: {}", e)))
}

/// Blocking send. `Err` means no response was received.
fn dispatch(
    http: &reqwest::blocking::Client,
    request: &OutgoingRequest,
    body: Body,
) -> Result<RawResponse, String> {
    let mut builder = http.request(request.method.clone(), &request.url);

    if !request.query.is_empty() {
        builder = builder.query(&request.query);
    }
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    builder = match body {
        Body::Empty => builder,
        Body::Json(value) => builder.json(&value),
        Body::File(part) => {
            let file = reqwest::blocking::multipart::Part::bytes(part.bytes)
                .file_name(part.file_name)
                .mime_str(&part.content_type)
                .map_err(|e| format!("Invalid content type {:?}: {}", part.content_type, e))?;
            builder.multipart(reqwest::blocking::multipart::Form::new().part(part.field, file))
        }
    };

    let response = builder.send().map_err(|e| e.to_string())?;
    let status = response.status().as_u16();

    let body = if response.status().is_success() {
        response.bytes().map_err(|e| e.to_string())?.to_vec()
    } else {
        // An unreadable error body is treated as an absent one.
        response.bytes().map(|b| b.to_vec()).unwrap_or_default()
    };

    Ok(RawResponse { status, body })
}
