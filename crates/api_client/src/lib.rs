//! File host API client.
//!
//! This crate is the single source of truth for the wire contract: request
//! pipeline, credential injection, error envelope, endpoint types.
//!
//! No session state. No retries. No user feedback.

mod client;
mod endpoints;
mod error;
mod pipeline;
mod types;

pub use client::{ApiClient, ApiResponse};
pub use error::{ClientError, UniformError, UNKNOWN_ERROR_MESSAGE, UNKNOWN_ERROR_TYPE};
pub use pipeline::{
    AuthHeader, Body, DebugLog, Failure, FilePart, Middleware, OutgoingRequest, Pipeline,
    RawResponse, RequestOptions, TokenSource, AUTHORIZATION,
};
pub use types::{
    FileItem, FileShareLink, FilesResponse, ListShareLinksResponse, LoginRequest, LoginResponse,
    MeResponse, ShareLink, ShareLinkRequest, ShareLinkUpdate, SharedFileValidation,
};
