//! Client-side checks run before an upload leaves the machine.

use std::path::Path;

use filehost_config::UploadLimits;

use crate::format::format_file_size;

/// What is known about a file before it is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub name: String,
    pub size: u64,
    pub content_type: String,
}

impl FileCandidate {
    /// Candidate for a local file; the content type comes from its extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, size: metadata.len(), content_type: content_type_for(path).to_string() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    TooLarge { limit: u64 },
    TypeNotAllowed,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::TooLarge { limit } => {
                write!(f, "File size exceeds maximum limit of {}", format_file_size(*limit))
            }
            ValidationError::TypeNotAllowed => write!(f, "File type not allowed"),
        }
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub valid: Vec<FileCandidate>,
    pub invalid: Vec<(FileCandidate, ValidationError)>,
}

pub fn validate_file(limits: &UploadLimits, file: &FileCandidate) -> Result<(), ValidationError> {
    if file.size > limits.max_file_size {
        return Err(ValidationError::TooLarge { limit: limits.max_file_size });
    }
    if !limits.allowed_types.iter().any(|allowed| type_matches(allowed, &file.content_type)) {
        return Err(ValidationError::TypeNotAllowed);
    }
    Ok(())
}

pub fn validate_files(limits: &UploadLimits, files: Vec<FileCandidate>) -> ValidationReport {
    let mut report = ValidationReport::default();
    for file in files {
        match validate_file(limits, &file) {
            Ok(()) => report.valid.push(file),
            Err(e) => report.invalid.push((file, e)),
        }
    }
    report
}

/// `major/*` matches any subtype of `major`; anything else must match exactly.
fn type_matches(allowed: &str, content_type: &str) -> bool {
    match allowed.strip_suffix('*') {
        Some(prefix) if prefix.ends_with('/') => content_type.starts_with(prefix),
        _ => allowed == content_type,
    }
}

/// Guess a MIME type from a file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "pdf" => "application/pdf",
        "txt" | "log" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "json" => "application/json",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}
