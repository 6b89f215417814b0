//! Error types for the captioning showcase.
//!
//! [`CaptionError`] covers the external model boundary, [`UploadError`] the
//! user-supplied file, and [`AssetError`] the local static files. Handlers
//! convert into [`AppError`], which knows its HTTP status and JSON shape.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Failures talking to the external captioning model.
#[derive(Debug, Error)]
pub enum CaptionError {
    #[error("captioning provider '{provider}' is not configured: {hint}")]
    NotConfigured { provider: String, hint: String },

    #[error("request to captioning model failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("captioning model did not answer within {secs}s")]
    Timeout { secs: u64 },

    #[error("captioning model returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response from captioning model: {0}")]
    MalformedResponse(String),

    #[error("captioning model returned an empty caption")]
    EmptyCaption,

    #[error("failed to encode image for the model: {0}")]
    Encode(#[from] image::ImageError),
}

/// Failures validating an uploaded image.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("no image file in the upload")]
    MissingFile,

    #[error("unsupported file type '{extension}', expected one of: png, jpg, jpeg")]
    UnsupportedType { extension: String },

    #[error("upload exceeds the limit of {limit} bytes")]
    TooLarge { limit: usize },

    #[error("file could not be decoded as an image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("malformed multipart body: {0}")]
    Multipart(String),
}

/// Failures reading local static files.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read asset '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("column {index} is out of range for '{path}' ({width} columns)")]
    ColumnOutOfRange {
        path: PathBuf,
        index: usize,
        width: usize,
    },
}

/// JSON body returned for every failed API call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
}

/// Errors surfaced by HTTP handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Caption(#[from] CaptionError),

    #[error("not found: {0}")]
    NotFound(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Upload(UploadError::UnsupportedType { .. }) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            AppError::Upload(UploadError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Upload(_) => StatusCode::BAD_REQUEST,
            AppError::Caption(CaptionError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Caption(CaptionError::NotConfigured { .. })
            | AppError::Caption(CaptionError::Encode(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Caption(_) => StatusCode::BAD_GATEWAY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Upload(UploadError::MissingFile) => "missing_file",
            AppError::Upload(UploadError::UnsupportedType { .. }) => "unsupported_type",
            AppError::Upload(UploadError::TooLarge { .. }) => "too_large",
            AppError::Upload(UploadError::Decode(_)) => "invalid_image",
            AppError::Upload(UploadError::Multipart(_)) => "invalid_request",
            AppError::Caption(CaptionError::Timeout { .. }) => "timeout",
            AppError::Caption(_) => "caption_failed",
            AppError::NotFound(_) => "not_found",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error_type: self.error_type().to_string(),
            message: self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
        (status, Json(self.to_response())).into_response()
    }
}
