//! JSON:API style error responses for the REST surface.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::ShortenerError;

/// Stable numeric error codes returned to API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorReason {
    InternalServerError = 1000,
    InvalidLongUrl = 1001,
    InvalidShortUrl = 1002,
    ShortUrlAlreadyExists = 1003,
    ShortUrlMappingNotExists = 1004,
    MalformedData = 1005,
    ShortUrlSpaceExhausted = 1006,
    UnsupportedMediaType = 1007,
}

impl ErrorReason {
    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn title(self) -> &'static str {
        match self {
            ErrorReason::InternalServerError => "Internal server error",
            ErrorReason::InvalidLongUrl => "Invalid long_url",
            ErrorReason::InvalidShortUrl => "Invalid short_url",
            ErrorReason::ShortUrlAlreadyExists => "short_url already exists",
            ErrorReason::ShortUrlMappingNotExists => "short_url has no mapping",
            ErrorReason::MalformedData => "Malformed data",
            ErrorReason::ShortUrlSpaceExhausted => "short_url space exhausted",
            ErrorReason::UnsupportedMediaType => "Unsupported media type",
        }
    }

    pub fn status(self) -> StatusCode {
        match self {
            ErrorReason::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorReason::InvalidLongUrl
            | ErrorReason::InvalidShortUrl
            | ErrorReason::MalformedData => StatusCode::BAD_REQUEST,
            ErrorReason::ShortUrlAlreadyExists => StatusCode::CONFLICT,
            ErrorReason::ShortUrlMappingNotExists => StatusCode::NOT_FOUND,
            ErrorReason::ShortUrlSpaceExhausted => StatusCode::SERVICE_UNAVAILABLE,
            ErrorReason::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub errors: Vec<ErrorObject>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: String,
    pub title: String,
    pub detail: String,
    pub status: String,
}

#[derive(Debug)]
pub struct ApiError {
    reason: ErrorReason,
    detail: String,
}

impl ApiError {
    pub fn new(reason: ErrorReason, detail: impl Into<String>) -> Self {
        Self {
            reason,
            detail: detail.into(),
        }
    }

    pub fn malformed() -> Self {
        Self::new(ErrorReason::MalformedData, "Are you malicious?")
    }

    pub fn unsupported_media_type() -> Self {
        Self::new(
            ErrorReason::UnsupportedMediaType,
            "Send the body as JSON, an urlencoded form or a multipart form",
        )
    }

    pub fn reason(&self) -> ErrorReason {
        self.reason
    }
}

impl From<ShortenerError> for ApiError {
    fn from(err: ShortenerError) -> Self {
        match err {
            ShortenerError::InvalidLongUrl => Self::new(
                ErrorReason::InvalidLongUrl,
                "long_url is not a valid http(s) URL",
            ),
            ShortenerError::MalformedInput => Self::malformed(),
            ShortenerError::InvalidShortCode => Self::new(
                ErrorReason::InvalidShortUrl,
                "short_url cannot match pattern: ^[A-Za-z0-9]{1,32}$",
            ),
            ShortenerError::DuplicateShortCode(code) => Self::new(
                ErrorReason::ShortUrlAlreadyExists,
                format!("short_url:`{code}` is occupied. Please pick another short_url"),
            ),
            ShortenerError::NotFound(code) => Self::new(
                ErrorReason::ShortUrlMappingNotExists,
                format!("There is no URL to redirect for short_url:`{code}`"),
            ),
            ShortenerError::CodeSpaceExhausted(attempts) => {
                tracing::error!(attempts, "unable to generate an unused short_url");
                Self::new(
                    ErrorReason::ShortUrlSpaceExhausted,
                    "Unable to generate an available short_url. Please pick one",
                )
            }
            ShortenerError::Storage(e) => {
                tracing::error!(error = %e, "storage failure");
                Self::new(
                    ErrorReason::InternalServerError,
                    "The server cannot handle this request.",
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.reason.status();
        let body = ErrorResponse {
            errors: vec![ErrorObject {
                code: self.reason.code().to_string(),
                title: self.reason.title().to_string(),
                detail: self.detail,
                status: status.as_u16().to_string(),
            }],
        };

        (status, Json(body)).into_response()
    }
}
