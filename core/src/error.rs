//! Error taxonomy for the Siren SDK.
//!
//! # Design
//! Callers branch on exactly two kinds of failure:
//! - [`ApiError`]: the service understood the request and answered with a
//!   structured error (`errorCode` + `message`).
//! - [`SdkError`]: everything else. Local validation, configuration,
//!   transport failures, timeouts, undecodable bodies and unexpected statuses
//!   with no parseable error payload.
//!
//! [`SdkErrorKind`] keeps "never sent" failures apart from "sent but lost"
//! ones so that retry logic built outside the SDK can tell them apart.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single structured error entry as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(rename = "errorCode")]
    pub error_code: String,
    pub message: String,
}

/// The service returned a well-formed error payload.
#[derive(Debug, Clone, Error)]
#[error("API error {error_code} (HTTP {status}): {message}")]
pub struct ApiError {
    pub error_code: String,
    pub message: String,
    pub status: u16,
    /// Every entry of the envelope's `errors` list, when present.
    pub errors: Vec<ErrorDetail>,
    /// The decoded body, kept for diagnostics.
    pub raw: serde_json::Value,
}

impl ApiError {
    pub fn human_message(&self) -> &str {
        &self.message
    }
}

/// Classification of SDK-level failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SdkErrorKind {
    /// Payload rejected locally before any request was issued.
    Validation,
    /// Client construction failed (unknown environment, missing API key).
    Config,
    /// Payload could not be encoded as JSON.
    Serialization,
    /// Connection refused, DNS failure, reset, TLS failure.
    Transport,
    /// The per-call timeout elapsed.
    Timeout,
    /// A success response whose body could not be decoded.
    Decode,
    /// A failure status without a recognisable error payload.
    UnexpectedStatus,
}

/// Any failure not attributable to a structured service error.
#[derive(Debug, Error)]
#[error("{kind} error: {message}")]
pub struct SdkError {
    pub kind: SdkErrorKind,
    pub message: String,
    pub status: Option<u16>,
    pub raw_body: Option<String>,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl SdkError {
    pub fn new(kind: SdkErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            raw_body: None,
            source: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(SdkErrorKind::Validation, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(SdkErrorKind::Config, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(SdkErrorKind::Transport, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(SdkErrorKind::Timeout, message)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.raw_body = Some(body.into());
        self
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// `false` when the failure happened before anything reached the wire.
    pub fn was_sent(&self) -> bool {
        !matches!(
            self.kind,
            SdkErrorKind::Validation | SdkErrorKind::Config | SdkErrorKind::Serialization
        )
    }
}

/// The error type of every SDK operation.
#[derive(Debug, Error)]
pub enum SirenError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Sdk(#[from] SdkError),
}

impl SirenError {
    pub fn is_api(&self) -> bool {
        matches!(self, SirenError::Api(_))
    }

    /// The service's error code, for API errors only.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            SirenError::Api(e) => Some(&e.error_code),
            SirenError::Sdk(_) => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            SirenError::Api(e) => Some(e.status),
            SirenError::Sdk(e) => e.status,
        }
    }

    pub fn sdk_kind(&self) -> Option<SdkErrorKind> {
        match self {
            SirenError::Api(_) => None,
            SirenError::Sdk(e) => Some(e.kind),
        }
    }
}

impl From<validator::ValidationErrors> for SdkError {
    fn from(errors: validator::ValidationErrors) -> Self {
        SdkError::validation(errors.to_string())
    }
}

impl From<validator::ValidationErrors> for SirenError {
    fn from(errors: validator::ValidationErrors) -> Self {
        SirenError::Sdk(errors.into())
    }
}

pub type Result<T, E = SirenError> = std::result::Result<T, E>;
