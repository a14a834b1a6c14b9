//! The request executor: the single path every operation takes.
//!
//! # Design
//! Execution is split in two halves around the I/O, the same way every
//! operation in this crate is split:
//! - [`RequestExecutor::prepare`] validates and encodes the payload, resolves
//!   the absolute URL, attaches authentication and content negotiation, and
//!   returns a [`Call`] holding the finished `HttpRequest`.
//! - [`Call::finish`] interprets the `HttpResponse` a host obtained for that
//!   request and yields a typed value or one of the two error kinds.
//!
//! A host (blocking or non-blocking) only moves bytes between the two. It
//! never retries and keeps nothing between calls.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;
use url::Url;
use validator::Validate;

use crate::endpoint::Endpoint;
use crate::envelope::ResponseShape;
use crate::error::{ApiError, Result, SdkError, SdkErrorKind, SirenError};
use crate::http::{HttpRequest, HttpResponse};
use crate::schema;

/// What a successful response carried once the envelope is peeled off.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The call declared a body-less success status and got it, or a 2xx
    /// arrived with an empty body.
    NoContent { status: u16 },
    /// A `{"status": "success"}` style acknowledgement.
    Confirmed { message: Option<String> },
    /// The envelope's `data` (or the whole body for legacy bare responses).
    Data(Value),
}

/// Synthesized result of operations that only report success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub status: u16,
    pub message: Option<String>,
}

type Interpreter<T> = Box<dyn FnOnce(HttpResponse) -> Result<T> + Send>;

/// A prepared request together with the logic that interprets its response.
pub struct Call<T> {
    request: HttpRequest,
    interpret: Interpreter<T>,
}

impl<T: 'static> Call<T> {
    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    /// Interpret the response obtained for [`Call::request`].
    pub fn finish(self, response: HttpResponse) -> Result<T> {
        (self.interpret)(response)
    }

    /// Narrow the result, e.g. to a single field of the decoded model.
    pub fn map<U, F>(self, f: F) -> Call<U>
    where
        U: 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        let interpret = self.interpret;
        Call {
            request: self.request,
            interpret: Box::new(move |response| interpret(response).map(f)),
        }
    }

    /// Like [`Call::map`] for extractions that can fail.
    pub fn and_then<U, F>(self, f: F) -> Call<U>
    where
        U: 'static,
        F: FnOnce(T) -> Result<U> + Send + 'static,
    {
        let interpret = self.interpret;
        Call {
            request: self.request,
            interpret: Box::new(move |response| interpret(response).and_then(f)),
        }
    }
}

impl<T> fmt::Debug for Call<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Call").field("request", &self.request).finish_non_exhaustive()
    }
}

/// Builds requests against one base URL with one credential.
///
/// Holds only immutable configuration, so it is freely shared between the
/// domain clients of a facade.
#[derive(Clone)]
pub struct RequestExecutor {
    base_url: Url,
    api_key: String,
}

impl fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl RequestExecutor {
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            base_url,
            api_key: api_key.into(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Prepare a call whose success result is the decoded `data` member.
    pub fn prepare<P, R>(&self, endpoint: Endpoint, payload: Option<&P>) -> Result<Call<R>>
    where
        P: Serialize + Validate,
        R: DeserializeOwned + 'static,
    {
        let body = payload.map(schema::validate_and_serialize).transpose()?;
        let request = self.build_request(&endpoint, body)?;
        let url = request.url.clone();
        Ok(Call {
            request,
            interpret: Box::new(move |response| {
                let status = response.status;
                let raw_body = response.body.clone();
                let mismatch = |err: SdkError| SirenError::from(err.with_status(status).with_body(raw_body));
                match interpret(&endpoint, &url, response)? {
                    Outcome::Data(value) => schema::decode(value).map_err(mismatch),
                    other => Err(mismatch(SdkError::new(
                        SdkErrorKind::Decode,
                        format!("expected a data payload, got {other:?}"),
                    ))),
                }
            }),
        })
    }

    /// Prepare a call without a request body.
    pub fn prepare_empty<R>(&self, endpoint: Endpoint) -> Result<Call<R>>
    where
        R: DeserializeOwned + 'static,
    {
        self.prepare::<NoPayload, R>(endpoint, None)
    }

    /// Prepare a call that only reports success (deletes and the like).
    pub fn prepare_confirmation(&self, endpoint: Endpoint) -> Result<Call<Confirmation>> {
        let request = self.build_request(&endpoint, None)?;
        let url = request.url.clone();
        Ok(Call {
            request,
            interpret: Box::new(move |response| {
                let status = response.status;
                Ok(match interpret(&endpoint, &url, response)? {
                    Outcome::NoContent { status } => Confirmation { status, message: None },
                    Outcome::Confirmed { message } => Confirmation { status, message },
                    Outcome::Data(_) => Confirmation { status, message: None },
                })
            }),
        })
    }

    /// Resolve the URL and attach headers and body.
    pub fn build_request(&self, endpoint: &Endpoint, body: Option<String>) -> Result<HttpRequest> {
        let url = endpoint.url(&self.base_url).map_err(|e| {
            SdkError::config(format!("cannot resolve {} against {}: {e}", endpoint.path(), self.base_url))
        })?;

        let mut headers = vec![
            ("authorization".to_string(), format!("Bearer {}", self.api_key)),
            ("accept".to_string(), "application/json".to_string()),
        ];
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }

        Ok(HttpRequest {
            method: endpoint.method(),
            url: url.into(),
            headers,
            body,
            timeout: endpoint.timeout_duration(),
        })
    }
}

/// Stand-in payload type for calls without a body.
#[derive(Serialize)]
pub struct NoPayload {}

impl Validate for NoPayload {
    fn validate(&self) -> std::result::Result<(), validator::ValidationErrors> {
        Ok(())
    }
}

/// Turn a raw response into an [`Outcome`] or one of the two error kinds.
///
/// The body is JSON-decoded at most once.
#[instrument(
    name = "siren_response",
    skip(endpoint, url, response),
    fields(
        http.method = %endpoint.method(),
        http.url = url,
        http.status_code = response.status,
    )
)]
pub fn interpret(endpoint: &Endpoint, url: &str, response: HttpResponse) -> Result<Outcome> {
    let status = response.status;

    if endpoint.no_content_status() == Some(status) {
        return Ok(Outcome::NoContent { status });
    }

    if response.is_success() {
        if response.body.trim().is_empty() {
            return Ok(Outcome::NoContent { status });
        }
        let value = parse_json(&response).map_err(|e| {
            SdkError::new(SdkErrorKind::Decode, format!("response was not valid JSON (HTTP {status}): {e}"))
                .with_status(status)
                .with_body(response.body.clone())
                .with_source(e)
        })?;
        return match ResponseShape::classify(value.clone()) {
            ResponseShape::Enveloped(envelope) => {
                if let Some(detail) = envelope.first_error() {
                    return Err(api_error(status, detail.clone(), envelope.errors.clone(), value));
                }
                Ok(Outcome::Data(envelope.data.unwrap_or(Value::Null)))
            }
            ResponseShape::StatusConfirmation { message } => Ok(Outcome::Confirmed { message }),
            ResponseShape::BareError(detail) => Err(api_error(status, detail, None, value)),
            ResponseShape::Bare(value) => Ok(Outcome::Data(value)),
        };
    }

    let unexpected = |reason: String| -> SirenError {
        tracing::error!(%reason, "request failed without a structured error");
        SdkError::new(SdkErrorKind::UnexpectedStatus, reason)
            .with_status(status)
            .with_body(response.body.clone())
            .into()
    };

    let value = match parse_json(&response) {
        Ok(value) => value,
        Err(e) => return Err(unexpected(format!("HTTP {status} with a non-JSON body: {e}"))),
    };

    match ResponseShape::classify(value.clone()) {
        ResponseShape::Enveloped(envelope) => match envelope.first_error() {
            Some(detail) => Err(api_error(status, detail.clone(), envelope.errors.clone(), value)),
            None => Err(unexpected(format!("HTTP {status} with an envelope but no error detail"))),
        },
        ResponseShape::BareError(detail) => Err(api_error(status, detail, None, value)),
        ResponseShape::StatusConfirmation { .. } | ResponseShape::Bare(_) => {
            Err(unexpected(format!("HTTP {status} with an unrecognised error body")))
        }
    }
}

fn parse_json(response: &HttpResponse) -> std::result::Result<Value, serde_json::Error> {
    serde_json::from_str(&response.body)
}

fn api_error(
    status: u16,
    detail: crate::error::ErrorDetail,
    errors: Option<Vec<crate::error::ErrorDetail>>,
    raw: Value,
) -> SirenError {
    tracing::warn!(status, error_code = %detail.error_code, "service returned an error");
    ApiError {
        error_code: detail.error_code,
        message: detail.message,
        status,
        errors: errors.unwrap_or_default(),
        raw,
    }
    .into()
}
