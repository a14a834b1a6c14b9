//! I/O-free core of the Siren notification platform SDK.
//!
//! # Overview
//! Builds `HttpRequest` values and interprets `HttpResponse` values without
//! touching the network (host-does-IO pattern). The `siren` crate supplies
//! the blocking and non-blocking hosts that carry the bytes.
//!
//! # Design
//! - [`RequestExecutor`] is the single chokepoint. It validates and encodes
//!   payloads, resolves URLs, attaches credentials and per-endpoint
//!   timeouts, and turns every response into a typed value or a
//!   [`SirenError`].
//! - The [`api`] module shapes each domain operation into a [`Call`]; hosts
//!   send `call.request()` and hand the response to `call.finish`.
//! - Payload models in [`models`] carry their wire names and validation
//!   rules as serde and `validator` attributes.
//! - Nothing is cached or retried, and no state survives between calls.

pub mod api;
pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod executor;
pub mod http;
pub mod models;
pub mod schema;

pub use endpoint::{Endpoint, BULK_TIMEOUT, DEFAULT_TIMEOUT};
pub use error::{ApiError, ErrorDetail, Result, SdkError, SdkErrorKind, SirenError};
pub use executor::{Call, Confirmation, Outcome, RequestExecutor};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
