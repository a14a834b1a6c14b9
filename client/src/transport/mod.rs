//! The I/O half of every call.
//!
//! A transport moves one [`HttpRequest`] to the wire and hands back the raw
//! [`HttpResponse`], whatever its status. Interpreting the status and body
//! is the core's job, so transports only fail with transport-level
//! [`SdkError`]s (kinds `Transport` and `Timeout`). Transports never retry.

mod reqwest;
mod ureq;

use async_trait::async_trait;
use siren_core::{HttpRequest, HttpResponse, SdkError};

pub use self::reqwest::ReqwestTransport;
pub use self::ureq::UreqTransport;

/// Blocking transport: the calling thread waits for the exchange.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, SdkError>;
}

/// Non-blocking transport: the exchange is a suspension point, and dropping
/// the future abandons the request.
#[async_trait]
pub trait AsyncTransport: Send + Sync {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, SdkError>;
}
