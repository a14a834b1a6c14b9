use async_trait::async_trait;
use siren_core::{HttpMethod, HttpRequest, HttpResponse, SdkError};
use tracing::{field, instrument, Span};

use super::AsyncTransport;

/// Non-blocking transport over a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: ::reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, SdkError> {
        let client = ::reqwest::Client::builder()
            .build()
            .map_err(|e| SdkError::config(format!("failed to build HTTP client: {e}")).with_source(e))?;
        Ok(Self { client })
    }

    pub fn with_client(client: ::reqwest::Client) -> Self {
        Self { client }
    }
}

fn method(method: HttpMethod) -> ::reqwest::Method {
    match method {
        HttpMethod::Get => ::reqwest::Method::GET,
        HttpMethod::Post => ::reqwest::Method::POST,
        HttpMethod::Put => ::reqwest::Method::PUT,
        HttpMethod::Patch => ::reqwest::Method::PATCH,
        HttpMethod::Delete => ::reqwest::Method::DELETE,
    }
}

#[async_trait]
impl AsyncTransport for ReqwestTransport {
    #[instrument(
        name = "siren_http",
        skip_all,
        fields(
            http.method = %request.method,
            http.url = %request.url,
            http.status_code = field::Empty,
        )
    )]
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, SdkError> {
        let mut builder = self
            .client
            .request(method(request.method), request.url.as_str())
            .timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(failure)?;
        let status = response.status().as_u16();
        Span::current().record("http.status_code", status);

        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
            .collect();
        let body = response.text().await.map_err(failure)?;

        Ok(HttpResponse { status, headers, body })
    }
}

fn failure(e: ::reqwest::Error) -> SdkError {
    let err = if e.is_timeout() {
        SdkError::timeout(format!("request timed out: {e}"))
    } else {
        SdkError::transport(format!("request failed: {e}"))
    };
    tracing::error!(error = %e, "transport failure");
    err.with_source(e)
}
