use siren_core::{HttpMethod, HttpRequest, HttpResponse, SdkError};
use tracing::{field, instrument, Span};

use super::Transport;

/// Blocking transport over a pooled `ureq` agent.
///
/// The agent is configured so 4xx/5xx responses come back as data rather
/// than `Err`, leaving status interpretation to the core.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ::ureq::Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        let agent = ::ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a caller-configured agent. It must not turn error statuses into
    /// `Err`, or structured API errors are lost.
    pub fn with_agent(agent: ::ureq::Agent) -> Self {
        Self { agent }
    }
}

fn prepare<B>(mut builder: ::ureq::RequestBuilder<B>, request: &HttpRequest) -> ::ureq::RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder.config().timeout_global(Some(request.timeout)).build()
}

impl Transport for UreqTransport {
    #[instrument(
        name = "siren_http",
        skip_all,
        fields(
            http.method = %request.method,
            http.url = %request.url,
            http.status_code = field::Empty,
        )
    )]
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, SdkError> {
        let url = request.url.as_str();
        let body = request.body.as_deref().map(str::as_bytes);

        let result = match (request.method, body) {
            (HttpMethod::Get, _) => prepare(self.agent.get(url), request).call(),
            (HttpMethod::Delete, _) => prepare(self.agent.delete(url), request).call(),
            (HttpMethod::Post, Some(body)) => prepare(self.agent.post(url), request).send(body),
            (HttpMethod::Post, None) => prepare(self.agent.post(url), request).send_empty(),
            (HttpMethod::Put, Some(body)) => prepare(self.agent.put(url), request).send(body),
            (HttpMethod::Put, None) => prepare(self.agent.put(url), request).send_empty(),
            (HttpMethod::Patch, Some(body)) => prepare(self.agent.patch(url), request).send(body),
            (HttpMethod::Patch, None) => prepare(self.agent.patch(url), request).send_empty(),
        };

        let mut response = result.map_err(failure)?;
        let status = response.status().as_u16();
        Span::current().record("http.status_code", status);

        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
            .collect();
        let body = response.body_mut().read_to_string().map_err(failure)?;

        Ok(HttpResponse { status, headers, body })
    }
}

fn failure(e: ::ureq::Error) -> SdkError {
    let err = match &e {
        ::ureq::Error::Timeout(_) => SdkError::timeout(format!("request timed out: {e}")),
        _ => SdkError::transport(format!("request failed: {e}")),
    };
    tracing::error!(error = %e, "transport failure");
    err.with_source(e)
}
