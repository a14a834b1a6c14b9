//! Per-domain call shaping.
//!
//! Each domain type borrows a [`RequestExecutor`] and turns a named
//! operation into a prepared [`Call`](crate::executor::Call): it picks the
//! endpoint, interpolates path parameters, attaches the payload and narrows
//! the decoded result. Nothing here performs I/O, so the blocking and
//! non-blocking hosts run exactly the same shaping code.

mod messaging;
mod templates;
mod users;
mod webhooks;
mod workflows;

pub use messaging::MessageCalls;
pub use templates::TemplateCalls;
pub use users::UserCalls;
pub use webhooks::WebhookCalls;
pub use workflows::WorkflowCalls;

use crate::executor::RequestExecutor;

impl RequestExecutor {
    pub fn messages(&self) -> MessageCalls<'_> {
        MessageCalls::new(self)
    }

    pub fn templates(&self) -> TemplateCalls<'_> {
        TemplateCalls::new(self)
    }

    pub fn users(&self) -> UserCalls<'_> {
        UserCalls::new(self)
    }

    pub fn webhooks(&self) -> WebhookCalls<'_> {
        WebhookCalls::new(self)
    }

    pub fn workflows(&self) -> WorkflowCalls<'_> {
        WorkflowCalls::new(self)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use url::Url;

    use crate::executor::RequestExecutor;
    use crate::http::HttpResponse;

    pub fn executor() -> RequestExecutor {
        RequestExecutor::new(Url::parse("https://api.dev.trysiren.io").unwrap(), "test_api_key")
    }

    pub fn ok(data: serde_json::Value) -> HttpResponse {
        let body = serde_json::json!({"data": data, "error": null, "errors": null, "meta": null});
        HttpResponse::new(200, body.to_string())
    }

    pub fn body(req: &crate::http::HttpRequest) -> serde_json::Value {
        serde_json::from_str(req.body.as_deref().unwrap()).unwrap()
    }
}
