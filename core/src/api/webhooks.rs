use crate::endpoint::{Endpoint, V1_PREFIX};
use crate::error::{Result, SdkError, SdkErrorKind};
use crate::executor::{Call, RequestExecutor};
use crate::models::{WebhookConfig, WebhookRequest, WebhookSettings};

/// Webhook configuration. Both operations are upserts on the same resource.
#[derive(Debug, Clone, Copy)]
pub struct WebhookCalls<'a> {
    exec: &'a RequestExecutor,
}

impl<'a> WebhookCalls<'a> {
    pub fn new(exec: &'a RequestExecutor) -> Self {
        Self { exec }
    }

    /// Where the platform posts delivery status events.
    pub fn configure_notifications(&self, url: &str) -> Result<Call<WebhookConfig>> {
        let request = WebhookRequest::notifications(url);
        Ok(self
            .exec
            .prepare::<_, WebhookSettings>(Self::endpoint(), Some(&request))?
            .and_then(|settings| settings.webhook_config.ok_or_else(|| missing("webhookConfig"))))
    }

    /// Where the platform forwards inbound replies.
    pub fn configure_inbound(&self, url: &str) -> Result<Call<WebhookConfig>> {
        let request = WebhookRequest::inbound(url);
        Ok(self
            .exec
            .prepare::<_, WebhookSettings>(Self::endpoint(), Some(&request))?
            .and_then(|settings| settings.inbound_webhook_config.ok_or_else(|| missing("inboundWebhookConfig"))))
    }

    fn endpoint() -> Endpoint {
        Endpoint::put(format!("{V1_PREFIX}/webhooks"))
    }
}

fn missing(key: &str) -> crate::error::SirenError {
    SdkError::new(SdkErrorKind::Decode, format!("response data has no `{key}`")).into()
}
