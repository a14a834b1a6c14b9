use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct WebhookUrl {
    #[validate(url(message = "webhook url must be an absolute URL"))]
    pub url: String,
}

/// Payload of `PUT /webhooks`. The endpoint is an upsert: sending the same
/// URL again leaves a single configuration in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub webhook_config: Option<WebhookUrl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub inbound_webhook_config: Option<WebhookUrl>,
}

impl WebhookRequest {
    pub fn notifications(url: impl Into<String>) -> Self {
        Self {
            webhook_config: Some(WebhookUrl { url: url.into() }),
            inbound_webhook_config: None,
        }
    }

    pub fn inbound(url: impl Into<String>) -> Self {
        Self {
            webhook_config: None,
            inbound_webhook_config: Some(WebhookUrl { url: url.into() }),
        }
    }
}

/// A configured webhook and the key the platform signs deliveries with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookConfig {
    pub url: String,
    #[serde(default)]
    pub verification_key: Option<String>,
}

/// Data of a webhook upsert response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSettings {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub webhook_config: Option<WebhookConfig>,
    #[serde(default)]
    pub inbound_webhook_config: Option<WebhookConfig>,
}
