use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

use crate::error::SdkError;
use crate::schema::rules;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RecipientType {
    UserId,
    Direct,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Recipient {
    #[serde(rename = "type")]
    pub kind: RecipientType,
    #[validate(custom(function = "rules::not_blank"))]
    pub value: String,
}

impl Recipient {
    pub fn user_id(value: impl Into<String>) -> Self {
        Self {
            kind: RecipientType::UserId,
            value: value.into(),
        }
    }

    pub fn direct(value: impl Into<String>) -> Self {
        Self {
            kind: RecipientType::Direct,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRef {
    pub name: String,
}

/// Payload of `POST /send-messages`. Exactly one of `body` and `template`
/// must be set.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "body_xor_template"))]
pub struct SendMessageRequest {
    #[validate(nested)]
    pub recipient: Recipient,
    #[validate(custom(function = "rules::not_blank"))]
    pub channel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<TemplateRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_variables: Option<Map<String, Value>>,
}

fn body_xor_template(req: &SendMessageRequest) -> Result<(), ValidationError> {
    let has_body = req.body.as_deref().is_some_and(|b| !b.is_empty());
    let has_template = req.template.as_ref().is_some_and(|t| !t.name.is_empty());
    match (has_body, has_template) {
        (true, false) | (false, true) => Ok(()),
        (false, false) => Err(rules::fail("content", "either body or template must be provided")),
        (true, true) => Err(rules::fail("content", "body and template are mutually exclusive")),
    }
}

/// Provider integrations known to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ProviderCode {
    EmailSendgrid,
    EmailMailgun,
    EmailSmtp,
    SmsTwilio,
    SmsPlivo,
    SmsMsg91,
    Slack,
    Teams,
    WhatsappMeta,
    WhatsappWati,
    WhatsappGupshup,
    InApp,
    Pushover,
    Telegram,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderIntegration {
    pub name: String,
    pub code: ProviderCode,
}

impl ProviderIntegration {
    /// Pairs an optional provider name with an optional code. Both or
    /// neither must be given.
    pub fn pair(name: Option<String>, code: Option<ProviderCode>) -> Result<Option<Self>, SdkError> {
        match (name, code) {
            (Some(name), Some(code)) if !name.trim().is_empty() => Ok(Some(Self { name, code })),
            (None, None) => Ok(None),
            (Some(_), Some(_)) => Err(SdkError::validation("provider name must not be blank")),
            _ => Err(SdkError::validation(
                "provider name and provider code must be provided together",
            )),
        }
    }
}

/// Payload for sending a message from a path-addressed template in the
/// platform's template library.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendAwesomeTemplateRequest {
    #[validate(nested)]
    pub recipient: Recipient,
    #[validate(custom(function = "rules::not_blank"))]
    pub channel: String,
    #[validate(custom(function = "template_identifier"))]
    pub template_identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_variables: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_integration: Option<ProviderIntegration>,
}

fn template_identifier(identifier: &str) -> Result<(), ValidationError> {
    rules::not_blank(identifier)?;
    if identifier.starts_with('/') || identifier.split('/').any(|part| part.is_empty() || part == "..") {
        return Err(rules::fail(
            "template_identifier",
            "template identifier must be a relative path such as 'awesome-templates/<category>/<name>.yaml'",
        ));
    }
    Ok(())
}

/// Data of a send response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReceipt {
    #[serde(rename = "notificationId")]
    pub message_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageStatus {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    #[serde(rename = "threadTs", default)]
    pub thread_ts: Option<String>,
    pub user: String,
    pub ts: String,
}
