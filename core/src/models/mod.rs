//! Typed request payloads and result models.
//!
//! Local field names are snake_case; serde attributes carry the camelCase
//! wire names. Payloads derive `Validate` and skip absent optional fields.

pub mod messaging;
pub mod templates;
pub mod users;
pub mod webhooks;
pub mod workflows;

pub use messaging::{
    MessageReceipt, MessageStatus, ProviderCode, ProviderIntegration, Recipient, RecipientType, Reply,
    SendAwesomeTemplateRequest, SendMessageRequest, TemplateRef,
};
pub use templates::{
    ChannelTemplate, ChannelTemplateQuery, CreateChannelTemplatesRequest, CreateTemplateRequest, CreatedTemplate,
    Template, TemplateListing, TemplateQuery, TemplateVariable, TemplateVersion, UpdateTemplateRequest,
};
pub use users::{User, UserRequest};
pub use webhooks::{WebhookConfig, WebhookRequest, WebhookSettings, WebhookUrl};
pub use workflows::{
    BulkWorkflowExecution, ScheduleType, ScheduleWorkflowRequest, TriggerBulkWorkflowRequest, TriggerWorkflowRequest,
    WorkflowExecution, WorkflowSchedule,
};
