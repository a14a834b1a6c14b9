//! Blocking facade.
//!
//! Each call occupies the calling thread for the duration of the HTTP
//! exchange. Domain clients borrow the facade, so none of them can outlive
//! it or use its transport after [`SirenClient::close`].

use siren_core::models::{
    BulkWorkflowExecution, ChannelTemplate, ChannelTemplateQuery, CreateChannelTemplatesRequest,
    CreateTemplateRequest, CreatedTemplate, Reply, ScheduleWorkflowRequest, SendAwesomeTemplateRequest,
    SendMessageRequest, Template, TemplateQuery, TriggerBulkWorkflowRequest, TriggerWorkflowRequest,
    UpdateTemplateRequest, User, UserRequest, WebhookConfig, WorkflowExecution, WorkflowSchedule,
};
use siren_core::{Call, RequestExecutor, Result};

use crate::config::ClientConfig;
use crate::transport::{Transport, UreqTransport};

/// Entry point for blocking use.
#[derive(Debug)]
pub struct SirenClient<T: Transport = UreqTransport> {
    executor: RequestExecutor,
    transport: T,
}

impl SirenClient<UreqTransport> {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }

    /// Client configured from `SIREN_API_KEY` and `SIREN_ENV`.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(&ClientConfig::from_env()?))
    }
}

impl<T: Transport> SirenClient<T> {
    pub fn with_transport(config: &ClientConfig, transport: T) -> Self {
        Self {
            executor: config.executor(),
            transport,
        }
    }

    pub fn messages(&self) -> MessageClient<'_, T> {
        MessageClient { client: self }
    }

    pub fn templates(&self) -> TemplateClient<'_, T> {
        TemplateClient { client: self }
    }

    pub fn users(&self) -> UserClient<'_, T> {
        UserClient { client: self }
    }

    pub fn webhooks(&self) -> WebhookClient<'_, T> {
        WebhookClient { client: self }
    }

    pub fn workflows(&self) -> WorkflowClient<'_, T> {
        WorkflowClient { client: self }
    }

    /// Release the transport and its pooled connections.
    pub fn close(self) {
        tracing::debug!("closing client");
    }

    fn run<R: 'static>(&self, call: Call<R>) -> Result<R> {
        let response = self.transport.execute(call.request())?;
        call.finish(response)
    }
}

#[derive(Debug)]
pub struct MessageClient<'a, T: Transport> {
    client: &'a SirenClient<T>,
}

impl<T: Transport> MessageClient<'_, T> {
    /// Returns the id of the accepted message.
    pub fn send(&self, request: &SendMessageRequest) -> Result<String> {
        let exec = &self.client.executor;
        self.client.run(exec.messages().send(request)?)
    }

    pub fn send_awesome_template(&self, request: &SendAwesomeTemplateRequest) -> Result<String> {
        let exec = &self.client.executor;
        self.client.run(exec.messages().send_awesome_template(request)?)
    }

    pub fn status(&self, message_id: &str) -> Result<String> {
        let exec = &self.client.executor;
        self.client.run(exec.messages().status(message_id)?)
    }

    pub fn replies(&self, message_id: &str) -> Result<Vec<Reply>> {
        let exec = &self.client.executor;
        self.client.run(exec.messages().replies(message_id)?)
    }
}

#[derive(Debug)]
pub struct TemplateClient<'a, T: Transport> {
    client: &'a SirenClient<T>,
}

impl<T: Transport> TemplateClient<'_, T> {
    pub fn list(&self, query: &TemplateQuery) -> Result<Vec<Template>> {
        let exec = &self.client.executor;
        self.client.run(exec.templates().list(query)?)
    }

    pub fn create(&self, request: &CreateTemplateRequest) -> Result<CreatedTemplate> {
        let exec = &self.client.executor;
        self.client.run(exec.templates().create(request)?)
    }

    pub fn update(&self, template_id: &str, request: &UpdateTemplateRequest) -> Result<Template> {
        let exec = &self.client.executor;
        self.client.run(exec.templates().update(template_id, request)?)
    }

    pub fn delete(&self, template_id: &str) -> Result<bool> {
        let exec = &self.client.executor;
        self.client.run(exec.templates().delete(template_id)?)
    }

    pub fn publish(&self, template_id: &str) -> Result<Template> {
        let exec = &self.client.executor;
        self.client.run(exec.templates().publish(template_id)?)
    }

    pub fn create_channel_templates(
        &self,
        template_id: &str,
        request: &CreateChannelTemplatesRequest,
    ) -> Result<Vec<ChannelTemplate>> {
        let exec = &self.client.executor;
        self.client
            .run(exec.templates().create_channel_templates(template_id, request)?)
    }

    pub fn channel_templates(&self, version_id: &str, query: &ChannelTemplateQuery) -> Result<Vec<ChannelTemplate>> {
        let exec = &self.client.executor;
        self.client.run(exec.templates().channel_templates(version_id, query)?)
    }
}

#[derive(Debug)]
pub struct UserClient<'a, T: Transport> {
    client: &'a SirenClient<T>,
}

impl<T: Transport> UserClient<'_, T> {
    pub fn add(&self, request: &UserRequest) -> Result<User> {
        let exec = &self.client.executor;
        self.client.run(exec.users().add(request)?)
    }

    pub fn update(&self, unique_id: &str, request: &UserRequest) -> Result<User> {
        let exec = &self.client.executor;
        self.client.run(exec.users().update(unique_id, request)?)
    }

    pub fn delete(&self, unique_id: &str) -> Result<bool> {
        let exec = &self.client.executor;
        self.client.run(exec.users().delete(unique_id)?)
    }
}

#[derive(Debug)]
pub struct WebhookClient<'a, T: Transport> {
    client: &'a SirenClient<T>,
}

impl<T: Transport> WebhookClient<'_, T> {
    pub fn configure_notifications(&self, url: &str) -> Result<WebhookConfig> {
        let exec = &self.client.executor;
        self.client.run(exec.webhooks().configure_notifications(url)?)
    }

    pub fn configure_inbound(&self, url: &str) -> Result<WebhookConfig> {
        let exec = &self.client.executor;
        self.client.run(exec.webhooks().configure_inbound(url)?)
    }
}

#[derive(Debug)]
pub struct WorkflowClient<'a, T: Transport> {
    client: &'a SirenClient<T>,
}

impl<T: Transport> WorkflowClient<'_, T> {
    pub fn trigger(&self, request: &TriggerWorkflowRequest) -> Result<WorkflowExecution> {
        let exec = &self.client.executor;
        self.client.run(exec.workflows().trigger(request)?)
    }

    pub fn trigger_bulk(&self, request: &TriggerBulkWorkflowRequest) -> Result<BulkWorkflowExecution> {
        let exec = &self.client.executor;
        self.client.run(exec.workflows().trigger_bulk(request)?)
    }

    pub fn schedule(&self, request: &ScheduleWorkflowRequest) -> Result<WorkflowSchedule> {
        let exec = &self.client.executor;
        self.client.run(exec.workflows().schedule(request)?)
    }
}
