//! Non-blocking facade.
//!
//! Every operation is an `async fn` that suspends while the exchange is
//! outstanding. Dropping the future aborts the request; nothing is retried.
//! No ordering holds between calls issued concurrently, so callers that
//! depend on one (create a template, then publish it) must await in turn.

use siren_core::models::{
    BulkWorkflowExecution, ChannelTemplate, ChannelTemplateQuery, CreateChannelTemplatesRequest,
    CreateTemplateRequest, CreatedTemplate, Reply, ScheduleWorkflowRequest, SendAwesomeTemplateRequest,
    SendMessageRequest, Template, TemplateQuery, TriggerBulkWorkflowRequest, TriggerWorkflowRequest,
    UpdateTemplateRequest, User, UserRequest, WebhookConfig, WorkflowExecution, WorkflowSchedule,
};
use siren_core::{Call, RequestExecutor, Result};

use crate::config::ClientConfig;
use crate::transport::{AsyncTransport, ReqwestTransport};

/// Entry point for async use. Shares one connection pool between all
/// domain clients borrowed from it.
#[derive(Debug)]
pub struct AsyncSirenClient<T: AsyncTransport = ReqwestTransport> {
    executor: RequestExecutor,
    transport: T,
}

impl AsyncSirenClient<ReqwestTransport> {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_transport(config, ReqwestTransport::new()?))
    }

    pub fn from_env() -> Result<Self> {
        Self::new(&ClientConfig::from_env()?)
    }
}

impl<T: AsyncTransport> AsyncSirenClient<T> {
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

    /// Release the connection pool. Outstanding borrows must end first,
    /// which the borrow checker enforces.
    pub async fn close(self) {
        tracing::debug!("closing async client");
    }

    async fn run<R: 'static>(&self, call: Call<R>) -> Result<R> {
        // `Call` is not Sync; no borrow of it may live across the await.
        let request = call.request().clone();
        let response = self.transport.execute(&request).await?;
        call.finish(response)
    }
}

#[derive(Debug)]
pub struct MessageClient<'a, T: AsyncTransport> {
    client: &'a AsyncSirenClient<T>,
}

impl<T: AsyncTransport> MessageClient<'_, T> {
    pub async fn send(&self, request: &SendMessageRequest) -> Result<String> {
        let call = self.client.executor.messages().send(request)?;
        self.client.run(call).await
    }

    pub async fn send_awesome_template(&self, request: &SendAwesomeTemplateRequest) -> Result<String> {
        let call = self.client.executor.messages().send_awesome_template(request)?;
        self.client.run(call).await
    }

    pub async fn status(&self, message_id: &str) -> Result<String> {
        let call = self.client.executor.messages().status(message_id)?;
        self.client.run(call).await
    }

    pub async fn replies(&self, message_id: &str) -> Result<Vec<Reply>> {
        let call = self.client.executor.messages().replies(message_id)?;
        self.client.run(call).await
    }
}

#[derive(Debug)]
pub struct TemplateClient<'a, T: AsyncTransport> {
    client: &'a AsyncSirenClient<T>,
}

impl<T: AsyncTransport> TemplateClient<'_, T> {
    pub async fn list(&self, query: &TemplateQuery) -> Result<Vec<Template>> {
        let call = self.client.executor.templates().list(query)?;
        self.client.run(call).await
    }

    pub async fn create(&self, request: &CreateTemplateRequest) -> Result<CreatedTemplate> {
        let call = self.client.executor.templates().create(request)?;
        self.client.run(call).await
    }

    pub async fn update(&self, template_id: &str, request: &UpdateTemplateRequest) -> Result<Template> {
        let call = self.client.executor.templates().update(template_id, request)?;
        self.client.run(call).await
    }

    pub async fn delete(&self, template_id: &str) -> Result<bool> {
        let call = self.client.executor.templates().delete(template_id)?;
        self.client.run(call).await
    }

    pub async fn publish(&self, template_id: &str) -> Result<Template> {
        let call = self.client.executor.templates().publish(template_id)?;
        self.client.run(call).await
    }

    pub async fn create_channel_templates(
        &self,
        template_id: &str,
        request: &CreateChannelTemplatesRequest,
    ) -> Result<Vec<ChannelTemplate>> {
        let call = self
            .client
            .executor
            .templates()
            .create_channel_templates(template_id, request)?;
        self.client.run(call).await
    }

    pub async fn channel_templates(
        &self,
        version_id: &str,
        query: &ChannelTemplateQuery,
    ) -> Result<Vec<ChannelTemplate>> {
        let call = self.client.executor.templates().channel_templates(version_id, query)?;
        self.client.run(call).await
    }
}

#[derive(Debug)]
pub struct UserClient<'a, T: AsyncTransport> {
    client: &'a AsyncSirenClient<T>,
}

impl<T: AsyncTransport> UserClient<'_, T> {
    pub async fn add(&self, request: &UserRequest) -> Result<User> {
        let call = self.client.executor.users().add(request)?;
        self.client.run(call).await
    }

    pub async fn update(&self, unique_id: &str, request: &UserRequest) -> Result<User> {
        let call = self.client.executor.users().update(unique_id, request)?;
        self.client.run(call).await
    }

    pub async fn delete(&self, unique_id: &str) -> Result<bool> {
        let call = self.client.executor.users().delete(unique_id)?;
        self.client.run(call).await
    }
}

#[derive(Debug)]
pub struct WebhookClient<'a, T: AsyncTransport> {
    client: &'a AsyncSirenClient<T>,
}

impl<T: AsyncTransport> WebhookClient<'_, T> {
    pub async fn configure_notifications(&self, url: &str) -> Result<WebhookConfig> {
        let call = self.client.executor.webhooks().configure_notifications(url)?;
        self.client.run(call).await
    }

    pub async fn configure_inbound(&self, url: &str) -> Result<WebhookConfig> {
        let call = self.client.executor.webhooks().configure_inbound(url)?;
        self.client.run(call).await
    }
}

#[derive(Debug)]
pub struct WorkflowClient<'a, T: AsyncTransport> {
    client: &'a AsyncSirenClient<T>,
}

impl<T: AsyncTransport> WorkflowClient<'_, T> {
    pub async fn trigger(&self, request: &TriggerWorkflowRequest) -> Result<WorkflowExecution> {
        let call = self.client.executor.workflows().trigger(request)?;
        self.client.run(call).await
    }

    /// Uses the longer bulk timeout.
    pub async fn trigger_bulk(&self, request: &TriggerBulkWorkflowRequest) -> Result<BulkWorkflowExecution> {
        let call = self.client.executor.workflows().trigger_bulk(request)?;
        self.client.run(call).await
    }

    pub async fn schedule(&self, request: &ScheduleWorkflowRequest) -> Result<WorkflowSchedule> {
        let call = self.client.executor.workflows().schedule(request)?;
        self.client.run(call).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn futures_and_facade_are_send() {
        fn assert_send<S: Send>(_: &S) {}
        fn assert_send_sync<S: Send + Sync>() {}
        assert_send_sync::<AsyncSirenClient>();

        let config = ClientConfig::builder()
            .api_key("k")
            .build_with(|_| None)
            .unwrap();
        let client = AsyncSirenClient::new(&config).unwrap();
        let messages = client.messages();
        let fut = messages.status("msg_1");
        assert_send(&fut);
    }
}
