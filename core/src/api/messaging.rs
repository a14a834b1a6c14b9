use crate::endpoint::{segment, Endpoint, V1_PREFIX};
use crate::error::Result;
use crate::executor::{Call, RequestExecutor};
use crate::models::{MessageReceipt, MessageStatus, Reply, SendAwesomeTemplateRequest, SendMessageRequest};

/// Sending messages and following up on them.
#[derive(Debug, Clone, Copy)]
pub struct MessageCalls<'a> {
    exec: &'a RequestExecutor,
}

impl<'a> MessageCalls<'a> {
    pub fn new(exec: &'a RequestExecutor) -> Self {
        Self { exec }
    }

    /// Send a direct-body or template message. Resolves to the message id.
    pub fn send(&self, request: &SendMessageRequest) -> Result<Call<String>> {
        let endpoint = Endpoint::post(format!("{V1_PREFIX}/send-messages"));
        Ok(self
            .exec
            .prepare::<_, MessageReceipt>(endpoint, Some(request))?
            .map(|receipt| receipt.message_id))
    }

    /// Send a message rendered from a template in the shared template
    /// library, addressed by its path.
    pub fn send_awesome_template(&self, request: &SendAwesomeTemplateRequest) -> Result<Call<String>> {
        let endpoint = Endpoint::post(format!("{V1_PREFIX}/send-awesome-messages"));
        Ok(self
            .exec
            .prepare::<_, MessageReceipt>(endpoint, Some(request))?
            .map(|receipt| receipt.message_id))
    }

    pub fn status(&self, message_id: &str) -> Result<Call<String>> {
        let endpoint = Endpoint::get(format!("{V1_PREFIX}/message-status/{}", segment(message_id)));
        Ok(self
            .exec
            .prepare_empty::<MessageStatus>(endpoint)?
            .map(|status| status.status))
    }

    pub fn replies(&self, message_id: &str) -> Result<Call<Vec<Reply>>> {
        let endpoint = Endpoint::get(format!("{V1_PREFIX}/get-reply/{}", segment(message_id)));
        self.exec.prepare_empty(endpoint)
    }
}
