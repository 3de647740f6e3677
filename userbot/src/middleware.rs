//! Middlewares for logging and owner-only access.

use async_trait::async_trait;
use tracing::{debug, info, instrument};
use ubot_core::{HandlerResponse, Message, Middleware, Result};

/// Logs each message in before() and the response in after(); always continues.
pub struct LoggingMiddleware;

#[async_trait]
impl Middleware for LoggingMiddleware {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &Message) -> Result<bool> {
        info!(
            user_id = message.user.id,
            chat_id = message.chat.id,
            username = %message.user.username.as_deref().unwrap_or("unknown"),
            message_content = %message.content,
            "Received message"
        );
        Ok(true)
    }

    #[instrument(skip(self, message, response))]
    async fn after(&self, message: &Message, response: &HandlerResponse) -> Result<()> {
        debug!(
            message_id = ?message.id,
            response = ?response,
            "Processed message"
        );
        Ok(())
    }
}

/// Lets only the owner's messages through. Everyone else is ignored without a reply.
pub struct OwnerMiddleware {
    owner_user_id: i64,
}

impl OwnerMiddleware {
    pub fn new(owner_user_id: i64) -> Self {
        Self { owner_user_id }
    }
}

#[async_trait]
impl Middleware for OwnerMiddleware {
    async fn before(&self, message: &Message) -> Result<bool> {
        if message.user.id == self.owner_user_id {
            Ok(true)
        } else {
            debug!(user_id = message.user.id, "message from non-owner ignored");
            Ok(false)
        }
    }
}
