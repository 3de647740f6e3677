//! # Handler chain
//!
//! Runs middleware (before/after) around an ordered list of handlers for each inbound message.
//! Middleware can stop the chain; the first handler that returns Stop ends handler execution;
//! middleware `after` callbacks run in reverse order with the final response.

use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use ubot_core::{Handler, HandlerResponse, Message, Middleware, Result};

/// Middleware run in order (before), then handlers; middleware after run in reverse order.
#[derive(Clone, Default)]
pub struct HandlerChain {
    middleware: Vec<Arc<dyn Middleware>>,
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    /// Creates an empty chain (no middleware, no handlers).
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a middleware (runs before handlers, after in reverse).
    pub fn add_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Appends a handler (runs in order; first Stop ends handler phase).
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Runs middleware before, then handlers, then middleware after in reverse.
    ///
    /// Returns Stop if a middleware or handler stopped the chain, otherwise Continue. A failing
    /// handler still gets the `after` pass (with Stop) before its error is returned; `after`
    /// failures are logged only.
    #[instrument(skip(self, message), fields(chat_id = message.chat.id, message_id = %message.id))]
    pub async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        for mw in &self.middleware {
            if !mw.before(message).await? {
                debug!(
                    user_id = message.user.id,
                    middleware = %std::any::type_name_of_val(mw.as_ref()),
                    "step: middleware before returned false, chain stopped"
                );
                return Ok(HandlerResponse::Stop);
            }
        }

        let outcome = self.run_handlers(message).await;
        let response = match &outcome {
            Ok(response) => response.clone(),
            Err(e) => {
                error!(user_id = message.user.id, error = %e, "step: handler failed");
                HandlerResponse::Stop
            }
        };

        for mw in self.middleware.iter().rev() {
            if let Err(e) = mw.after(message, &response).await {
                warn!(
                    middleware = %std::any::type_name_of_val(mw.as_ref()),
                    error = %e,
                    "middleware after failed"
                );
            }
        }

        outcome
    }

    /// Handlers in order until the first Stop.
    async fn run_handlers(&self, message: &Message) -> Result<HandlerResponse> {
        for handler in &self.handlers {
            let handler_name = std::any::type_name_of_val(handler.as_ref());
            match handler.handle(message).await? {
                HandlerResponse::Stop => {
                    info!(handler = %handler_name, "step: handled");
                    return Ok(HandlerResponse::Stop);
                }
                response => debug!(handler = %handler_name, ?response, "step: passed on"),
            }
        }
        Ok(HandlerResponse::Continue)
    }
}
