//! Integration tests for [`handler_chain::HandlerChain`].
//!
//! Covers: middleware before/after order, middleware stopping the chain, Stop ending the handler
//! phase, Continue passing to the next handler, and the after pass on handler failure.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;
use handler_chain::HandlerChain;
use ubot_core::{
    Chat, Handler, HandlerError, HandlerResponse, Message, MessageDirection, Middleware, UbotError,
    User,
};

fn create_test_message(content: &str) -> Message {
    Message {
        id: "test_message_id".to_string(),
        content: content.to_string(),
        user: User {
            id: 123,
            username: Some("test_user".to_string()),
            first_name: Some("Test".to_string()),
            last_name: None,
        },
        chat: Chat {
            id: 456,
            chat_type: "private".to_string(),
        },
        message_type: "text".to_string(),
        direction: MessageDirection::Outgoing,
        created_at: Utc::now(),
        reply_to_message_id: None,
    }
}

/// **Test: Middleware before and after run once; handler runs once.**
///
/// **Expected:** before_count=1, handle_count=1, after_count=1; response is Continue.
#[tokio::test]
async fn test_handler_chain_with_middleware() {
    let before_count = Arc::new(AtomicUsize::new(0));
    let after_count = Arc::new(AtomicUsize::new(0));
    let handle_count = Arc::new(AtomicUsize::new(0));

    let chain = HandlerChain::new()
        .add_middleware(Arc::new(CountingMiddleware {
            before_count: before_count.clone(),
            after_count: after_count.clone(),
        }))
        .add_handler(Arc::new(CountingHandler {
            handle_count: handle_count.clone(),
            response: HandlerResponse::Continue,
        }));

    let result = chain.handle(&create_test_message("test")).await.unwrap();

    assert_eq!(result, HandlerResponse::Continue);
    assert_eq!(before_count.load(Ordering::SeqCst), 1);
    assert_eq!(handle_count.load(Ordering::SeqCst), 1);
    assert_eq!(after_count.load(Ordering::SeqCst), 1);
}

/// **Test: Middleware before returning false stops the chain; no handler runs.**
///
/// **Expected:** result is Stop; handle_count=0.
#[tokio::test]
async fn test_middleware_stops_chain() {
    struct BlockingMiddleware;

    #[async_trait::async_trait]
    impl Middleware for BlockingMiddleware {
        async fn before(&self, _message: &Message) -> ubot_core::Result<bool> {
            Ok(false)
        }
    }

    let handle_count = Arc::new(AtomicUsize::new(0));
    let chain = HandlerChain::new()
        .add_middleware(Arc::new(BlockingMiddleware))
        .add_handler(Arc::new(CountingHandler {
            handle_count: handle_count.clone(),
            response: HandlerResponse::Continue,
        }));

    let result = chain.handle(&create_test_message("test")).await.unwrap();

    assert_eq!(result, HandlerResponse::Stop);
    assert_eq!(handle_count.load(Ordering::SeqCst), 0);
}

/// **Test: A handler returning Stop ends the handler phase; later handlers do not run.**
///
/// **Expected:** result is Stop; first handler ran, second did not; middleware after saw Stop.
#[tokio::test]
async fn test_stop_ends_handler_phase() {
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let seen_stop = Arc::new(AtomicUsize::new(0));

    struct StopObserver {
        seen_stop: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl Middleware for StopObserver {
        async fn after(
            &self,
            _message: &Message,
            response: &HandlerResponse,
        ) -> ubot_core::Result<()> {
            if *response == HandlerResponse::Stop {
                self.seen_stop.fetch_add(1, Ordering::SeqCst);
            }
            Ok(())
        }
    }

    let chain = HandlerChain::new()
        .add_middleware(Arc::new(StopObserver {
            seen_stop: seen_stop.clone(),
        }))
        .add_handler(Arc::new(CountingHandler {
            handle_count: first.clone(),
            response: HandlerResponse::Stop,
        }))
        .add_handler(Arc::new(CountingHandler {
            handle_count: second.clone(),
            response: HandlerResponse::Continue,
        }));

    let result = chain.handle(&create_test_message(".ai hi")).await.unwrap();

    assert_eq!(result, HandlerResponse::Stop);
    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 0);
    assert_eq!(seen_stop.load(Ordering::SeqCst), 1);
}

/// **Test: Continue passes to the next handler.**
#[tokio::test]
async fn test_continue_passes_to_next_handler() {
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));

    let chain = HandlerChain::new()
        .add_handler(Arc::new(CountingHandler {
            handle_count: first.clone(),
            response: HandlerResponse::Continue,
        }))
        .add_handler(Arc::new(CountingHandler {
            handle_count: second.clone(),
            response: HandlerResponse::Stop,
        }));

    let result = chain.handle(&create_test_message("x")).await.unwrap();

    assert_eq!(result, HandlerResponse::Stop);
    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 1);
}

/// **Test: Multiple middleware run before in order, after in reverse.**
#[tokio::test]
async fn test_multiple_middleware_executed_in_order() {
    let order = Arc::new(std::sync::Mutex::new(Vec::new()));

    struct OrderMiddleware {
        name: String,
        order: Arc<std::sync::Mutex<Vec<String>>>,
    }

    #[async_trait::async_trait]
    impl Middleware for OrderMiddleware {
        async fn before(&self, _message: &Message) -> ubot_core::Result<bool> {
            self.order.lock().unwrap().push(format!("before_{}", self.name));
            Ok(true)
        }

        async fn after(
            &self,
            _message: &Message,
            _response: &HandlerResponse,
        ) -> ubot_core::Result<()> {
            self.order.lock().unwrap().push(format!("after_{}", self.name));
            Ok(())
        }
    }

    let chain = HandlerChain::new()
        .add_middleware(Arc::new(OrderMiddleware {
            name: "first".to_string(),
            order: order.clone(),
        }))
        .add_middleware(Arc::new(OrderMiddleware {
            name: "second".to_string(),
            order: order.clone(),
        }));

    chain.handle(&create_test_message("test")).await.unwrap();

    let executed = order.lock().unwrap();
    assert_eq!(
        *executed,
        vec!["before_first", "before_second", "after_second", "after_first"]
    );
}

/// **Test: A failing handler still gets the after pass.**
///
/// **Expected:** the error is returned; after ran once and saw Stop; later handlers did not run.
#[tokio::test]
async fn test_failing_handler_runs_after_and_returns_error() {
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let handle_count = Arc::new(AtomicUsize::new(0));

    let chain = HandlerChain::new()
        .add_middleware(Arc::new(ResponseRecorder { seen: seen.clone() }))
        .add_handler(Arc::new(FailingHandler))
        .add_handler(Arc::new(CountingHandler {
            handle_count: handle_count.clone(),
            response: HandlerResponse::Stop,
        }));

    let result = chain.handle(&create_test_message(".ai why")).await;

    assert!(matches!(
        result,
        Err(UbotError::Handler(HandlerError::InvalidCommand(_)))
    ));
    assert_eq!(*seen.lock().unwrap(), vec![HandlerResponse::Stop]);
    assert_eq!(handle_count.load(Ordering::SeqCst), 0);
}

/// **Test: An after failure is logged, not returned.**
///
/// **Expected:** the handler's response comes back unchanged.
#[tokio::test]
async fn test_after_failure_does_not_fail_chain() {
    let chain = HandlerChain::new()
        .add_middleware(Arc::new(FailingAfter))
        .add_handler(Arc::new(CountingHandler {
            handle_count: Arc::new(AtomicUsize::new(0)),
            response: HandlerResponse::Stop,
        }));

    let result = chain.handle(&create_test_message("test")).await.unwrap();

    assert_eq!(result, HandlerResponse::Stop);
}

// --- Helpers used by tests ---

struct ResponseRecorder {
    seen: Arc<std::sync::Mutex<Vec<HandlerResponse>>>,
}

#[async_trait::async_trait]
impl Middleware for ResponseRecorder {
    async fn after(&self, _message: &Message, response: &HandlerResponse) -> ubot_core::Result<()> {
        self.seen.lock().unwrap().push(response.clone());
        Ok(())
    }
}

struct FailingAfter;

#[async_trait::async_trait]
impl Middleware for FailingAfter {
    async fn after(&self, _message: &Message, _response: &HandlerResponse) -> ubot_core::Result<()> {
        Err(UbotError::Bot("log sink closed".to_string()))
    }
}

struct FailingHandler;

#[async_trait::async_trait]
impl Handler for FailingHandler {
    async fn handle(&self, _message: &Message) -> ubot_core::Result<HandlerResponse> {
        Err(HandlerError::InvalidCommand(".ai".to_string()).into())
    }
}

struct CountingMiddleware {
    before_count: Arc<AtomicUsize>,
    after_count: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl Middleware for CountingMiddleware {
    async fn before(&self, _message: &Message) -> ubot_core::Result<bool> {
        self.before_count.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }

    async fn after(&self, _message: &Message, _response: &HandlerResponse) -> ubot_core::Result<()> {
        self.after_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct CountingHandler {
    handle_count: Arc<AtomicUsize>,
    response: HandlerResponse,
}

#[async_trait::async_trait]
impl Handler for CountingHandler {
    async fn handle(&self, _message: &Message) -> ubot_core::Result<HandlerResponse> {
        self.handle_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}
