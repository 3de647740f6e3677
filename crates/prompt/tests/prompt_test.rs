//! Unit tests for the prompt crate.
//!
//! External interactions: none (pure function tests).

use prompt::{
    build_messages, image_prompt, ChatMessage, MessageRole, ANSWER_SYSTEM_PROMPT,
    TITLED_ANSWER_SYSTEM_PROMPT, TOPIC_MARKER,
};

/// **Test: build_messages returns system then user.**
#[test]
fn build_messages_orders_system_then_user() {
    let messages = build_messages(ANSWER_SYSTEM_PROMPT, "what is rust?");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, MessageRole::System);
    assert_eq!(messages[0].content, ANSWER_SYSTEM_PROMPT);
    assert_eq!(messages[1], ChatMessage::user("what is rust?"));
}

/// **Test: The titled prompt asks for the topic marker the renderer looks for.**
#[test]
fn titled_prompt_mentions_topic_marker() {
    assert!(TITLED_ANSWER_SYSTEM_PROMPT.contains(TOPIC_MARKER));
    assert!(!ANSWER_SYSTEM_PROMPT.contains(TOPIC_MARKER));
}

/// **Test: image_prompt prefers the topic and falls back to the query when the topic is blank.**
#[test]
fn image_prompt_prefers_topic() {
    assert!(image_prompt(Some("Кошки"), "расскажи о кошках").contains("Кошки"));
    let fallback = image_prompt(Some("  "), " расскажи о кошках ");
    assert!(fallback.contains("for: расскажи о кошках."));
    assert!(image_prompt(None, "dogs").contains("dogs"));
}
