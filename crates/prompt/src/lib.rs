//! # Prompt
//!
//! Chat message roles and the fixed prompt texts the AI commands send to the model.
//!
//! ## Prompts
//!
//! - [`ANSWER_SYSTEM_PROMPT`]: direct, self-contained answer with natural emoji use.
//! - [`TITLED_ANSWER_SYSTEM_PROMPT`]: same, but the first line must be `Тема: <title>` so the
//!   renderer can switch to the titled layout as soon as that line is complete.
//!
//! ## External interactions
//!
//! - **AI models**: messages are sent to OpenAI-compatible chat completion APIs.

/// Role of a message, one-to-one with OpenAI Chat Completions API `role` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    /// System instruction (API `role: "system"`).
    System,
    /// User message (API `role: "user"`).
    User,
}

/// A single chat message, one-to-one with one element of OpenAI `messages` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Prefix of the line that carries the answer title.
pub const TOPIC_MARKER: &str = "Тема:";

/// System instruction for plain answers.
pub const ANSWER_SYSTEM_PROMPT: &str = "Answer the user's question directly. Do NOT include greetings or goodbyes. \
Use emojis naturally in the content. \
Do NOT add suggestions, calls to action, or phrases inviting the user to ask for more details. \
Avoid disclaimers and meta-commentary. Provide a concise, self-contained answer only.";

/// System instruction for answers that open with a title line.
pub const TITLED_ANSWER_SYSTEM_PROMPT: &str = "Start your reply with exactly one line of the form \
`Тема: <short title in the language of the question>` followed by a line break, then the answer. \
Answer the user's question directly. Do NOT include greetings or goodbyes. \
Use emojis naturally in the content. \
Do NOT add suggestions, calls to action, or phrases inviting the user to ask for more details. \
Avoid disclaimers and meta-commentary. Provide a concise, self-contained answer only.";

/// Builds the `[system, user]` message pair for one request.
pub fn build_messages(system_prompt: &str, user_prompt: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(system_prompt),
        ChatMessage::user(user_prompt),
    ]
}

/// Image prompt for a generated answer: prefers the answer title, falls back to the raw query.
pub fn image_prompt(topic: Option<&str>, query: &str) -> String {
    let subject = topic
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| query.trim());
    format!("An illustration for: {}. No text or letters in the image.", subject)
}
