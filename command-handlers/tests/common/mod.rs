#![allow(dead_code)]

use anyhow::anyhow;
use async_trait::async_trait;
use command_handlers::{AiAnswerFlow, AiImageFlow, CommandRouter, CryptoFlow};
use futures::stream;
use image_generation_client::ImageGenerator;
use llm_client::{FragmentStream, LlmClient};
use price_client::{PriceTicker, TON_SYMBOL};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use ubot_core::{
    Chat, EditOutcome, Message, MessageDirection, MessageRef, Result, Span, Transport, UbotError,
    User,
};

pub const CHAT_ID: i64 = 500;
pub const OWNER_ID: i64 = 1;

pub fn message(text: &str) -> Message {
    Message {
        id: "10".to_string(),
        user: User {
            id: OWNER_ID,
            username: Some("owner".to_string()),
            first_name: None,
            last_name: None,
        },
        chat: Chat {
            id: CHAT_ID,
            chat_type: "private".to_string(),
        },
        content: text.to_string(),
        message_type: "text".to_string(),
        direction: MessageDirection::Incoming,
        created_at: chrono::Utc::now(),
        reply_to_message_id: None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ReplyTarget,
    Edit { text: String, spans: Vec<Span> },
    EditMedia { photo: PathBuf, caption: String },
    SendPhoto { chat_id: i64, caption: String },
    Delete { message_id: String },
}

#[derive(Default)]
pub struct MockTransport {
    pub calls: Mutex<Vec<Call>>,
    pub fail_edit_media: bool,
}

impl MockTransport {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn edits(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Edit { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn last_edit(&self) -> Option<(String, Vec<Span>)> {
        self.calls().into_iter().rev().find_map(|c| match c {
            Call::Edit { text, spans } => Some((text, spans)),
            _ => None,
        })
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn reply_target(&self, message: &Message) -> Result<MessageRef> {
        self.record(Call::ReplyTarget);
        Ok(MessageRef {
            chat_id: message.chat.id,
            message_id: "100".to_string(),
        })
    }

    async fn edit_text(&self, _target: &MessageRef, text: &str, spans: &[Span]) -> Result<EditOutcome> {
        self.record(Call::Edit {
            text: text.to_string(),
            spans: spans.to_vec(),
        });
        Ok(EditOutcome::Edited)
    }

    async fn edit_media(&self, _target: &MessageRef, photo: &Path, caption: &str, _spans: &[Span]) -> Result<()> {
        self.record(Call::EditMedia {
            photo: photo.to_path_buf(),
            caption: caption.to_string(),
        });
        if self.fail_edit_media {
            return Err(UbotError::Bot("there is no media in the message to edit".to_string()));
        }
        Ok(())
    }

    async fn send_photo(&self, chat_id: i64, _photo: &Path, caption: &str, _spans: &[Span]) -> Result<MessageRef> {
        self.record(Call::SendPhoto {
            chat_id,
            caption: caption.to_string(),
        });
        Ok(MessageRef {
            chat_id,
            message_id: "101".to_string(),
        })
    }

    async fn delete_message(&self, target: &MessageRef) -> Result<()> {
        self.record(Call::Delete {
            message_id: target.message_id.clone(),
        });
        Ok(())
    }
}

pub struct MockLlm {
    pub model: String,
    pub fragments: Vec<String>,
    pub fail_open: bool,
    pub system_prompts: Mutex<Vec<String>>,
}

impl MockLlm {
    pub fn answering(fragments: &[&str]) -> Self {
        Self {
            model: "qwen/qwen3-coder-plus".to_string(),
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            fail_open: false,
            system_prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            fail_open: true,
            ..Self::answering(&[])
        }
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn chat_stream(
        &self,
        system_prompt: &str,
        _user_prompt: &str,
        _max_tokens: u32,
    ) -> anyhow::Result<FragmentStream> {
        self.system_prompts
            .lock()
            .unwrap()
            .push(system_prompt.to_string());
        if self.fail_open {
            return Err(anyhow!("connection refused"));
        }
        let items: Vec<anyhow::Result<String>> = self.fragments.iter().cloned().map(Ok).collect();
        Ok(Box::pin(stream::iter(items)))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Fails `failures` times, then returns `photo`.
pub struct MockImages {
    failures: usize,
    photo: PathBuf,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl MockImages {
    pub fn new(failures: usize, photo: PathBuf) -> Self {
        Self {
            failures,
            photo,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageGenerator for MockImages {
    async fn generate_image(&self, prompt: &str) -> anyhow::Result<PathBuf> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            return Err(anyhow!("No image URL in response"));
        }
        Ok(self.photo.clone())
    }
}

pub struct MockPrices {
    pub ton: Option<f64>,
    pub sol: Option<f64>,
    pub calls: AtomicUsize,
}

impl MockPrices {
    pub fn new(ton: Option<f64>, sol: Option<f64>) -> Self {
        Self {
            ton,
            sol,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PriceTicker for MockPrices {
    async fn get_price(&self, symbol: &str) -> Option<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if symbol == TON_SYMBOL {
            self.ton
        } else {
            self.sol
        }
    }
}

pub struct Harness {
    pub transport: Arc<MockTransport>,
    pub llm: Arc<MockLlm>,
    pub images: Arc<MockImages>,
    pub prices: Arc<MockPrices>,
    pub router: CommandRouter,
}

pub fn harness(
    transport: MockTransport,
    llm: MockLlm,
    images: MockImages,
    prices: MockPrices,
) -> Harness {
    let transport = Arc::new(transport);
    let llm = Arc::new(llm);
    let images = Arc::new(images);
    let prices = Arc::new(prices);

    let answer = Arc::new(AiAnswerFlow::new(
        transport.clone(),
        llm.clone(),
        256,
        Duration::from_secs(3),
    ));
    let image = Arc::new(AiImageFlow::new(answer.clone(), images.clone()));
    let crypto = Arc::new(CryptoFlow::new(transport.clone(), prices.clone(), "Th3ryks"));
    let router = CommandRouter::with_default_routes(transport.clone(), answer, image, crypto);

    Harness {
        transport,
        llm,
        images,
        prices,
        router,
    }
}

pub fn crypto_harness(ton: Option<f64>, sol: Option<f64>) -> Harness {
    harness(
        MockTransport::default(),
        MockLlm::answering(&[]),
        MockImages::new(0, PathBuf::from("unused.png")),
        MockPrices::new(ton, sol),
    )
}
