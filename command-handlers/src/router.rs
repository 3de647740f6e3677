//! Command table and dispatch.

use crate::conversion::ConversionMode;
use crate::flows::Flow;
use crate::parse::{first_arg, parse_amount, parse_query};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use ubot_core::{Handler, HandlerResponse, Message, Result, Transport};

/// A parsed command, ready for its flow.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Ask { query: String },
    Imagine { query: String },
    /// `amount` is `None` when the argument was missing or malformed.
    Convert {
        mode: ConversionMode,
        amount: Option<f64>,
    },
}

/// Turns the text after a prefix into a command; `None` ignores the message.
pub type Parser = fn(&str) -> Option<Command>;

#[derive(Clone)]
pub struct Route {
    pub prefix: String,
    pub parser: Parser,
    pub flow: Arc<dyn Flow>,
}

/// Text after `prefix` when `text` starts with it (ASCII case-insensitive) followed by
/// whitespace or nothing.
pub fn strip_command<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }
    let rest = &text[prefix.len()..];
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() => Some(rest),
        Some(_) => None,
    }
}

pub fn parse_ask(args: &str) -> Option<Command> {
    parse_query(args).map(|query| Command::Ask { query })
}

pub fn parse_imagine(args: &str) -> Option<Command> {
    parse_query(args).map(|query| Command::Imagine { query })
}

pub fn parse_usd(args: &str) -> Option<Command> {
    Some(Command::Convert {
        mode: ConversionMode::Usd,
        amount: first_arg(args).and_then(parse_amount),
    })
}

pub fn parse_ton(args: &str) -> Option<Command> {
    Some(Command::Convert {
        mode: ConversionMode::Ton,
        amount: first_arg(args).and_then(parse_amount),
    })
}

/// `.sol` alone means one SOL.
pub fn parse_sol(args: &str) -> Option<Command> {
    let amount = match first_arg(args) {
        None => Some(1.0),
        Some(token) => parse_amount(token),
    };
    Some(Command::Convert {
        mode: ConversionMode::Sol,
        amount,
    })
}

/// Routes inbound messages by command prefix. Stops the chain once a command is handled.
#[derive(Clone)]
pub struct CommandRouter {
    transport: Arc<dyn Transport>,
    routes: Vec<Route>,
}

impl CommandRouter {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            routes: Vec::new(),
        }
    }

    /// The standard command set.
    pub fn with_default_routes(
        transport: Arc<dyn Transport>,
        answer: Arc<dyn Flow>,
        image: Arc<dyn Flow>,
        crypto: Arc<dyn Flow>,
    ) -> Self {
        Self::new(transport)
            .route(".ai", parse_ask, answer)
            .route(".aigen", parse_imagine, image)
            .route(".usdt", parse_usd, crypto.clone())
            .route(".ton", parse_ton, crypto.clone())
            .route(".sol", parse_sol, crypto)
    }

    /// Longer prefixes are tried first.
    pub fn route(mut self, prefix: impl Into<String>, parser: Parser, flow: Arc<dyn Flow>) -> Self {
        self.routes.push(Route {
            prefix: prefix.into(),
            parser,
            flow,
        });
        self.routes
            .sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
        self
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Matching route and parsed command for `text`, if any.
    pub fn dispatch(&self, text: &str) -> Option<(&Route, Command)> {
        let text = text.trim_start();
        let (route, args) = self
            .routes
            .iter()
            .find_map(|r| strip_command(text, &r.prefix).map(|args| (r, args)))?;
        match (route.parser)(args) {
            Some(command) => Some((route, command)),
            None => {
                debug!(prefix = %route.prefix, "command without arguments ignored");
                None
            }
        }
    }
}

#[async_trait]
impl Handler for CommandRouter {
    #[instrument(skip(self, message), fields(chat_id = message.chat.id, message_id = %message.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let Some((route, command)) = self.dispatch(&message.content) else {
            return Ok(HandlerResponse::Continue);
        };
        info!(prefix = %route.prefix, "step: command accepted");

        let target = self.transport.reply_target(message).await?;
        route.flow.run(&target, command).await?;

        info!(prefix = %route.prefix, "step: command done");
        Ok(HandlerResponse::Stop)
    }
}
