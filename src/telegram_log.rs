//! Forwards log events to a Telegram chat.
//!
//! WARN/ERROR lines are sent as they happen; INFO lines are batched and
//! flushed periodically or when the batch is full.

use std::time::Duration;

use teloxide::prelude::*;
use teloxide::types::ChatId;
use tokio::sync::mpsc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

const FLUSH_INTERVAL: Duration = Duration::from_secs(5);
const MAX_BATCH_LINES: usize = 50;
/// Telegram rejects messages longer than 4096 chars.
const MAX_MESSAGE_CHARS: usize = 4000;

enum LogLine {
    Urgent(String),
    Batched(String),
}

pub struct TelegramLogLayer {
    tx: mpsc::UnboundedSender<LogLine>,
}

impl TelegramLogLayer {
    /// Must be called inside a tokio runtime.
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(forward(bot, chat_id, rx));
        Self { tx }
    }
}

async fn forward(bot: Bot, chat_id: ChatId, mut rx: mpsc::UnboundedReceiver<LogLine>) {
    let mut batch: Vec<String> = Vec::new();
    let mut ticker = tokio::time::interval(FLUSH_INTERVAL);

    loop {
        tokio::select! {
            line = rx.recv() => match line {
                Some(LogLine::Urgent(text)) => post(&bot, chat_id, &text).await,
                Some(LogLine::Batched(text)) => {
                    batch.push(text);
                    if batch.len() >= MAX_BATCH_LINES {
                        post(&bot, chat_id, &batch.join("\n")).await;
                        batch.clear();
                    }
                }
                None => break,
            },
            _ = ticker.tick() => {
                if !batch.is_empty() {
                    post(&bot, chat_id, &batch.join("\n")).await;
                    batch.clear();
                }
            }
        }
    }
}

async fn post(bot: &Bot, chat_id: ChatId, text: &str) {
    let text = clip(text);
    // eprintln: logging here through tracing would loop back into this layer
    if let Err(e) = bot.send_message(chat_id, text).await {
        eprintln!("Failed to forward log to Telegram: {e}");
    }
}

fn clip(text: &str) -> String {
    if text.chars().count() <= MAX_MESSAGE_CHARS {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(MAX_MESSAGE_CHARS).collect();
    clipped.push_str("...");
    clipped
}

#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: Vec<String>,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}

impl LineVisitor {
    fn into_line(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields.join(" "),
            (false, false) => format!("{} {}", self.message, self.fields.join(" ")),
        }
    }
}

impl<S: Subscriber> Layer<S> for TelegramLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let level = *meta.level();
        if level > Level::INFO {
            return;
        }

        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);
        let line = visitor.into_line();

        let line = match level {
            Level::ERROR => LogLine::Urgent(format!("❌ [{}] {}", meta.target(), line)),
            Level::WARN => LogLine::Urgent(format!("⚠️ [{}] {}", meta.target(), line)),
            _ => LogLine::Batched(line),
        };

        if self.tx.send(line).is_err() {
            eprintln!("Log channel closed, line dropped");
        }
    }
}
