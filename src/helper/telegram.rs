//! Telegram client using teloxide.

use std::time::Duration;

use teloxide::prelude::*;
use teloxide::types::MessageId;
use tracing::{debug, warn};

use crate::helper::typing::{format_steps, Typewriter};

/// How replies are delivered.
#[derive(Debug, Clone, Copy)]
pub enum Delivery {
    /// One plain message.
    Plain,
    /// Send the first frame, then edit it until the whole reply is shown.
    Animated {
        frame_interval: Duration,
        words_per_frame: usize,
    },
}

/// Telegram API client.
pub struct TelegramClient {
    bot: Bot,
}

impl TelegramClient {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    /// Send a plain-text message. Replies contain `<branch>` style
    /// placeholders, so no parse mode is set.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<i64, String> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .await
            .map(|msg| msg.id.0 as i64)
            .map_err(|e| {
                let msg = format!("Failed to send: {e}");
                warn!("{}", msg);
                msg
            })
    }

    pub async fn edit_message(&self, chat_id: i64, message_id: i64, text: &str) -> Result<(), String> {
        self.bot
            .edit_message_text(ChatId(chat_id), MessageId(message_id as i32), text)
            .await
            .map(|_| ())
            .map_err(|e| {
                let msg = format!("Failed to edit message {message_id}: {e}");
                warn!("{}", msg);
                msg
            })
    }

    /// Deliver a reply. Returns the id of the message holding it.
    pub async fn deliver(&self, chat_id: i64, text: &str, delivery: Delivery) -> Result<i64, String> {
        match delivery {
            Delivery::Plain => self.send_message(chat_id, text).await,
            Delivery::Animated {
                frame_interval,
                words_per_frame,
            } => self.send_animated(chat_id, text, frame_interval, words_per_frame).await,
        }
    }

    async fn send_animated(
        &self,
        chat_id: i64,
        text: &str,
        frame_interval: Duration,
        words_per_frame: usize,
    ) -> Result<i64, String> {
        let mut ticker = tokio::time::interval(frame_interval);
        let mut message_id = None;
        let mut shown = String::new();

        for frame in Typewriter::with_words_per_frame(text, words_per_frame) {
            ticker.tick().await;
            match message_id {
                None => message_id = Some(self.send_message(chat_id, &frame).await?),
                Some(id) => self.edit_message(chat_id, id, &frame).await?,
            }
            shown = frame;
        }

        let final_text = format_steps(text);
        let Some(id) = message_id else {
            return self.send_message(chat_id, &final_text).await;
        };

        // Telegram rejects edits that leave the text unchanged.
        if final_text.trim() != shown.trim() {
            ticker.tick().await;
            self.edit_message(chat_id, id, &final_text).await?;
        }
        debug!("Animated reply {} in chat {} complete", id, chat_id);
        Ok(id)
    }
}
