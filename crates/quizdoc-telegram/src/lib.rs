// SPDX-FileCopyrightText: 2026 Quizdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for the Quizdoc collector bot.
//!
//! Implements [`ChannelAdapter`] for the Telegram Bot API via teloxide,
//! providing long polling, event extraction, and document upload from
//! memory.

pub mod handler;

use std::sync::Arc;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InputFile, Recipient};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use quizdoc_config::model::TelegramConfig;
use quizdoc_core::error::QuizdocError;
use quizdoc_core::traits::channel::ChannelAdapter;
use quizdoc_core::types::{Artifact, ConversationId, InboundEvent};

/// Telegram channel adapter implementing [`ChannelAdapter`].
///
/// Connects to Telegram via long polling, filters messages by the
/// allowlist, and forwards extracted events over an internal buffer that
/// `receive()` drains.
pub struct TelegramChannel {
    bot: Bot,
    config: TelegramConfig,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundEvent>>,
    inbound_tx: mpsc::Sender<InboundEvent>,
    polling_handle: Option<tokio::task::JoinHandle<()>>,
}

impl TelegramChannel {
    /// Creates a new Telegram channel adapter.
    ///
    /// Requires `config.bot_token` to be set.
    pub fn new(config: TelegramConfig) -> Result<Self, QuizdocError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            QuizdocError::Config("telegram.bot_token is required for the Telegram channel".into())
        })?;

        if token.is_empty() {
            return Err(QuizdocError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let bot = Bot::new(token);
        let (inbound_tx, inbound_rx) = mpsc::channel(100);

        Ok(Self {
            bot,
            config,
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling_handle: None,
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn connect(&mut self) -> Result<(), QuizdocError> {
        if self.polling_handle.is_some() {
            return Ok(()); // Already connected
        }

        let bot = self.bot.clone();
        let tx = self.inbound_tx.clone();
        let allowed_users: Arc<Vec<String>> = Arc::new(self.config.allowed_users.clone());

        info!("starting Telegram long polling");

        let handle = tokio::spawn(async move {
            let handler = Update::filter_message().endpoint(move |msg: Message| {
                let tx = tx.clone();
                let allowed = allowed_users.clone();
                async move {
                    if !handler::is_authorized(&msg, &allowed) {
                        debug!(chat_id = msg.chat.id.0, "ignoring unauthorized user");
                        return respond(());
                    }

                    if let Some(event) = handler::extract_event(&msg) {
                        if tx.send(event).await.is_err() {
                            warn!("inbound buffer closed, dropping event");
                        }
                    }

                    respond(())
                }
            });

            Dispatcher::builder(bot, handler)
                .default_handler(|_| async {}) // Silently ignore non-message updates
                .build()
                .dispatch()
                .await;
        });

        self.polling_handle = Some(handle);
        Ok(())
    }

    async fn notify(&self, conversation: ConversationId, text: &str) -> Result<(), QuizdocError> {
        self.bot
            .send_message(Recipient::Id(ChatId(conversation.0)), text)
            .await
            .map_err(|e| QuizdocError::Channel {
                message: format!("failed to send message: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(())
    }

    async fn deliver(
        &self,
        conversation: ConversationId,
        artifact: Artifact,
    ) -> Result<(), QuizdocError> {
        let document = InputFile::memory(artifact.bytes).file_name(artifact.file_name);
        self.bot
            .send_document(Recipient::Id(ChatId(conversation.0)), document)
            .await
            .map_err(|e| QuizdocError::Channel {
                message: format!("failed to send document: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(())
    }

    async fn receive(&self) -> Result<InboundEvent, QuizdocError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv().await.ok_or_else(|| QuizdocError::Channel {
            message: "Telegram inbound buffer closed".into(),
            source: None,
        })
    }
}

impl Drop for TelegramChannel {
    fn drop(&mut self) {
        if let Some(handle) = self.polling_handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_token(token: Option<&str>) -> TelegramConfig {
        TelegramConfig {
            bot_token: token.map(String::from),
            allowed_users: vec![],
        }
    }

    #[test]
    fn new_refuses_missing_or_empty_token() {
        assert!(matches!(
            TelegramChannel::new(config_with_token(None)),
            Err(QuizdocError::Config(_))
        ));
        assert!(matches!(
            TelegramChannel::new(config_with_token(Some(""))),
            Err(QuizdocError::Config(_))
        ));
    }

    #[test]
    fn new_with_token_builds_a_named_channel() {
        let channel =
            TelegramChannel::new(config_with_token(Some("42:quiz-collector-secret"))).unwrap();
        assert_eq!(channel.name(), "telegram");
    }
}
