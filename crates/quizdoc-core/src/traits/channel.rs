// SPDX-FileCopyrightText: 2026 Quizdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for messaging platform integrations.

use async_trait::async_trait;

use crate::error::QuizdocError;
use crate::types::{Artifact, ConversationId, InboundEvent};

/// Adapter for a bidirectional messaging channel.
///
/// A channel adapter turns platform messages into transport-agnostic
/// [`InboundEvent`]s and carries acknowledgments and built documents back to
/// the conversation.
#[async_trait]
pub trait ChannelAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this channel.
    fn name(&self) -> &str;

    /// Establishes the connection to the messaging platform.
    async fn connect(&mut self) -> Result<(), QuizdocError>;

    /// Sends a user-facing text message to the conversation.
    async fn notify(&self, conversation: ConversationId, text: &str) -> Result<(), QuizdocError>;

    /// Uploads a built document to the conversation.
    async fn deliver(
        &self,
        conversation: ConversationId,
        artifact: Artifact,
    ) -> Result<(), QuizdocError>;

    /// Receives the next inbound event from the channel.
    async fn receive(&self) -> Result<InboundEvent, QuizdocError>;
}
