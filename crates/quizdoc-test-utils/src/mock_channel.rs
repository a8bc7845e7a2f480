// SPDX-FileCopyrightText: 2026 Quizdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel adapter for deterministic testing.
//!
//! `MockChannel` implements `ChannelAdapter` with injectable inbound events
//! and captured notifications and deliveries for assertion in tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use quizdoc_core::error::QuizdocError;
use quizdoc_core::traits::channel::ChannelAdapter;
use quizdoc_core::types::{Artifact, ConversationId, InboundEvent};

/// A mock messaging channel for testing.
///
/// Provides three queues:
/// - **inbound**: Events injected via `inject_event()` are returned by `receive()`
/// - **notifications**: Texts passed to `notify()` are captured per call
/// - **deliveries**: Artifacts passed to `deliver()` are captured per call
#[derive(Default)]
pub struct MockChannel {
    inbound: Arc<Mutex<VecDeque<InboundEvent>>>,
    notifications: Arc<Mutex<Vec<(ConversationId, String)>>>,
    deliveries: Arc<Mutex<Vec<(ConversationId, Artifact)>>>,
    notify: Arc<Notify>,
}

impl MockChannel {
    /// Create a new mock channel with empty queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject an inbound event into the receive queue.
    ///
    /// The next call to `receive()` will return this event.
    pub async fn inject_event(&self, event: InboundEvent) {
        self.inbound.lock().await.push_back(event);
        self.notify.notify_one();
    }

    /// All texts sent through `notify()`, in call order.
    pub async fn notifications(&self) -> Vec<(ConversationId, String)> {
        self.notifications.lock().await.clone()
    }

    /// Texts notified to one conversation, in call order.
    pub async fn notifications_for(&self, conversation: ConversationId) -> Vec<String> {
        self.notifications
            .lock()
            .await
            .iter()
            .filter(|(conv, _)| *conv == conversation)
            .map(|(_, text)| text.clone())
            .collect()
    }

    /// All artifacts sent through `deliver()`, in call order.
    pub async fn deliveries(&self) -> Vec<(ConversationId, Artifact)> {
        self.deliveries.lock().await.clone()
    }

    /// Clear captured notifications and deliveries.
    pub async fn clear_captured(&self) {
        self.notifications.lock().await.clear();
        self.deliveries.lock().await.clear();
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    async fn connect(&mut self) -> Result<(), QuizdocError> {
        Ok(())
    }

    async fn notify(&self, conversation: ConversationId, text: &str) -> Result<(), QuizdocError> {
        self.notifications
            .lock()
            .await
            .push((conversation, text.to_string()));
        Ok(())
    }

    async fn deliver(
        &self,
        conversation: ConversationId,
        artifact: Artifact,
    ) -> Result<(), QuizdocError> {
        self.deliveries.lock().await.push((conversation, artifact));
        Ok(())
    }

    async fn receive(&self) -> Result<InboundEvent, QuizdocError> {
        loop {
            // Try to pop from the queue
            {
                let mut queue = self.inbound.lock().await;
                if let Some(event) = queue.pop_front() {
                    return Ok(event);
                }
            }
            // Wait for notification that a new event was injected
            self.notify.notified().await;
        }
    }
}
