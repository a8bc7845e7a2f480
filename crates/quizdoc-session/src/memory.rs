// SPDX-FileCopyrightText: 2026 Quizdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! DashMap-backed [`SessionStore`] implementation.

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use quizdoc_core::error::QuizdocError;
use quizdoc_core::traits::store::SessionStore;
use quizdoc_core::types::{CompletedQuiz, ConversationId, PendingQuiz};

/// State held for one conversation.
#[derive(Debug, Default)]
struct ConversationState {
    /// At most one quiz awaiting its solution.
    pending: Option<PendingQuiz>,
    /// Completed records awaiting the next flush, FIFO.
    queue: Vec<CompletedQuiz>,
}

/// In-memory [`SessionStore`] keyed by conversation id.
///
/// State is created lazily on first touch and lives for the process
/// lifetime; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    conversations: DashMap<ConversationId, ConversationState>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of conversations with any state (used by diagnostics).
    pub fn conversation_count(&self) -> usize {
        self.conversations.len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn pending(
        &self,
        conversation: ConversationId,
    ) -> Result<Option<PendingQuiz>, QuizdocError> {
        Ok(self
            .conversations
            .get(&conversation)
            .and_then(|state| state.pending.clone()))
    }

    async fn set_pending(
        &self,
        conversation: ConversationId,
        quiz: PendingQuiz,
    ) -> Result<(), QuizdocError> {
        self.conversations.entry(conversation).or_default().pending = Some(quiz);
        Ok(())
    }

    async fn clear_pending(&self, conversation: ConversationId) -> Result<(), QuizdocError> {
        if let Some(mut state) = self.conversations.get_mut(&conversation) {
            state.pending = None;
        }
        Ok(())
    }

    async fn take_pending(
        &self,
        conversation: ConversationId,
    ) -> Result<Option<PendingQuiz>, QuizdocError> {
        Ok(self
            .conversations
            .get_mut(&conversation)
            .and_then(|mut state| state.pending.take()))
    }

    async fn enqueue(
        &self,
        conversation: ConversationId,
        record: CompletedQuiz,
    ) -> Result<usize, QuizdocError> {
        let mut state = self.conversations.entry(conversation).or_default();
        state.queue.push(record);
        Ok(state.queue.len())
    }

    async fn queue_len(&self, conversation: ConversationId) -> Result<usize, QuizdocError> {
        Ok(self
            .conversations
            .get(&conversation)
            .map(|state| state.queue.len())
            .unwrap_or(0))
    }

    async fn drain_queue(
        &self,
        conversation: ConversationId,
    ) -> Result<Vec<CompletedQuiz>, QuizdocError> {
        let drained = self
            .conversations
            .get_mut(&conversation)
            .map(|mut state| std::mem::take(&mut state.queue))
            .unwrap_or_default();
        debug!(%conversation, count = drained.len(), "drained queue");
        Ok(drained)
    }

    async fn reset(&self, conversation: ConversationId) -> Result<(), QuizdocError> {
        if let Some(mut state) = self.conversations.get_mut(&conversation) {
            state.pending = None;
            state.queue.clear();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizdoc_core::types::QuizOption;

    fn pending(question: &str) -> PendingQuiz {
        PendingQuiz {
            question: question.into(),
            options: vec![QuizOption::new("a"), QuizOption::new("b")],
            correct_option: Some(0),
        }
    }

    fn completed(question: &str) -> CompletedQuiz {
        pending(question).with_explanation("why")
    }

    const CONV: ConversationId = ConversationId(7);
    const OTHER: ConversationId = ConversationId(8);

    #[tokio::test]
    async fn pending_is_empty_for_untouched_conversation() {
        let store = MemorySessionStore::new();
        assert!(store.pending(CONV).await.unwrap().is_none());
        assert_eq!(store.queue_len(CONV).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn set_then_take_pending() {
        let store = MemorySessionStore::new();
        store.set_pending(CONV, pending("q1")).await.unwrap();
        assert_eq!(
            store.pending(CONV).await.unwrap().unwrap().question,
            "q1"
        );

        let taken = store.take_pending(CONV).await.unwrap().unwrap();
        assert_eq!(taken.question, "q1");
        assert!(store.pending(CONV).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_pending_overwrites_existing() {
        let store = MemorySessionStore::new();
        store.set_pending(CONV, pending("first")).await.unwrap();
        store.set_pending(CONV, pending("second")).await.unwrap();
        assert_eq!(
            store.pending(CONV).await.unwrap().unwrap().question,
            "second"
        );
    }

    #[tokio::test]
    async fn clear_pending_discards_without_returning() {
        let store = MemorySessionStore::new();
        store.set_pending(CONV, pending("q")).await.unwrap();
        store.clear_pending(CONV).await.unwrap();
        assert!(store.take_pending(CONV).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn enqueue_reports_growing_length_in_fifo_order() {
        let store = MemorySessionStore::new();
        assert_eq!(store.enqueue(CONV, completed("q1")).await.unwrap(), 1);
        assert_eq!(store.enqueue(CONV, completed("q2")).await.unwrap(), 2);
        assert_eq!(store.queue_len(CONV).await.unwrap(), 2);

        let drained = store.drain_queue(CONV).await.unwrap();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].question, "q1");
        assert_eq!(drained[1].question, "q2");
    }

    #[tokio::test]
    async fn drain_resets_queue_to_empty() {
        let store = MemorySessionStore::new();
        store.enqueue(CONV, completed("q")).await.unwrap();
        store.drain_queue(CONV).await.unwrap();
        assert_eq!(store.queue_len(CONV).await.unwrap(), 0);
        assert!(store.drain_queue(CONV).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reset_clears_pending_and_queue_together() {
        let store = MemorySessionStore::new();
        store.set_pending(CONV, pending("q")).await.unwrap();
        store.enqueue(CONV, completed("q")).await.unwrap();

        store.reset(CONV).await.unwrap();
        assert!(store.pending(CONV).await.unwrap().is_none());
        assert_eq!(store.queue_len(CONV).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn conversations_are_isolated() {
        let store = MemorySessionStore::new();
        store.set_pending(CONV, pending("mine")).await.unwrap();
        store.enqueue(CONV, completed("mine")).await.unwrap();

        assert!(store.pending(OTHER).await.unwrap().is_none());
        assert_eq!(store.queue_len(OTHER).await.unwrap(), 0);

        store.reset(OTHER).await.unwrap();
        assert_eq!(
            store.pending(CONV).await.unwrap().unwrap().question,
            "mine"
        );
        assert_eq!(store.queue_len(CONV).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn concurrent_enqueues_from_two_conversations() {
        let store = std::sync::Arc::new(MemorySessionStore::new());
        let mut handles = Vec::new();
        for conv in [CONV, OTHER] {
            for i in 0..20 {
                let store = store.clone();
                handles.push(tokio::spawn(async move {
                    store.enqueue(conv, completed(&format!("q{i}"))).await
                }));
            }
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(store.queue_len(CONV).await.unwrap(), 20);
        assert_eq!(store.queue_len(OTHER).await.unwrap(), 20);
    }
}
