// SPDX-FileCopyrightText: 2026 Quizdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session store trait: per-conversation pairing state and record queue.

use async_trait::async_trait;

use crate::error::QuizdocError;
use crate::types::{CompletedQuiz, ConversationId, PendingQuiz};

/// Per-conversation state store for the collector.
///
/// Each conversation holds at most one pending quiz awaiting its solution
/// and an ordered FIFO queue of completed records awaiting the next flush.
/// Every operation is atomic with respect to other operations on the same
/// conversation id; there is no cross-conversation state.
///
/// The shipped implementation is in-memory, but the contract is async and
/// fallible so a persistent store can be swapped in without changing
/// callers.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Returns a copy of the pending quiz, if any.
    async fn pending(
        &self,
        conversation: ConversationId,
    ) -> Result<Option<PendingQuiz>, QuizdocError>;

    /// Stores a pending quiz, overwriting any existing one.
    ///
    /// The caller is responsible for salvaging the overwritten record first.
    async fn set_pending(
        &self,
        conversation: ConversationId,
        quiz: PendingQuiz,
    ) -> Result<(), QuizdocError>;

    /// Clears the pending quiz without returning it.
    async fn clear_pending(&self, conversation: ConversationId) -> Result<(), QuizdocError>;

    /// Removes and returns the pending quiz in one atomic step.
    async fn take_pending(
        &self,
        conversation: ConversationId,
    ) -> Result<Option<PendingQuiz>, QuizdocError>;

    /// Appends a completed record to the end of the queue and returns the
    /// new queue length.
    async fn enqueue(
        &self,
        conversation: ConversationId,
        record: CompletedQuiz,
    ) -> Result<usize, QuizdocError>;

    /// Returns the current queue length.
    async fn queue_len(&self, conversation: ConversationId) -> Result<usize, QuizdocError>;

    /// Returns the full queue contents and resets the queue to empty, as one
    /// atomic step. Only the collector drains or resets the queue.
    async fn drain_queue(
        &self,
        conversation: ConversationId,
    ) -> Result<Vec<CompletedQuiz>, QuizdocError>;

    /// Clears the pending quiz and the queue together.
    async fn reset(&self, conversation: ConversationId) -> Result<(), QuizdocError>;
}
