// SPDX-FileCopyrightText: 2026 Quizdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document sink trait: turns a batch of records into one output artifact.

use async_trait::async_trait;

use crate::error::QuizdocError;
use crate::types::{Artifact, CompletedQuiz, ConversationId};

/// External producer of the output document.
///
/// The sink receives one full drained batch and returns the built document
/// as an in-memory [`Artifact`] addressed to the conversation. Delivery is
/// best-effort and single-attempt: a failure is reported to the user and
/// the batch is not retried.
#[async_trait]
pub trait DocumentSink: Send + Sync + 'static {
    /// Builds one document from the batch.
    async fn build(
        &self,
        conversation: ConversationId,
        records: &[CompletedQuiz],
    ) -> Result<Artifact, QuizdocError>;
}
