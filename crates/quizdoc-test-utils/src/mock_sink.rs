// SPDX-FileCopyrightText: 2026 Quizdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock document sink for deterministic testing.
//!
//! `MockSink` implements `DocumentSink`, capturing each batch it is asked to
//! build. A switchable failure mode exercises the sink-error path without a
//! real document library.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use quizdoc_core::error::QuizdocError;
use quizdoc_core::traits::sink::DocumentSink;
use quizdoc_core::types::{Artifact, CompletedQuiz, ConversationId};

/// A mock document sink for testing.
///
/// `build()` captures the batch and returns a tiny placeholder artifact,
/// or fails with a sink error while `fail_next` is set.
#[derive(Default)]
pub struct MockSink {
    batches: Arc<Mutex<Vec<(ConversationId, Vec<CompletedQuiz>)>>>,
    fail: Arc<AtomicBool>,
}

impl MockSink {
    /// Create a new mock sink that succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `build()` call fail (until cleared).
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    /// All batches passed to `build()`, in call order.
    pub async fn batches(&self) -> Vec<(ConversationId, Vec<CompletedQuiz>)> {
        self.batches.lock().await.clone()
    }

    /// Number of `build()` calls that reached the sink.
    pub async fn build_count(&self) -> usize {
        self.batches.lock().await.len()
    }
}

#[async_trait]
impl DocumentSink for MockSink {
    async fn build(
        &self,
        conversation: ConversationId,
        records: &[CompletedQuiz],
    ) -> Result<Artifact, QuizdocError> {
        self.batches
            .lock()
            .await
            .push((conversation, records.to_vec()));

        if self.fail.load(Ordering::SeqCst) {
            return Err(QuizdocError::Sink {
                message: "mock sink failure".into(),
                source: None,
            });
        }

        Ok(Artifact {
            file_name: format!("questions_{conversation}.docx"),
            bytes: b"mock document".to_vec(),
        })
    }
}
