// SPDX-FileCopyrightText: 2026 Quizdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! DOCX document sink for Quizdoc.
//!
//! Implements [`DocumentSink`] via docx-rs, rendering one fixed-structure
//! table per record and packing the document to bytes in memory. The channel
//! uploads the bytes directly; nothing is written to disk.

pub mod writer;

use async_trait::async_trait;
use tracing::debug;

use quizdoc_core::error::QuizdocError;
use quizdoc_core::traits::sink::DocumentSink;
use quizdoc_core::types::{Artifact, CompletedQuiz, ConversationId};

/// [`DocumentSink`] producing a `.docx` file per batch.
#[derive(Debug, Default)]
pub struct DocxSink;

impl DocxSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentSink for DocxSink {
    async fn build(
        &self,
        conversation: ConversationId,
        records: &[CompletedQuiz],
    ) -> Result<Artifact, QuizdocError> {
        let bytes = writer::render(records)?;
        debug!(
            %conversation,
            records = records.len(),
            size = bytes.len(),
            "packed docx artifact"
        );
        Ok(Artifact {
            file_name: format!("questions_{conversation}.docx"),
            bytes,
        })
    }
}
