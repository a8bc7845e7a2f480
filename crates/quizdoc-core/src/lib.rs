// SPDX-FileCopyrightText: 2026 Quizdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Quizdoc collector bot.
//!
//! This crate provides the domain types, error type, and adapter traits used
//! throughout the Quizdoc workspace. The channel, session store, and
//! document sink implementations all plug in through traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::QuizdocError;
pub use types::{
    Artifact, Command, CompletedQuiz, ConversationId, EventKind, InboundEvent, PendingQuiz,
    QuizEvent, QuizOption,
};

// Re-export all adapter traits at crate root.
pub use traits::{ChannelAdapter, DocumentSink, SessionStore};
