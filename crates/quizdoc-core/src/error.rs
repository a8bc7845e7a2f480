// SPDX-FileCopyrightText: 2026 Quizdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Quizdoc workspace.

use thiserror::Error;

/// The primary error type used across all Quizdoc adapter traits and the collector.
#[derive(Debug, Error)]
pub enum QuizdocError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Channel adapter errors (connection failure, send/receive failure, bad chat id).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Document sink errors (document assembly or packing failure).
    #[error("document sink error: {message}")]
    Sink {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Session store errors. The in-memory store is infallible; this variant
    /// exists for persistent implementations of the store contract.
    #[error("session store error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
