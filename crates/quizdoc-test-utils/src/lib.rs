// SPDX-FileCopyrightText: 2026 Quizdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Quizdoc integration tests.
//!
//! Provides mock adapters for fast, deterministic, CI-runnable tests without
//! a live Telegram connection or document library.
//!
//! # Components
//!
//! - [`MockChannel`] - Mock messaging channel with event injection and
//!   notification/delivery capture
//! - [`MockSink`] - Mock document sink with captured batches and switchable
//!   failure

pub mod mock_channel;
pub mod mock_sink;

pub use mock_channel::MockChannel;
pub use mock_sink::MockSink;
