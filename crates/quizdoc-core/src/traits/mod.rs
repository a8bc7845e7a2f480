// SPDX-FileCopyrightText: 2026 Quizdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the Quizdoc collector.
//!
//! The collector core talks to its collaborators only through these traits,
//! using `#[async_trait]` for dynamic dispatch compatibility.

pub mod channel;
pub mod sink;
pub mod store;

pub use channel::ChannelAdapter;
pub use sink::DocumentSink;
pub use store::SessionStore;
