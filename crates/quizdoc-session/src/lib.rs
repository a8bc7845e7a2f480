// SPDX-FileCopyrightText: 2026 Quizdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory session state store for the Quizdoc collector.
//!
//! Implements [`SessionStore`] on top of a concurrent map keyed by
//! conversation id. Each operation performs its read-modify-write under the
//! map's per-key entry lock, so individual operations are atomic with
//! respect to the same conversation while distinct conversations never
//! contend.

pub mod memory;

pub use memory::MemorySessionStore;
