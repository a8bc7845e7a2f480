// SPDX-FileCopyrightText: 2026 Quizdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The two-state pairing machine of one conversation.

use quizdoc_core::types::PendingQuiz;

/// Pairing state of a conversation, derived from its pending slot.
///
/// A conversation is `Idle` until a quiz arrives, then `AwaitingSolution`
/// until the solution text pairs with it or the pending quiz is salvaged or
/// discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingState {
    /// No pending quiz.
    Idle,
    /// One pending quiz held, waiting for its solution text.
    AwaitingSolution,
}

impl PairingState {
    /// Derives the state from the pending slot.
    pub fn of(pending: Option<&PendingQuiz>) -> Self {
        match pending {
            Some(_) => PairingState::AwaitingSolution,
            None => PairingState::Idle,
        }
    }
}

impl std::fmt::Display for PairingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PairingState::Idle => write!(f, "idle"),
            PairingState::AwaitingSolution => write!(f, "awaiting_solution"),
        }
    }
}
