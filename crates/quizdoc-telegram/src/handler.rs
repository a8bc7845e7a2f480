// SPDX-FileCopyrightText: 2026 Quizdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message routing, authorization filtering, and event extraction.
//!
//! Determines whether an incoming Telegram message should be processed based
//! on the allowlist, then extracts it into a transport-agnostic
//! [`InboundEvent`]: a poll becomes a quiz event, a `/command` becomes a
//! command, anything else with text becomes solution text.

use std::str::FromStr;

use teloxide::prelude::*;
use teloxide::types::{Poll, PollType};
use tracing::debug;

use quizdoc_core::types::{
    Command, ConversationId, EventKind, InboundEvent, QuizEvent, QuizOption,
};

/// Checks whether the message sender is authorized.
///
/// Authorization passes if the sender's user ID (as string) or username
/// matches any entry in the `allowed_users` list. An empty list leaves the
/// bot open to everyone: the collector is a walk-up utility.
///
/// Messages without a sender (e.g., channel posts) pass only when the list
/// is empty.
pub fn is_authorized(msg: &Message, allowed_users: &[String]) -> bool {
    if allowed_users.is_empty() {
        return true;
    }

    let user = match msg.from.as_ref() {
        Some(u) => u,
        None => return false,
    };

    let user_id_str = user.id.0.to_string();

    for allowed in allowed_users {
        // Match by user ID
        if *allowed == user_id_str {
            return true;
        }
        // Match by username (with or without @ prefix)
        if let Some(ref username) = user.username {
            let allowed_clean = allowed.strip_prefix('@').unwrap_or(allowed);
            if username.eq_ignore_ascii_case(allowed_clean) {
                return true;
            }
        }
    }

    false
}

/// Parses a `/command`, tolerating a `@botname` suffix and mixed case.
///
/// Returns `None` for text that is not a command at all; `Some(Err(..))`
/// marks a command-shaped message the bot does not know, which the caller
/// ignores rather than treating as solution text.
fn parse_command(text: &str) -> Option<Result<Command, ()>> {
    let first = text.split_whitespace().next()?;
    let name = first.strip_prefix('/')?;
    let name = name.split('@').next().unwrap_or(name);
    Some(Command::from_str(&name.to_ascii_lowercase()).map_err(|_| ()))
}

/// Maps a Telegram poll into a quiz event.
///
/// Options keep their display order; `correct_option_id` is carried raw and
/// range-checked only at serialization time.
fn quiz_event(poll: &Poll) -> QuizEvent {
    QuizEvent {
        question: poll.question.clone(),
        options: poll
            .options
            .iter()
            .map(|opt| QuizOption::new(opt.text.clone()))
            .collect(),
        correct_option: poll.correct_option_id.map(i64::from),
        is_quiz: matches!(poll.poll_type, PollType::Quiz),
    }
}

/// Extracts an [`InboundEvent`] from a Telegram message.
///
/// Returns `None` for unsupported message types (stickers, photos, ...) and
/// for unknown commands, which are silently dropped.
pub fn extract_event(msg: &Message) -> Option<InboundEvent> {
    let conversation = ConversationId(msg.chat.id.0);

    if let Some(poll) = msg.poll() {
        return Some(InboundEvent {
            conversation,
            kind: EventKind::Quiz(quiz_event(poll)),
        });
    }

    if let Some(text) = msg.text() {
        return match parse_command(text) {
            Some(Ok(command)) => Some(InboundEvent {
                conversation,
                kind: EventKind::Command(command),
            }),
            Some(Err(())) => {
                debug!(%conversation, text, "ignoring unknown command");
                None
            }
            None => Some(InboundEvent {
                conversation,
                kind: EventKind::Text(text.to_string()),
            }),
        };
    }

    debug!(msg_id = msg.id.0, "ignoring unsupported message type");
    None
}
