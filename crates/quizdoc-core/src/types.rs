// SPDX-FileCopyrightText: 2026 Quizdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Quizdoc workspace.
//!
//! A conversation forwards quizzes and solution texts to the bot; the
//! collector pairs them into [`CompletedQuiz`] records and a document sink
//! turns a batch of records into an [`Artifact`].

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a conversation (a Telegram chat id).
///
/// All session state is keyed by this id and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub i64);

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One answer option of a quiz. Display text only; insertion order is
/// display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub text: String,
}

impl QuizOption {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A quiz that has been received but is still waiting for its solution text.
///
/// `correct_option` is carried exactly as the transport reported it; range
/// checking is deferred to [`CompletedQuiz::correct_index`] so a bad value
/// degrades to "no correct option" at serialization time instead of failing
/// the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingQuiz {
    pub question: String,
    pub options: Vec<QuizOption>,
    pub correct_option: Option<i64>,
}

impl PendingQuiz {
    /// Attaches the solution text, consuming the pending quiz.
    ///
    /// An empty string records that the solution was never supplied.
    pub fn with_explanation(self, explanation: impl Into<String>) -> CompletedQuiz {
        CompletedQuiz {
            question: self.question,
            options: self.options,
            correct_option: self.correct_option,
            explanation: explanation.into(),
        }
    }
}

/// A quiz paired with its solution text, queued for the next document build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedQuiz {
    pub question: String,
    pub options: Vec<QuizOption>,
    pub correct_option: Option<i64>,
    /// Empty string means the solution was never supplied.
    pub explanation: String,
}

impl CompletedQuiz {
    /// Index of the correct option, or `None` when no option should be
    /// marked correct.
    ///
    /// A missing, negative, or out-of-range `correct_option` yields `None`
    /// so every option serializes as incorrect. Degrading instead of
    /// erroring is deliberate: a record with a bad index must still land in
    /// the document.
    pub fn correct_index(&self) -> Option<usize> {
        match self.correct_option {
            Some(i) if i >= 0 && (i as usize) < self.options.len() => Some(i as usize),
            _ => None,
        }
    }
}

/// A poll-type message as reported by the transport.
///
/// `is_quiz` distinguishes quiz polls (exactly one correct answer) from
/// regular opinion polls, which the collector rejects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizEvent {
    pub question: String,
    pub options: Vec<QuizOption>,
    pub correct_option: Option<i64>,
    pub is_quiz: bool,
}

impl QuizEvent {
    /// Converts the event into a pending record awaiting its solution.
    pub fn into_pending(self) -> PendingQuiz {
        PendingQuiz {
            question: self.question,
            options: self.options,
            correct_option: self.correct_option,
        }
    }
}

/// Bot commands a conversation can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Command {
    /// Reset all state and show the usage message.
    Start,
    /// Flush the queue into a document now, salvaging any pending quiz.
    Convert,
    /// Discard the pending quiz and the queue.
    Cancel,
}

/// What an inbound event carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A poll message, quiz-type or not.
    Quiz(QuizEvent),
    /// A free-text message (the solution for the pending quiz).
    Text(String),
    /// A recognized bot command.
    Command(Command),
}

/// A transport-agnostic inbound event addressed to one conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub conversation: ConversationId,
    pub kind: EventKind,
}

/// A built document, held in memory until the channel delivers it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn three_option_quiz(correct: Option<i64>) -> CompletedQuiz {
        CompletedQuiz {
            question: "capital of France?".into(),
            options: vec![
                QuizOption::new("Paris"),
                QuizOption::new("Lyon"),
                QuizOption::new("Nice"),
            ],
            correct_option: correct,
            explanation: String::new(),
        }
    }

    #[test]
    fn correct_index_within_range() {
        assert_eq!(three_option_quiz(Some(0)).correct_index(), Some(0));
        assert_eq!(three_option_quiz(Some(2)).correct_index(), Some(2));
    }

    #[test]
    fn correct_index_out_of_range_is_none() {
        assert_eq!(three_option_quiz(Some(3)).correct_index(), None);
        assert_eq!(three_option_quiz(Some(5)).correct_index(), None);
        assert_eq!(three_option_quiz(Some(-1)).correct_index(), None);
        assert_eq!(three_option_quiz(None).correct_index(), None);
    }

    #[test]
    fn with_explanation_preserves_quiz_fields() {
        let pending = PendingQuiz {
            question: "q".into(),
            options: vec![QuizOption::new("a"), QuizOption::new("b")],
            correct_option: Some(1),
        };
        let completed = pending.clone().with_explanation("because");
        assert_eq!(completed.question, pending.question);
        assert_eq!(completed.options, pending.options);
        assert_eq!(completed.correct_option, Some(1));
        assert_eq!(completed.explanation, "because");
    }

    #[test]
    fn command_parses_lowercase_names() {
        assert_eq!(Command::from_str("start").unwrap(), Command::Start);
        assert_eq!(Command::from_str("convert").unwrap(), Command::Convert);
        assert_eq!(Command::from_str("cancel").unwrap(), Command::Cancel);
        assert!(Command::from_str("reset").is_err());
    }

    #[test]
    fn command_display_round_trips() {
        for cmd in [Command::Start, Command::Convert, Command::Cancel] {
            assert_eq!(Command::from_str(&cmd.to_string()).unwrap(), cmd);
        }
    }

    #[test]
    fn completed_quiz_serde_round_trips() {
        let record = three_option_quiz(Some(1));
        let json = serde_json::to_string(&record).unwrap();
        let back: CompletedQuiz = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
