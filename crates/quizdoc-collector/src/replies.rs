// SPDX-FileCopyrightText: 2026 Quizdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing reply texts.
//!
//! Kept in one place so the collector logic reads as transitions, and so
//! tests can assert on the exact strings.

use quizdoc_core::error::QuizdocError;

pub const NOT_A_QUIZ: &str =
    "That was a regular poll, not a quiz. I can only process quizzes.";

pub const QUIZ_RECEIVED: &str = "Got the quiz! Now waiting for the solution text...";

pub const NOTHING_TO_CONVERT: &str = "There are no questions in the queue to convert.";

pub const QUEUE_CLEARED: &str =
    "All pending quizzes and the current queue have been cleared.";

pub const BUILD_SUCCEEDED: &str = "Successfully created the .docx file.";

pub const PENDING_SALVAGED_ON_CONVERT: &str =
    "A pending quiz was saved with a blank solution before converting.";

pub const GENERIC_FAILURE: &str =
    "Something went wrong while handling that message. Please try again.";

pub fn welcome(batch_size: usize) -> String {
    format!(
        "Hello!\n\n\
         I'm ready to collect your quizzes.\n\n\
         Workflow:\n\
         1. Forward a quiz.\n\
         2. Forward the solution text for that quiz.\n\n\
         I will automatically create a file after {batch_size} quizzes, \
         or you can use /convert at any time. /cancel discards everything."
    )
}

pub fn salvaged_on_new_quiz(queue_len: usize, batch_size: usize) -> String {
    format!(
        "A previous quiz was missing a solution. It has been saved with a \
         blank solution. Current queue: {queue_len}/{batch_size}"
    )
}

pub fn pair_saved(queue_len: usize, batch_size: usize) -> String {
    format!("Quiz and solution saved. ({queue_len}/{batch_size})")
}

pub fn text_without_quiz(text: &str) -> String {
    format!(
        "I received a text message, but I was expecting a quiz first. \
         Please send a quiz before its solution.\n\n\
         Problematic text:\n{text}"
    )
}

pub fn processing(count: usize) -> String {
    format!("Processing {count} question(s)...")
}

pub fn build_failed(err: &QuizdocError) -> String {
    format!("Sorry, an error occurred while creating the .docx file: {err}")
}
