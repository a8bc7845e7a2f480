// SPDX-FileCopyrightText: 2026 Quizdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `quizdoc doctor` command implementation.
//!
//! Runs offline diagnostic checks against the configuration and the
//! document writer. Nothing here talks to Telegram.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use quizdoc_config::model::QuizdocConfig;
use quizdoc_config::validation::validate_config;
use quizdoc_core::error::QuizdocError;
use quizdoc_core::types::{CompletedQuiz, QuizOption};

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed successfully.
    Pass,
    /// Check passed with a warning.
    Warn,
    /// Check failed.
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check.
    pub name: String,
    /// Check status.
    pub status: CheckStatus,
    /// Human-readable message.
    pub message: String,
    /// Duration the check took.
    pub duration: Duration,
}

/// Run the `quizdoc doctor` command.
///
/// With `--plain`, disables colored output. Returns an error when any check
/// fails, so the process exits non-zero.
pub async fn run_doctor(config: &QuizdocConfig, plain: bool) -> Result<(), QuizdocError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    let results = vec![
        check_config(config),
        check_telegram_token(config),
        check_docx_writer(),
    ];

    println!();
    println!("  quizdoc doctor");
    println!("  {}", "-".repeat(50));

    let mut fail_count = 0;
    let mut warn_count = 0;

    for result in &results {
        let duration_ms = result.duration.as_millis();
        let line = match result.status {
            CheckStatus::Pass => {
                let symbol = paint(use_color, "✓", Paint::Green, "[OK]  ");
                format!(
                    "    {symbol} {:<18} {} ({duration_ms}ms)",
                    result.name, result.message
                )
            }
            CheckStatus::Warn => {
                warn_count += 1;
                let symbol = paint(use_color, "!", Paint::Yellow, "[WARN]");
                format!(
                    "    {symbol} {:<18} {} ({duration_ms}ms)",
                    result.name, result.message
                )
            }
            CheckStatus::Fail => {
                fail_count += 1;
                let symbol = paint(use_color, "✗", Paint::Red, "[FAIL]");
                format!(
                    "    {symbol} {:<18} {} ({duration_ms}ms)",
                    result.name, result.message
                )
            }
        };
        println!("{line}");
    }

    println!("  {}", "-".repeat(50));
    println!(
        "  {} checks, {} warnings, {} failures",
        results.len(),
        warn_count,
        fail_count
    );
    println!();

    if fail_count > 0 {
        return Err(QuizdocError::Config(format!(
            "{fail_count} doctor check(s) failed"
        )));
    }
    Ok(())
}

enum Paint {
    Green,
    Yellow,
    Red,
}

fn paint(use_color: bool, symbol: &str, color: Paint, fallback: &str) -> String {
    if use_color {
        use colored::Colorize;
        match color {
            Paint::Green => symbol.green().to_string(),
            Paint::Yellow => symbol.yellow().to_string(),
            Paint::Red => symbol.red().to_string(),
        }
    } else {
        fallback.to_string()
    }
}

/// The configuration passes semantic validation.
fn check_config(config: &QuizdocConfig) -> CheckResult {
    let start = Instant::now();
    match validate_config(config) {
        Ok(()) => CheckResult {
            name: "config".into(),
            status: CheckStatus::Pass,
            message: format!("valid (batch_size={})", config.collector.batch_size),
            duration: start.elapsed(),
        },
        Err(errors) => CheckResult {
            name: "config".into(),
            status: CheckStatus::Fail,
            message: errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; "),
            duration: start.elapsed(),
        },
    }
}

/// A bot token is configured and looks like `<id>:<secret>`.
fn check_telegram_token(config: &QuizdocConfig) -> CheckResult {
    let start = Instant::now();
    let (status, message) = match config.telegram.bot_token.as_deref() {
        None => (
            CheckStatus::Fail,
            "telegram.bot_token is not set; `serve` will refuse to start".to_string(),
        ),
        Some(token) if token.split_once(':').is_none_or(|(id, _)| id.parse::<u64>().is_err()) => (
            CheckStatus::Warn,
            "telegram.bot_token does not look like `<numeric id>:<secret>`".to_string(),
        ),
        Some(_) => (CheckStatus::Pass, "token present".to_string()),
    };
    CheckResult {
        name: "telegram".into(),
        status,
        message,
        duration: start.elapsed(),
    }
}

/// The DOCX writer can pack a sample record in memory.
fn check_docx_writer() -> CheckResult {
    let start = Instant::now();
    let sample = CompletedQuiz {
        question: "doctor self-test".into(),
        options: vec![QuizOption::new("yes"), QuizOption::new("no")],
        correct_option: Some(0),
        explanation: "sample record".into(),
    };
    match quizdoc_docx::writer::render(&[sample]) {
        Ok(bytes) => CheckResult {
            name: "docx writer".into(),
            status: CheckStatus::Pass,
            message: format!("packed sample document ({} bytes)", bytes.len()),
            duration: start.elapsed(),
        },
        Err(e) => CheckResult {
            name: "docx writer".into(),
            status: CheckStatus::Fail,
            message: e.to_string(),
            duration: start.elapsed(),
        },
    }
}
