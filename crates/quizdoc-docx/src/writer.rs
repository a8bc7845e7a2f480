// SPDX-FileCopyrightText: 2026 Quizdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Table layout for the generated document.
//!
//! Each record becomes one three-column table:
//!
//! | `Question` | question text (spans two columns) | |
//! | `Type`     | `multiple_choice` (spans two columns) | |
//! | `Option`   | option text | `correct` / `incorrect` |
//! | `Solution` | explanation text (spans two columns) | |
//! | `Marks`    | `4` | `1` |
//!
//! Tables are separated by an empty paragraph.

use std::io::Cursor;

use docx_rs::{Docx, Paragraph, Run, Table, TableCell, TableRow};

use quizdoc_core::error::QuizdocError;
use quizdoc_core::types::CompletedQuiz;

/// Question type tag; only single-correct-answer multiple choice is produced.
const TYPE_TAG: &str = "multiple_choice";

/// Fixed scoring annotation: marks awarded for a correct answer and
/// deducted for an incorrect one.
const MARKS_CORRECT: &str = "4";
const MARKS_INCORRECT: &str = "1";

/// Tag attached to an option row at serialization time.
///
/// Every option is `incorrect` unless the record's marking policy picked it;
/// a record with no valid correct index marks all options incorrect.
pub fn option_tag(index: usize, correct: Option<usize>) -> &'static str {
    if correct == Some(index) {
        "correct"
    } else {
        "incorrect"
    }
}

/// Renders the full batch into `.docx` bytes.
pub fn render(records: &[CompletedQuiz]) -> Result<Vec<u8>, QuizdocError> {
    let mut doc = Docx::new();
    for record in records {
        doc = doc
            .add_table(record_table(record))
            .add_paragraph(Paragraph::new());
    }

    let mut cursor = Cursor::new(Vec::new());
    doc.build().pack(&mut cursor).map_err(|e| QuizdocError::Sink {
        message: format!("failed to pack docx: {e}"),
        source: Some(Box::new(e)),
    })?;
    Ok(cursor.into_inner())
}

fn record_table(record: &CompletedQuiz) -> Table {
    let mut rows = vec![
        wide_row("Question", &record.question),
        wide_row("Type", TYPE_TAG),
    ];

    let correct = record.correct_index();
    for (i, option) in record.options.iter().enumerate() {
        rows.push(TableRow::new(vec![
            text_cell("Option"),
            text_cell(&option.text),
            text_cell(option_tag(i, correct)),
        ]));
    }

    rows.push(wide_row("Solution", &record.explanation));
    rows.push(TableRow::new(vec![
        text_cell("Marks"),
        text_cell(MARKS_CORRECT),
        text_cell(MARKS_INCORRECT),
    ]));

    Table::new(rows)
}

/// A label row whose value cell spans the two remaining columns.
fn wide_row(label: &str, value: &str) -> TableRow {
    TableRow::new(vec![
        text_cell(label),
        text_cell(value).grid_span(2),
    ])
}

fn text_cell(text: &str) -> TableCell {
    TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text(text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizdoc_core::types::QuizOption;

    fn record(correct_option: Option<i64>) -> CompletedQuiz {
        CompletedQuiz {
            question: "pick one".into(),
            options: vec![
                QuizOption::new("a"),
                QuizOption::new("b"),
                QuizOption::new("c"),
            ],
            correct_option,
            explanation: "the middle one".into(),
        }
    }

    #[test]
    fn option_tag_marks_only_the_correct_index() {
        let correct = record(Some(1)).correct_index();
        assert_eq!(option_tag(0, correct), "incorrect");
        assert_eq!(option_tag(1, correct), "correct");
        assert_eq!(option_tag(2, correct), "incorrect");
    }

    #[test]
    fn out_of_range_index_marks_every_option_incorrect() {
        let correct = record(Some(5)).correct_index();
        for i in 0..3 {
            assert_eq!(option_tag(i, correct), "incorrect");
        }
    }

    #[test]
    fn render_produces_a_zip_container() {
        let bytes = render(&[record(Some(0))]).unwrap();
        // DOCX is a ZIP archive; check the local-file-header magic.
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn render_of_empty_batch_still_packs() {
        // The collector never calls the sink with an empty batch, but the
        // writer itself has no reason to care.
        let bytes = render(&[]).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn render_handles_empty_explanation() {
        let mut r = record(Some(0));
        r.explanation = String::new();
        assert!(render(&[r]).is_ok());
    }
}
