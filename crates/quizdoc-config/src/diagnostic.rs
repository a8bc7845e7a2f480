// SPDX-FileCopyrightText: 2026 Quizdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Diagnostic rendering of configuration errors.
//!
//! Figment deserialization errors become miette diagnostics carrying the
//! valid keys for the section and a "did you mean?" suggestion picked by
//! Jaro-Winkler similarity.

use miette::Diagnostic;
use thiserror::Error;

/// Minimum Jaro-Winkler score before a key suggestion is offered; below
/// this the candidates are noise, not typos.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with diagnostic help attached.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key the model does not know (`deny_unknown_fields` tripped).
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(quizdoc::config::unknown_key),
        help("{}", format_unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Closest valid key, when one is close enough.
        suggestion: Option<String>,
        valid_keys: String,
    },

    /// A value of the wrong TOML type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(quizdoc::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
    },

    /// A key the model requires but the merged layers never supplied.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(quizdoc::config::missing_key),
        help("add `{key} = <value>` to your quizdoc.toml")
    )]
    MissingKey { key: String },

    /// A semantic constraint violated after a clean parse.
    #[error("validation error: {message}")]
    #[diagnostic(code(quizdoc::config::validation))]
    Validation { message: String },

    /// Anything Figment reports that has no dedicated variant.
    #[error("configuration error: {0}")]
    #[diagnostic(code(quizdoc::config::other))]
    Other(String),
}

fn format_unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Suggest the closest valid key for an unknown one, if any is close enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|candidate| (*candidate, strsim::jaro_winkler(unknown, candidate)))
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(candidate, _)| candidate.to_string())
}

/// Convert a `figment::Error` into a list of `ConfigError` diagnostics.
///
/// A figment error may contain several underlying errors; each is converted
/// to the matching `ConfigError` variant, with fuzzy suggestions attached to
/// unknown field errors.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    use figment::error::Kind;

    let mut errors = Vec::new();

    for error in err {
        let path = error.path.join(".");
        let config_error = match &error.kind {
            Kind::UnknownField(field, expected) => {
                let valid_keys: Vec<&str> = expected.to_vec();
                let suggestion = suggest_key(field, &valid_keys);
                ConfigError::UnknownKey {
                    key: qualify(&path, field),
                    suggestion,
                    valid_keys: valid_keys.join(", "),
                }
            }
            Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                key: path.clone(),
                detail: format!("found {actual}"),
                expected: expected.clone(),
            },
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: qualify(&path, field),
            },
            other => ConfigError::Other(other.to_string()),
        };
        errors.push(config_error);
    }

    errors
}

/// Prefix a field name with its section path, when figment reported one.
fn qualify(path: &str, field: &str) -> String {
    if path.is_empty() || path == field {
        field.to_string()
    } else {
        format!("{path}.{field}")
    }
}

/// Print all collected errors to stderr with their help text.
pub fn render_errors(errors: &[ConfigError]) {
    for err in errors {
        eprintln!("error: {err}");
        if let Some(help) = err.help() {
            eprintln!("  help: {help}");
        }
    }
}
