// SPDX-FileCopyrightText: 2026 Quizdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading via Figment.
//!
//! Later layers win: `/etc/quizdoc/quizdoc.toml`, then the XDG user config,
//! then `./quizdoc.toml`, then `QUIZDOC_*` environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::QuizdocConfig;

/// Loads configuration from the standard hierarchy with env var overrides.
///
/// Compiled defaults sit under everything, so an empty system is still a
/// valid configuration (without a bot token, only `doctor` is useful).
pub fn load_config() -> Result<QuizdocConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(QuizdocConfig::default()))
        .merge(Toml::file("/etc/quizdoc/quizdoc.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("quizdoc/quizdoc.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("quizdoc.toml"))
        .merge(env_provider())
        .extract()
}

/// Loads configuration from one TOML string (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<QuizdocConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(QuizdocConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Loads configuration from one explicit file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<QuizdocConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(QuizdocConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Environment variable provider mapping `QUIZDOC_<SECTION>_<KEY>` to
/// `<section>.<key>`.
///
/// `Env::split("_")` would misparse underscore-containing keys
/// (`QUIZDOC_TELEGRAM_BOT_TOKEN` must become `telegram.bot_token`, not
/// `telegram.bot.token`), so the section prefix is rewritten explicitly.
fn env_provider() -> Env {
    Env::prefixed("QUIZDOC_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("agent_", "agent.", 1)
            .replacen("telegram_", "telegram.", 1)
            .replacen("collector_", "collector.", 1);
        mapped.into()
    })
}
