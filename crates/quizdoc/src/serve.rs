// SPDX-FileCopyrightText: 2026 Quizdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `quizdoc serve` command implementation.
//!
//! Starts the bot: connects the Telegram channel, wires the in-memory
//! session store and the DOCX sink into the collector, and runs the event
//! loop until a shutdown signal arrives.

use std::sync::Arc;

use tracing::{error, info};

use quizdoc_collector::{shutdown, Collector, CollectorLoop};
use quizdoc_config::model::QuizdocConfig;
use quizdoc_core::error::QuizdocError;
use quizdoc_core::ChannelAdapter;
use quizdoc_docx::DocxSink;
use quizdoc_session::MemorySessionStore;
use quizdoc_telegram::TelegramChannel;

/// Runs the `quizdoc serve` command.
///
/// Blocks until SIGINT/SIGTERM, then lets the collector loop wind down.
pub async fn run_serve(config: QuizdocConfig) -> Result<(), QuizdocError> {
    init_tracing(&config.agent.log_level);

    info!(bot = config.agent.name.as_str(), "starting quizdoc serve");

    let mut channel = TelegramChannel::new(config.telegram.clone()).map_err(|e| {
        error!(error = %e, "failed to initialize Telegram channel");
        eprintln!(
            "error: Telegram bot token required. Set telegram.bot_token in quizdoc.toml \
             or the QUIZDOC_TELEGRAM_BOT_TOKEN environment variable."
        );
        e
    })?;
    channel.connect().await?;
    let channel: Arc<dyn ChannelAdapter> = Arc::new(channel);

    let store = Arc::new(MemorySessionStore::new());
    let sink = Arc::new(DocxSink::new());
    let collector = Collector::new(store, channel.clone(), sink, &config.collector);

    info!(
        batch_size = config.collector.batch_size,
        "collector initialized"
    );

    // Install signal handler.
    let cancel = shutdown::install_signal_handler();

    CollectorLoop::new(channel, collector).run(cancel).await?;

    info!("quizdoc serve stopped");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("quizdoc={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
