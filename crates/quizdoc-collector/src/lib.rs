// SPDX-FileCopyrightText: 2026 Quizdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pairing and flush controller for the Quizdoc collector bot.
//!
//! The [`CollectorLoop`] is the central coordinator that:
//! - Receives inbound events from a channel adapter
//! - Hands each event to the [`Collector`], which pairs quizzes with their
//!   solution texts and batches completed records per conversation
//! - Flushes full batches through the document sink
//! - Handles graceful shutdown

pub mod collector;
pub mod pairing;
pub mod replies;
pub mod shutdown;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

pub use collector::Collector;
pub use pairing::PairingState;

use quizdoc_core::error::QuizdocError;
use quizdoc_core::ChannelAdapter;

/// Event loop driving a [`Collector`] from a channel adapter.
///
/// Events are processed one at a time in arrival order, which also keeps
/// every conversation's event sequence serialized. An explicit `/cancel` or
/// `/start` therefore applies as soon as it is dequeued; an in-flight flush
/// has already drained its batch, so neither command can resurrect or
/// duplicate those records.
pub struct CollectorLoop {
    channel: Arc<dyn ChannelAdapter>,
    collector: Collector,
}

impl CollectorLoop {
    pub fn new(channel: Arc<dyn ChannelAdapter>, collector: Collector) -> Self {
        Self { channel, collector }
    }

    /// Runs the loop until the cancellation token is triggered or the
    /// channel closes.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), QuizdocError> {
        info!("collector loop running");

        loop {
            tokio::select! {
                event = self.channel.receive() => {
                    match event {
                        Ok(event) => {
                            let conversation = event.conversation;
                            if let Err(e) = self.collector.handle_event(event).await {
                                // Storage or internal failure: report
                                // generically, keep serving other events.
                                error!(%conversation, error = %e, "failed to handle inbound event");
                                if let Err(e) = self
                                    .channel
                                    .notify(conversation, replies::GENERIC_FAILURE)
                                    .await
                                {
                                    warn!(%conversation, error = %e, "failed to send failure notice");
                                }
                            }
                        }
                        Err(e) => {
                            error!(error = %e, "channel receive error");
                            // A closed channel cannot produce further events.
                            if e.to_string().contains("closed") {
                                break;
                            }
                        }
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping collector loop");
                    break;
                }
            }
        }

        info!("collector loop stopped");
        Ok(())
    }
}
