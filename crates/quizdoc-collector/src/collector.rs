// SPDX-FileCopyrightText: 2026 Quizdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The pairing and flush controller.
//!
//! Consumes inbound events for a conversation, mutates its session state
//! through the [`SessionStore`] contract, and flushes completed records
//! through the [`DocumentSink`] when the queue reaches the configured batch
//! size or on an explicit `/convert`.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use quizdoc_config::model::CollectorConfig;
use quizdoc_core::error::QuizdocError;
use quizdoc_core::types::{Command, ConversationId, EventKind, InboundEvent, QuizEvent};
use quizdoc_core::{ChannelAdapter, DocumentSink, SessionStore};

use crate::pairing::PairingState;
use crate::replies;

/// Controller pairing quizzes with solution texts and flushing batches.
///
/// State is mutated only through the session store's atomic operations.
/// Events for the same conversation are serialized with a per-conversation
/// guard held across the whole event, so the read-modify-write over the
/// pending slot cannot interleave; distinct conversations proceed
/// independently.
pub struct Collector {
    store: Arc<dyn SessionStore>,
    channel: Arc<dyn ChannelAdapter>,
    sink: Arc<dyn DocumentSink>,
    batch_size: usize,
    guards: DashMap<ConversationId, Arc<Mutex<()>>>,
}

impl Collector {
    /// Creates a new controller over the given collaborators.
    pub fn new(
        store: Arc<dyn SessionStore>,
        channel: Arc<dyn ChannelAdapter>,
        sink: Arc<dyn DocumentSink>,
        config: &CollectorConfig,
    ) -> Self {
        Self {
            store,
            channel,
            sink,
            batch_size: config.batch_size,
            guards: DashMap::new(),
        }
    }

    /// Handles one inbound event to completion.
    ///
    /// Returned errors are storage or internal failures; user mistakes
    /// (non-quiz poll, solution without a quiz) are answered with a reply
    /// and are not errors.
    pub async fn handle_event(&self, event: InboundEvent) -> Result<(), QuizdocError> {
        let conversation = event.conversation;
        let guard = self.guards.entry(conversation).or_default().clone();
        let _serialized = guard.lock().await;

        match event.kind {
            EventKind::Quiz(quiz) => self.on_quiz(conversation, quiz).await,
            EventKind::Text(text) => self.on_text(conversation, text).await,
            EventKind::Command(command) => self.on_command(conversation, command).await,
        }
    }

    /// Current pairing state of a conversation (diagnostics and tests).
    pub async fn pairing_state(
        &self,
        conversation: ConversationId,
    ) -> Result<PairingState, QuizdocError> {
        let pending = self.store.pending(conversation).await?;
        Ok(PairingState::of(pending.as_ref()))
    }

    async fn on_quiz(
        &self,
        conversation: ConversationId,
        quiz: QuizEvent,
    ) -> Result<(), QuizdocError> {
        if !quiz.is_quiz {
            self.send(conversation, replies::NOT_A_QUIZ).await;
            return Ok(());
        }

        if let Some(queue_len) = self.salvage_pending(conversation).await? {
            self.send(
                conversation,
                &replies::salvaged_on_new_quiz(queue_len, self.batch_size),
            )
            .await;
        }

        self.store
            .set_pending(conversation, quiz.into_pending())
            .await?;
        debug!(
            %conversation,
            state = %PairingState::AwaitingSolution,
            "stored pending quiz"
        );
        self.send(conversation, replies::QUIZ_RECEIVED).await;
        Ok(())
    }

    async fn on_text(
        &self,
        conversation: ConversationId,
        text: String,
    ) -> Result<(), QuizdocError> {
        let Some(pending) = self.store.take_pending(conversation).await? else {
            self.send(conversation, &replies::text_without_quiz(&text))
                .await;
            return Ok(());
        };

        let queue_len = self
            .store
            .enqueue(conversation, pending.with_explanation(text))
            .await?;
        debug!(%conversation, queue_len, state = %PairingState::Idle, "paired quiz with solution");
        self.send(
            conversation,
            &replies::pair_saved(queue_len, self.batch_size),
        )
        .await;

        if queue_len >= self.batch_size {
            self.flush(conversation).await?;
        }
        Ok(())
    }

    async fn on_command(
        &self,
        conversation: ConversationId,
        command: Command,
    ) -> Result<(), QuizdocError> {
        debug!(%conversation, %command, "handling command");
        match command {
            Command::Start => {
                self.store.reset(conversation).await?;
                self.send(conversation, &replies::welcome(self.batch_size))
                    .await;
            }
            Command::Convert => {
                if self.salvage_pending(conversation).await?.is_some() {
                    self.send(conversation, replies::PENDING_SALVAGED_ON_CONVERT)
                        .await;
                }
                self.flush(conversation).await?;
            }
            Command::Cancel => {
                // Unlike new-quiz and convert, cancel is a deliberate
                // discard: the pending quiz is dropped, not salvaged.
                self.store.reset(conversation).await?;
                self.send(conversation, replies::QUEUE_CLEARED).await;
            }
        }
        Ok(())
    }

    /// Moves a pending quiz into the queue with a blank solution.
    ///
    /// Idempotent; every path that would otherwise discard a pending quiz
    /// (a superseding quiz, `/convert`) goes through here. Returns the new
    /// queue length when something was salvaged.
    async fn salvage_pending(
        &self,
        conversation: ConversationId,
    ) -> Result<Option<usize>, QuizdocError> {
        let Some(pending) = self.store.take_pending(conversation).await? else {
            return Ok(None);
        };
        let queue_len = self
            .store
            .enqueue(conversation, pending.with_explanation(""))
            .await?;
        warn!(%conversation, queue_len, "salvaged pending quiz with blank solution");
        Ok(Some(queue_len))
    }

    /// Drains the queue and builds one document from it.
    ///
    /// The drain happens first, so a failed build loses the batch: this is
    /// accepted, not retried. The pending slot is never touched here.
    async fn flush(&self, conversation: ConversationId) -> Result<(), QuizdocError> {
        let batch = self.store.drain_queue(conversation).await?;
        if batch.is_empty() {
            self.send(conversation, replies::NOTHING_TO_CONVERT).await;
            return Ok(());
        }

        self.send(conversation, &replies::processing(batch.len()))
            .await;

        match self.sink.build(conversation, &batch).await {
            Ok(artifact) => {
                info!(
                    %conversation,
                    records = batch.len(),
                    file = artifact.file_name.as_str(),
                    "document built"
                );
                self.send(conversation, replies::BUILD_SUCCEEDED).await;
                if let Err(e) = self.channel.deliver(conversation, artifact).await {
                    error!(%conversation, error = %e, "failed to deliver document");
                    self.send(conversation, &replies::build_failed(&e)).await;
                }
            }
            Err(e) => {
                error!(%conversation, error = %e, "document build failed");
                self.send(conversation, &replies::build_failed(&e)).await;
            }
        }
        Ok(())
    }

    /// Fire-and-forget user-facing text; a failed send never fails the event.
    async fn send(&self, conversation: ConversationId, text: &str) {
        if let Err(e) = self.channel.notify(conversation, text).await {
            warn!(%conversation, error = %e, "failed to send notification");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizdoc_core::types::{PendingQuiz, QuizOption};
    use quizdoc_session::MemorySessionStore;
    use quizdoc_test_utils::{MockChannel, MockSink};

    const CONV: ConversationId = ConversationId(10);
    const OTHER: ConversationId = ConversationId(11);

    struct Fixture {
        collector: Collector,
        store: Arc<MemorySessionStore>,
        channel: Arc<MockChannel>,
        sink: Arc<MockSink>,
    }

    fn fixture(batch_size: usize) -> Fixture {
        let store = Arc::new(MemorySessionStore::new());
        let channel = Arc::new(MockChannel::new());
        let sink = Arc::new(MockSink::new());
        let collector = Collector::new(
            store.clone(),
            channel.clone(),
            sink.clone(),
            &CollectorConfig { batch_size },
        );
        Fixture {
            collector,
            store,
            channel,
            sink,
        }
    }

    fn quiz_event(question: &str) -> InboundEvent {
        InboundEvent {
            conversation: CONV,
            kind: EventKind::Quiz(QuizEvent {
                question: question.into(),
                options: vec![
                    QuizOption::new("a"),
                    QuizOption::new("b"),
                    QuizOption::new("c"),
                ],
                correct_option: Some(1),
                is_quiz: true,
            }),
        }
    }

    fn regular_poll() -> InboundEvent {
        let mut event = quiz_event("opinion?");
        if let EventKind::Quiz(ref mut quiz) = event.kind {
            quiz.is_quiz = false;
        }
        event
    }

    fn text_event(text: &str) -> InboundEvent {
        InboundEvent {
            conversation: CONV,
            kind: EventKind::Text(text.into()),
        }
    }

    fn command_event(command: Command) -> InboundEvent {
        InboundEvent {
            conversation: CONV,
            kind: EventKind::Command(command),
        }
    }

    #[tokio::test]
    async fn pairing_grows_queue_by_one_and_empties_pending() {
        let f = fixture(30);
        f.collector.handle_event(quiz_event("q1")).await.unwrap();
        assert_eq!(
            f.collector.pairing_state(CONV).await.unwrap(),
            PairingState::AwaitingSolution
        );

        f.collector
            .handle_event(text_event("the answer is b"))
            .await
            .unwrap();
        assert_eq!(
            f.collector.pairing_state(CONV).await.unwrap(),
            PairingState::Idle
        );
        assert_eq!(f.store.queue_len(CONV).await.unwrap(), 1);

        let texts = f.channel.notifications_for(CONV).await;
        assert_eq!(texts.last().unwrap(), &replies::pair_saved(1, 30));
    }

    #[tokio::test]
    async fn second_quiz_salvages_the_first_with_blank_solution() {
        let f = fixture(30);
        f.collector.handle_event(quiz_event("first")).await.unwrap();
        f.collector.handle_event(quiz_event("second")).await.unwrap();

        // The first quiz is queued with an empty explanation.
        assert_eq!(f.store.queue_len(CONV).await.unwrap(), 1);
        let queued = f.store.drain_queue(CONV).await.unwrap();
        assert_eq!(queued[0].question, "first");
        assert_eq!(queued[0].explanation, "");

        // The second quiz replaced it as pending.
        let pending = f.store.pending(CONV).await.unwrap().unwrap();
        assert_eq!(pending.question, "second");

        let texts = f.channel.notifications_for(CONV).await;
        assert!(texts.contains(&replies::salvaged_on_new_quiz(1, 30)));
    }

    #[tokio::test]
    async fn non_quiz_poll_is_rejected_without_state_change() {
        let f = fixture(30);
        f.collector.handle_event(regular_poll()).await.unwrap();

        assert_eq!(
            f.collector.pairing_state(CONV).await.unwrap(),
            PairingState::Idle
        );
        assert_eq!(f.store.queue_len(CONV).await.unwrap(), 0);
        assert_eq!(
            f.channel.notifications_for(CONV).await,
            vec![replies::NOT_A_QUIZ.to_string()]
        );
    }

    #[tokio::test]
    async fn text_without_pending_quiz_is_rejected_and_echoed() {
        let f = fixture(30);
        f.collector
            .handle_event(text_event("orphan solution"))
            .await
            .unwrap();

        assert_eq!(f.store.queue_len(CONV).await.unwrap(), 0);
        assert!(f.store.pending(CONV).await.unwrap().is_none());

        let texts = f.channel.notifications_for(CONV).await;
        assert_eq!(texts.len(), 1);
        assert!(texts[0].contains("orphan solution"));
    }

    #[tokio::test]
    async fn reaching_batch_size_triggers_exactly_one_flush() {
        let f = fixture(30);
        for i in 0..30 {
            f.collector
                .handle_event(quiz_event(&format!("q{i}")))
                .await
                .unwrap();
            f.collector
                .handle_event(text_event(&format!("s{i}")))
                .await
                .unwrap();
        }

        assert_eq!(f.sink.build_count().await, 1);
        let batches = f.sink.batches().await;
        assert_eq!(batches[0].1.len(), 30);
        assert_eq!(f.store.queue_len(CONV).await.unwrap(), 0);
        assert_eq!(f.channel.deliveries().await.len(), 1);
    }

    #[tokio::test]
    async fn convert_with_nothing_queued_calls_no_sink() {
        let f = fixture(30);
        f.collector
            .handle_event(command_event(Command::Convert))
            .await
            .unwrap();

        assert_eq!(f.sink.build_count().await, 0);
        assert_eq!(
            f.channel.notifications_for(CONV).await,
            vec![replies::NOTHING_TO_CONVERT.to_string()]
        );
    }

    #[tokio::test]
    async fn convert_salvages_a_lone_pending_quiz_and_flushes_it() {
        let f = fixture(30);
        f.collector.handle_event(quiz_event("lonely")).await.unwrap();
        f.collector
            .handle_event(command_event(Command::Convert))
            .await
            .unwrap();

        let batches = f.sink.batches().await;
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].1.len(), 1);
        assert_eq!(batches[0].1[0].question, "lonely");
        assert_eq!(batches[0].1[0].explanation, "");
        assert!(f.store.pending(CONV).await.unwrap().is_none());

        let texts = f.channel.notifications_for(CONV).await;
        assert!(texts.contains(&replies::PENDING_SALVAGED_ON_CONVERT.to_string()));
        assert!(texts.contains(&replies::BUILD_SUCCEEDED.to_string()));
    }

    #[tokio::test]
    async fn cancel_discards_pending_and_queue() {
        let f = fixture(30);
        f.collector.handle_event(quiz_event("q1")).await.unwrap();
        f.collector.handle_event(text_event("s1")).await.unwrap();
        f.collector.handle_event(quiz_event("q2")).await.unwrap();

        f.collector
            .handle_event(command_event(Command::Cancel))
            .await
            .unwrap();
        assert!(f.store.pending(CONV).await.unwrap().is_none());
        assert_eq!(f.store.queue_len(CONV).await.unwrap(), 0);

        // A follow-up convert finds nothing: the cancelled pending quiz was
        // discarded, not salvaged.
        f.collector
            .handle_event(command_event(Command::Convert))
            .await
            .unwrap();
        assert_eq!(f.sink.build_count().await, 0);
        assert!(f
            .channel
            .notifications_for(CONV)
            .await
            .contains(&replies::NOTHING_TO_CONVERT.to_string()));
    }

    #[tokio::test]
    async fn start_resets_state_and_sends_the_welcome() {
        let f = fixture(30);
        f.collector.handle_event(quiz_event("q")).await.unwrap();
        f.collector
            .handle_event(command_event(Command::Start))
            .await
            .unwrap();

        assert!(f.store.pending(CONV).await.unwrap().is_none());
        let texts = f.channel.notifications_for(CONV).await;
        assert_eq!(texts.last().unwrap(), &replies::welcome(30));
    }

    #[tokio::test]
    async fn sink_failure_loses_the_batch_and_reports_it() {
        let f = fixture(2);
        f.sink.set_failing(true);

        f.collector.handle_event(quiz_event("q1")).await.unwrap();
        f.collector.handle_event(text_event("s1")).await.unwrap();
        f.collector.handle_event(quiz_event("q2")).await.unwrap();
        f.collector.handle_event(text_event("s2")).await.unwrap();

        // Flush ran, failed, and the batch is gone.
        assert_eq!(f.sink.build_count().await, 1);
        assert_eq!(f.store.queue_len(CONV).await.unwrap(), 0);
        assert!(f.channel.deliveries().await.is_empty());

        let texts = f.channel.notifications_for(CONV).await;
        assert!(texts.iter().any(|t| t.contains("error occurred")));

        // Nothing resurrects: convert now reports an empty queue.
        f.collector
            .handle_event(command_event(Command::Convert))
            .await
            .unwrap();
        assert_eq!(f.sink.build_count().await, 1);
    }

    #[tokio::test]
    async fn flush_never_touches_pending() {
        let f = fixture(30);
        f.store
            .set_pending(
                CONV,
                PendingQuiz {
                    question: "kept".into(),
                    options: vec![QuizOption::new("a")],
                    correct_option: Some(0),
                },
            )
            .await
            .unwrap();
        f.store
            .enqueue(
                CONV,
                PendingQuiz {
                    question: "queued".into(),
                    options: vec![QuizOption::new("a")],
                    correct_option: Some(0),
                }
                .with_explanation("s"),
            )
            .await
            .unwrap();

        f.collector.flush(CONV).await.unwrap();

        assert_eq!(f.sink.build_count().await, 1);
        assert_eq!(f.store.queue_len(CONV).await.unwrap(), 0);
        // Only convert salvages the pending slot; the flush itself must not.
        let pending = f.store.pending(CONV).await.unwrap().unwrap();
        assert_eq!(pending.question, "kept");
    }

    #[tokio::test]
    async fn conversations_do_not_observe_each_other() {
        let f = fixture(30);
        f.collector.handle_event(quiz_event("mine")).await.unwrap();

        let other_text = InboundEvent {
            conversation: OTHER,
            kind: EventKind::Text("stray".into()),
        };
        f.collector.handle_event(other_text).await.unwrap();

        // OTHER had no pending quiz, so its text was rejected...
        assert_eq!(f.store.queue_len(OTHER).await.unwrap(), 0);
        // ...while CONV's pending quiz is untouched.
        let pending = f.store.pending(CONV).await.unwrap().unwrap();
        assert_eq!(pending.question, "mine");

        let other_texts = f.channel.notifications_for(OTHER).await;
        assert!(other_texts[0].contains("stray"));
    }

    #[tokio::test]
    async fn concurrent_events_for_distinct_conversations_stay_isolated() {
        let f = fixture(30);
        let collector = Arc::new(f.collector);

        let mut handles = Vec::new();
        for conv in [CONV, OTHER] {
            let collector = collector.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..10 {
                    let quiz = InboundEvent {
                        conversation: conv,
                        kind: EventKind::Quiz(QuizEvent {
                            question: format!("q{i}"),
                            options: vec![QuizOption::new("a"), QuizOption::new("b")],
                            correct_option: Some(0),
                            is_quiz: true,
                        }),
                    };
                    collector.handle_event(quiz).await.unwrap();
                    let text = InboundEvent {
                        conversation: conv,
                        kind: EventKind::Text(format!("s{i}")),
                    };
                    collector.handle_event(text).await.unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(f.store.queue_len(CONV).await.unwrap(), 10);
        assert_eq!(f.store.queue_len(OTHER).await.unwrap(), 10);
        assert!(f.store.pending(CONV).await.unwrap().is_none());
        assert!(f.store.pending(OTHER).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn out_of_range_correct_option_reaches_the_sink_unchanged() {
        let f = fixture(30);
        let mut event = quiz_event("bad index");
        if let EventKind::Quiz(ref mut quiz) = event.kind {
            quiz.correct_option = Some(5);
        }
        f.collector.handle_event(event).await.unwrap();
        f.collector.handle_event(text_event("s")).await.unwrap();
        f.collector
            .handle_event(command_event(Command::Convert))
            .await
            .unwrap();

        let batches = f.sink.batches().await;
        let record = &batches[0].1[0];
        assert_eq!(record.correct_option, Some(5));
        // Marking policy: no option is correct.
        assert_eq!(record.correct_index(), None);
    }

    #[tokio::test]
    async fn salvage_is_a_noop_when_nothing_is_pending() {
        let f = fixture(30);
        assert!(f.collector.salvage_pending(CONV).await.unwrap().is_none());
        assert_eq!(f.store.queue_len(CONV).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn direct_store_state_matches_pairing_state() {
        let f = fixture(30);
        f.store
            .set_pending(
                CONV,
                PendingQuiz {
                    question: "q".into(),
                    options: vec![QuizOption::new("a")],
                    correct_option: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(
            f.collector.pairing_state(CONV).await.unwrap(),
            PairingState::AwaitingSolution
        );
    }
}
