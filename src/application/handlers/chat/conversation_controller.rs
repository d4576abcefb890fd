//! Conversation controller - owns one session's conversation and drives its turns.
//!
//! A turn moves `Idle -> Sending -> Settled -> Idle`. Entering `Sending`
//! appends the user message and clears the pending input; the relay call is
//! the only suspension point; settling appends exactly one assistant-role
//! message, either the reply or a synthesized failure notice.
//!
//! At most one turn is in flight. A submission made while busy is ignored,
//! not queued. The busy flag is released by a drop guard, so it is cleared
//! on every exit path, including a panicking relay client or a cancelled
//! future. An abandoned turn is still answered, with a failure notice.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::domain::chat::{
    Conversation, ConversationError, Message, TransportFailure, TurnFailure, TurnState,
    EMPTY_REPLY_PLACEHOLDER,
};
use crate::domain::foundation::StateMachine;
use crate::ports::RelayClient;

/// Why a submission did not start a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    /// Pending input is empty after trimming.
    EmptyInput,
    /// Another turn is still in flight.
    Busy,
}

/// Result of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// No message was appended and no request was made.
    Ignored(IgnoredReason),
    /// The relay answered; `reply` is the appended assistant message.
    Replied { user: Message, reply: Message },
    /// The turn failed; `notice` is the appended assistant-role explanation.
    Failed {
        user: Message,
        failure: TurnFailure,
        notice: Message,
    },
}

impl SubmitOutcome {
    /// The assistant-role message appended by this submission, if any.
    pub fn assistant_message(&self) -> Option<&Message> {
        match self {
            SubmitOutcome::Ignored(_) => None,
            SubmitOutcome::Replied { reply, .. } => Some(reply),
            SubmitOutcome::Failed { notice, .. } => Some(notice),
        }
    }
}

/// Point-in-time view of a session for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct ChatSnapshot {
    pub messages: Vec<Message>,
    pub input: String,
    pub state: TurnState,
    pub busy: bool,
}

#[derive(Debug, Default)]
struct ChatSession {
    conversation: Conversation,
    input: String,
    state: TurnState,
}

impl ChatSession {
    /// Moves to `next`. An out-of-order transition is logged and applied
    /// anyway so the session can never wedge outside `Idle`.
    fn advance(&mut self, next: TurnState) {
        self.state = match self.state.transition_to(next) {
            Ok(state) => state,
            Err(e) => {
                tracing::error!(from = ?self.state, to = ?next, error = %e, "invalid turn transition");
                next
            }
        };
    }

    /// Appends the turn's answer and returns to `Idle`.
    fn settle(&mut self, text: String) -> Result<Message, ConversationError> {
        let appended = self.conversation.append_reply(text).cloned();
        self.advance(TurnState::Settled);
        self.advance(TurnState::Idle);
        appended
    }
}

/// Drives the conversation of a single session.
///
/// Constructed at session start and shared with the view layer by reference
/// or `Arc`. Nothing is persisted; dropping the controller discards the
/// conversation.
pub struct ConversationController {
    relay: Arc<dyn RelayClient>,
    session: Mutex<ChatSession>,
    busy: AtomicBool,
}

impl ConversationController {
    /// Creates a controller with an empty conversation.
    pub fn new(relay: Arc<dyn RelayClient>) -> Self {
        Self {
            relay,
            session: Mutex::new(ChatSession::default()),
            busy: AtomicBool::new(false),
        }
    }

    fn lock_session(&self) -> MutexGuard<'_, ChatSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the pending input buffer.
    pub fn set_input(&self, text: impl Into<String>) {
        self.lock_session().input = text.into();
    }

    /// Returns the pending input buffer.
    pub fn input(&self) -> String {
        self.lock_session().input.clone()
    }

    /// True while a turn is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// True if `submit` would start a turn right now.
    pub fn can_submit(&self) -> bool {
        !self.is_busy() && !self.lock_session().input.trim().is_empty()
    }

    /// Messages in insertion order.
    pub fn messages(&self) -> Vec<Message> {
        self.lock_session().conversation.messages().to_vec()
    }

    /// Current turn state.
    pub fn state(&self) -> TurnState {
        self.lock_session().state
    }

    pub fn snapshot(&self) -> ChatSnapshot {
        let session = self.lock_session();
        ChatSnapshot {
            messages: session.conversation.messages().to_vec(),
            input: session.input.clone(),
            state: session.state,
            busy: self.is_busy(),
        }
    }

    /// Sets the input buffer and submits it.
    pub async fn submit_text(
        &self,
        text: impl Into<String>,
    ) -> Result<SubmitOutcome, ConversationError> {
        self.set_input(text);
        self.submit().await
    }

    /// Submits the pending input as one turn.
    ///
    /// # Errors
    ///
    /// Returns `ConversationError` only if the conversation's append-only
    /// shape would be violated, which the busy flag rules out.
    pub async fn submit(&self) -> Result<SubmitOutcome, ConversationError> {
        let user = {
            let mut session = self.lock_session();
            let text = session.input.trim().to_string();
            if text.is_empty() {
                return Ok(SubmitOutcome::Ignored(IgnoredReason::EmptyInput));
            }
            if self
                .busy
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                tracing::debug!("submission ignored while a turn is in flight");
                return Ok(SubmitOutcome::Ignored(IgnoredReason::Busy));
            }
            let user = match session.conversation.append_user(text) {
                Ok(message) => message.clone(),
                Err(err) => {
                    self.busy.store(false, Ordering::Release);
                    return Err(err);
                }
            };
            session.input.clear();
            session.advance(TurnState::Sending);
            user
        };

        let mut turn = TurnGuard {
            controller: self,
            settled: false,
        };

        let outcome = self.relay.send(user.content()).await;

        match outcome {
            Ok(reply) => {
                let text = reply
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| EMPTY_REPLY_PLACEHOLDER.to_string());
                let reply = turn.settle(text)?;
                Ok(SubmitOutcome::Replied { user, reply })
            }
            Err(failure) => {
                tracing::warn!(error = %failure, "turn failed");
                let notice = turn.settle(failure.user_message())?;
                Ok(SubmitOutcome::Failed {
                    user,
                    failure,
                    notice,
                })
            }
        }
    }
}

/// Releases the busy flag when the turn ends, however it ends.
struct TurnGuard<'a> {
    controller: &'a ConversationController,
    settled: bool,
}

impl TurnGuard<'_> {
    fn settle(&mut self, text: String) -> Result<Message, ConversationError> {
        self.settled = true;
        self.controller.lock_session().settle(text)
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            let notice = TurnFailure::from(TransportFailure::Other(Some(
                "요청이 중단되었습니다.".to_string(),
            )))
            .user_message();
            if let Err(err) = self.controller.lock_session().settle(notice) {
                tracing::error!(error = %err, "could not answer abandoned turn");
            }
            tracing::warn!("turn abandoned before the relay answered");
        }
        self.controller.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat::Role;
    use crate::ports::RelayReply;
    use async_trait::async_trait;
    use proptest::prelude::*;
    use std::collections::VecDeque;
    use tokio::sync::Notify;

    /// Relay client returning scripted outcomes and recording what it was sent.
    #[derive(Default)]
    struct ScriptedRelay {
        outcomes: Mutex<VecDeque<Result<RelayReply, TurnFailure>>>,
        sent: Mutex<Vec<String>>,
    }

    impl ScriptedRelay {
        fn with(outcomes: Vec<Result<RelayReply, TurnFailure>>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(outcomes.into()),
                sent: Mutex::new(Vec::new()),
            })
        }

        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RelayClient for ScriptedRelay {
        async fn send(&self, message: &str) -> Result<RelayReply, TurnFailure> {
            self.sent.lock().unwrap().push(message.to_string());
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(RelayReply::new("ok")))
        }
    }

    /// Relay client that blocks until released.
    #[derive(Default)]
    struct GatedRelay {
        started: Notify,
        release: Notify,
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl RelayClient for GatedRelay {
        async fn send(&self, _message: &str) -> Result<RelayReply, TurnFailure> {
            *self.calls.lock().unwrap() += 1;
            self.started.notify_one();
            self.release.notified().await;
            Ok(RelayReply::new("done"))
        }
    }

    struct PanickingRelay;

    #[async_trait]
    impl RelayClient for PanickingRelay {
        async fn send(&self, _message: &str) -> Result<RelayReply, TurnFailure> {
            panic!("relay exploded");
        }
    }

    #[tokio::test]
    async fn successful_turn_appends_user_then_reply() {
        let relay = ScriptedRelay::with(vec![Ok(RelayReply::new("스트레칭을 추천합니다"))]);
        let controller = ConversationController::new(relay.clone());

        let outcome = controller.submit_text("무릎이 아파요").await.unwrap();

        let messages = controller.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role(), Role::User);
        assert_eq!(messages[0].content(), "무릎이 아파요");
        assert_eq!(messages[1].role(), Role::Assistant);
        assert_eq!(messages[1].content(), "스트레칭을 추천합니다");
        assert_eq!(outcome.assistant_message(), Some(&messages[1]));
        assert!(!controller.is_busy());
        assert_eq!(controller.state(), TurnState::Idle);
        assert_eq!(relay.sent(), vec!["무릎이 아파요"]);
    }

    #[tokio::test]
    async fn input_is_trimmed_and_cleared() {
        let relay = ScriptedRelay::with(vec![]);
        let controller = ConversationController::new(relay.clone());
        controller.set_input("  스쿼트  \n");

        controller.submit().await.unwrap();

        assert_eq!(controller.input(), "");
        assert_eq!(controller.messages()[0].content(), "스쿼트");
        assert_eq!(relay.sent(), vec!["스쿼트"]);
    }

    #[tokio::test]
    async fn empty_input_appends_nothing() {
        let relay = ScriptedRelay::with(vec![]);
        let controller = ConversationController::new(relay.clone());

        let outcome = controller.submit_text(" \t ").await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Ignored(IgnoredReason::EmptyInput));
        assert!(controller.messages().is_empty());
        assert!(relay.sent().is_empty());
    }

    #[tokio::test]
    async fn missing_reply_text_uses_placeholder() {
        let relay = ScriptedRelay::with(vec![Ok(RelayReply::empty()), Ok(RelayReply::new(""))]);
        let controller = ConversationController::new(relay);

        controller.submit_text("a").await.unwrap();
        controller.submit_text("b").await.unwrap();

        let messages = controller.messages();
        assert_eq!(messages[1].content(), EMPTY_REPLY_PLACEHOLDER);
        assert_eq!(messages[3].content(), EMPTY_REPLY_PLACEHOLDER);
    }

    #[tokio::test]
    async fn rate_limit_failure_appends_one_notice() {
        let relay = ScriptedRelay::with(vec![Err(TurnFailure::http(
            429,
            Some("OpenAI API 오류: 429".into()),
        ))]);
        let controller = ConversationController::new(relay);

        let outcome = controller.submit_text("hi").await.unwrap();

        let messages = controller.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role(), Role::Assistant);
        assert!(messages[1].content().contains("요청 한도를 초과했습니다"));
        assert!(matches!(outcome, SubmitOutcome::Failed { .. }));
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn connectivity_failure_mentions_network() {
        let relay = ScriptedRelay::with(vec![Err(TransportFailure::Connectivity(
            "connection refused".into(),
        )
        .into())]);
        let controller = ConversationController::new(relay);

        controller.submit_text("hi").await.unwrap();

        let notice = controller.messages()[1].content().to_string();
        assert!(notice.contains("네트워크"));
        assert!(!notice.contains("상태 코드"));
    }

    #[tokio::test]
    async fn conversation_stays_usable_after_failure() {
        let relay = ScriptedRelay::with(vec![
            Err(TurnFailure::http(503, None)),
            Ok(RelayReply::new("다시 연결되었습니다")),
        ]);
        let controller = ConversationController::new(relay);

        controller.submit_text("first").await.unwrap();
        controller.submit_text("second").await.unwrap();

        let contents: Vec<String> = controller
            .messages()
            .iter()
            .map(|m| m.content().to_string())
            .collect();
        assert_eq!(contents.len(), 4);
        assert_eq!(contents[2], "second");
        assert_eq!(contents[3], "다시 연결되었습니다");
    }

    #[tokio::test]
    async fn submission_while_sending_is_ignored() {
        let relay = Arc::new(GatedRelay::default());
        let controller = ConversationController::new(relay.clone());

        let first = controller.submit_text("first");
        let second = async {
            relay.started.notified().await;
            assert!(controller.is_busy());
            assert_eq!(controller.state(), TurnState::Sending);

            let outcome = controller.submit_text("second").await.unwrap();
            assert_eq!(outcome, SubmitOutcome::Ignored(IgnoredReason::Busy));
            assert_eq!(controller.messages().len(), 1);
            // the rejected text stays in the buffer
            assert_eq!(controller.input(), "second");

            relay.release.notify_one();
        };

        let (first, ()) = tokio::join!(first, second);

        assert!(matches!(first.unwrap(), SubmitOutcome::Replied { .. }));
        assert_eq!(*relay.calls.lock().unwrap(), 1);
        assert_eq!(controller.messages().len(), 2);
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn cancelled_turn_releases_busy_and_answers() {
        let relay = Arc::new(GatedRelay::default());
        let controller = ConversationController::new(relay.clone());

        tokio::select! {
            _ = controller.submit_text("first") => panic!("gate was never released"),
            _ = relay.started.notified() => {}
        }

        assert!(!controller.is_busy());
        assert_eq!(controller.state(), TurnState::Idle);
        let messages = controller.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[1].content().contains("요청이 중단되었습니다"));
    }

    #[tokio::test]
    async fn panicking_relay_does_not_leave_controller_busy() {
        let controller = Arc::new(ConversationController::new(Arc::new(PanickingRelay)));

        let task_controller = controller.clone();
        let joined = tokio::spawn(async move { task_controller.submit_text("hi").await }).await;

        assert!(joined.is_err());
        assert!(!controller.is_busy());
        assert_eq!(controller.messages().len(), 2);
        assert_eq!(controller.state(), TurnState::Idle);
    }

    #[tokio::test]
    async fn snapshot_reflects_session() {
        let controller = ConversationController::new(ScriptedRelay::with(vec![]));
        controller.submit_text("hello").await.unwrap();
        controller.set_input("draft");

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.messages.len(), 2);
        assert_eq!(snapshot.input, "draft");
        assert_eq!(snapshot.state, TurnState::Idle);
        assert!(!snapshot.busy);
    }

    #[test]
    fn out_of_order_transition_is_applied_without_panicking() {
        let mut session = ChatSession::default();

        session.advance(TurnState::Settled);
        assert_eq!(session.state, TurnState::Settled);

        session.advance(TurnState::Idle);
        assert_eq!(session.state, TurnState::Idle);
    }

    proptest! {
        #[test]
        fn whitespace_only_input_never_sends(input in "[ \t\r\n]{0,16}") {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let relay = ScriptedRelay::with(vec![]);
            let controller = ConversationController::new(relay.clone());

            let outcome = runtime.block_on(controller.submit_text(input)).unwrap();

            prop_assert_eq!(outcome, SubmitOutcome::Ignored(IgnoredReason::EmptyInput));
            prop_assert!(controller.messages().is_empty());
            prop_assert!(relay.sent().is_empty());
        }

        #[test]
        fn non_blank_input_appends_exactly_one_user_message_first(
            input in "[ ]{0,3}[a-z가-힣0-9]{1,12}[ ]{0,3}"
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let relay = ScriptedRelay::with(vec![]);
            let controller = ConversationController::new(relay.clone());

            runtime.block_on(controller.submit_text(input.clone())).unwrap();

            let messages = controller.messages();
            prop_assert_eq!(messages.len(), 2);
            prop_assert_eq!(messages[0].content(), input.trim());
            prop_assert_eq!(messages[0].role(), Role::User);
            prop_assert_eq!(relay.sent(), vec![input.trim().to_string()]);
        }
    }
}
