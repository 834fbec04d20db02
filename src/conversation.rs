//! # Conversation
//!
//! The session's message log and its request lifecycle, modelled as a
//! two-state machine:
//!
//! | From | Event | To | Effect |
//! |------|-------|----|--------|
//! | `Idle` | [`Conversation::submit`] with non-blank input | `Awaiting` | user message appended, input cleared, [`PendingTurn`] returned |
//! | `Awaiting` | [`Conversation::resolve`] with `Ok` | `Idle` | assistant message with response, prediction, references |
//! | `Awaiting` | [`Conversation::resolve`] with `Err` | `Idle` | assistant message with the locale's apology; error only logged |
//! | `Awaiting` | `submit` | `Awaiting` | nothing |
//! | `Idle` | `submit` with blank input | `Idle` | nothing |
//!
//! Only `submit` can mint a [`PendingTurn`] and only `resolve` consumes it,
//! so a second in-flight request cannot be expressed.

use crate::client::Backend;
use crate::locale::Locale;
use crate::types::{ChatResponse, HistoryEntry, Message};
use crate::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, error, warn};

pub const WELCOME_MESSAGE_ID: &str = "welcome";

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Awaiting,
}

/// Everything the conversation owns: the log and the in-flight marker.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    messages: Vec<Message>,
    pending: Option<u64>,
}

impl SessionState {
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn phase(&self) -> Phase {
        match self.pending {
            Some(_) => Phase::Awaiting,
            None => Phase::Idle,
        }
    }

    fn history(&self) -> Vec<HistoryEntry> {
        self.messages.iter().map(Message::to_history).collect()
    }
}

/// Proof that a request is in flight. Deliberately neither `Clone` nor `Copy`.
#[derive(Debug)]
pub struct PendingTurn {
    session: u64,
    turn: u64,
    message: String,
    history: Vec<HistoryEntry>,
}

impl PendingTurn {
    /// The text to send, exactly as the user typed it.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The log before this turn's user message.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }
}

/// Creation-time ids in milliseconds, bumped when two land in the same millisecond.
#[derive(Debug, Default)]
struct MessageIds {
    last: u128,
}

impl MessageIds {
    fn next(&mut self) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        self.last = now.max(self.last + 1);
        self.last.to_string()
    }
}

pub struct Conversation {
    /// Distinguishes this conversation's turns from any other's.
    session: u64,
    state: SessionState,
    input: String,
    ids: MessageIds,
    turns: u64,
    locale: Locale,
}

impl Conversation {
    /// An empty conversation.
    pub fn new(locale: Locale) -> Self {
        Self {
            session: NEXT_SESSION.fetch_add(1, Ordering::Relaxed),
            state: SessionState::default(),
            input: String::new(),
            ids: MessageIds::default(),
            turns: 0,
            locale,
        }
    }

    /// A conversation seeded with the locale's greeting.
    pub fn with_greeting(locale: Locale) -> Self {
        let mut conversation = Self::new(locale);
        conversation.state.messages.push(Message::assistant(
            WELCOME_MESSAGE_ID,
            locale.strings().greeting,
        ));
        conversation
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn messages(&self) -> &[Message] {
        self.state.messages()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn is_awaiting(&self) -> bool {
        self.phase() == Phase::Awaiting
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// `Idle -> Awaiting`. Returns `None` and changes nothing when a request
    /// is already pending or the input is blank.
    pub fn submit(&mut self) -> Option<PendingTurn> {
        if self.is_awaiting() || self.input.trim().is_empty() {
            return None;
        }
        let history = self.state.history();
        let message = std::mem::take(&mut self.input);
        let id = self.ids.next();
        self.state.messages.push(Message::user(id, message.clone()));

        self.turns += 1;
        self.state.pending = Some(self.turns);
        debug!(turn = self.turns, "chat turn started");
        Some(PendingTurn {
            session: self.session,
            turn: self.turns,
            message,
            history,
        })
    }

    /// `Awaiting -> Idle`, appending exactly one assistant message.
    ///
    /// Returns `None` if `turn` does not belong to this conversation's pending request.
    pub fn resolve(&mut self, turn: PendingTurn, outcome: Result<ChatResponse>) -> Option<&Message> {
        if turn.session != self.session || self.state.pending != Some(turn.turn) {
            warn!(turn = turn.turn, "ignoring resolution for a turn that is not pending");
            return None;
        }

        let id = self.ids.next();
        let reply = match outcome {
            Ok(response) => {
                let mut reply = Message::assistant(id, response.response);
                reply.prediction = response.prediction;
                reply.references = response.references;
                reply
            }
            Err(e) => {
                error!(turn = turn.turn, error = %e, "chat request failed");
                Message::assistant(id, self.locale.strings().apology)
            }
        };

        self.state.pending = None;
        self.state.messages.push(reply);
        debug!(turn = turn.turn, "chat turn resolved");
        self.state.messages.last()
    }

    /// Submit the current input and wait for the backend. Returns the
    /// assistant message, or `None` if the submission was a no-op.
    pub async fn send(&mut self, backend: &dyn Backend) -> Option<&Message> {
        let turn = self.submit()?;
        let outcome = backend.send_message(turn.message(), turn.history()).await;
        self.resolve(turn, outcome)
    }
}
