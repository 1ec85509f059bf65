//! Selection session state machine.
//!
//! ```text
//! ┌─────────┐  labels   ┌────────────────────┐  ≥1 attached  ┌────────────────────┐  valid label  ┌──────────┐
//! │ Created ├──────────►│ AwaitingDecoration ├──────────────►│ AwaitingUserChoice ├──────────────►│ Resolved │
//! └─────────┘           └─────────┬──────────┘               └─────────┬──────────┘               └──────────┘
//!                                 │ none attached                      │ timeout
//!                                 ▼                                    ▼
//!                           ┌───────────┐                        ┌─────────┐
//!                           │ Exhausted │                        │ Expired │
//!                           └───────────┘                        └─────────┘
//! ```
//!
//! The machine itself does no I/O; the engine performs the transport calls
//! and feeds the results back in.

use super::LabelAlphabet;
use crate::transport::UserId;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    AwaitingDecoration,
    AwaitingUserChoice,
    Resolved,
    Exhausted,
    Expired,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved | Self::Exhausted | Self::Expired)
    }
}

/// What to do with an incoming reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Leave it alone and keep waiting.
    Ignore,
    /// Not a valid choice: take it off the message and keep waiting.
    Remove,
    /// The user picked item `n`.
    Choose(usize),
}

/// One run of the selection protocol over `items`.
#[derive(Debug)]
pub struct Session<T> {
    initiator: UserId,
    initiator_may_choose: bool,
    items: Vec<Option<T>>,
    attached: Vec<usize>,
    state: SessionState,
}

impl<T> Session<T> {
    pub fn new(initiator: UserId, items: Vec<T>, initiator_may_choose: bool) -> Self {
        Self {
            initiator,
            initiator_may_choose,
            items: items.into_iter().map(Some).collect(),
            attached: Vec::new(),
            state: SessionState::Created,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Enter decoration and list the `(index, symbol)` pairs to attach, in
    /// item order.
    pub fn begin_decoration(&mut self) -> Vec<(usize, String)> {
        debug_assert_eq!(self.state, SessionState::Created);
        self.state = SessionState::AwaitingDecoration;

        if self.items.len() > LabelAlphabet::LEN {
            warn!(
                items = self.items.len(),
                labels = LabelAlphabet::LEN,
                "more items than labels; the rest cannot be chosen"
            );
        }
        (0..self.items.len())
            .filter_map(|i| LabelAlphabet::symbol(i).map(|s| (i, s)))
            .collect()
    }

    /// Record that the label for `index` is on the message.
    pub fn mark_attached(&mut self, index: usize) {
        if index < self.items.len() && !self.attached.contains(&index) {
            self.attached.push(index);
        }
    }

    /// Leave decoration. Without a single attached label there is nothing to
    /// choose and the session is exhausted.
    pub fn finish_decoration(&mut self) -> SessionState {
        self.state = if self.attached.is_empty() {
            SessionState::Exhausted
        } else {
            SessionState::AwaitingUserChoice
        };
        self.state
    }

    /// Symbols actually attached, in attach order.
    pub fn attached_symbols(&self) -> Vec<String> {
        self.attached
            .iter()
            .filter_map(|&i| LabelAlphabet::symbol(i))
            .collect()
    }

    /// Classify a reaction by `user` with `symbol`.
    pub fn judge(&self, user: UserId, symbol: &str) -> Verdict {
        if self.state != SessionState::AwaitingUserChoice {
            return Verdict::Ignore;
        }
        if user == self.initiator && !self.initiator_may_choose {
            return Verdict::Ignore;
        }
        match LabelAlphabet::index_of(symbol) {
            Some(index) if self.attached.contains(&index) => Verdict::Choose(index),
            _ => Verdict::Remove,
        }
    }

    /// Take the chosen item. Only the first resolution yields it.
    pub fn resolve(&mut self, index: usize) -> Option<T> {
        if self.state != SessionState::AwaitingUserChoice {
            return None;
        }
        let item = self.items.get_mut(index)?.take()?;
        self.state = SessionState::Resolved;
        Some(item)
    }

    pub fn expire(&mut self) {
        if !self.state.is_terminal() {
            self.state = SessionState::Expired;
        }
    }
}
