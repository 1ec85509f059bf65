//! Per-message selection tasks.
//!
//! Every session runs in its own task and owns its state outright. The engine
//! only keeps a routing table from hosting message to the session's mailbox,
//! so sessions never contend on a shared lock.

use super::session::{Session, SessionState, Verdict};
use super::{Continuation, SelectableItem};
use crate::config::SelectionConfig;
use crate::transport::{ChatTransport, MessageId, ReactionEvent, SentMessage, UserId};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, timeout_at};
use tracing::{Instrument, debug, error, info, info_span, warn};

const MAILBOX_CAPACITY: usize = 32;

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Item `index` was chosen and its continuation ran.
    Resolved { index: usize },
    /// No label could be attached.
    Exhausted,
    /// The configured wait elapsed.
    Expired,
    /// The hosting message went away.
    Abandoned,
}

/// A running session.
#[derive(Debug)]
pub struct SessionHandle {
    pub message_id: MessageId,
    pub join: JoinHandle<SessionOutcome>,
}

/// Runs selection sessions and routes reactions to them.
pub struct SelectionEngine {
    transport: Arc<dyn ChatTransport>,
    sessions: DashMap<MessageId, mpsc::Sender<ReactionEvent>>,
    timeout: Option<Duration>,
    initiator_may_choose: bool,
}

impl SelectionEngine {
    pub fn new(transport: Arc<dyn ChatTransport>, config: &SelectionConfig) -> Self {
        Self {
            transport,
            sessions: DashMap::new(),
            timeout: config.timeout(),
            initiator_may_choose: config.initiator_may_choose,
        }
    }

    /// Start a session on `hosting`.
    ///
    /// The session is reachable through [`route`](Self::route) as soon as
    /// this returns, before any label is attached, so early reactions queue
    /// up instead of getting lost.
    pub fn start(
        self: &Arc<Self>,
        hosting: SentMessage,
        initiator: UserId,
        items: Vec<SelectableItem>,
        continuation: Arc<dyn Continuation>,
    ) -> SessionHandle {
        let (tx, rx) = mpsc::channel(MAILBOX_CAPACITY);
        let message_id = hosting.id;
        self.sessions.insert(message_id, tx);

        let span = info_span!("selection", message = %message_id, items = items.len());
        let engine = Arc::clone(self);
        let join = tokio::spawn(
            async move {
                engine
                    .run_session(hosting, initiator, items, continuation, rx)
                    .await
            }
            .instrument(span),
        );

        SessionHandle { message_id, join }
    }

    /// Hand a reaction to the session on its message. Returns `false` when no
    /// session is waiting there.
    pub async fn route(&self, event: ReactionEvent) -> bool {
        let tx = self
            .sessions
            .get(&event.message_id)
            .map(|entry| entry.value().clone());
        match tx {
            Some(tx) => tx.send(event).await.is_ok(),
            None => false,
        }
    }

    /// Drop the session on a deleted message; it ends as abandoned.
    pub fn forget(&self, message_id: MessageId) -> bool {
        self.sessions.remove(&message_id).is_some()
    }

    pub fn is_active(&self, message_id: MessageId) -> bool {
        self.sessions.contains_key(&message_id)
    }

    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }

    async fn run_session(
        &self,
        hosting: SentMessage,
        initiator: UserId,
        items: Vec<SelectableItem>,
        continuation: Arc<dyn Continuation>,
        mut rx: mpsc::Receiver<ReactionEvent>,
    ) -> SessionOutcome {
        let mut session = Session::new(initiator, items, self.initiator_may_choose);

        for (index, symbol) in session.begin_decoration() {
            match self.transport.add_reaction(&hosting, &symbol).await {
                Ok(()) => session.mark_attached(index),
                Err(e) => warn!(index, error = %e, "failed to attach label"),
            }
        }

        if session.finish_decoration() == SessionState::Exhausted {
            self.sessions.remove(&hosting.id);
            info!("nothing to choose from");
            return SessionOutcome::Exhausted;
        }

        let deadline = self.timeout.map(|t| Instant::now() + t);
        loop {
            let next = match deadline {
                Some(deadline) => match timeout_at(deadline, rx.recv()).await {
                    Ok(next) => next,
                    Err(_) => return self.expire(&mut session, &hosting).await,
                },
                None => rx.recv().await,
            };
            let Some(reaction) = next else {
                debug!("hosting message gone");
                return SessionOutcome::Abandoned;
            };

            match session.judge(reaction.user_id, &reaction.symbol) {
                Verdict::Ignore => {}
                Verdict::Remove => {
                    if let Err(e) = self
                        .transport
                        .remove_reaction(&hosting, &reaction.symbol, Some(reaction.user_id))
                        .await
                    {
                        warn!(symbol = %reaction.symbol, error = %e, "failed to remove reaction");
                    }
                }
                Verdict::Choose(index) => {
                    let Some(item) = session.resolve(index) else {
                        continue;
                    };
                    self.sessions.remove(&hosting.id);
                    info!(index, user = %reaction.user_id, "selection resolved");

                    if let Err(e) = self.transport.delete_message(&hosting).await {
                        warn!(error = %e, "failed to delete selection message");
                    }
                    if let Err(e) = continuation
                        .resume(self.transport.as_ref(), &hosting, item)
                        .await
                    {
                        error!(error = %e, code = e.error_code(), "continuation failed");
                    }
                    return SessionOutcome::Resolved { index };
                }
            }
        }
    }

    async fn expire(
        &self,
        session: &mut Session<SelectableItem>,
        hosting: &SentMessage,
    ) -> SessionOutcome {
        self.sessions.remove(&hosting.id);
        session.expire();
        info!("selection expired");

        for symbol in session.attached_symbols() {
            if let Err(e) = self.transport.remove_reaction(hosting, &symbol, None).await {
                warn!(symbol = %symbol, error = %e, "failed to remove label");
            }
        }
        SessionOutcome::Expired
    }
}
